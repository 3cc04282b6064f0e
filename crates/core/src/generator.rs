//! Writing the generated artifact to disk.
//!
//! The artifact is fully rendered before this runs. With
//! [`WriteMode::SkipIfUnchanged`] the fingerprint embedded in the existing file
//! is compared to the new one and an unchanged artifact is left alone.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::codegen::{GeneratedOutput, read_embedded_fingerprint};
use crate::config::WriteMode;
use crate::error::{CodegenError, Result};

/// What happened to the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was (re)written.
    Written,
    /// The embedded fingerprint matched; the file was not touched.
    Unchanged,
}

/// Fingerprint embedded in the file at `path`, if it can be read and has one.
///
/// A missing file, an unreadable file and a malformed trailing line all mean
/// "no prior reference".
pub fn existing_fingerprint(path: &Path) -> Option<String> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No previous artifact.");
            return None;
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "Previous artifact is unreadable, rewriting."
            );
            return None;
        }
    };

    let fingerprint = read_embedded_fingerprint(&contents).map(str::to_string);
    if fingerprint.is_none() {
        debug!(path = %path.display(), "Previous artifact has no fingerprint line.");
    }
    fingerprint
}

/// Whether the file at `path` already holds this output.
pub fn is_up_to_date(output: &GeneratedOutput, path: &Path) -> bool {
    existing_fingerprint(path).is_some_and(|existing| existing == output.fingerprint)
}

/// Write `output` to `path`, creating parent directories as needed.
pub fn write_artifact(output: &GeneratedOutput, path: &Path, mode: WriteMode) -> Result<WriteOutcome> {
    if mode == WriteMode::SkipIfUnchanged && is_up_to_date(output, path) {
        info!(
            path = %path.display(),
            fingerprint = %output.fingerprint,
            "Generated artifact is unchanged, skipping write."
        );
        return Ok(WriteOutcome::Unchanged);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| CodegenError::io("create output directory", parent, err))?;
    }

    fs::write(path, &output.contents)
        .map_err(|err| CodegenError::io("write artifact", path, err))?;

    info!(
        path = %path.display(),
        fingerprint = %output.fingerprint,
        models = output.artifact.models.len(),
        actions = output.artifact.actions.len(),
        bytes = output.contents.len(),
        "Wrote generated artifact."
    );

    Ok(WriteOutcome::Written)
}
