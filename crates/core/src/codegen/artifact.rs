//! The generated artifact and its fingerprint.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::RuntimeConfig;
use crate::error::Result;

use super::ir::model::ModelDefinition;
use super::ir::route::{StateSlice, ViewAction};

/// Prefix of the trailing comment line holding the fingerprint.
pub const FINGERPRINT_PREFIX: &str = "// drfgen-fingerprint: ";

const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything one generation run produced, before rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedArtifact {
    /// Modules the code imports its runtime contracts from
    pub runtime: RuntimeConfig,
    /// Models, in registration order
    pub models: Vec<ModelDefinition>,
    /// View actions, in route order
    pub actions: Vec<ViewAction>,
    /// One state slice per routed model
    pub state: Vec<StateSlice>,
}

#[derive(Serialize)]
struct FingerprintInput<'a> {
    generator: &'a str,
    artifact: &'a GeneratedArtifact,
}

impl GeneratedArtifact {
    /// SHA-256 over the JSON serialization of the artifact and the generator version.
    pub fn fingerprint(&self) -> Result<String> {
        let json = serde_json::to_vec(&FingerprintInput {
            generator: GENERATOR_VERSION,
            artifact: self,
        })?;
        Ok(hex::encode(Sha256::digest(&json)))
    }
}

/// The trailing line written after the rendered module.
pub fn fingerprint_line(fingerprint: &str) -> String {
    format!("{FINGERPRINT_PREFIX}{fingerprint}\n")
}

/// Extract the fingerprint from the last non-empty line of a previously written artifact.
///
/// Returns `None` when the line is absent or malformed.
pub fn read_embedded_fingerprint(contents: &str) -> Option<&str> {
    let last = contents.lines().rev().find(|line| !line.trim().is_empty())?;
    let fingerprint = last.trim_end().strip_prefix(FINGERPRINT_PREFIX)?;
    let well_formed =
        fingerprint.len() == 64 && fingerprint.chars().all(|c| c.is_ascii_hexdigit());
    well_formed.then_some(fingerprint)
}
