//! Generator configuration, read from `drfgen.toml`.
//!
//! Every key is optional:
//!
//! ```toml
//! [output]
//! path = "frontend/src/api.ts"
//! write_mode = "skip-if-unchanged"   # or "always"
//!
//! [naming]
//! strip_suffixes = ["Serializer"]
//!
//! [runtime]
//! dispatch_module = "redux"
//! http_module = "axios"
//!
//! [models]
//! include = []
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CodegenError, Result};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "drfgen.toml";

/// Everything that shapes one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// `[output]`
    pub output: OutputConfig,
    /// `[naming]`
    pub naming: NamingConfig,
    /// `[runtime]`
    pub runtime: RuntimeConfig,
    /// `[models]`
    pub models: ModelsConfig,
}

/// Whether an unchanged artifact is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Skip the write when the embedded fingerprint matches.
    #[default]
    SkipIfUnchanged,
    /// Always rewrite the output file.
    Always,
}

/// Where and how the artifact is written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Output file
    pub path: PathBuf,
    /// Rewrite policy
    pub write_mode: WriteMode,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("frontend/src/api.ts"),
            write_mode: WriteMode::default(),
        }
    }
}

/// How serializer names become model names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    /// Suffixes stripped from serializer names to form model names; first match wins.
    pub strip_suffixes: Vec<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            strip_suffixes: vec!["Serializer".to_string()],
        }
    }
}

/// Modules the generated code imports its runtime contracts from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Provides the `Dispatch` type.
    pub dispatch_module: String,
    /// Default export is an axios-compatible client.
    pub http_module: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            dispatch_module: "redux".to_string(),
            http_module: "axios".to_string(),
        }
    }
}

/// Which serializers are generated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelsConfig {
    /// Serializers to generate; empty selects all of them.
    pub include: Vec<String>,
}

impl GeneratorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|err| CodegenError::Config(format!("failed to parse config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path`, which must exist.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|err| CodegenError::io("read config", path, err))?;
        debug!(path = %path.display(), "Loaded config.");
        Self::from_toml_str(&contents)
    }

    /// Load `path` if it exists, the defaults otherwise.
    ///
    /// Only meant for the implicit [`CONFIG_FILENAME`]; a path the user named
    /// goes through [`GeneratorConfig::load`].
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults.");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn validate(&self) -> Result<()> {
        if self.output.path.as_os_str().is_empty() {
            return Err(CodegenError::Config("output.path must not be empty".into()));
        }
        for (key, value) in [
            ("runtime.dispatch_module", &self.runtime.dispatch_module),
            ("runtime.http_module", &self.runtime.http_module),
        ] {
            if value.trim().is_empty() {
                return Err(CodegenError::Config(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }
}
