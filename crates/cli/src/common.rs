//! Helpers shared by the commands: loading config and schema.

use std::path::{Path, PathBuf};

use clap::Args;
use drfgen_core::{CONFIG_FILENAME, GeneratedOutput, GeneratorConfig, SchemaDocument, generate};
use tracing::debug;

/// Inputs every command reads.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// JSON schema document exported from the Django project
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Config file (defaults to ./drfgen.toml when present)
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Output file, overriding output.path from the config
    #[arg(short, long, value_name = "OUT")]
    pub out: Option<PathBuf>,
}

/// Loaded config, resolved output path and the rendered artifact.
#[derive(Debug)]
pub struct Prepared {
    /// Effective configuration
    pub config: GeneratorConfig,
    /// Output file after the `--out` override
    pub out: PathBuf,
    /// Rendered module and its fingerprint
    pub output: GeneratedOutput,
}

/// Load the named config file, or `./drfgen.toml` when present.
///
/// A named file that does not exist is an error; only the implicit one may be absent.
pub fn load_config(path: Option<&Path>) -> Result<GeneratorConfig, String> {
    match path {
        Some(path) => GeneratorConfig::load(path),
        None => GeneratorConfig::load_or_default(Path::new(CONFIG_FILENAME)),
    }
    .map_err(|err| err.to_string())
}

/// Load config and schema and render the artifact in memory.
pub fn prepare(args: &InputArgs) -> Result<Prepared, String> {
    let config = load_config(args.config.as_deref())?;
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| config.output.path.clone());

    let doc = SchemaDocument::load(&args.schema).map_err(|err| err.to_string())?;
    debug!(
        schema = %args.schema.display(),
        serializers = doc.serializers.len(),
        routes = doc.routes.len(),
        "Loaded schema document."
    );

    let output = generate(&doc, &doc, &config).map_err(|err| err.to_string())?;
    Ok(Prepared {
        config,
        out,
        output,
    })
}
