//! TypeScript code emitter for DRF schemas.
//!
//! This module is a thin wrapper around the IR-based code generation.
//! The pipeline is:
//! 1. Reflect: SchemaReflector + RouteRegistry -> GeneratedArtifact (via GenerationSession)
//! 2. Codegen: GeneratedArtifact -> TsModule (TypeScript AST)
//! 3. Emit: TsModule -> String (via Emit trait), followed by the fingerprint line

use crate::config::GeneratorConfig;
use crate::error::Result;

use super::artifact::{GeneratedArtifact, fingerprint_line};
use super::ir::Emit;
use super::ir::codegen::codegen_module;
use super::reflect::{RouteRegistry, SchemaReflector};
use super::session::GenerationSession;

/// A rendered artifact, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedOutput {
    /// IR the contents were rendered from
    pub artifact: GeneratedArtifact,
    /// Hex SHA-256 of the artifact
    pub fingerprint: String,
    /// Full file contents, fingerprint line included.
    pub contents: String,
}

/// Generate the TypeScript artifact from reflected schema and routes.
pub fn generate(
    reflector: &dyn SchemaReflector,
    registry: &dyn RouteRegistry,
    config: &GeneratorConfig,
) -> Result<GeneratedOutput> {
    let artifact = GenerationSession::run(reflector, registry, config)?;
    render(artifact)
}

/// Render an artifact to text and fingerprint it.
pub fn render(artifact: GeneratedArtifact) -> Result<GeneratedOutput> {
    let fingerprint = artifact.fingerprint()?;
    let mut contents = codegen_module(&artifact).emit();
    contents.push('\n');
    contents.push_str(&fingerprint_line(&fingerprint));

    Ok(GeneratedOutput {
        artifact,
        fingerprint,
        contents,
    })
}
