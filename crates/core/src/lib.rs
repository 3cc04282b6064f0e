//! drfgen core: typed models, enums and a Redux CRUD scaffold generated from
//! Django REST Framework schemas.
//!
//! The host exposes its serializers and routes through [`SchemaReflector`] and
//! [`RouteRegistry`] (or as a JSON [`SchemaDocument`]); [`generate`] builds the
//! IR, renders one TypeScript module and fingerprints it, and
//! [`write_artifact`] persists it.

pub mod codegen;
pub mod config;
pub mod error;
pub mod generator;

pub use codegen::{
    GeneratedArtifact, GeneratedOutput, GenerationSession, RouteRegistry, SchemaDocument,
    SchemaReflector, generate, render,
};
pub use config::{CONFIG_FILENAME, GeneratorConfig, WriteMode};
pub use error::{CodegenError, Result};
pub use generator::{WriteOutcome, existing_fingerprint, is_up_to_date, write_artifact};
