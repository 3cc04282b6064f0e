//! Code generation from reflected DRF schemas to a TypeScript/Redux client module.
//!
//! One run reflects every selected serializer into a [`ModelDefinition`](ir::model::ModelDefinition),
//! turns every registered route into [`ViewAction`](ir::route::ViewAction)s, renders the
//! whole [`GeneratedArtifact`] into one module and appends its fingerprint.

pub mod artifact;
mod emitter;
pub mod ir;
pub mod reflect;
pub mod schema;
mod session;

pub use artifact::{FINGERPRINT_PREFIX, GeneratedArtifact, read_embedded_fingerprint};
pub use emitter::{GeneratedOutput, generate, render};
pub use reflect::{
    ChoiceBacking, EnumInfo, EnumMemberInfo, FieldInfo, ReflectedKind, RouteRegistry,
    SchemaReflector,
};
pub use schema::SchemaDocument;
pub use session::GenerationSession;
