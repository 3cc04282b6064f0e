//! Intermediate representation for DRF schema to TypeScript code generation.
//!
//! This module defines a three-layer architecture:
//! 1. Schema-level IR: enumerations, models and view actions (framework-agnostic)
//! 2. TypeScript AST IR: types, expressions, statements, classes, namespaces
//! 3. Emission: AST to TypeScript code strings via the `Emit` trait
//!
//! The separation allows:
//! - All reflection corner cases resolved while the IR is built
//! - Code generation builds structured AST (testable)
//! - Emission is purely mechanical string building
//!
//! ## Module Structure
//!
//! - `model`: model-level IR (EnumDefinition, FieldDescriptor, ModelDefinition)
//! - `route`: route-level IR (RoutePattern, Capability, ViewAction)
//! - `enums`: enumeration builder and extraction
//! - `typemap`: ordered field -> TypeScript type rules
//! - `models`: reflected serializers -> ModelDefinition
//! - `routes`: route patterns -> ViewAction
//! - `types`: TypeScript AST IR (TsType, TsExpr, TsStmt, TsFunction, TsModule)
//! - `codegen`: schema IR -> TypeScript AST
//! - `emit`: TypeScript AST -> code strings (via Emit trait)
//! - `utils`: naming and escaping helpers shared across modules

pub(crate) mod codegen;
pub mod emit;
pub(crate) mod enums;
pub mod model;
pub(crate) mod models;
pub mod route;
pub(crate) mod routes;
pub mod typemap;
pub mod types;
pub mod utils;

// Re-export the main entry points
pub use emit::Emit;
pub use enums::EnumDefinitionBuilder;
pub use models::ModelCatalog;
