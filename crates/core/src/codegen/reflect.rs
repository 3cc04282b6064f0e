//! Interfaces the host environment implements to expose its schema.
//!
//! The generator never inspects backend objects directly. A host adapter (or
//! the bundled JSON [`SchemaDocument`](super::schema::SchemaDocument)) lists a
//! serializer's fields and the enums declared on its model, resolves the enum
//! behind a choice field, and lists the registered routes.

use serde::Deserialize;

use crate::error::Result;

use super::ir::model::{Constraints, RawValue, ScalarKind};
use super::ir::route::RoutePattern;

/// Field kind as reported by reflection. Nested kinds name the target serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectedKind {
    /// Plain value
    Scalar(ScalarKind),
    /// Value restricted to choices
    Choice {
        /// Type of the raw choice values
        value_type: ScalarKind,
    },
    /// Primary-key relation
    Relation,
    /// Many primary-key relations
    ManyRelation,
    /// Single nested serializer
    Nested {
        /// Target serializer
        serializer: String,
    },
    /// List of nested serializers
    NestedList {
        /// Target serializer
        serializer: String,
    },
}

/// One serializer field as reported by reflection.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Field name as serialized
    pub name: String,
    /// Reflected kind
    pub kind: ReflectedKind,
    /// Accepts `null`
    pub nullable: bool,
    /// Must be supplied on input
    pub required: bool,
    /// Output only
    pub read_only: bool,
    /// Length and range constraints
    pub constraints: Constraints,
}

/// One declared enum member.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnumMemberInfo {
    /// Member name
    pub name: String,
    /// Raw value
    pub value: RawValue,
    /// Display label
    pub label: String,
}

/// An ordered enumeration declared on a data model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnumInfo {
    /// Enumeration name
    pub name: String,
    /// Members in declaration order
    pub members: Vec<EnumMemberInfo>,
}

/// What stands behind a choice field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceBacking {
    /// A declared enum of the same model, by name.
    Enum(String),
    /// A persisted model field without a recognized enum.
    Untyped,
    /// Declared on the serializer only; no persisted model field exists.
    SerializerOnly,
}

/// Schema reflection: fields, enums and choice backing per serializer.
pub trait SchemaReflector {
    /// Serializer type names, in registration order.
    fn serializers(&self) -> Vec<String>;

    /// Fields of `serializer`, in declaration order.
    fn list_fields(&self, serializer: &str) -> Result<Vec<FieldInfo>>;

    /// Enumerations declared on the model behind `serializer`, in declaration order.
    fn list_enums(&self, serializer: &str) -> Result<Vec<EnumInfo>>;

    /// Resolve what backs the choice field `field` of `serializer`.
    fn resolve_choice_backing(&self, serializer: &str, field: &str) -> Result<ChoiceBacking>;
}

/// Registered URL patterns bound to CRUD-capable views.
pub trait RouteRegistry {
    /// Route patterns, in registration order.
    fn routes(&self) -> Vec<RoutePattern>;
}
