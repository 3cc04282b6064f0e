//! JSON schema document: a serialized dump of serializers, enums and routes.
//!
//! The document is what a host-side exporter writes and what the CLI reads.
//! Ordered data is always an array so declaration order survives parsing:
//!
//! ```json
//! {
//!   "serializers": [
//!     {
//!       "name": "RecipeSerializer",
//!       "enums": [
//!         {"name": "CategoryDef", "members": [{"name": "SWEET", "value": "sweet", "label": "Sweet"}]}
//!       ],
//!       "fields": [
//!         {"name": "id", "type": "integer", "read_only": true},
//!         {"name": "category", "type": "choice", "value_type": "string", "enum": "CategoryDef"}
//!       ]
//!     }
//!   ],
//!   "routes": [
//!     {"pattern": "/api/recipes/{id}/", "view": "RecipeDetailView",
//!      "capabilities": ["retrieve", "update"], "serializer": "RecipeSerializer"}
//!   ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{CodegenError, Result};

use super::ir::model::{Constraints, ScalarKind};
use super::ir::route::RoutePattern;
use super::reflect::{
    ChoiceBacking, EnumInfo, FieldInfo, ReflectedKind, RouteRegistry, SchemaReflector,
};

/// Parsed schema document; implements both reflection interfaces.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SchemaDocument {
    /// Serializers in registration order
    #[serde(default)]
    pub serializers: Vec<SerializerDoc>,
    /// Routes in registration order
    #[serde(default)]
    pub routes: Vec<RoutePattern>,
}

/// One exported serializer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SerializerDoc {
    /// Serializer type name
    pub name: String,
    /// Enumerations declared on the serializer's model.
    #[serde(default)]
    pub enums: Vec<EnumInfo>,
    /// Absent means the serializer's structure could not be exported.
    pub fields: Option<Vec<FieldDoc>>,
}

/// One exported serializer field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldDoc {
    /// Field name
    pub name: String,
    /// `type` tag and its parameters
    #[serde(flatten)]
    pub ty: FieldTypeDoc,
    /// Accepts `null`
    #[serde(default)]
    pub nullable: bool,
    /// Must be supplied on input; defaults to true
    #[serde(default = "default_required")]
    pub required: bool,
    /// Output only
    #[serde(default)]
    pub read_only: bool,
    /// Backing enum of a choice field.
    #[serde(default, rename = "enum")]
    pub enum_name: Option<String>,
    /// Choice field declared on the serializer without a persisted model field.
    #[serde(default)]
    pub serializer_only: bool,
    /// Length and range constraints, inline
    #[serde(flatten)]
    pub constraints: Constraints,
}

const fn default_required() -> bool {
    true
}

/// Field type tag; nested kinds name the target serializer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldTypeDoc {
    /// `integer`
    Integer,
    /// `float`
    Float,
    /// `decimal`
    Decimal,
    /// `boolean`
    Boolean,
    /// `string`
    String,
    /// `date`
    Date,
    /// `datetime`
    #[serde(rename = "datetime")]
    DateTime,
    /// `uuid`
    Uuid,
    /// `choice`
    Choice {
        /// Type of the raw choice values
        value_type: ScalarKind,
    },
    /// `relation`
    Relation,
    /// `many_relation`
    ManyRelation,
    /// `nested`
    Nested {
        /// Target serializer
        serializer: String,
    },
    /// `nested_list`
    NestedList {
        /// Target serializer
        serializer: String,
    },
}

impl FieldTypeDoc {
    fn reflected(&self) -> ReflectedKind {
        match self {
            FieldTypeDoc::Integer => ReflectedKind::Scalar(ScalarKind::Integer),
            FieldTypeDoc::Float => ReflectedKind::Scalar(ScalarKind::Float),
            FieldTypeDoc::Decimal => ReflectedKind::Scalar(ScalarKind::Decimal),
            FieldTypeDoc::Boolean => ReflectedKind::Scalar(ScalarKind::Boolean),
            FieldTypeDoc::String => ReflectedKind::Scalar(ScalarKind::String),
            FieldTypeDoc::Date => ReflectedKind::Scalar(ScalarKind::Date),
            FieldTypeDoc::DateTime => ReflectedKind::Scalar(ScalarKind::DateTime),
            FieldTypeDoc::Uuid => ReflectedKind::Scalar(ScalarKind::Uuid),
            FieldTypeDoc::Choice { value_type } => ReflectedKind::Choice {
                value_type: *value_type,
            },
            FieldTypeDoc::Relation => ReflectedKind::Relation,
            FieldTypeDoc::ManyRelation => ReflectedKind::ManyRelation,
            FieldTypeDoc::Nested { serializer } => ReflectedKind::Nested {
                serializer: serializer.clone(),
            },
            FieldTypeDoc::NestedList { serializer } => ReflectedKind::NestedList {
                serializer: serializer.clone(),
            },
        }
    }
}

impl SchemaDocument {
    /// Parse a schema document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a schema document.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|err| CodegenError::io("read schema", path, err))?;
        Self::from_json(&contents)
    }

    fn serializer(&self, name: &str) -> Result<&SerializerDoc> {
        self.serializers
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| CodegenError::UnknownSerializer(name.to_string()))
    }

    fn fields(&self, serializer: &str) -> Result<&[FieldDoc]> {
        self.serializer(serializer)?
            .fields
            .as_deref()
            .ok_or_else(|| {
                CodegenError::MissingStructure(format!(
                    "serializer '{serializer}' has no field list"
                ))
            })
    }
}

impl SchemaReflector for SchemaDocument {
    fn serializers(&self) -> Vec<String> {
        self.serializers.iter().map(|s| s.name.clone()).collect()
    }

    fn list_fields(&self, serializer: &str) -> Result<Vec<FieldInfo>> {
        Ok(self
            .fields(serializer)?
            .iter()
            .map(|field| FieldInfo {
                name: field.name.clone(),
                kind: field.ty.reflected(),
                nullable: field.nullable,
                required: field.required,
                read_only: field.read_only,
                constraints: field.constraints.clone(),
            })
            .collect())
    }

    fn list_enums(&self, serializer: &str) -> Result<Vec<EnumInfo>> {
        Ok(self.serializer(serializer)?.enums.clone())
    }

    fn resolve_choice_backing(&self, serializer: &str, field: &str) -> Result<ChoiceBacking> {
        let doc = self
            .fields(serializer)?
            .iter()
            .find(|f| f.name == field)
            .ok_or_else(|| {
                CodegenError::MissingStructure(format!(
                    "serializer '{serializer}' has no field '{field}'"
                ))
            })?;

        Ok(if doc.serializer_only {
            ChoiceBacking::SerializerOnly
        } else if let Some(name) = &doc.enum_name {
            ChoiceBacking::Enum(name.clone())
        } else {
            ChoiceBacking::Untyped
        })
    }
}

impl RouteRegistry for SchemaDocument {
    fn routes(&self) -> Vec<RoutePattern> {
        self.routes.clone()
    }
}
