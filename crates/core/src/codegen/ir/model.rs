//! Model-level IR: enumerations, field descriptors and model definitions.
//!
//! Everything here is produced by the reflection stage (see `enums`, `typemap`
//! and `models`) and consumed by `codegen`; nothing in this module renders text.

use serde::{Deserialize, Serialize};

use super::types::TsType;

/// Raw value of an enum member or a field constraint, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// String value
    String(String),
    /// Integral value
    Integer(i64),
    /// Non-integral number
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// `null` / `None`
    Null,
}

impl RawValue {
    /// Name of the value's type, as reported in enum errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            RawValue::String(_) => "string",
            RawValue::Integer(_) => "integer",
            RawValue::Float(_) => "float",
            RawValue::Bool(_) => "boolean",
            RawValue::Null => "null",
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::String(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Integer(i64::from(value))
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

/// Value type shared by every member of an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumValueType {
    /// Emitted as a string-literal union plus a name -> value map.
    String,
    /// Emitted as a native `enum` with explicit numeric values.
    Integer,
}

impl EnumValueType {
    /// Name used in logs and errors.
    pub fn as_str(self) -> &'static str {
        match self {
            EnumValueType::String => "string",
            EnumValueType::Integer => "integer",
        }
    }
}

/// One `(member name, raw value, display label)` triple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumMember {
    /// Member name, used as the key in the generated map
    pub name: String,
    /// Raw value sent over the wire
    pub value: RawValue,
    /// Human-readable display label
    pub label: String,
}

/// Ordered enumeration owned by a model. Member order is declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumDefinition {
    /// Enum name, unique within the owning model
    pub name: String,
    /// Type shared by every member value
    pub value_type: EnumValueType,
    /// Members in declaration order
    pub members: Vec<EnumMember>,
}

/// Scalar storage type of a field. Choice fields carry the type of their raw values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    /// Integer
    Integer,
    /// Floating-point number
    Float,
    /// Fixed-point decimal, sent as a string
    Decimal,
    /// Boolean
    Boolean,
    /// Free text
    String,
    /// ISO 8601 date
    Date,
    /// ISO 8601 date and time
    #[serde(rename = "datetime")]
    DateTime,
    /// UUID string
    Uuid,
}

impl ScalarKind {
    /// Kind tag recorded in the schema-metadata block.
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "float",
            ScalarKind::Decimal => "decimal",
            ScalarKind::Boolean => "boolean",
            ScalarKind::String => "string",
            ScalarKind::Date => "date",
            ScalarKind::DateTime => "datetime",
            ScalarKind::Uuid => "uuid",
        }
    }
}

/// Structural kind of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain value of the field's scalar kind.
    Scalar,
    /// Value restricted to a set of choices.
    Choice,
    /// Single relation serialized as the related object's identifier.
    Relation,
    /// Many relation serialized as a list of identifiers.
    ManyRelation,
    /// Single nested model.
    Nested {
        /// Stylized model name
        model: String,
    },
    /// List of nested models.
    NestedList {
        /// Stylized model name
        model: String,
    },
}

/// Length and range constraints reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Maximum string length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    /// Minimum string length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    /// Upper numeric bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<RawValue>,
    /// Lower numeric bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<RawValue>,
    /// Total digits of a decimal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_digits: Option<i64>,
    /// Fractional digits of a decimal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<i64>,
}

impl Constraints {
    /// Present constraints as `(metadata key, value)` pairs in a fixed order.
    pub fn entries(&self) -> Vec<(&'static str, RawValue)> {
        let ints = [
            ("maxLength", self.max_length),
            ("minLength", self.min_length),
        ];
        let ranges = [
            ("maxValue", self.max_value.clone()),
            ("minValue", self.min_value.clone()),
        ];
        let digits = [
            ("maxDigits", self.max_digits),
            ("decimalPlaces", self.decimal_places),
        ];

        let mut entries: Vec<(&'static str, RawValue)> = ints
            .into_iter()
            .filter_map(|(key, v)| v.map(|v| (key, RawValue::Integer(v))))
            .collect();
        entries.extend(ranges.into_iter().filter_map(|(key, v)| v.map(|v| (key, v))));
        entries.extend(
            digits
                .into_iter()
                .filter_map(|(key, v)| v.map(|v| (key, RawValue::Integer(v)))),
        );
        entries
    }
}

/// Language-neutral summary of one serializer field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Field name as serialized
    pub name: String,
    /// Structural kind
    pub kind: FieldKind,
    /// Storage type (the raw value type for choices)
    pub scalar: ScalarKind,
    /// Accepts `null`
    pub nullable: bool,
    /// Must be supplied on input
    pub required: bool,
    /// Output only
    pub read_only: bool,
    /// False for serializer-only fields with no persisted model field behind them.
    pub persisted: bool,
    /// Backing enum (owned by the same model) for choice fields.
    pub enum_ref: Option<String>,
    /// Length and range constraints
    pub constraints: Constraints,
}

impl FieldDescriptor {
    /// A required, writable, persisted field without constraints.
    pub fn new(name: impl Into<String>, kind: FieldKind, scalar: ScalarKind) -> Self {
        Self {
            name: name.into(),
            kind,
            scalar,
            nullable: false,
            required: true,
            read_only: false,
            persisted: true,
            enum_ref: None,
            constraints: Constraints::default(),
        }
    }

    /// Kind tag recorded in the schema-metadata block.
    pub fn kind_tag(&self) -> &'static str {
        match &self.kind {
            FieldKind::Scalar => self.scalar.as_str(),
            FieldKind::Choice => "choice",
            FieldKind::Relation => "relation",
            FieldKind::ManyRelation => "many-relation",
            FieldKind::Nested { .. } => "nested",
            FieldKind::NestedList { .. } => "nested-list",
        }
    }
}

/// Method returning the display label of a choice field's current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayAccessor {
    /// e.g. `getCategoryDisplay`
    pub method: String,
    /// Choice field whose value is looked up
    pub field: String,
    /// Enum backing the field
    pub enum_name: String,
}

/// A member of the generated model type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelField {
    /// Reflected field
    pub descriptor: FieldDescriptor,
    /// Type resolved by the first matching rule
    pub ty: TsType,
}

/// Runtime-introspectable metadata for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMetadata {
    /// Field name
    pub name: String,
    /// Kind tag, see [`FieldDescriptor::kind_tag`]
    pub kind: &'static str,
    /// Accepts `null`
    pub nullable: bool,
    /// Must be supplied on input
    pub required: bool,
    /// Output only
    pub read_only: bool,
    /// Present constraints, see [`Constraints::entries`]
    pub constraints: Vec<(&'static str, RawValue)>,
    /// `(raw value, label)` pairs for enum-backed choice fields, in declaration order.
    pub choices: Vec<(RawValue, String)>,
}

/// A generated model: members, owned enums, display accessors and schema metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDefinition {
    /// Stylized name (known serializer suffix stripped).
    pub name: String,
    /// Raw serializer type name as reflected.
    pub serializer: String,
    /// Members, in declaration order
    pub fields: Vec<ModelField>,
    /// Enums owned by the model
    pub enums: Vec<EnumDefinition>,
    /// One accessor per enum-backed choice field
    pub accessors: Vec<DisplayAccessor>,
    /// One entry per field, in declaration order
    pub metadata: Vec<FieldMetadata>,
}

impl ModelDefinition {
    /// Member with the given serialized name.
    pub fn field(&self, name: &str) -> Option<&ModelField> {
        self.fields.iter().find(|f| f.descriptor.name == name)
    }

    /// Fields accepted on create/update (everything not read-only).
    pub fn writable_fields(&self) -> impl Iterator<Item = &ModelField> {
        self.fields.iter().filter(|f| !f.descriptor.read_only)
    }
}
