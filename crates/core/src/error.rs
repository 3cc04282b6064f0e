//! Errors raised while reflecting a schema and generating the client artifact.

use std::path::PathBuf;

/// Failure while building, rendering or writing the generated artifact.
///
/// Every variant except [`CodegenError::Io`] describes an inconsistency in the
/// reflected schema or the configuration; generation stops before any output
/// is written.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// The first member of an enumeration is neither a string nor an integer.
    #[error("enum '{enum_name}' has unsupported value type '{found}' (expected string or integer)")]
    UnsupportedEnumValueType {
        /// Enumeration name
        enum_name: String,
        /// Type of the first member's value
        found: &'static str,
    },

    /// A later member does not share the value type of the first member.
    #[error(
        "enum '{enum_name}' mixes value types: member '{member}' is {found}, expected {expected}"
    )]
    MixedEnumValueTypes {
        /// Enumeration name
        enum_name: String,
        /// Offending member
        member: String,
        /// Type set by the first member
        expected: &'static str,
        /// Type of the offending member
        found: &'static str,
    },

    /// An enumeration without members.
    #[error("enum '{enum_name}' declares no members")]
    EmptyEnum {
        /// Enumeration name
        enum_name: String,
    },

    /// Two members of one enumeration share a name.
    #[error("enum '{enum_name}' declares member '{member}' more than once")]
    DuplicateEnumMember {
        /// Enumeration name
        enum_name: String,
        /// Repeated member name
        member: String,
    },

    /// Two enumerations of one model share a name.
    #[error("model '{model}' declares enum '{enum_name}' more than once")]
    DuplicateEnum {
        /// Owning model
        model: String,
        /// Repeated enumeration name
        enum_name: String,
    },

    /// An enumeration name that clashes with a declaration every model namespace carries.
    #[error("model '{model}' declares enum '{enum_name}', a name its generated namespace already uses")]
    ReservedEnumName {
        /// Owning model
        model: String,
        /// Offending enumeration name
        enum_name: String,
    },

    /// A choice field names a backing enum that its own model does not own.
    #[error("field '{model}.{field}' references enum '{enum_name}' which '{model}' does not declare")]
    UnresolvedEnum {
        /// Owning model
        model: String,
        /// Choice field
        field: String,
        /// Referenced enumeration
        enum_name: String,
    },

    /// A serializer the host does not expose.
    #[error("unknown serializer '{0}'")]
    UnknownSerializer(String),

    /// A nested field points at a serializer that is not part of the generated models.
    #[error("field '{model}.{field}' nests '{target}', which is not a generated model")]
    UnknownModel {
        /// Owning model
        model: String,
        /// Nested field
        field: String,
        /// Nested serializer
        target: String,
    },

    /// Two serializers stylize to the same model name.
    #[error("serializers '{first}' and '{second}' both produce model '{model}'")]
    DuplicateModel {
        /// Stylized model name
        model: String,
        /// Serializer registered first
        first: String,
        /// Serializer registered second
        second: String,
    },

    /// A serializer stylizes to a name the generated module declares itself.
    #[error("serializer '{serializer}' produces model '{model}', which clashes with a generated declaration")]
    ReservedModelName {
        /// Stylized model name
        model: String,
        /// Serializer it came from
        serializer: String,
    },

    /// Two (capability, route) pairs produce the same action type.
    #[error("action type '{action_type}' is produced by both '{first}' and '{second}'")]
    DuplicateActionType {
        /// Repeated action type
        action_type: String,
        /// `capability route` that produced it first
        first: String,
        /// `capability route` that produced it again
        second: String,
    },

    /// Structural metadata the generator relies on is absent.
    #[error("missing schema structure: {0}")]
    MissingStructure(String),

    /// The schema document is not valid JSON of the expected shape.
    #[error("failed to parse schema document: {0}")]
    SchemaParse(#[from] serde_json::Error),

    /// The configuration is unreadable or inconsistent with the schema.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Reading or writing a file failed.
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        /// What was attempted, e.g. `read`
        action: &'static str,
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = CodegenError> = std::result::Result<T, E>;
