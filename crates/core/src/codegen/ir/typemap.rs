//! Field descriptor -> TypeScript type mapping.
//!
//! The rules are evaluated in order and the first one whose predicate holds
//! decides the member type. Several predicates can hold for the same field
//! (an integer-valued choice field satisfies both the enum rule and the integer
//! rule), so the order of [`RULES`] is part of the output contract.

use tracing::trace;

use super::model::{DisplayAccessor, EnumDefinition, FieldDescriptor, FieldKind, ScalarKind};
use super::types::{TsPrimitive, TsType};
use super::utils::display_accessor_name;

/// The model a field is being mapped for.
#[derive(Debug, Clone, Copy)]
pub struct ModelScope<'a> {
    /// Stylized model name, used to qualify enum references.
    pub name: &'a str,
    /// Enums the model owns
    pub enums: &'a [EnumDefinition],
}

impl ModelScope<'_> {
    fn recognizes(&self, enum_name: &str) -> bool {
        self.enums.iter().any(|e| e.name == enum_name)
    }
}

/// Outcome of mapping one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Mapped {
    /// The field becomes a model member.
    Member {
        /// Member type
        ty: TsType,
        /// Display accessor for enum-backed choices
        accessor: Option<DisplayAccessor>,
    },
    /// Serializer-only choice field; left out of the model entirely.
    Omitted,
}

impl Mapped {
    fn plain(ty: TsType) -> Self {
        Mapped::Member { ty, accessor: None }
    }
}

/// A single mapping rule.
#[derive(Clone, Copy)]
pub struct TypeRule {
    /// Rule name, logged at trace level when it matches
    pub name: &'static str,
    applies: fn(&FieldDescriptor, &ModelScope<'_>) -> bool,
    map: fn(&FieldDescriptor, &ModelScope<'_>) -> Mapped,
}

impl std::fmt::Debug for TypeRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRule").field("name", &self.name).finish()
    }
}

/// Fields that carry a plain value (as opposed to relations and nested models).
fn is_value_field(field: &FieldDescriptor) -> bool {
    matches!(field.kind, FieldKind::Scalar | FieldKind::Choice)
}

fn nested_model(field: &FieldDescriptor) -> &str {
    match &field.kind {
        FieldKind::Nested { model } | FieldKind::NestedList { model } => model,
        _ => "",
    }
}

fn is_nested_list(f: &FieldDescriptor, _: &ModelScope<'_>) -> bool {
    matches!(f.kind, FieldKind::NestedList { .. })
}

fn map_nested_list(f: &FieldDescriptor, _: &ModelScope<'_>) -> Mapped {
    Mapped::plain(TsType::array_of(TsType::reference(nested_model(f))))
}

fn is_nested(f: &FieldDescriptor, _: &ModelScope<'_>) -> bool {
    matches!(f.kind, FieldKind::Nested { .. })
}

fn map_nested(f: &FieldDescriptor, _: &ModelScope<'_>) -> Mapped {
    Mapped::plain(TsType::reference(nested_model(f)).nullable_if(f.nullable))
}

fn is_enum_choice(f: &FieldDescriptor, scope: &ModelScope<'_>) -> bool {
    f.kind == FieldKind::Choice && f.enum_ref.as_deref().is_some_and(|e| scope.recognizes(e))
}

fn map_enum_choice(f: &FieldDescriptor, scope: &ModelScope<'_>) -> Mapped {
    let enum_name = f.enum_ref.clone().unwrap_or_default();
    Mapped::Member {
        ty: TsType::reference(format!("{}.{}", scope.name, enum_name)),
        accessor: Some(DisplayAccessor {
            method: display_accessor_name(&f.name),
            field: f.name.clone(),
            enum_name,
        }),
    }
}

fn is_choice(f: &FieldDescriptor, _: &ModelScope<'_>) -> bool {
    f.kind == FieldKind::Choice
}

fn map_open_choice(f: &FieldDescriptor, _: &ModelScope<'_>) -> Mapped {
    if f.persisted {
        Mapped::plain(TsType::Primitive(TsPrimitive::Any))
    } else {
        Mapped::Omitted
    }
}

fn is_integer(f: &FieldDescriptor, _: &ModelScope<'_>) -> bool {
    is_value_field(f) && matches!(f.scalar, ScalarKind::Integer | ScalarKind::Float)
}

fn map_number(_: &FieldDescriptor, _: &ModelScope<'_>) -> Mapped {
    Mapped::plain(TsType::number())
}

fn is_relation(f: &FieldDescriptor, _: &ModelScope<'_>) -> bool {
    f.kind == FieldKind::Relation
}

fn map_relation(f: &FieldDescriptor, _: &ModelScope<'_>) -> Mapped {
    Mapped::plain(TsType::number().nullable_if(f.nullable))
}

fn is_boolean(f: &FieldDescriptor, _: &ModelScope<'_>) -> bool {
    is_value_field(f) && f.scalar == ScalarKind::Boolean
}

fn map_boolean(_: &FieldDescriptor, _: &ModelScope<'_>) -> Mapped {
    Mapped::plain(TsType::boolean())
}

fn is_many_relation(f: &FieldDescriptor, _: &ModelScope<'_>) -> bool {
    f.kind == FieldKind::ManyRelation
}

fn map_many_relation(_: &FieldDescriptor, _: &ModelScope<'_>) -> Mapped {
    Mapped::plain(TsType::array_of(TsType::number()))
}

fn always(_: &FieldDescriptor, _: &ModelScope<'_>) -> bool {
    true
}

fn map_string(f: &FieldDescriptor, _: &ModelScope<'_>) -> Mapped {
    Mapped::plain(TsType::string().nullable_if(f.nullable))
}

/// Mapping rules in precedence order.
pub static RULES: [TypeRule; 9] = [
    TypeRule {
        name: "nested-list",
        applies: is_nested_list,
        map: map_nested_list,
    },
    TypeRule {
        name: "nested",
        applies: is_nested,
        map: map_nested,
    },
    TypeRule {
        name: "enum-choice",
        applies: is_enum_choice,
        map: map_enum_choice,
    },
    TypeRule {
        name: "open-choice",
        applies: is_choice,
        map: map_open_choice,
    },
    TypeRule {
        name: "integer",
        applies: is_integer,
        map: map_number,
    },
    TypeRule {
        name: "relation",
        applies: is_relation,
        map: map_relation,
    },
    TypeRule {
        name: "boolean",
        applies: is_boolean,
        map: map_boolean,
    },
    TypeRule {
        name: "many-relation",
        applies: is_many_relation,
        map: map_many_relation,
    },
    TypeRule {
        name: "default",
        applies: always,
        map: map_string,
    },
];

/// Map a field to its member type using the first matching rule.
pub fn map_field(field: &FieldDescriptor, scope: &ModelScope<'_>) -> Mapped {
    let rule = RULES
        .iter()
        .find(|rule| (rule.applies)(field, scope))
        .unwrap_or(&RULES[RULES.len() - 1]);
    trace!(model = scope.name, field = %field.name, rule = rule.name, "Mapped field type.");
    (rule.map)(field, scope)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::codegen::ir::emit::Emit;

    fn status_enum() -> EnumDefinition {
        EnumDefinition::builder("Status")
            .member("ACCEPTED", 1, "Accepted")
            .member("DENIED", 2, "Denied")
            .build()
            .unwrap()
    }

    fn emitted(field: &FieldDescriptor, enums: &[EnumDefinition]) -> String {
        let scope = ModelScope {
            name: "Widget",
            enums,
        };
        match map_field(field, &scope) {
            Mapped::Member { ty, .. } => ty.emit(),
            Mapped::Omitted => "<omitted>".to_string(),
        }
    }

    #[test]
    fn test_rules_are_in_documented_order() {
        let names: Vec<_> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            [
                "nested-list",
                "nested",
                "enum-choice",
                "open-choice",
                "integer",
                "relation",
                "boolean",
                "many-relation",
                "default"
            ]
        );
    }

    #[test]
    fn test_nullable_integer_choice_prefers_enum_reference() {
        let enums = [status_enum()];
        let mut field = FieldDescriptor::new("status", FieldKind::Choice, ScalarKind::Integer);
        field.nullable = true;
        field.enum_ref = Some("Status".into());

        let scope = ModelScope {
            name: "Widget",
            enums: &enums,
        };
        match map_field(&field, &scope) {
            Mapped::Member { ty, accessor } => {
                assert_eq!(ty, TsType::reference("Widget.Status"));
                let accessor = accessor.unwrap();
                assert_eq!(accessor.method, "getStatusDisplay");
                assert_eq!(accessor.enum_name, "Status");
            }
            Mapped::Omitted => unreachable!("enum choice must be kept"),
        }
    }

    #[test]
    fn test_integer_choice_without_enum_is_open_not_numeric() {
        let field = FieldDescriptor::new("rank", FieldKind::Choice, ScalarKind::Integer);
        assert_eq!(emitted(&field, &[]), "any");
    }

    #[test]
    fn test_serializer_only_choice_is_omitted() {
        let mut field = FieldDescriptor::new("flavor", FieldKind::Choice, ScalarKind::String);
        field.persisted = false;
        assert_eq!(emitted(&field, &[]), "<omitted>");
    }

    #[test]
    fn test_nested_types() {
        let list = FieldDescriptor::new(
            "steps",
            FieldKind::NestedList {
                model: "Step".into(),
            },
            ScalarKind::String,
        );
        assert_eq!(emitted(&list, &[]), "Step[]");

        let mut single = FieldDescriptor::new(
            "author",
            FieldKind::Nested {
                model: "User".into(),
            },
            ScalarKind::String,
        );
        assert_eq!(emitted(&single, &[]), "User");
        single.nullable = true;
        assert_eq!(emitted(&single, &[]), "User | null");
    }

    #[test]
    fn test_scalar_and_relation_types() {
        let mut count = FieldDescriptor::new("count", FieldKind::Scalar, ScalarKind::Integer);
        assert_eq!(emitted(&count, &[]), "number");
        count.nullable = true;
        assert_eq!(emitted(&count, &[]), "number");

        let ratio = FieldDescriptor::new("ratio", FieldKind::Scalar, ScalarKind::Float);
        assert_eq!(emitted(&ratio, &[]), "number");

        let mut owner = FieldDescriptor::new("owner", FieldKind::Relation, ScalarKind::Integer);
        assert_eq!(emitted(&owner, &[]), "number");
        owner.nullable = true;
        assert_eq!(emitted(&owner, &[]), "number | null");

        let flag = FieldDescriptor::new("published", FieldKind::Scalar, ScalarKind::Boolean);
        assert_eq!(emitted(&flag, &[]), "boolean");

        let tags = FieldDescriptor::new("tags", FieldKind::ManyRelation, ScalarKind::Integer);
        assert_eq!(emitted(&tags, &[]), "number[]");
    }

    #[test]
    fn test_default_string_rule() {
        let mut name = FieldDescriptor::new("name", FieldKind::Scalar, ScalarKind::String);
        assert_eq!(emitted(&name, &[]), "string");
        name.nullable = true;
        assert_eq!(emitted(&name, &[]), "string | null");

        let created = FieldDescriptor::new("created", FieldKind::Scalar, ScalarKind::DateTime);
        assert_eq!(emitted(&created, &[]), "string");

        let price = FieldDescriptor::new("price", FieldKind::Scalar, ScalarKind::Decimal);
        assert_eq!(emitted(&price, &[]), "string");
    }
}
