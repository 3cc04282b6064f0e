//! Enumeration extraction.
//!
//! Enumerations are declared as ordered `(member, value, label)` triples and
//! validated when they are built: the value type is taken from the first member
//! and every other member must share it. Member order is never re-derived from
//! a map, so emission order is declaration order.

use std::collections::HashSet;

use tracing::debug;

use crate::codegen::reflect::EnumInfo;
use crate::error::{CodegenError, Result};

use super::model::{EnumDefinition, EnumMember, EnumValueType, RawValue};

/// Names every generated model namespace already declares.
const RESERVED_ENUM_NAMES: [&str; 2] = ["Input", "schema"];

impl EnumDefinition {
    /// Start building an enumeration named `name`.
    pub fn builder(name: impl Into<String>) -> EnumDefinitionBuilder {
        EnumDefinitionBuilder {
            name: name.into(),
            members: Vec::new(),
        }
    }
}

/// Collects members in call order; see [`EnumDefinition::builder`].
#[derive(Debug, Clone)]
pub struct EnumDefinitionBuilder {
    name: String,
    members: Vec<EnumMember>,
}

impl EnumDefinitionBuilder {
    /// Append a member; order of calls is declaration order.
    pub fn member(
        mut self,
        name: impl Into<String>,
        value: impl Into<RawValue>,
        label: impl Into<String>,
    ) -> Self {
        self.members.push(EnumMember {
            name: name.into(),
            value: value.into(),
            label: label.into(),
        });
        self
    }

    /// Validate the members and fix the value type from the first one.
    pub fn build(self) -> Result<EnumDefinition> {
        let Some(first) = self.members.first() else {
            return Err(CodegenError::EmptyEnum {
                enum_name: self.name,
            });
        };

        let value_type = match first.value {
            RawValue::String(_) => EnumValueType::String,
            RawValue::Integer(_) => EnumValueType::Integer,
            ref other => {
                return Err(CodegenError::UnsupportedEnumValueType {
                    enum_name: self.name,
                    found: other.type_name(),
                });
            }
        };

        let mut seen = HashSet::new();
        for member in &self.members {
            let matches = matches!(
                (value_type, &member.value),
                (EnumValueType::String, RawValue::String(_))
                    | (EnumValueType::Integer, RawValue::Integer(_))
            );
            if !matches {
                return Err(CodegenError::MixedEnumValueTypes {
                    enum_name: self.name,
                    member: member.name.clone(),
                    expected: value_type.as_str(),
                    found: member.value.type_name(),
                });
            }
            if !seen.insert(member.name.as_str()) {
                return Err(CodegenError::DuplicateEnumMember {
                    enum_name: self.name.clone(),
                    member: member.name.clone(),
                });
            }
        }

        Ok(EnumDefinition {
            name: self.name,
            value_type,
            members: self.members,
        })
    }
}

/// Build every enumeration a model declares, preserving declaration order.
pub fn extract_enums(model: &str, declared: Vec<EnumInfo>) -> Result<Vec<EnumDefinition>> {
    let mut names = HashSet::new();
    let mut enums = Vec::with_capacity(declared.len());

    for info in declared {
        if RESERVED_ENUM_NAMES.contains(&info.name.as_str()) {
            return Err(CodegenError::ReservedEnumName {
                model: model.to_string(),
                enum_name: info.name,
            });
        }
        if !names.insert(info.name.clone()) {
            return Err(CodegenError::DuplicateEnum {
                model: model.to_string(),
                enum_name: info.name,
            });
        }

        let definition = info
            .members
            .into_iter()
            .fold(EnumDefinition::builder(info.name), |builder, m| {
                builder.member(m.name, m.value, m.label)
            })
            .build()?;

        debug!(
            model,
            enum_name = %definition.name,
            value_type = definition.value_type.as_str(),
            members = definition.members.len(),
            "Extracted enum."
        );
        enums.push(definition);
    }

    Ok(enums)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::codegen::reflect::EnumMemberInfo;

    fn member(name: &str, value: RawValue, label: &str) -> EnumMemberInfo {
        EnumMemberInfo {
            name: name.into(),
            value,
            label: label.into(),
        }
    }

    #[test]
    fn test_string_enum_keeps_declaration_order() {
        let def = EnumDefinition::builder("CategoryDef")
            .member("SWEET", "sweet", "Sweet")
            .member("SAVORY", "savory", "Savory")
            .member("BITTER", "bitter", "Bitter")
            .build()
            .unwrap();

        assert_eq!(def.value_type, EnumValueType::String);
        let names: Vec<_> = def.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["SWEET", "SAVORY", "BITTER"]);
    }

    #[test]
    fn test_integer_enum() {
        let def = EnumDefinition::builder("Status")
            .member("DENIED", 2, "Denied")
            .member("ACCEPTED", 1, "Accepted")
            .build()
            .unwrap();

        assert_eq!(def.value_type, EnumValueType::Integer);
        assert_eq!(def.members[0].value, RawValue::Integer(2));
        assert_eq!(def.members[1].name, "ACCEPTED");
    }

    #[test]
    fn test_unsupported_first_value_type() {
        let err = EnumDefinition::builder("Ratio")
            .member("HALF", 0.5, "Half")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            CodegenError::UnsupportedEnumValueType { found: "float", .. }
        ));

        let err = EnumDefinition::builder("Flag")
            .member("ON", true, "On")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            CodegenError::UnsupportedEnumValueType { found: "boolean", .. }
        ));
    }

    #[test]
    fn test_mixed_value_types_rejected_at_build() {
        let err = EnumDefinition::builder("Size")
            .member("SMALL", "s", "Small")
            .member("LARGE", 3, "Large")
            .build()
            .unwrap_err();
        match err {
            CodegenError::MixedEnumValueTypes {
                member,
                expected,
                found,
                ..
            } => {
                assert_eq!(member, "LARGE");
                assert_eq!(expected, "string");
                assert_eq!(found, "integer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_and_duplicate_members() {
        assert!(matches!(
            EnumDefinition::builder("Nothing").build(),
            Err(CodegenError::EmptyEnum { .. })
        ));

        let err = EnumDefinition::builder("Dup")
            .member("A", "a", "A")
            .member("A", "b", "B")
            .build()
            .unwrap_err();
        assert!(matches!(err, CodegenError::DuplicateEnumMember { .. }));
    }

    #[test]
    fn test_extract_enums_rejects_duplicate_names() {
        let declared = vec![
            EnumInfo {
                name: "Kind".into(),
                members: vec![member("A", RawValue::from("a"), "A")],
            },
            EnumInfo {
                name: "Kind".into(),
                members: vec![member("B", RawValue::from("b"), "B")],
            },
        ];
        let err = extract_enums("Recipe", declared).unwrap_err();
        assert!(matches!(err, CodegenError::DuplicateEnum { .. }));
    }

    #[test]
    fn test_extract_enums_rejects_namespace_names() {
        for name in ["Input", "schema"] {
            let declared = vec![EnumInfo {
                name: name.into(),
                members: vec![member("A", RawValue::from("a"), "A")],
            }];
            let err = extract_enums("Recipe", declared).unwrap_err();
            match err {
                CodegenError::ReservedEnumName { model, enum_name } => {
                    assert_eq!(model, "Recipe");
                    assert_eq!(enum_name, name);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_extract_enums_preserves_enum_and_member_order() {
        let declared = vec![
            EnumInfo {
                name: "Zeta".into(),
                members: vec![
                    member("Z", RawValue::from("z"), "Z"),
                    member("A", RawValue::from("a"), "A"),
                ],
            },
            EnumInfo {
                name: "Alpha".into(),
                members: vec![member("ONE", RawValue::from(1), "One")],
            },
        ];
        let enums = extract_enums("Recipe", declared).unwrap();
        assert_eq!(enums[0].name, "Zeta");
        assert_eq!(enums[0].members[0].name, "Z");
        assert_eq!(enums[0].members[1].name, "A");
        assert_eq!(enums[1].value_type, EnumValueType::Integer);
    }
}
