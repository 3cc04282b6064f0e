//! Model IR construction from reflected serializers.
//!
//! For each serializer this builds the member list (through the type rules),
//! the owned enumerations, the display accessors and the schema-metadata block.
//! No text is rendered here.

use std::collections::HashMap;

use tracing::debug;

use crate::codegen::reflect::{ChoiceBacking, FieldInfo, ReflectedKind, SchemaReflector};
use crate::error::{CodegenError, Result};

use super::enums::extract_enums;
use super::model::{
    EnumDefinition, FieldDescriptor, FieldKind, FieldMetadata, ModelDefinition, ModelField,
    ScalarKind,
};
use super::typemap::{Mapped, ModelScope, map_field};
use super::utils::strip_known_suffix;

/// Module-level names the generated file declares or relies on; a model class
/// of the same name would shadow them.
const RESERVED_MODEL_NAMES: [&str; 8] = [
    "Action",
    "State",
    "Dispatch",
    "Promise",
    "Record",
    "reducer",
    "initialState",
    "http",
];

/// Serializers selected for generation, with their stylized model names.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    /// `(serializer, model name)` in registration order.
    entries: Vec<(String, String)>,
    /// Serializers the host knows about but the include list leaves out.
    excluded: Vec<String>,
}

impl ModelCatalog {
    /// Select serializers (all of them when `include` is empty) and stylize their names.
    pub fn new(
        available: Vec<String>,
        include: &[String],
        strip_suffixes: &[String],
    ) -> Result<Self> {
        if let Some(missing) = include.iter().find(|name| !available.contains(name)) {
            return Err(CodegenError::UnknownSerializer(missing.clone()));
        }

        let mut catalog = Self::default();
        let mut owners: HashMap<String, String> = HashMap::new();

        for serializer in available {
            if !include.is_empty() && !include.contains(&serializer) {
                catalog.excluded.push(serializer);
                continue;
            }

            let model = strip_known_suffix(&serializer, strip_suffixes).to_string();
            if RESERVED_MODEL_NAMES.contains(&model.as_str()) {
                return Err(CodegenError::ReservedModelName { model, serializer });
            }
            if let Some(first) = owners.get(&model) {
                return Err(CodegenError::DuplicateModel {
                    model,
                    first: first.clone(),
                    second: serializer,
                });
            }
            owners.insert(model.clone(), serializer.clone());
            catalog.entries.push((serializer, model));
        }

        Ok(catalog)
    }

    /// Stylized model name of a selected serializer.
    pub fn model_name(&self, serializer: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(s, _)| s == serializer)
            .map(|(_, model)| model.as_str())
    }

    /// Whether the host knows the serializer but the include list leaves it out.
    pub fn is_excluded(&self, serializer: &str) -> bool {
        self.excluded.iter().any(|s| s == serializer)
    }

    /// Selected serializers, in registration order.
    pub fn serializers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    /// Number of selected serializers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no serializer is selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build the model definition for one selected serializer.
pub fn build_model(
    reflector: &dyn SchemaReflector,
    catalog: &ModelCatalog,
    serializer: &str,
) -> Result<ModelDefinition> {
    let name = catalog
        .model_name(serializer)
        .ok_or_else(|| CodegenError::UnknownSerializer(serializer.to_string()))?
        .to_string();

    let reflected = reflector.list_fields(serializer)?;
    if reflected.is_empty() {
        return Err(CodegenError::MissingStructure(format!(
            "serializer '{serializer}' exposes no fields"
        )));
    }

    let enums = extract_enums(&name, reflector.list_enums(serializer)?)?;

    let mut fields = Vec::with_capacity(reflected.len());
    let mut accessors = Vec::new();

    for info in reflected {
        let descriptor = describe_field(reflector, catalog, serializer, &name, &enums, info)?;
        let scope = ModelScope {
            name: &name,
            enums: &enums,
        };

        match map_field(&descriptor, &scope) {
            Mapped::Member { ty, accessor } => {
                accessors.extend(accessor);
                fields.push(ModelField { descriptor, ty });
            }
            Mapped::Omitted => {
                debug!(
                    model = %name,
                    field = %descriptor.name,
                    "Skipping serializer-only choice field."
                );
            }
        }
    }

    let metadata = fields
        .iter()
        .map(|field| field_metadata(&field.descriptor, &enums))
        .collect();

    debug!(
        model = %name,
        serializer,
        fields = fields.len(),
        enums = enums.len(),
        accessors = accessors.len(),
        "Built model."
    );

    Ok(ModelDefinition {
        name,
        serializer: serializer.to_string(),
        fields,
        enums,
        accessors,
        metadata,
    })
}

/// Turn reflected field info into a descriptor, resolving nested targets and choice backing.
fn describe_field(
    reflector: &dyn SchemaReflector,
    catalog: &ModelCatalog,
    serializer: &str,
    model: &str,
    enums: &[EnumDefinition],
    info: FieldInfo,
) -> Result<FieldDescriptor> {
    let nested_target = |target: &str| {
        catalog
            .model_name(target)
            .map(str::to_string)
            .ok_or_else(|| CodegenError::UnknownModel {
                model: model.to_string(),
                field: info.name.clone(),
                target: target.to_string(),
            })
    };

    let (kind, scalar) = match &info.kind {
        ReflectedKind::Scalar(scalar) => (FieldKind::Scalar, *scalar),
        ReflectedKind::Choice { value_type } => (FieldKind::Choice, *value_type),
        ReflectedKind::Relation => (FieldKind::Relation, ScalarKind::Integer),
        ReflectedKind::ManyRelation => (FieldKind::ManyRelation, ScalarKind::Integer),
        ReflectedKind::Nested { serializer } => (
            FieldKind::Nested {
                model: nested_target(serializer)?,
            },
            ScalarKind::String,
        ),
        ReflectedKind::NestedList { serializer } => (
            FieldKind::NestedList {
                model: nested_target(serializer)?,
            },
            ScalarKind::String,
        ),
    };

    let mut descriptor = FieldDescriptor::new(info.name, kind, scalar);
    descriptor.nullable = info.nullable;
    descriptor.required = info.required;
    descriptor.read_only = info.read_only;
    descriptor.constraints = info.constraints;

    if descriptor.kind == FieldKind::Choice {
        match reflector.resolve_choice_backing(serializer, &descriptor.name)? {
            ChoiceBacking::Enum(enum_name) => {
                if !enums.iter().any(|e| e.name == enum_name) {
                    return Err(CodegenError::UnresolvedEnum {
                        model: model.to_string(),
                        field: descriptor.name,
                        enum_name,
                    });
                }
                descriptor.enum_ref = Some(enum_name);
            }
            ChoiceBacking::Untyped => {}
            ChoiceBacking::SerializerOnly => descriptor.persisted = false,
        }
    }

    Ok(descriptor)
}

fn field_metadata(descriptor: &FieldDescriptor, enums: &[EnumDefinition]) -> FieldMetadata {
    let choices = descriptor
        .enum_ref
        .as_deref()
        .and_then(|name| enums.iter().find(|e| e.name == name))
        .map(|definition| {
            definition
                .members
                .iter()
                .map(|m| (m.value.clone(), m.label.clone()))
                .collect()
        })
        .unwrap_or_default();

    FieldMetadata {
        name: descriptor.name.clone(),
        kind: descriptor.kind_tag(),
        nullable: descriptor.nullable,
        required: descriptor.required,
        read_only: descriptor.read_only,
        constraints: descriptor.constraints.entries(),
        choices,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::codegen::ir::emit::Emit;
    use crate::codegen::ir::model::RawValue;
    use crate::codegen::schema::SchemaDocument;

    const RECIPES: &str = r#"{
        "serializers": [
            {
                "name": "StepSerializer",
                "fields": [
                    {"name": "id", "type": "integer", "read_only": true},
                    {"name": "text", "type": "string"}
                ]
            },
            {
                "name": "RecipeSerializer",
                "enums": [
                    {
                        "name": "CategoryDef",
                        "members": [
                            {"name": "SWEET", "value": "sweet", "label": "Sweet"},
                            {"name": "SAVORY", "value": "savory", "label": "Savory"}
                        ]
                    }
                ],
                "fields": [
                    {"name": "id", "type": "integer", "read_only": true},
                    {"name": "name", "type": "string", "max_length": 100},
                    {"name": "category", "type": "choice", "value_type": "string", "enum": "CategoryDef"},
                    {"name": "flavor", "type": "choice", "value_type": "string", "serializer_only": true},
                    {"name": "steps", "type": "nested_list", "serializer": "StepSerializer"}
                ]
            }
        ],
        "routes": []
    }"#;

    fn suffixes() -> Vec<String> {
        vec!["Serializer".to_string()]
    }

    fn build(json: &str, serializer: &str) -> Result<ModelDefinition> {
        let doc = SchemaDocument::from_json(json).unwrap();
        let catalog = ModelCatalog::new(doc.serializers(), &[], &suffixes()).unwrap();
        build_model(&doc, &catalog, serializer)
    }

    #[test]
    fn test_catalog_strips_suffix_and_applies_include_list() {
        let available = vec!["RecipeSerializer".to_string(), "StepSerializer".to_string()];
        let catalog =
            ModelCatalog::new(available, &["RecipeSerializer".to_string()], &suffixes()).unwrap();

        assert_eq!(catalog.model_name("RecipeSerializer"), Some("Recipe"));
        assert_eq!(catalog.model_name("StepSerializer"), None);
        assert!(catalog.is_excluded("StepSerializer"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_catalog_rejects_unknown_include() {
        let err = ModelCatalog::new(vec![], &["Ghost".to_string()], &suffixes()).unwrap_err();
        assert!(matches!(err, CodegenError::UnknownSerializer(name) if name == "Ghost"));
    }

    #[test]
    fn test_catalog_rejects_colliding_names() {
        let available = vec!["Recipe".to_string(), "RecipeSerializer".to_string()];
        let err = ModelCatalog::new(available, &[], &suffixes()).unwrap_err();
        assert!(matches!(err, CodegenError::DuplicateModel { model, .. } if model == "Recipe"));
    }

    #[test]
    fn test_catalog_rejects_names_the_module_declares() {
        for (serializer, model) in [
            ("ActionSerializer", "Action"),
            ("StateSerializer", "State"),
            ("reducer", "reducer"),
            ("initialStateSerializer", "initialState"),
        ] {
            let err = ModelCatalog::new(vec![serializer.to_string()], &[], &suffixes()).unwrap_err();
            assert!(
                matches!(
                    err,
                    CodegenError::ReservedModelName { model: ref m, serializer: ref s }
                        if m == model && s == serializer
                ),
                "{err}"
            );
        }

        let catalog = ModelCatalog::new(vec!["ActionItemSerializer".to_string()], &[], &suffixes());
        assert_eq!(catalog.unwrap().model_name("ActionItemSerializer"), Some("ActionItem"));
    }

    #[test]
    fn test_recipe_model() {
        let model = build(RECIPES, "RecipeSerializer").unwrap();

        assert_eq!(model.name, "Recipe");
        assert_eq!(model.serializer, "RecipeSerializer");

        let names: Vec<_> = model.fields.iter().map(|f| f.descriptor.name.as_str()).collect();
        assert_eq!(names, ["id", "name", "category", "steps"]);

        let category = model.field("category").unwrap();
        assert_eq!(category.ty.emit(), "Recipe.CategoryDef");
        assert_eq!(model.field("steps").unwrap().ty.emit(), "Step[]");

        assert_eq!(model.accessors.len(), 1);
        assert_eq!(model.accessors[0].method, "getCategoryDisplay");

        let meta = model.metadata.iter().find(|m| m.name == "category").unwrap();
        assert_eq!(meta.kind, "choice");
        assert_eq!(
            meta.choices,
            vec![
                (RawValue::from("sweet"), "Sweet".to_string()),
                (RawValue::from("savory"), "Savory".to_string()),
            ]
        );

        let name_meta = model.metadata.iter().find(|m| m.name == "name").unwrap();
        assert_eq!(name_meta.constraints, vec![("maxLength", RawValue::Integer(100))]);
    }

    #[test]
    fn test_writable_fields_skip_read_only() {
        let model = build(RECIPES, "RecipeSerializer").unwrap();
        let writable: Vec<_> = model
            .writable_fields()
            .map(|f| f.descriptor.name.as_str())
            .collect();
        assert_eq!(writable, ["name", "category", "steps"]);
    }

    #[test]
    fn test_choice_referencing_foreign_enum_is_unresolved() {
        let json = r#"{
            "serializers": [{
                "name": "OrderSerializer",
                "fields": [
                    {"name": "status", "type": "choice", "value_type": "integer", "enum": "Status"}
                ]
            }]
        }"#;
        let err = build(json, "OrderSerializer").unwrap_err();
        match err {
            CodegenError::UnresolvedEnum {
                model,
                field,
                enum_name,
            } => {
                assert_eq!(model, "Order");
                assert_eq!(field, "status");
                assert_eq!(enum_name, "Status");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nested_target_must_be_generated() {
        let json = r#"{
            "serializers": [{
                "name": "RecipeSerializer",
                "fields": [
                    {"name": "author", "type": "nested", "serializer": "UserSerializer"}
                ]
            }]
        }"#;
        let err = build(json, "RecipeSerializer").unwrap_err();
        assert!(matches!(err, CodegenError::UnknownModel { target, .. } if target == "UserSerializer"));
    }

    #[test]
    fn test_model_without_fields_is_missing_structure() {
        let json = r#"{"serializers": [{"name": "EmptySerializer", "fields": []}]}"#;
        let err = build(json, "EmptySerializer").unwrap_err();
        assert!(matches!(err, CodegenError::MissingStructure(_)));
    }

    #[test]
    fn test_unsupported_enum_value_aborts_model() {
        let json = r#"{
            "serializers": [{
                "name": "GaugeSerializer",
                "enums": [{
                    "name": "Level",
                    "members": [{"name": "LOW", "value": 0.5, "label": "Low"}]
                }],
                "fields": [{"name": "id", "type": "integer"}]
            }]
        }"#;
        let err = build(json, "GaugeSerializer").unwrap_err();
        assert!(matches!(
            err,
            CodegenError::UnsupportedEnumValueType { found: "float", .. }
        ));
    }
}
