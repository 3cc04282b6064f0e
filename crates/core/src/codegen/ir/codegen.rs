//! Code generation from the model and route IR to a TypeScript AST.
//!
//! Sections are produced in a fixed order: imports, the action union, the
//! state shape and initial state, the reducer, the action creators and finally
//! the models. The resulting [`TsModule`] is rendered via the `Emit` trait.

use crate::codegen::artifact::GeneratedArtifact;
use crate::config::RuntimeConfig;

use super::model::{EnumDefinition, EnumValueType, FieldMetadata, ModelDefinition, RawValue};
use super::route::{
    ActionCreatorIR, ReducerEffect, ReducerFragment, StateSlice, UrlPart, ViewAction,
};
use super::types::{
    BinOp, NamespaceItem, ObjectEntry, SwitchCase, TemplatePart, TsClass, TsExpr, TsFunction,
    TsImport, TsItem, TsLiteral, TsMethod, TsModule, TsNamespace, TsParam, TsPrimitive, TsProp,
    TsStmt, TsType, TsTypeDef, TypeDefKind,
};
use super::utils::raw_value_to_literal;

/// Lines emitted before the imports.
const BANNER: [&str; 2] = [
    "/* eslint-disable */",
    "// This file is generated by drfgen. Do not edit it by hand.",
];

/// Binding the HTTP client's default export is imported as.
pub(super) const HTTP_CLIENT: &str = "http";

/// Generate a complete TypeScript module from the artifact IR.
pub fn codegen_module(artifact: &GeneratedArtifact) -> TsModule {
    let mut items = Vec::new();

    items.push(TsItem::TypeDef(codegen_action_union(&artifact.actions)));
    items.push(TsItem::TypeDef(codegen_state_interface(&artifact.state)));
    items.push(codegen_initial_state(&artifact.state));
    items.push(TsItem::Function(codegen_reducer(&artifact.actions)));

    items.extend(
        artifact
            .actions
            .iter()
            .map(|action| TsItem::Function(codegen_creator(action))),
    );

    for model in &artifact.models {
        items.push(TsItem::Class(codegen_model_class(model)));
        items.push(TsItem::Namespace(codegen_model_namespace(model)));
    }

    TsModule {
        banner: BANNER.iter().map(|line| (*line).to_string()).collect(),
        imports: codegen_imports(&artifact.runtime),
        items,
    }
}

/// Generate import statements for the dispatch and network-call contracts.
fn codegen_imports(runtime: &RuntimeConfig) -> Vec<TsImport> {
    vec![
        TsImport {
            default: None,
            items: vec!["Dispatch".into()],
            from: runtime.dispatch_module.clone(),
            type_only: true,
        },
        TsImport {
            default: Some(HTTP_CLIENT.into()),
            items: vec![],
            from: runtime.http_module.clone(),
            type_only: false,
        },
    ]
}

fn action_type_literal(action_type: &str) -> TsType {
    TsType::Literal(TsLiteral::String(action_type.to_string()))
}

/// `type Action = | { type: "..._REQUEST" } | { type: "..._SUCCESS"; payload: T } | ...`
fn codegen_action_union(actions: &[ViewAction]) -> TsTypeDef {
    let variants = actions
        .iter()
        .flat_map(|action| {
            let types = &action.action_types;
            [
                TsType::Object(vec![TsProp::new("type", action_type_literal(&types.request))]),
                TsType::Object(vec![
                    TsProp::new("type", action_type_literal(&types.success)),
                    TsProp::new("payload", action.creator.payload.clone()),
                ]),
                TsType::Object(vec![
                    TsProp::new("type", action_type_literal(&types.error)),
                    TsProp::new("error", TsType::Primitive(TsPrimitive::Unknown)),
                ]),
            ]
        })
        .collect();

    TsTypeDef {
        name: "Action".into(),
        kind: TypeDefKind::Union { variants },
    }
}

fn codegen_state_interface(state: &[StateSlice]) -> TsTypeDef {
    let properties = state
        .iter()
        .flat_map(|slice| {
            [
                TsProp::new(
                    slice.by_key.clone(),
                    TsType::Record {
                        key: Box::new(slice.key_type.clone()),
                        value: Box::new(TsType::reference(&slice.model)),
                    },
                ),
                TsProp::new(slice.list.clone(), TsType::array_of(slice.key_type.clone())),
            ]
        })
        .collect();

    TsTypeDef {
        name: "State".into(),
        kind: TypeDefKind::Interface { properties },
    }
}

fn codegen_initial_state(state: &[StateSlice]) -> TsItem {
    let entries = state
        .iter()
        .flat_map(|slice| {
            [
                ObjectEntry::Prop(slice.by_key.clone(), TsExpr::Object(vec![])),
                ObjectEntry::Prop(slice.list.clone(), TsExpr::Array(vec![])),
            ]
        })
        .collect();

    TsItem::Const {
        name: "initialState".into(),
        ty: Some(TsType::reference("State")),
        init: TsExpr::Object(entries),
    }
}

/// `switch (action.type)` with one case per SUCCESS action; anything else returns `state`.
fn codegen_reducer(actions: &[ViewAction]) -> TsFunction {
    let cases = actions
        .iter()
        .map(|action| SwitchCase {
            test: TsExpr::string(&action.reducer.action_type),
            body: vec![TsStmt::Return(codegen_reducer_update(&action.reducer))],
        })
        .collect();

    TsFunction {
        name: "reducer".into(),
        doc: None,
        curried: None,
        params: vec![
            TsParam {
                name: "state".into(),
                ty: Some(TsType::reference("State")),
                default: Some(TsExpr::ident("initialState")),
            },
            TsParam::typed("action", TsType::reference("Action")),
        ],
        return_type: Some(TsType::reference("State")),
        body: vec![TsStmt::Switch {
            discriminant: TsExpr::ident("action").member("type"),
            cases,
            default: vec![TsStmt::Return(TsExpr::ident("state"))],
        }],
        is_async: false,
        is_arrow: false,
    }
}

/// New state for one SUCCESS case. Entries are merged, never removed.
fn codegen_reducer_update(fragment: &ReducerFragment) -> TsExpr {
    let state = || TsExpr::ident("state");
    let payload = || TsExpr::ident("action").member("payload");
    let by_key = || state().member(&fragment.by_key);

    let mut entries = vec![ObjectEntry::Spread(state())];

    match fragment.effect {
        ReducerEffect::MergeOne => {
            entries.push(ObjectEntry::Prop(
                fragment.by_key.clone(),
                TsExpr::Object(vec![
                    ObjectEntry::Spread(by_key()),
                    ObjectEntry::Computed(payload().member(&fragment.lookup_field), payload()),
                ]),
            ));
        }
        ReducerEffect::MergeAllRebuildList => {
            let item = || TsExpr::ident("item");
            let merge = TsExpr::Arrow {
                params: vec![TsParam::untyped("byKey"), TsParam::untyped("item")],
                body: Box::new(TsExpr::Object(vec![
                    ObjectEntry::Spread(TsExpr::ident("byKey")),
                    ObjectEntry::Computed(item().member(&fragment.lookup_field), item()),
                ])),
            };
            let ids = TsExpr::Arrow {
                params: vec![TsParam::untyped("item")],
                body: Box::new(item().member(&fragment.lookup_field)),
            };

            entries.push(ObjectEntry::Prop(
                fragment.by_key.clone(),
                payload()
                    .member("reduce")
                    .call(vec![merge, TsExpr::Object(vec![ObjectEntry::Spread(by_key())])]),
            ));
            entries.push(ObjectEntry::Prop(
                fragment.list.clone(),
                payload().member("map").call(vec![ids]),
            ));
        }
    }

    TsExpr::Object(entries)
}

fn codegen_url(parts: &[UrlPart]) -> TsExpr {
    let dynamic = parts.iter().any(|part| !matches!(part, UrlPart::Static(_)));
    if !dynamic {
        let url: String = parts
            .iter()
            .filter_map(|part| match part {
                UrlPart::Static(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        return TsExpr::string(url);
    }

    TsExpr::Template(
        parts
            .iter()
            .map(|part| match part {
                UrlPart::Static(s) => TemplatePart::Static(s.clone()),
                UrlPart::Param(name) => TemplatePart::Dynamic(TsExpr::ident(name)),
                UrlPart::ItemField(field) => {
                    TemplatePart::Dynamic(TsExpr::ident("item").member(field))
                }
            })
            .collect(),
    )
}

fn dispatch(action_type: &str, payload: Option<TsExpr>) -> TsStmt {
    let mut entries = vec![ObjectEntry::Prop("type".into(), TsExpr::string(action_type))];
    entries.extend(payload.map(|p| ObjectEntry::Prop("payload".into(), p)));
    TsStmt::Expr(TsExpr::ident("dispatch").call(vec![TsExpr::Object(entries)]))
}

/// Thunk creator: dispatch REQUEST, await the call, dispatch SUCCESS.
///
/// Failures of the call propagate to the caller; nothing dispatches ERROR.
fn codegen_creator(action: &ViewAction) -> TsFunction {
    let creator: &ActionCreatorIR = &action.creator;
    let types = &action.action_types;

    let mut outer: Vec<TsParam> = creator
        .params
        .iter()
        .map(|p| TsParam::typed(&p.name, p.ty.clone()))
        .collect();
    if let Some(item) = &creator.item {
        outer.push(TsParam::typed("item", item.clone()));
    }
    if let Some(body) = &creator.body {
        outer.push(TsParam::typed("data", body.clone()));
    }

    let mut args = vec![codegen_url(&creator.url)];
    if creator.body.is_some() {
        args.push(TsExpr::ident("data"));
    }
    let call = TsExpr::Call {
        callee: Box::new(TsExpr::ident(HTTP_CLIENT).member(creator.method.client_method())),
        type_args: creator.response.iter().cloned().collect(),
        args,
    };

    let mut body = vec![dispatch(&types.request, None)];
    let success_payload = if creator.response.is_some() {
        body.push(TsStmt::Const {
            name: "response".into(),
            init: TsExpr::Await(Box::new(call)),
        });
        TsExpr::ident("response").member("data")
    } else {
        body.push(TsStmt::Expr(TsExpr::Await(Box::new(call))));
        TsExpr::ident("item")
    };
    body.push(dispatch(&types.success, Some(success_payload)));

    TsFunction {
        name: creator.name.clone(),
        doc: Some(creator.doc.clone()),
        curried: Some(outer),
        params: vec![TsParam::typed(
            "dispatch",
            TsType::Generic {
                name: "Dispatch".into(),
                args: vec![TsType::reference("Action")],
            },
        )],
        return_type: Some(TsType::Generic {
            name: "Promise".into(),
            args: vec![TsType::Primitive(TsPrimitive::Void)],
        }),
        body,
        is_async: true,
        is_arrow: true,
    }
}

fn codegen_model_class(model: &ModelDefinition) -> TsClass {
    let properties = model
        .fields
        .iter()
        .map(|field| TsProp {
            name: field.descriptor.name.clone(),
            ty: field.ty.clone(),
            optional: false,
            readonly: field.descriptor.read_only,
        })
        .collect();

    // Model.schema.<field>.choices.find((choice) => choice.value === this.<field>)?.label
    let methods = model
        .accessors
        .iter()
        .map(|accessor| {
            let choices = TsExpr::ident(&model.name)
                .member("schema")
                .member(&accessor.field)
                .member("choices");
            let matches = TsExpr::Arrow {
                params: vec![TsParam::untyped("choice")],
                body: Box::new(TsExpr::BinOp {
                    left: Box::new(TsExpr::ident("choice").member("value")),
                    op: BinOp::StrictEqual,
                    right: Box::new(TsExpr::ident("this").member(&accessor.field)),
                }),
            };
            TsMethod {
                name: accessor.method.clone(),
                return_type: Some(TsType::Union(vec![
                    TsType::string(),
                    TsType::reference("undefined"),
                ])),
                body: vec![TsStmt::Return(TsExpr::OptionalMember {
                    object: Box::new(choices.member("find").call(vec![matches])),
                    prop: "label".into(),
                })],
            }
        })
        .collect();

    TsClass {
        name: model.name.clone(),
        properties,
        methods,
    }
}

fn codegen_enum(definition: &EnumDefinition) -> TsTypeDef {
    let kind = match definition.value_type {
        EnumValueType::String => TypeDefKind::ConstEnum {
            values: definition
                .members
                .iter()
                .map(|m| (m.name.clone(), raw_value_to_literal(&m.value)))
                .collect(),
        },
        EnumValueType::Integer => TypeDefKind::NativeEnum {
            values: definition
                .members
                .iter()
                .filter_map(|m| match m.value {
                    RawValue::Integer(v) => Some((m.name.clone(), v)),
                    _ => None,
                })
                .collect(),
        },
    };

    TsTypeDef {
        name: definition.name.clone(),
        kind,
    }
}

/// `interface Input`: writable fields, optional unless required.
fn codegen_input(model: &ModelDefinition) -> TsTypeDef {
    let properties = model
        .writable_fields()
        .map(|field| TsProp {
            name: field.descriptor.name.clone(),
            ty: field.ty.clone(),
            optional: !field.descriptor.required,
            readonly: false,
        })
        .collect();

    TsTypeDef {
        name: "Input".into(),
        kind: TypeDefKind::Interface { properties },
    }
}

fn tagged(value: &RawValue) -> TsExpr {
    TsExpr::literal_as_const(raw_value_to_literal(value))
}

fn codegen_field_metadata(meta: &FieldMetadata) -> TsExpr {
    let flag = |value: bool| tagged(&RawValue::Bool(value));

    let mut entries = vec![
        ObjectEntry::Prop("kind".into(), tagged(&RawValue::from(meta.kind))),
        ObjectEntry::Prop("nullable".into(), flag(meta.nullable)),
        ObjectEntry::Prop("required".into(), flag(meta.required)),
        ObjectEntry::Prop("readOnly".into(), flag(meta.read_only)),
    ];
    entries.extend(
        meta.constraints
            .iter()
            .map(|(key, value)| ObjectEntry::Prop((*key).to_string(), tagged(value))),
    );
    if !meta.choices.is_empty() {
        let choices = meta
            .choices
            .iter()
            .map(|(value, label)| {
                TsExpr::Object(vec![
                    ObjectEntry::Prop("value".into(), tagged(value)),
                    ObjectEntry::Prop("label".into(), tagged(&RawValue::from(label.as_str()))),
                ])
            })
            .collect();
        entries.push(ObjectEntry::Prop("choices".into(), TsExpr::Array(choices)));
    }

    TsExpr::Object(entries)
}

fn codegen_model_namespace(model: &ModelDefinition) -> TsNamespace {
    let mut items: Vec<NamespaceItem> = model
        .enums
        .iter()
        .map(|definition| NamespaceItem::TypeDef(codegen_enum(definition)))
        .collect();

    items.push(NamespaceItem::TypeDef(codegen_input(model)));
    items.push(NamespaceItem::Const {
        name: "schema".into(),
        init: TsExpr::Object(
            model
                .metadata
                .iter()
                .map(|meta| ObjectEntry::Prop(meta.name.clone(), codegen_field_metadata(meta)))
                .collect(),
        ),
    });

    TsNamespace {
        name: model.name.clone(),
        items,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::codegen::ir::emit::Emit;
    use crate::codegen::ir::model::{FieldDescriptor, FieldKind, ModelField, ScalarKind};
    use crate::codegen::ir::models::ModelCatalog;
    use crate::codegen::ir::route::{Capability, LookupType, RoutePattern};
    use crate::codegen::ir::routes::process_routes;

    fn actions(capabilities: &[Capability]) -> (Vec<ViewAction>, Vec<StateSlice>) {
        let route = RoutePattern {
            pattern: "/api/recipes/{id}/".into(),
            view: "RecipeViewSet".into(),
            capabilities: capabilities.iter().copied().collect(),
            serializer: "RecipeSerializer".into(),
            lookup_field: "id".into(),
            lookup_url_kwarg: None,
            lookup_type: LookupType::Integer,
        };
        let catalog = ModelCatalog::new(
            vec!["RecipeSerializer".into()],
            &[],
            &["Serializer".to_string()],
        )
        .unwrap();
        let output = process_routes(&[route], &catalog).unwrap();
        (output.actions, output.state)
    }

    #[test]
    fn test_retrieve_creator() {
        let (actions, _) = actions(&[Capability::Retrieve]);
        let expected = r#"/** GET /api/recipes/{id}/ (Recipe) */
export const fetchRecipe = (id: number) => async (dispatch: Dispatch<Action>): Promise<void> => {
  dispatch({ type: "FETCH_RECIPE_REQUEST" });
  const response = await http.get<Recipe>(`/api/recipes/${id}/`);
  dispatch({ type: "FETCH_RECIPE_SUCCESS", payload: response.data });
};
"#;
        assert_eq!(codegen_creator(&actions[0]).emit(), expected);
    }

    #[test]
    fn test_create_and_delete_creators() {
        let (actions, _) = actions(&[Capability::Create, Capability::Delete]);

        let create = codegen_creator(&actions[0]).emit();
        assert!(create.contains("export const createRecipe = (data: Recipe.Input) => async"));
        assert!(create.contains("await http.post<Recipe>(\"/api/recipes/\", data);"));

        let delete = codegen_creator(&actions[1]).emit();
        assert!(delete.contains("export const deleteRecipe = (item: Recipe) => async"));
        assert!(delete.contains("  await http.delete(`/api/recipes/${item.id}/`);\n"));
        assert!(delete.contains("dispatch({ type: \"DELETE_RECIPE_SUCCESS\", payload: item });"));
    }

    #[test]
    fn test_reducer_merges_and_never_removes() {
        let (actions, _) = actions(&[Capability::List, Capability::Delete]);
        let reducer = codegen_reducer(&actions).emit();

        let expected_list = r#"    case "FETCH_RECIPES_SUCCESS": {
      return {
        ...state,
        recipesById: action.payload.reduce((byKey, item) => ({ ...byKey, [item.id]: item }), { ...state.recipesById }),
        recipesList: action.payload.map((item) => item.id),
      };
    }
"#;
        assert!(reducer.contains(expected_list), "{reducer}");

        let expected_delete = r#"    case "DELETE_RECIPE_SUCCESS": {
      return {
        ...state,
        recipesById: {
          ...state.recipesById,
          [action.payload.id]: action.payload,
        },
      };
    }
"#;
        assert!(reducer.contains(expected_delete), "{reducer}");
        assert!(!reducer.contains("delete "));
        assert!(reducer.ends_with("    default:\n      return state;\n  }\n}\n"));
    }

    #[test]
    fn test_action_union_and_state() {
        let (actions, state) = actions(&[Capability::Retrieve]);

        assert_eq!(
            TsItem::TypeDef(codegen_action_union(&actions)).emit(),
            "export type Action =\n  | { type: \"FETCH_RECIPE_REQUEST\" }\n  | { type: \"FETCH_RECIPE_SUCCESS\"; payload: Recipe }\n  | { type: \"FETCH_RECIPE_ERROR\"; error: unknown };\n"
        );
        assert_eq!(
            TsItem::TypeDef(codegen_state_interface(&state)).emit(),
            "export interface State {\n  recipesById: Record<number, Recipe>;\n  recipesList: number[];\n}\n"
        );
        assert_eq!(
            codegen_initial_state(&state).emit(),
            "export const initialState: State = {\n  recipesById: {},\n  recipesList: [],\n};\n"
        );
    }

    #[test]
    fn test_model_class_marks_read_only_members() {
        let mut id = FieldDescriptor::new("id", FieldKind::Scalar, ScalarKind::Integer);
        id.read_only = true;
        let mut note = FieldDescriptor::new("note", FieldKind::Scalar, ScalarKind::String);
        note.nullable = true;
        note.required = false;

        let model = ModelDefinition {
            name: "Memo".into(),
            serializer: "MemoSerializer".into(),
            fields: vec![
                ModelField {
                    descriptor: id,
                    ty: TsType::number(),
                },
                ModelField {
                    descriptor: note,
                    ty: TsType::string().nullable_if(true),
                },
            ],
            enums: vec![],
            accessors: vec![],
            metadata: vec![],
        };

        assert_eq!(
            codegen_model_class(&model).emit(),
            "export class Memo {\n  readonly id!: number;\n  note!: string | null;\n}\n"
        );
        assert_eq!(
            TsItem::TypeDef(codegen_input(&model)).emit(),
            "export interface Input {\n  note?: string | null;\n}\n"
        );
    }

    #[test]
    fn test_integer_enum_is_native() {
        let definition = EnumDefinition::builder("Status")
            .member("ACCEPTED", 1, "Accepted")
            .member("DENIED", 2, "Denied")
            .build()
            .unwrap();
        assert_eq!(
            TsItem::TypeDef(codegen_enum(&definition)).emit(),
            "export enum Status {\n  ACCEPTED = 1,\n  DENIED = 2,\n}\n"
        );
    }

    #[test]
    fn test_metadata_literals_are_tagged() {
        let meta = FieldMetadata {
            name: "category".into(),
            kind: "choice",
            nullable: false,
            required: true,
            read_only: false,
            constraints: vec![("maxLength", RawValue::Integer(10))],
            choices: vec![(RawValue::from("sweet"), "Sweet".into())],
        };
        assert_eq!(
            codegen_field_metadata(&meta).emit(),
            "{ kind: \"choice\" as \"choice\", nullable: false as false, required: true as true, readOnly: false as false, maxLength: 10 as 10, choices: [{ value: \"sweet\" as \"sweet\", label: \"Sweet\" as \"Sweet\" }] }"
        );
    }
}
