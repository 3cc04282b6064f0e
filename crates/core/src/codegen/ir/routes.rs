//! Route processing: route patterns -> view actions and state slices.
//!
//! Each capability a route exposes is turned into an action-type triple, one
//! async action creator and one reducer case. Capabilities are handled
//! independently and in [`Capability`] order, so a view exposing several of
//! them contributes several view actions.

use std::collections::HashMap;

use inflector::Inflector;
use tracing::debug;

use crate::error::{CodegenError, Result};

use super::codegen::HTTP_CLIENT;
use super::models::ModelCatalog;
use super::route::{
    ActionCreatorIR, ActionTypes, Capability, PathParam, ReducerEffect, ReducerFragment,
    RoutePattern, StateSlice, UrlPart, ViewAction,
};
use super::types::TsType;
use super::utils::{plural_camel, plural_pascal, sanitize_ts_identifier, to_screaming_snake};

/// Framework suffixes removed from view type names, first match wins.
const VIEW_SUFFIXES: &[&str] = &["ViewSet", "APIView", "View"];

/// Generic-view suffixes removed after the framework suffix. List-style ones
/// pluralize the remaining name.
const ACTION_SUFFIXES: &[(&str, bool)] = &[
    ("ListCreate", true),
    ("RetrieveUpdateDestroy", false),
    ("RetrieveUpdate", false),
    ("RetrieveDestroy", false),
    ("Retrieve", false),
    ("Detail", false),
    ("List", true),
];

/// Names the generated action creators bind themselves; path parameters must avoid them.
const CREATOR_BINDINGS: [&str; 5] = ["item", "data", "dispatch", "response", HTTP_CLIENT];

/// View actions in route order, plus one state slice per model in first-appearance order.
#[derive(Debug, Clone, Default)]
pub struct RouteOutput {
    /// View actions, in route then capability order
    pub actions: Vec<ViewAction>,
    /// One slice per model
    pub state: Vec<StateSlice>,
}

/// Process every route into view actions, rejecting duplicate action types.
pub fn process_routes(routes: &[RoutePattern], catalog: &ModelCatalog) -> Result<RouteOutput> {
    let mut output = RouteOutput::default();
    let mut owners: HashMap<String, String> = HashMap::new();

    for route in routes {
        let model = resolve_model(route, catalog)?;
        let actions = process_route(route, model)?;

        for action in &actions {
            let owner = format!("{} {}", action.capability.as_str(), action.route);
            for action_type in action.action_types.all() {
                if let Some(first) = owners.get(action_type) {
                    return Err(CodegenError::DuplicateActionType {
                        action_type: action_type.to_string(),
                        first: first.clone(),
                        second: owner,
                    });
                }
                owners.insert(action_type.to_string(), owner.clone());
            }
        }

        if let Some(action) = actions.first()
            && !output.state.iter().any(|slice| slice.model == model)
        {
            output.state.push(action.state.clone());
        }
        output.actions.extend(actions);
    }

    Ok(output)
}

fn resolve_model<'a>(route: &RoutePattern, catalog: &'a ModelCatalog) -> Result<&'a str> {
    catalog.model_name(&route.serializer).ok_or_else(|| {
        if catalog.is_excluded(&route.serializer) {
            CodegenError::Config(format!(
                "route '{}' is bound to serializer '{}', which the include list leaves out",
                route.pattern, route.serializer
            ))
        } else {
            CodegenError::UnknownSerializer(route.serializer.clone())
        }
    })
}

/// Build the view actions of a single route bound to `model`.
pub fn process_route(route: &RoutePattern, model: &str) -> Result<Vec<ViewAction>> {
    let url = RouteUrl::parse(route)?;
    let list_style = is_list_style(&route.view);
    let view_name = stylize_view_name(&route.view, model);

    debug!(
        route = %route.pattern,
        view = %route.view,
        view_name = %view_name,
        model,
        capabilities = route.capabilities.len(),
        list_style,
        "Processing route."
    );

    let state = StateSlice {
        model: model.to_string(),
        by_key: format!("{}ById", plural_camel(model)),
        list: format!("{}List", plural_camel(model)),
        key_type: route.lookup_type.ts_type(),
    };

    Ok(route
        .capabilities
        .iter()
        .map(|&capability| ViewAction {
            capability,
            route: route.pattern.clone(),
            view_name: view_name.clone(),
            model: model.to_string(),
            model_alias: model.to_camel_case(),
            action_types: action_types(capability, model),
            creator: build_creator(capability, route, &url, model, &view_name),
            reducer: ReducerFragment {
                action_type: action_types(capability, model).success,
                effect: match capability {
                    Capability::List => ReducerEffect::MergeAllRebuildList,
                    _ => ReducerEffect::MergeOne,
                },
                by_key: state.by_key.clone(),
                list: state.list.clone(),
                lookup_field: route.lookup_field.clone(),
            },
            state: state.clone(),
        })
        .collect())
}

/// Noun naming the whole collection: `Recipes`, or `NewsList` when the
/// plural is the model name itself.
fn collection_noun(model: &str) -> String {
    let plural = plural_pascal(model);
    if plural == model {
        format!("{model}List")
    } else {
        plural
    }
}

/// `FETCH_RECIPES` for list, `<VERB>_RECIPE` otherwise.
fn action_prefix(capability: Capability, model: &str) -> String {
    match capability {
        Capability::List => format!("FETCH_{}", to_screaming_snake(&collection_noun(model))),
        _ => format!("{}_{}", capability.verb(), to_screaming_snake(model)),
    }
}

fn action_types(capability: Capability, model: &str) -> ActionTypes {
    ActionTypes::new(&action_prefix(capability, model))
}

/// `fetchRecipes` for list, `fetchRecipe`/`createRecipe`/... otherwise.
fn creator_name(capability: Capability, model: &str) -> String {
    let noun = match capability {
        Capability::List => collection_noun(model),
        _ => model.to_string(),
    };
    format!("{}{}", capability.verb().to_lowercase(), noun)
}

fn build_creator(
    capability: Capability,
    route: &RoutePattern,
    url: &RouteUrl,
    model: &str,
    view_name: &str,
) -> ActionCreatorIR {
    let method = capability.method();
    let entity = TsType::reference(model);
    let lookup = route.lookup_param();

    let (parts, params) = match capability {
        Capability::List | Capability::Create => url.collection(lookup),
        Capability::Retrieve | Capability::Update => (url.parts.clone(), url.params.clone()),
        Capability::Delete => url.with_item_lookup(lookup, &route.lookup_field),
    };

    let (payload, response) = match capability {
        Capability::List => {
            let many = TsType::array_of(entity);
            (many.clone(), Some(many))
        }
        Capability::Delete => (entity, None),
        _ => (entity.clone(), Some(entity)),
    };

    ActionCreatorIR {
        name: creator_name(capability, model),
        doc: format!("{} {} ({})", method.as_str(), route.pattern, view_name),
        method,
        url: parts,
        params,
        body: matches!(capability, Capability::Create | Capability::Update)
            .then(|| TsType::reference(format!("{model}.Input"))),
        item: (capability == Capability::Delete).then(|| TsType::reference(model)),
        payload,
        response,
    }
}

fn is_list_style(view: &str) -> bool {
    let base = strip_view_suffix(view);
    ACTION_SUFFIXES
        .iter()
        .any(|(suffix, list)| *list && base.ends_with(suffix))
}

fn strip_view_suffix(view: &str) -> &str {
    VIEW_SUFFIXES
        .iter()
        .find_map(|suffix| view.strip_suffix(suffix))
        .unwrap_or(view)
}

/// `RecipeDetailView` -> `Recipe`, `RecipeListView` -> `Recipes`.
///
/// Falls back to the model name when nothing is left after stripping.
pub fn stylize_view_name(view: &str, model: &str) -> String {
    let base = strip_view_suffix(view);
    let (stem, list) = ACTION_SUFFIXES
        .iter()
        .find_map(|(suffix, list)| base.strip_suffix(suffix).map(|stem| (stem, *list)))
        .unwrap_or((base, false));
    let stem = if stem.is_empty() { model } else { stem };

    if list {
        plural_pascal(stem)
    } else {
        stem.to_string()
    }
}

/// Creator argument name for a path parameter.
///
/// Names that collide with a creator binding or an earlier parameter get a
/// `Param` suffix, numbered if that is taken too.
fn param_binding(original_name: &str, taken: &[PathParam]) -> String {
    let clashes =
        |name: &str| CREATOR_BINDINGS.contains(&name) || taken.iter().any(|p| p.name == name);

    let base = sanitize_ts_identifier(original_name);
    if !clashes(&base) {
        return base;
    }

    let mut name = format!("{base}Param");
    let mut counter = 2;
    while clashes(&name) {
        name = format!("{base}Param{counter}");
        counter += 1;
    }
    debug!(parameter = original_name, binding = %name, "Renamed clashing path parameter.");
    name
}

/// Parsed URL template of a route.
#[derive(Debug, Clone, PartialEq)]
struct RouteUrl {
    parts: Vec<UrlPart>,
    params: Vec<PathParam>,
}

impl RouteUrl {
    /// Parse `{name}` and `<name>`/`<converter:name>` placeholders.
    fn parse(route: &RoutePattern) -> Result<Self> {
        let pattern = route
            .pattern
            .trim_start_matches('^')
            .trim_end_matches('$');

        let mut parts = Vec::new();
        let mut params: Vec<PathParam> = Vec::new();
        let mut current = String::new();
        if !pattern.starts_with('/') {
            current.push('/');
        }

        let mut chars = pattern.chars();
        while let Some(c) = chars.next() {
            let close = match c {
                '{' => '}',
                '<' => '>',
                _ => {
                    current.push(c);
                    continue;
                }
            };

            let mut placeholder = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == close {
                    closed = true;
                    break;
                }
                placeholder.push(c);
            }
            if !closed || placeholder.is_empty() {
                return Err(CodegenError::MissingStructure(format!(
                    "route '{}' has a malformed path parameter",
                    route.pattern
                )));
            }

            let (converter, original_name) = match placeholder.split_once(':') {
                Some((converter, name)) => (Some(converter), name),
                None => (None, placeholder.as_str()),
            };

            if !current.is_empty() {
                parts.push(UrlPart::Static(std::mem::take(&mut current)));
            }

            let name = match params.iter().find(|p| p.original_name == original_name) {
                Some(existing) => existing.name.clone(),
                None => {
                    let ty = if original_name == route.lookup_param() {
                        route.lookup_type.ts_type()
                    } else if converter == Some("int") {
                        TsType::number()
                    } else {
                        TsType::string()
                    };
                    let name = param_binding(original_name, &params);
                    params.push(PathParam {
                        name: name.clone(),
                        original_name: original_name.to_string(),
                        ty,
                    });
                    name
                }
            };
            parts.push(UrlPart::Param(name));
        }
        if !current.is_empty() {
            parts.push(UrlPart::Static(current));
        }

        Ok(Self { parts, params })
    }

    fn lookup_name(&self, lookup: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.original_name == lookup)
            .map(|p| p.name.as_str())
    }

    /// The collection URL: everything before the lookup placeholder.
    fn collection(&self, lookup: &str) -> (Vec<UrlPart>, Vec<PathParam>) {
        let Some(lookup_name) = self.lookup_name(lookup) else {
            return (self.parts.clone(), self.params.clone());
        };

        let parts: Vec<UrlPart> = self
            .parts
            .iter()
            .take_while(|part| !matches!(part, UrlPart::Param(name) if name == lookup_name))
            .cloned()
            .collect();
        let params = self
            .params
            .iter()
            .filter(|p| {
                parts
                    .iter()
                    .any(|part| matches!(part, UrlPart::Param(name) if *name == p.name))
            })
            .cloned()
            .collect();
        (parts, params)
    }

    /// The item URL with the lookup placeholder filled from `item.<lookup_field>`.
    fn with_item_lookup(&self, lookup: &str, lookup_field: &str) -> (Vec<UrlPart>, Vec<PathParam>) {
        let Some(lookup_name) = self.lookup_name(lookup) else {
            return (self.parts.clone(), self.params.clone());
        };

        let parts = self
            .parts
            .iter()
            .map(|part| match part {
                UrlPart::Param(name) if name == lookup_name => {
                    UrlPart::ItemField(lookup_field.to_string())
                }
                other => other.clone(),
            })
            .collect();
        let params = self
            .params
            .iter()
            .filter(|p| p.name != lookup_name)
            .cloned()
            .collect();
        (parts, params)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::codegen::ir::emit::Emit;
    use crate::codegen::ir::route::LookupType;

    fn route(pattern: &str, view: &str, capabilities: &[Capability]) -> RoutePattern {
        RoutePattern {
            pattern: pattern.into(),
            view: view.into(),
            capabilities: capabilities.iter().copied().collect(),
            serializer: "RecipeSerializer".into(),
            lookup_field: "id".into(),
            lookup_url_kwarg: None,
            lookup_type: LookupType::Integer,
        }
    }

    fn catalog() -> ModelCatalog {
        ModelCatalog::new(
            vec!["RecipeSerializer".into()],
            &[],
            &["Serializer".to_string()],
        )
        .unwrap()
    }

    fn all_action_types(output: &RouteOutput) -> Vec<String> {
        output
            .actions
            .iter()
            .flat_map(|a| a.action_types.all().map(str::to_string))
            .collect()
    }

    #[test]
    fn test_retrieve_update_route() {
        let routes = [route(
            "/api/recipes/{id}/",
            "RecipeDetailView",
            &[Capability::Update, Capability::Retrieve],
        )];
        let output = process_routes(&routes, &catalog()).unwrap();

        assert_eq!(
            all_action_types(&output),
            [
                "FETCH_RECIPE_REQUEST",
                "FETCH_RECIPE_SUCCESS",
                "FETCH_RECIPE_ERROR",
                "UPDATE_RECIPE_REQUEST",
                "UPDATE_RECIPE_SUCCESS",
                "UPDATE_RECIPE_ERROR",
            ]
        );

        assert_eq!(output.state.len(), 1);
        assert_eq!(output.state[0].by_key, "recipesById");
        assert_eq!(output.state[0].list, "recipesList");

        let update = &output.actions[1].creator;
        assert_eq!(update.name, "updateRecipe");
        assert_eq!(update.body.as_ref().unwrap().emit(), "Recipe.Input");
        assert_eq!(update.params.len(), 1);
        assert_eq!(update.params[0].ty, TsType::number());
    }

    #[test]
    fn test_list_retrieve_yields_two_triples() {
        let routes = [route(
            "/api/recipes/{id}/",
            "RecipeViewSet",
            &[Capability::List, Capability::Retrieve],
        )];
        let output = process_routes(&routes, &catalog()).unwrap();

        assert_eq!(output.actions.len(), 2);
        let types = all_action_types(&output);
        assert_eq!(types.len(), 6);
        assert!(types.iter().all(|t| t.starts_with("FETCH_")));
        assert!(types.contains(&"FETCH_RECIPES_SUCCESS".to_string()));

        let list = &output.actions[0];
        assert_eq!(list.creator.name, "fetchRecipes");
        assert_eq!(list.reducer.effect, ReducerEffect::MergeAllRebuildList);
        assert_eq!(list.creator.url, vec![UrlPart::Static("/api/recipes/".into())]);
        assert!(list.creator.params.is_empty());
        assert_eq!(list.creator.payload.emit(), "Recipe[]");
    }

    #[test]
    fn test_delete_fills_lookup_from_item() {
        let routes = [route(
            "/api/recipes/{id}/",
            "RecipeDetailView",
            &[Capability::Delete],
        )];
        let output = process_routes(&routes, &catalog()).unwrap();
        let delete = &output.actions[0];

        assert_eq!(delete.reducer.effect, ReducerEffect::MergeOne);
        assert_eq!(
            delete.creator.url,
            vec![
                UrlPart::Static("/api/recipes/".into()),
                UrlPart::ItemField("id".into()),
                UrlPart::Static("/".into()),
            ]
        );
        assert!(delete.creator.params.is_empty());
        assert!(delete.creator.response.is_none());
        assert_eq!(delete.creator.item.as_ref().unwrap().emit(), "Recipe");
    }

    #[test]
    fn test_django_style_parameters() {
        let mut r = route(
            "^api/users/<int:user_pk>/recipes/<slug:slug>/$",
            "RecipeDetailView",
            &[Capability::Retrieve],
        );
        r.lookup_field = "slug".into();
        r.lookup_type = LookupType::String;
        let url = RouteUrl::parse(&r).unwrap();

        assert_eq!(
            url.parts,
            vec![
                UrlPart::Static("/api/users/".into()),
                UrlPart::Param("userPk".into()),
                UrlPart::Static("/recipes/".into()),
                UrlPart::Param("slug".into()),
                UrlPart::Static("/".into()),
            ]
        );
        assert_eq!(url.params[0].ty, TsType::number());
        assert_eq!(url.params[0].original_name, "user_pk");
        assert_eq!(url.params[1].ty, TsType::string());

        let (collection, params) = url.collection("slug");
        assert_eq!(collection.len(), 3);
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_lookup_url_kwarg_takes_lookup_type() {
        let mut r = route("/api/recipes/{recipe_pk}/", "RecipeDetailView", &[Capability::Retrieve]);
        r.lookup_url_kwarg = Some("recipe_pk".into());
        r.lookup_type = LookupType::String;
        let url = RouteUrl::parse(&r).unwrap();
        assert_eq!(url.params[0].name, "recipePk");
        assert_eq!(url.params[0].ty, TsType::string());
    }

    #[test]
    fn test_malformed_parameter() {
        let r = route("/api/recipes/{id/", "RecipeDetailView", &[Capability::Retrieve]);
        assert!(matches!(
            RouteUrl::parse(&r),
            Err(CodegenError::MissingStructure(_))
        ));
    }

    #[test]
    fn test_duplicate_action_types_are_rejected() {
        let routes = [
            route("/api/recipes/{id}/", "RecipeDetailView", &[Capability::Retrieve]),
            route("/api/v2/recipes/{id}/", "RecipeView", &[Capability::Retrieve]),
        ];
        let err = process_routes(&routes, &catalog()).unwrap_err();
        match err {
            CodegenError::DuplicateActionType {
                action_type,
                first,
                second,
            } => {
                assert_eq!(action_type, "FETCH_RECIPE_REQUEST");
                assert_eq!(first, "retrieve /api/recipes/{id}/");
                assert_eq!(second, "retrieve /api/v2/recipes/{id}/");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_state_is_deduplicated_per_model() {
        let routes = [
            route("/api/recipes/", "RecipeListCreateView", &[Capability::List, Capability::Create]),
            route(
                "/api/recipes/{id}/",
                "RecipeRetrieveUpdateDestroyAPIView",
                &[Capability::Retrieve, Capability::Update, Capability::Delete],
            ),
        ];
        let output = process_routes(&routes, &catalog()).unwrap();
        assert_eq!(output.actions.len(), 5);
        assert_eq!(output.state.len(), 1);
    }

    #[test]
    fn test_unknown_and_excluded_serializers() {
        let mut r = route("/api/tags/", "TagListView", &[Capability::List]);
        r.serializer = "TagSerializer".into();
        assert!(matches!(
            process_routes(&[r.clone()], &catalog()),
            Err(CodegenError::UnknownSerializer(_))
        ));

        let catalog = ModelCatalog::new(
            vec!["RecipeSerializer".into(), "TagSerializer".into()],
            &["RecipeSerializer".to_string()],
            &["Serializer".to_string()],
        )
        .unwrap();
        assert!(matches!(
            process_routes(&[r], &catalog),
            Err(CodegenError::Config(_))
        ));
    }

    #[test]
    fn test_uncountable_model_keeps_list_and_retrieve_apart() {
        let catalog = ModelCatalog::new(
            vec!["NewsSerializer".into()],
            &[],
            &["Serializer".to_string()],
        )
        .unwrap();
        let mut r = route(
            "/api/news/{id}/",
            "NewsViewSet",
            &[Capability::List, Capability::Retrieve],
        );
        r.serializer = "NewsSerializer".into();
        let output = process_routes(&[r], &catalog).unwrap();

        assert_eq!(
            all_action_types(&output),
            [
                "FETCH_NEWS_LIST_REQUEST",
                "FETCH_NEWS_LIST_SUCCESS",
                "FETCH_NEWS_LIST_ERROR",
                "FETCH_NEWS_REQUEST",
                "FETCH_NEWS_SUCCESS",
                "FETCH_NEWS_ERROR",
            ]
        );
        assert_eq!(output.actions[0].creator.name, "fetchNewsList");
        assert_eq!(output.actions[1].creator.name, "fetchNews");
        assert_eq!(output.state[0].by_key, "newsById");
        assert_eq!(output.state[0].list, "newsList");
    }

    #[test]
    fn test_uncountable_series_list() {
        assert_eq!(collection_noun("Series"), "SeriesList");
        assert_eq!(action_prefix(Capability::List, "Series"), "FETCH_SERIES_LIST");
        assert_eq!(creator_name(Capability::List, "Series"), "fetchSeriesList");
        assert_eq!(creator_name(Capability::List, "Recipe"), "fetchRecipes");
    }

    #[test]
    fn test_path_params_avoid_creator_bindings() {
        let r = route(
            "/api/{data}/{item}/{dispatch}/recipes/{id}/",
            "RecipeDetailView",
            &[Capability::Update],
        );
        let url = RouteUrl::parse(&r).unwrap();
        let names: Vec<_> = url.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["dataParam", "itemParam", "dispatchParam", "id"]);
        assert_eq!(url.parts[1], UrlPart::Param("dataParam".into()));
        assert_eq!(url.params[1].original_name, "item");
    }

    #[test]
    fn test_path_params_that_sanitize_alike_stay_distinct() {
        let r = route(
            "/api/{user_id}/{userId}/{user-id}/recipes/{id}/",
            "RecipeDetailView",
            &[Capability::Retrieve],
        );
        let url = RouteUrl::parse(&r).unwrap();
        let names: Vec<_> = url.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["userId", "userIdParam", "userIdParam2", "id"]);
        assert_eq!(
            url.parts[..6],
            [
                UrlPart::Static("/api/".into()),
                UrlPart::Param("userId".into()),
                UrlPart::Static("/".into()),
                UrlPart::Param("userIdParam".into()),
                UrlPart::Static("/".into()),
                UrlPart::Param("userIdParam2".into()),
            ]
        );
    }

    #[test]
    fn test_repeated_placeholder_reuses_binding() {
        let r = route("/api/{item}/copy/{item}/", "RecipeDetailView", &[Capability::Create]);
        let url = RouteUrl::parse(&r).unwrap();
        assert_eq!(url.params.len(), 1);
        assert_eq!(url.parts[1], UrlPart::Param("itemParam".into()));
        assert_eq!(url.parts[3], UrlPart::Param("itemParam".into()));
    }

    #[test]
    fn test_stylize_view_name() {
        assert_eq!(stylize_view_name("RecipeDetailView", "Recipe"), "Recipe");
        assert_eq!(stylize_view_name("RecipeListView", "Recipe"), "Recipes");
        assert_eq!(stylize_view_name("RecipeListCreateAPIView", "Recipe"), "Recipes");
        assert_eq!(stylize_view_name("RecipeViewSet", "Recipe"), "Recipe");
        assert_eq!(stylize_view_name("ListView", "Recipe"), "Recipes");
        assert_eq!(stylize_view_name("Dashboard", "Recipe"), "Dashboard");
    }
}
