//! Route-level IR: route patterns, capabilities and the per-capability view actions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::types::TsType;

/// One CRUD ability a route's bound view exposes.
///
/// The declaration order is the processing order for a route's capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// GET on the collection
    List,
    /// GET on one entity
    Retrieve,
    /// POST a new entity
    Create,
    /// PUT over an existing entity
    Update,
    /// DELETE one entity
    Delete,
}

impl Capability {
    /// Leading segment of the action-type names.
    pub fn verb(self) -> &'static str {
        match self {
            Capability::List | Capability::Retrieve => "FETCH",
            Capability::Create => "CREATE",
            Capability::Update => "UPDATE",
            Capability::Delete => "DELETE",
        }
    }

    /// HTTP method the creator calls.
    pub fn method(self) -> HttpMethod {
        match self {
            Capability::List | Capability::Retrieve => HttpMethod::Get,
            Capability::Create => HttpMethod::Post,
            Capability::Update => HttpMethod::Put,
            Capability::Delete => HttpMethod::Delete,
        }
    }

    /// Name used in schema documents and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::List => "list",
            Capability::Retrieve => "retrieve",
            Capability::Create => "create",
            Capability::Update => "update",
            Capability::Delete => "delete",
        }
    }
}

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Upper-case method name.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Method name on the axios-compatible client.
    pub fn client_method(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
        }
    }
}

/// Type of a route's lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupType {
    /// Numeric primary key
    #[default]
    Integer,
    /// Slug or other string key
    String,
}

impl LookupType {
    /// TypeScript type of the key.
    pub fn ts_type(self) -> TsType {
        match self {
            LookupType::Integer => TsType::number(),
            LookupType::String => TsType::string(),
        }
    }
}

/// A registered URL pattern bound to a CRUD-capable view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePattern {
    /// URL template with named parameters: `/api/recipes/{id}/` or `api/recipes/<int:pk>/`
    pub pattern: String,
    /// Raw view type name, e.g. `RecipeDetailView`
    pub view: String,
    /// CRUD abilities of the view
    pub capabilities: BTreeSet<Capability>,
    /// Serializer bound to the view
    pub serializer: String,
    /// Model field used to look entities up
    #[serde(default = "default_lookup_field")]
    pub lookup_field: String,
    /// Path parameter carrying the lookup value (defaults to `lookup_field`)
    #[serde(default)]
    pub lookup_url_kwarg: Option<String>,
    /// Type of the lookup value
    #[serde(default)]
    pub lookup_type: LookupType,
}

fn default_lookup_field() -> String {
    "id".to_string()
}

impl RoutePattern {
    /// Path parameter carrying the lookup value.
    pub fn lookup_param(&self) -> &str {
        self.lookup_url_kwarg.as_deref().unwrap_or(&self.lookup_field)
    }
}

/// URL template part
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum UrlPart {
    /// Static string
    Static(String),
    /// Interpolated creator argument
    Param(String),
    /// Interpolated field of the `item` argument (delete)
    ItemField(String),
}

/// Path parameter of a route, exposed as an action-creator argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathParam {
    /// TypeScript-safe identifier
    pub name: String,
    /// Name in the URL pattern
    pub original_name: String,
    /// Lookup type for the lookup parameter, `string` otherwise
    pub ty: TsType,
}

/// `<CAPABILITY>_<MODEL>_<REQUEST|SUCCESS|ERROR>` names for one (capability, route).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionTypes {
    /// Dispatched before the call
    pub request: String,
    /// Dispatched with the payload after the call
    pub success: String,
    /// Reserved for failed calls
    pub error: String,
}

impl ActionTypes {
    /// `{prefix}_REQUEST`, `{prefix}_SUCCESS` and `{prefix}_ERROR`.
    pub fn new(prefix: &str) -> Self {
        Self {
            request: format!("{prefix}_REQUEST"),
            success: format!("{prefix}_SUCCESS"),
            error: format!("{prefix}_ERROR"),
        }
    }

    /// The three names in REQUEST, SUCCESS, ERROR order.
    pub fn all(&self) -> [&str; 3] {
        [&self.request, &self.success, &self.error]
    }
}

/// How a SUCCESS action updates the state slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReducerEffect {
    /// Merge the single payload entity into the by-key map.
    MergeOne,
    /// Merge every payload entity and rebuild the id list from response order.
    MergeAllRebuildList,
}

/// Reducer case handling one SUCCESS action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReducerFragment {
    /// SUCCESS action type handled
    pub action_type: String,
    /// Update applied to the slice
    pub effect: ReducerEffect,
    /// State key of the by-key map
    pub by_key: String,
    /// State key of the id list
    pub list: String,
    /// Entity field used as the map key
    pub lookup_field: String,
}

/// Async action creator for one (capability, route).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionCreatorIR {
    /// e.g. `fetchRecipe`, `fetchRecipes`
    pub name: String,
    /// One-line description for the JSDoc comment
    pub doc: String,
    /// HTTP method called
    pub method: HttpMethod,
    /// Request URL; the lookup is dropped for list and create
    pub url: Vec<UrlPart>,
    /// Path parameters taken as leading arguments
    pub params: Vec<PathParam>,
    /// Request body type (create/update)
    pub body: Option<TsType>,
    /// Entity argument whose fields fill the URL and which is dispatched on success (delete)
    pub item: Option<TsType>,
    /// Type of the SUCCESS payload
    pub payload: TsType,
    /// Response body type requested from the client (None when no body is read)
    pub response: Option<TsType>,
}

/// By-key map and ordered id list kept for one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSlice {
    /// Stylized model name
    pub model: String,
    /// e.g. `recipesById`
    pub by_key: String,
    /// e.g. `recipesList`
    pub list: String,
    /// Lookup type of the owning route
    pub key_type: TsType,
}

/// Everything synthesized for one (capability, route) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewAction {
    /// Capability the action implements
    pub capability: Capability,
    /// URL pattern of the route
    pub route: String,
    /// Stylized view name, e.g. `Recipe` for `RecipeDetailView` or `Recipes` for `RecipeListView`
    pub view_name: String,
    /// Stylized model name
    pub model: String,
    /// camelCase alias of the model, e.g. `recipe`
    pub model_alias: String,
    /// REQUEST / SUCCESS / ERROR names
    pub action_types: ActionTypes,
    /// Async creator
    pub creator: ActionCreatorIR,
    /// Reducer case for the SUCCESS action
    pub reducer: ReducerFragment,
    /// Slice the reducer case updates
    pub state: StateSlice,
}
