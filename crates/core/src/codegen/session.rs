//! One generation run, threaded explicitly through every stage.
//!
//! The session owns the IR under construction; nothing is kept in globals and
//! nothing survives the run except the rendered artifact.

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::error::Result;

use super::artifact::GeneratedArtifact;
use super::ir::model::ModelDefinition;
use super::ir::models::{ModelCatalog, build_model};
use super::ir::routes::{RouteOutput, process_routes};
use super::reflect::{RouteRegistry, SchemaReflector};

/// State of one generation run: the selected serializers and the IR built so far.
pub struct GenerationSession<'a> {
    reflector: &'a dyn SchemaReflector,
    registry: &'a dyn RouteRegistry,
    config: &'a GeneratorConfig,
    catalog: ModelCatalog,
    models: Vec<ModelDefinition>,
    routes: RouteOutput,
}

impl std::fmt::Debug for GenerationSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationSession")
            .field("catalog", &self.catalog)
            .field("models", &self.models.len())
            .field("actions", &self.routes.actions.len())
            .finish_non_exhaustive()
    }
}

impl<'a> GenerationSession<'a> {
    /// Start a session; selects and names the serializers to generate.
    pub fn new(
        reflector: &'a dyn SchemaReflector,
        registry: &'a dyn RouteRegistry,
        config: &'a GeneratorConfig,
    ) -> Result<Self> {
        let catalog = ModelCatalog::new(
            reflector.serializers(),
            &config.models.include,
            &config.naming.strip_suffixes,
        )?;

        debug!(serializers = catalog.len(), "Started generation session.");

        Ok(Self {
            reflector,
            registry,
            config,
            catalog,
            models: Vec::new(),
            routes: RouteOutput::default(),
        })
    }

    /// Build a model definition for every selected serializer, in registration order.
    pub fn reflect_models(&mut self) -> Result<()> {
        self.models = self
            .catalog
            .serializers()
            .map(|serializer| build_model(self.reflector, &self.catalog, serializer))
            .collect::<Result<_>>()?;
        Ok(())
    }

    /// Turn the registered routes into view actions and state slices.
    pub fn process_routes(&mut self) -> Result<()> {
        self.routes = process_routes(&self.registry.routes(), &self.catalog)?;
        Ok(())
    }

    /// Close the session and hand over the artifact.
    pub fn finish(self) -> GeneratedArtifact {
        debug!(
            models = self.models.len(),
            actions = self.routes.actions.len(),
            state_slices = self.routes.state.len(),
            "Finished generation session."
        );

        GeneratedArtifact {
            runtime: self.config.runtime.clone(),
            models: self.models,
            actions: self.routes.actions,
            state: self.routes.state,
        }
    }

    /// Run every stage and return the artifact.
    pub fn run(
        reflector: &'a dyn SchemaReflector,
        registry: &'a dyn RouteRegistry,
        config: &'a GeneratorConfig,
    ) -> Result<GeneratedArtifact> {
        let mut session = Self::new(reflector, registry, config)?;
        session.reflect_models()?;
        session.process_routes()?;
        Ok(session.finish())
    }
}
