//! Entry point: resolve an adapter, consult the cache, transform.

use crate::cache::{CacheKey, CacheStats, TransformCache};
use crate::config::EngineConfig;
use crate::error::Result;
use prism_codegen::{
    AdapterRegistry, FsTemplateSource, GeneratedComponent, NoTemplates, PlatformAdapter,
    TemplateSource, TransformOptions, TransformationResult,
};
use prism_core::{ComponentSpec, TokenSchema};
use std::sync::Arc;
use tracing::{info, instrument};

/// Produces [`TransformationResult`]s for (schema, platform, options)
/// triples, computing each at most once while it stays cached.
pub struct Orchestrator {
    registry: AdapterRegistry,
    cache: TransformCache,
    default_options: TransformOptions,
}

impl Orchestrator {
    pub fn new(registry: AdapterRegistry, cache_capacity: usize) -> Self {
        Self {
            registry,
            cache: TransformCache::new(cache_capacity),
            default_options: TransformOptions::default(),
        }
    }

    /// Built-in adapters reading templates from the configured directory.
    pub fn from_config(config: &EngineConfig) -> Self {
        let source: Arc<dyn TemplateSource> = match &config.template_dir {
            Some(dir) => Arc::new(FsTemplateSource::new(dir)),
            None => Arc::new(NoTemplates),
        };
        Self::new(AdapterRegistry::with_builtins(source), config.cache_capacity)
            .with_default_options(config.default_options.clone())
    }

    pub fn with_default_options(mut self, options: TransformOptions) -> Self {
        self.default_options = options;
        self
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Register an adapter at runtime.
    pub fn register(&self, adapter: Arc<dyn PlatformAdapter>) {
        if let Some(previous) = self.registry.register(adapter) {
            info!(platform = %previous.platform(), "replaced adapter");
        }
    }

    /// Transform `schema` for `platform` with the default options.
    pub async fn transform(&self, schema: &TokenSchema, platform: &str) -> Result<Arc<TransformationResult>> {
        let options = self.default_options.clone();
        self.transform_to_target(schema, platform, &options).await
    }

    /// Transform `schema` for `platform`.
    ///
    /// An unknown platform fails before the cache is consulted. Identical
    /// concurrent requests share one computation and the same `Arc`.
    #[instrument(skip(self, schema, options), fields(schema = %schema.id))]
    pub async fn transform_to_target(
        &self,
        schema: &TokenSchema,
        platform: &str,
        options: &TransformOptions,
    ) -> Result<Arc<TransformationResult>> {
        let adapter = self.registry.resolve(platform)?;
        let key = CacheKey::new(schema, &adapter.platform(), options)?;
        let result = self
            .cache
            .get_or_compute(key, || async {
                info!(platform = %adapter.platform(), "transforming schema");
                Ok(adapter.transform(schema, options).await?)
            })
            .await?;
        if !result.failures.is_empty() {
            info!(
                failures = result.failures.len(),
                components = result.components.len(),
                "transformation finished with component failures"
            );
        }
        Ok(result)
    }

    /// Generate one component without caching.
    #[instrument(skip(self, spec, options), fields(component = %spec.name))]
    pub async fn generate_component(
        &self,
        spec: &ComponentSpec,
        platform: &str,
        options: &TransformOptions,
    ) -> Result<GeneratedComponent> {
        let adapter = self.registry.resolve(platform)?;
        Ok(adapter.generate_component(spec, options).await?)
    }

    /// Forget every cached result for `schema_id`.
    pub fn invalidate_schema(&self, schema_id: &str) -> usize {
        let removed = self.cache.invalidate_schema(schema_id);
        info!(schema = schema_id, removed, "invalidated cached results");
        removed
    }

    pub fn cache(&self) -> &TransformCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("registry", &self.registry)
            .field("cache", &self.cache)
            .finish()
    }
}
