//! Platform id → adapter lookup.

use crate::adapter::{PlatformAdapter, StandardAdapter};
use crate::backend::{
    AngularBackend, ComposeBackend, CssBackend, FlutterBackend, ReactBackend, SvelteBackend,
    SwiftUIBackend, TailwindBackend, VueBackend,
};
use crate::error::{CodegenError, Result};
use crate::source::TemplateSource;
use indexmap::IndexMap;
use prism_core::PlatformId;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Registered adapters keyed by normalised platform id.
///
/// Lookups are case-insensitive because [`PlatformId`] lowercases on
/// construction. Registration at runtime replaces any adapter already
/// registered under the same id.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: RwLock<IndexMap<PlatformId, Arc<dyn PlatformAdapter>>>,
}

impl AdapterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in platform, all reading templates
    /// from `source`.
    pub fn with_builtins(source: Arc<dyn TemplateSource>) -> Self {
        let registry = Self::new();
        registry.register(Arc::new(StandardAdapter::new(ReactBackend, source.clone())));
        registry.register(Arc::new(StandardAdapter::new(VueBackend, source.clone())));
        registry.register(Arc::new(StandardAdapter::new(AngularBackend, source.clone())));
        registry.register(Arc::new(StandardAdapter::new(SvelteBackend, source.clone())));
        registry.register(Arc::new(StandardAdapter::new(FlutterBackend, source.clone())));
        registry.register(Arc::new(StandardAdapter::new(SwiftUIBackend, source.clone())));
        registry.register(Arc::new(StandardAdapter::new(ComposeBackend, source.clone())));
        registry.register(Arc::new(StandardAdapter::new(CssBackend, source.clone())));
        registry.register(Arc::new(StandardAdapter::new(TailwindBackend, source)));
        registry
    }

    /// Register an adapter under its own platform id. Returns the adapter it
    /// replaced, if any.
    pub fn register(&self, adapter: Arc<dyn PlatformAdapter>) -> Option<Arc<dyn PlatformAdapter>> {
        let id = adapter.platform();
        debug!(platform = %id, "registering adapter");
        let mut adapters = self.adapters.write().unwrap_or_else(|e| e.into_inner());
        adapters.insert(id, adapter)
    }

    /// Find the adapter for `platform`.
    pub fn resolve(&self, platform: &str) -> Result<Arc<dyn PlatformAdapter>> {
        let id = PlatformId::new(platform);
        let adapters = self.adapters.read().unwrap_or_else(|e| e.into_inner());
        adapters.get(&id).cloned().ok_or_else(|| CodegenError::UnknownPlatform {
            platform: platform.to_string(),
            registered: adapters.keys().map(|k| k.to_string()).collect(),
        })
    }

    pub fn contains(&self, platform: &str) -> bool {
        let adapters = self.adapters.read().unwrap_or_else(|e| e.into_inner());
        adapters.contains_key(&PlatformId::new(platform))
    }

    /// Registered ids in registration order.
    pub fn platforms(&self) -> Vec<PlatformId> {
        let adapters = self.adapters.read().unwrap_or_else(|e| e.into_inner());
        adapters.keys().cloned().collect()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("platforms", &self.platforms())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::GeneratedComponent;
    use crate::recommendations::Recommendations;
    use crate::result::{TransformOptions, TransformationResult};
    use crate::source::NoTemplates;
    use async_trait::async_trait;
    use prism_core::{BuiltinPlatform, ComponentSpec, TokenSchema};

    struct Gtk4Adapter;

    #[async_trait]
    impl PlatformAdapter for Gtk4Adapter {
        fn platform(&self) -> PlatformId {
            PlatformId::new("gtk4")
        }

        async fn transform(
            &self,
            _schema: &TokenSchema,
            _options: &TransformOptions,
        ) -> Result<TransformationResult> {
            unimplemented!()
        }

        async fn generate_component(
            &self,
            _spec: &ComponentSpec,
            _options: &TransformOptions,
        ) -> Result<GeneratedComponent> {
            unimplemented!()
        }

        fn ai_recommendations(&self) -> Recommendations {
            Recommendations::new("gtk4")
        }
    }

    #[test]
    fn test_builtins_registered_in_order() {
        let registry = AdapterRegistry::with_builtins(Arc::new(NoTemplates));
        let expected: Vec<PlatformId> = BuiltinPlatform::ALL.into_iter().map(Into::into).collect();
        assert_eq!(registry.platforms(), expected);
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = AdapterRegistry::with_builtins(Arc::new(NoTemplates));
        let adapter = registry.resolve("iOS-Swift").unwrap();
        assert_eq!(adapter.platform().as_str(), "ios-swift");
        assert!(registry.contains(" REACT "));
    }

    #[test]
    fn test_unknown_platform() {
        let registry = AdapterRegistry::with_builtins(Arc::new(NoTemplates));
        let err = registry.resolve("gtk4").err().unwrap();
        assert_eq!(err.kind(), "unknown_platform");
        assert!(err.to_string().contains("react, vue, angular"));
    }

    #[test]
    fn test_runtime_registration() {
        let registry = AdapterRegistry::with_builtins(Arc::new(NoTemplates));
        assert!(registry.register(Arc::new(Gtk4Adapter)).is_none());
        assert!(registry.contains("gtk4"));
        assert_eq!(registry.platforms().len(), BuiltinPlatform::ALL.len() + 1);
        assert_eq!(registry.resolve("react").unwrap().platform().as_str(), "react");
    }
}
