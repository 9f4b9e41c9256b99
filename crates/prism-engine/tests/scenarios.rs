//! End-to-end scenarios through the orchestrator.

use async_trait::async_trait;
use prism_codegen::backend::CssBackend;
use prism_codegen::{
    CodegenError, GeneratedComponent, NoTemplates, PlatformAdapter, Recommendations,
    StandardAdapter,
};
use prism_core::{ComponentSpec, PlatformId, TokenSchema};
use prism_engine::{ArtifactKind, EngineConfig, Orchestrator, TransformOptions, TransformationResult};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn button_schema(spacing_md: &str) -> TokenSchema {
    serde_json::from_value(json!({
        "id": "acme",
        "tokens": {
            "primitive": {
                "spacing": {"md": spacing_md},
                "colors": {"blue": {"500": "#3b82f6"}}
            },
            "semantic": {
                "spacing": {"section": {"ref": "md"}},
                "colors": {"primary": "{colors.blue.500}"}
            }
        },
        "components": {
            "Button": {
                "name": "Button",
                "category": "interactive",
                "props": {
                    "size": {"type": "custom", "custom": "size"}
                },
                "accessibility": {"role": "button"}
            }
        }
    }))
    .unwrap()
}

/// Test adapter registered under its own id that counts invocations.
struct CountingAdapter {
    id: PlatformId,
    inner: StandardAdapter<CssBackend>,
    calls: AtomicUsize,
    delay: Duration,
    fail: bool,
}

impl CountingAdapter {
    fn new(id: &str) -> Self {
        Self {
            id: PlatformId::new(id),
            inner: StandardAdapter::new(CssBackend, Arc::new(NoTemplates)),
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            fail: false,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlatformAdapter for CountingAdapter {
    fn platform(&self) -> PlatformId {
        self.id.clone()
    }

    async fn transform(
        &self,
        schema: &TokenSchema,
        options: &TransformOptions,
    ) -> prism_codegen::Result<TransformationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(CodegenError::template_render("gtk4/interactive/button.hbs", "boom"));
        }
        let mut result = self.inner.transform(schema, options).await?;
        result.platform = self.id.clone();
        Ok(result)
    }

    async fn generate_component(
        &self,
        spec: &ComponentSpec,
        options: &TransformOptions,
    ) -> prism_codegen::Result<GeneratedComponent> {
        self.inner.generate_component(spec, options).await
    }

    fn ai_recommendations(&self) -> Recommendations {
        self.inner.ai_recommendations()
    }
}

fn engine(capacity: usize) -> Orchestrator {
    Orchestrator::from_config(&EngineConfig {
        cache_capacity: capacity,
        ..Default::default()
    })
}

#[tokio::test]
async fn swift_fallback_for_button_with_spacing_tokens() {
    let engine = engine(16);
    let result = engine.transform(&button_schema("1rem"), "ios-swift").await.unwrap();

    assert!(result.is_complete());
    assert!(result.components["Button"].contains("size"));
    let tokens = result.files.of_kind(ArtifactKind::Tokens).next().unwrap();
    assert!(tokens.content.contains("spacingMd"));
    assert!(tokens.content.contains("spacingSection"));

    let css = engine.transform(&button_schema("1rem"), "css").await.unwrap();
    assert!(css.tokens["tokens.css"].contains("  --spacing-md: 1rem;"));
    assert!(css.tokens["tokens.css"].contains("  --spacing-section: var(--spacing-md);"));
}

#[tokio::test]
async fn unknown_platform_is_rejected_without_caching() {
    let engine = engine(16);
    let err = engine.transform(&button_schema("1rem"), "gtk4").await.unwrap_err();
    assert!(err.is_unknown_platform());
    assert!(err.to_string().starts_with("Unknown platform 'gtk4'"));
    assert!(engine.cache().is_empty());
    assert_eq!(engine.cache_stats().misses, 0);
}

#[tokio::test]
async fn cache_is_idempotent_and_content_addressed() {
    let engine = engine(16);
    let first = engine.transform(&button_schema("1rem"), "react").await.unwrap();
    let again = engine.transform(&button_schema("1rem"), "react").await.unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    let changed = engine.transform(&button_schema("1.25rem"), "react").await.unwrap();
    assert!(!Arc::ptr_eq(&first, &changed));
    assert_ne!(first.tokens, changed.tokens);
    assert_eq!(engine.cache().len(), 2);
}

#[tokio::test]
async fn every_builtin_platform_transforms_the_schema() {
    let engine = engine(16);
    for platform in engine.registry().platforms() {
        let result = engine
            .transform(&button_schema("1rem"), platform.as_str())
            .await
            .unwrap();
        assert!(result.is_complete(), "{}", platform);
        assert!(!result.theme.is_empty(), "{}", platform);
        assert!(result.components["Button"].contains("size"), "{}", platform);
    }
}

#[tokio::test]
async fn registering_an_adapter_makes_its_platform_available() {
    let engine = engine(16);
    let react_before = engine.transform(&button_schema("1rem"), "react").await.unwrap();

    let gtk = Arc::new(CountingAdapter::new("gtk4"));
    engine.register(gtk.clone());
    let result = engine.transform(&button_schema("1rem"), "gtk4").await.unwrap();
    assert_eq!(result.platform.as_str(), "gtk4");
    assert_eq!(gtk.calls(), 1);

    let react_after = engine.transform(&button_schema("1rem"), "react").await.unwrap();
    assert!(Arc::ptr_eq(&react_before, &react_after));
}

#[tokio::test]
async fn concurrent_identical_requests_run_once() {
    let engine = engine(16);
    let gtk = Arc::new(CountingAdapter {
        delay: Duration::from_millis(25),
        ..CountingAdapter::new("gtk4")
    });
    engine.register(gtk.clone());

    let schema = button_schema("1rem");
    let requests = (0..8).map(|_| engine.transform(&schema, "gtk4"));
    let results = futures::future::join_all(requests).await;

    assert_eq!(gtk.calls(), 1);
    let first = results[0].as_ref().unwrap();
    for result in &results {
        assert!(Arc::ptr_eq(result.as_ref().unwrap(), first));
    }
}

#[tokio::test]
async fn failed_transformations_are_not_cached() {
    let engine = engine(16);
    let gtk = Arc::new(CountingAdapter {
        fail: true,
        ..CountingAdapter::new("gtk4")
    });
    engine.register(gtk.clone());

    assert!(engine.transform(&button_schema("1rem"), "gtk4").await.is_err());
    assert!(engine.transform(&button_schema("1rem"), "gtk4").await.is_err());
    assert_eq!(gtk.calls(), 2);
    assert!(engine.cache().is_empty());
}

#[tokio::test]
async fn lru_evicts_beyond_capacity() {
    let engine = engine(2);
    for platform in ["react", "vue", "svelte"] {
        engine.transform(&button_schema("1rem"), platform).await.unwrap();
    }
    let stats = engine.cache_stats();
    assert_eq!(stats.size, 2);
    assert_eq!(stats.evictions, 1);
}

#[tokio::test]
async fn invalidation_forces_recomputation() {
    let engine = engine(16);
    let gtk = Arc::new(CountingAdapter::new("gtk4"));
    engine.register(gtk.clone());

    engine.transform(&button_schema("1rem"), "gtk4").await.unwrap();
    assert_eq!(engine.invalidate_schema("acme"), 1);
    engine.transform(&button_schema("1rem"), "gtk4").await.unwrap();
    assert_eq!(gtk.calls(), 2);
}

#[tokio::test]
async fn templates_on_disk_override_fallbacks() {
    let dir = tempfile::tempdir().unwrap();
    let template_dir = dir.path().join("vue/interactive");
    std::fs::create_dir_all(&template_dir).unwrap();
    std::fs::write(
        template_dir.join("button.hbs"),
        "<template><button>{{pascal_name}} {{#each props}}{{ident}} {{/each}}</button></template>\n",
    )
    .unwrap();

    let engine = Orchestrator::from_config(&EngineConfig {
        template_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    });
    let result = engine.transform(&button_schema("1rem"), "vue").await.unwrap();
    assert_eq!(
        result.components["Button"],
        "<template><button>Button size </button></template>\n"
    );
}

#[tokio::test]
async fn broken_template_reports_a_component_failure() {
    let dir = tempfile::tempdir().unwrap();
    let template_dir = dir.path().join("angular/standalone/interactive");
    std::fs::create_dir_all(&template_dir).unwrap();
    std::fs::write(template_dir.join("button.hbs"), "{{#if props}}unterminated").unwrap();

    let engine = Orchestrator::from_config(&EngineConfig {
        template_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    });
    let result = engine.transform(&button_schema("1rem"), "angular").await.unwrap();
    let failure = result.failure("Button").unwrap();
    assert_eq!(failure.kind, "template_render");
    assert!(result.components.is_empty());
}
