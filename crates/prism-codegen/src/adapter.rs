//! The adapter contract and the generic adapter every built-in platform uses.

use crate::assemble::{ArtifactAssembler, ArtifactKind, FileManifest};
use crate::backend::{check_token_symbols, PlatformBackend};
use crate::context::{ComponentContext, PlatformFlags};
use crate::error::{CodegenError, Result};
use crate::recommendations::Recommendations;
use crate::resolve::{CodeOrigin, TemplateResolver};
use crate::result::{ComponentFailure, TransformOptions, TransformationResult};
use crate::source::TemplateSource;
use crate::templates::TemplateEngine;
use async_trait::async_trait;
use futures::future::join_all;
use indexmap::IndexMap;
use prism_core::{validate_component, validate_schema, ComponentSpec, FlatTokens, PlatformId, TokenSchema};
use std::sync::Arc;
use tracing::{debug, warn};

/// One generated component with its companion files.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedComponent {
    pub name: String,
    pub code: String,
    pub origin: CodeOrigin,
    /// Usage snippet for the component.
    pub example: String,
    pub files: FileManifest,
}

/// Uniform capability interface for a target platform.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn platform(&self) -> PlatformId;

    /// Transform a whole schema.
    ///
    /// Schema-level token errors fail the call. Component-level problems are
    /// collected into [`TransformationResult::failures`].
    async fn transform(
        &self,
        schema: &TokenSchema,
        options: &TransformOptions,
    ) -> Result<TransformationResult>;

    /// Generate one component and its file manifest.
    async fn generate_component(
        &self,
        spec: &ComponentSpec,
        options: &TransformOptions,
    ) -> Result<GeneratedComponent>;

    /// Source code for a single component.
    async fn generate_component_code(
        &self,
        spec: &ComponentSpec,
        options: &TransformOptions,
    ) -> Result<String> {
        Ok(self.generate_component(spec, options).await?.code)
    }

    fn ai_recommendations(&self) -> Recommendations;
}

/// Adapter driven by a [`PlatformBackend`] strategy.
pub struct StandardAdapter<B> {
    backend: B,
    source: Arc<dyn TemplateSource>,
    engine: TemplateEngine,
}

impl<B: PlatformBackend> StandardAdapter<B> {
    pub fn new(backend: B, source: Arc<dyn TemplateSource>) -> Self {
        Self {
            backend,
            source,
            engine: TemplateEngine::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn generate(
        &self,
        spec: &ComponentSpec,
        options: &TransformOptions,
        tokens: &FlatTokens,
    ) -> Result<GeneratedComponent> {
        validate_component(spec)?;
        let platform = PlatformFlags::new(
            self.backend.id(),
            self.backend.family(),
            options.convention.clone(),
        );
        let ctx = ComponentContext::build(spec, self.backend.type_mapper(), platform, options)?
            .with_tokens(tokens);

        let resolved = TemplateResolver::new(&self.backend, self.source.as_ref(), &self.engine)
            .resolve(&ctx)
            .await?;
        let files = ArtifactAssembler::new(&self.backend, options).assemble(&ctx, &resolved.code)?;

        Ok(GeneratedComponent {
            name: spec.name.clone(),
            example: self.backend.usage_example(&ctx),
            code: resolved.code,
            origin: resolved.origin,
            files,
        })
    }
}

#[async_trait]
impl<B: PlatformBackend> PlatformAdapter for StandardAdapter<B> {
    fn platform(&self) -> PlatformId {
        self.backend.id()
    }

    async fn transform(
        &self,
        schema: &TokenSchema,
        options: &TransformOptions,
    ) -> Result<TransformationResult> {
        let validated = validate_schema(schema)?;
        check_token_symbols(&self.backend, &validated.tokens)?;
        let platform = self.platform();

        let mut skipped = Vec::new();
        let mut requested = Vec::new();
        for spec in schema.components.values() {
            if spec.supports(&platform) {
                requested.push(spec);
            } else {
                skipped.push(spec.name.clone());
            }
        }

        let outcomes = join_all(requested.iter().map(|spec| {
            let invalid = validated.invalid.iter().find(|e| e.component == spec.name);
            let tokens = &validated.tokens;
            let platform = &platform;
            async move {
                if let Some(err) = invalid {
                    warn!(component = %spec.name, platform = %platform, error = %err, "skipping invalid component");
                    return Err(CodegenError::InvalidSpecification(err.clone()));
                }
                self.generate(spec, options, tokens).await
            }
        }))
        .await;

        let mut result = TransformationResult {
            platform: platform.clone(),
            schema_id: schema.id.clone(),
            tokens: IndexMap::new(),
            components: IndexMap::new(),
            theme: String::new(),
            utils: IndexMap::new(),
            examples: IndexMap::new(),
            files: FileManifest::new(),
            failures: Vec::new(),
            skipped,
        };

        for artifact in self.backend.emit_tokens(&validated.tokens) {
            result.files.push(artifact.path.clone(), artifact.content.clone(), ArtifactKind::Tokens);
            result.tokens.insert(artifact.path, artifact.content);
        }
        let theme = self.backend.theme(&validated.tokens);
        result.files.push(theme.path, theme.content.clone(), ArtifactKind::Theme);
        result.theme = theme.content;
        for artifact in self.backend.utils() {
            result.files.push(artifact.path.clone(), artifact.content.clone(), ArtifactKind::Util);
            result.utils.insert(artifact.path, artifact.content);
        }

        for (spec, outcome) in requested.iter().zip(outcomes) {
            match outcome {
                Ok(generated) => {
                    result.files.extend(generated.files);
                    result.examples.insert(generated.name.clone(), generated.example);
                    result.components.insert(generated.name, generated.code);
                }
                Err(err) => {
                    if !matches!(err, CodegenError::InvalidSpecification(_)) {
                        warn!(component = %spec.name, platform = %platform, error = %err, "component generation failed");
                    }
                    result.failures.push(ComponentFailure::new(spec.name.clone(), &err));
                }
            }
        }

        debug!(
            platform = %platform,
            schema = %schema.id,
            components = result.components.len(),
            failures = result.failures.len(),
            skipped = result.skipped.len(),
            "transformed schema"
        );
        Ok(result)
    }

    async fn generate_component(
        &self,
        spec: &ComponentSpec,
        options: &TransformOptions,
    ) -> Result<GeneratedComponent> {
        self.generate(spec, options, &FlatTokens::default()).await
    }

    fn ai_recommendations(&self) -> Recommendations {
        self.backend.recommendations()
    }
}
