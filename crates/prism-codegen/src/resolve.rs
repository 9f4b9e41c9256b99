//! Template resolution with fallback to the built-in generators.
//!
//! Resolution checks a short, ordered list of candidate paths with
//! [`TemplateSource::exists`]. The first hit is read and rendered; if nothing
//! exists the backend's built-in generator runs instead. A template that
//! exists but fails to compile or render is an error and never falls back.

use crate::backend::PlatformBackend;
use crate::context::ComponentContext;
use crate::error::{CodegenError, Result};
use crate::source::TemplateSource;
use crate::templates::TemplateEngine;
use tracing::debug;

/// Where a component's code came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeOrigin {
    Template(String),
    Fallback,
}

/// Rendered component code plus its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCode {
    pub code: String,
    pub origin: CodeOrigin,
}

/// Locates and renders component templates for one backend.
pub struct TemplateResolver<'a> {
    backend: &'a dyn PlatformBackend,
    source: &'a dyn TemplateSource,
    engine: &'a TemplateEngine,
}

impl<'a> TemplateResolver<'a> {
    pub fn new(
        backend: &'a dyn PlatformBackend,
        source: &'a dyn TemplateSource,
        engine: &'a TemplateEngine,
    ) -> Self {
        Self {
            backend,
            source,
            engine,
        }
    }

    /// Candidate template paths, most specific first.
    ///
    /// Platforms with routing conventions try the requested convention (or
    /// their first one) before the plain `{platform}/{category}` path.
    pub fn candidates(&self, ctx: &ComponentContext) -> Vec<String> {
        let platform = self.backend.id();
        let file = format!("{}/{}.hbs", ctx.category, ctx.kebab_name);
        let mut paths = Vec::with_capacity(2);

        let conventions = self.backend.routing_conventions();
        let convention = ctx
            .platform
            .convention
            .as_deref()
            .filter(|c| conventions.contains(c))
            .or_else(|| conventions.first().copied());
        if let Some(convention) = convention {
            paths.push(format!("{}/{}/{}", platform, convention, file));
        }
        paths.push(format!("{}/{}", platform, file));
        paths
    }

    /// Render the first existing template, or run the built-in generator.
    pub async fn resolve(&self, ctx: &ComponentContext) -> Result<ResolvedCode> {
        for path in self.candidates(ctx) {
            if !self.source.exists(&path).await {
                continue;
            }
            let template = self
                .source
                .read(&path)
                .await
                .map_err(|source| CodegenError::TemplateSource {
                    path: path.clone(),
                    source,
                })?;
            let code = self.engine.render_template(&path, &template, ctx)?;
            debug!(component = %ctx.name, template = %path, "rendered template");
            return Ok(ResolvedCode {
                code,
                origin: CodeOrigin::Template(path),
            });
        }

        debug!(component = %ctx.name, platform = %self.backend.id(), "no template, using fallback");
        Ok(ResolvedCode {
            code: self.backend.fallback_component(ctx),
            origin: CodeOrigin::Fallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::tests::{button_spec, context_for};
    use crate::backend::{ReactBackend, SwiftUIBackend};
    use crate::source::{MemoryTemplateSource, NoTemplates};

    #[test]
    fn test_candidates_try_convention_first() {
        let engine = TemplateEngine::new();
        let resolver = TemplateResolver::new(&ReactBackend, &NoTemplates, &engine);
        let ctx = context_for(&ReactBackend, &button_spec());
        assert_eq!(
            resolver.candidates(&ctx),
            vec![
                "react/app-router/interactive/button.hbs",
                "react/interactive/button.hbs"
            ]
        );

        let mut ctx = ctx;
        ctx.platform.convention = Some("pages-router".into());
        assert_eq!(
            resolver.candidates(&ctx)[0],
            "react/pages-router/interactive/button.hbs"
        );
    }

    #[test]
    fn test_candidates_without_conventions() {
        let engine = TemplateEngine::new();
        let resolver = TemplateResolver::new(&SwiftUIBackend, &NoTemplates, &engine);
        let ctx = context_for(&SwiftUIBackend, &button_spec());
        assert_eq!(resolver.candidates(&ctx), vec!["ios-swift/interactive/button.hbs"]);
    }

    #[tokio::test]
    async fn test_template_wins_over_fallback() {
        let source = MemoryTemplateSource::new().with(
            "react/interactive/button.hbs",
            "export const {{pascal_name}} = '{{kebab_case name}}';",
        );
        let engine = TemplateEngine::new();
        let resolver = TemplateResolver::new(&ReactBackend, &source, &engine);
        let ctx = context_for(&ReactBackend, &button_spec());

        let resolved = resolver.resolve(&ctx).await.unwrap();
        assert_eq!(resolved.code, "export const Button = 'button';");
        assert_eq!(
            resolved.origin,
            CodeOrigin::Template("react/interactive/button.hbs".into())
        );
    }

    #[tokio::test]
    async fn test_missing_template_falls_back() {
        let engine = TemplateEngine::new();
        let resolver = TemplateResolver::new(&SwiftUIBackend, &NoTemplates, &engine);
        let ctx = context_for(&SwiftUIBackend, &button_spec());

        let resolved = resolver.resolve(&ctx).await.unwrap();
        assert_eq!(resolved.origin, CodeOrigin::Fallback);
        assert!(resolved.code.contains("size"));
    }

    #[tokio::test]
    async fn test_broken_template_is_an_error() {
        let source =
            MemoryTemplateSource::new().with("react/interactive/button.hbs", "{{#if props}}oops");
        let engine = TemplateEngine::new();
        let resolver = TemplateResolver::new(&ReactBackend, &source, &engine);
        let ctx = context_for(&ReactBackend, &button_spec());

        let err = resolver.resolve(&ctx).await.unwrap_err();
        assert!(matches!(
            err,
            CodegenError::TemplateRender { ref path, .. } if path == "react/interactive/button.hbs"
        ));
    }
}
