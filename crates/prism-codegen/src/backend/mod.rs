//! Per-platform generation strategies.
//!
//! A [`PlatformBackend`] bundles everything platform-specific: the type table,
//! the built-in component generator used when no template exists, token and
//! theme emission, the artifact layout and static recommendations. The generic
//! [`StandardAdapter`](crate::adapter::StandardAdapter) drives any backend.

mod angular;
mod compose;
mod css;
mod flutter;
mod react;
mod svelte;
mod swiftui;
mod tailwind;
mod vue;
pub(crate) mod web;

pub use angular::AngularBackend;
pub use compose::ComposeBackend;
pub use css::CssBackend;
pub use flutter::FlutterBackend;
pub use react::ReactBackend;
pub use svelte::SvelteBackend;
pub use swiftui::SwiftUIBackend;
pub use tailwind::TailwindBackend;
pub use vue::VueBackend;

use crate::context::{ComponentContext, PropContext};
use crate::recommendations::Recommendations;
use crate::typemap::TypeMapper;
use convert_case::{Case, Casing};
use prism_core::{FlatTokens, PlatformFamily, PlatformId, SchemaError};
use std::collections::HashMap;

/// A generated file with its destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: String,
    pub content: String,
}

impl Artifact {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Platform-specific generation strategy.
pub trait PlatformBackend: Send + Sync {
    fn id(&self) -> PlatformId;

    fn family(&self) -> PlatformFamily;

    fn type_mapper(&self) -> &dyn TypeMapper;

    /// Routing conventions tried before the plain template path, in order.
    fn routing_conventions(&self) -> &'static [&'static str] {
        &[]
    }

    /// Destination of the component source file.
    fn component_path(&self, ctx: &ComponentContext) -> String;

    /// Built-in component generator used when no template exists.
    fn fallback_component(&self, ctx: &ComponentContext) -> String;

    /// Token files for the flattened token list.
    fn emit_tokens(&self, tokens: &FlatTokens) -> Vec<Artifact>;

    /// Theme bootstrap code.
    fn theme(&self, tokens: &FlatTokens) -> Artifact;

    /// Helper files shared by generated components.
    fn utils(&self) -> Vec<Artifact>;

    /// Short snippet showing how to use the component.
    fn usage_example(&self, ctx: &ComponentContext) -> String;

    fn types(&self, _ctx: &ComponentContext) -> Option<Artifact> {
        None
    }

    fn styles(&self, _ctx: &ComponentContext) -> Option<Artifact> {
        None
    }

    fn test(&self, _ctx: &ComponentContext) -> Option<Artifact> {
        None
    }

    fn story(&self, _ctx: &ComponentContext) -> Option<Artifact> {
        None
    }

    fn locale_path(&self, locale: &str, ctx: &ComponentContext) -> String {
        format!("locales/{}/{}.json", locale, ctx.kebab_name)
    }

    fn recommendations(&self) -> Recommendations;

    /// Symbol a flattened token is emitted under. Distinct tokens must get
    /// distinct symbols.
    fn token_symbol(&self, name: &str) -> String {
        web::custom_property(name)
    }
}

/// camelCase constant name for a flattened token (`colors-blue-500` →
/// `colorsBlue500`). Characters that cannot appear in an identifier split a
/// segment into `_`-joined parts, so `spacing-0.5` becomes `spacing0_5`.
pub(crate) fn token_ident(name: &str) -> String {
    let mut ident = String::new();
    for segment in name.split(['-', '_']).filter(|s| !s.is_empty()) {
        let parts: Vec<String> = segment
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|p| !p.is_empty())
            .map(|p| {
                if ident.is_empty() {
                    p.to_case(Case::Camel)
                } else {
                    p.to_case(Case::Pascal)
                }
            })
            .collect();
        ident.push_str(&parts.join("_"));
    }
    match ident.chars().next() {
        None => "token".to_string(),
        Some(c) if c.is_ascii_digit() => format!("t{}", ident),
        Some(_) => ident,
    }
}

/// Fail when two tokens would be emitted under the same symbol.
pub(crate) fn check_token_symbols(
    backend: &dyn PlatformBackend,
    tokens: &FlatTokens,
) -> Result<(), SchemaError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for token in tokens.iter() {
        let symbol = backend.token_symbol(&token.name);
        if let Some(first) = seen.get(&symbol) {
            return Err(SchemaError::DuplicateTokenName {
                name: symbol,
                first: first.to_string(),
                second: token.name.clone(),
            });
        }
        seen.insert(symbol, &token.name);
    }
    Ok(())
}

/// The callback fired when the component is activated (tap, click or press).
pub(crate) fn activation_callback(ctx: &ComponentContext) -> Option<&PropContext> {
    ctx.props.iter().find(|p| {
        p.is_callback
            && matches!(
                p.ident.strip_prefix("on").unwrap_or(&p.ident).to_lowercase().as_str(),
                "press" | "click" | "tap" | "activate"
            )
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::context::PlatformFlags;
    use crate::result::TransformOptions;
    use prism_core::{
        BuiltinPlatform, ComplexType, ComponentCategory, ComponentSpec, CompoundVariant,
        CustomType, DesignTokens, PropDefinition, TypeDescriptor,
    };
    use serde_json::json;

    pub(crate) fn all_backends() -> Vec<Box<dyn PlatformBackend>> {
        vec![
            Box::new(ReactBackend),
            Box::new(VueBackend),
            Box::new(AngularBackend),
            Box::new(SvelteBackend),
            Box::new(FlutterBackend),
            Box::new(SwiftUIBackend),
            Box::new(ComposeBackend),
            Box::new(CssBackend),
            Box::new(TailwindBackend),
        ]
    }

    pub(crate) fn button_spec() -> ComponentSpec {
        let mut conditions = indexmap::IndexMap::new();
        conditions.insert("size".to_string(), json!("lg"));
        conditions.insert("variant".to_string(), json!("primary"));
        let mut spec = ComponentSpec::new("Button", ComponentCategory::Interactive)
            .with_role("button")
            .with_prop(
                "size",
                PropDefinition::new(TypeDescriptor::custom(CustomType::Size))
                    .with_default(json!("md"))
                    .describe("Control size"),
            )
            .with_prop(
                "variant",
                PropDefinition::new(TypeDescriptor::custom(CustomType::Variant))
                    .with_default(json!("primary")),
            )
            .with_prop("label", PropDefinition::new(TypeDescriptor::string()).required())
            .with_prop(
                "on_press",
                PropDefinition::new(TypeDescriptor::complex(ComplexType::Function)),
            )
            .with_prop(
                "icon",
                PropDefinition::new(TypeDescriptor::complex(ComplexType::Node)),
            );
        spec.variants.compound.push(CompoundVariant {
            conditions,
            class_name: Some("button-hero".into()),
            description: None,
        });
        spec.accessibility.label = Some("Action".into());
        spec
    }

    pub(crate) fn context_for(backend: &dyn PlatformBackend, spec: &ComponentSpec) -> ComponentContext {
        ComponentContext::build(
            spec,
            backend.type_mapper(),
            PlatformFlags::new(backend.id(), backend.family(), None),
            &TransformOptions::default(),
        )
        .unwrap()
    }

    pub(crate) fn sample_tokens() -> FlatTokens {
        let tokens: DesignTokens = serde_json::from_value(json!({
            "primitive": {
                "colors": {"blue": {"500": "#3b82f6"}, "white": "#ffffff"},
                "spacing": {"sm": "0.5rem", "md": "1rem"},
                "radius": {"md": "6px"},
                "font": {"sans": ["Inter", "system-ui"]}
            },
            "semantic": {
                "colors": {"primary": "{colors.blue.500}"},
                "spacing": {"section": {"ref": "md"}}
            },
            "component": {
                "button": {"background": "{colors.primary}", "padding": "{spacing.sm}"}
            }
        }))
        .unwrap();
        FlatTokens::resolve(&tokens).unwrap()
    }

    #[test]
    fn test_every_backend_falls_back_with_prop_names() {
        let spec = button_spec();
        for backend in all_backends() {
            let ctx = context_for(backend.as_ref(), &spec).with_tokens(&sample_tokens());
            let code = backend.fallback_component(&ctx);
            assert!(!code.trim().is_empty(), "{}", backend.id());
            for prop in &ctx.props {
                assert!(
                    code.contains(&prop.ident) || code.contains(&prop.kebab),
                    "{} fallback is missing prop {}",
                    backend.id(),
                    prop.name
                );
            }
        }
    }

    #[test]
    fn test_every_backend_emits_tokens_and_theme() {
        let tokens = sample_tokens();
        for backend in all_backends() {
            let files = backend.emit_tokens(&tokens);
            assert!(!files.is_empty(), "{}", backend.id());
            let joined: String = files.iter().map(|f| f.content.as_str()).collect();
            assert!(
                joined.contains("spacing") || joined.contains("Spacing"),
                "{} tokens lost spacing",
                backend.id()
            );
            assert!(!backend.theme(&tokens).content.is_empty(), "{}", backend.id());
            assert!(!backend.utils().is_empty(), "{}", backend.id());
        }
    }

    #[test]
    fn test_every_backend_has_complete_recommendations() {
        for backend in all_backends() {
            let recs = backend.recommendations();
            assert_eq!(recs.platform, backend.id());
            assert!(recs.is_complete(), "{}", backend.id());
            assert!(!recs.components.is_empty());
        }
    }

    #[test]
    fn test_backend_ids_match_builtins() {
        let ids: Vec<_> = all_backends().iter().map(|b| b.id()).collect();
        let expected: Vec<PlatformId> = BuiltinPlatform::ALL.into_iter().map(Into::into).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_token_emission_is_deterministic() {
        for backend in all_backends() {
            let first = backend.emit_tokens(&sample_tokens());
            let second = backend.emit_tokens(&sample_tokens());
            assert_eq!(first, second, "{}", backend.id());
        }
    }

    #[test]
    fn test_token_ident_sanitises_segments() {
        assert_eq!(token_ident("colors-blue-500"), "colorsBlue500");
        assert_eq!(token_ident("spacing-0.5"), "spacing0_5");
        assert_eq!(token_ident("spacing-1/2"), "spacing1_2");
        assert_eq!(token_ident("font_size-lg"), "fontSizeLg");
        assert!(token_ident("2xl-gap").starts_with("t2"));
    }

    #[test]
    fn test_sample_tokens_have_distinct_symbols() {
        let tokens = sample_tokens();
        for backend in all_backends() {
            assert!(check_token_symbols(backend.as_ref(), &tokens).is_ok(), "{}", backend.id());
        }
    }
}
