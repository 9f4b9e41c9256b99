//! Data context handed to templates and built-in generators.
//!
//! Everything a generator needs about one component on one platform: names in
//! each case convention, mapped prop types, auxiliary type declarations,
//! variants, accessibility flags, feature flags and platform flags.

use crate::error::UnmappableTypeError;
use crate::result::TransformOptions;
use crate::typemap::{TypeMapper, TypeScope};
use convert_case::{Case, Casing};
use indexmap::IndexMap;
use prism_core::{
    value_label, ComponentSpec, FlatTokens, KeyboardInteraction, PlatformFamily, PlatformId,
    TokenLayer, SEPARATOR,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Roles that take keyboard focus without an explicit interaction list.
const FOCUSABLE_ROLES: &[&str] = &[
    "button", "link", "checkbox", "radio", "switch", "tab", "menuitem", "option", "slider",
    "spinbutton", "textbox", "combobox", "searchbox",
];

const LIVE_ROLES: &[&str] = &["alert", "status", "log", "marquee", "timer", "progressbar"];

#[derive(Debug, Clone, Serialize)]
pub struct ComponentContext {
    pub name: String,
    pub pascal_name: String,
    pub camel_name: String,
    pub kebab_name: String,
    pub snake_name: String,
    pub category: String,
    pub description: Option<String>,
    pub props: Vec<PropContext>,
    pub declarations: Vec<DeclarationContext>,
    /// All declarations joined, for templates that emit them verbatim.
    pub declarations_source: String,
    pub variants: Vec<VariantAxis>,
    pub compounds: Vec<CompoundContext>,
    pub a11y: A11yContext,
    pub features: FeatureFlags,
    pub platform: PlatformFlags,
    pub locales: Vec<String>,
    /// Localizable source strings, key → English text.
    pub strings: IndexMap<String, String>,
    /// Component-layer tokens scoped to this component.
    pub tokens: Vec<ComponentToken>,
    pub has_props: bool,
    pub has_callbacks: bool,
    pub has_content: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropContext {
    /// Name as declared in the schema.
    pub name: String,
    /// camelCase identifier.
    pub ident: String,
    pub pascal: String,
    pub kebab: String,
    /// Mapped type.
    pub ty: String,
    /// Mapped type wrapped for optionality.
    pub optional_ty: String,
    pub required: bool,
    /// Not required and without a default.
    pub optional: bool,
    /// Default rendered as a target literal.
    pub default: Option<String>,
    pub description: Option<String>,
    pub deprecated: Option<DeprecationContext>,
    pub enum_values: Option<Vec<String>>,
    pub is_callback: bool,
    pub is_content: bool,
    /// Representative literal for examples and stories.
    pub sample: Option<String>,
}

/// A component-layer token whose first path segment names this component.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentToken {
    /// Flattened token name (`button-background`).
    pub name: String,
    /// Remaining path joined with `-` (`background`).
    pub key: String,
    pub value: String,
    /// Flattened name of the referenced token, if any.
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeprecationContext {
    pub since: String,
    pub reason: String,
    pub alternative: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeclarationContext {
    pub name: String,
    pub source: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariantAxis {
    pub name: String,
    pub ident: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompoundContext {
    /// `(prop ident, raw value label)` pairs.
    pub conditions: Vec<ConditionContext>,
    pub class_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConditionContext {
    pub prop: String,
    pub value: String,
    /// Value rendered as a literal of the prop's type.
    pub literal: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct A11yContext {
    pub role: String,
    pub label: Option<String>,
    pub keyboard: Vec<KeyboardInteraction>,
    pub announcements: Vec<String>,
    pub focusable: bool,
    pub live_region: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureFlags {
    pub typescript: bool,
    pub i18n: bool,
    pub tests: bool,
    pub stories: bool,
    pub flags: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformFlags {
    pub id: PlatformId,
    pub family: PlatformFamily,
    pub convention: Option<String>,
    pub is_web: bool,
    pub is_mobile: bool,
    pub is_native: bool,
    pub is_stylesheet: bool,
}

impl PlatformFlags {
    pub fn new(id: PlatformId, family: PlatformFamily, convention: Option<String>) -> Self {
        Self {
            id,
            family,
            convention,
            is_web: family == PlatformFamily::Web,
            is_mobile: family == PlatformFamily::Mobile,
            is_native: family == PlatformFamily::Native,
            is_stylesheet: family == PlatformFamily::Stylesheet,
        }
    }
}

impl ComponentContext {
    /// Build the context, mapping every prop type with `mapper`.
    pub fn build(
        spec: &ComponentSpec,
        mapper: &dyn TypeMapper,
        platform: PlatformFlags,
        options: &TransformOptions,
    ) -> Result<Self, UnmappableTypeError> {
        let pascal_name = spec.name.to_case(Case::Pascal);
        let mut scope = TypeScope::new();
        let mut props = Vec::with_capacity(spec.props.len());

        for (name, prop) in &spec.props {
            let pascal = name.to_case(Case::Pascal);
            let hint = format!("{}{}", pascal_name, pascal);
            let ty = mapper.map(&prop.descriptor, &hint, &mut scope)?;
            let default = prop
                .default
                .as_ref()
                .and_then(|v| mapper.literal(&prop.descriptor, v, &hint));
            let sample = prop
                .examples
                .first()
                .cloned()
                .or_else(|| prop.default.clone())
                .or_else(|| prop.descriptor.sample_value())
                .and_then(|v| mapper.literal(&prop.descriptor, &v, &hint));

            props.push(PropContext {
                ident: mapper.ident(&name.to_case(Case::Camel)),
                kebab: name.to_case(Case::Kebab),
                optional_ty: mapper.optional(&ty),
                optional: !prop.required && default.is_none(),
                required: prop.required,
                default,
                description: prop.description.clone(),
                deprecated: prop.deprecated.as_ref().map(|d| DeprecationContext {
                    since: d.since.clone(),
                    reason: d.reason.clone(),
                    alternative: d.alternative.clone(),
                }),
                enum_values: prop.descriptor.enumerated_values(),
                is_callback: prop.descriptor.is_callback(),
                is_content: prop.descriptor.is_content(),
                sample,
                ty,
                pascal,
                name: name.clone(),
            });
        }

        let compounds = spec
            .variants
            .compound
            .iter()
            .map(|compound| CompoundContext {
                conditions: compound
                    .conditions
                    .iter()
                    .map(|(prop, value)| ConditionContext {
                        prop: mapper.ident(&prop.to_case(Case::Camel)),
                        value: value_label(value),
                        literal: spec.props.get(prop).and_then(|p| {
                            let hint = format!("{}{}", pascal_name, prop.to_case(Case::Pascal));
                            mapper.literal(&p.descriptor, value, &hint)
                        }),
                    })
                    .collect(),
                class_name: compound.class_name.clone(),
                description: compound.description.clone(),
            })
            .collect();

        let role = spec.accessibility.role.clone();
        let a11y = A11yContext {
            focusable: !spec.accessibility.keyboard.is_empty()
                || FOCUSABLE_ROLES.contains(&role.as_str()),
            live_region: !spec.accessibility.announcements.is_empty()
                || LIVE_ROLES.contains(&role.as_str()),
            role,
            label: spec.accessibility.label.clone(),
            keyboard: spec.accessibility.keyboard.clone(),
            announcements: spec.accessibility.announcements.clone(),
        };

        let declarations: Vec<DeclarationContext> = scope
            .declarations()
            .map(|(name, source)| DeclarationContext {
                name: name.clone(),
                source: source.clone(),
            })
            .collect();

        Ok(Self {
            camel_name: spec.name.to_case(Case::Camel),
            kebab_name: spec.name.to_case(Case::Kebab),
            snake_name: spec.name.to_case(Case::Snake),
            category: spec.category.to_string(),
            description: spec.description.clone(),
            has_props: !props.is_empty(),
            has_callbacks: props.iter().any(|p| p.is_callback),
            has_content: props.iter().any(|p| p.is_content),
            props,
            declarations_source: scope.render(),
            declarations,
            variants: spec
                .variants
                .simple
                .iter()
                .map(|(axis, values)| VariantAxis {
                    name: axis.clone(),
                    ident: mapper.ident(&axis.to_case(Case::Camel)),
                    values: values.clone(),
                })
                .collect(),
            compounds,
            strings: localizable_strings(spec),
            tokens: Vec::new(),
            a11y,
            features: FeatureFlags {
                typescript: options.typescript,
                i18n: options.i18n(),
                tests: options.include_tests,
                stories: options.include_stories,
                flags: options.flags.clone(),
            },
            platform,
            locales: options.locales.clone(),
            name: spec.name.clone(),
            pascal_name,
        })
    }

    /// Attach the component-layer tokens that belong to this component.
    pub fn with_tokens(mut self, tokens: &FlatTokens) -> Self {
        let keys = [self.kebab_name.as_str(), self.camel_name.as_str(), self.snake_name.as_str()];
        self.tokens = tokens
            .layer(TokenLayer::Component)
            .filter(|t| t.path.len() > 1 && keys.contains(&t.path[0].as_str()))
            .map(|t| ComponentToken {
                name: t.name.clone(),
                key: t.path[1..].join(SEPARATOR),
                value: t.value.render(),
                reference: t.reference.clone(),
            })
            .collect();
        self
    }

    pub fn prop(&self, name: &str) -> Option<&PropContext> {
        self.props.iter().find(|p| p.name == name)
    }

    /// Props that are neither callbacks nor content slots.
    pub fn value_props(&self) -> impl Iterator<Item = &PropContext> {
        self.props.iter().filter(|p| !p.is_callback && !p.is_content)
    }
}

fn localizable_strings(spec: &ComponentSpec) -> IndexMap<String, String> {
    let mut strings = IndexMap::new();
    strings.insert("name".to_string(), spec.name.to_case(Case::Title));
    if let Some(description) = &spec.description {
        strings.insert("description".to_string(), description.clone());
    }
    if let Some(label) = &spec.accessibility.label {
        strings.insert("a11y.label".to_string(), label.clone());
    }
    for event in &spec.accessibility.announcements {
        strings.insert(
            format!("announce.{}", event.to_case(Case::Camel)),
            sentence(event),
        );
    }
    strings
}

/// `"submitted-ok"` → `"Submitted ok"`.
fn sentence(text: &str) -> String {
    let lower = text.to_case(Case::Lower);
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
