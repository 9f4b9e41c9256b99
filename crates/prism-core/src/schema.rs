//! The Universal Token Schema: design tokens plus component specifications.

use crate::platform::PlatformId;
use crate::tokens::TokenGroup;
use crate::types::TypeDescriptor;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Root IR unit handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSchema {
    /// Stable identifier used in cache keys.
    pub id: String,
    /// Free-form schema version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub tokens: DesignTokens,
    #[serde(default)]
    pub components: IndexMap<String, ComponentSpec>,
}

impl TokenSchema {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
            tokens: DesignTokens::default(),
            components: IndexMap::new(),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Add a component keyed by its name.
    pub fn add_component(&mut self, spec: ComponentSpec) {
        self.components.insert(spec.name.clone(), spec);
    }
}

/// The three token layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignTokens {
    #[serde(default)]
    pub primitive: TokenGroup,
    #[serde(default)]
    pub semantic: TokenGroup,
    #[serde(default)]
    pub component: TokenGroup,
}

impl DesignTokens {
    pub fn layer(&self, layer: TokenLayer) -> &TokenGroup {
        match layer {
            TokenLayer::Primitive => &self.primitive,
            TokenLayer::Semantic => &self.semantic,
            TokenLayer::Component => &self.component,
        }
    }

    pub fn layer_mut(&mut self, layer: TokenLayer) -> &mut TokenGroup {
        match layer {
            TokenLayer::Primitive => &mut self.primitive,
            TokenLayer::Semantic => &mut self.semantic,
            TokenLayer::Component => &mut self.component,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenLayer {
    Primitive,
    Semantic,
    Component,
}

impl TokenLayer {
    pub const ALL: [TokenLayer; 3] = [Self::Primitive, Self::Semantic, Self::Component];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Semantic => "semantic",
            Self::Component => "component",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == name)
    }
}

impl fmt::Display for TokenLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical UI component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    pub category: ComponentCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub props: IndexMap<String, PropDefinition>,
    #[serde(default)]
    pub variants: Variants,
    #[serde(default)]
    pub accessibility: AccessibilitySpec,
    #[serde(default)]
    pub platforms: PlatformSupport,
}

impl ComponentSpec {
    pub fn new(name: impl Into<String>, category: ComponentCategory) -> Self {
        Self {
            name: name.into(),
            category,
            description: None,
            props: IndexMap::new(),
            variants: Variants::default(),
            accessibility: AccessibilitySpec::default(),
            platforms: PlatformSupport::default(),
        }
    }

    /// Builder-style prop insertion.
    pub fn with_prop(mut self, name: impl Into<String>, prop: PropDefinition) -> Self {
        self.props.insert(name.into(), prop);
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.accessibility.role = role.into();
        self
    }

    pub fn supports(&self, platform: &PlatformId) -> bool {
        self.platforms.supports(platform)
    }
}

/// Closed set of component categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentCategory {
    Layout,
    Form,
    Navigation,
    Feedback,
    DataDisplay,
    Interactive,
    Specialized,
}

impl ComponentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Form => "form",
            Self::Navigation => "navigation",
            Self::Feedback => "feedback",
            Self::DataDisplay => "data-display",
            Self::Interactive => "interactive",
            Self::Specialized => "specialized",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single prop. The type descriptor is inlined, so a prop reads
/// `{"type": "custom", "custom": "size", "required": true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropDefinition {
    #[serde(flatten)]
    pub descriptor: TypeDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,
}

impl PropDefinition {
    pub fn new(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor,
            description: None,
            required: false,
            default: None,
            examples: Vec::new(),
            deprecated: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deprecation {
    pub since: String,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variants {
    /// Axis name → enumerated values.
    #[serde(default)]
    pub simple: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub compound: Vec<CompoundVariant>,
}

impl Variants {
    pub fn is_empty(&self) -> bool {
        self.simple.is_empty() && self.compound.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundVariant {
    /// Prop name → value the prop must have for this variant to apply.
    pub conditions: IndexMap<String, Value>,
    #[serde(default, rename = "className", skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilitySpec {
    /// ARIA-style role (`button`, `dialog`, ...).
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub keyboard: Vec<KeyboardInteraction>,
    /// Events that should be announced by screen readers.
    #[serde(default, alias = "screenReader")]
    pub announcements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardInteraction {
    pub key: String,
    pub action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformSupport {
    /// Empty means every platform.
    #[serde(default)]
    pub supported: Vec<PlatformId>,
}

impl PlatformSupport {
    pub fn supports(&self, platform: &PlatformId) -> bool {
        self.supported.is_empty() || self.supported.contains(platform)
    }
}
