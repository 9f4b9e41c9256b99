//! Abstract type descriptors for component props.
//!
//! A [`TypeDescriptor`] describes the shape of a prop independently of any
//! target language. Type-mapping tables in `prism-codegen` turn descriptors
//! into concrete type syntax per platform.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Tagged description of a prop's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// string / number / boolean, optionally restricted to an enumeration.
    Primitive {
        primitive: PrimitiveType,
        #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
        enum_values: Option<Vec<Value>>,
    },
    /// Framework-level values: callbacks, renderable content, refs, dates, files.
    Complex {
        complex: ComplexType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        signature: Option<FunctionSignature>,
    },
    /// Domain types with a default enumeration that `values` may override.
    Custom {
        custom: CustomType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        values: Option<Vec<String>>,
    },
    /// Ordered list of alternatives.
    Union { types: Vec<TypeDescriptor> },
    /// Homogeneous list.
    Array {
        items: Box<TypeDescriptor>,
        #[serde(default, rename = "minItems", skip_serializing_if = "Option::is_none")]
        min_items: Option<usize>,
        #[serde(default, rename = "maxItems", skip_serializing_if = "Option::is_none")]
        max_items: Option<usize>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        unique: bool,
    },
    /// Named fields. Non-strict objects admit unknown keys.
    Object {
        #[serde(default)]
        properties: IndexMap<String, TypeDescriptor>,
        #[serde(default = "default_strict")]
        strict: bool,
    },
}

fn default_strict() -> bool {
    true
}

/// The six descriptor kinds every mapping table must cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    Primitive,
    Complex,
    Custom,
    Union,
    Array,
    Object,
}

impl DescriptorKind {
    pub const ALL: [DescriptorKind; 6] = [
        Self::Primitive,
        Self::Complex,
        Self::Custom,
        Self::Union,
        Self::Array,
        Self::Object,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Complex => "complex",
            Self::Custom => "custom",
            Self::Union => "union",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    String,
    Number,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexType {
    Function,
    Node,
    Element,
    Ref,
    Date,
    File,
}

/// Call signature of a function-typed prop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionSignature {
    #[serde(default)]
    pub params: IndexMap<String, TypeDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<Box<TypeDescriptor>>,
}

/// Domain-level custom types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CustomType {
    Color,
    Size,
    Variant,
    Breakpoint,
    Locale,
    Email,
    Url,
    /// Project-specific domain type; must carry explicit values to be mappable.
    Other(String),
}

impl CustomType {
    pub fn name(&self) -> &str {
        match self {
            Self::Color => "color",
            Self::Size => "size",
            Self::Variant => "variant",
            Self::Breakpoint => "breakpoint",
            Self::Locale => "locale",
            Self::Email => "email",
            Self::Url => "url",
            Self::Other(name) => name,
        }
    }

    /// Platform-agnostic default enumeration. Empty for string-like types.
    pub fn default_values(&self) -> &'static [&'static str] {
        match self {
            Self::Size => &["xs", "sm", "md", "lg", "xl"],
            Self::Variant => &["primary", "secondary", "outline", "ghost", "danger"],
            Self::Breakpoint => &["sm", "md", "lg", "xl", "2xl"],
            Self::Locale => &["en", "es", "fr", "de", "ja", "zh"],
            Self::Color | Self::Email | Self::Url | Self::Other(_) => &[],
        }
    }

    /// Rendered as the target's string type unless it has a native equivalent.
    pub fn is_stringly(&self) -> bool {
        matches!(self, Self::Color | Self::Email | Self::Url)
    }
}

impl From<String> for CustomType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "color" => Self::Color,
            "size" => Self::Size,
            "variant" => Self::Variant,
            "breakpoint" => Self::Breakpoint,
            "locale" => Self::Locale,
            "email" => Self::Email,
            "url" => Self::Url,
            _ => Self::Other(value),
        }
    }
}

impl From<CustomType> for String {
    fn from(value: CustomType) -> Self {
        value.name().to_string()
    }
}

impl TypeDescriptor {
    pub fn string() -> Self {
        Self::Primitive {
            primitive: PrimitiveType::String,
            enum_values: None,
        }
    }

    pub fn number() -> Self {
        Self::Primitive {
            primitive: PrimitiveType::Number,
            enum_values: None,
        }
    }

    pub fn boolean() -> Self {
        Self::Primitive {
            primitive: PrimitiveType::Boolean,
            enum_values: None,
        }
    }

    pub fn string_enum<S: AsRef<str>>(values: &[S]) -> Self {
        Self::Primitive {
            primitive: PrimitiveType::String,
            enum_values: Some(
                values
                    .iter()
                    .map(|v| Value::String(v.as_ref().to_string()))
                    .collect(),
            ),
        }
    }

    pub fn complex(complex: ComplexType) -> Self {
        Self::Complex {
            complex,
            signature: None,
        }
    }

    pub fn function(params: IndexMap<String, TypeDescriptor>, returns: Option<TypeDescriptor>) -> Self {
        Self::Complex {
            complex: ComplexType::Function,
            signature: Some(FunctionSignature {
                params,
                returns: returns.map(Box::new),
            }),
        }
    }

    pub fn custom(custom: CustomType) -> Self {
        Self::Custom {
            custom,
            values: None,
        }
    }

    pub fn union(types: Vec<TypeDescriptor>) -> Self {
        Self::Union { types }
    }

    pub fn array(items: TypeDescriptor) -> Self {
        Self::Array {
            items: Box::new(items),
            min_items: None,
            max_items: None,
            unique: false,
        }
    }

    pub fn object(properties: IndexMap<String, TypeDescriptor>, strict: bool) -> Self {
        Self::Object { properties, strict }
    }

    pub fn kind(&self) -> DescriptorKind {
        match self {
            Self::Primitive { .. } => DescriptorKind::Primitive,
            Self::Complex { .. } => DescriptorKind::Complex,
            Self::Custom { .. } => DescriptorKind::Custom,
            Self::Union { .. } => DescriptorKind::Union,
            Self::Array { .. } => DescriptorKind::Array,
            Self::Object { .. } => DescriptorKind::Object,
        }
    }

    /// Enumerated string values, if the descriptor is an enumeration.
    ///
    /// Custom types fall back to their default enumeration when no explicit
    /// `values` are given.
    pub fn enumerated_values(&self) -> Option<Vec<String>> {
        match self {
            Self::Primitive {
                enum_values: Some(values),
                ..
            } => Some(values.iter().map(value_label).collect()),
            Self::Custom { custom, values } => match values {
                Some(values) => Some(values.clone()),
                None if !custom.default_values().is_empty() => Some(
                    custom
                        .default_values()
                        .iter()
                        .map(|v| v.to_string())
                        .collect(),
                ),
                None => None,
            },
            _ => None,
        }
    }

    /// Whether the descriptor is a callback.
    pub fn is_callback(&self) -> bool {
        matches!(
            self,
            Self::Complex {
                complex: ComplexType::Function,
                ..
            }
        )
    }

    /// Whether the descriptor holds renderable content (children/slots).
    pub fn is_content(&self) -> bool {
        matches!(
            self,
            Self::Complex {
                complex: ComplexType::Node | ComplexType::Element,
                ..
            }
        )
    }

    /// A representative value for previews, stories and usage examples.
    pub fn sample_value(&self) -> Option<Value> {
        match self {
            Self::Primitive {
                enum_values: Some(values),
                ..
            } => values.first().cloned(),
            Self::Primitive { primitive, .. } => Some(match primitive {
                PrimitiveType::String => Value::String("Label".into()),
                PrimitiveType::Number => Value::from(0),
                PrimitiveType::Boolean => Value::Bool(false),
            }),
            Self::Custom { custom, .. } => match self.enumerated_values() {
                Some(values) => values.first().cloned().map(Value::String),
                None => Some(Value::String(
                    match custom {
                        CustomType::Color => "#000000",
                        CustomType::Email => "user@example.com",
                        CustomType::Url => "https://example.com",
                        _ => "value",
                    }
                    .into(),
                )),
            },
            Self::Union { types } => types.first().and_then(Self::sample_value),
            Self::Array { .. } => Some(Value::Array(Vec::new())),
            Self::Object { properties, .. } => {
                let mut map = serde_json::Map::new();
                for (name, descriptor) in properties {
                    if let Some(value) = descriptor.sample_value() {
                        map.insert(name.clone(), value);
                    }
                }
                Some(Value::Object(map))
            }
            Self::Complex { .. } => None,
        }
    }

    /// Short human-readable summary used in error messages.
    pub fn summary(&self) -> String {
        match self {
            Self::Primitive { primitive, enum_values } => {
                let base = match primitive {
                    PrimitiveType::String => "string",
                    PrimitiveType::Number => "number",
                    PrimitiveType::Boolean => "boolean",
                };
                match enum_values {
                    Some(values) => format!("{}enum({})", base, values.len()),
                    None => base.to_string(),
                }
            }
            Self::Complex { complex, .. } => format!("{:?}", complex).to_lowercase(),
            Self::Custom { custom, .. } => format!("custom:{}", custom.name()),
            Self::Union { types } => format!(
                "union<{}>",
                types.iter().map(Self::summary).collect::<Vec<_>>().join(" | ")
            ),
            Self::Array { items, .. } => format!("array<{}>", items.summary()),
            Self::Object { properties, strict } => format!(
                "object{{{}}}{}",
                properties.keys().cloned().collect::<Vec<_>>().join(", "),
                if *strict { "" } else { "+" }
            ),
        }
    }
}

/// Render an enum value as a plain label (strings unquoted).
pub fn value_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_custom_size() {
        let d: TypeDescriptor = serde_json::from_value(json!({"type": "custom", "custom": "size"})).unwrap();
        assert_eq!(d, TypeDescriptor::custom(CustomType::Size));
        assert_eq!(
            d.enumerated_values().unwrap(),
            vec!["xs", "sm", "md", "lg", "xl"]
        );
    }

    #[test]
    fn test_custom_values_override_defaults() {
        let d: TypeDescriptor =
            serde_json::from_value(json!({"type": "custom", "custom": "size", "values": ["s", "l"]}))
                .unwrap();
        assert_eq!(d.enumerated_values().unwrap(), vec!["s", "l"]);
    }

    #[test]
    fn test_unknown_custom_type_is_preserved() {
        let d: TypeDescriptor =
            serde_json::from_value(json!({"type": "custom", "custom": "currency"})).unwrap();
        match d {
            TypeDescriptor::Custom { custom, .. } => {
                assert_eq!(custom, CustomType::Other("currency".into()))
            }
            _ => panic!("expected custom descriptor"),
        }
    }

    #[test]
    fn test_nested_descriptors() {
        let d: TypeDescriptor = serde_json::from_value(json!({
            "type": "object",
            "strict": false,
            "properties": {
                "tags": {"type": "array", "items": {"type": "primitive", "primitive": "string"}, "minItems": 1},
                "mode": {"type": "union", "types": [
                    {"type": "primitive", "primitive": "string", "enum": ["a", "b"]},
                    {"type": "primitive", "primitive": "number"}
                ]}
            }
        }))
        .unwrap();
        assert_eq!(d.kind(), DescriptorKind::Object);
        assert_eq!(d.summary(), "object{tags, mode}+");
    }

    #[test]
    fn test_object_strict_defaults_to_true() {
        let d: TypeDescriptor = serde_json::from_value(json!({"type": "object"})).unwrap();
        assert_eq!(d, TypeDescriptor::object(IndexMap::new(), true));
    }

    #[test]
    fn test_sample_values() {
        assert_eq!(
            TypeDescriptor::custom(CustomType::Size).sample_value(),
            Some(json!("xs"))
        );
        assert_eq!(TypeDescriptor::boolean().sample_value(), Some(json!(false)));
        assert_eq!(TypeDescriptor::complex(ComplexType::Function).sample_value(), None);
    }
}
