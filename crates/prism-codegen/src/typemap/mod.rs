//! Cross-platform type mapping.
//!
//! Each target family has its own [`TypeMapper`] table covering all six
//! descriptor kinds. A descriptor the table cannot express produces an
//! [`UnmappableTypeError`]; there is no catch-all type.
//!
//! Targets without literal unions or anonymous structural types (Swift,
//! Kotlin, Dart) emit named auxiliary declarations into a [`TypeScope`]. The
//! `hint` passed to [`TypeMapper::map`] is the PascalCase name those
//! declarations take, usually component name plus prop name.

mod dart;
mod kotlin;
mod swift;
mod typescript;

pub use dart::DartMapper;
pub use kotlin::KotlinMapper;
pub use swift::SwiftMapper;
pub use typescript::{TsFlavor, TypeScriptMapper};

use crate::error::UnmappableTypeError;
use convert_case::{Case, Casing};
use indexmap::IndexMap;
use prism_core::{BuiltinPlatform, PlatformId, TypeDescriptor};
use serde_json::Value;

/// Per-target type table.
pub trait TypeMapper: Send + Sync {
    /// Name of the target language, used in error messages.
    fn target(&self) -> &'static str;

    /// Map a descriptor to the target's type syntax.
    fn map(
        &self,
        descriptor: &TypeDescriptor,
        hint: &str,
        scope: &mut TypeScope,
    ) -> Result<String, UnmappableTypeError>;

    /// Render a concrete value as a literal of the mapped type.
    ///
    /// `hint` must match the one used for [`TypeMapper::map`] so enum literals
    /// name the generated declaration.
    fn literal(&self, descriptor: &TypeDescriptor, value: &Value, hint: &str) -> Option<String>;

    /// Wrap a mapped type for an optional prop.
    fn optional(&self, ty: &str) -> String;

    /// Escape an identifier that is a reserved word of the target.
    fn ident(&self, name: &str) -> String {
        name.to_string()
    }
}

/// Auxiliary declarations produced while mapping one component's props.
#[derive(Debug, Clone, Default)]
pub struct TypeScope {
    declarations: IndexMap<String, String>,
}

impl TypeScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration. The first declaration under a name wins.
    pub fn declare(&mut self, name: &str, source: String) -> String {
        self.declarations.entry(name.to_string()).or_insert(source);
        name.to_string()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    pub fn declarations(&self) -> impl Iterator<Item = (&String, &String)> {
        self.declarations.iter()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// All declarations separated by blank lines.
    pub fn render(&self) -> String {
        self.declarations
            .values()
            .cloned()
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

static REACT: TypeScriptMapper = TypeScriptMapper::new(TsFlavor::React);
static VUE: TypeScriptMapper = TypeScriptMapper::new(TsFlavor::Vue);
static ANGULAR: TypeScriptMapper = TypeScriptMapper::new(TsFlavor::Angular);
static SVELTE: TypeScriptMapper = TypeScriptMapper::new(TsFlavor::Svelte);
static PLAIN: TypeScriptMapper = TypeScriptMapper::new(TsFlavor::Plain);
static SWIFT: SwiftMapper = SwiftMapper;
static KOTLIN: KotlinMapper = KotlinMapper;
static DART: DartMapper = DartMapper;

/// The type table for a built-in platform.
pub fn mapper_for(platform: BuiltinPlatform) -> &'static dyn TypeMapper {
    match platform {
        BuiltinPlatform::React => &REACT,
        BuiltinPlatform::Vue => &VUE,
        BuiltinPlatform::Angular => &ANGULAR,
        BuiltinPlatform::Svelte => &SVELTE,
        BuiltinPlatform::Css | BuiltinPlatform::Tailwind => &PLAIN,
        BuiltinPlatform::IosSwift => &SWIFT,
        BuiltinPlatform::AndroidKotlin => &KOTLIN,
        BuiltinPlatform::Flutter => &DART,
    }
}

fn resolve_mapper(platform: &PlatformId) -> Result<&'static dyn TypeMapper, UnmappableTypeError> {
    platform.builtin().map(mapper_for).ok_or_else(|| {
        UnmappableTypeError::new(platform.as_str(), "*", "no type table for this target")
    })
}

/// Map a descriptor for a platform. Auxiliary declarations are named `Value*`
/// and discarded; use [`map_type_in`] to keep them.
pub fn map_type(
    descriptor: &TypeDescriptor,
    platform: &PlatformId,
) -> Result<String, UnmappableTypeError> {
    map_type_in(descriptor, platform, "Value", &mut TypeScope::new())
}

pub fn map_type_in(
    descriptor: &TypeDescriptor,
    platform: &PlatformId,
    hint: &str,
    scope: &mut TypeScope,
) -> Result<String, UnmappableTypeError> {
    resolve_mapper(platform)?.map(descriptor, hint, scope)
}

/// Render a default value for a descriptor. With no explicit value the first
/// enumerated value is used, so `custom: size` defaults to `xs`.
pub fn default_literal(
    descriptor: &TypeDescriptor,
    value: Option<&Value>,
    platform: &PlatformId,
    hint: &str,
) -> Option<String> {
    let mapper = platform.builtin().map(mapper_for)?;
    match value {
        Some(value) => mapper.literal(descriptor, value, hint),
        None => {
            let first = descriptor.enumerated_values()?.into_iter().next()?;
            mapper.literal(descriptor, &Value::String(first), hint)
        }
    }
}

pub(crate) fn unmappable(
    target: &str,
    descriptor: &TypeDescriptor,
    reason: &str,
) -> UnmappableTypeError {
    UnmappableTypeError::new(target, descriptor.summary(), reason)
}

/// Enumerated values of a primitive or custom descriptor, failing on empty
/// enums and on unknown custom names without values.
pub(crate) fn enum_values(
    target: &str,
    descriptor: &TypeDescriptor,
) -> Result<Option<Vec<Value>>, UnmappableTypeError> {
    match descriptor {
        TypeDescriptor::Primitive {
            enum_values: Some(values),
            ..
        } => {
            if values.is_empty() {
                return Err(unmappable(target, descriptor, "enum has no values"));
            }
            Ok(Some(values.clone()))
        }
        TypeDescriptor::Custom { custom, .. } => match descriptor.enumerated_values() {
            Some(values) if values.is_empty() => {
                Err(unmappable(target, descriptor, "custom type has no values"))
            }
            Some(values) => Ok(Some(values.into_iter().map(Value::String).collect())),
            None if custom.is_stringly() => Ok(None),
            None => Err(unmappable(
                target,
                descriptor,
                "unknown custom type without explicit values",
            )),
        },
        _ => Ok(None),
    }
}

/// Identifier for an enum case derived from its value: `"ghost"` → `ghost`,
/// `"2xl"` → `v2Xl`.
pub(crate) fn case_ident(value: &Value) -> String {
    let label = prism_core::value_label(value);
    let ident: String = label
        .to_case(Case::Camel)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    match ident.chars().next() {
        None => "empty".to_string(),
        Some(c) if c.is_ascii_digit() => format!("v{}", ident),
        Some(_) => ident,
    }
}

pub(crate) fn pascal(s: &str) -> String {
    s.to_case(Case::Pascal)
}

pub(crate) fn camel(s: &str) -> String {
    s.to_case(Case::Camel)
}

/// True when every mapped member is the same type, so a union collapses.
pub(crate) fn collapse(members: &[String]) -> Option<&String> {
    let first = members.first()?;
    members.iter().all(|m| m == first).then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::{ComplexType, CustomType, DescriptorKind};
    use serde_json::json;

    fn sample(kind: DescriptorKind) -> TypeDescriptor {
        let mut fields = IndexMap::new();
        fields.insert("label".to_string(), TypeDescriptor::string());
        fields.insert("count".to_string(), TypeDescriptor::number());
        match kind {
            DescriptorKind::Primitive => TypeDescriptor::string_enum(&["sm", "lg"]),
            DescriptorKind::Complex => TypeDescriptor::complex(ComplexType::Function),
            DescriptorKind::Custom => TypeDescriptor::custom(CustomType::Size),
            DescriptorKind::Union => {
                TypeDescriptor::union(vec![TypeDescriptor::string(), TypeDescriptor::number()])
            }
            DescriptorKind::Array => TypeDescriptor::array(TypeDescriptor::string()),
            DescriptorKind::Object => TypeDescriptor::object(fields, true),
        }
    }

    #[test]
    fn test_every_platform_maps_every_kind() {
        for platform in BuiltinPlatform::ALL {
            let id = PlatformId::from(platform);
            for kind in DescriptorKind::ALL {
                let mapped = map_type(&sample(kind), &id)
                    .unwrap_or_else(|e| panic!("{} / {}: {}", platform, kind, e));
                assert!(!mapped.trim().is_empty(), "{} / {}", platform, kind);
                assert_ne!(mapped, "any", "{} / {}", platform, kind);
            }
        }
    }

    #[test]
    fn test_unmappable_cases_fail_on_every_platform() {
        let failing = vec![
            TypeDescriptor::union(vec![]),
            TypeDescriptor::string_enum::<&str>(&[]),
            TypeDescriptor::custom(CustomType::Other("currency".into())),
        ];
        for platform in BuiltinPlatform::ALL {
            let id = PlatformId::from(platform);
            for descriptor in &failing {
                assert!(
                    map_type(descriptor, &id).is_err(),
                    "{} accepted {}",
                    platform,
                    descriptor.summary()
                );
            }
        }
    }

    #[test]
    fn test_unknown_platform_has_no_table() {
        let err = map_type(&TypeDescriptor::string(), &PlatformId::new("gtk4")).unwrap_err();
        assert_eq!(err.target, "gtk4");
    }

    #[test]
    fn test_custom_with_values_is_mappable() {
        let descriptor = TypeDescriptor::Custom {
            custom: CustomType::Other("currency".into()),
            values: Some(vec!["usd".into(), "eur".into()]),
        };
        let ts = map_type(&descriptor, &PlatformId::new("react")).unwrap();
        assert_eq!(ts, "'usd' | 'eur'");
    }

    #[test]
    fn test_default_literal_falls_back_to_first_value() {
        let size = TypeDescriptor::custom(CustomType::Size);
        assert_eq!(
            default_literal(&size, None, &PlatformId::new("react"), "ButtonSize").as_deref(),
            Some("'xs'")
        );
        assert_eq!(
            default_literal(&size, Some(&json!("md")), &PlatformId::new("ios-swift"), "ButtonSize")
                .as_deref(),
            Some(".md")
        );
    }

    #[test]
    fn test_case_ident() {
        assert_eq!(case_ident(&json!("ghost")), "ghost");
        assert_eq!(case_ident(&json!("extra-large")), "extraLarge");
        assert!(case_ident(&json!("2xl")).starts_with('v'));
    }

    #[test]
    fn test_scope_keeps_first_declaration() {
        let mut scope = TypeScope::new();
        scope.declare("A", "first".into());
        scope.declare("A", "second".into());
        assert_eq!(scope.len(), 1);
        assert_eq!(scope.render(), "first");
    }
}
