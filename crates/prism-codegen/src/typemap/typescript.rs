//! TypeScript type table.

use super::{collapse, enum_values, unmappable, TypeMapper, TypeScope};
use crate::error::UnmappableTypeError;
use crate::values::escape_single;
use prism_core::{ComplexType, FunctionSignature, PrimitiveType, TypeDescriptor};
use serde_json::Value;

/// Framework flavor for renderable content and element references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsFlavor {
    React,
    Vue,
    Angular,
    Svelte,
    /// Framework-free DOM types (stylesheet targets).
    Plain,
}

impl TsFlavor {
    fn node(self) -> &'static str {
        match self {
            Self::React => "React.ReactNode",
            Self::Vue => "VNode",
            Self::Angular => "TemplateRef<unknown>",
            Self::Svelte => "Snippet",
            Self::Plain => "Node | string",
        }
    }

    fn element(self) -> &'static str {
        match self {
            Self::React => "React.ReactElement",
            Self::Vue => "VNode",
            Self::Angular => "TemplateRef<unknown>",
            Self::Svelte => "Snippet",
            Self::Plain => "HTMLElement",
        }
    }

    fn reference(self) -> &'static str {
        match self {
            Self::React => "React.Ref<HTMLElement>",
            Self::Vue => "Ref<HTMLElement | null>",
            Self::Angular => "ElementRef<HTMLElement>",
            Self::Svelte => "HTMLElement | undefined",
            Self::Plain => "HTMLElement | null",
        }
    }
}

/// Words that cannot name a binding in strict-mode modules.
const RESERVED: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

#[derive(Debug, Clone, Copy)]
pub struct TypeScriptMapper {
    flavor: TsFlavor,
}

impl TypeScriptMapper {
    pub const fn new(flavor: TsFlavor) -> Self {
        Self { flavor }
    }

    pub fn flavor(&self) -> TsFlavor {
        self.flavor
    }

    fn function(
        &self,
        signature: Option<&FunctionSignature>,
        hint: &str,
        scope: &mut TypeScope,
    ) -> Result<String, UnmappableTypeError> {
        let Some(signature) = signature else {
            return Ok("() => void".to_string());
        };
        let params = signature
            .params
            .iter()
            .map(|(name, ty)| Ok(format!("{}: {}", name, self.map(ty, hint, scope)?)))
            .collect::<Result<Vec<_>, UnmappableTypeError>>()?;
        let returns = match &signature.returns {
            Some(ty) => self.map(ty, hint, scope)?,
            None => "void".to_string(),
        };
        Ok(format!("({}) => {}", params.join(", "), returns))
    }
}

/// Wrap compound types so they can be suffixed with `[]` or joined with `|`.
fn group(ty: &str) -> String {
    if ty.contains("=>") || ty.contains(" | ") {
        format!("({})", ty)
    } else {
        ty.to_string()
    }
}

impl TypeMapper for TypeScriptMapper {
    fn target(&self) -> &'static str {
        "typescript"
    }

    fn map(
        &self,
        descriptor: &TypeDescriptor,
        hint: &str,
        scope: &mut TypeScope,
    ) -> Result<String, UnmappableTypeError> {
        if let Some(values) = enum_values(self.target(), descriptor)? {
            let literals = values
                .iter()
                .map(|v| {
                    self.literal(descriptor, v, hint).ok_or_else(|| {
                        unmappable(self.target(), descriptor, "enum value has no literal form")
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(literals.join(" | "));
        }

        match descriptor {
            TypeDescriptor::Primitive { primitive, .. } => Ok(match primitive {
                PrimitiveType::String => "string",
                PrimitiveType::Number => "number",
                PrimitiveType::Boolean => "boolean",
            }
            .to_string()),
            TypeDescriptor::Complex { complex, signature } => match complex {
                ComplexType::Function => self.function(signature.as_ref(), hint, scope),
                ComplexType::Node => Ok(self.flavor.node().to_string()),
                ComplexType::Element => Ok(self.flavor.element().to_string()),
                ComplexType::Ref => Ok(self.flavor.reference().to_string()),
                ComplexType::Date => Ok("Date".to_string()),
                ComplexType::File => Ok("File".to_string()),
            },
            // Stringly custom types; enumerated ones returned above.
            TypeDescriptor::Custom { .. } => Ok("string".to_string()),
            TypeDescriptor::Union { types } => {
                if types.is_empty() {
                    return Err(unmappable(self.target(), descriptor, "union has no members"));
                }
                let members = types
                    .iter()
                    .map(|t| self.map(t, hint, scope).map(|m| group(&m)))
                    .collect::<Result<Vec<_>, _>>()?;
                if let Some(single) = collapse(&members) {
                    return Ok(single.clone());
                }
                Ok(members.join(" | "))
            }
            TypeDescriptor::Array { items, .. } => {
                let inner = self.map(items, hint, scope)?;
                Ok(format!("{}[]", group(&inner)))
            }
            TypeDescriptor::Object { properties, strict } => {
                let mut fields = properties
                    .iter()
                    .map(|(name, ty)| Ok(format!("{}: {}", name, self.map(ty, hint, scope)?)))
                    .collect::<Result<Vec<_>, UnmappableTypeError>>()?;
                if !strict {
                    fields.push("[key: string]: unknown".to_string());
                }
                if fields.is_empty() {
                    return Ok("Record<string, never>".to_string());
                }
                Ok(format!("{{ {} }}", fields.join("; ")))
            }
        }
    }

    fn literal(&self, descriptor: &TypeDescriptor, value: &Value, hint: &str) -> Option<String> {
        match value {
            Value::String(s) => Some(format!("'{}'", escape_single(s))),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Array(items) => {
                let inner = match descriptor {
                    TypeDescriptor::Array { items, .. } => items.as_ref(),
                    other => other,
                };
                let rendered = items
                    .iter()
                    .map(|v| self.literal(inner, v, hint))
                    .collect::<Option<Vec<_>>>()?;
                Some(format!("[{}]", rendered.join(", ")))
            }
            Value::Object(map) => {
                let rendered = map
                    .iter()
                    .map(|(k, v)| {
                        let field = match descriptor {
                            TypeDescriptor::Object { properties, .. } => properties.get(k),
                            _ => None,
                        };
                        let literal = match field {
                            Some(field) => self.literal(field, v, hint),
                            None => self.literal(&TypeDescriptor::string(), v, hint),
                        }?;
                        Some(format!("{}: {}", k, literal))
                    })
                    .collect::<Option<Vec<_>>>()?;
                Some(format!("{{ {} }}", rendered.join(", ")))
            }
            Value::Null => None,
        }
    }

    fn optional(&self, ty: &str) -> String {
        format!("{} | undefined", ty)
    }
    fn ident(&self, name: &str) -> String {
        if RESERVED.contains(&name) {
            format!("{}_", name)
        } else {
            name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use prism_core::CustomType;

    fn react() -> TypeScriptMapper {
        TypeScriptMapper::new(TsFlavor::React)
    }

    fn map(mapper: &TypeScriptMapper, d: &TypeDescriptor) -> String {
        mapper.map(d, "Prop", &mut TypeScope::new()).unwrap()
    }

    #[test]
    fn test_primitive_enum_is_literal_union() {
        let d = TypeDescriptor::string_enum(&["primary", "ghost"]);
        insta::assert_snapshot!(map(&react(), &d), @"'primary' | 'ghost'");
    }

    #[test]
    fn test_custom_size_uses_default_values() {
        let d = TypeDescriptor::custom(CustomType::Size);
        assert_eq!(map(&react(), &d), "'xs' | 'sm' | 'md' | 'lg' | 'xl'");
        assert_eq!(map(&react(), &TypeDescriptor::custom(CustomType::Color)), "string");
    }

    #[test]
    fn test_flavors_differ_for_content() {
        let node = TypeDescriptor::complex(ComplexType::Node);
        assert_eq!(map(&react(), &node), "React.ReactNode");
        assert_eq!(map(&TypeScriptMapper::new(TsFlavor::Vue), &node), "VNode");
        assert_eq!(
            map(&TypeScriptMapper::new(TsFlavor::Angular), &node),
            "TemplateRef<unknown>"
        );
        assert_eq!(map(&TypeScriptMapper::new(TsFlavor::Svelte), &node), "Snippet");
    }

    #[test]
    fn test_function_signature() {
        let mut params = IndexMap::new();
        params.insert("value".to_string(), TypeDescriptor::string());
        let d = TypeDescriptor::function(params, Some(TypeDescriptor::boolean()));
        assert_eq!(map(&react(), &d), "(value: string) => boolean");
        assert_eq!(
            map(&react(), &TypeDescriptor::array(d)),
            "((value: string) => boolean)[]"
        );
    }

    #[test]
    fn test_open_object_has_index_signature() {
        let mut props = IndexMap::new();
        props.insert("id".to_string(), TypeDescriptor::number());
        let d = TypeDescriptor::object(props, false);
        assert_eq!(map(&react(), &d), "{ id: number; [key: string]: unknown }");
    }

    #[test]
    fn test_union_of_same_type_collapses() {
        let d = TypeDescriptor::union(vec![TypeDescriptor::string(), TypeDescriptor::string()]);
        assert_eq!(map(&react(), &d), "string");
    }

    #[test]
    fn test_enum_value_without_literal_is_unmappable() {
        let d = TypeDescriptor::Primitive {
            primitive: PrimitiveType::String,
            enum_values: Some(vec![Value::Null]),
        };
        let err = react().map(&d, "Prop", &mut TypeScope::new()).unwrap_err();
        assert_eq!(err.target, "typescript");
        assert!(err.reason.contains("no literal"));
    }

    #[test]
    fn test_reserved_words_get_suffix() {
        assert_eq!(react().ident("default"), "default_");
        assert_eq!(react().ident("class"), "class_");
        assert_eq!(react().ident("label"), "label");
    }
}
