//! Kotlin type table (Jetpack Compose).

use super::{camel, case_ident, collapse, enum_values, pascal, unmappable, TypeMapper, TypeScope};
use crate::error::UnmappableTypeError;
use crate::values::{escape_kotlin, ValueKind};
use convert_case::{Case, Casing};
use prism_core::{ComplexType, CustomType, PrimitiveType, TokenValue, TypeDescriptor};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct KotlinMapper;

const RESERVED: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
];

fn constant(value: &Value) -> String {
    case_ident(value).to_case(Case::UpperSnake)
}

fn number_literal(n: &serde_json::Number) -> String {
    match n.as_i64() {
        Some(i) => format!("{}.0", i),
        None => n.to_string(),
    }
}

impl KotlinMapper {
    fn declare_enum(&self, hint: &str, values: &[Value], scope: &mut TypeScope) -> String {
        let numeric = values.iter().all(Value::is_number);
        let raw = if numeric { "Double" } else { "String" };
        let mut lines = vec![format!("enum class {}(val value: {}) {{", hint, raw)];
        let entries: Vec<String> = values
            .iter()
            .map(|value| match value {
                Value::Number(n) => format!("    {}({})", constant(value), number_literal(n)),
                other => format!(
                    "    {}(\"{}\")",
                    constant(other),
                    escape_kotlin(&prism_core::value_label(other))
                ),
            })
            .collect();
        lines.push(format!("{};", entries.join(",\n")));
        lines.push("}".to_string());
        scope.declare(hint, lines.join("\n"))
    }

    fn declare_sealed(&self, hint: &str, members: &[String], scope: &mut TypeScope) -> String {
        let mut lines = vec![format!("sealed interface {} {{", hint)];
        let mut used: Vec<String> = Vec::new();
        for (index, member) in members.iter().enumerate() {
            let base: String = member.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
            let mut variant = format!("{}Value", pascal(&base));
            if base.is_empty() || used.contains(&variant) {
                variant = format!("Option{}", index + 1);
            }
            lines.push(format!(
                "    data class {}(val value: {}) : {}",
                variant, member, hint
            ));
            used.push(variant);
        }
        lines.push("}".to_string());
        scope.declare(hint, lines.join("\n"))
    }
}

impl TypeMapper for KotlinMapper {
    fn target(&self) -> &'static str {
        "kotlin"
    }

    fn map(
        &self,
        descriptor: &TypeDescriptor,
        hint: &str,
        scope: &mut TypeScope,
    ) -> Result<String, UnmappableTypeError> {
        if let Some(values) = enum_values(self.target(), descriptor)? {
            if values.iter().all(Value::is_boolean) {
                return Ok("Boolean".to_string());
            }
            return Ok(self.declare_enum(hint, &values, scope));
        }

        match descriptor {
            TypeDescriptor::Primitive { primitive, .. } => Ok(match primitive {
                PrimitiveType::String => "String",
                PrimitiveType::Number => "Double",
                PrimitiveType::Boolean => "Boolean",
            }
            .to_string()),
            TypeDescriptor::Complex { complex, signature } => match complex {
                ComplexType::Function => {
                    let Some(signature) = signature else {
                        return Ok("() -> Unit".to_string());
                    };
                    let params = signature
                        .params
                        .iter()
                        .map(|(name, ty)| self.map(ty, &format!("{}{}", hint, pascal(name)), scope))
                        .collect::<Result<Vec<_>, _>>()?;
                    let returns = match &signature.returns {
                        Some(ty) => self.map(ty, &format!("{}Result", hint), scope)?,
                        None => "Unit".to_string(),
                    };
                    Ok(format!("({}) -> {}", params.join(", "), returns))
                }
                ComplexType::Node | ComplexType::Element => {
                    Ok("@Composable () -> Unit".to_string())
                }
                ComplexType::Ref => Ok("FocusRequester".to_string()),
                ComplexType::Date => Ok("java.time.Instant".to_string()),
                ComplexType::File => Ok("android.net.Uri".to_string()),
            },
            TypeDescriptor::Custom { custom, .. } => Ok(match custom {
                CustomType::Color => "Color",
                _ => "String",
            }
            .to_string()),
            TypeDescriptor::Union { types } => {
                if types.is_empty() {
                    return Err(unmappable(self.target(), descriptor, "union has no members"));
                }
                let members = types
                    .iter()
                    .enumerate()
                    .map(|(i, t)| self.map(t, &format!("{}Option{}", hint, i + 1), scope))
                    .collect::<Result<Vec<_>, _>>()?;
                if let Some(single) = collapse(&members) {
                    return Ok(single.clone());
                }
                Ok(self.declare_sealed(hint, &members, scope))
            }
            TypeDescriptor::Array { items, .. } => {
                let inner = self.map(items, &format!("{}Item", hint), scope)?;
                Ok(format!("List<{}>", inner))
            }
            TypeDescriptor::Object { properties, strict } => {
                if !strict {
                    return Ok("Map<String, Any?>".to_string());
                }
                let fields = properties
                    .iter()
                    .map(|(name, ty)| {
                        let mapped = self.map(ty, &format!("{}{}", hint, pascal(name)), scope)?;
                        Ok(format!("    val {}: {}", self.ident(&camel(name)), mapped))
                    })
                    .collect::<Result<Vec<_>, UnmappableTypeError>>()?;
                let source = if fields.is_empty() {
                    format!("data object {}", hint)
                } else {
                    format!("data class {}(\n{},\n)", hint, fields.join(",\n"))
                };
                Ok(scope.declare(hint, source))
            }
        }
    }

    fn literal(&self, descriptor: &TypeDescriptor, value: &Value, hint: &str) -> Option<String> {
        if let Ok(Some(values)) = enum_values(self.target(), descriptor) {
            return match value {
                Value::Bool(b) if values.contains(value) => Some(b.to_string()),
                _ if values.contains(value) => Some(format!("{}.{}", hint, constant(value))),
                _ => None,
            };
        }
        match (descriptor, value) {
            (TypeDescriptor::Custom { custom: CustomType::Color, .. }, Value::String(s)) => {
                match ValueKind::classify(&TokenValue::String(s.clone())) {
                    ValueKind::Color { argb } => Some(format!("Color(0x{:08X})", argb)),
                    _ => None,
                }
            }
            (TypeDescriptor::Union { types }, _) => {
                let mut scratch = TypeScope::new();
                let members = types
                    .iter()
                    .enumerate()
                    .map(|(i, t)| self.map(t, &format!("{}Option{}", hint, i + 1), &mut scratch).ok())
                    .collect::<Option<Vec<_>>>()?;
                collapse(&members)?;
                self.literal(types.first()?, value, &format!("{}Option1", hint))
            }
            (TypeDescriptor::Array { items, .. }, Value::Array(elements)) => {
                let item_hint = format!("{}Item", hint);
                let rendered = elements
                    .iter()
                    .map(|v| self.literal(items, v, &item_hint))
                    .collect::<Option<Vec<_>>>()?;
                Some(format!("listOf({})", rendered.join(", ")))
            }
            (_, Value::String(s)) => Some(format!("\"{}\"", escape_kotlin(s))),
            (_, Value::Number(n)) => Some(number_literal(n)),
            (_, Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        }
    }

    fn optional(&self, ty: &str) -> String {
        if ty.contains("->") {
            format!("({})?", ty)
        } else {
            format!("{}?", ty)
        }
    }
    fn ident(&self, name: &str) -> String {
        if RESERVED.contains(&name) {
            format!("`{}`", name)
        } else {
            name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::json;

    #[test]
    fn test_variant_becomes_enum_class() {
        let mut scope = TypeScope::new();
        let ty = KotlinMapper
            .map(&TypeDescriptor::custom(CustomType::Variant), "ButtonVariant", &mut scope)
            .unwrap();
        assert_eq!(ty, "ButtonVariant");
        let decl = scope.render();
        assert!(decl.starts_with("enum class ButtonVariant(val value: String) {"));
        assert!(decl.contains("PRIMARY(\"primary\")"));
        assert!(decl.contains("DANGER(\"danger\");"));
    }

    #[test]
    fn test_enum_literal_is_qualified() {
        let d = TypeDescriptor::custom(CustomType::Variant);
        assert_eq!(
            KotlinMapper.literal(&d, &json!("ghost"), "ButtonVariant").as_deref(),
            Some("ButtonVariant.GHOST")
        );
    }

    #[test]
    fn test_strict_object_is_data_class() {
        let mut fields = IndexMap::new();
        fields.insert("id".to_string(), TypeDescriptor::number());
        fields.insert("tags".to_string(), TypeDescriptor::array(TypeDescriptor::string()));
        let mut scope = TypeScope::new();
        KotlinMapper
            .map(&TypeDescriptor::object(fields, true), "RowData", &mut scope)
            .unwrap();
        insta::assert_snapshot!(scope.render(), @r###"
        data class RowData(
            val id: Double,
            val tags: List<String>,
        )
        "###);
    }

    #[test]
    fn test_numbers_render_as_doubles() {
        assert_eq!(
            KotlinMapper.literal(&TypeDescriptor::number(), &json!(4), "X").as_deref(),
            Some("4.0")
        );
    }

    #[test]
    fn test_color_literal() {
        let d = TypeDescriptor::custom(CustomType::Color);
        assert_eq!(
            KotlinMapper.literal(&d, &json!("#3b82f6"), "X").as_deref(),
            Some("Color(0xFF3B82F6)")
        );
    }

    #[test]
    fn test_reserved_field_is_backticked() {
        let mut props = IndexMap::new();
        props.insert("class".to_string(), TypeDescriptor::string());
        let mut scope = TypeScope::new();
        KotlinMapper
            .map(&TypeDescriptor::object(props, true), "RowData", &mut scope)
            .unwrap();
        assert!(scope.render().contains("    val `class`: String,"));
    }
}
