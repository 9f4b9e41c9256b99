//! Dart type table (Flutter).

use super::{case_ident, collapse, enum_values, pascal, unmappable, TypeMapper, TypeScope};
use crate::error::UnmappableTypeError;
use crate::values::{escape_single, ValueKind};
use prism_core::{ComplexType, CustomType, PrimitiveType, TokenValue, TypeDescriptor};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct DartMapper;

const RESERVED: &[&str] = &[
    "assert", "break", "case", "catch", "class", "const", "continue", "default", "do", "else",
    "enum", "extends", "false", "final", "finally", "for", "if", "in", "is", "new", "null",
    "rethrow", "return", "super", "switch", "this", "throw", "true", "try", "var", "void",
    "while", "with",
];

impl DartMapper {
    fn declare_enum(&self, hint: &str, values: &[Value], scope: &mut TypeScope) -> String {
        let numeric = values.iter().all(Value::is_number);
        let entries: Vec<String> = values
            .iter()
            .map(|value| match value {
                Value::Number(n) => format!("  {}({})", self.ident(&case_ident(value)), n),
                other => format!(
                    "  {}('{}')",
                    self.ident(&case_ident(other)),
                    escape_single(&prism_core::value_label(other))
                ),
            })
            .collect();
        let lines = vec![
            format!("enum {} {{", hint),
            format!("{};", entries.join(",\n")),
            String::new(),
            format!("  const {}(this.value);", hint),
            format!("  final {} value;", if numeric { "num" } else { "String" }),
            "}".to_string(),
        ];
        scope.declare(hint, lines.join("\n"))
    }

    fn declare_sealed(&self, hint: &str, members: &[String], scope: &mut TypeScope) -> String {
        let mut blocks = vec![format!("sealed class {} {{\n  const {}();\n}}", hint, hint)];
        let mut used: Vec<String> = Vec::new();
        for (index, member) in members.iter().enumerate() {
            let base: String = member.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
            let mut variant = format!("{}{}", hint, pascal(&base));
            if base.is_empty() || used.contains(&variant) {
                variant = format!("{}Option{}", hint, index + 1);
            }
            blocks.push(format!(
                "final class {} extends {} {{\n  const {}(this.value);\n  final {} value;\n}}",
                variant, hint, variant, member
            ));
            used.push(variant);
        }
        scope.declare(hint, blocks.join("\n\n"))
    }
}

impl TypeMapper for DartMapper {
    fn target(&self) -> &'static str {
        "dart"
    }

    fn map(
        &self,
        descriptor: &TypeDescriptor,
        hint: &str,
        scope: &mut TypeScope,
    ) -> Result<String, UnmappableTypeError> {
        if let Some(values) = enum_values(self.target(), descriptor)? {
            if values.iter().all(Value::is_boolean) {
                return Ok("bool".to_string());
            }
            return Ok(self.declare_enum(hint, &values, scope));
        }

        match descriptor {
            TypeDescriptor::Primitive { primitive, .. } => Ok(match primitive {
                PrimitiveType::String => "String",
                PrimitiveType::Number => "double",
                PrimitiveType::Boolean => "bool",
            }
            .to_string()),
            TypeDescriptor::Complex { complex, signature } => match complex {
                ComplexType::Function => {
                    let Some(signature) = signature else {
                        return Ok("VoidCallback".to_string());
                    };
                    let params = signature
                        .params
                        .iter()
                        .map(|(name, ty)| self.map(ty, &format!("{}{}", hint, pascal(name)), scope))
                        .collect::<Result<Vec<_>, _>>()?;
                    let returns = match &signature.returns {
                        Some(ty) => self.map(ty, &format!("{}Result", hint), scope)?,
                        None => "void".to_string(),
                    };
                    Ok(format!("{} Function({})", returns, params.join(", ")))
                }
                ComplexType::Node | ComplexType::Element => Ok("Widget".to_string()),
                ComplexType::Ref => Ok("FocusNode".to_string()),
                ComplexType::Date => Ok("DateTime".to_string()),
                ComplexType::File => Ok("File".to_string()),
            },
            TypeDescriptor::Custom { custom, .. } => Ok(match custom {
                CustomType::Color => "Color",
                CustomType::Url => "Uri",
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
                    return Ok("Map<String, Object?>".to_string());
                }
                let fields = properties
                    .iter()
                    .map(|(name, ty)| {
                        let mapped = self.map(ty, &format!("{}{}", hint, pascal(name)), scope)?;
                        Ok(format!("{} {}", mapped, self.ident(&super::camel(name))))
                    })
                    .collect::<Result<Vec<_>, UnmappableTypeError>>()?;
                if fields.is_empty() {
                    return Ok("()".to_string());
                }
                Ok(format!("({{{}}})", fields.join(", ")))
            }
        }
    }

    fn literal(&self, descriptor: &TypeDescriptor, value: &Value, hint: &str) -> Option<String> {
        if let Ok(Some(values)) = enum_values(self.target(), descriptor) {
            return match value {
                Value::Bool(b) if values.contains(value) => Some(b.to_string()),
                _ if values.contains(value) => {
                    Some(format!("{}.{}", hint, self.ident(&case_ident(value))))
                }
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
            (TypeDescriptor::Custom { custom: CustomType::Url, .. }, Value::String(s)) => {
                Some(format!("Uri.parse('{}')", escape_single(s)))
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
                Some(format!("[{}]", rendered.join(", ")))
            }
            (_, Value::String(s)) => Some(format!("'{}'", escape_single(s))),
            (_, Value::Number(n)) => Some(n.to_string()),
            (_, Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        }
    }

    fn optional(&self, ty: &str) -> String {
        format!("{}?", ty)
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
    use serde_json::json;

    #[test]
    fn test_size_becomes_enhanced_enum() {
        let mut scope = TypeScope::new();
        let ty = DartMapper
            .map(&TypeDescriptor::custom(CustomType::Size), "ButtonSize", &mut scope)
            .unwrap();
        assert_eq!(ty, "ButtonSize");
        let decl = scope.render();
        assert!(decl.contains("  xs('xs'),"));
        assert!(decl.contains("  xl('xl');"));
        assert!(decl.contains("const ButtonSize(this.value);"));
    }

    #[test]
    fn test_strict_object_is_record() {
        let mut fields = IndexMap::new();
        fields.insert("label".to_string(), TypeDescriptor::string());
        fields.insert("count".to_string(), TypeDescriptor::number());
        let ty = DartMapper
            .map(&TypeDescriptor::object(fields, true), "Item", &mut TypeScope::new())
            .unwrap();
        assert_eq!(ty, "({String label, double count})");
    }

    #[test]
    fn test_callback_defaults_to_void_callback() {
        let ty = DartMapper
            .map(
                &TypeDescriptor::complex(ComplexType::Function),
                "OnPress",
                &mut TypeScope::new(),
            )
            .unwrap();
        assert_eq!(ty, "VoidCallback");
        assert_eq!(DartMapper.optional(&ty), "VoidCallback?");
    }

    #[test]
    fn test_enum_literal() {
        let d = TypeDescriptor::custom(CustomType::Variant);
        assert_eq!(
            DartMapper.literal(&d, &json!("outline"), "ButtonVariant").as_deref(),
            Some("ButtonVariant.outline")
        );
    }

    #[test]
    fn test_reserved_enum_value_gets_suffix() {
        let mut scope = TypeScope::new();
        let d = TypeDescriptor::string_enum(&["default", "outline"]);
        DartMapper.map(&d, "ButtonVariant", &mut scope).unwrap();
        let decl = scope.render();
        assert!(decl.contains("  default_('default'),"));
        assert!(decl.contains("  outline('outline');"));
        assert_eq!(
            DartMapper.literal(&d, &json!("default"), "ButtonVariant").as_deref(),
            Some("ButtonVariant.default_")
        );
    }
}
