//! Swift type table (SwiftUI).

use super::{camel, case_ident, collapse, enum_values, pascal, unmappable, TypeMapper, TypeScope};
use crate::error::UnmappableTypeError;
use crate::values::escape_double;
use prism_core::{ComplexType, CustomType, PrimitiveType, TypeDescriptor};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
pub struct SwiftMapper;

const RESERVED: &[&str] = &[
    "Any", "Self", "as", "associatedtype", "await", "break", "case", "catch", "class",
    "continue", "default", "defer", "deinit", "do", "else", "enum", "extension", "fallthrough",
    "false", "fileprivate", "for", "func", "guard", "if", "import", "in", "init", "inout",
    "internal", "is", "let", "nil", "open", "operator", "private", "precedencegroup",
    "protocol", "public", "repeat", "rethrows", "return", "self", "static", "struct",
    "subscript", "super", "switch", "throw", "throws", "true", "try", "typealias", "var",
    "where", "while",
];

impl SwiftMapper {
    fn declare_enum(&self, hint: &str, values: &[Value], scope: &mut TypeScope) -> String {
        let raw = if values.iter().all(Value::is_number) {
            "Double"
        } else {
            "String"
        };
        let mut lines = vec![format!("enum {}: {}, CaseIterable {{", hint, raw)];
        for value in values {
            let raw = case_ident(value);
            let ident = self.ident(&raw);
            let label = prism_core::value_label(value);
            match value {
                Value::Number(n) => lines.push(format!("    case {} = {}", ident, n)),
                _ if raw == label => lines.push(format!("    case {}", ident)),
                _ => lines.push(format!("    case {} = \"{}\"", ident, escape_double(&label))),
            }
        }
        lines.push("}".to_string());
        scope.declare(hint, lines.join("\n"))
    }

    fn declare_union(
        &self,
        hint: &str,
        members: &[String],
        scope: &mut TypeScope,
    ) -> String {
        let mut lines = vec![format!("enum {} {{", hint)];
        let mut used: Vec<String> = Vec::new();
        for (index, member) in members.iter().enumerate() {
            let mut case = self.ident(&camel(&member_label(member)));
            if case.is_empty() || used.contains(&case) {
                case = format!("option{}", index + 1);
            }
            lines.push(format!("    case {}({})", case, member));
            used.push(case);
        }
        lines.push("}".to_string());
        scope.declare(hint, lines.join("\n"))
    }
}

/// Alphanumeric label of a mapped type, used for union case names.
fn member_label(ty: &str) -> String {
    ty.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

impl TypeMapper for SwiftMapper {
    fn target(&self) -> &'static str {
        "swift"
    }

    fn map(
        &self,
        descriptor: &TypeDescriptor,
        hint: &str,
        scope: &mut TypeScope,
    ) -> Result<String, UnmappableTypeError> {
        if let Some(values) = enum_values(self.target(), descriptor)? {
            if values.iter().all(Value::is_boolean) {
                return Ok("Bool".to_string());
            }
            return Ok(self.declare_enum(hint, &values, scope));
        }

        match descriptor {
            TypeDescriptor::Primitive { primitive, .. } => Ok(match primitive {
                PrimitiveType::String => "String",
                PrimitiveType::Number => "Double",
                PrimitiveType::Boolean => "Bool",
            }
            .to_string()),
            TypeDescriptor::Complex { complex, signature } => match complex {
                ComplexType::Function => {
                    let Some(signature) = signature else {
                        return Ok("() -> Void".to_string());
                    };
                    let params = signature
                        .params
                        .iter()
                        .map(|(name, ty)| self.map(ty, &format!("{}{}", hint, pascal(name)), scope))
                        .collect::<Result<Vec<_>, _>>()?;
                    let returns = match &signature.returns {
                        Some(ty) => self.map(ty, &format!("{}Result", hint), scope)?,
                        None => "Void".to_string(),
                    };
                    Ok(format!("({}) -> {}", params.join(", "), returns))
                }
                ComplexType::Node | ComplexType::Element => Ok("AnyView".to_string()),
                ComplexType::Ref => Ok("FocusState<Bool>.Binding".to_string()),
                ComplexType::Date => Ok("Date".to_string()),
                ComplexType::File => Ok("URL".to_string()),
            },
            TypeDescriptor::Custom { custom, .. } => Ok(match custom {
                CustomType::Color => "Color",
                CustomType::Url => "URL",
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
                Ok(self.declare_union(hint, &members, scope))
            }
            TypeDescriptor::Array { items, .. } => {
                let inner = self.map(items, &format!("{}Item", hint), scope)?;
                Ok(format!("[{}]", inner))
            }
            TypeDescriptor::Object { properties, strict } => {
                if !strict {
                    return Ok("[String: Any]".to_string());
                }
                let mut lines = vec![format!("struct {} {{", hint)];
                for (name, ty) in properties {
                    let mapped = self.map(ty, &format!("{}{}", hint, pascal(name)), scope)?;
                    lines.push(format!("    let {}: {}", self.ident(&camel(name)), mapped));
                }
                lines.push("}".to_string());
                Ok(scope.declare(hint, lines.join("\n")))
            }
        }
    }

    fn literal(&self, descriptor: &TypeDescriptor, value: &Value, hint: &str) -> Option<String> {
        if let Ok(Some(values)) = enum_values(self.target(), descriptor) {
            return match value {
                Value::Bool(b) if values.contains(value) => Some(b.to_string()),
                _ if values.contains(value) => Some(format!(".{}", self.ident(&case_ident(value)))),
                _ => None,
            };
        }
        match (descriptor, value) {
            (TypeDescriptor::Custom { custom: CustomType::Color, .. }, Value::String(s)) => {
                Some(format!("Color(hex: \"{}\")", escape_double(s)))
            }
            (TypeDescriptor::Custom { custom: CustomType::Url, .. }, Value::String(s)) => {
                Some(format!("URL(string: \"{}\")!", escape_double(s)))
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
            (_, Value::String(s)) => Some(format!("\"{}\"", escape_double(s))),
            (_, Value::Number(n)) => Some(n.to_string()),
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
    fn test_size_becomes_named_enum() {
        let mut scope = TypeScope::new();
        let ty = SwiftMapper
            .map(&TypeDescriptor::custom(CustomType::Size), "ButtonSize", &mut scope)
            .unwrap();
        assert_eq!(ty, "ButtonSize");
        let decl = scope.render();
        assert!(decl.starts_with("enum ButtonSize: String, CaseIterable {"));
        assert!(decl.contains("    case xs\n"));
        assert!(decl.contains("    case xl\n"));
    }

    #[test]
    fn test_enum_literal_uses_case() {
        let d = TypeDescriptor::custom(CustomType::Size);
        assert_eq!(SwiftMapper.literal(&d, &json!("md"), "ButtonSize").as_deref(), Some(".md"));
        assert_eq!(SwiftMapper.literal(&d, &json!("huge"), "ButtonSize"), None);
    }

    #[test]
    fn test_heterogeneous_union_declares_enum() {
        let mut scope = TypeScope::new();
        let d = TypeDescriptor::union(vec![TypeDescriptor::string(), TypeDescriptor::number()]);
        let ty = SwiftMapper.map(&d, "InputValue", &mut scope).unwrap();
        assert_eq!(ty, "InputValue");
        insta::assert_snapshot!(scope.render(), @r###"
        enum InputValue {
            case string(String)
            case double(Double)
        }
        "###);
    }

    #[test]
    fn test_strict_object_declares_struct() {
        let mut fields = IndexMap::new();
        fields.insert("first_name".to_string(), TypeDescriptor::string());
        let mut scope = TypeScope::new();
        let ty = SwiftMapper
            .map(&TypeDescriptor::object(fields, true), "UserInfo", &mut scope)
            .unwrap();
        assert_eq!(ty, "UserInfo");
        assert!(scope.render().contains("let firstName: String"));
    }

    #[test]
    fn test_optional_closure_is_parenthesised() {
        assert_eq!(SwiftMapper.optional("() -> Void"), "(() -> Void)?");
        assert_eq!(SwiftMapper.optional("String"), "String?");
    }

    #[test]
    fn test_reserved_enum_case_is_backticked() {
        let mut scope = TypeScope::new();
        let d = TypeDescriptor::string_enum(&["default", "outline"]);
        SwiftMapper.map(&d, "ButtonVariant", &mut scope).unwrap();
        let decl = scope.render();
        assert!(decl.contains("    case `default`\n"));
        assert!(decl.contains("    case outline\n"));
        assert_eq!(
            SwiftMapper.literal(&d, &json!("default"), "ButtonVariant").as_deref(),
            Some(".`default`")
        );
        assert_eq!(SwiftMapper.ident("class"), "`class`");
    }
}
