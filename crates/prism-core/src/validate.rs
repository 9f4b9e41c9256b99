//! Shape validation for schemas and component specifications.
//!
//! Schema-level problems (token references, duplicate names) reject the whole
//! schema. Component-level problems produce a [`SpecError`] per component so a
//! batch can skip the offending component and carry on.

use crate::errors::{SchemaError, SpecError};
use crate::schema::{ComponentSpec, TokenSchema};
use crate::tokens::FlatTokens;
use crate::types::{PrimitiveType, TypeDescriptor};
use serde_json::Value;
use std::collections::HashSet;

/// Outcome of validating a whole schema.
#[derive(Debug, Clone)]
pub struct ValidatedSchema {
    /// Resolved, flattened tokens.
    pub tokens: FlatTokens,
    /// Components that failed validation, in schema order.
    pub invalid: Vec<SpecError>,
}

impl ValidatedSchema {
    pub fn is_invalid(&self, component: &str) -> bool {
        self.invalid.iter().any(|e| e.component == component)
    }
}

/// Validate a schema. Token errors are fatal, component errors are collected.
pub fn validate_schema(schema: &TokenSchema) -> Result<ValidatedSchema, SchemaError> {
    if schema.id.trim().is_empty() {
        return Err(SchemaError::EmptyId);
    }

    let tokens = FlatTokens::resolve(&schema.tokens)?;

    let mut seen = HashSet::new();
    for spec in schema.components.values() {
        if !seen.insert(spec.name.as_str()) {
            return Err(SchemaError::DuplicateComponent {
                name: spec.name.clone(),
            });
        }
    }

    let invalid = schema
        .components
        .iter()
        .filter_map(|(key, spec)| validate_component_entry(key, spec).err())
        .collect();

    Ok(ValidatedSchema { tokens, invalid })
}

fn validate_component_entry(key: &str, spec: &ComponentSpec) -> Result<(), SpecError> {
    let mut issues = component_issues(spec);
    if key != spec.name {
        issues.push(format!(
            "registered under key '{}' but named '{}'",
            key, spec.name
        ));
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(SpecError::new(spec.name.clone(), issues))
    }
}

/// Validate a single component specification.
pub fn validate_component(spec: &ComponentSpec) -> Result<(), SpecError> {
    let issues = component_issues(spec);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(SpecError::new(spec.name.clone(), issues))
    }
}

fn component_issues(spec: &ComponentSpec) -> Vec<String> {
    let mut issues = Vec::new();

    if !is_pascal_case(&spec.name) {
        issues.push(format!("name '{}' is not PascalCase", spec.name));
    }

    if spec.accessibility.role.trim().is_empty() {
        issues.push("accessibility role is required".to_string());
    }

    for interaction in &spec.accessibility.keyboard {
        if interaction.key.trim().is_empty() || interaction.action.trim().is_empty() {
            issues.push("keyboard interactions need both a key and an action".to_string());
        }
    }

    for (name, prop) in &spec.props {
        if !is_identifier(name) {
            issues.push(format!("prop name '{}' is not a valid identifier", name));
        }
        descriptor_issues(&format!("prop '{}'", name), &prop.descriptor, &mut issues);

        if let Some(default) = &prop.default {
            if !value_fits(&prop.descriptor, default) {
                issues.push(format!(
                    "default for prop '{}' does not match its type {}",
                    name,
                    prop.descriptor.summary()
                ));
            }
        }

        if let Some(deprecation) = &prop.deprecated {
            if deprecation.since.trim().is_empty() || deprecation.reason.trim().is_empty() {
                issues.push(format!(
                    "deprecation of prop '{}' needs 'since' and 'reason'",
                    name
                ));
            }
            if let Some(alternative) = &deprecation.alternative {
                if !spec.props.contains_key(alternative) {
                    issues.push(format!(
                        "prop '{}' names unknown alternative '{}'",
                        name, alternative
                    ));
                }
            }
        }
    }

    for (axis, values) in &spec.variants.simple {
        if values.is_empty() {
            issues.push(format!("variant axis '{}' has no values", axis));
        }
    }

    for (index, compound) in spec.variants.compound.iter().enumerate() {
        if compound.conditions.is_empty() {
            issues.push(format!("compound variant #{} has no conditions", index));
        }
        for (prop_name, expected) in &compound.conditions {
            match spec.props.get(prop_name) {
                None => issues.push(format!(
                    "compound variant #{} references unknown prop '{}'",
                    index, prop_name
                )),
                Some(prop) => {
                    if !value_fits(&prop.descriptor, expected) {
                        issues.push(format!(
                            "compound variant #{} expects {} for prop '{}', which its type does not allow",
                            index, expected, prop_name
                        ));
                    }
                }
            }
        }
    }

    issues
}

fn descriptor_issues(context: &str, descriptor: &TypeDescriptor, issues: &mut Vec<String>) {
    match descriptor {
        TypeDescriptor::Primitive {
            enum_values: Some(values),
            ..
        } if values.is_empty() => {
            issues.push(format!("{} declares an empty enum", context));
        }
        TypeDescriptor::Custom {
            values: Some(values),
            ..
        } if values.is_empty() => {
            issues.push(format!("{} declares an empty value set", context));
        }
        TypeDescriptor::Union { types } => {
            if types.is_empty() {
                issues.push(format!("{} declares an empty union", context));
            }
            for member in types {
                descriptor_issues(context, member, issues);
            }
        }
        TypeDescriptor::Array {
            items,
            min_items,
            max_items,
            ..
        } => {
            if let (Some(min), Some(max)) = (min_items, max_items) {
                if min > max {
                    issues.push(format!("{} has minItems greater than maxItems", context));
                }
            }
            descriptor_issues(context, items, issues);
        }
        TypeDescriptor::Object { properties, .. } => {
            for (field, nested) in properties {
                if !is_identifier(field) {
                    issues.push(format!("{} has invalid field name '{}'", context, field));
                }
                descriptor_issues(context, nested, issues);
            }
        }
        TypeDescriptor::Complex {
            signature: Some(signature),
            ..
        } => {
            for nested in signature.params.values() {
                descriptor_issues(context, nested, issues);
            }
            if let Some(returns) = &signature.returns {
                descriptor_issues(context, returns, issues);
            }
        }
        _ => {}
    }
}

/// Loose structural check of a JSON value against a descriptor.
fn value_fits(descriptor: &TypeDescriptor, value: &Value) -> bool {
    match descriptor {
        TypeDescriptor::Primitive {
            enum_values: Some(values),
            ..
        } => values.contains(value),
        TypeDescriptor::Primitive { primitive, .. } => matches!(
            (primitive, value),
            (PrimitiveType::String, Value::String(_))
                | (PrimitiveType::Number, Value::Number(_))
                | (PrimitiveType::Boolean, Value::Bool(_))
        ),
        TypeDescriptor::Custom { .. } => match (descriptor.enumerated_values(), value) {
            (Some(allowed), Value::String(s)) => allowed.contains(s),
            (None, Value::String(_)) => true,
            _ => false,
        },
        TypeDescriptor::Union { types } => types.iter().any(|t| value_fits(t, value)),
        TypeDescriptor::Array { items, .. } => match value {
            Value::Array(elements) => elements.iter().all(|e| value_fits(items, e)),
            _ => false,
        },
        TypeDescriptor::Object { properties, strict } => match value {
            Value::Object(map) => map.iter().all(|(k, v)| match properties.get(k) {
                Some(field) => value_fits(field, v),
                None => !strict,
            }),
            _ => false,
        },
        TypeDescriptor::Complex { .. } => true,
    }
}

fn is_pascal_case(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ComponentCategory, CompoundVariant, PropDefinition};
    use crate::types::CustomType;
    use indexmap::IndexMap;
    use serde_json::json;

    fn button() -> ComponentSpec {
        ComponentSpec::new("Button", ComponentCategory::Interactive)
            .with_role("button")
            .with_prop(
                "size",
                PropDefinition::new(TypeDescriptor::custom(CustomType::Size))
                    .with_default(json!("md")),
            )
            .with_prop("disabled", PropDefinition::new(TypeDescriptor::boolean()))
    }

    #[test]
    fn test_valid_component() {
        assert!(validate_component(&button()).is_ok());
    }

    #[test]
    fn test_compound_condition_must_reference_existing_prop() {
        let mut spec = button();
        let mut conditions = IndexMap::new();
        conditions.insert("tone".to_string(), json!("loud"));
        spec.variants.compound.push(CompoundVariant {
            conditions,
            class_name: Some("x".into()),
            description: None,
        });
        let err = validate_component(&spec).unwrap_err();
        assert_eq!(err.component, "Button");
        assert!(err.issues[0].contains("unknown prop 'tone'"));
    }

    #[test]
    fn test_compound_condition_value_must_fit_prop() {
        let mut spec = button();
        let mut conditions = IndexMap::new();
        conditions.insert("size".to_string(), json!("huge"));
        spec.variants.compound.push(CompoundVariant {
            conditions,
            class_name: None,
            description: None,
        });
        assert!(validate_component(&spec).is_err());
    }

    #[test]
    fn test_missing_role_and_bad_name() {
        let spec = ComponentSpec::new("date-picker", ComponentCategory::Form);
        let err = validate_component(&spec).unwrap_err();
        assert_eq!(err.issues.len(), 2);
    }

    #[test]
    fn test_default_must_match_type() {
        let spec = button().with_prop(
            "count",
            PropDefinition::new(TypeDescriptor::number()).with_default(json!("three")),
        );
        assert!(validate_component(&spec).is_err());
    }

    #[test]
    fn test_empty_union_is_rejected() {
        let spec = button().with_prop(
            "mode",
            PropDefinition::new(TypeDescriptor::union(vec![])),
        );
        let err = validate_component(&spec).unwrap_err();
        assert!(err.issues[0].contains("empty union"));
    }

    #[test]
    fn test_schema_collects_invalid_components() {
        let mut schema = TokenSchema::new("acme");
        schema.add_component(button());
        schema.add_component(ComponentSpec::new("Card", ComponentCategory::Layout));
        let validated = validate_schema(&schema).unwrap();
        assert_eq!(validated.invalid.len(), 1);
        assert!(validated.is_invalid("Card"));
        assert!(!validated.is_invalid("Button"));
    }

    #[test]
    fn test_schema_rejects_empty_id() {
        let schema = TokenSchema::new("  ");
        assert_eq!(validate_schema(&schema).unwrap_err(), SchemaError::EmptyId);
    }

    #[test]
    fn test_key_must_match_name() {
        let mut schema = TokenSchema::new("acme");
        schema.components.insert("Btn".into(), button());
        let validated = validate_schema(&schema).unwrap();
        assert!(validated.invalid[0].issues[0].contains("key 'Btn'"));
    }
}
