//! Error types for schemas and component specifications.

use thiserror::Error;

/// Schema-level errors. Any of these rejects the whole schema before
/// transformation begins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Schema id must not be empty")]
    EmptyId,

    #[error("Invalid token at '{path}': {reason}")]
    InvalidToken { path: String, reason: String },

    #[error("Primitive token '{path}' must hold a raw value, found a reference")]
    ReferenceInPrimitive { path: String },

    #[error("Token '{path}' references '{reference}', which does not resolve to a primitive value")]
    DanglingReference { path: String, reference: String },

    #[error("Circular token reference: {}", .cycle.join(" -> "))]
    CircularReference { cycle: Vec<String> },

    #[error("Token name '{name}' is produced by both '{first}' and '{second}'")]
    DuplicateTokenName {
        name: String,
        first: String,
        second: String,
    },

    #[error("Component name '{name}' is declared more than once")]
    DuplicateComponent { name: String },
}

/// A component specification failed shape validation.
///
/// Carries every issue found, not just the first, so a batch report can show
/// the full picture for the skipped component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid specification for component '{component}': {}", .issues.join("; "))]
pub struct SpecError {
    pub component: String,
    pub issues: Vec<String>,
}

impl SpecError {
    pub fn new(component: impl Into<String>, issues: Vec<String>) -> Self {
        Self {
            component: component.into(),
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circular_reference_message() {
        let err = SchemaError::CircularReference {
            cycle: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "Circular token reference: a -> b -> a");
    }

    #[test]
    fn test_spec_error_lists_all_issues() {
        let err = SpecError::new("Button", vec!["first".into(), "second".into()]);
        assert!(err.to_string().contains("first; second"));
    }
}
