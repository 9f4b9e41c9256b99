//! Error types for code generation.

use prism_core::{SchemaError, SpecError};
use thiserror::Error;

/// Result type alias for codegen operations.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// Errors that can occur while transforming a schema for a platform.
#[derive(Error, Debug)]
pub enum CodegenError {
    /// No adapter is registered under the requested identifier.
    #[error("Unknown platform '{platform}' (registered: {})", .registered.join(", "))]
    UnknownPlatform {
        platform: String,
        registered: Vec<String>,
    },

    /// A template exists but failed to compile or render. Never falls back.
    #[error("Template '{path}' failed to render: {message}")]
    TemplateRender { path: String, message: String },

    /// A prop type has no representation on the target.
    #[error(transparent)]
    UnmappableType(#[from] UnmappableTypeError),

    /// The component specification failed validation.
    #[error(transparent)]
    InvalidSpecification(#[from] SpecError),

    /// The schema failed validation (token references, duplicate names).
    #[error("Invalid schema: {0}")]
    InvalidSchema(#[from] SchemaError),

    /// Reading a template failed after it was reported to exist.
    #[error("Template source error for '{path}': {source}")]
    TemplateSource {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodegenError {
    /// Short machine-readable kind, used in failure reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownPlatform { .. } => "unknown_platform",
            Self::TemplateRender { .. } => "template_render",
            Self::UnmappableType(_) => "unmappable_type",
            Self::InvalidSpecification(_) => "invalid_specification",
            Self::InvalidSchema(_) => "invalid_schema",
            Self::TemplateSource { .. } => "template_source",
            Self::Json(_) => "json",
        }
    }

    pub fn template_render(path: impl Into<String>, message: impl ToString) -> Self {
        Self::TemplateRender {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// A type descriptor could not be expressed in a target's type syntax.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot map {descriptor} to {target}: {reason}")]
pub struct UnmappableTypeError {
    pub target: String,
    pub descriptor: String,
    pub reason: String,
}

impl UnmappableTypeError {
    pub fn new(
        target: impl Into<String>,
        descriptor: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            descriptor: descriptor.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_platform_lists_registered() {
        let err = CodegenError::UnknownPlatform {
            platform: "gtk4".into(),
            registered: vec!["react".into(), "vue".into()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown platform 'gtk4' (registered: react, vue)"
        );
        assert_eq!(err.kind(), "unknown_platform");
    }

    #[test]
    fn test_unmappable_is_transparent() {
        let err: CodegenError =
            UnmappableTypeError::new("swift", "union<>", "empty union").into();
        assert_eq!(err.to_string(), "Cannot map union<> to swift: empty union");
    }
}
