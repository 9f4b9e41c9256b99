//! Error types for the engine.

use crate::config::ConfigError;
use prism_codegen::CodegenError;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Adapter resolution or transformation failed.
    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The schema or options could not be serialized for the cache key.
    #[error("Failed to compute cache key: {0}")]
    CacheKey(#[from] serde_json::Error),

    /// A cached computation failed; every caller that awaited it gets the
    /// same error.
    #[error(transparent)]
    Shared(Arc<EngineError>),
}

impl EngineError {
    /// The codegen error underneath, looking through shared failures.
    pub fn codegen(&self) -> Option<&CodegenError> {
        match self {
            Self::Codegen(err) => Some(err),
            Self::Shared(inner) => inner.codegen(),
            _ => None,
        }
    }

    /// Whether this is an unknown-platform dispatch failure.
    pub fn is_unknown_platform(&self) -> bool {
        matches!(self.codegen(), Some(CodegenError::UnknownPlatform { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_errors_expose_codegen_kind() {
        let err = EngineError::Shared(Arc::new(EngineError::from(CodegenError::UnknownPlatform {
            platform: "gtk4".into(),
            registered: vec!["react".into()],
        })));
        assert!(err.is_unknown_platform());
        assert_eq!(err.codegen().map(CodegenError::kind), Some("unknown_platform"));
        assert!(err.to_string().starts_with("Unknown platform 'gtk4'"));
    }
}
