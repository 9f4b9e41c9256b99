//! Transformation options and results.

use crate::assemble::FileManifest;
use crate::error::CodegenError;
use indexmap::IndexMap;
use prism_core::PlatformId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-request generation options. Part of the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Emit typed sources where the platform has an untyped variant.
    pub typescript: bool,
    /// Locales to emit string stubs for. Empty disables i18n output.
    pub locales: Vec<String>,
    pub include_tests: bool,
    pub include_stories: bool,
    /// Routing convention to try first (`app-router`, `standalone`, `kit`, ...).
    pub convention: Option<String>,
    /// Free-form feature flags exposed to templates.
    pub flags: BTreeMap<String, bool>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            typescript: true,
            locales: vec!["en".to_string()],
            include_tests: true,
            include_stories: true,
            convention: None,
            flags: BTreeMap::new(),
        }
    }
}

impl TransformOptions {
    pub fn i18n(&self) -> bool {
        !self.locales.is_empty()
    }

    pub fn with_convention(mut self, convention: impl Into<String>) -> Self {
        self.convention = Some(convention.into());
        self
    }

    pub fn with_flag(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.flags.insert(name.into(), enabled);
        self
    }
}

/// A component that could not be generated in a whole-schema run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentFailure {
    pub component: String,
    pub kind: String,
    pub message: String,
}

impl ComponentFailure {
    pub fn new(component: impl Into<String>, error: &CodegenError) -> Self {
        Self {
            component: component.into(),
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// Everything produced for one (schema, platform, options) triple.
///
/// Immutable once built; the engine shares cached results behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformationResult {
    pub platform: PlatformId,
    pub schema_id: String,
    /// Token files, path → content.
    pub tokens: IndexMap<String, String>,
    /// Component name → generated source, in schema order.
    pub components: IndexMap<String, String>,
    /// Theme bootstrap code.
    pub theme: String,
    /// Helper files, path → content.
    pub utils: IndexMap<String, String>,
    /// Component name → usage snippet.
    pub examples: IndexMap<String, String>,
    /// Every artifact with its destination path.
    pub files: FileManifest,
    pub failures: Vec<ComponentFailure>,
    /// Components whose `platforms.supported` excludes this platform.
    pub skipped: Vec<String>,
}

impl TransformationResult {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failure(&self, component: &str) -> Option<&ComponentFailure> {
        self.failures.iter().find(|f| f.component == component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_options_defaults() {
        let options = TransformOptions::default();
        assert!(options.typescript);
        assert_eq!(options.locales, vec!["en"]);
        assert!(options.i18n());
    }

    #[test]
    fn test_options_deserialize_partial() {
        let options: TransformOptions =
            serde_json::from_value(json!({"locales": [], "convention": "kit"})).unwrap();
        assert!(!options.i18n());
        assert!(options.include_tests);
        assert_eq!(options.convention.as_deref(), Some("kit"));
    }

    #[test]
    fn test_failure_from_error() {
        let err = CodegenError::template_render("react/form/input.hbs", "unclosed block");
        let failure = ComponentFailure::new("Input", &err);
        assert_eq!(failure.kind, "template_render");
        assert!(failure.message.contains("unclosed block"));
    }
}
