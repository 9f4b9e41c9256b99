//! Static per-platform guidance returned by `ai_recommendations`.

use indexmap::IndexMap;
use prism_core::PlatformId;
use serde::Serialize;

/// Canonical patterns every platform provides a snippet for.
pub const PATTERNS: [&str; 3] = ["form", "list", "dashboard"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendations {
    pub platform: PlatformId,
    /// Idiomatic component set for the platform.
    pub components: Vec<String>,
    pub layout_patterns: Vec<String>,
    /// Pattern name → canonical snippet.
    pub patterns: IndexMap<String, String>,
}

impl Recommendations {
    pub fn new(platform: impl Into<PlatformId>) -> Self {
        Self {
            platform: platform.into(),
            components: Vec::new(),
            layout_patterns: Vec::new(),
            patterns: IndexMap::new(),
        }
    }

    pub fn components(mut self, names: &[&str]) -> Self {
        self.components = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn layouts(mut self, names: &[&str]) -> Self {
        self.layout_patterns = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn pattern(mut self, name: &str, snippet: &str) -> Self {
        self.patterns.insert(name.to_string(), snippet.trim_start_matches('\n').to_string());
        self
    }

    /// Every canonical pattern has a non-empty snippet.
    pub fn is_complete(&self) -> bool {
        PATTERNS
            .iter()
            .all(|p| self.patterns.get(*p).is_some_and(|s| !s.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completeness() {
        let partial = Recommendations::new("react").pattern("form", "<form />");
        assert!(!partial.is_complete());
        let full = partial.pattern("list", "<ul />").pattern("dashboard", "<main />");
        assert!(full.is_complete());
    }
}
