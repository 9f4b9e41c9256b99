//! Engine configuration.
//!
//! Loaded from a JSON or YAML file (picked by extension) and then overlaid by
//! environment variables:
//!
//! - `PRISM_CACHE_CAPACITY`: maximum number of cached results
//! - `PRISM_TEMPLATE_DIR`: directory of `.hbs` component templates
//! - `PRISM_LOG`: default tracing filter (`RUST_LOG` still wins)

use prism_codegen::TransformOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const ENV_CACHE_CAPACITY: &str = "PRISM_CACHE_CAPACITY";
pub const ENV_TEMPLATE_DIR: &str = "PRISM_TEMPLATE_DIR";
pub const ENV_LOG: &str = "PRISM_LOG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported config format for '{}' (expected .json, .yaml or .yml)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Invalid value '{value}' for {var}: {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of cached transformation results.
    pub cache_capacity: usize,
    /// Template directory. Without one every component uses its built-in
    /// generator.
    pub template_dir: Option<PathBuf>,
    /// Default tracing filter.
    pub log_filter: String,
    /// Options used when a caller does not pass any.
    pub default_options: TransformOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 128,
            template_dir: None,
            log_filter: "info".to_string(),
            default_options: TransformOptions::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a config file, choosing the parser by extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = match extension.as_deref() {
            Some("json") => Self::from_json_str(&content)?,
            Some("yaml" | "yml") => Self::from_yaml_str(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        info!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Config file (if any) overlaid by the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };
        config.with_env()
    }

    /// Overlay `PRISM_*` variables from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Overlay `PRISM_*` variables read through `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(ENV_CACHE_CAPACITY) {
            self.cache_capacity = value.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidEnv {
                    var: ENV_CACHE_CAPACITY,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(dir) = lookup(ENV_TEMPLATE_DIR).filter(|d| !d.trim().is_empty()) {
            self.template_dir = Some(PathBuf::from(dir));
        }
        if let Some(filter) = lookup(ENV_LOG).filter(|f| !f.trim().is_empty()) {
            self.log_filter = filter;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.cache_capacity, 128);
        assert_eq!(config.log_filter, "info");
        assert!(config.template_dir.is_none());
        assert!(config.default_options.typescript);
    }

    #[test]
    fn test_yaml_partial() {
        let config = EngineConfig::from_yaml_str(
            "cache_capacity: 8\ndefault_options:\n  locales: []\n  convention: kit\n",
        )
        .unwrap();
        assert_eq!(config.cache_capacity, 8);
        assert_eq!(config.log_filter, "info");
        assert!(!config.default_options.i18n());
        assert_eq!(config.default_options.convention.as_deref(), Some("kit"));
    }

    #[test]
    fn test_from_path_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("prism.json");
        std::fs::write(&json, r#"{"template_dir": "templates"}"#).unwrap();
        let config = EngineConfig::from_path(&json).unwrap();
        assert_eq!(config.template_dir, Some(PathBuf::from("templates")));

        let toml = dir.path().join("prism.toml");
        std::fs::write(&toml, "cache_capacity = 1").unwrap();
        assert!(matches!(
            EngineConfig::from_path(&toml),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_CACHE_CAPACITY, "16"),
            (ENV_TEMPLATE_DIR, "/srv/templates"),
            (ENV_LOG, "prism_engine=debug"),
        ]
        .into_iter()
        .collect();
        let config = EngineConfig::default()
            .with_overrides(|var| env.get(var).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.cache_capacity, 16);
        assert_eq!(config.template_dir, Some(PathBuf::from("/srv/templates")));
        assert_eq!(config.log_filter, "prism_engine=debug");
    }

    #[test]
    fn test_bad_capacity_env() {
        let err = EngineConfig::default()
            .with_overrides(|var| (var == ENV_CACHE_CAPACITY).then(|| "lots".to_string()))
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid value 'lots' for PRISM_CACHE_CAPACITY"));
    }
}
