//! Template sources.
//!
//! The resolver only needs two capabilities: ask whether a template exists and
//! read it. Missing templates are an ordinary `false`, not an error.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

/// Read-only template store addressed by relative `/`-separated paths.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn exists(&self, path: &str) -> bool;

    async fn read(&self, path: &str) -> io::Result<String>;
}

/// Templates under a directory on disk.
#[derive(Debug, Clone)]
pub struct FsTemplateSource {
    root: PathBuf,
}

impl FsTemplateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        // Reject absolute paths and parent traversal.
        if path.starts_with('/') || path.split('/').any(|s| s == "..") {
            return None;
        }
        Some(self.root.join(path))
    }
}

#[async_trait]
impl TemplateSource for FsTemplateSource {
    async fn exists(&self, path: &str) -> bool {
        let Some(full) = self.resolve(path) else {
            return false;
        };
        match tokio::fs::metadata(&full).await {
            Ok(meta) => meta.is_file(),
            Err(_) => false,
        }
    }

    async fn read(&self, path: &str) -> io::Result<String> {
        let full = self.resolve(path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("invalid template path '{}'", path))
        })?;
        tokio::fs::read_to_string(full).await
    }
}

/// In-process template map, mostly for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateSource {
    templates: HashMap<String, String>,
}

impl MemoryTemplateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, source: impl Into<String>) {
        self.templates.insert(path.into(), source.into());
    }
}

#[async_trait]
impl TemplateSource for MemoryTemplateSource {
    async fn exists(&self, path: &str) -> bool {
        self.templates.contains_key(path)
    }

    async fn read(&self, path: &str) -> io::Result<String> {
        self.templates
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }
}

/// A source with no templates; every component uses its built-in generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTemplates;

#[async_trait]
impl TemplateSource for NoTemplates {
    async fn exists(&self, _path: &str) -> bool {
        false
    }

    async fn read(&self, path: &str) -> io::Result<String> {
        Err(io::Error::new(io::ErrorKind::NotFound, path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fs_source_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("react/form")).unwrap();
        std::fs::write(dir.path().join("react/form/input.hbs"), "<input />").unwrap();

        let source = FsTemplateSource::new(dir.path());
        assert!(source.exists("react/form/input.hbs").await);
        assert!(!source.exists("react/form").await);
        assert!(!source.exists("react/form/missing.hbs").await);
        assert!(!source.exists("../outside.hbs").await);
        assert_eq!(source.read("react/form/input.hbs").await.unwrap(), "<input />");
    }

    #[tokio::test]
    async fn test_memory_source() {
        let source = MemoryTemplateSource::new().with("vue/layout/card.hbs", "<div/>");
        assert!(source.exists("vue/layout/card.hbs").await);
        assert!(!source.exists("vue/layout/grid.hbs").await);
        assert!(source.read("vue/layout/grid.hbs").await.is_err());
    }

    #[tokio::test]
    async fn test_no_templates() {
        assert!(!NoTemplates.exists("anything.hbs").await);
    }
}
