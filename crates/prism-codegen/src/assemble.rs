//! Artifact assembly: component code plus companion files into a manifest.

use crate::backend::PlatformBackend;
use crate::context::ComponentContext;
use crate::error::Result;
use crate::result::TransformOptions;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// What a manifest entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Component,
    Types,
    Styles,
    Test,
    Story,
    Locale,
    Tokens,
    Theme,
    Util,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Types => "types",
            Self::Styles => "styles",
            Self::Test => "test",
            Self::Story => "story",
            Self::Locale => "locale",
            Self::Tokens => "tokens",
            Self::Theme => "theme",
            Self::Util => "util",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file to be written by the scaffolding layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// Path relative to the project root.
    pub path: String,
    pub content: String,
    pub kind: ArtifactKind,
}

/// Ordered list of generated files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileManifest {
    pub files: Vec<ManifestEntry>,
}

impl FileManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file. A later entry with the same path replaces the earlier one.
    pub fn push(&mut self, path: impl Into<String>, content: impl Into<String>, kind: ArtifactKind) {
        let path = path.into();
        let entry = ManifestEntry {
            content: content.into(),
            path,
            kind,
        };
        match self.files.iter_mut().find(|f| f.path == entry.path) {
            Some(existing) => *existing = entry,
            None => self.files.push(entry),
        }
    }

    pub fn extend(&mut self, other: FileManifest) {
        for entry in other.files {
            self.push(entry.path, entry.content, entry.kind);
        }
    }

    pub fn get(&self, path: &str) -> Option<&ManifestEntry> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn of_kind(&self, kind: ArtifactKind) -> impl Iterator<Item = &ManifestEntry> {
        self.files.iter().filter(move |f| f.kind == kind)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.path.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Packages one component's artifacts using its platform's layout.
pub struct ArtifactAssembler<'a> {
    backend: &'a dyn PlatformBackend,
    options: &'a TransformOptions,
}

impl<'a> ArtifactAssembler<'a> {
    pub fn new(backend: &'a dyn PlatformBackend, options: &'a TransformOptions) -> Self {
        Self { backend, options }
    }

    pub fn assemble(&self, ctx: &ComponentContext, code: &str) -> Result<FileManifest> {
        let mut manifest = FileManifest::new();
        manifest.push(self.backend.component_path(ctx), code, ArtifactKind::Component);

        if let Some(types) = self.backend.types(ctx) {
            manifest.push(types.path, types.content, ArtifactKind::Types);
        }
        if let Some(styles) = self.backend.styles(ctx) {
            manifest.push(styles.path, styles.content, ArtifactKind::Styles);
        }
        if self.options.include_tests {
            if let Some(test) = self.backend.test(ctx) {
                manifest.push(test.path, test.content, ArtifactKind::Test);
            }
        }
        if self.options.include_stories {
            if let Some(story) = self.backend.story(ctx) {
                manifest.push(story.path, story.content, ArtifactKind::Story);
            }
        }
        for locale in &self.options.locales {
            manifest.push(
                self.backend.locale_path(locale, ctx),
                locale_stub(ctx)?,
                ArtifactKind::Locale,
            );
        }
        Ok(manifest)
    }
}

/// Source strings of a component as a JSON object, ready for translation.
pub fn locale_stub(ctx: &ComponentContext) -> Result<String> {
    let mut root = IndexMap::new();
    root.insert(ctx.name.clone(), &ctx.strings);
    Ok(serde_json::to_string_pretty(&root)?)
}
