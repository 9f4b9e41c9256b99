//! Target platform identifiers.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of a target platform (e.g. `react`, `ios-swift`).
///
/// Identifiers are normalised to trimmed lowercase so registry lookups are
/// case-insensitive. The set is open: runtime-registered adapters bring their
/// own identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PlatformId(String);

impl PlatformId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The built-in platform this identifier names, if any.
    pub fn builtin(&self) -> Option<BuiltinPlatform> {
        BuiltinPlatform::from_id(&self.0)
    }
}

impl From<String> for PlatformId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for PlatformId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<PlatformId> for String {
    fn from(value: PlatformId) -> Self {
        value.0
    }
}

impl From<BuiltinPlatform> for PlatformId {
    fn from(value: BuiltinPlatform) -> Self {
        Self(value.as_str().to_string())
    }
}

impl Borrow<str> for PlatformId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlatformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Platforms that ship with a built-in adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinPlatform {
    React,
    Vue,
    Angular,
    Svelte,
    Flutter,
    IosSwift,
    AndroidKotlin,
    Css,
    Tailwind,
}

impl BuiltinPlatform {
    pub const ALL: [BuiltinPlatform; 9] = [
        Self::React,
        Self::Vue,
        Self::Angular,
        Self::Svelte,
        Self::Flutter,
        Self::IosSwift,
        Self::AndroidKotlin,
        Self::Css,
        Self::Tailwind,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::React => "react",
            Self::Vue => "vue",
            Self::Angular => "angular",
            Self::Svelte => "svelte",
            Self::Flutter => "flutter",
            Self::IosSwift => "ios-swift",
            Self::AndroidKotlin => "android-kotlin",
            Self::Css => "css",
            Self::Tailwind => "tailwind",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == id)
    }

    pub fn family(&self) -> PlatformFamily {
        match self {
            Self::React | Self::Vue | Self::Angular | Self::Svelte => PlatformFamily::Web,
            Self::Flutter => PlatformFamily::Mobile,
            Self::IosSwift | Self::AndroidKotlin => PlatformFamily::Native,
            Self::Css | Self::Tailwind => PlatformFamily::Stylesheet,
        }
    }
}

impl fmt::Display for BuiltinPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad grouping used for platform flags in template contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformFamily {
    Web,
    Mobile,
    Native,
    Stylesheet,
}
