//! Path-based file classification.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Semantic category of a changed file, used to pick a title template.
///
/// Declaration order is the order grouped runs commit categories in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Component,
    Api,
    Style,
    Config,
    Docs,
    Test,
    Fix,
    Page,
    General,
}

impl Category {
    /// Every category in enumeration order.
    pub const ALL: [Category; 9] = [
        Self::Component,
        Self::Api,
        Self::Style,
        Self::Config,
        Self::Docs,
        Self::Test,
        Self::Fix,
        Self::Page,
        Self::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Api => "api",
            Self::Style => "style",
            Self::Config => "config",
            Self::Docs => "docs",
            Self::Test => "test",
            Self::Fix => "fix",
            Self::Page => "page",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .copied()
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Category>().map_err(serde::de::Error::custom)
    }
}

const STYLE_EXTENSIONS: [&str; 3] = ["css", "scss", "sass"];
const DOC_EXTENSIONS: [&str; 2] = ["md", "txt"];

/// Classify a repository-relative path.
///
/// Rules are checked in priority order and the first match wins. Directory
/// signals come before filename substrings, so `components/api-config.tsx`
/// is a component, not config. Matching is case-insensitive and accepts
/// either separator.
pub fn classify(path: &str) -> Category {
    let normalized = path.replace('\\', "/").to_lowercase();
    let (dir, file_name) = match normalized.rfind('/') {
        Some(idx) => (&normalized[..idx], &normalized[idx + 1..]),
        None => ("", normalized.as_str()),
    };
    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    let has_dir_segment = |name: &str| dir.split('/').any(|segment| segment == name);

    if has_dir_segment("components") {
        Category::Component
    } else if has_dir_segment("api") || file_name.contains("api.") {
        Category::Api
    } else if file_name.contains("page.") || file_name.contains("layout.") {
        Category::Page
    } else if STYLE_EXTENSIONS.contains(&extension) {
        Category::Style
    } else if file_name.contains("config") {
        Category::Config
    } else if DOC_EXTENSIONS.contains(&extension) || dir.contains("doc") {
        Category::Docs
    } else if ["test", "spec"]
        .iter()
        .any(|needle| file_name.contains(needle) || dir.contains(needle))
    {
        Category::Test
    } else if normalized.contains("fix") {
        Category::Fix
    } else {
        Category::General
    }
}
