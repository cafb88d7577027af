//! Commit message template pools.
//!
//! Title templates carry a `{name}` placeholder that is replaced with the
//! file's base name. Bodies are shared across categories.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::commit::category::Category;
use crate::error::TemplateError;

/// Placeholder substituted with the file's base name.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Category whose pool is used when a category has none of its own.
pub const FALLBACK_CATEGORY: Category = Category::Component;

const COMPONENT_TITLES: &[&str] = &[
    "feat: add {name} component",
    "feat: enhance {name} component",
    "refactor: improve {name} component structure",
    "style: update {name} component styling",
    "feat: implement {name} functionality",
    "refactor: optimize {name} component performance",
];

const API_TITLES: &[&str] = &[
    "feat: add {name} API endpoint",
    "feat: enhance {name} API functionality",
    "fix: resolve {name} API issues",
    "refactor: improve {name} API structure",
    "perf: optimize {name} API performance",
];

const STYLE_TITLES: &[&str] = &[
    "style: update {name} styles",
    "style: improve {name} visual design",
    "style: enhance {name} responsive layout",
    "style: refine {name} theme",
];

const CONFIG_TITLES: &[&str] = &[
    "chore: update {name} configuration",
    "config: adjust {name} settings",
    "build: update {name} build configuration",
    "chore: configure {name} for the current setup",
];

const DOCS_TITLES: &[&str] = &[
    "docs: update {name} documentation",
    "docs: add {name} guide",
    "docs: improve {name} readability",
    "docs: clarify {name} instructions",
];

const TEST_TITLES: &[&str] = &[
    "test: add {name} tests",
    "test: improve {name} test coverage",
    "test: update {name} test cases",
    "fix: resolve {name} test failures",
];

const FIX_TITLES: &[&str] = &[
    "fix: resolve {name} issue",
    "fix: correct {name} behavior",
    "fix: handle {name} edge cases",
    "hotfix: patch {name} bug",
];

const BODIES: &[&str] = &[
    "- Improve code structure and readability\n- Update implementation details\n\
     - Keep behavior consistent with related modules",
    "- Add new functionality\n- Handle edge cases\n- Tidy up naming",
    "- Refactor for maintainability\n- Remove redundant logic\n- Simplify control flow",
    "- Update dependencies and imports\n- Align with project conventions\n- Clean up formatting",
    "- Enhance user experience\n- Improve responsiveness\n- Polish details",
    "- Fix minor inconsistencies\n- Improve error handling\n- Add missing checks",
];

/// Immutable template configuration: title pools per category plus bodies.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    titles: HashMap<Category, Vec<String>>,
    bodies: Vec<String>,
}

/// On-disk override format. Missing entries keep the built-in pools.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TemplateFile {
    titles: BTreeMap<Category, Vec<String>>,
    bodies: Option<Vec<String>>,
}

impl Default for TemplateSet {
    fn default() -> Self {
        let owned = |pool: &[&str]| pool.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let titles = HashMap::from([
            (Category::Component, owned(COMPONENT_TITLES)),
            (Category::Api, owned(API_TITLES)),
            (Category::Style, owned(STYLE_TITLES)),
            (Category::Config, owned(CONFIG_TITLES)),
            (Category::Docs, owned(DOCS_TITLES)),
            (Category::Test, owned(TEST_TITLES)),
            (Category::Fix, owned(FIX_TITLES)),
        ]);

        Self {
            titles,
            bodies: owned(BODIES),
        }
    }
}

impl TemplateSet {
    /// Build a set from explicit pools, validating it.
    pub fn new(
        titles: HashMap<Category, Vec<String>>,
        bodies: Vec<String>,
    ) -> Result<Self, TemplateError> {
        let set = Self { titles, bodies };
        set.validate()?;
        Ok(set)
    }

    /// Load JSON overrides and merge them over the built-in pools.
    ///
    /// ```json
    /// {"titles": {"api": ["feat: wire up {name}"]}, "bodies": ["- Update"]}
    /// ```
    pub fn from_json_file(path: &Path) -> Result<Self, TemplateError> {
        let content = std::fs::read_to_string(path).map_err(TemplateError::ReadFailed)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, TemplateError> {
        let file: TemplateFile = serde_json::from_str(content).map_err(TemplateError::ParseFailed)?;

        let mut set = Self::default();
        for (category, pool) in file.titles {
            debug!("Overriding {} title templates ({} entries)", category, pool.len());
            set.titles.insert(category, pool);
        }
        if let Some(bodies) = file.bodies {
            set.bodies = bodies;
        }

        set.validate()?;
        Ok(set)
    }

    /// Title pool for `category`, falling back to the component pool.
    pub fn titles_for(&self, category: Category) -> &[String] {
        match self.titles.get(&category) {
            Some(pool) if !pool.is_empty() => pool.as_slice(),
            _ => self
                .titles
                .get(&FALLBACK_CATEGORY)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    /// Whether `category` has a pool of its own.
    pub fn has_dedicated_pool(&self, category: Category) -> bool {
        self.titles.get(&category).is_some_and(|pool| !pool.is_empty())
    }

    pub fn bodies(&self) -> &[String] {
        &self.bodies
    }

    fn validate(&self) -> Result<(), TemplateError> {
        if self.bodies.is_empty() {
            return Err(TemplateError::EmptyPool("bodies".into()));
        }
        if !self.has_dedicated_pool(FALLBACK_CATEGORY) {
            return Err(TemplateError::EmptyPool(FALLBACK_CATEGORY.to_string()));
        }
        for (category, pool) in &self.titles {
            if let Some(template) = pool.iter().find(|t| !t.contains(NAME_PLACEHOLDER)) {
                return Err(TemplateError::MissingPlaceholder {
                    category: category.to_string(),
                    template: template.clone(),
                });
            }
        }
        Ok(())
    }
}
