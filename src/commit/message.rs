//! Templated commit message generation.

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::commit::category::Category;
use crate::commit::templates::{NAME_PLACEHOLDER, TemplateSet};

/// A generated commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    pub title: String,
    pub body: String,
}

impl CommitMessage {
    /// Format the message for git: title, blank line, body.
    pub fn format(&self) -> String {
        if self.body.trim().is_empty() {
            return self.title.clone();
        }
        format!("{}\n\n{}", self.title, self.body.trim())
    }
}

/// Source of choices for template selection.
///
/// Production code picks uniformly at random; tests substitute a
/// deterministic picker to assert exact messages.
pub trait Picker {
    fn pick<'a, T>(&mut self, options: &'a [T]) -> Option<&'a T>;
}

/// Uniformly random picker backed by an OS-seeded RNG.
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl Picker for RandomPicker {
    fn pick<'a, T>(&mut self, options: &'a [T]) -> Option<&'a T> {
        options.choose(&mut self.rng)
    }
}

/// Base name of a file: last path segment with its final extension removed.
///
/// Names without an extension (and dotfiles like `.env`) come back unchanged.
pub fn base_name(file_name: &str) -> String {
    let path = Path::new(file_name);
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string())
}

/// Generate a commit message for a file of the given category.
///
/// The title comes from the category's pool (or the fallback pool) with the
/// base name substituted for every placeholder; the body is picked
/// independently from the shared body pool.
pub fn generate<P: Picker>(
    templates: &TemplateSet,
    picker: &mut P,
    category: Category,
    file_name: &str,
) -> CommitMessage {
    let name = base_name(file_name);

    let title = picker
        .pick(templates.titles_for(category))
        .map(|template| template.replace(NAME_PLACEHOLDER, &name))
        .unwrap_or_else(|| format!("chore: update {}", name));

    let body = picker
        .pick(templates.bodies())
        .cloned()
        .unwrap_or_default();

    CommitMessage { title, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always picks the option at a fixed index (clamped to the last).
    struct IndexPicker(usize);

    impl Picker for IndexPicker {
        fn pick<'a, T>(&mut self, options: &'a [T]) -> Option<&'a T> {
            options.get(self.0.min(options.len().saturating_sub(1)))
        }
    }

    #[test]
    fn test_base_name_strips_extension() {
        assert_eq!(base_name("BlogCard.tsx"), "BlogCard");
        assert_eq!(base_name("components/blog/BlogCard.tsx"), "BlogCard");
        assert_eq!(base_name("jest.config.js"), "jest.config");
    }

    #[test]
    fn test_base_name_without_extension_is_unchanged() {
        assert_eq!(base_name("Makefile"), "Makefile");
        assert_eq!(base_name(".env"), ".env");
        assert_eq!(base_name("scripts/deploy"), "deploy");
    }

    #[test]
    fn test_generate_with_deterministic_picker() {
        let templates = TemplateSet::default();
        let msg = generate(
            &templates,
            &mut IndexPicker(0),
            Category::Component,
            "components/blog/BlogCard.tsx",
        );
        assert_eq!(msg.title, "feat: add BlogCard component");
        assert_eq!(msg.body, templates.bodies()[0]);
    }

    #[test]
    fn test_generate_fallback_category_uses_component_pool() {
        let templates = TemplateSet::default();
        let msg = generate(&templates, &mut IndexPicker(1), Category::General, "utils.ts");
        assert_eq!(msg.title, "feat: enhance utils component");
    }

    #[test]
    fn test_generate_never_leaves_placeholder() {
        let templates = TemplateSet::default();
        let mut picker = RandomPicker::new();

        for category in Category::ALL {
            for _ in 0..20 {
                let msg = generate(&templates, &mut picker, category, "src/widgets/PriceTable.tsx");
                assert!(msg.title.contains("PriceTable"), "{}: {}", category, msg.title);
                assert!(!msg.title.contains(NAME_PLACEHOLDER));
                assert!(!msg.title.contains(".tsx"));
                assert!(templates.bodies().contains(&msg.body));
            }
        }
    }

    #[test]
    fn test_random_picker_only_returns_members() {
        let mut picker = RandomPicker::default();
        let options = ["a", "b", "c"];
        for _ in 0..50 {
            assert!(options.contains(picker.pick(&options).unwrap()));
        }
        let empty: [&str; 0] = [];
        assert!(picker.pick(&empty).is_none());
    }

    #[test]
    fn test_commit_message_format() {
        let msg = CommitMessage {
            title: "style: update globals styles".into(),
            body: "- Clean up formatting\n".into(),
        };
        assert_eq!(msg.format(), "style: update globals styles\n\n- Clean up formatting");

        let bare = CommitMessage {
            title: "fix: resolve hotfix issue".into(),
            body: "  ".into(),
        };
        assert_eq!(bare.format(), "fix: resolve hotfix issue");
    }
}
