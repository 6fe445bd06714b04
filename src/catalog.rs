/// A conventional-commit type tag offered on the first screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeType {
    pub tag: &'static str,
    pub description: &'static str,
}

impl ChangeType {
    const fn new(tag: &'static str, description: &'static str) -> Self {
        Self { tag, description }
    }

    /// Case-insensitive match of `filter` against the tag and description.
    pub fn matches(&self, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        format!("{} {}", self.tag, self.description)
            .to_lowercase()
            .contains(&filter.to_lowercase())
    }
}

pub const CHANGE_TYPES: &[ChangeType] = &[
    ChangeType::new("feat", "A new feature"),
    ChangeType::new("fix", "A bug fix"),
    ChangeType::new("docs", "Documentation only changes"),
    ChangeType::new("style", "Changes that do not affect the meaning of the code"),
    ChangeType::new("refactor", "A code change that neither fixes a bug nor adds a feature"),
    ChangeType::new("perf", "A code change that improves performance"),
    ChangeType::new("test", "Adding missing tests or correcting existing tests"),
    ChangeType::new("build", "Changes that affect the build system or external dependencies"),
    ChangeType::new("ci", "Changes to CI configuration files and scripts"),
    ChangeType::new("chore", "Other changes that don't modify src or test files"),
];
