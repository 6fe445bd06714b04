use log::debug;

const SUCCESS_MESSAGE: &str = "Changes committed successfully";
const FALLBACK_MESSAGE: &str = "Commit failed";
const IGNORED_MARKER: &str = "(ignored)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    Committed,
    HookFailed,
    NoChanges,
    MergeConflict,
    NotInRepo,
    Unknown,
}

impl Reason {
    pub fn label(self) -> &'static str {
        match self {
            Reason::Committed => "committed",
            Reason::HookFailed => "hook-failed",
            Reason::NoChanges => "no-changes",
            Reason::MergeConflict => "merge-conflict",
            Reason::NotInRepo => "not-in-repo",
            Reason::Unknown => "unknown",
        }
    }
}

struct Rule {
    needles: &'static [&'static str],
    reason: Reason,
    message: &'static str,
}

// Checked top to bottom, first hit wins.
const RULES: &[Rule] = &[
    Rule {
        needles: &["hook"],
        reason: Reason::HookFailed,
        message: "Pre-commit hook failed",
    },
    Rule {
        needles: &["nothing to commit"],
        reason: Reason::NoChanges,
        message: "No changes to commit",
    },
    Rule {
        needles: &["merge conflict", "conflicts then run git commit"],
        reason: Reason::MergeConflict,
        message: "Merge conflicts need to be resolved",
    },
    Rule {
        needles: &["not a git repository"],
        reason: Reason::NotInRepo,
        message: "Not in a git repository",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub reason: Reason,
    pub message: String,
}

/// Works out why `git commit` failed from its combined output.
pub fn classify(output: &str) -> Classification {
    let lowered = output.to_lowercase();

    if let Some(rule) = RULES
        .iter()
        .find(|rule| rule.needles.iter().any(|needle| lowered.contains(needle)))
    {
        return Classification {
            reason: rule.reason,
            message: rule.message.to_string(),
        };
    }

    let message = meaningful_line(output)
        .or_else(|| output.lines().next().map(str::trim).filter(|l| !l.is_empty()))
        .unwrap_or(FALLBACK_MESSAGE)
        .to_string();

    Classification {
        reason: Reason::Unknown,
        message,
    }
}

fn is_log_line(line: &str) -> bool {
    let lowered = line.to_lowercase();
    ["debug", "info", "[debug", "[info"]
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

fn is_ignored_line(line: &str) -> bool {
    line.to_lowercase().contains(IGNORED_MARKER)
}

/// First line that reads like an actual error rather than noise.
fn meaningful_line(output: &str) -> Option<&str> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !is_log_line(line) && !is_ignored_line(line))
}

/// The result of one commit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub reason: Reason,
    pub message: String,
    pub details: String,
}

impl CommitOutcome {
    pub fn committed() -> Self {
        Self {
            reason: Reason::Committed,
            message: SUCCESS_MESSAGE.to_string(),
            details: String::new(),
        }
    }

    /// Used when git could not be run at all.
    pub fn spawn_failed(details: String) -> Self {
        Self {
            reason: Reason::Unknown,
            message: FALLBACK_MESSAGE.to_string(),
            details,
        }
    }

    /// Builds the outcome for a non-zero exit.
    ///
    /// Output made up only of `(ignored)` warnings and log chatter is taken as
    /// a commit that went through. This is a heuristic over free-form text: a
    /// real failure whose only line carries the marker will be misread.
    pub fn from_failed_output(output: &str) -> Self {
        let classification = classify(output);

        if classification.reason == Reason::Unknown
            && output.lines().any(is_ignored_line)
            && meaningful_line(output).is_none()
        {
            debug!("non-zero exit with only ignored warnings, treating as committed");
            return Self {
                details: output.to_string(),
                ..Self::committed()
            };
        }

        debug!("commit failed: {}", classification.reason.label());
        Self {
            reason: classification.reason,
            message: classification.message,
            details: output.to_string(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.reason == Reason::Committed
    }
}
