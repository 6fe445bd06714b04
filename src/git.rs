use crate::classify::CommitOutcome;
use crate::error::{GitCcError, Result};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs a single commit attempt and reports how it went.
pub trait Committer {
    fn commit(&self, message: &str) -> CommitOutcome;
}

/// Commits through the `git` binary found on `PATH`.
#[derive(Debug, Clone)]
pub struct GitCommitter {
    workdir: PathBuf,
}

impl GitCommitter {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

impl Default for GitCommitter {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Committer for GitCommitter {
    fn commit(&self, message: &str) -> CommitOutcome {
        debug!("git commit -m {:?} in {}", message, self.workdir.display());

        let output = match Command::new("git")
            .args(["commit", "-m", message])
            .current_dir(&self.workdir)
            .output()
        {
            Ok(output) => output,
            Err(e) => return CommitOutcome::spawn_failed(e.to_string()),
        };

        if output.status.success() {
            return CommitOutcome::committed();
        }

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        CommitOutcome::from_failed_output(&combined)
    }
}

pub fn is_git_repository(dir: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .current_dir(dir)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

pub fn staged_files(dir: &Path) -> Result<Vec<String>> {
    let output = Command::new("git")
        .args(["diff", "--cached", "--name-only"])
        .current_dir(dir)
        .output()
        .map_err(|e| GitCcError::GitStatus(e.to_string()))?;

    if !output.status.success() {
        return Err(GitCcError::GitStatus(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

/// Refuses to start the wizard outside a repository or with nothing staged.
pub fn check_preconditions(dir: &Path) -> Result<()> {
    if !is_git_repository(dir) {
        return Err(GitCcError::NotARepository);
    }
    let staged = staged_files(dir)?;
    debug!("{} staged file(s)", staged.len());
    if staged.is_empty() {
        return Err(GitCcError::NoStagedFiles);
    }
    Ok(())
}
