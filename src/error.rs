use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitCcError {
    #[error("Error: not a git repository (or any of the parent directories): .git")]
    NotARepository,

    #[error("No staged files found. Stage files with 'git add' first.")]
    NoStagedFiles,

    #[error("Error checking git status: {0}")]
    GitStatus(String),

    #[error("Could not read config at {}: {}", .path.display(), .source)]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse config at {}: {}", .path.display(), .source)]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Error running program: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GitCcError>;
