use crate::error::{GitCcError, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

const LOCAL_CONFIG: &str = "./git-cc.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub scope_char_limit: usize,
    pub message_char_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scope_char_limit: 50,
            message_char_limit: 100,
        }
    }
}

/// What a single file may set. Missing keys leave the current value alone.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    scope_char_limit: Option<usize>,
    message_char_limit: Option<usize>,
}

impl Config {
    /// Defaults, then the global file, then `./git-cc.toml`.
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(global) = Config::global_config_path() {
            config.merge_if_present(&global);
        }
        config.merge_if_present(Path::new(LOCAL_CONFIG));

        config
    }

    /// Defaults plus exactly one file the user named on the command line.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| GitCcError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Config::default();
        config.merge(parse(path, &content)?);
        Ok(config)
    }

    fn merge_if_present(&mut self, path: &Path) {
        let Ok(content) = fs::read_to_string(path) else {
            return;
        };
        match parse(path, &content) {
            Ok(file) => {
                debug!("loaded config from {}", path.display());
                self.merge(file);
            }
            Err(e) => warn!("{}", e),
        }
    }

    fn merge(&mut self, file: ConfigFile) {
        if let Some(limit) = file.scope_char_limit {
            self.scope_char_limit = limit;
        }
        if let Some(limit) = file.message_char_limit {
            self.message_char_limit = limit;
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        let mut config_dir = dirs::config_dir()?;
        config_dir.push("git-cc");
        config_dir.push("config.toml");
        Some(config_dir)
    }
}

fn parse(path: &Path, content: &str) -> Result<ConfigFile> {
    toml::from_str(content).map_err(|source| GitCcError::Config {
        path: path.to_path_buf(),
        source,
    })
}
