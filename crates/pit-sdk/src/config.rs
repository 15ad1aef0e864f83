//! Repository configuration, stored as `.pit/config.toml`.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RepoError, RepoResult};

/// Per-repository settings.
///
/// Every field has a default, so a partial or missing file is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    pub lock: LockConfig,
    pub ignore: IgnoreConfig,
}

/// How hard mutating operations try to acquire the repository lock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Attempts before giving up with `LockContention`.
    pub retries: u32,
    /// Pause between attempts, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            retries: 20,
            retry_delay_ms: 25,
        }
    }
}

impl LockConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Extra ignore patterns (gitignore syntax), applied on top of `.pitignore`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    pub patterns: Vec<String>,
}

impl RepoConfig {
    /// Load the config file at `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> RepoResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&text).map_err(|e| RepoError::Config(format!("{}: {e}", path.display())))
    }

    /// Write this config to `path`.
    pub fn save(&self, path: &Path) -> RepoResult<()> {
        let text = toml::to_string_pretty(self).map_err(|e| RepoError::Config(e.to_string()))?;
        fs::write(path, text)?;
        Ok(())
    }
}
