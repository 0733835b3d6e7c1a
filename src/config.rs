//! tradepost configuration.
//!
//! Loaded from `~/.tradepost/config.toml`. Every key is optional; a missing
//! file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// tradepost configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Where the state database lives. Defaults to `~/.tradepost/`.
    pub storage_root: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Free posts granted when the quota ledger is first created.
    pub initial_free_posts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_root: None,
            log_level: "warn".to_string(),
            initial_free_posts: 3,
        }
    }
}

impl Config {
    /// Load config from `~/.tradepost/config.toml`, falling back to defaults
    /// when the file is absent.
    pub fn load() -> Result<Self, String> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from a specific file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        toml::from_str(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// The config file path: `~/.tradepost/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".tradepost").join("config.toml"))
    }
}
