//! Configuration file support for snakecite
//!
//! Reads configuration from `~/.config/snakecite/config.json`:
//!
//! ```json
//! {
//!   "github_token": "ghp_...",
//!   "timeout_secs": 10,
//!   "overrides": {
//!     "some-inhouse-tool": {
//!       "repo": "https://github.com/someone/some-inhouse-tool"
//!     },
//!     "samtools": {
//!       "doi": "https://doi.org/10.1093/bioinformatics/btp352"
//!     }
//!   }
//! }
//! ```
//!
//! Overrides short-circuit the registry chain for packages the registries
//! cannot resolve.

use crate::http::DEFAULT_TIMEOUT_SECS;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot determine config directory. HOME environment variable not set.")]
    NoConfigDir,

    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Package-specific override configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PackageOverride {
    /// DOI URL to cite for this package
    pub doi: Option<String>,
    /// Repository URL to cite for this package
    pub repo: Option<String>,
}

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// GitHub API token, used when neither the CLI flag nor GITHUB_TOKEN is set
    #[serde(default)]
    pub github_token: Option<String>,

    /// Timeout for remote lookups in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Per-package citation overrides
    #[serde(default)]
    pub overrides: HashMap<String, PackageOverride>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            overrides: HashMap::new(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Config {
    /// Load configuration from the default path or return defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::ParseError { path, source })
    }

    /// Look up the citation override for a package, if one is configured
    pub fn package_override(&self, package: &str) -> Option<&PackageOverride> {
        self.overrides.get(&package.to_lowercase())
    }
}

/// Returns the config file path: `~/.config/snakecite/config.json`
pub fn config_path() -> Result<PathBuf, ConfigError> {
    // Use XDG_CONFIG_HOME if set, otherwise fall back to ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".config"))
                .unwrap_or_default()
        });

    if config_base.as_os_str().is_empty() {
        return Err(ConfigError::NoConfigDir);
    }

    Ok(config_base.join("snakecite").join("config.json"))
}
