//! Profile configuration stored as TOML
//!
//! ```toml
//! default_profile = "prod"
//!
//! [profiles.prod]
//! api_url = "https://api.dwh.example.com/v2"
//! api_token = "${DWH_PROD_TOKEN}"
//! ```
//!
//! Values support `${VAR}` environment expansion at resolution time, so
//! tokens don't have to live in the file itself.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ConfigError, Result};

/// Top-level configuration: named profiles plus an optional default
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Connection settings for one DWH deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub api_url: String,
    pub api_token: String,
}

impl Profile {
    /// Resolve the stored values, expanding `${VAR}` references against
    /// the process environment.
    pub fn resolve_credentials(&self) -> Result<(String, String)> {
        let api_url = expand(&self.api_url)?;
        let api_token = expand(&self.api_token)?;
        Ok((api_url, api_token))
    }
}

fn expand(value: &str) -> Result<String> {
    shellexpand::env(value)
        .map(|expanded| expanded.into_owned())
        .map_err(|e| ConfigError::EnvExpansionError(e.to_string()))
}

impl Config {
    /// Platform config file location, e.g.
    /// `~/.config/dwh/config.toml` on Linux
    pub fn default_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "dwhctl", "dwh")
            .ok_or(ConfigError::ConfigDirError)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load from the platform location
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path()?)
    }

    /// Load from an explicit path. A missing file yields the default
    /// (empty) configuration rather than an error.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::LoadError {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        debug!(
            "loaded {} profile(s) from {}",
            config.profiles.len(),
            path.display()
        );
        Ok(config)
    }

    /// Save to the platform location
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::default_path()?)
    }

    /// Save to an explicit path, creating parent directories
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::SaveError {
            path: path.display().to_string(),
            source,
        })
    }

    /// Resolve a profile: an explicit name, otherwise the configured
    /// default, otherwise the only profile there is.
    pub fn resolve_profile<'a>(&'a self, name: Option<&'a str>) -> Result<(&'a str, &'a Profile)> {
        if self.profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }
        let name = match name {
            Some(name) => name,
            None => match &self.default_profile {
                Some(default) => default.as_str(),
                None if self.profiles.len() == 1 => {
                    self.profiles.keys().next().map(String::as_str).unwrap_or_default()
                }
                None => return Err(ConfigError::NoDefaultProfile),
            },
        };
        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
            })?;
        Ok((name, profile))
    }

    /// Add or replace a profile
    pub fn set_profile(&mut self, name: impl Into<String>, profile: Profile) {
        self.profiles.insert(name.into(), profile);
    }

    /// Remove a profile, clearing the default if it pointed at it
    pub fn remove_profile(&mut self, name: &str) -> bool {
        let removed = self.profiles.remove(name).is_some();
        if removed && self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        removed
    }
}
