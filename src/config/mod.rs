// ABOUTME: Configuration types and parsing for zdd.yml.
// ABOUTME: Handles YAML parsing, file discovery, validation and environment overrides.

mod cf;
mod health;

pub use cf::CfConfig;
pub use health::HealthConfig;

use crate::deploy::{DEFAULT_RENAME_SUFFIX, RolloutSettings};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "zdd.yml";
pub const CONFIG_FILENAME_ALT: &str = "zdd.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".zdd/config.yml";

/// Environment variable overriding `cf.binary`.
pub const CF_BINARY_ENV: &str = "ZDD_CF_BINARY";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cf: CfConfig,

    #[serde(default)]
    pub health: HealthConfig,

    #[serde(default = "default_rename_suffix")]
    pub rename_suffix: String,

    #[serde(default = "default_force_delete")]
    pub force_delete: bool,
}

fn default_rename_suffix() -> String {
    DEFAULT_RENAME_SUFFIX.to_string()
}

fn default_force_delete() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cf: CfConfig::default(),
            health: HealthConfig::default(),
            rename_suffix: default_rename_suffix(),
            force_delete: default_force_delete(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, or defaults if none exists.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(path);
            }
        }

        Ok(Config::default())
    }

    /// Load an explicit config file (which must exist) or discover one in
    /// `dir`, then apply environment overrides.
    pub fn resolve(dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) if !path.exists() => return Err(Error::ConfigNotFound(path.to_path_buf())),
            Some(path) => Self::load(path)?,
            None => Self::discover(dir)?,
        };
        Ok(config.with_env_overrides())
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(binary) = std::env::var(CF_BINARY_ENV)
            && !binary.trim().is_empty()
        {
            self.cf.binary = binary.trim().into();
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.health.validate().map_err(Error::InvalidConfig)?;

        if self.rename_suffix.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "rename_suffix cannot be empty".to_string(),
            ));
        }
        if self.rename_suffix.contains(char::is_whitespace) {
            return Err(Error::InvalidConfig(
                "rename_suffix cannot contain whitespace".to_string(),
            ));
        }

        Ok(())
    }

    /// Settings the orchestrator uses to issue steps.
    pub fn rollout_settings(&self) -> RolloutSettings {
        RolloutSettings {
            rename_suffix: self.rename_suffix.clone(),
            force_delete: self.force_delete,
            monitor: self.health.monitor(),
        }
    }
}
