// ABOUTME: cf CLI client configuration.
// ABOUTME: Binary location and per-command timeout.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::control_plane::{CfCli, DEFAULT_CF_BINARY};

#[derive(Debug, Clone, Deserialize)]
pub struct CfConfig {
    #[serde(default = "default_binary")]
    pub binary: PathBuf,

    #[serde(default = "default_command_timeout", with = "humantime_serde")]
    pub command_timeout: Duration,
}

fn default_binary() -> PathBuf {
    PathBuf::from(DEFAULT_CF_BINARY)
}

fn default_command_timeout() -> Duration {
    Duration::from_secs(600)
}

impl Default for CfConfig {
    fn default() -> Self {
        CfConfig {
            binary: default_binary(),
            command_timeout: default_command_timeout(),
        }
    }
}

impl CfConfig {
    pub fn client(&self) -> CfCli {
        CfCli::new(&self.binary).command_timeout(self.command_timeout)
    }
}
