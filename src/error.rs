// ABOUTME: Application-wide error types for zdd.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::control_plane::CommandError;
use crate::deploy::DeployError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown command '{0}' (run without arguments to list commands)")]
    UnknownCommand(String),

    #[error("command '{0}' is already registered")]
    DuplicateCommand(String),

    #[error("{0}")]
    Usage(#[from] clap::Error),

    #[error("{0}")]
    Deploy(#[from] DeployError),

    #[error("{0}")]
    Command(#[from] CommandError),

    #[error("{0} hook failed")]
    Hook(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
