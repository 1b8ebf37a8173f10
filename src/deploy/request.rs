// ABOUTME: Deployment request built from validated command-line input.
// ABOUTME: Immutable for the duration of one orchestration run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::types::ApplicationIdentity;

use super::error::DeployError;

/// What to deploy, from where, and whether to gate the cutover on health.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    target: ApplicationIdentity,
    manifest: PathBuf,
    artifact: PathBuf,
    scaleover: Option<Duration>,
}

impl DeploymentRequest {
    pub fn new(
        target: ApplicationIdentity,
        manifest: impl Into<PathBuf>,
        artifact: impl Into<PathBuf>,
    ) -> Self {
        Self {
            target,
            manifest: manifest.into(),
            artifact: artifact.into(),
            scaleover: None,
        }
    }

    /// Parse the label and build a big-bang request.
    pub fn parse(
        label: &str,
        manifest: impl Into<PathBuf>,
        artifact: impl Into<PathBuf>,
    ) -> Result<Self, DeployError> {
        let target = ApplicationIdentity::parse(label)?;
        Ok(Self::new(target, manifest, artifact))
    }

    /// Gate the cutover on the new instance being healthy within `window`.
    pub fn with_scaleover(mut self, window: Duration) -> Self {
        self.scaleover = Some(window);
        self
    }

    pub fn target(&self) -> &ApplicationIdentity {
        &self.target
    }

    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    pub fn scaleover(&self) -> Option<Duration> {
        self.scaleover
    }
}
