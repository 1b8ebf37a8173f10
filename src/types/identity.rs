// ABOUTME: Application identity parsing for versioned labels.
// ABOUTME: Splits labels like myApp#1.2.3-abcde into a base name and a version.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::version::SemanticVersion;

/// Separator between the base name and the version text.
pub const VERSION_SEPARATOR: char = '#';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("application label '{0}' has no '#' version separator")]
    MissingSeparator(String),

    #[error("application label '{0}' has an empty base name")]
    EmptyBaseName(String),

    #[error("version '{0}' is missing a build tag (expected major.minor.patch-build)")]
    MissingBuild(String),

    #[error("invalid version '{0}' (expected major.minor.patch-build)")]
    InvalidVersion(String),

    #[error("version segment '{0}' is not a canonical non-negative integer")]
    NonNumericSegment(String),
}

/// A parsed application label: `<baseName>#<version>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApplicationIdentity {
    base_name: String,
    version: SemanticVersion,
    label: String,
}

impl ApplicationIdentity {
    pub fn parse(label: &str) -> Result<Self, IdentityError> {
        let (base_name, version_text) = label
            .rsplit_once(VERSION_SEPARATOR)
            .ok_or_else(|| IdentityError::MissingSeparator(label.to_string()))?;

        if base_name.is_empty() {
            return Err(IdentityError::EmptyBaseName(label.to_string()));
        }

        let version = SemanticVersion::parse(version_text)?;

        Ok(Self {
            base_name: base_name.to_string(),
            version,
            label: label.to_string(),
        })
    }

    /// Name of the application without its version suffix.
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn version(&self) -> &SemanticVersion {
        &self.version
    }

    /// The full label as known to the control plane.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Same application and same full version, build included.
    pub fn is_same_release(&self, other: &ApplicationIdentity) -> bool {
        self.base_name == other.base_name && self.version == other.version
    }
}

impl FromStr for ApplicationIdentity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ApplicationIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}
