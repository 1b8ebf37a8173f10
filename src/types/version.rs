// ABOUTME: Release version embedded in application labels.
// ABOUTME: Parses major.minor.patch-build and orders by precedence, ignoring the build tag.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::identity::IdentityError;

/// Version of a deployed release, e.g. `1.2.3-abcde`.
///
/// Equality covers the build tag; precedence does not. Two releases that
/// differ only in build are distinct deployments with equal precedence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    major: u64,
    minor: u64,
    patch: u64,
    build: String,
}

impl SemanticVersion {
    pub fn new(major: u64, minor: u64, patch: u64, build: impl Into<String>) -> Self {
        Self {
            major,
            minor,
            patch,
            build: build.into(),
        }
    }

    pub fn parse(text: &str) -> Result<Self, IdentityError> {
        let (core, build) = text
            .split_once('-')
            .ok_or_else(|| IdentityError::MissingBuild(text.to_string()))?;

        if build.is_empty() {
            return Err(IdentityError::MissingBuild(text.to_string()));
        }

        let mut segments = core.split('.');
        let (Some(major), Some(minor), Some(patch), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(IdentityError::InvalidVersion(text.to_string()));
        };

        Ok(Self {
            major: parse_segment(major)?,
            minor: parse_segment(minor)?,
            patch: parse_segment(patch)?,
            build: build.to_string(),
        })
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn build(&self) -> &str {
        &self.build
    }

    /// Compare release precedence by (major, minor, patch) only.
    ///
    /// Not an `Ord` impl: two versions with different builds compare
    /// `Equal` here while being unequal under `PartialEq`.
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

/// Numeric segments must be canonical so the label round-trips.
fn parse_segment(segment: &str) -> Result<u64, IdentityError> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));

    if !canonical {
        return Err(IdentityError::NonNumericSegment(segment.to_string()));
    }

    segment
        .parse()
        .map_err(|_| IdentityError::NonNumericSegment(segment.to_string()))
}

impl FromStr for SemanticVersion {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}-{}", self.major, self.minor, self.patch, self.build)
    }
}
