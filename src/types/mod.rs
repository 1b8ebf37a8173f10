// ABOUTME: Validated domain types for application labels.
// ABOUTME: Application identities and the release versions embedded in them.

mod identity;
mod version;

pub use identity::{ApplicationIdentity, IdentityError, VERSION_SEPARATOR};
pub use version::SemanticVersion;
