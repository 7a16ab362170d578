//! Version identifier newtype.
//!
//! A [`VersionId`] is an opaque string such as `1.21.11` or `25w14a`. It is
//! compared by exact equality against manifest entries and is also used as a
//! path component of the local install layout, so it must not contain path
//! separators or parent-directory references.

use std::fmt;
use std::str::FromStr;

/// Errors arising from an invalid version identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version identifier \"{value}\": {reason}")]
pub struct InvalidVersionId {
    /// The rejected identifier.
    pub value: String,
    /// Which rule the identifier violated.
    pub reason: &'static str,
}

/// A validated distribution version identifier.
///
/// # Examples
///
/// ```
/// use vanilla_extractor::version::VersionId;
///
/// let version = VersionId::try_from("1.21.11").expect("valid");
/// assert_eq!(version.as_str(), "1.21.11");
/// assert!(VersionId::try_from("../evil").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionId(String);

impl VersionId {
    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate(value: &str) -> Result<(), InvalidVersionId> {
    let reject = |reason| {
        Err(InvalidVersionId {
            value: value.to_owned(),
            reason,
        })
    };
    if value.trim().is_empty() {
        return reject("must not be empty");
    }
    if value.contains(['/', '\\']) {
        return reject("must not contain path separators");
    }
    if value == "." || value == ".." {
        return reject("must not be a directory reference");
    }
    Ok(())
}

impl TryFrom<&str> for VersionId {
    type Error = InvalidVersionId;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for VersionId {
    type Error = InvalidVersionId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate(&value)?;
        Ok(Self(value))
    }
}

impl FromStr for VersionId {
    type Err = InvalidVersionId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl AsRef<str> for VersionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
