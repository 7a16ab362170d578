//! SHA-1 checksum computation and verification.
//!
//! The metadata service publishes a SHA-1 digest for every jar. Downloaded
//! archives are hashed in fixed-size blocks so the whole artefact never has
//! to fit in memory, and the result is compared against the published value
//! before anything is extracted.

use crate::error::{ExtractError, Result};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Expected length of a hex-encoded SHA-1 digest.
const DIGEST_HEX_LEN: usize = 40;

/// Read size used while hashing.
const BLOCK_SIZE: usize = 1024 * 1024;

/// Errors arising from a malformed SHA-1 digest string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid SHA-1 digest: {reason}")]
pub struct InvalidSha1Digest {
    /// Description of the validation failure.
    pub reason: String,
}

/// A validated, lowercase hex-encoded SHA-1 digest.
///
/// Uppercase input is accepted and normalised, so equality between two
/// digests is a case-insensitive comparison of their hex forms.
///
/// # Examples
///
/// ```
/// use vanilla_extractor::checksum::Sha1Digest;
///
/// let upper = Sha1Digest::try_from("A".repeat(40).as_str()).expect("valid");
/// let lower = Sha1Digest::try_from("a".repeat(40).as_str()).expect("valid");
/// assert_eq!(upper, lower);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Sha1Digest(String);

impl Sha1Digest {
    /// Return the digest as a lowercase hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate_sha1(value: &str) -> std::result::Result<(), InvalidSha1Digest> {
    if value.len() != DIGEST_HEX_LEN {
        return Err(InvalidSha1Digest {
            reason: format!(
                "expected {DIGEST_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(InvalidSha1Digest {
            reason: format!("non-hex character '{bad}'"),
        });
    }
    Ok(())
}

impl TryFrom<&str> for Sha1Digest {
    type Error = InvalidSha1Digest;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        validate_sha1(value)?;
        Ok(Self(value.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for Sha1Digest {
    type Error = InvalidSha1Digest;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl fmt::Display for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the SHA-1 digest of the file at `path`.
///
/// # Errors
///
/// Returns [`ExtractError::FileAccess`] if the file cannot be opened or read.
pub fn compute_sha1(path: &Path) -> Result<Sha1Digest> {
    let mut file = File::open(path).map_err(|e| ExtractError::file_access(path, e))?;
    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; BLOCK_SIZE];
    loop {
        let bytes_read = file
            .read(&mut buffer)
            .map_err(|e| ExtractError::file_access(path, e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }
    // sha1 always renders 40 lowercase hex characters.
    Ok(Sha1Digest(format!("{:x}", hasher.finalize())))
}

/// Check that the file at `path` hashes to `expected`.
///
/// # Errors
///
/// Returns [`ExtractError::IntegrityMismatch`] when the digests differ, or
/// [`ExtractError::FileAccess`] if the file cannot be read.
pub fn verify_sha1(path: &Path, expected: &Sha1Digest) -> Result<()> {
    let actual = compute_sha1(path)?;
    if &actual != expected {
        return Err(ExtractError::IntegrityMismatch {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    log::debug!("SHA-1 of {} matches {expected}", path.display());
    Ok(())
}
