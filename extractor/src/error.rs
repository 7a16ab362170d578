//! Error types for the datapack extractor.
//!
//! Every failure the pipeline can report is a variant of [`ExtractError`].
//! Variants carry the offending path, version, URL, or digests so the CLI
//! can print a self-contained diagnosis. [`ErrorKind`] collapses the
//! variants into the closed taxonomy callers branch on.

use crate::download::DownloadError;
use crate::download_kind::DownloadKind;
use crate::extraction::ExtractionError;
use crate::version::VersionId;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Closed classification of pipeline failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The destination directory holds files and `--force` was not given.
    DestinationNotEmpty,
    /// The version is absent from the manifest, or a local archive is missing.
    NotFound,
    /// The version has no download of the requested kind.
    UnsupportedDownloadKind,
    /// The downloaded archive does not match its published digest.
    IntegrityMismatch,
    /// An archive member tried to escape the destination directory.
    UnsafePath,
    /// A network request failed or returned an unusable document.
    Transport,
    /// A local file could not be read or written.
    FileAccess,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::DestinationNotEmpty => "destination not empty",
            Self::NotFound => "not found",
            Self::UnsupportedDownloadKind => "unsupported download kind",
            Self::IntegrityMismatch => "integrity mismatch",
            Self::UnsafePath => "unsafe path",
            Self::Transport => "transport error",
            Self::FileAccess => "file access error",
        };
        f.write_str(label)
    }
}

/// Errors that can occur while resolving, verifying, or extracting a datapack.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The destination exists, is not empty, and overwriting was not requested.
    #[error("destination {path} is not empty; use --force to overwrite")]
    DestinationNotEmpty {
        /// The destination directory.
        path: PathBuf,
    },

    /// The version manifest has no entry with the requested identifier.
    #[error("version {version} not found in manifest {manifest_url}")]
    VersionNotFound {
        /// The requested version.
        version: VersionId,
        /// The manifest that was searched.
        manifest_url: String,
    },

    /// An archive path given on the command line does not exist.
    #[error("archive not found: {path}")]
    ArchiveNotFound {
        /// The missing archive path.
        path: PathBuf,
    },

    /// The version detail document has no download of the requested kind.
    #[error("download kind '{kind}' not available for {version}")]
    UnsupportedDownloadKind {
        /// The version whose downloads were inspected.
        version: VersionId,
        /// The requested download kind.
        kind: DownloadKind,
    },

    /// The computed SHA-1 digest differs from the published one.
    #[error("SHA-1 mismatch for {path}: expected {expected}, got {actual}")]
    IntegrityMismatch {
        /// The archive that was hashed.
        path: PathBuf,
        /// The digest published by the metadata service.
        expected: String,
        /// The digest computed locally.
        actual: String,
    },

    /// An archive member name is absolute or contains `..`.
    #[error("unsafe path in archive entry {path}: {reason}")]
    UnsafePath {
        /// The member name as stored in the archive.
        path: String,
        /// Which rule the name violated.
        reason: &'static str,
    },

    /// A network request failed.
    #[error("request to {url} failed: {reason}")]
    Transport {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// A metadata document could not be parsed.
    #[error("invalid metadata document from {url}: {reason}")]
    InvalidMetadata {
        /// The URL the document came from.
        url: String,
        /// The parse failure.
        reason: String,
    },

    /// A local file operation failed.
    #[error("I/O error on {path}: {source}")]
    FileAccess {
        /// The file or directory being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The archive is not a readable zip container.
    #[error("cannot read archive {path}: {reason}")]
    CorruptArchive {
        /// The archive path.
        path: PathBuf,
        /// Description of the zip failure.
        reason: String,
    },
}

impl ExtractError {
    /// Classify this error into the closed [`ErrorKind`] taxonomy.
    ///
    /// # Examples
    ///
    /// ```
    /// use vanilla_extractor::error::{ErrorKind, ExtractError};
    ///
    /// let err = ExtractError::ArchiveNotFound { path: "client.jar".into() };
    /// assert_eq!(err.kind(), ErrorKind::NotFound);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DestinationNotEmpty { .. } => ErrorKind::DestinationNotEmpty,
            Self::VersionNotFound { .. } | Self::ArchiveNotFound { .. } => ErrorKind::NotFound,
            Self::UnsupportedDownloadKind { .. } => ErrorKind::UnsupportedDownloadKind,
            Self::IntegrityMismatch { .. } => ErrorKind::IntegrityMismatch,
            Self::UnsafePath { .. } => ErrorKind::UnsafePath,
            Self::Transport { .. } | Self::InvalidMetadata { .. } => ErrorKind::Transport,
            Self::FileAccess { .. } | Self::CorruptArchive { .. } => ErrorKind::FileAccess,
        }
    }

    /// Wrap an I/O error with the path it occurred on.
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }
}

impl From<DownloadError> for ExtractError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::Http { url, reason } => Self::Transport { url, reason },
            DownloadError::NotFound { url } => Self::Transport {
                url,
                reason: "server returned 404 Not Found".to_owned(),
            },
            DownloadError::Io { path, source } => Self::FileAccess { path, source },
        }
    }
}

impl From<ExtractionError> for ExtractError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsafePath { path, reason } => Self::UnsafePath { path, reason },
            ExtractionError::Io { path, source } => Self::FileAccess { path, source },
            ExtractionError::Archive { path, source } => Self::CorruptArchive {
                path,
                reason: source.to_string(),
            },
        }
    }
}

/// Result type alias using [`ExtractError`].
pub type Result<T> = std::result::Result<T, ExtractError>;
