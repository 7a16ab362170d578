//! HTTP retrieval of metadata documents and artefacts.
//!
//! Provides a trait-based abstraction over the network so the resolver can
//! be exercised against stub or mock transports in tests.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default request timeout covering connect, headers, and body transfer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Network settings for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Location of the version manifest.
    pub manifest_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            manifest_url: crate::resolver::DEFAULT_MANIFEST_URL.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Trait for fetching documents and artefacts over the network.
///
/// # Examples
///
/// ```
/// use vanilla_extractor::download::HttpDownloader;
///
/// let downloader = HttpDownloader::default();
/// // Use downloader.fetch_document(url) in production
/// # let _ = downloader;
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactDownloader {
    /// Fetch `url` and return the body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not UTF-8.
    fn fetch_document(&self, url: &str) -> Result<String, DownloadError>;

    /// Fetch `url` and stream the body into a new file at `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the file write fails.
    fn download_to(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
}

/// Errors arising from network retrieval.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The request failed or timed out.
    #[error("download failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The server answered 404.
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// Writing the downloaded body failed.
    #[error("I/O error writing {path}: {source}")]
    Io {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// HTTP-based downloader using `ureq`.
pub struct HttpDownloader {
    agent: ureq::Agent,
}

impl HttpDownloader {
    /// Create a downloader whose requests give up after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl From<&HttpConfig> for HttpDownloader {
    fn from(config: &HttpConfig) -> Self {
        Self::new(config.timeout)
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl ArtifactDownloader for HttpDownloader {
    fn fetch_document(&self, url: &str) -> Result<String, DownloadError> {
        log::debug!("fetching {url}");
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        response
            .into_body()
            .read_to_string()
            .map_err(|e| DownloadError::Http {
                url: url.to_owned(),
                reason: e.to_string(),
            })
    }

    fn download_to(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        log::debug!("downloading {url} to {}", dest.display());
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let io_error = |source| DownloadError::Io {
            path: dest.to_path_buf(),
            source,
        };
        let mut file = File::create(dest).map_err(io_error)?;
        let written = std::io::copy(&mut response.into_body().as_reader(), &mut file)
            .map_err(|e| DownloadError::Http {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;
        file.sync_all().map_err(io_error)?;
        log::debug!("downloaded {written} bytes from {url}");
        Ok(())
    }
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
