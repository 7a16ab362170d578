//! End-to-end datapack extraction.
//!
//! Ties together the destination guard, archive resolution, checksum
//! verification, and safe extraction. Each run is single-shot and owns both
//! the destination and any temporary download for its duration.
//!
//! Extraction itself is not transactional: an I/O failure part way through
//! writing members can leave the destination partially populated. Every
//! check that can be made up front (destination state, archive presence,
//! digest, member names) runs before the first write.

use crate::checksum::verify_sha1;
use crate::destination;
use crate::download::{ArtifactDownloader, HttpConfig, HttpDownloader};
use crate::download_kind::DownloadKind;
use crate::error::{ExtractError, Result};
use crate::extraction::{ExtractionSummary, extract_members};
use crate::resolver::{ArtifactResolver, ResolveRequest, SourceKind};
use crate::selector::DatapackSelector;
use crate::version::VersionId;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Inputs to a pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig<'a> {
    /// Version whose datapack is extracted.
    pub version: &'a VersionId,
    /// Directory that receives the datapack.
    pub destination: &'a Path,
    /// Archive to read instead of resolving one.
    pub explicit_archive: Option<&'a Path>,
    /// Local game install to look for a cached jar in.
    pub install_dir: Option<&'a Path>,
    /// Which jar to download when no local one is available.
    pub download_kind: DownloadKind,
    /// Replace a destination that already holds files.
    pub force: bool,
    /// Manifest location and request timeout.
    pub http: &'a HttpConfig,
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Where the archive came from.
    pub source: SourceKind,
    /// The populated destination directory.
    pub destination: PathBuf,
    /// What was written.
    pub summary: ExtractionSummary,
}

/// Run the pipeline over HTTP.
///
/// # Errors
///
/// See [`run_with`].
pub fn run(config: &PipelineConfig<'_>) -> Result<PipelineOutcome> {
    let downloader = HttpDownloader::from(config.http);
    run_with(config, &downloader)
}

/// Run the pipeline using `downloader` for all network access.
///
/// # Errors
///
/// - [`ExtractError::DestinationNotEmpty`] before any download when the
///   destination holds files and `force` is unset.
/// - [`ExtractError::ArchiveNotFound`] when a local archive is missing.
/// - [`ExtractError::IntegrityMismatch`] when a download does not match its
///   published digest. The destination is left untouched.
/// - [`ExtractError::UnsafePath`] when a datapack member would escape the
///   destination. Nothing is written.
/// - Resolution, transport, and file access errors otherwise.
pub fn run_with(
    config: &PipelineConfig<'_>,
    downloader: &dyn ArtifactDownloader,
) -> Result<PipelineOutcome> {
    destination::check(config.destination, config.force)?;

    let resolver = ArtifactResolver::new(downloader, &config.http.manifest_url);
    let source = resolver.resolve(&ResolveRequest {
        version: config.version,
        explicit_archive: config.explicit_archive,
        install_dir: config.install_dir,
        download_kind: config.download_kind,
    })?;
    let archive = source.path();
    info!("reading {} from {}", source.kind(), archive.display());

    if source.kind().is_local() && !archive.is_file() {
        return Err(ExtractError::ArchiveNotFound {
            path: archive.to_path_buf(),
        });
    }

    match source.expected_sha1() {
        Some(expected) => verify_sha1(archive, expected)?,
        None => debug!("no published digest for {}", archive.display()),
    }

    destination::prepare(config.destination, config.force)?;
    let summary = extract_members(archive, config.destination, &DatapackSelector)?;
    info!(
        "extracted {} files and {} directories to {} ({} members skipped)",
        summary.files,
        summary.directories,
        config.destination.display(),
        summary.skipped
    );

    Ok(PipelineOutcome {
        source: source.kind(),
        destination: config.destination.to_path_buf(),
        summary,
    })
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
