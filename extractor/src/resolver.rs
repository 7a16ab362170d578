//! Archive source resolution.
//!
//! Decides where the bytes of a version's jar come from, in order of
//! precedence:
//!
//! 1. an explicitly supplied archive path (never falls back);
//! 2. the jar of a local game install, `<install>/versions/<v>/<v>.jar`;
//! 3. a download described by the remote version metadata.
//!
//! Local files are trusted and carry no digest. Downloads land in a scoped
//! temporary directory that is deleted when the returned [`ArchiveSource`]
//! is dropped.

use crate::checksum::Sha1Digest;
use crate::download::ArtifactDownloader;
use crate::download_kind::DownloadKind;
use crate::error::{ExtractError, Result};
use crate::interrupt::{self, CleanupGuard};
use crate::manifest::{ArtifactDescriptor, VersionDetail, VersionManifest};
use crate::version::VersionId;
use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Default location of the version manifest.
pub const DEFAULT_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// Inputs to a single resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'a> {
    /// The version to resolve.
    pub version: &'a VersionId,
    /// An archive path that overrides every other source.
    pub explicit_archive: Option<&'a Path>,
    /// Root of a local game install to look for a cached jar in.
    pub install_dir: Option<&'a Path>,
    /// Which jar to download when falling back to the network.
    pub download_kind: DownloadKind,
}

/// Where the archive bytes come from.
#[derive(Debug)]
pub enum ArchiveSource {
    /// A path supplied by the caller. Its existence has not been checked.
    Explicit {
        /// The supplied path.
        path: PathBuf,
    },
    /// The jar of a local game install.
    Installed {
        /// Path of the installed jar.
        path: PathBuf,
    },
    /// A freshly downloaded jar in a temporary directory.
    Downloaded(DownloadedArchive),
}

impl ArchiveSource {
    /// Path of the archive on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Explicit { path } | Self::Installed { path } => path,
            Self::Downloaded(archive) => archive.path(),
        }
    }

    /// Digest the archive must match, when one was published.
    #[must_use]
    pub fn expected_sha1(&self) -> Option<&Sha1Digest> {
        match self {
            Self::Explicit { .. } | Self::Installed { .. } => None,
            Self::Downloaded(archive) => archive.descriptor().sha1.as_ref(),
        }
    }

    /// Which branch of resolution produced this source.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::Explicit { .. } => SourceKind::Explicit,
            Self::Installed { .. } => SourceKind::Installed,
            Self::Downloaded(_) => SourceKind::Downloaded,
        }
    }
}

/// Resolution branch that supplied an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A caller-supplied archive path.
    Explicit,
    /// The jar of a local game install.
    Installed,
    /// A download from the version metadata service.
    Downloaded,
}

impl SourceKind {
    /// True for sources read from the local filesystem as-is.
    #[must_use]
    pub const fn is_local(self) -> bool {
        !matches!(self, Self::Downloaded)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Explicit => "archive",
            Self::Installed => "installed jar",
            Self::Downloaded => "download",
        })
    }
}

/// A downloaded archive that is deleted when dropped.
#[derive(Debug)]
pub struct DownloadedArchive {
    path: PathBuf,
    descriptor: ArtifactDescriptor,
    // Dropped before the cleanup registration is released.
    _dir: TempDir,
    _cleanup: CleanupGuard,
}

impl DownloadedArchive {
    /// Path of the downloaded file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The descriptor the file was downloaded from.
    #[must_use]
    pub const fn descriptor(&self) -> &ArtifactDescriptor {
        &self.descriptor
    }
}

/// Conventional path of a version's jar inside a local game install.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use vanilla_extractor::resolver::installed_jar_path;
/// use vanilla_extractor::version::VersionId;
///
/// let version = VersionId::try_from("1.21.11").expect("valid");
/// let path = installed_jar_path(Path::new("/games/mc"), &version);
/// assert!(path.ends_with("versions/1.21.11/1.21.11.jar"));
/// ```
#[must_use]
pub fn installed_jar_path(install_dir: &Path, version: &VersionId) -> PathBuf {
    install_dir
        .join("versions")
        .join(version.as_str())
        .join(format!("{version}.jar"))
}

/// Resolves versions to archive sources.
pub struct ArtifactResolver<'a> {
    downloader: &'a dyn ArtifactDownloader,
    manifest_url: &'a str,
}

impl<'a> ArtifactResolver<'a> {
    /// Create a resolver that reads the manifest at `manifest_url`.
    #[must_use]
    pub fn new(downloader: &'a dyn ArtifactDownloader, manifest_url: &'a str) -> Self {
        Self {
            downloader,
            manifest_url,
        }
    }

    /// Resolve the archive source for `request`.
    ///
    /// Performs at most one manifest fetch, one detail fetch, and one
    /// artefact download, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::VersionNotFound`] if the manifest lacks the
    /// version, [`ExtractError::UnsupportedDownloadKind`] if the version has
    /// no download of the requested kind, and transport or file errors from
    /// the download itself.
    pub fn resolve(&self, request: &ResolveRequest<'_>) -> Result<ArchiveSource> {
        if let Some(path) = request.explicit_archive {
            debug!("using explicit archive {}", path.display());
            return Ok(ArchiveSource::Explicit {
                path: path.to_path_buf(),
            });
        }

        if let Some(install_dir) = request.install_dir {
            let path = installed_jar_path(install_dir, request.version);
            if path.is_file() {
                info!("using installed jar {}", path.display());
                return Ok(ArchiveSource::Installed { path });
            }
            debug!("no installed jar at {}", path.display());
        }

        let descriptor = self.fetch_descriptor(request.version, request.download_kind)?;
        self.download(request.version, descriptor)
            .map(ArchiveSource::Downloaded)
    }

    fn fetch_descriptor(
        &self,
        version: &VersionId,
        kind: DownloadKind,
    ) -> Result<ArtifactDescriptor> {
        let manifest_json = self.downloader.fetch_document(self.manifest_url)?;
        let manifest = VersionManifest::parse(&manifest_json, self.manifest_url)?;
        let detail_url = manifest.detail_url(version)?;
        debug!("version {version} described at {detail_url}");

        let detail_json = self.downloader.fetch_document(detail_url)?;
        VersionDetail::parse(&detail_json, detail_url)?.descriptor(version, kind)
    }

    fn download(
        &self,
        version: &VersionId,
        descriptor: ArtifactDescriptor,
    ) -> Result<DownloadedArchive> {
        let dir = tempfile::Builder::new()
            .prefix("vanilla-extractor-")
            .tempdir()
            .map_err(|e| ExtractError::file_access(std::env::temp_dir(), e))?;
        let cleanup = interrupt::register(dir.path());
        let path = dir.path().join(format!("{version}-{}.jar", descriptor.kind));

        info!("downloading {} jar for {version}", descriptor.kind);
        self.downloader.download_to(&descriptor.url, &path)?;

        Ok(DownloadedArchive {
            path,
            descriptor,
            _dir: dir,
            _cleanup: cleanup,
        })
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
