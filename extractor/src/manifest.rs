//! Version metadata documents.
//!
//! The metadata service publishes two JSON documents:
//!
//! - a version manifest mapping `versions` to `{ "id", "url" }` entries;
//! - one detail document per version whose `downloads` mapping associates a
//!   download kind with `{ "url", "sha1" }`.
//!
//! Only those fields are read; everything else in the documents is ignored.
//! Entries are parsed leniently and only the one a run selects has to carry a
//! usable `url` and digest.

use crate::checksum::Sha1Digest;
use crate::download_kind::DownloadKind;
use crate::error::{ExtractError, Result};
use crate::version::VersionId;
use serde::Deserialize;
use std::collections::BTreeMap;

/// The top-level version manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionManifest {
    /// Known versions, newest first as published.
    #[serde(default)]
    pub versions: Vec<VersionEntry>,
    #[serde(skip)]
    source: String,
}

/// A single manifest entry pointing at a version's detail document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionEntry {
    /// The version identifier.
    pub id: String,
    /// URL of the version detail document.
    #[serde(default)]
    pub url: Option<String>,
}

/// The per-version detail document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionDetail {
    /// Downloadable artefacts keyed by kind (`client`, `server`, ...).
    #[serde(default)]
    pub downloads: BTreeMap<String, DownloadEntry>,
    #[serde(skip)]
    source: String,
}

/// A downloadable artefact as published in a detail document.
///
/// Fields are kept raw; [`VersionDetail::descriptor`] validates them for the
/// selected kind only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DownloadEntry {
    /// Where to fetch the artefact.
    #[serde(default)]
    pub url: Option<String>,
    /// Published SHA-1 digest. Empty means unpublished.
    #[serde(default)]
    pub sha1: Option<String>,
}

/// A resolved download: where to fetch the jar and how to verify it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    /// The download kind this descriptor was selected by.
    pub kind: DownloadKind,
    /// Where to fetch the artefact.
    pub url: String,
    /// Expected SHA-1 digest of the artefact, if published.
    pub sha1: Option<Sha1Digest>,
}

impl VersionManifest {
    /// Parse a manifest document fetched from `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidMetadata`] if the JSON is malformed.
    pub fn parse(json: &str, url: &str) -> Result<Self> {
        let mut manifest: Self = parse_document(json, url)?;
        manifest.source = url.to_owned();
        Ok(manifest)
    }

    /// Find the entry whose identifier equals `version` exactly.
    #[must_use]
    pub fn find(&self, version: &VersionId) -> Option<&VersionEntry> {
        self.versions
            .iter()
            .find(|entry| entry.id == version.as_str())
    }

    /// Return the detail document URL for `version`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::VersionNotFound`] when no entry matches and
    /// [`ExtractError::InvalidMetadata`] when the matching entry has no URL.
    pub fn detail_url(&self, version: &VersionId) -> Result<&str> {
        let entry = self
            .find(version)
            .ok_or_else(|| ExtractError::VersionNotFound {
                version: version.clone(),
                manifest_url: self.source.clone(),
            })?;
        non_empty(entry.url.as_deref()).ok_or_else(|| {
            invalid_metadata(&self.source, format!("version {version} has no detail URL"))
        })
    }
}

impl VersionDetail {
    /// Parse a version detail document fetched from `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidMetadata`] if the JSON is malformed.
    pub fn parse(json: &str, url: &str) -> Result<Self> {
        let mut detail: Self = parse_document(json, url)?;
        detail.source = url.to_owned();
        Ok(detail)
    }

    /// Select the download of the given kind.
    ///
    /// An empty `sha1` is treated as unpublished.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::UnsupportedDownloadKind`] when the document
    /// has no such download, and [`ExtractError::InvalidMetadata`] when the
    /// download lacks a URL or its digest is not 40 hex characters.
    pub fn descriptor(&self, version: &VersionId, kind: DownloadKind) -> Result<ArtifactDescriptor> {
        let entry = self.downloads.get(kind.manifest_key()).ok_or_else(|| {
            ExtractError::UnsupportedDownloadKind {
                version: version.clone(),
                kind,
            }
        })?;
        let url = non_empty(entry.url.as_deref()).ok_or_else(|| {
            invalid_metadata(&self.source, format!("{kind} download has no URL"))
        })?;
        let sha1 = non_empty(entry.sha1.as_deref())
            .map(Sha1Digest::try_from)
            .transpose()
            .map_err(|e| invalid_metadata(&self.source, e.to_string()))?;
        Ok(ArtifactDescriptor {
            kind,
            url: url.to_owned(),
            sha1,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn invalid_metadata(url: &str, reason: String) -> ExtractError {
    ExtractError::InvalidMetadata {
        url: url.to_owned(),
        reason,
    }
}

fn parse_document<T: serde::de::DeserializeOwned>(json: &str, url: &str) -> Result<T> {
    serde_json::from_str(json).map_err(|e| invalid_metadata(url, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;

    const MANIFEST_URL: &str = "https://meta.example.test/version_manifest_v2.json";
    const DETAIL_URL: &str = "https://meta.example.test/v1/1.21.11.json";

    fn version(id: &str) -> VersionId {
        VersionId::try_from(id).expect("valid version")
    }

    fn manifest() -> VersionManifest {
        let json = r#"{
            "latest": {"release": "1.21.11", "snapshot": "25w46a"},
            "versions": [
                {"id": "25w46a", "type": "snapshot", "url": "https://meta.example.test/v1/25w46a.json"},
                {"id": "1.21.11", "type": "release", "url": "https://meta.example.test/v1/1.21.11.json"},
                {"id": "1.21.1", "type": "release", "url": "https://meta.example.test/v1/1.21.1.json"}
            ]
        }"#;
        VersionManifest::parse(json, MANIFEST_URL).expect("valid manifest")
    }

    #[test]
    fn finds_exact_version() {
        let entry = manifest().find(&version("1.21.11")).cloned().expect("present");
        assert_eq!(entry.url.as_deref(), Some(DETAIL_URL));
        assert_eq!(manifest().detail_url(&version("1.21.11")).expect("url"), DETAIL_URL);
    }

    #[rstest]
    #[case::prefix("1.21")]
    #[case::longer("1.21.111")]
    #[case::latest("latest")]
    fn does_not_fuzzy_match(#[case] id: &str) {
        assert!(manifest().find(&version(id)).is_none());
    }

    #[test]
    fn missing_versions_key_is_empty() {
        let parsed = VersionManifest::parse("{}", MANIFEST_URL).expect("valid");
        assert!(parsed.versions.is_empty());
    }

    #[test]
    fn malformed_manifest_is_invalid_metadata() {
        let err = VersionManifest::parse("{not json", MANIFEST_URL).expect_err("malformed");
        assert!(matches!(err, ExtractError::InvalidMetadata { .. }));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    fn detail() -> VersionDetail {
        let json = r#"{
            "id": "1.21.11",
            "downloads": {
                "client": {"sha1": "0123456789ABCDEF0123456789abcdef01234567", "size": 1, "url": "https://cdn.example.test/client.jar"},
                "server": {"url": "https://cdn.example.test/server.jar"}
            }
        }"#;
        VersionDetail::parse(json, DETAIL_URL).expect("valid detail")
    }

    #[test]
    fn selects_client_download_with_digest() {
        let descriptor = detail()
            .descriptor(&version("1.21.11"), DownloadKind::Client)
            .expect("client present");
        assert_eq!(descriptor.url, "https://cdn.example.test/client.jar");
        assert_eq!(
            descriptor.sha1.map(|d| d.to_string()).as_deref(),
            Some("0123456789abcdef0123456789abcdef01234567")
        );
    }

    #[test]
    fn digest_is_optional() {
        let descriptor = detail()
            .descriptor(&version("1.21.11"), DownloadKind::Server)
            .expect("server present");
        assert!(descriptor.sha1.is_none());
    }

    #[test]
    fn absent_kind_is_unsupported() {
        let json = r#"{"downloads": {"client": {"url": "https://cdn.example.test/c.jar"}}}"#;
        let parsed = VersionDetail::parse(json, DETAIL_URL).expect("valid");
        let err = parsed
            .descriptor(&version("1.21.11"), DownloadKind::Server)
            .expect_err("no server");
        assert_eq!(err.kind(), ErrorKind::UnsupportedDownloadKind);
    }

    #[test]
    fn unknown_version_names_the_manifest() {
        let err = manifest()
            .detail_url(&version("1.21"))
            .expect_err("absent");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains(MANIFEST_URL));
    }

    #[test]
    fn unrelated_entries_without_url_are_ignored() {
        let json = r#"{"versions": [
            {"id": "old-alpha"},
            {"id": "1.21.11", "url": "https://meta.example.test/v1/1.21.11.json"}
        ]}"#;
        let parsed = VersionManifest::parse(json, MANIFEST_URL).expect("lenient");
        assert_eq!(parsed.detail_url(&version("1.21.11")).expect("url"), DETAIL_URL);
    }

    #[rstest]
    #[case::missing(r#"{"versions": [{"id": "1.21.11"}]}"#)]
    #[case::empty(r#"{"versions": [{"id": "1.21.11", "url": ""}]}"#)]
    fn selected_entry_without_url_is_invalid(#[case] json: &str) {
        let parsed = VersionManifest::parse(json, MANIFEST_URL).expect("lenient");
        let err = parsed.detail_url(&version("1.21.11")).expect_err("no url");
        assert!(matches!(err, ExtractError::InvalidMetadata { ref url, .. } if url == MANIFEST_URL));
    }

    #[test]
    fn empty_digest_is_unpublished() {
        let json = r#"{"downloads": {"client": {"url": "https://cdn.example.test/c.jar", "sha1": ""}}}"#;
        let descriptor = VersionDetail::parse(json, DETAIL_URL)
            .expect("valid")
            .descriptor(&version("1.21.11"), DownloadKind::Client)
            .expect("client present");
        assert!(descriptor.sha1.is_none());
    }

    #[test]
    fn unrelated_downloads_are_not_validated() {
        let json = r#"{"downloads": {
            "client": {"url": "https://cdn.example.test/c.jar"},
            "windows_server": {"sha1": "short"}
        }}"#;
        let descriptor = VersionDetail::parse(json, DETAIL_URL)
            .expect("lenient")
            .descriptor(&version("1.21.11"), DownloadKind::Client)
            .expect("client present");
        assert_eq!(descriptor.url, "https://cdn.example.test/c.jar");
    }

    #[rstest]
    #[case::short_digest(r#"{"downloads": {"client": {"url": "u", "sha1": "short"}}}"#)]
    #[case::missing_url(r#"{"downloads": {"client": {"sha1": "da39a3ee5e6b4b0d3255bfef95601890afd80709"}}}"#)]
    fn malformed_selected_download_is_invalid(#[case] json: &str) {
        let err = VersionDetail::parse(json, DETAIL_URL)
            .expect("lenient")
            .descriptor(&version("1.21.11"), DownloadKind::Client)
            .expect_err("malformed");
        assert!(matches!(err, ExtractError::InvalidMetadata { ref url, .. } if url == DETAIL_URL));
    }
}
