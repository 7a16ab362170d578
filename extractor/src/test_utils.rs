//! Shared test utilities for the extractor crate.
//!
//! Builds zip fixtures, metadata documents, and a recording stub transport
//! so resolver and pipeline tests run without network access.

use crate::download::{ArtifactDownloader, DownloadError};
use sha1::{Digest, Sha1};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

/// Manifest URL used by fixtures.
pub const TEST_MANIFEST_URL: &str = "https://meta.example.test/mc/game/version_manifest_v2.json";

/// Return the lowercase hex SHA-1 of `bytes`.
pub fn sha1_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha1::digest(bytes))
}

/// A member to place in a fixture archive.
#[derive(Debug, Clone)]
pub enum ArchiveMember {
    /// A regular file with the given contents.
    File {
        /// Stored name.
        name: String,
        /// File contents.
        contents: Vec<u8>,
    },
    /// A directory entry.
    Dir {
        /// Stored name (a trailing `/` is added by the writer if missing).
        name: String,
    },
    /// A symbolic link entry.
    Symlink {
        /// Stored name.
        name: String,
        /// Link target recorded in the archive.
        target: String,
    },
}

impl ArchiveMember {
    /// A regular file member.
    pub fn file(name: &str, contents: &[u8]) -> Self {
        Self::File {
            name: name.to_owned(),
            contents: contents.to_vec(),
        }
    }

    /// A directory member.
    pub fn dir(name: &str) -> Self {
        Self::Dir {
            name: name.to_owned(),
        }
    }

    /// A symbolic link member.
    pub fn symlink(name: &str, target: &str) -> Self {
        Self::Symlink {
            name: name.to_owned(),
            target: target.to_owned(),
        }
    }
}

/// Write a zip archive containing `members` to `path`.
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn write_zip(path: &Path, members: &[ArchiveMember]) {
    let file = std::fs::File::create(path).expect("create archive");
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for member in members {
        match member {
            ArchiveMember::File { name, contents } => {
                writer.start_file(name.as_str(), options).expect("start file");
                writer.write_all(contents).expect("write member");
            }
            ArchiveMember::Dir { name } => {
                writer
                    .add_directory(name.as_str(), options)
                    .expect("add directory");
            }
            ArchiveMember::Symlink { name, target } => {
                writer
                    .add_symlink(name.as_str(), target.as_str(), options)
                    .expect("add symlink");
            }
        }
    }
    writer.finish().expect("finish archive");
}

/// Build a jar-like archive in memory and return its bytes.
///
/// The archive holds a small datapack plus members outside it.
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn sample_jar_bytes() -> Vec<u8> {
    let temp = tempfile::tempdir().expect("temp dir");
    let path = temp.path().join("sample.jar");
    write_zip(&path, &sample_jar_members());
    std::fs::read(&path).expect("read archive")
}

/// Members of [`sample_jar_bytes`].
pub fn sample_jar_members() -> Vec<ArchiveMember> {
    vec![
        ArchiveMember::file("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n"),
        ArchiveMember::file("pack.mcmeta", b"{\"pack\":{\"pack_format\":75}}"),
        ArchiveMember::file("pack.png", b"\x89PNG"),
        ArchiveMember::dir("data/"),
        ArchiveMember::dir("data/minecraft/"),
        ArchiveMember::file("data/minecraft/dimension_type/overworld.json", b"{}"),
        ArchiveMember::file("data/minecraft/loot_table/chests/igloo_chest.json", b"{}"),
        ArchiveMember::file("assets/minecraft/lang/en_us.json", b"{}"),
        ArchiveMember::file("net/minecraft/client/main/Main.class", b"\xca\xfe\xba\xbe"),
    ]
}

/// Relative paths of the files [`sample_jar_bytes`] contributes to a datapack.
pub const SAMPLE_DATAPACK_FILES: [&str; 4] = [
    "data/minecraft/dimension_type/overworld.json",
    "data/minecraft/loot_table/chests/igloo_chest.json",
    "pack.mcmeta",
    "pack.png",
];

/// Build a version manifest listing `(id, url)` entries.
pub fn manifest_json(entries: &[(&str, &str)]) -> String {
    let versions: Vec<serde_json::Value> = entries
        .iter()
        .map(|(id, url)| serde_json::json!({ "id": id, "type": "release", "url": url }))
        .collect();
    serde_json::json!({ "versions": versions }).to_string()
}

/// Build a version detail document with one download of `kind`.
pub fn detail_json(kind: &str, url: &str, sha1: Option<&str>) -> String {
    let mut download = serde_json::json!({ "url": url, "size": 0 });
    if let Some(digest) = sha1 {
        download["sha1"] = serde_json::Value::from(digest);
    }
    serde_json::json!({ "id": "fixture", "downloads": { kind: download } }).to_string()
}

/// An in-memory transport that serves canned bodies and records requests.
#[derive(Debug, Default)]
pub struct StubDownloader {
    documents: HashMap<String, String>,
    files: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl StubDownloader {
    /// Create a stub that serves nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` as a document at `url`.
    #[must_use]
    pub fn with_document(mut self, url: &str, body: impl Into<String>) -> Self {
        self.documents.insert(url.to_owned(), body.into());
        self
    }

    /// Serve `bytes` as a downloadable file at `url`.
    #[must_use]
    pub fn with_file(mut self, url: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(url.to_owned(), bytes.into());
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn record(&self, url: &str) {
        self.requests.borrow_mut().push(url.to_owned());
    }
}

impl ArtifactDownloader for StubDownloader {
    fn fetch_document(&self, url: &str) -> Result<String, DownloadError> {
        self.record(url);
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| DownloadError::NotFound {
                url: url.to_owned(),
            })
    }

    fn download_to(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        self.record(url);
        let bytes = self.files.get(url).ok_or_else(|| DownloadError::NotFound {
            url: url.to_owned(),
        })?;
        std::fs::write(dest, bytes).map_err(|source| DownloadError::Io {
            path: dest.to_path_buf(),
            source,
        })
    }
}
