//! Vanilla datapack extractor library.
//!
//! Obtains a Minecraft jar for a given version and extracts the datapack it
//! carries (`pack.mcmeta`, `pack.png`, and `data/`) into a directory. The jar
//! comes from an explicit path, a local game install, or a download that is
//! checked against its published SHA-1 digest. Extraction rejects absolute
//! and parent-relative member names before writing anything.
//!
//! The `vanilla-extractor` binary is a thin front end over [`pipeline`].
//!
//! # Modules
//!
//! - [`checksum`] - Streaming SHA-1 digests and verification
//! - [`cli`] - Command-line argument definitions
//! - [`destination`] - Destination directory guard and preparation
//! - [`dirs`] - Platform default game directory resolution
//! - [`download`] - HTTP transport abstraction
//! - [`download_kind`] - Client/server jar selector
//! - [`error`] - Error taxonomy and `Result` alias
//! - [`extraction`] - Path-safe zip member extraction
//! - [`interrupt`] - Temporary artefact cleanup on Ctrl-C
//! - [`manifest`] - Version manifest and detail documents
//! - [`output`] - Progress and result messages
//! - [`pipeline`] - End-to-end orchestration
//! - [`resolver`] - Archive source resolution
//! - [`selector`] - Member selection predicates
//! - [`version`] - Validated version identifiers

pub mod checksum;
pub mod cli;
pub mod destination;
pub mod dirs;
pub mod download;
pub mod download_kind;
pub mod error;
pub mod extraction;
pub mod interrupt;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod resolver;
pub mod selector;
pub mod version;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
