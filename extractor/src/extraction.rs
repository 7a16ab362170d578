//! Zip-slip-safe archive extraction.
//!
//! Jar files are zip containers whose member names are attacker-controllable
//! strings. Every selected name is validated as a string, independent of the
//! host's path semantics, before anything is written:
//!
//! - a name starting with `/` or `\` is rejected as absolute;
//! - a name with a `..` segment (split on either separator) is rejected;
//! - a name containing `:` is rejected, since a segment such as `C:` is a
//!   drive prefix on Windows and replaces the base path when joined.
//!
//! The zip crate's own `enclosed_name` check runs as a second guard.
//!
//! Validation covers all selected members up front, so an archive carrying a
//! single hostile name writes nothing at all. Extraction only ever produces
//! plain directories and regular files; symlink entries, device nodes, and
//! stored permission bits are not honoured.

use crate::selector::MemberSelector;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Separators recognised when validating member names.
const SEPARATORS: [char; 2] = ['/', '\\'];

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// A selected member name would escape the destination directory.
    #[error("unsafe path in archive entry {path}: {reason}")]
    UnsafePath {
        /// The member name as stored in the archive.
        path: String,
        /// Which rule the name violated.
        reason: &'static str,
    },

    /// Reading the archive or writing an output file failed.
    #[error("extraction I/O error on {path}: {source}")]
    Io {
        /// The file or directory being accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The archive is not a readable zip container.
    #[error("cannot read archive {path}: {source}")]
    Archive {
        /// The archive path.
        path: PathBuf,
        /// The underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },
}

/// Counts describing a completed extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Regular files written.
    pub files: usize,
    /// Directory members materialised.
    pub directories: usize,
    /// Members rejected by the selector.
    pub skipped: usize,
}

/// A selected member that passed validation.
#[derive(Debug)]
struct PlannedMember {
    index: usize,
    name: String,
    is_dir: bool,
}

/// Check a stored member name for absolute or parent-directory references.
///
/// # Errors
///
/// Returns [`ExtractionError::UnsafePath`] naming the violated rule.
///
/// # Examples
///
/// ```
/// use vanilla_extractor::extraction::validate_member_name;
///
/// assert!(validate_member_name("data/minecraft/tags/block/logs.json").is_ok());
/// assert!(validate_member_name("data/../../evil").is_err());
/// assert!(validate_member_name("/etc/passwd").is_err());
/// assert!(validate_member_name("data/C:/evil").is_err());
/// ```
pub fn validate_member_name(name: &str) -> Result<(), ExtractionError> {
    let unsafe_path = |reason| ExtractionError::UnsafePath {
        path: name.to_owned(),
        reason,
    };
    if name.starts_with(SEPARATORS) {
        return Err(unsafe_path("absolute paths are not allowed"));
    }
    if name.split(SEPARATORS).any(|segment| segment == "..") {
        return Err(unsafe_path("parent directory references are not allowed"));
    }
    if name.contains(':') {
        return Err(unsafe_path("drive prefixes are not allowed"));
    }
    Ok(())
}

/// Extract the members of `archive_path` accepted by `selector` into `dest_dir`.
///
/// `dest_dir` must already exist. Members the selector rejects are skipped
/// silently. Output is not transactional: an I/O failure part-way through
/// leaves the files written so far in place.
///
/// # Errors
///
/// Returns [`ExtractionError::UnsafePath`] before writing anything if any
/// selected member name is absolute, contains `..`, or names a drive.
/// Returns [`ExtractionError::Archive`] if the archive cannot be parsed and
/// [`ExtractionError::Io`] on read or write failures.
pub fn extract_members(
    archive_path: &Path,
    dest_dir: &Path,
    selector: &dyn MemberSelector,
) -> Result<ExtractionSummary, ExtractionError> {
    let file = File::open(archive_path).map_err(|source| ExtractionError::Io {
        path: archive_path.to_path_buf(),
        source,
    })?;
    let zip_error = |source| ExtractionError::Archive {
        path: archive_path.to_path_buf(),
        source,
    };
    let mut archive = ZipArchive::new(file).map_err(zip_error)?;

    let mut summary = ExtractionSummary::default();
    let mut planned = Vec::new();
    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index).map_err(zip_error)?;
        let name = entry.name().to_owned();
        if !selector.accepts(&name) {
            log::trace!("skipping {name}");
            summary.skipped += 1;
            continue;
        }
        validate_member_name(&name)?;
        if entry.enclosed_name().is_none() {
            return Err(ExtractionError::UnsafePath {
                path: name,
                reason: "name escapes the destination",
            });
        }
        planned.push(PlannedMember {
            index,
            is_dir: name.ends_with(SEPARATORS),
            name,
        });
    }

    for member in planned {
        let target = destination_for(dest_dir, &member.name);
        if member.is_dir {
            create_dir_all(&target)?;
            summary.directories += 1;
            continue;
        }
        if let Some(parent) = target.parent() {
            create_dir_all(parent)?;
        }
        let mut entry = archive.by_index(member.index).map_err(zip_error)?;
        let io_error = |source| ExtractionError::Io {
            path: target.clone(),
            source,
        };
        let mut output = File::create(&target).map_err(io_error)?;
        std::io::copy(&mut entry, &mut output).map_err(io_error)?;
        summary.files += 1;
    }

    log::debug!(
        "extracted {} files and {} directories from {} ({} members skipped)",
        summary.files,
        summary.directories,
        archive_path.display(),
        summary.skipped
    );
    Ok(summary)
}

/// Map a validated member name onto the destination tree.
fn destination_for(dest_dir: &Path, name: &str) -> PathBuf {
    name.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .fold(dest_dir.to_path_buf(), |path, segment| path.join(segment))
}

fn create_dir_all(path: &Path) -> Result<(), ExtractionError> {
    fs::create_dir_all(path).map_err(|source| ExtractionError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::DatapackSelector;
    use crate::test_utils::{ArchiveMember, write_zip};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct Sandbox {
        _temp: TempDir,
        archive: PathBuf,
        dest: PathBuf,
    }

    #[fixture]
    fn sandbox() -> Sandbox {
        let temp = tempfile::tempdir().expect("temp dir");
        let archive = temp.path().join("client.jar");
        let dest = temp.path().join("out");
        fs::create_dir_all(&dest).expect("create dest");
        Sandbox {
            _temp: temp,
            archive,
            dest,
        }
    }

    fn accept_all(_: &str) -> bool {
        true
    }

    fn is_empty_dir(path: &Path) -> bool {
        fs::read_dir(path).expect("read dest").next().is_none()
    }

    #[rstest]
    #[case::relative_parent("../../etc/passwd")]
    #[case::nested_parent("data/../../evil")]
    #[case::trailing_parent("data/..")]
    #[case::backslash_parent("data\\..\\..\\evil")]
    #[case::absolute("/etc/passwd")]
    #[case::absolute_backslash("\\windows\\system32\\evil.dll")]
    #[case::drive_segment("data/C:/evil")]
    #[case::drive_segment_backslash("data/C:\\evil")]
    #[case::drive_relative("C:evil")]
    #[case::unc_drive("data/\\\\?\\C:\\evil")]
    fn rejects_hostile_names(#[case] name: &str) {
        let result = validate_member_name(name);
        assert!(
            matches!(result, Err(ExtractionError::UnsafePath { .. })),
            "expected UnsafePath for {name}"
        );
    }

    #[rstest]
    #[case::plain("data/minecraft/recipe/stick.json")]
    #[case::dotted_file("data/minecraft/..hidden")]
    #[case::dots_in_name("data/a..b/c.json")]
    #[case::directory("data/minecraft/")]
    #[case::current_dir("data/./x.json")]
    fn accepts_contained_names(#[case] name: &str) {
        assert!(validate_member_name(name).is_ok(), "{name}");
    }

    #[rstest]
    fn extracts_only_datapack_members(sandbox: Sandbox) {
        write_zip(
            &sandbox.archive,
            &[
                ArchiveMember::file("pack.mcmeta", b"{\"pack\":{}}"),
                ArchiveMember::file("pack.png", b"png"),
                ArchiveMember::dir("data/"),
                ArchiveMember::file("data/minecraft/tags/block/logs.json", b"{}"),
                ArchiveMember::file("assets/minecraft/lang/en_us.json", b"{}"),
                ArchiveMember::file("net/minecraft/Main.class", b"cafebabe"),
            ],
        );

        let summary = extract_members(&sandbox.archive, &sandbox.dest, &DatapackSelector)
            .expect("extract");

        assert_eq!(
            summary,
            ExtractionSummary {
                files: 3,
                directories: 1,
                skipped: 2,
            }
        );
        assert_eq!(
            fs::read(sandbox.dest.join("pack.mcmeta")).expect("read"),
            b"{\"pack\":{}}"
        );
        assert!(sandbox.dest.join("data/minecraft/tags/block/logs.json").is_file());
        assert!(!sandbox.dest.join("assets").exists());
        assert!(!sandbox.dest.join("net").exists());
    }

    #[rstest]
    fn hostile_member_writes_nothing(sandbox: Sandbox) {
        write_zip(
            &sandbox.archive,
            &[
                ArchiveMember::file("pack.mcmeta", b"{}"),
                ArchiveMember::file("data/ok.json", b"{}"),
                ArchiveMember::file("data/../../evil", b"owned"),
            ],
        );

        let err = extract_members(&sandbox.archive, &sandbox.dest, &DatapackSelector)
            .expect_err("hostile archive");

        assert!(matches!(err, ExtractionError::UnsafePath { ref path, .. } if path == "data/../../evil"));
        assert!(is_empty_dir(&sandbox.dest));
        let escaped = sandbox.dest.parent().map(|p| p.join("evil"));
        assert!(escaped.is_some_and(|p| !p.exists()));
    }

    #[rstest]
    #[case::traversal("../../etc/passwd")]
    #[case::absolute("/etc/passwd")]
    #[case::drive("data/C:/evil")]
    fn hostile_names_fail_under_permissive_selector(sandbox: Sandbox, #[case] name: &str) {
        write_zip(&sandbox.archive, &[ArchiveMember::file(name, b"root:x:0:0")]);

        let err = extract_members(&sandbox.archive, &sandbox.dest, &accept_all)
            .expect_err("hostile archive");

        assert!(matches!(err, ExtractionError::UnsafePath { .. }));
        assert!(is_empty_dir(&sandbox.dest));
    }

    #[rstest]
    fn hostile_names_outside_selection_are_skipped(sandbox: Sandbox) {
        write_zip(
            &sandbox.archive,
            &[
                ArchiveMember::file("../../etc/passwd", b"root"),
                ArchiveMember::file("/etc/shadow", b"root"),
                ArchiveMember::file("data/a.json", b"{}"),
            ],
        );

        let summary = extract_members(&sandbox.archive, &sandbox.dest, &DatapackSelector)
            .expect("extract");

        assert_eq!(summary.files, 1);
        assert_eq!(summary.skipped, 2);
    }

    #[rstest]
    fn symlink_entries_become_plain_files(sandbox: Sandbox) {
        write_zip(
            &sandbox.archive,
            &[ArchiveMember::symlink("data/link", "/etc/passwd")],
        );

        extract_members(&sandbox.archive, &sandbox.dest, &DatapackSelector).expect("extract");

        let link = sandbox.dest.join("data/link");
        let metadata = fs::symlink_metadata(&link).expect("metadata");
        assert!(metadata.file_type().is_file());
        assert_eq!(fs::read_to_string(&link).expect("read"), "/etc/passwd");
    }

    #[rstest]
    fn overwrites_existing_files(sandbox: Sandbox) {
        fs::write(sandbox.dest.join("pack.mcmeta"), b"stale").expect("seed");
        write_zip(&sandbox.archive, &[ArchiveMember::file("pack.mcmeta", b"fresh")]);

        extract_members(&sandbox.archive, &sandbox.dest, &DatapackSelector).expect("extract");

        assert_eq!(fs::read(sandbox.dest.join("pack.mcmeta")).expect("read"), b"fresh");
    }

    #[rstest]
    fn corrupt_archive_is_reported(sandbox: Sandbox) {
        fs::write(&sandbox.archive, b"definitely not a zip").expect("write");

        let err = extract_members(&sandbox.archive, &sandbox.dest, &DatapackSelector)
            .expect_err("corrupt");

        assert!(matches!(err, ExtractionError::Archive { .. }));
    }

    #[rstest]
    fn missing_archive_is_io_error(sandbox: Sandbox) {
        let err = extract_members(&sandbox.dest.join("absent.jar"), &sandbox.dest, &DatapackSelector)
            .expect_err("missing");
        assert!(matches!(err, ExtractionError::Io { .. }));
    }

    #[test]
    fn destination_skips_empty_and_current_segments() {
        let root = Path::new("out");
        assert_eq!(
            destination_for(root, "data//minecraft/./x.json"),
            root.join("data").join("minecraft").join("x.json")
        );
    }
}
