//! Human-readable progress output for the CLI.
//!
//! Progress goes to stderr so stdout stays free for scripting. Diagnostic
//! detail belongs in `log` records instead.

use crate::pipeline::PipelineOutcome;
use crate::version::VersionId;
use std::fmt;
use std::io::Write;
use std::path::Path;

/// Write `message` and a newline to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; a closed stderr is not worth failing over.
    }
}

/// Format the final success line.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use vanilla_extractor::output::success_message;
/// use vanilla_extractor::version::VersionId;
///
/// let version = VersionId::try_from("1.21.11").expect("valid");
/// assert_eq!(
///     success_message(&version, Path::new("vanilla/1.21.11")),
///     "Extracted vanilla datapack for 1.21.11 to vanilla/1.21.11",
/// );
/// ```
#[must_use]
pub fn success_message(version: &VersionId, destination: &Path) -> String {
    format!(
        "Extracted vanilla datapack for {version} to {}",
        destination.display()
    )
}

/// Format a one-line breakdown of what a run wrote.
#[must_use]
pub fn summary_line(outcome: &PipelineOutcome) -> String {
    let summary = &outcome.summary;
    let plural = if summary.files == 1 { "file" } else { "files" };
    format!(
        "  {} {plural} from {}, {} members skipped",
        summary.files, outcome.source, summary.skipped
    )
}
