//! CLI argument definitions for the vanilla datapack extractor.
//!
//! Kept apart from the entrypoint so argument parsing can be tested without
//! running the pipeline.

use crate::download::DEFAULT_TIMEOUT;
use crate::download_kind::DownloadKind;
use crate::resolver::DEFAULT_MANIFEST_URL;
use crate::version::VersionId;
use camino::Utf8PathBuf;
use clap::Parser;
use std::time::Duration;

/// Version extracted when none is given.
pub const DEFAULT_VERSION: &str = "1.21.11";

/// Destination used when none is given.
pub const DEFAULT_DESTINATION: &str = "vanilla/1.21.11";

/// Extract the vanilla datapack from a Minecraft jar.
#[derive(Parser, Debug, Clone)]
#[command(name = "vanilla-extractor")]
#[command(version, about, disable_version_flag = true)]
#[command(long_about = concat!(
    "Extract the vanilla datapack from a Minecraft jar.\n\n",
    "The jar is taken from --jar if given, otherwise from the local game ",
    "install, otherwise it is downloaded using the official version manifest ",
    "and checked against its published SHA-1 digest.\n\n",
    "Only pack.mcmeta, pack.png, and the data/ tree are extracted. Members ",
    "with absolute paths or '..' segments abort the run before anything is ",
    "written.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Extract the default version into vanilla/1.21.11:\n",
    "    $ vanilla-extractor\n\n",
    "  Extract a snapshot, replacing a previous extraction:\n",
    "    $ vanilla-extractor --version 25w14a --dest vanilla/25w14a --force\n\n",
    "  Extract from a jar on disk:\n",
    "    $ vanilla-extractor --jar ~/Downloads/client.jar --dest pack",
))]
pub struct Cli {
    /// Version to extract.
    #[arg(long = "version", value_name = "ID", default_value = DEFAULT_VERSION)]
    pub game_version: VersionId,

    /// Directory that receives the datapack.
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_DESTINATION)]
    pub dest: Utf8PathBuf,

    /// Read this jar instead of looking one up.
    #[arg(long, value_name = "FILE")]
    pub jar: Option<Utf8PathBuf>,

    /// Game install to take a cached jar from [default: platform-specific].
    #[arg(long, value_name = "DIR")]
    pub minecraft_dir: Option<Utf8PathBuf>,

    /// Which jar to download when none is installed.
    #[arg(long, value_enum, value_name = "KIND", default_value_t = DownloadKind::Client)]
    pub download_kind: DownloadKind,

    /// Replace the destination if it already holds files.
    #[arg(short, long)]
    pub force: bool,

    /// Version manifest to resolve downloads from.
    #[arg(long, value_name = "URL", default_value = DEFAULT_MANIFEST_URL)]
    pub manifest_url: String,

    /// Per-request network timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Default `log` filter implied by `-v` and `-q`.
    ///
    /// `RUST_LOG` takes precedence over this value.
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use vanilla_extractor::cli::Cli;
    ///
    /// assert_eq!(Cli::parse_from(["vanilla-extractor"]).log_filter(), "warn");
    /// assert_eq!(Cli::parse_from(["vanilla-extractor", "-vv"]).log_filter(), "debug");
    /// ```
    #[must_use]
    pub const fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl Default for Cli {
    /// Creates a `Cli` equal to parsing no arguments.
    ///
    /// Useful when tests only need to override a few fields.
    fn default() -> Self {
        Self::parse_from(["vanilla-extractor"])
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
