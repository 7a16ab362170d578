//! Download kind selector.
//!
//! Each version publishes several artefacts under its `downloads` mapping.
//! The extractor only understands the two jar builds.

use std::fmt;
use std::str::FromStr;

/// Which jar build of a version to fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum DownloadKind {
    /// The client jar (the default; carries the full datapack).
    #[default]
    Client,
    /// The dedicated server jar.
    Server,
}

impl DownloadKind {
    /// The key used for this kind in a version's `downloads` mapping.
    #[must_use]
    pub const fn manifest_key(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }
}

impl fmt::Display for DownloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.manifest_key())
    }
}

/// Returned when a string names no known download kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown download kind \"{0}\"; expected client or server")]
pub struct UnknownDownloadKind(pub String);

impl FromStr for DownloadKind {
    type Err = UnknownDownloadKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "server" => Ok(Self::Server),
            other => Err(UnknownDownloadKind(other.to_owned())),
        }
    }
}
