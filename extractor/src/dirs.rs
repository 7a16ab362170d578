//! Default game directory resolution.
//!
//! The default install directory depends on the host OS. The choice is
//! expressed as a pure function of the platform, the home directory, and the
//! `APPDATA` variable so that every branch can be tested on any host. The
//! [`BaseDirs`] trait supplies those inputs from the real environment.

use camino::{Utf8Path, Utf8PathBuf};

/// Directory name used on Windows and Unix-like systems.
const DOT_MINECRAFT: &str = ".minecraft";

/// Host platform families with distinct install layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// macOS.
    MacOs,
    /// Windows.
    Windows,
    /// Linux and every other Unix-like system.
    Other,
}

impl Platform {
    /// The platform this binary was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(windows) {
            Self::Windows
        } else {
            Self::Other
        }
    }
}

/// Return the default install directory for `platform`.
///
/// - macOS: `<home>/Library/Application Support/minecraft`
/// - Windows: `<APPDATA>/.minecraft`, or `<home>/.minecraft` without `APPDATA`
/// - otherwise: `<home>/.minecraft`
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use vanilla_extractor::dirs::{Platform, default_install_dir};
///
/// let home = Utf8PathBuf::from("/home/steve");
/// assert_eq!(
///     default_install_dir(Platform::Other, &home, None),
///     Utf8PathBuf::from("/home/steve/.minecraft"),
/// );
/// ```
#[must_use]
pub fn default_install_dir(
    platform: Platform,
    home: &Utf8Path,
    appdata: Option<&str>,
) -> Utf8PathBuf {
    match platform {
        Platform::MacOs => home
            .join("Library")
            .join("Application Support")
            .join("minecraft"),
        Platform::Windows => match appdata.filter(|value| !value.is_empty()) {
            Some(appdata) => Utf8PathBuf::from(appdata).join(DOT_MINECRAFT),
            None => home.join(DOT_MINECRAFT),
        },
        Platform::Other => home.join(DOT_MINECRAFT),
    }
}

/// Source of the environment inputs to [`default_install_dir`].
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// The user's home directory, if it can be determined and is UTF-8.
    fn home_dir(&self) -> Option<Utf8PathBuf>;

    /// The value of `APPDATA`, if set.
    fn appdata(&self) -> Option<String>;
}

/// The default install directory for the current platform.
///
/// Returns `None` when `dirs` cannot name a home directory.
#[must_use]
pub fn install_dir(dirs: &dyn BaseDirs) -> Option<Utf8PathBuf> {
    let home = dirs.home_dir()?;
    let appdata = dirs.appdata();
    Some(default_install_dir(
        Platform::current(),
        &home,
        appdata.as_deref(),
    ))
}

/// [`BaseDirs`] backed by the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn home_dir(&self) -> Option<Utf8PathBuf> {
        directories_next::BaseDirs::new()
            .and_then(|dirs| Utf8PathBuf::try_from(dirs.home_dir().to_path_buf()).ok())
    }

    fn appdata(&self) -> Option<String> {
        std::env::var("APPDATA").ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn home() -> Utf8PathBuf {
        Utf8PathBuf::from("/home/alex")
    }

    #[rstest]
    #[case::mac(Platform::MacOs, None, "/home/alex/Library/Application Support/minecraft")]
    #[case::mac_ignores_appdata(
        Platform::MacOs,
        Some("/appdata"),
        "/home/alex/Library/Application Support/minecraft"
    )]
    #[case::windows_appdata(Platform::Windows, Some("/appdata"), "/appdata/.minecraft")]
    #[case::windows_without_appdata(Platform::Windows, None, "/home/alex/.minecraft")]
    #[case::windows_empty_appdata(Platform::Windows, Some(""), "/home/alex/.minecraft")]
    #[case::linux(Platform::Other, None, "/home/alex/.minecraft")]
    #[case::linux_ignores_appdata(Platform::Other, Some("/appdata"), "/home/alex/.minecraft")]
    fn resolves_per_platform(
        #[case] platform: Platform,
        #[case] appdata: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(
            default_install_dir(platform, &home(), appdata),
            Utf8PathBuf::from(expected)
        );
    }

    #[test]
    fn install_dir_requires_home() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_home_dir().times(1).returning(|| None);
        dirs.expect_appdata().never();

        assert!(install_dir(&dirs).is_none());
    }

    #[test]
    fn install_dir_is_under_home() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_home_dir().returning(|| Some(home()));
        dirs.expect_appdata().returning(|| None);

        let dir = install_dir(&dirs).expect("home known");
        assert!(dir.starts_with(home()));
    }
}
