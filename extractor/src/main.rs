//! Vanilla datapack extractor CLI entrypoint.
//!
//! Parses arguments, configures logging, and runs the extraction pipeline
//! once. Progress and errors go to stderr.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use vanilla_extractor::cli::Cli;
use vanilla_extractor::dirs::{self, BaseDirs, SystemBaseDirs};
use vanilla_extractor::download::HttpConfig;
use vanilla_extractor::error::Result;
use vanilla_extractor::interrupt;
use vanilla_extractor::output::{success_message, summary_line, write_stderr_line};
use vanilla_extractor::pipeline::{self, PipelineConfig};

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    if let Err(err) = interrupt::install_handler() {
        log::warn!("could not install Ctrl-C handler: {err}");
    }

    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &SystemBaseDirs, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn init_logging(cli: &Cli) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .format_timestamp(None)
        .init();
}

fn run(cli: &Cli, dirs: &dyn BaseDirs, stderr: &mut dyn Write) -> Result<()> {
    let install_dir = resolve_install_dir(cli, dirs);
    let http = HttpConfig {
        manifest_url: cli.manifest_url.clone(),
        timeout: cli.timeout(),
    };
    let config = PipelineConfig {
        version: &cli.game_version,
        destination: cli.dest.as_std_path(),
        explicit_archive: cli.jar.as_deref().map(Utf8Path::as_std_path),
        install_dir: install_dir.as_deref(),
        download_kind: cli.download_kind,
        force: cli.force,
        http: &http,
    };

    if !cli.quiet {
        write_stderr_line(
            stderr,
            format!("Extracting vanilla datapack for {}...", cli.game_version),
        );
    }

    let outcome = pipeline::run(&config)?;

    if !cli.quiet {
        write_stderr_line(stderr, summary_line(&outcome));
        write_stderr_line(stderr, success_message(&cli.game_version, &outcome.destination));
    }
    Ok(())
}

/// Picks the install directory to look for a cached jar in.
///
/// An explicit `--minecraft-dir` wins; otherwise the platform default is used
/// when the home directory is known.
fn resolve_install_dir(cli: &Cli, base_dirs: &dyn BaseDirs) -> Option<PathBuf> {
    cli.minecraft_dir
        .clone()
        .or_else(|| dirs::install_dir(base_dirs))
        .map(Utf8PathBuf::into_std_path_buf)
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vanilla_extractor::error::ExtractError;

    /// The library's `MockBaseDirs` is only built for its own unit tests.
    struct FixedDirs(Option<Utf8PathBuf>);

    impl BaseDirs for FixedDirs {
        fn home_dir(&self) -> Option<Utf8PathBuf> {
            self.0.clone()
        }

        fn appdata(&self) -> Option<String> {
            None
        }
    }

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = ExtractError::DestinationNotEmpty {
            path: PathBuf::from("vanilla/1.21.11"),
        };

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.contains("vanilla/1.21.11 is not empty"));
        assert!(stderr_text.contains("--force"));
    }

    #[test]
    fn explicit_minecraft_dir_wins() {
        let cli = Cli::parse_from(["vanilla-extractor", "--minecraft-dir", "/games/mc"]);
        let dirs = FixedDirs(Some(Utf8PathBuf::from("/home/alex")));
        assert_eq!(
            resolve_install_dir(&cli, &dirs),
            Some(PathBuf::from("/games/mc"))
        );
    }

    #[test]
    fn install_dir_falls_back_to_platform_default() {
        let dirs = FixedDirs(Some(Utf8PathBuf::from("/home/alex")));
        let dir = resolve_install_dir(&Cli::default(), &dirs).expect("home known");
        assert!(dir.starts_with(Utf8Path::new("/home/alex")));
    }

    #[test]
    fn install_dir_is_skipped_without_home() {
        assert!(resolve_install_dir(&Cli::default(), &FixedDirs(None)).is_none());
    }

    #[test]
    fn run_reports_missing_jar_without_network() {
        let temp = tempfile::tempdir().expect("temp dir");
        let jar = Utf8PathBuf::try_from(temp.path().join("missing.jar")).expect("utf-8 path");
        let dest = Utf8PathBuf::try_from(temp.path().join("out")).expect("utf-8 path");
        let cli = Cli {
            jar: Some(jar),
            dest,
            ..Cli::default()
        };

        let mut stderr = Vec::new();
        let err = run(&cli, &FixedDirs(None), &mut stderr).expect_err("jar is missing");

        assert!(err.to_string().contains("missing.jar"));
        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.contains("Extracting vanilla datapack for 1.21.11"));
    }
}
