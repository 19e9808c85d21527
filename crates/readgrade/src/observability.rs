//! Logging and tracing setup.
//!
//! Events go to stderr in compact form. When a log location is configured,
//! they are also written as JSON lines through a non-blocking appender.
//!
//! Log location, highest precedence first:
//! 1. `READGRADE_LOG_PATH` - a single file, never rotated
//! 2. `READGRADE_LOG_DIR` - a directory, rotated daily
//! 3. `log_dir` from configuration - a directory, rotated daily

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_PATH_ENV: &str = "READGRADE_LOG_PATH";
const LOG_DIR_ENV: &str = "READGRADE_LOG_DIR";
const LOG_FILE_NAME: &str = "readgrade.jsonl";

/// Where JSONL logs are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// One file at an explicit path.
    File(PathBuf),
    /// Daily-rotated files in a directory.
    Directory(PathBuf),
}

impl LogTarget {
    fn appender(&self) -> anyhow::Result<RollingFileAppender> {
        match self {
            Self::File(path) => {
                let dir = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or_else(|| Path::new("."));
                let name = path
                    .file_name()
                    .with_context(|| format!("log path {} has no file name", path.display()))?;
                create_dir(dir)?;
                Ok(rolling::never(dir, name))
            }
            Self::Directory(dir) => {
                create_dir(dir)?;
                Ok(rolling::daily(dir, LOG_FILE_NAME))
            }
        }
    }
}

fn create_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))
}

/// Resolved logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// JSONL destination, if file logging is enabled.
    pub log_target: Option<LogTarget>,
}

impl ObservabilityConfig {
    /// Read the log location from the environment, falling back to the
    /// configured directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        Self::from_values(
            std::env::var_os(LOG_PATH_ENV).map(PathBuf::from),
            std::env::var_os(LOG_DIR_ENV).map(PathBuf::from),
            config_log_dir,
        )
    }

    fn from_values(
        log_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        config_log_dir: Option<PathBuf>,
    ) -> Self {
        let log_target = log_path
            .map(LogTarget::File)
            .or_else(|| log_dir.or(config_log_dir).map(LogTarget::Directory));
        Self { log_target }
    }
}

/// Keeps the background log writer alive; drop it last.
#[derive(Debug)]
pub struct ObservabilityGuard {
    _file: Option<WorkerGuard>,
}

/// Build the event filter.
///
/// `RUST_LOG` wins when set; otherwise `--quiet`, then `-v`/`-vv`, then the
/// configured level.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    let from_env = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty());
    filter_from(from_env.as_deref(), quiet, verbose, config_level)
}

fn filter_from(rust_log: Option<&str>, quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    if let Some(directives) = rust_log
        && let Ok(filter) = EnvFilter::try_new(directives)
    {
        return filter;
    }
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => config_level,
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    EnvFilter::new(level)
}

/// Install the global subscriber.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<ObservabilityGuard> {
    let stderr_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match &config.log_target {
        Some(target) => {
            let (writer, guard) = tracing_appender::non_blocking(target.appender()?);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(ObservabilityGuard { _file: guard })
}
