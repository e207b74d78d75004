use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::{AppError, AppResult};

pub const LOG_ENV: &str = "SBK_LOG";

/// Installs the global subscriber. Returns the file logs go to, or `None`
/// when logging stays off because no file is configured.
pub fn init(config: &LogConfig) -> AppResult<Option<PathBuf>> {
    let Some(path) = config.file.as_deref() else {
        return Ok(None);
    };

    let filter = build_filter(std::env::var(LOG_ENV).ok().as_deref(), &config.filter);
    let file = open_log_file(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|err| AppError::unsupported(format!("failed to install logger: {err}")))?;
    Ok(Some(path.to_path_buf()))
}

/// Env var wins over the config value; anything unparsable falls back to
/// `info`.
pub(crate) fn build_filter(env_value: Option<&str>, configured: &str) -> EnvFilter {
    env_value
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_new(configured).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn open_log_file(path: &Path) -> AppResult<fs::File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| {
            AppError::io_with_context(
                source,
                format!("failed to create log directory: {}", parent.display()),
            )
        })?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| {
            AppError::io_with_context(source, format!("failed to open log file: {}", path.display()))
        })
}
