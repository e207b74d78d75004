use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::book::FlipTimings;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub book: BookConfig,
    pub celebration: CelebrationConfig,
    pub render: RenderConfig,
    pub cache: CacheConfig,
    pub keymap: KeymapConfig,
    pub log: LogConfig,
}

/// Delays that pace the flip and overlay transitions.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BookConfig {
    pub flip_transition_ms: u64,
    pub celebration_fade_in_ms: u64,
    pub celebration_fade_out_ms: u64,
    pub content_fit_delay_ms: u64,
    pub response_fade_in_ms: u64,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            flip_transition_ms: 500,
            celebration_fade_in_ms: 10,
            celebration_fade_out_ms: 500,
            content_fit_delay_ms: 50,
            response_fade_in_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CelebrationConfig {
    pub confetti_count: usize,
}

impl Default for CelebrationConfig {
    fn default() -> Self {
        Self {
            confetti_count: crate::book::DEFAULT_BURST_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub tick_ms: u64,
    pub input_poll_timeout_ms: u64,
    pub photo_worker_threads: usize,
    /// Cell size used to map terminal cells onto page pixels when the
    /// terminal does not report one.
    pub cell_px: (u16, u16),
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tick_ms: 33,
            input_poll_timeout_ms: 250,
            photo_worker_threads: 2,
            cell_px: (10, 20),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    pub photo_memory_budget_mb: usize,
    pub photo_max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            photo_memory_budget_mb: 64,
            photo_max_entries: 24,
        }
    }
}

impl CacheConfig {
    const MEBIBYTE: usize = 1024 * 1024;

    pub fn photo_memory_budget_bytes(&self) -> usize {
        self.photo_memory_budget_mb
            .saturating_mul(Self::MEBIBYTE)
            .max(1)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeymapConfig {
    pub preset: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            preset: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Log file. Nothing is logged when unset; the terminal belongs to the UI.
    pub file: Option<PathBuf>,
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(AppError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        let parsed = toml::from_str::<Self>(&raw).map_err(|source| {
            AppError::invalid_argument(format!(
                "failed to parse config {}: {source}",
                path.display()
            ))
        })?;
        Ok(parsed.sanitized())
    }

    pub fn flip_timings(&self) -> FlipTimings {
        FlipTimings {
            flip_transition: Duration::from_millis(self.book.flip_transition_ms),
            celebration_fade_in: Duration::from_millis(self.book.celebration_fade_in_ms),
            celebration_fade_out: Duration::from_millis(self.book.celebration_fade_out_ms),
            content_fit_delay: Duration::from_millis(self.book.content_fit_delay_ms),
            response_fade_in: Duration::from_millis(self.book.response_fade_in_ms),
            confetti_count: self.celebration.confetti_count,
        }
    }

    fn sanitized(mut self) -> Self {
        self.render.tick_ms = self.render.tick_ms.max(1);
        self.render.input_poll_timeout_ms = self.render.input_poll_timeout_ms.max(1);
        self.render.photo_worker_threads = self.render.photo_worker_threads.max(1);
        if self.render.cell_px.0 == 0 || self.render.cell_px.1 == 0 {
            warn!(cell_px = ?self.render.cell_px, "ignoring zero cell size");
            self.render.cell_px = RenderConfig::default().cell_px;
        }
        self.cache.photo_max_entries = self.cache.photo_max_entries.max(1);
        self.celebration.confetti_count = self.celebration.confetti_count.min(1000);
        if self.log.filter.trim().is_empty() {
            self.log.filter = LogConfig::default().filter;
        }
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("SBK_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("sbk").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("sbk")
                .join("config.toml"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("sbk").join("config.toml"));
    }
    None
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::process;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    use super::Config;

    fn unique_temp_path(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("sbk_config_{suffix}_{}_{}", process::id(), nanos));
        path
    }

    #[test]
    fn load_from_path_returns_defaults_for_missing_file() {
        let missing = unique_temp_path("missing.toml");
        let config = Config::load_from_path(&missing).expect("missing config should fallback");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_from_path_applies_partial_overrides_and_sanitizes() {
        let path = unique_temp_path("custom.toml");
        fs::write(
            &path,
            r#"
            [book]
            flip_transition_ms = 650

            [render]
            tick_ms = 0
            input_poll_timeout_ms = 0
            photo_worker_threads = 0
            cell_px = [0, 18]

            [cache]
            photo_max_entries = 0

            [log]
            filter = "  "
            "#,
        )
        .expect("config file should be written");

        let config = Config::load_from_path(&path).expect("config should parse");
        assert_eq!(config.book.flip_transition_ms, 650);
        assert_eq!(config.book.celebration_fade_in_ms, 10);
        assert_eq!(config.render.tick_ms, 1);
        assert_eq!(config.render.input_poll_timeout_ms, 1);
        assert_eq!(config.render.photo_worker_threads, 1);
        assert_eq!(config.render.cell_px, (10, 20));
        assert_eq!(config.cache.photo_max_entries, 1);
        assert_eq!(config.cache.photo_memory_budget_mb, 64);
        assert_eq!(config.log.filter, "info");
        assert_eq!(config.log.file, None);

        fs::remove_file(&path).expect("config file should be removed");
    }

    #[test]
    fn flip_timings_follow_book_section() {
        let mut config = Config::default();
        config.book.flip_transition_ms = 700;
        config.celebration.confetti_count = 12;

        let timings = config.flip_timings();
        assert_eq!(timings.flip_transition, Duration::from_millis(700));
        assert_eq!(timings.content_fit_delay, Duration::from_millis(50));
        assert_eq!(timings.confetti_count, 12);
        assert_eq!(Config::default().flip_timings(), Default::default());
    }

    #[test]
    fn directory_path_is_rejected() {
        let dir = std::env::temp_dir();
        assert!(Config::load_from_path(dir).is_err());
    }
}
