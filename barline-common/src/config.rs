//! Configuration loading for the Barline transport
//!
//! TOML file with built-in defaults for every field; a missing file yields
//! the full default configuration. Settings precedence (applied by the
//! binary): command-line arguments > environment variables > TOML file >
//! built-in defaults.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BarlineConfig {
    /// Transport scheduler tuning
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Compile service endpoint
    #[serde(default)]
    pub compile: CompileConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Transport scheduler tuning
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Polling task interval in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Lookahead horizon in seconds
    #[serde(default = "default_lookahead_sec")]
    pub lookahead_sec: f64,

    /// Beats per bar (fixed meter)
    #[serde(default = "default_beats_per_bar")]
    pub beats_per_bar: u32,

    /// Visual loop length in bars
    #[serde(default = "default_loop_bars")]
    pub loop_bars: u32,

    /// Tempo used until the caller sets one
    #[serde(default = "default_bpm")]
    pub default_bpm: f64,

    /// Minimum interval between compile-failure log lines, in seconds
    #[serde(default = "default_error_log_interval_sec")]
    pub error_log_interval_sec: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            lookahead_sec: default_lookahead_sec(),
            beats_per_bar: default_beats_per_bar(),
            loop_bars: default_loop_bars(),
            default_bpm: default_bpm(),
            error_log_interval_sec: default_error_log_interval_sec(),
        }
    }
}

/// Compile service endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CompileConfig {
    /// Base URL of the compile service
    #[serde(default = "default_compile_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_compile_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            base_url: default_compile_base_url(),
            timeout_ms: default_compile_timeout_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_tick_interval_ms() -> u64 {
    25
}

fn default_lookahead_sec() -> f64 {
    0.25
}

fn default_beats_per_bar() -> u32 {
    4
}

fn default_loop_bars() -> u32 {
    16
}

fn default_bpm() -> f64 {
    80.0
}

fn default_error_log_interval_sec() -> u64 {
    5
}

fn default_compile_base_url() -> String {
    "http://127.0.0.1:8320".to_string()
}

fn default_compile_timeout_ms() -> u64 {
    4000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl BarlineConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate ranges that would otherwise fail far from their cause.
    pub fn validate(&self) -> Result<()> {
        let s = &self.scheduler;
        if s.tick_interval_ms == 0 {
            return Err(Error::Config("scheduler.tick_interval_ms must be > 0".into()));
        }
        if !(s.lookahead_sec > 0.0) {
            return Err(Error::Config("scheduler.lookahead_sec must be > 0".into()));
        }
        if s.beats_per_bar == 0 || s.loop_bars == 0 {
            return Err(Error::Config(
                "scheduler.beats_per_bar and scheduler.loop_bars must be > 0".into(),
            ));
        }
        if !(s.default_bpm > 0.0) {
            return Err(Error::Config("scheduler.default_bpm must be > 0".into()));
        }
        Ok(())
    }
}
