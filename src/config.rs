//=========================================================================
// Configuration
//=========================================================================
//
// Engine settings read from a TOML file.
//
// Every key is optional; anything missing takes its default.
//
//   [engine]   tps, channel_capacity, window_title, window_width,
//              window_height
//   [timing]   loading_cover_ms, loading_dwell_ms
//   [lives]    regen_interval_ms, fast_poll_ms, slow_poll_ms
//   [cache]    path
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::context::Worlds;
use crate::core::scene::{Settings, TransitionTiming};

//=== ConfigError =========================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config: {0}")]
    Io(#[from] io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

//=== Config ==============================================================

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub lives: LivesConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_tps")]
    pub tps: f64,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    #[serde(default = "default_window_title")]
    pub window_title: String,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_loading_cover")]
    pub loading_cover_ms: u64,
    #[serde(default = "default_loading_dwell")]
    pub loading_dwell_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LivesConfig {
    #[serde(default = "default_regen_interval")]
    pub regen_interval_ms: u64,
    #[serde(default = "default_fast_poll")]
    pub fast_poll_ms: u64,
    #[serde(default = "default_slow_poll")]
    pub slow_poll_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

//=== Defaults ============================================================

fn default_tps() -> f64 { 60.0 }
fn default_channel_capacity() -> usize { 128 }
fn default_window_title() -> String { "Seeds".into() }
fn default_window_width() -> u32 { 800 }
fn default_window_height() -> u32 { 600 }

fn default_loading_cover() -> u64 { 1000 }
fn default_loading_dwell() -> u64 { 1500 }

fn default_regen_interval() -> u64 { 5 * 60 * 1000 }
fn default_fast_poll() -> u64 { 1000 }
fn default_slow_poll() -> u64 { 5000 }

fn default_cache_path() -> PathBuf { PathBuf::from("cache.toml") }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tps: default_tps(),
            channel_capacity: default_channel_capacity(),
            window_title: default_window_title(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            loading_cover_ms: default_loading_cover(),
            loading_dwell_ms: default_loading_dwell(),
        }
    }
}

impl Default for LivesConfig {
    fn default() -> Self {
        Self {
            regen_interval_ms: default_regen_interval(),
            fast_poll_ms: default_fast_poll(),
            slow_poll_ms: default_slow_poll(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
        }
    }
}

//=== Loading =============================================================

impl Config {
    /// Parses and validates a TOML document.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Like [`Config::load`], but any error degrades to the defaults.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!("{} ({}), using defaults", e, path.display());
            Self::default()
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.engine.tps > 0.0) {
            return Err(ConfigError::Invalid(format!("tps must be positive, got {}", self.engine.tps)));
        }
        if self.engine.channel_capacity == 0 {
            return Err(ConfigError::Invalid("channel_capacity must be positive".into()));
        }
        if self.lives.fast_poll_ms == 0 || self.lives.slow_poll_ms == 0 {
            return Err(ConfigError::Invalid("lives poll intervals must be positive".into()));
        }
        Ok(())
    }

    /// Session rules derived from this config, over the default catalog.
    pub fn settings(&self) -> Settings {
        Settings {
            worlds: Worlds::default(),
            timing: TransitionTiming {
                loading_cover: Duration::from_millis(self.timing.loading_cover_ms),
                loading_dwell: Duration::from_millis(self.timing.loading_dwell_ms),
            },
            regen_interval: Duration::from_millis(self.lives.regen_interval_ms),
            fast_poll: Duration::from_millis(self.lives.fast_poll_ms),
            slow_poll: Duration::from_millis(self.lives.slow_poll_ms),
        }
    }
}

//=== Tests ===============================================================
