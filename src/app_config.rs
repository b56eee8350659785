use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Application configuration module
/// This module handles the pipeline and CLI configuration including
/// validation and defaults. Channel styling lives here and is passed into
/// render sink construction explicitly - the core pipeline never reads
/// display preferences itself.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Background loader settings
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Styling handed to the two render sinks
    #[serde(default)]
    pub channels: ChannelsConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Config {
    /// Validate the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.loader.concurrent_loads == 0 {
            return Err(anyhow!("loader.concurrent_loads must be at least 1"));
        }
        if self.loader.fetch_timeout_secs == 0 {
            return Err(anyhow!("loader.fetch_timeout_secs must be at least 1"));
        }
        self.channels.primary.validate("channels.primary")?;
        self.channels.secondary.validate("channels.secondary")?;
        Ok(())
    }
}

/// Settings for the background track loader
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoaderConfig {
    /// Max fetch+parse jobs in flight at once
    #[serde(default = "default_concurrent_loads")]
    pub concurrent_loads: usize,

    /// Per-request fetch timeout
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            concurrent_loads: default_concurrent_loads(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

fn default_concurrent_loads() -> usize {
    2
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

/// Styling for both channels
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChannelsConfig {
    /// Primary channel styling
    #[serde(default = "ChannelStyle::primary_default")]
    pub primary: ChannelStyle,

    /// Secondary channel styling
    #[serde(default = "ChannelStyle::secondary_default")]
    pub secondary: ChannelStyle,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        ChannelsConfig {
            primary: ChannelStyle::primary_default(),
            secondary: ChannelStyle::secondary_default(),
        }
    }
}

/// Display styling for one channel's render sink
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChannelStyle {
    /// Text size multiplier relative to the renderer's base size
    #[serde(default = "default_text_scale")]
    pub text_scale: f32,

    /// Vertical offset from the channel's default position, as a fraction
    /// of the viewport height
    #[serde(default)]
    pub vertical_offset: f32,
}

impl ChannelStyle {
    fn primary_default() -> Self {
        ChannelStyle {
            text_scale: default_text_scale(),
            vertical_offset: 0.0,
        }
    }

    /// The secondary channel sits above the primary so the two never stack
    /// on the same region by default
    fn secondary_default() -> Self {
        ChannelStyle {
            text_scale: default_text_scale(),
            vertical_offset: 0.15,
        }
    }

    fn validate(&self, field: &str) -> Result<()> {
        if self.text_scale <= 0.0 {
            return Err(anyhow!("{}.text_scale must be positive", field));
        }
        if !(0.0..=1.0).contains(&self.vertical_offset) {
            return Err(anyhow!("{}.vertical_offset must be within 0.0..=1.0", field));
        }
        Ok(())
    }
}

fn default_text_scale() -> f32 {
    1.0
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's level filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}
