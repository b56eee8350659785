// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

use crate::app_config::Config;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod cue;
mod discovery;
mod errors;
mod fetch;
mod language_utils;
mod loader;
mod parsers;
mod render;
mod router;
mod session;
mod track_index;
mod track_source;

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the sidecar subtitle tracks discoverable for a media file
    Tracks {
        /// Media file to discover tracks for
        #[arg(value_name = "MEDIA_PATH")]
        media_path: PathBuf,
    },

    /// Parse a subtitle file and inspect its cues
    Probe {
        /// Subtitle file to parse
        #[arg(value_name = "SUBTITLE_PATH")]
        subtitle_path: PathBuf,

        /// Codec tag override (srt, webvtt); inferred from the extension
        /// when omitted
        #[arg(short, long)]
        format: Option<String>,

        /// Playback position(s) to query, e.g. 00:00:02,500 or 12.5;
        /// repeatable. Without any, the whole track is dumped.
        #[arg(short, long = "at")]
        at: Vec<String>,

        /// Emit cues as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Simulate dual-channel playback against sidecar tracks
    Play {
        /// Media file whose sidecar tracks to play
        #[arg(value_name = "MEDIA_PATH")]
        media_path: PathBuf,

        /// Track id for the primary channel (default: first discovered)
        #[arg(short, long)]
        primary: Option<String>,

        /// Track id for the secondary channel (default: none)
        #[arg(short, long)]
        secondary: Option<String>,

        /// Start position (default: start of the selected tracks)
        #[arg(long)]
        from: Option<String>,

        /// End position (default: end of the selected tracks)
        #[arg(long)]
        to: Option<String>,

        /// Position tick interval in milliseconds
        #[arg(long, default_value_t = 500)]
        step_ms: u64,

        /// Pace ticks in real time instead of dumping transitions at once
        #[arg(long)]
        realtime: bool,
    },

    /// Generate shell completions for dualsub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// dualsub - dual-channel subtitle pipeline
///
/// Parses SubRip/WebVTT subtitle tracks, indexes them for position queries
/// and routes two independently selected tracks to two display channels.
#[derive(Parser, Debug)]
#[command(name = "dualsub")]
#[command(version = "1.0.0")]
#[command(about = "Dual-channel subtitle track pipeline")]
#[command(long_about = "dualsub parses subtitle tracks, indexes them for playback-position
queries and routes two independently selected tracks to two display channels.

EXAMPLES:
    dualsub tracks movie.mkv                         # List sidecar subtitle tracks
    dualsub probe movie.en.srt                       # Dump a track's cues
    dualsub probe movie.en.srt --at 00:01:02,500     # Active cues at a position
    dualsub play movie.mkv -s movie.de.srt           # Dual-channel playback simulation
    dualsub completions bash > dualsub.bash          # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different config file with --config. If the config file doesn't exist, a
    default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Custom logger writing colored, timestamped lines to stderr
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default; the level is
    // updated after the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "dualsub", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.config_path, cli.log_level.as_ref())?;
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Tracks { media_path } => controller.run_tracks(&media_path).await,
        Commands::Probe {
            subtitle_path,
            format,
            at,
            json,
        } => {
            controller
                .run_probe(&subtitle_path, format.as_deref(), &at, json)
                .await
        }
        Commands::Play {
            media_path,
            primary,
            secondary,
            from,
            to,
            step_ms,
            realtime,
        } => {
            controller
                .run_play(
                    &media_path,
                    primary.as_deref(),
                    secondary.as_deref(),
                    from.as_deref(),
                    to.as_deref(),
                    step_ms,
                    realtime,
                )
                .await
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    }
}

/// Load the configuration file, creating a default one when missing
fn load_config(config_path: &str, log_level: Option<&CliLogLevel>) -> Result<Config> {
    let path = std::path::Path::new(config_path);

    let mut config = if path.exists() {
        let file = File::open(path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    if let Some(level) = log_level {
        config.log_level = level.clone().into();
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}
