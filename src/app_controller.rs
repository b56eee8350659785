/*!
 * CLI orchestration: wires discovery, the loader and the router together
 * for the `tracks`, `probe` and `play` commands.
 */

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use anyhow::{Context, Result, anyhow};
use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use crate::app_config::Config;
use crate::cue::{Cue, format_timestamp};
use crate::discovery::{SidecarDiscovery, TrackDiscovery};
use crate::fetch::StandardFetcher;
use crate::loader::TrackLoader;
use crate::parsers::{self, SubtitleFormat};
use crate::render::TerminalSink;
use crate::router::{ChannelId, ChannelState};
use crate::session::PlaybackSession;
use crate::track_index::TrackIndex;

/// Main application controller
pub struct Controller {
    config: Config,
}

impl Controller {
    /// Create a controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Controller { config })
    }

    /// List the subtitle tracks discoverable for a media item
    pub async fn run_tracks(&self, media_path: &Path) -> Result<()> {
        let tracks = SidecarDiscovery::new().discover(media_path)?;

        if tracks.is_empty() {
            warn!("No sidecar subtitle tracks found for {:?}", media_path);
            return Ok(());
        }

        info!("Found {} subtitle track(s):", tracks.len());
        for track in &tracks {
            let language = track.language.as_deref().unwrap_or("??");
            println!(
                "  {}  [{}] {} ({}{})",
                track.id,
                track.codec,
                track.display_name,
                language,
                if track.is_forced { ", forced" } else { "" }
            );
        }

        Ok(())
    }

    /// Parse a subtitle file, then either dump its cues or query the active
    /// set at each requested position
    pub async fn run_probe(
        &self,
        file: &Path,
        format_override: Option<&str>,
        positions: &[String],
        json: bool,
    ) -> Result<()> {
        let format = match format_override {
            Some(tag) => SubtitleFormat::from_codec_tag(tag).map_err(|e| anyhow!(e))?,
            None => SubtitleFormat::from_extension(file)
                .ok_or_else(|| anyhow!("Cannot infer subtitle format from {:?}; use --format", file))?,
        };

        let raw = std::fs::read(file)
            .with_context(|| format!("Failed to read subtitle file {:?}", file))?;
        let cues = parsers::parse(&raw, format).map_err(|e| anyhow!(e))?;
        let index = TrackIndex::build(cues);

        if positions.is_empty() {
            return self.dump_track(&index, format, json);
        }

        for raw_position in positions {
            let position_us = parse_position(raw_position)?;
            let active = index.query(position_us);

            if json {
                let cues: Vec<&Cue> = active.iter().map(|c| c.as_ref()).collect();
                println!("{}", serde_json::to_string_pretty(&cues)?);
            } else if active.is_empty() {
                println!("{}  (no active cues)", format_timestamp(position_us));
            } else {
                for cue in &active {
                    println!("{}  {}", format_timestamp(position_us), cue);
                }
            }
        }

        Ok(())
    }

    fn dump_track(&self, index: &TrackIndex, format: SubtitleFormat, json: bool) -> Result<()> {
        if json {
            let cues: Vec<&Cue> = index.cues().iter().map(|c| c.as_ref()).collect();
            println!("{}", serde_json::to_string_pretty(&cues)?);
            return Ok(());
        }

        match index.span() {
            Some((start, end)) => info!(
                "{} track: {} cue(s) spanning {} - {}",
                format,
                index.len(),
                format_timestamp(start),
                format_timestamp(end)
            ),
            None => info!("{} track: no cues", format),
        }

        for cue in index.cues() {
            println!("{}", cue);
        }

        Ok(())
    }

    /// Simulated dual-channel playback over a position range.
    ///
    /// Discovers sidecar tracks, binds the selected (or first) track to the
    /// primary channel and an optional second track to the secondary
    /// channel, preloads both, then ticks positions into the router with
    /// terminal sinks attached.
    #[allow(clippy::too_many_arguments)]
    pub async fn run_play(
        &self,
        media_path: &Path,
        primary_id: Option<&str>,
        secondary_id: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
        step_ms: u64,
        realtime: bool,
    ) -> Result<()> {
        let tracks = SidecarDiscovery::new().discover(media_path)?;
        if tracks.is_empty() {
            warn!("No sidecar subtitle tracks found for {:?}", media_path);
            return Ok(());
        }

        // Default to the first discovered track, the way a player would
        // preselect something visible
        let primary_id = primary_id
            .map(str::to_string)
            .unwrap_or_else(|| tracks[0].id.clone());

        let fetcher = Arc::new(
            StandardFetcher::new(self.config.loader.fetch_timeout_secs)
                .map_err(|e| anyhow!(e))?,
        );
        let loader = TrackLoader::new(fetcher, self.config.loader.concurrent_loads);

        let session = PlaybackSession::new(
            media_path.to_string_lossy().to_string(),
            tracks,
            loader.clone(),
            Box::new(TerminalSink::new("primary", self.config.channels.primary.clone())),
            Box::new(TerminalSink::new("secondary", self.config.channels.secondary.clone())),
        );

        // Preload the selected tracks behind a progress bar before ticking
        let mut selected = vec![primary_id.clone()];
        if let Some(id) = secondary_id {
            selected.push(id.to_string());
        }
        self.preload(&session, &loader, &selected).await?;

        session.select_track(ChannelId::Primary, Some(&primary_id))?;
        session.select_track(ChannelId::Secondary, secondary_id)?;

        // Selection settles in the background; wait for both channels so the
        // first ticks are not silently skipped
        for channel in ChannelId::ALL {
            while session.router().channel_state(channel) == ChannelState::Loading {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        }

        let span = selected
            .iter()
            .filter_map(|id| session.source(id))
            .filter_map(|s| s.index())
            .filter_map(|i| i.span())
            .fold(None::<(u64, u64)>, |acc, (s, e)| match acc {
                Some((min_s, max_e)) => Some((min_s.min(s), max_e.max(e))),
                None => Some((s, e)),
            });

        let from_us = match from {
            Some(raw) => parse_position(raw)?,
            None => span.map(|(s, _)| s).unwrap_or(0),
        };
        let to_us = match to {
            Some(raw) => parse_position(raw)?,
            None => span.map(|(_, e)| e).unwrap_or(from_us),
        };
        if to_us < from_us {
            return Err(anyhow!("--to lies before --from"));
        }

        info!(
            "Playing {} - {} in {}ms steps",
            format_timestamp(from_us),
            format_timestamp(to_us),
            step_ms
        );

        let step_us = step_ms.max(1) * 1_000;
        let mut position = from_us;
        loop {
            session.position(position);
            if realtime {
                tokio::time::sleep(Duration::from_millis(step_ms)).await;
            }
            if position >= to_us {
                break;
            }
            position = (position + step_us).min(to_us);
        }

        session.close().await;
        Ok(())
    }

    /// Load the selected tracks up front so playback starts with settled
    /// indexes instead of a dark first interval
    async fn preload(
        &self,
        session: &PlaybackSession,
        loader: &TrackLoader,
        track_ids: &[String],
    ) -> Result<()> {
        let sources: Vec<_> = track_ids
            .iter()
            .filter_map(|id| session.source(id))
            .collect();
        if sources.is_empty() {
            return Ok(());
        }

        let bar = ProgressBar::new(sources.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner} loading tracks [{bar:20}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut pending: FuturesUnordered<_> = sources
            .into_iter()
            .map(|source| loader.spawn_load(source))
            .collect();
        while pending.next().await.is_some() {
            bar.inc(1);
        }
        bar.finish_and_clear();

        Ok(())
    }
}

/// Parse a CLI position: `HH:MM:SS,mmm`, `HH:MM:SS.mmm`, `MM:SS.mmm` or
/// plain seconds (`12.5`)
pub fn parse_position(raw: &str) -> Result<u64> {
    let raw = raw.trim();

    if raw.contains(':') {
        let parts: Vec<&str> = raw.split(&[':', ',', '.'][..]).collect();
        let (hours, minutes, seconds, millis) = match parts.len() {
            4 => (parts[0], parts[1], parts[2], parts[3]),
            3 => ("0", parts[0], parts[1], parts[2]),
            _ => return Err(anyhow!("Invalid position format: {}", raw)),
        };

        let hours: u64 = hours.parse().context("Failed to parse hours")?;
        let minutes: u64 = minutes.parse().context("Failed to parse minutes")?;
        let seconds: u64 = seconds.parse().context("Failed to parse seconds")?;
        let millis: u64 = millis.parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in position: {}", raw));
        }

        return Ok(((hours * 3600 + minutes * 60 + seconds) * 1_000 + millis) * 1_000);
    }

    let seconds: f64 = raw
        .parse()
        .with_context(|| format!("Invalid position: {}", raw))?;
    if seconds < 0.0 {
        return Err(anyhow!("Position must be non-negative: {}", raw));
    }
    Ok((seconds * 1_000_000.0) as u64)
}
