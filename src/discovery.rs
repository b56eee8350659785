/*!
 * Track discovery collaborator.
 *
 * The pipeline does not discover subtitle streams itself; it is handed a
 * list of track descriptors by whatever knows the media item. For local
 * playback that is `SidecarDiscovery`, which scans the media file's
 * directory for sidecar subtitle files:
 *
 * - `movie.srt` / `movie.vtt` (no language tag)
 * - `movie.en.srt` (language infix)
 * - `movie.en.forced.srt` (forced-display marker)
 */

use std::path::Path;
use anyhow::{Result, anyhow};
use log::debug;
use walkdir::WalkDir;

use crate::language_utils;
use crate::parsers::SubtitleFormat;
use crate::track_source::{DeliveryDescriptor, TrackDescriptor};

/// Supplies the available subtitle tracks for a media item
pub trait TrackDiscovery {
    /// List the track descriptors for the given media item
    fn discover(&self, media_path: &Path) -> Result<Vec<TrackDescriptor>>;
}

/// Discovers sidecar subtitle files next to a media file
#[derive(Debug, Default)]
pub struct SidecarDiscovery;

impl SidecarDiscovery {
    /// Create a sidecar discovery collaborator
    pub fn new() -> Self {
        SidecarDiscovery
    }

    /// Build a descriptor for one sidecar file, if its name matches the
    /// media stem
    fn descriptor_for(&self, media_stem: &str, path: &Path) -> Option<TrackDescriptor> {
        let format = SubtitleFormat::from_extension(path)?;
        let file_name = path.file_name()?.to_string_lossy().to_string();
        let stem = path.file_stem()?.to_string_lossy().to_string();

        // The file must be "<media_stem>" or "<media_stem>.<tags...>"
        let tags = if stem == media_stem {
            ""
        } else {
            stem.strip_prefix(media_stem)?.strip_prefix('.')?
        };

        let mut language: Option<String> = None;
        let mut is_forced = false;
        for tag in tags.split('.').filter(|t| !t.is_empty()) {
            if tag.eq_ignore_ascii_case("forced") {
                is_forced = true;
            } else if language.is_none() && language_utils::is_language_code(tag) {
                language = language_utils::normalize_code(tag);
            }
        }

        let mut display_name = language
            .as_deref()
            .and_then(language_utils::display_name)
            .unwrap_or_else(|| "Unknown".to_string());
        if is_forced {
            display_name.push_str(" (Forced)");
        }

        Some(TrackDescriptor {
            id: file_name,
            display_name,
            language,
            is_forced,
            codec: format.codec_tag().to_string(),
            delivery: DeliveryDescriptor::Sidecar {
                path: path.to_path_buf(),
            },
        })
    }
}

impl TrackDiscovery for SidecarDiscovery {
    fn discover(&self, media_path: &Path) -> Result<Vec<TrackDescriptor>> {
        let directory = media_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let media_stem = media_path
            .file_stem()
            .ok_or_else(|| anyhow!("Media path has no file name: {:?}", media_path))?
            .to_string_lossy()
            .to_string();

        let mut tracks = Vec::new();

        for entry in WalkDir::new(directory)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_dir() || path == media_path {
                continue;
            }

            if let Some(descriptor) = self.descriptor_for(&media_stem, path) {
                debug!(
                    "Discovered sidecar track {} ({})",
                    descriptor.id, descriptor.display_name
                );
                tracks.push(descriptor);
            }
        }

        // Deterministic order for track menus and tests
        tracks.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(tracks)
    }
}
