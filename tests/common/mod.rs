/*!
 * Common test utilities for the dualsub test suite
 */

use std::path::PathBuf;
use std::fs;
use std::time::Duration;
use anyhow::Result;
use tempfile::TempDir;

use dualsub::track_source::{DeliveryDescriptor, TrackDescriptor};

pub mod mock_sinks;

/// A small SubRip payload with two cues
pub const SRT_BASIC: &str = "1\n00:00:01,000 --> 00:00:03,000\nHello\n\n2\n00:00:04,000 --> 00:00:06,000\nWorld\n";

/// A SubRip payload with different text and timing, for secondary tracks
pub const SRT_GERMAN: &str = "1\n00:00:01,500 --> 00:00:03,500\nHallo\n\n2\n00:00:04,500 --> 00:00:06,500\nWelt\n";

/// A WebVTT payload with two cues, one carrying settings
pub const VTT_BASIC: &str = "WEBVTT\n\n00:00:01.000 --> 00:00:03.000\nHello\n\n00:00:04.000 --> 00:00:06.000 align:center position:50%\nWorld\n";

/// Initialize test logging once; level controlled via RUST_LOG
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds a descriptor for a remotely delivered track
pub fn remote_track(id: &str, url: &str, codec: &str) -> TrackDescriptor {
    TrackDescriptor {
        id: id.to_string(),
        display_name: id.to_string(),
        language: None,
        is_forced: false,
        codec: codec.to_string(),
        delivery: DeliveryDescriptor::Remote {
            url: url.to_string(),
        },
    }
}

/// Builds a descriptor for a natively delivered track
pub fn native_track(id: &str) -> TrackDescriptor {
    TrackDescriptor {
        id: id.to_string(),
        display_name: id.to_string(),
        language: None,
        is_forced: false,
        codec: "srt".to_string(),
        delivery: DeliveryDescriptor::Native,
    }
}

/// Polls a condition until it holds, failing the test after ~2 seconds
pub async fn wait_until(description: &str, condition: impl Fn() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("Timed out waiting for: {}", description);
}
