/*!
 * Session lifecycle tests: backend switches and surface rebinding
 */

use std::sync::Arc;

use dualsub::discovery::{SidecarDiscovery, TrackDiscovery};
use dualsub::fetch::FileFetcher;
use dualsub::loader::TrackLoader;
use dualsub::router::{ChannelId, ChannelState};
use dualsub::session::PlaybackSession;
use crate::common::{self, wait_until, mock_sinks::RecordingSink};

/// Test a backend switch: new surfaces receive the last-known cue sets and
/// selections survive
#[tokio::test]
async fn test_rebind_sinks_withOngoingPlayback_shouldCarrySelectionOver() {
    let dir = common::create_temp_dir().unwrap();
    let dir_path = dir.path().to_path_buf();
    common::create_test_file(&dir_path, "movie.en.srt", common::SRT_BASIC).unwrap();

    let tracks = SidecarDiscovery::new()
        .discover(&dir_path.join("movie.mkv"))
        .unwrap();

    let loader = TrackLoader::new(Arc::new(FileFetcher::new()), 2);
    let (primary_sink, old_primary) = RecordingSink::new();
    let (secondary_sink, _old_secondary) = RecordingSink::new();

    let mut session = PlaybackSession::new(
        "movie.mkv",
        tracks,
        loader,
        Box::new(primary_sink),
        Box::new(secondary_sink),
    );

    session
        .select_track(ChannelId::Primary, Some("movie.en.srt"))
        .unwrap();
    wait_until("primary active", || {
        session.router().channel_state(ChannelId::Primary) == ChannelState::Active
    })
    .await;
    session.position(2_000_000);
    wait_until("cue on old surface", || {
        old_primary.last_delivery() == Some(vec!["Hello".to_string()])
    })
    .await;

    // Player reinitialization: fresh surfaces, same session
    let (new_primary_sink, new_primary) = RecordingSink::new();
    let (new_secondary_sink, _new_secondary) = RecordingSink::new();
    session.rebind_sinks(Box::new(new_primary_sink), Box::new(new_secondary_sink));

    wait_until("old surface closed", || old_primary.was_closed()).await;
    wait_until("last cue set re-delivered without a tick", || {
        new_primary.last_delivery() == Some(vec!["Hello".to_string()])
    })
    .await;

    assert_eq!(
        session.router().selected_track(ChannelId::Primary).as_deref(),
        Some("movie.en.srt")
    );

    // Playback continues on the new surface
    session.position(7_000_000);
    wait_until("new surface cleared after the cue ends", || {
        new_primary.last_delivery() == Some(Vec::new())
    })
    .await;

    session.close().await;
}

/// Test media-item identity is preserved for diagnostics
#[tokio::test]
async fn test_session_shouldExposeMediaIdentity() {
    let loader = TrackLoader::new(Arc::new(FileFetcher::new()), 2);
    let (primary_sink, _p) = RecordingSink::new();
    let (secondary_sink, _s) = RecordingSink::new();

    let session = PlaybackSession::new(
        "series-ep-12",
        Vec::new(),
        loader,
        Box::new(primary_sink),
        Box::new(secondary_sink),
    );

    assert_eq!(session.media_id(), "series-ep-12");
    assert!(session.tracks().is_empty());

    session.close().await;
}
