/*!
 * End-to-end pipeline tests: sidecar files on disk through discovery,
 * fetch, parse, index and the router into recording sinks
 */

use std::sync::Arc;

use dualsub::discovery::{SidecarDiscovery, TrackDiscovery};
use dualsub::fetch::FileFetcher;
use dualsub::loader::TrackLoader;
use dualsub::router::{ChannelId, ChannelState};
use dualsub::session::PlaybackSession;
use crate::common::{self, wait_until, mock_sinks::RecordingSink};

/// Discover sidecars for a media file and run a session over them
async fn session_for_media(
    dir: &std::path::Path,
) -> (
    PlaybackSession,
    Arc<crate::common::mock_sinks::SinkRecord>,
    Arc<crate::common::mock_sinks::SinkRecord>,
) {
    let dir_path = dir.to_path_buf();
    let media = common::create_test_file(&dir_path, "movie.mkv", "x").unwrap();
    common::create_test_file(&dir_path, "movie.en.srt", common::SRT_BASIC).unwrap();
    common::create_test_file(&dir_path, "movie.de.srt", common::SRT_GERMAN).unwrap();

    let tracks = SidecarDiscovery::new().discover(&media).unwrap();
    assert_eq!(tracks.len(), 2);

    let loader = TrackLoader::new(Arc::new(FileFetcher::new()), 2);
    let (primary_sink, primary_record) = RecordingSink::new();
    let (secondary_sink, secondary_record) = RecordingSink::new();

    let session = PlaybackSession::new(
        "movie.mkv",
        tracks,
        loader,
        Box::new(primary_sink),
        Box::new(secondary_sink),
    );

    (session, primary_record, secondary_record)
}

/// Test the full path: discovery -> fetch -> parse -> index -> router ->
/// sink, with two languages on two channels
#[tokio::test]
async fn test_pipeline_withTwoSidecarTracks_shouldDeliverIndependently() {
    let dir = common::create_temp_dir().unwrap();
    let (session, primary, secondary) = session_for_media(dir.path()).await;

    session
        .select_track(ChannelId::Primary, Some("movie.en.srt"))
        .unwrap();
    session
        .select_track(ChannelId::Secondary, Some("movie.de.srt"))
        .unwrap();

    wait_until("both channels active", || {
        session.router().channel_state(ChannelId::Primary) == ChannelState::Active
            && session.router().channel_state(ChannelId::Secondary) == ChannelState::Active
    })
    .await;

    session.position(2_000_000);

    wait_until("primary shows English", || {
        primary.last_delivery() == Some(vec!["Hello".to_string()])
    })
    .await;
    wait_until("secondary shows German", || {
        secondary.last_delivery() == Some(vec!["Hallo".to_string()])
    })
    .await;

    // Past both cues, both channels clear
    session.position(7_000_000);
    wait_until("primary cleared", || {
        primary.last_delivery() == Some(Vec::new())
    })
    .await;
    wait_until("secondary cleared", || {
        secondary.last_delivery() == Some(Vec::new())
    })
    .await;

    session.close().await;
}

/// Test selecting an unknown track id fails without touching the channels
#[tokio::test]
async fn test_select_track_withUnknownId_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let (session, _primary, _secondary) = session_for_media(dir.path()).await;

    let result = session.select_track(ChannelId::Primary, Some("nope.srt"));

    assert!(result.is_err());
    assert_eq!(
        session.router().channel_state(ChannelId::Primary),
        ChannelState::Empty
    );

    session.close().await;
}

/// Test empty selection mid-playback yields an immediate empty delivery
#[tokio::test]
async fn test_select_track_withNoneMidPlayback_shouldClearImmediately() {
    let dir = common::create_temp_dir().unwrap();
    let (session, primary, _secondary) = session_for_media(dir.path()).await;

    session
        .select_track(ChannelId::Primary, Some("movie.en.srt"))
        .unwrap();
    wait_until("primary active", || {
        session.router().channel_state(ChannelId::Primary) == ChannelState::Active
    })
    .await;
    session.position(2_000_000);
    wait_until("cue visible", || {
        primary.last_delivery() == Some(vec!["Hello".to_string()])
    })
    .await;

    session.select_track(ChannelId::Primary, None).unwrap();

    wait_until("cleared mid-playback", || {
        primary.last_delivery() == Some(Vec::new())
    })
    .await;

    session.close().await;
}

/// Test closing the session closes both render surfaces
#[tokio::test]
async fn test_close_shouldCloseBothSinks() {
    let dir = common::create_temp_dir().unwrap();
    let (session, primary, secondary) = session_for_media(dir.path()).await;

    wait_until("sinks opened", || {
        primary.was_opened() && secondary.was_opened()
    })
    .await;

    session.close().await;

    assert!(primary.was_closed());
    assert!(secondary.was_closed());
}
