//! End-to-end state flows exercised without a server or a terminal:
//! pagination driving the track context, the context driving playback, and
//! liked/queue state surviving view switches.

use std::future::Future;
use std::sync::{Arc, Mutex};

use emusic_rs::model::{ApiTrack, SessionState, Track, View, PAGE_LIMIT};
use emusic_rs::player::{AudioSink, NowPlaying, Player};

#[derive(Clone, Default)]
struct RecordingSink {
    played: Arc<Mutex<Vec<String>>>,
}

impl AudioSink for RecordingSink {
    fn play(&self, url: &str) -> impl Future<Output = anyhow::Result<()>> + Send {
        let played = self.played.clone();
        let url = url.to_string();
        async move {
            played.lock().unwrap().push(url);
            Ok(())
        }
    }

    fn pause(&self) {}
    fn resume(&self) {}
    fn stop(&self) {}
}

fn api_track(id: &str, liked: bool) -> ApiTrack {
    ApiTrack {
        id: Some(id.to_string()),
        title: Some(format!("Track {id}")),
        artist: Some("Artist".to_string()),
        is_liked: Some(liked),
        ..Default::default()
    }
}

fn page(ids: &[&str]) -> Vec<Track> {
    Track::from_api_page(ids.iter().map(|id| api_track(id, false)).collect())
}

#[test]
fn search_pages_accumulate_until_a_short_page() {
    let mut session = SessionState::new();

    // First page comes back full, so more is expected
    let d1 = session.begin_search("piano", false).unwrap();
    assert_eq!(session.view, View::Search);
    let ids: Vec<String> = (0..PAGE_LIMIT).map(|i| format!("p{i}")).collect();
    let full: Vec<&str> = ids.iter().map(String::as_str).collect();
    assert!(session.apply_search_page(d1.generation, PAGE_LIMIT, page(&full), false));
    session.finish_search();
    assert!(session.search.has_more);

    // Scroll pulls an append page at the recorded offset
    let d2 = session.begin_search("piano", true).unwrap();
    assert_eq!(d2.offset, PAGE_LIMIT);
    assert_eq!(d2.query, "piano");
    assert!(session.apply_search_page(d2.generation, 3, page(&["x", "y", "z"]), true));
    session.finish_search();

    assert_eq!(session.context.len(), PAGE_LIMIT + 3);
    assert!(!session.search.has_more);
}

#[test]
fn abandoned_search_cannot_clobber_the_next_view() {
    let mut session = SessionState::new();
    let stale = session.begin_search("drone", false).unwrap();

    // User opens a playlist before the search response lands
    session.finish_search();
    session.enter_view(View::Playlist("pl1".into()), Some("Focus".into()));
    session.set_context(page(&["a", "b"]), false);

    assert!(!session.apply_search_page(stale.generation, 2, page(&["junk1", "junk2"]), false));
    assert_eq!(session.context.len(), 2);
    assert_eq!(session.context[0].id, "a");
    assert!(!session.search.has_more);
}

#[tokio::test]
async fn search_results_become_the_playback_order() {
    let mut session = SessionState::new();
    let d = session.begin_search("jazz", false).unwrap();
    session.apply_search_page(d.generation, 3, page(&["a", "b", "c"]), false);
    session.finish_search();

    let sink = RecordingSink::default();
    let mut player = Player::new(sink.clone(), "http://srv");

    player.play_all(&session.context).await;
    player.play_next(&session.context).await;
    player.play_next(&session.context).await;
    player.play_next(&session.context).await; // wraps

    let played = sink.played.lock().unwrap().clone();
    assert_eq!(
        played,
        vec![
            "http://srv/stream/a",
            "http://srv/stream/b",
            "http://srv/stream/c",
            "http://srv/stream/a",
        ]
    );
}

#[tokio::test]
async fn queue_survives_a_view_switch() {
    let mut session = SessionState::new();
    session.set_context(page(&["s1", "s2"]), false);

    let sink = RecordingSink::default();
    let mut player = Player::new(sink, "http://srv");
    player.enqueue(NowPlaying::from(&session.context[1]), false);

    // New view replaces the context entirely
    session.enter_view(View::Liked, Some("Liked Songs".into()));
    session.set_context(page(&["l1"]), false);

    player.play_next(&session.context).await;
    assert_eq!(player.current().unwrap().id, "s2");
    // Queued track is not in the new context; the advance after it restarts
    // from the top of what is on screen now.
    player.play_next(&session.context).await;
    assert_eq!(player.current().unwrap().id, "l1");
}

#[test]
fn liked_flags_follow_tracks_across_views() {
    let mut session = SessionState::new();

    // The liked view seeds the id set
    let liked = Track::from_api_page(vec![api_track("fav", true)]);
    session.set_context(liked, false);
    assert!(session.liked.is_liked("fav"));

    // The same track coming back unflagged from search is still shown liked
    session.enter_view(View::Home, None);
    session.set_context(page(&["fav", "other"]), false);
    assert!(session.context[0].liked);
    assert!(!session.context[1].liked);

    // Unliking clears both the set and the visible flag
    session.set_track_liked("fav", false);
    assert!(!session.liked.is_liked("fav"));
    assert!(!session.context[0].liked);
}

#[test]
fn rows_without_any_id_never_reach_the_context() {
    let raw = vec![
        api_track("ok", false),
        ApiTrack {
            title: Some("ghost".to_string()),
            ..Default::default()
        },
        ApiTrack {
            remote_id: Some("yt42".to_string()),
            title: Some("remote only".to_string()),
            ..Default::default()
        },
    ];
    let tracks = Track::from_api_page(raw);
    let ids: Vec<&str> = tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["ok", "yt42"]);
}
