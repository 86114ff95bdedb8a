//! Playback controller
//!
//! Owns the single now-playing slot, the user's manual queue, and the index
//! into the track-list context used for sequential playback. The context
//! itself lives in the session; play operations borrow it as the index
//! space. Only this module talks to the audio sink.

mod sink;

pub use sink::{AudioSink, PlayerEvent, RodioSink};

use std::collections::VecDeque;

use crate::model::Track;

/// Metadata for the track occupying the playback slot (or waiting in the
/// manual queue)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NowPlaying {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub thumbnail: Option<String>,
}

impl From<&Track> for NowPlaying {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            thumbnail: track.thumbnail.clone(),
        }
    }
}

pub struct Player<S: AudioSink> {
    sink: S,
    stream_base: String,
    /// User-curated upcoming tracks; consumed before context order
    pub queue: VecDeque<NowPlaying>,
    current: Option<NowPlaying>,
    current_index: Option<usize>,
    is_playing: bool,
}

impl<S: AudioSink> Player<S> {
    pub fn new(sink: S, stream_base: impl Into<String>) -> Self {
        Self {
            sink,
            stream_base: stream_base.into().trim_end_matches('/').to_string(),
            queue: VecDeque::new(),
            current: None,
            current_index: None,
            is_playing: false,
        }
    }

    pub fn current(&self) -> Option<&NowPlaying> {
        self.current.as_ref()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Put `entry` in the playback slot and start its stream. The context
    /// index is recomputed by first id match; a track that is not in the
    /// context (e.g. played from the manual queue) leaves it unset, and the
    /// next `play_next` restarts from the top of the context.
    ///
    /// A sink failure only flips the playing flag; the slot keeps the track
    /// so the UI still shows what was attempted.
    pub async fn play_track(&mut self, entry: NowPlaying, context: &[Track]) {
        self.current_index = context.iter().position(|t| t.id == entry.id);
        tracing::info!(track_id = %entry.id, title = %entry.title, index = ?self.current_index, "Starting playback");

        let url = format!("{}/stream/{}", self.stream_base, entry.id);
        self.current = Some(entry);
        self.is_playing = true;

        if let Err(e) = self.sink.play(&url).await {
            tracing::warn!(error = %e, "Playback failed to start");
            self.is_playing = false;
        }
    }

    /// Manual queue first; otherwise advance cyclically through the context.
    /// No-op when both are empty.
    pub async fn play_next(&mut self, context: &[Track]) {
        if let Some(next) = self.queue.pop_front() {
            self.play_track(next, context).await;
            return;
        }
        if context.is_empty() {
            return;
        }
        let next_index = match self.current_index {
            Some(i) => (i + 1) % context.len(),
            None => 0,
        };
        let entry = NowPlaying::from(&context[next_index]);
        self.play_track(entry, context).await;
    }

    /// Cyclic step backwards through the context; the queue is not touched.
    /// No-op on an empty context.
    pub async fn play_previous(&mut self, context: &[Track]) {
        if context.is_empty() {
            return;
        }
        let prev_index = match self.current_index {
            Some(i) if i > 0 => i - 1,
            _ => context.len() - 1,
        };
        let entry = NowPlaying::from(&context[prev_index]);
        self.play_track(entry, context).await;
    }

    /// Insert into the manual queue. Does not touch the context or the
    /// current index.
    pub fn enqueue(&mut self, entry: NowPlaying, at_front: bool) {
        tracing::debug!(track_id = %entry.id, at_front, "Queued track");
        if at_front {
            self.queue.push_front(entry);
        } else {
            self.queue.push_back(entry);
        }
    }

    pub fn remove_from_queue(&mut self, index: usize) -> Option<NowPlaying> {
        self.queue.remove(index)
    }

    /// Drop the manual queue and start the context from its first track
    pub async fn play_all(&mut self, context: &[Track]) {
        if context.is_empty() {
            return;
        }
        self.queue.clear();
        let entry = NowPlaying::from(&context[0]);
        self.play_track(entry, context).await;
    }

    pub fn toggle_playback(&mut self) {
        if self.current.is_none() {
            return;
        }
        if self.is_playing {
            self.sink.pause();
            self.is_playing = false;
        } else {
            self.sink.resume();
            self.is_playing = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ApiTrack;
    use anyhow::anyhow;
    use std::future::Future;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct FakeSink {
        played: Arc<Mutex<Vec<String>>>,
        fail_next: Arc<AtomicBool>,
    }

    impl AudioSink for FakeSink {
        fn play(&self, url: &str) -> impl Future<Output = anyhow::Result<()>> + Send {
            let played = self.played.clone();
            let fail = self.fail_next.clone();
            let url = url.to_string();
            async move {
                played.lock().unwrap().push(url);
                if fail.load(Ordering::SeqCst) {
                    Err(anyhow!("no audio device"))
                } else {
                    Ok(())
                }
            }
        }

        fn pause(&self) {}
        fn resume(&self) {}
        fn stop(&self) {}
    }

    fn track(id: &str) -> Track {
        Track::from_api(ApiTrack {
            id: Some(id.to_string()),
            title: Some(id.to_uppercase()),
            ..Default::default()
        })
        .unwrap()
    }

    fn context(ids: &[&str]) -> Vec<Track> {
        ids.iter().map(|id| track(id)).collect()
    }

    fn player() -> (Player<FakeSink>, FakeSink) {
        let sink = FakeSink::default();
        (Player::new(sink.clone(), "http://test"), sink)
    }

    #[tokio::test]
    async fn play_track_requests_stream_url_and_index() {
        let (mut player, sink) = player();
        let ctx = context(&["a", "b", "c"]);

        player.play_track(NowPlaying::from(&ctx[1]), &ctx).await;

        assert_eq!(player.current_index(), Some(1));
        assert!(player.is_playing());
        assert_eq!(
            sink.played.lock().unwrap().as_slice(),
            &["http://test/stream/b".to_string()]
        );
    }

    #[tokio::test]
    async fn next_wraps_around_the_context() {
        let (mut player, _) = player();
        let ctx = context(&["a", "b", "c"]);
        player.play_track(NowPlaying::from(&ctx[0]), &ctx).await;

        let mut visited = Vec::new();
        for _ in 0..3 {
            player.play_next(&ctx).await;
            visited.push(player.current().unwrap().id.clone());
        }
        // B, C, then wraparound back to A
        assert_eq!(visited, vec!["b", "c", "a"]);
        assert_eq!(player.current_index(), Some(0));
    }

    #[tokio::test]
    async fn next_called_len_times_returns_to_start() {
        let (mut player, _) = player();
        let ctx = context(&["a", "b", "c", "d"]);
        player.play_track(NowPlaying::from(&ctx[0]), &ctx).await;

        for _ in 0..ctx.len() {
            player.play_next(&ctx).await;
        }
        assert_eq!(player.current_index(), Some(0));
    }

    #[tokio::test]
    async fn previous_from_first_jumps_to_last() {
        let (mut player, _) = player();
        let ctx = context(&["a", "b", "c"]);
        player.play_track(NowPlaying::from(&ctx[0]), &ctx).await;

        player.play_previous(&ctx).await;
        assert_eq!(player.current_index(), Some(2));
        assert_eq!(player.current().unwrap().id, "c");
    }

    #[tokio::test]
    async fn queue_takes_priority_over_context() {
        let (mut player, _) = player();
        let ctx = context(&["a", "b"]);
        player.play_track(NowPlaying::from(&ctx[0]), &ctx).await;

        player.enqueue(NowPlaying::from(&track("queued")), false);
        player.play_next(&ctx).await;

        assert_eq!(player.current().unwrap().id, "queued");
        assert!(player.queue.is_empty());
        // Queued track is not in the context, so the index is cleared...
        assert_eq!(player.current_index(), None);
        // ...and the following advance restarts from the top
        player.play_next(&ctx).await;
        assert_eq!(player.current().unwrap().id, "a");
    }

    #[tokio::test]
    async fn queue_is_fifo_at_back_and_lifo_at_front() {
        let (mut player, _) = player();
        player.enqueue(NowPlaying::from(&track("first")), false);
        player.enqueue(NowPlaying::from(&track("second")), false);
        player.enqueue(NowPlaying::from(&track("jumped")), true);

        let order: Vec<String> = player.queue.iter().map(|t| t.id.clone()).collect();
        assert_eq!(order, vec!["jumped", "first", "second"]);
    }

    #[tokio::test]
    async fn next_and_previous_are_noops_when_everything_is_empty() {
        let (mut player, sink) = player();
        player.play_next(&[]).await;
        player.play_previous(&[]).await;
        assert!(player.current().is_none());
        assert!(sink.played.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn play_all_clears_the_queue_and_starts_at_the_top() {
        let (mut player, _) = player();
        let ctx = context(&["a", "b"]);
        player.enqueue(NowPlaying::from(&track("stale")), false);

        player.play_all(&ctx).await;

        assert!(player.queue.is_empty());
        assert_eq!(player.current().unwrap().id, "a");
        assert_eq!(player.current_index(), Some(0));
    }

    #[tokio::test]
    async fn sink_failure_only_flips_the_playing_flag() {
        let (mut player, sink) = player();
        let ctx = context(&["a"]);
        sink.fail_next.store(true, Ordering::SeqCst);

        player.play_track(NowPlaying::from(&ctx[0]), &ctx).await;

        assert!(!player.is_playing());
        // The slot still shows what was attempted
        assert_eq!(player.current().unwrap().id, "a");
    }

    #[tokio::test]
    async fn remove_from_queue_by_index() {
        let (mut player, _) = player();
        player.enqueue(NowPlaying::from(&track("a")), false);
        player.enqueue(NowPlaying::from(&track("b")), false);

        let removed = player.remove_from_queue(0).unwrap();
        assert_eq!(removed.id, "a");
        assert_eq!(player.queue.len(), 1);
        assert!(player.remove_from_queue(5).is_none());
    }
}
