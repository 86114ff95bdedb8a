//! Playback commands and the like toggle

use crate::controller::AppController;
use crate::player::{AudioSink, NowPlaying, PlayerEvent};

impl<S: AudioSink> AppController<S> {
    /// Play the selected row of the current track list. The context is
    /// snapshotted so the player's index space matches what was on screen
    /// when the user hit play.
    pub async fn play_selected(&self) {
        let picked = {
            let session = self.session.lock().await;
            session
                .selected_track()
                .map(|track| (NowPlaying::from(track), session.context.clone()))
        };
        let Some((entry, context)) = picked else {
            return;
        };
        self.player.lock().await.play_track(entry, &context).await;
    }

    pub async fn next_track(&self) {
        let context = self.session.lock().await.context.clone();
        self.player.lock().await.play_next(&context).await;
    }

    pub async fn previous_track(&self) {
        let context = self.session.lock().await.context.clone();
        self.player.lock().await.play_previous(&context).await;
    }

    /// Play the whole visible list from the top, dropping the manual queue
    pub async fn play_all(&self) {
        let context = self.session.lock().await.context.clone();
        self.player.lock().await.play_all(&context).await;
    }

    pub async fn toggle_playback(&self) {
        self.player.lock().await.toggle_playback();
    }

    /// Add the selected track to the manual queue and reveal the queue pane
    pub async fn enqueue_selected(&self, at_front: bool) {
        let entry = {
            let session = self.session.lock().await;
            session.selected_track().map(NowPlaying::from)
        };
        let Some(entry) = entry else {
            return;
        };
        let title = entry.title.clone();
        self.player.lock().await.enqueue(entry, at_front);

        let mut session = self.session.lock().await;
        session.ui.queue_pane_open = true;
        session.ui.show_toast(format!("Added \"{title}\" to queue"));
    }

    pub async fn remove_selected_queue_entry(&self) {
        let index = self.session.lock().await.ui.queue_selected;
        let mut player = self.player.lock().await;
        if player.remove_from_queue(index).is_none() {
            return;
        }
        let remaining = player.queue.len();
        drop(player);

        let mut session = self.session.lock().await;
        if session.ui.queue_selected >= remaining {
            session.ui.queue_selected = remaining.saturating_sub(1);
        }
    }

    /// A drained stream advances playback exactly like a manual skip
    pub async fn handle_player_event(&self, event: PlayerEvent) {
        match event {
            PlayerEvent::TrackEnded => self.next_track().await,
        }
    }

    /// Flip the liked flag for the selected track. The session mutates only
    /// after the server confirms; a 401 prompts and changes nothing.
    pub async fn toggle_like_selected(&self) {
        let target = {
            let session = self.session.lock().await;
            session
                .selected_track()
                .map(|track| (track.id.clone(), !session.liked.is_liked(&track.id)))
        };
        let Some((track_id, liked)) = target else {
            return;
        };

        let response = match self.api().toggle_like(&track_id, liked).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, track_id, "Like toggle request failed");
                return;
            }
        };

        let mut session = self.session.lock().await;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            session.require_auth("Login required to like tracks!");
        } else if response.status().is_success() {
            session.set_track_liked(&track_id, liked);
            let message = if liked {
                "Added to liked songs"
            } else {
                "Removed from liked songs"
            };
            session.ui.show_toast(message);
        } else {
            drop(session);
            let detail = Self::error_detail(response).await;
            self.session.lock().await.ui.show_toast(detail);
        }
    }
}
