//! Playlist mutations: create, delete, add and remove tracks
//!
//! All mutations hit form-encoded endpoints and only update local state
//! after the server says ok. Non-401 rejections surface the server's
//! `detail` message in a toast.

use reqwest::StatusCode;

use crate::controller::search::PlaylistsOutcome;
use crate::controller::AppController;
use crate::model::View;
use crate::player::AudioSink;

impl<S: AudioSink> AppController<S> {
    pub async fn create_playlist(&self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let response = match self.api().create_playlist(name).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Playlist create request failed");
                self.toast("Connection error. Try again.").await;
                return;
            }
        };

        if response.status() == StatusCode::UNAUTHORIZED {
            self.session
                .lock()
                .await
                .require_auth("Please login to create playlists!");
            return;
        }
        if !response.status().is_success() {
            let detail = Self::error_detail(response).await;
            self.toast(detail).await;
            return;
        }

        let reload = {
            let mut session = self.session.lock().await;
            session.ui.show_toast(format!("Playlist \"{name}\" created!"));
            session.view == View::Library
        };
        if reload {
            self.load_library().await;
        }
    }

    /// Delete the playlist selected in the library view
    pub async fn delete_selected_playlist(&self) {
        let picked = {
            let session = self.session.lock().await;
            session
                .selected_playlist()
                .map(|p| (p.id.clone(), p.name.clone()))
        };
        let Some((playlist_id, name)) = picked else {
            return;
        };

        let response = match self.api().delete_playlist(&playlist_id).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, playlist_id, "Playlist delete request failed");
                self.toast("Connection error. Try again.").await;
                return;
            }
        };

        if response.status() == StatusCode::UNAUTHORIZED {
            self.session
                .lock()
                .await
                .require_auth("Please login to manage playlists!");
            return;
        }
        if !response.status().is_success() {
            let detail = Self::error_detail(response).await;
            self.toast(detail).await;
            return;
        }

        self.toast(format!("Deleted \"{name}\"")).await;
        self.load_library().await;
    }

    /// Remove the selected track from the playlist currently open
    pub async fn remove_selected_from_playlist(&self) {
        let picked = {
            let session = self.session.lock().await;
            let View::Playlist(playlist_id) = &session.view else {
                return;
            };
            session.selected_track().map(|track| {
                (
                    playlist_id.clone(),
                    track.id.clone(),
                    session.ui.view_title.clone().unwrap_or_default(),
                )
            })
        };
        let Some((playlist_id, track_id, name)) = picked else {
            return;
        };

        let response = match self
            .api()
            .remove_track_from_playlist(&playlist_id, &track_id)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, playlist_id, track_id, "Playlist remove request failed");
                self.toast("Connection error. Try again.").await;
                return;
            }
        };

        if response.status() == StatusCode::UNAUTHORIZED {
            self.session
                .lock()
                .await
                .require_auth("Please login to manage playlists!");
            return;
        }
        if !response.status().is_success() {
            let detail = Self::error_detail(response).await;
            self.toast(detail).await;
            return;
        }

        self.toast("Removed from playlist").await;
        self.load_playlist(playlist_id, name).await;
    }

    /// Open the "add to playlist" picker for the selected track, loading the
    /// playlist list on demand.
    pub async fn open_playlist_picker(&self) {
        let track_id = {
            let session = self.session.lock().await;
            session.selected_track().map(|track| track.id.clone())
        };
        let Some(track_id) = track_id else {
            return;
        };

        let needs_playlists = self.session.lock().await.playlists.is_empty();
        if needs_playlists {
            match self.fetch_playlists().await {
                PlaylistsOutcome::Loaded(playlists) => {
                    self.session.lock().await.playlists = playlists;
                }
                PlaylistsOutcome::Unauthorized => {
                    self.session
                        .lock()
                        .await
                        .require_auth("Please login to use playlists!");
                    return;
                }
                PlaylistsOutcome::Failed(Some(message)) => {
                    self.toast(message).await;
                    return;
                }
                PlaylistsOutcome::Failed(None) => return,
            }
        }

        let mut session = self.session.lock().await;
        if session.playlists.is_empty() {
            session.ui.show_toast("No playlists yet. Create one first!");
            return;
        }
        session.ui.picker_open = true;
        session.ui.picker_selected = 0;
        session.ui.picker_track = Some(track_id);
    }

    /// Confirm the picker: add the remembered track to the highlighted
    /// playlist.
    pub async fn confirm_playlist_picker(&self) {
        let picked = {
            let mut session = self.session.lock().await;
            let track_id = session.ui.picker_track.take();
            let playlist = session
                .playlists
                .get(session.ui.picker_selected)
                .map(|p| (p.id.clone(), p.name.clone()));
            session.ui.picker_open = false;
            track_id.zip(playlist)
        };
        let Some((track_id, (playlist_id, name))) = picked else {
            return;
        };

        let response = match self
            .api()
            .add_track_to_playlist(&playlist_id, &track_id)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, playlist_id, track_id, "Playlist add request failed");
                self.toast("Connection error. Try again.").await;
                return;
            }
        };

        if response.status() == StatusCode::UNAUTHORIZED {
            self.session
                .lock()
                .await
                .require_auth("Please login to use playlists!");
            return;
        }
        if !response.status().is_success() {
            let detail = Self::error_detail(response).await;
            self.toast(detail).await;
            return;
        }

        self.toast(format!("Added to \"{name}\"")).await;
    }

    pub async fn cancel_playlist_picker(&self) {
        let mut session = self.session.lock().await;
        session.ui.picker_open = false;
        session.ui.picker_track = None;
    }

    async fn toast(&self, message: impl Into<String>) {
        self.session.lock().await.ui.show_toast(message);
    }
}
