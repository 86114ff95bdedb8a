//! Search dispatch, view loading, and infinite scroll

use crate::controller::{AppController, ListOutcome};
use crate::model::{Playlist, View};
use crate::player::AudioSink;
use reqwest::StatusCode;

/// Rows of headroom left below the selection before the next page is pulled
const LOAD_MORE_THRESHOLD: usize = 10;

impl<S: AudioSink> AppController<S> {
    /// One paged list fetch. `append` extends the current context at the
    /// recorded offset; otherwise pagination restarts from zero and the view
    /// reclassifies (an empty query on Home stays Home). A call while a
    /// fetch is in flight is a no-op; a page that lands after the user moved
    /// on is dropped.
    pub async fn perform_search(&self, query: &str, append: bool) {
        let dispatch = {
            let mut session = self.session.lock().await;
            session.begin_search(query, append)
        };
        let Some(dispatch) = dispatch else {
            return;
        };
        tracing::debug!(
            query = %dispatch.query,
            offset = dispatch.offset,
            append,
            "Dispatching list fetch"
        );

        let result = match &dispatch.view {
            View::Home => self.api().popular(dispatch.offset, dispatch.limit).await,
            View::Recent => self.api().recent(dispatch.offset, dispatch.limit).await,
            _ => {
                self.api()
                    .search(&dispatch.query, dispatch.offset, dispatch.limit)
                    .await
            }
        };
        let outcome = Self::read_track_page(result).await;

        let mut session = self.session.lock().await;
        match outcome {
            ListOutcome::Page { returned, tracks } => {
                session.apply_search_page(dispatch.generation, returned, tracks, append);
            }
            ListOutcome::Unauthorized => session.require_auth("Please log in to continue."),
            ListOutcome::Rejected(message) => session.ui.show_toast(message),
            ListOutcome::Network => {}
        }
        // Always the last step, even for stale or failed pages.
        session.finish_search();
    }

    /// Debounced dispatch for live search input. Each keystroke re-arms the
    /// timer; only the last value within the quiet period hits the network.
    pub async fn schedule_search(&self, query: String) {
        let controller = self.clone();
        let mut debouncer = self.debouncer.lock().await;
        debouncer.schedule(async move {
            controller.perform_search(&query, false).await;
        });
    }

    pub async fn load_home(&self) {
        {
            let mut session = self.session.lock().await;
            session.enter_view(View::Home, None);
            session.ui.search_input.clear();
        }
        self.perform_search("", false).await;
    }

    /// Recent starts as its own view but the empty-query dispatch
    /// reclassifies it, matching how the row is fetched elsewhere.
    pub async fn load_recent(&self) {
        {
            let mut session = self.session.lock().await;
            session.enter_view(View::Recent, Some("Recently Played".to_string()));
            session.ui.search_input.clear();
        }
        self.perform_search("", false).await;
    }

    /// Liked songs load in one shot; a 401 prompts and leaves the current
    /// list (and the liked-id set) untouched.
    pub async fn load_liked(&self) {
        {
            let mut session = self.session.lock().await;
            session.enter_view(View::Liked, Some("Liked Songs".to_string()));
            session.ui.search_input.clear();
            session.ui.loading = true;
        }
        let outcome = Self::read_track_page(self.api().liked().await).await;

        let mut session = self.session.lock().await;
        match outcome {
            ListOutcome::Page { tracks, .. } => session.set_context(tracks, false),
            ListOutcome::Unauthorized => {
                session.require_auth("Log in to see your liked songs!")
            }
            ListOutcome::Rejected(message) => session.ui.show_toast(message),
            ListOutcome::Network => {}
        }
        session.ui.loading = false;
    }

    pub async fn load_playlist(&self, playlist_id: String, name: String) {
        {
            let mut session = self.session.lock().await;
            session.enter_view(View::Playlist(playlist_id.clone()), Some(name));
            session.ui.search_input.clear();
            session.ui.loading = true;
        }
        let outcome = Self::read_track_page(self.api().playlist_tracks(&playlist_id).await).await;

        let mut session = self.session.lock().await;
        match outcome {
            ListOutcome::Page { tracks, .. } => session.set_context(tracks, false),
            ListOutcome::Unauthorized => {
                session.require_auth("Log in to see your playlists!")
            }
            ListOutcome::Rejected(message) => session.ui.show_toast(message),
            ListOutcome::Network => {}
        }
        session.ui.loading = false;
    }

    pub async fn load_library(&self) {
        {
            let mut session = self.session.lock().await;
            session.enter_view(View::Library, Some("Your Library".to_string()));
            session.ui.search_input.clear();
            session.ui.loading = true;
        }
        let playlists = self.fetch_playlists().await;

        let mut session = self.session.lock().await;
        match playlists {
            PlaylistsOutcome::Loaded(playlists) => session.playlists = playlists,
            PlaylistsOutcome::Unauthorized => {
                session.require_auth("Log in to see your playlists!")
            }
            PlaylistsOutcome::Failed(Some(message)) => session.ui.show_toast(message),
            PlaylistsOutcome::Failed(None) => {}
        }
        session.ui.loading = false;
    }

    pub(crate) async fn fetch_playlists(&self) -> PlaylistsOutcome {
        let response = match self.api().playlists().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Playlist listing request failed");
                return PlaylistsOutcome::Failed(None);
            }
        };
        if response.status() == StatusCode::UNAUTHORIZED {
            return PlaylistsOutcome::Unauthorized;
        }
        if !response.status().is_success() {
            return PlaylistsOutcome::Failed(Some(Self::error_detail(response).await));
        }
        match response.json::<Vec<Playlist>>().await {
            Ok(playlists) => PlaylistsOutcome::Loaded(playlists),
            Err(e) => {
                tracing::error!(error = %e, "Playlist listing was not valid JSON");
                PlaylistsOutcome::Failed(Some("Server returned a malformed playlist list".into()))
            }
        }
    }

    /// Infinite scroll: when the selection closes in on the end of a paged
    /// list, pull the next page. Only the paged views participate, and the
    /// single-flight guard in `begin_search` keeps this idempotent while a
    /// page is loading.
    pub async fn maybe_load_more(&self) {
        let query = {
            let session = self.session.lock().await;
            let paged = matches!(session.view, View::Home | View::Search | View::Recent);
            let near_end = !session.context.is_empty()
                && session.ui.selected + LOAD_MORE_THRESHOLD >= session.context.len();
            if paged
                && near_end
                && session.search.has_more
                && !session.search.is_fetching
                && !session.ui.queue_pane_focused
            {
                Some(session.search.query.clone())
            } else {
                None
            }
        };
        if let Some(query) = query {
            self.perform_search(&query, true).await;
        }
    }
}

pub(crate) enum PlaylistsOutcome {
    Loaded(Vec<Playlist>),
    Unauthorized,
    /// `None` means a transport failure that was already logged
    Failed(Option<String>),
}
