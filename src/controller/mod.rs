//! Application controller
//!
//! Glue between input commands, the session state, the playback controller,
//! and the remote API. Every async handler follows the same shape: take what
//! it needs under the session lock, drop the lock across the network call,
//! then re-lock to apply the outcome. Handlers are spawned from the event
//! loop, so nothing here blocks rendering.

mod input;
mod playback;
mod playlists;
mod search;

use std::sync::Arc;

use anyhow::Result;
use reqwest::{Response, StatusCode};
use tokio::sync::Mutex;

use crate::api::ApiClient;
use crate::debounce::{SearchDebouncer, SEARCH_DEBOUNCE};
use crate::model::{ApiTrack, SessionState, Track};
use crate::player::{AudioSink, Player};

pub struct AppController<S: AudioSink> {
    pub session: Arc<Mutex<SessionState>>,
    pub player: Arc<Mutex<Player<S>>>,
    api: ApiClient,
    debouncer: Arc<Mutex<SearchDebouncer>>,
}

// Manual impl: `S` itself is not cloned, only the shared handles are.
impl<S: AudioSink> Clone for AppController<S> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            player: self.player.clone(),
            api: self.api.clone(),
            debouncer: self.debouncer.clone(),
        }
    }
}

/// What a track-list request came back as, after status interpretation
pub(crate) enum ListOutcome {
    /// `returned` is the raw row count before id-less rows were dropped;
    /// pagination advances by it
    Page { returned: usize, tracks: Vec<Track> },
    Unauthorized,
    /// Server rejected the request; message is fit for a toast
    Rejected(String),
    /// Transport-level failure, already logged; callers stay silent
    Network,
}

impl<S: AudioSink> AppController<S> {
    pub fn new(
        session: Arc<Mutex<SessionState>>,
        player: Arc<Mutex<Player<S>>>,
        api: ApiClient,
    ) -> Self {
        Self {
            session,
            player,
            api,
            debouncer: Arc::new(Mutex::new(SearchDebouncer::new(SEARCH_DEBOUNCE))),
        }
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Pull the server's `detail` field out of an error response, falling
    /// back to the status code when the body is not the expected shape.
    pub(crate) async fn error_detail(response: Response) -> String {
        let status = response.status();
        let detail = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("detail")?.as_str().map(String::from));
        detail.unwrap_or_else(|| format!("Request failed ({status})"))
    }

    /// Shared status interpretation for every endpoint that returns a track
    /// list.
    pub(crate) async fn read_track_page(result: Result<Response>) -> ListOutcome {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "Track list request failed");
                return ListOutcome::Network;
            }
        };
        if response.status() == StatusCode::UNAUTHORIZED {
            return ListOutcome::Unauthorized;
        }
        if !response.status().is_success() {
            return ListOutcome::Rejected(Self::error_detail(response).await);
        }
        match response.json::<Vec<ApiTrack>>().await {
            Ok(raw) => {
                let returned = raw.len();
                ListOutcome::Page {
                    returned,
                    tracks: Track::from_api_page(raw),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Track list response was not valid JSON");
                ListOutcome::Rejected("Server returned a malformed track list".to_string())
            }
        }
    }
}
