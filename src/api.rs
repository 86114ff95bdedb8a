//! Music server API client
//!
//! One method per remote capability. Every method hands back the transport
//! response unconsumed; status interpretation (401 vs ok vs error detail) is
//! the caller's job, so each call site keeps its own error handling. The
//! bearer token is re-read from the token store on every call, which lets a
//! token written mid-session take effect on the next request.

use anyhow::Result;
use reqwest::{Method, RequestBuilder, Response};

use crate::auth::TokenStore;

pub const DEFAULT_BASE_URL: &str = "https://api.e-music.win";

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: TokenStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Base URL from `EMUSIC_API_URL`, falling back to the public instance
    pub fn from_env(tokens: TokenStore) -> Self {
        let base = std::env::var("EMUSIC_API_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base, tokens)
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Streaming endpoint for a track, handed to the audio sink
    pub fn stream_url(&self, track_id: &str) -> String {
        format!("{}/stream/{}", self.base_url, track_id)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a request with the bearer token read from persisted storage at
    /// call time (never cached in memory)
    fn authed(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.tokens.read() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ------------------------------------------------------------------
    // Tracks
    // ------------------------------------------------------------------

    pub async fn search(&self, query: &str, offset: usize, limit: usize) -> Result<Response> {
        tracing::debug!(query, offset, limit, "API: search");
        let response = self
            .authed(Method::GET, "/search")
            .query(&[("q", query)])
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await?;
        Ok(response)
    }

    pub async fn popular(&self, offset: usize, limit: usize) -> Result<Response> {
        tracing::debug!(offset, limit, "API: popular tracks");
        let response = self
            .authed(Method::GET, "/tracks/popular")
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await?;
        Ok(response)
    }

    pub async fn recent(&self, offset: usize, limit: usize) -> Result<Response> {
        tracing::debug!(offset, limit, "API: recent tracks");
        let response = self
            .authed(Method::GET, "/tracks/recent")
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await?;
        Ok(response)
    }

    pub async fn liked(&self) -> Result<Response> {
        tracing::debug!("API: liked tracks");
        let response = self.authed(Method::GET, "/tracks/liked").send().await?;
        Ok(response)
    }

    /// Set the liked flag for a track to `target`
    pub async fn toggle_like(&self, track_id: &str, target: bool) -> Result<Response> {
        tracing::debug!(track_id, target, "API: toggle like");
        let response = self
            .authed(Method::POST, &format!("/tracks/{track_id}/like"))
            .query(&[("is_liked", target)])
            .send()
            .await?;
        Ok(response)
    }

    // ------------------------------------------------------------------
    // Playlists (mutations are form-encoded, matching the server)
    // ------------------------------------------------------------------

    pub async fn playlists(&self) -> Result<Response> {
        tracing::debug!("API: list playlists");
        let response = self.authed(Method::GET, "/playlists").send().await?;
        Ok(response)
    }

    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Response> {
        tracing::debug!(playlist_id, "API: playlist tracks");
        let response = self
            .authed(Method::GET, &format!("/playlists/{playlist_id}/tracks"))
            .send()
            .await?;
        Ok(response)
    }

    pub async fn create_playlist(&self, name: &str) -> Result<Response> {
        tracing::debug!(name, "API: create playlist");
        let response = self
            .authed(Method::POST, "/playlists")
            .form(&[("name", name)])
            .send()
            .await?;
        Ok(response)
    }

    pub async fn delete_playlist(&self, playlist_id: &str) -> Result<Response> {
        tracing::debug!(playlist_id, "API: delete playlist");
        let response = self
            .authed(Method::DELETE, &format!("/playlists/{playlist_id}"))
            .send()
            .await?;
        Ok(response)
    }

    pub async fn add_track_to_playlist(
        &self,
        playlist_id: &str,
        track_id: &str,
    ) -> Result<Response> {
        tracing::debug!(playlist_id, track_id, "API: add track to playlist");
        let response = self
            .authed(Method::POST, &format!("/playlists/{playlist_id}/tracks"))
            .form(&[("track_id", track_id)])
            .send()
            .await?;
        Ok(response)
    }

    pub async fn remove_track_from_playlist(
        &self,
        playlist_id: &str,
        track_id: &str,
    ) -> Result<Response> {
        tracing::debug!(playlist_id, track_id, "API: remove track from playlist");
        let response = self
            .authed(
                Method::DELETE,
                &format!("/playlists/{playlist_id}/tracks/{track_id}"),
            )
            .send()
            .await?;
        Ok(response)
    }

    // ------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------

    /// Validate a candidate token. The only call that does not go through
    /// the token store: the token under test is passed explicitly.
    pub async fn check_auth(&self, token: &str) -> Result<Response> {
        tracing::debug!("API: auth check");
        let response = self
            .http
            .get(self.url("/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(response)
    }

    /// Password login; returns the raw response carrying `access_token`
    pub async fn login(&self, username: &str, password: &str) -> Result<Response> {
        tracing::debug!(username, "API: login");
        let response = self
            .http
            .post(self.url("/auth/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        Ok(response)
    }
}
