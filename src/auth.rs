//! Token persistence and the console login flow
//!
//! The browser front-end kept a single token string in local storage; here
//! it lives in `.cache/token`. The store is read from disk before every
//! authenticated call and written once at login, so a token refresh lands
//! on the next request without restarting anything.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;

use crate::api::ApiClient;
use crate::model::UserProfile;

const TOKEN_FILE: &str = ".cache/token";

#[derive(Clone, Debug)]
pub struct TokenStore {
    path: PathBuf,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(TOKEN_FILE),
        }
    }

    /// Store backed by an explicit path (tests)
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Fresh read from disk; no in-memory caching
    pub fn read(&self) -> Option<String> {
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim().to_string();
        if token.is_empty() {
            None
        } else {
            Some(token)
        }
    }

    pub fn write(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)?;
        Ok(())
    }

    pub fn clear(&self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Validate whatever token is on disk. A missing or rejected token is not an
/// error; the app is browsable anonymously and gated views prompt later.
pub async fn check_stored_token(api: &ApiClient) -> Option<UserProfile> {
    let token = api.tokens().read()?;
    match api.check_auth(&token).await {
        Ok(response) if response.status().is_success() => match response.json().await {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Auth check returned an unreadable profile");
                None
            }
        },
        Ok(response) => {
            tracing::info!(status = %response.status(), "Stored token rejected");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Auth check failed");
            None
        }
    }
}

/// Console login before the TUI takes over the terminal. An empty username
/// skips login and continues anonymously.
pub async fn login_prompt(api: &ApiClient) -> Result<Option<UserProfile>> {
    print!("Username (blank to browse without an account): ");
    io::stdout().flush()?;
    let mut username = String::new();
    io::stdin().lock().read_line(&mut username)?;
    let username = username.trim().to_string();
    if username.is_empty() {
        return Ok(None);
    }

    print!("Password: ");
    io::stdout().flush()?;
    let mut password = String::new();
    io::stdin().lock().read_line(&mut password)?;
    let password = password.trim().to_string();

    let response = api.login(&username, &password).await?;
    if !response.status().is_success() {
        println!("Login failed ({}); continuing without an account.", response.status());
        return Ok(None);
    }

    let token: TokenResponse = response.json().await?;
    api.tokens().write(&token.access_token)?;
    tracing::info!(username, "Logged in, token stored");

    Ok(check_stored_token(api).await)
}
