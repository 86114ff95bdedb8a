//! Core type definitions for the application

use std::time::Instant;

/// Logical view currently shown in the main content area.
///
/// Pagination requests are routed by this tag: `Home` pulls popular tracks,
/// `Recent` pulls listening history, everything else goes through search.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Search,
    Recent,
    Liked,
    /// A single playlist's tracks; carries the active playlist id.
    Playlist(String),
    Library,
}

/// A user playlist (library listing and "add to playlist" targets)
#[derive(Clone, Debug, serde::Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}

/// Minimal profile returned by the auth check
#[derive(Clone, Debug, serde::Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// What keyboard input is currently feeding
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Characters go to the search box (debounced dispatch)
    Search,
    /// Characters go to the new-playlist name prompt
    PlaylistName,
}

/// Short-lived status message shown near the player bar
#[derive(Clone, Debug)]
pub struct Toast {
    pub message: String,
    pub shown_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            shown_at: Instant::now(),
        }
    }
}

/// Explicit commands consumed by the controller.
///
/// Input handling maps key events to these; nothing below the input layer
/// knows about crossterm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    SearchChar(char),
    SearchBackspace,
    ClearSearch,
    EnterSearchMode,
    LeaveSearchMode,
    ShowHome,
    ShowRecent,
    ShowLiked,
    ShowLibrary,
    MoveUp,
    MoveDown,
    /// Act on the selected row: play a track, or open a playlist in Library
    Activate,
    TogglePlayback,
    NextTrack,
    PreviousTrack,
    PlayAll,
    /// Append the selected track to the back of the manual queue
    Enqueue,
    /// Insert the selected track at the front of the manual queue
    EnqueueNext,
    ToggleQueuePane,
    ToggleLike,
    /// Remove: queue entry when the queue pane is focused, playlist track in
    /// a playlist view, or the playlist itself in the library view
    RemoveSelected,
    StartPlaylistPrompt,
    PromptChar(char),
    PromptBackspace,
    ConfirmPrompt,
    CancelPrompt,
    AddSelectedToPlaylist,
    Quit,
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub input_mode: InputMode,
    pub search_input: String,
    pub prompt_input: String,
    pub selected: usize,
    pub queue_selected: usize,
    pub queue_pane_open: bool,
    pub queue_pane_focused: bool,
    pub loading: bool,
    pub toast: Option<Toast>,
    /// True once a 401 asked the user to authenticate
    pub auth_prompt: bool,
    pub view_title: Option<String>,
    /// "Add to playlist" selector overlay
    pub picker_open: bool,
    pub picker_selected: usize,
    pub picker_track: Option<String>,
    pub should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            input_mode: InputMode::Normal,
            search_input: String::new(),
            prompt_input: String::new(),
            selected: 0,
            queue_selected: 0,
            queue_pane_open: false,
            queue_pane_focused: false,
            loading: false,
            toast: None,
            auth_prompt: false,
            view_title: None,
            picker_open: false,
            picker_selected: 0,
            picker_track: None,
            should_quit: false,
        }
    }
}

impl UiState {
    const TOAST_SECS: u64 = 5;

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message));
    }

    /// Drop the toast once it has been on screen long enough
    pub fn auto_clear_toast(&mut self) {
        if let Some(toast) = &self.toast {
            if toast.shown_at.elapsed().as_secs() > Self::TOAST_SECS {
                self.toast = None;
            }
        }
    }
}
