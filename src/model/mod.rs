//! Model module - Application state and data types
//!
//! - `types`: core enums and UI state
//! - `track`: raw API payloads and their canonical form
//! - `search`: pagination state machine
//! - `cache`: session liked-id set
//! - `session`: the owned session state the coordinator and player share

mod cache;
mod search;
mod session;
mod track;
mod types;

pub use cache::LikedSet;
pub use search::{SearchMeta, PAGE_LIMIT};
pub use session::{SearchDispatch, SessionState};
pub use track::{ApiTrack, Track, TrackSource};
pub use types::{Command, InputMode, Playlist, Toast, UiState, UserProfile, View};
