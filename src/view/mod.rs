//! UI rendering with ratatui, organized by component:
//!
//! - `utils`: shared formatting helpers
//! - `layout`: top bar and navigation sidebar
//! - `content`: main track/playlist lists and the queue pane
//! - `player_bar`: now-playing bar at the bottom
//! - `overlays`: toast, auth prompt, playlist picker and name prompt

mod content;
mod layout;
mod overlays;
mod player_bar;
mod utils;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{InputMode, SessionState};
use crate::player::{AudioSink, Player};

pub struct AppView;

impl AppView {
    pub fn render<S: AudioSink>(frame: &mut Frame, session: &SessionState, player: &Player<S>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar
                Constraint::Min(0),    // Sidebar + content (+ queue)
                Constraint::Length(3), // Player bar
            ])
            .split(frame.area());

        layout::render_search_bar(frame, chunks[0], session);

        let middle = if session.ui.queue_pane_open {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(22),
                    Constraint::Percentage(53),
                    Constraint::Percentage(25),
                ])
                .split(chunks[1])
        } else {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
                .split(chunks[1])
        };

        layout::render_sidebar(frame, middle[0], session);
        content::render_main(frame, middle[1], session, player.current().map(|t| t.id.as_str()));
        if session.ui.queue_pane_open {
            content::render_queue(frame, middle[2], session, player);
        }

        player_bar::render(frame, chunks[2], session, player);

        if session.ui.picker_open {
            overlays::render_playlist_picker(frame, session);
        }
        if session.ui.input_mode == InputMode::PlaylistName {
            overlays::render_name_prompt(frame, session);
        }
        if let Some(toast) = &session.ui.toast {
            overlays::render_toast(frame, &toast.message);
        }
        if session.ui.auth_prompt {
            overlays::render_auth_prompt(frame);
        }
    }
}
