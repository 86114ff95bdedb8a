//! Now-playing bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::SessionState;
use crate::player::{AudioSink, Player};

pub fn render<S: AudioSink>(
    frame: &mut Frame,
    area: Rect,
    session: &SessionState,
    player: &Player<S>,
) {
    let status_text = match player.current() {
        None => " No track playing".to_string(),
        Some(track) if player.is_playing() => {
            format!(" ▶ {} | {}", track.title, track.artist)
        }
        Some(track) => format!(" ⏸ {} | {}", track.title, track.artist),
    };

    let account = match &session.user {
        Some(user) => format!(" {} ", user.username),
        None => " browsing anonymously ".to_string(),
    };

    let bar = Paragraph::new(status_text)
        .style(Style::default().fg(Color::Green))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title_bottom(Line::from(account).right_aligned()),
        );
    frame.render_widget(bar, area);
}
