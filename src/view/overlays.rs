//! Overlay rendering (toast, auth prompt, playlist picker and name prompt)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::model::SessionState;

fn centered_popup(frame: &Frame, width: u16, height: u16) -> Rect {
    let area = frame.area();
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect {
        x: area.width.saturating_sub(width) / 2,
        y: area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

/// Toasts sit above the player bar and clear themselves after a few seconds
pub fn render_toast(frame: &mut Frame, message: &str) {
    let area = frame.area();
    let width = (message.chars().count() as u16 + 4).min(area.width.saturating_sub(4));
    let popup = Rect {
        x: area.width.saturating_sub(width + 2),
        y: area.height.saturating_sub(6),
        width,
        height: 3,
    };

    frame.render_widget(Clear, popup);
    let toast = Paragraph::new(format!(" {message} "))
        .style(Style::default().fg(Color::Yellow))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    frame.render_widget(toast, popup);
}

pub fn render_auth_prompt(frame: &mut Frame) {
    let popup = centered_popup(frame, 52, 4);
    frame.render_widget(Clear, popup);

    let prompt = Paragraph::new("This needs an account.\nRestart and log in to continue.")
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Login required ")
                .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                .border_style(Style::default().fg(Color::Red))
                .style(Style::default().bg(Color::Black)),
        );
    frame.render_widget(prompt, popup);
}

pub fn render_playlist_picker(frame: &mut Frame, session: &SessionState) {
    let max_name = session
        .playlists
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(20);
    let width = (max_name as u16 + 8).clamp(30, 60);
    let height = (session.playlists.len() as u16 + 2).clamp(5, 16);
    let popup = centered_popup(frame, width, height);

    frame.render_widget(Clear, popup);

    let items: Vec<ListItem> = session
        .playlists
        .iter()
        .enumerate()
        .map(|(i, playlist)| {
            let style = if i == session.ui.picker_selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!(" {}", playlist.name)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Add to playlist (↑↓ Enter Esc) ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::Cyan))
            .style(Style::default().bg(Color::Black)),
    );

    let mut state = ListState::default();
    state.select(Some(session.ui.picker_selected));
    frame.render_stateful_widget(list, popup, &mut state);
}

pub fn render_name_prompt(frame: &mut Frame, session: &SessionState) {
    let popup = centered_popup(frame, 44, 3);
    frame.render_widget(Clear, popup);

    let prompt = Paragraph::new(format!(" {}_", session.ui.prompt_input))
        .style(Style::default().fg(Color::Green))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" New playlist name (Enter / Esc) ")
                .border_style(Style::default().fg(Color::Green))
                .style(Style::default().bg(Color::Black)),
        );
    frame.render_widget(prompt, popup);
}
