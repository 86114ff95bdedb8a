//! Main content area rendering (track lists, library, queue pane)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Padding},
    Frame,
};

use crate::model::{SessionState, View};
use crate::player::{AudioSink, Player};

use super::utils::{calculate_num_width, format_duration, truncate_string};

pub fn render_main(
    frame: &mut Frame,
    area: Rect,
    session: &SessionState,
    playing_id: Option<&str>,
) {
    match session.view {
        View::Library => render_library(frame, area, session),
        _ => render_tracks(frame, area, session, playing_id),
    }
}

fn view_title(session: &SessionState) -> String {
    let base = match &session.ui.view_title {
        Some(title) => title.clone(),
        None if session.view == View::Search => {
            format!("Results for \"{}\"", session.search.query)
        }
        None => "Popular Right Now".to_string(),
    };
    if session.ui.loading {
        format!(" {base} (loading...) ")
    } else {
        format!(" {base} ")
    }
}

fn render_tracks(
    frame: &mut Frame,
    area: Rect,
    session: &SessionState,
    playing_id: Option<&str>,
) {
    let content_width = area.width.saturating_sub(4) as usize;
    let num_width = calculate_num_width(session.context.len());
    // " {num}  {heart}  {title}  {artist}  {duration}"
    let fixed = 1 + num_width + 2 + 1 + 2 + 2 + 2 + 6;
    let remaining = content_width.saturating_sub(fixed);
    let title_width = (remaining * 55) / 100;
    let artist_width = remaining.saturating_sub(title_width);

    let main_focused = !session.ui.queue_pane_focused;
    let items: Vec<ListItem> = session
        .context
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let heart = if track.liked || session.liked.is_liked(&track.id) {
                "♥"
            } else {
                " "
            };
            let duration = track
                .duration_secs
                .map(format_duration)
                .unwrap_or_else(|| "-:--".to_string());
            let text = format!(
                " {:>num_width$}  {heart}  {}  {}  {:>6}",
                i + 1,
                truncate_string(&track.title, title_width),
                truncate_string(&track.artist, artist_width),
                duration,
            );

            let playing = playing_id == Some(track.id.as_str());
            let style = if i == session.ui.selected && main_focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else if playing {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if track.cached {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let empty = items.is_empty();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(view_title(session))
            .padding(Padding::horizontal(1)),
    );

    let mut state = ListState::default();
    if !empty {
        state.select(Some(session.ui.selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_library(frame: &mut Frame, area: Rect, session: &SessionState) {
    let items: Vec<ListItem> = session
        .playlists
        .iter()
        .enumerate()
        .map(|(i, playlist)| {
            let style = if i == session.ui.selected && !session.ui.queue_pane_focused {
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

    let empty = items.is_empty();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(view_title(session))
            .padding(Padding::horizontal(1)),
    );

    let mut state = ListState::default();
    if !empty {
        state.select(Some(session.ui.selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

pub fn render_queue<S: AudioSink>(
    frame: &mut Frame,
    area: Rect,
    session: &SessionState,
    player: &Player<S>,
) {
    let items: Vec<ListItem> = player
        .queue
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if i == session.ui.queue_selected && session.ui.queue_pane_focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!(" {}. {} - {}", i + 1, entry.title, entry.artist)).style(style)
        })
        .collect();

    let border_style = if session.ui.queue_pane_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Up Next ")
            .padding(Padding::horizontal(1))
            .border_style(border_style),
    );

    let mut state = ListState::default();
    if !player.queue.is_empty() {
        state.select(Some(session.ui.queue_selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
