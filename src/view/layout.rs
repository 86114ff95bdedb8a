//! Layout rendering (search bar, navigation sidebar)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{InputMode, SessionState, View};

pub fn render_search_bar(frame: &mut Frame, area: Rect, session: &SessionState) {
    let searching = session.ui.input_mode == InputMode::Search;

    let text = if session.ui.search_input.is_empty() && !searching {
        "Press / to search..."
    } else {
        &session.ui.search_input
    };

    let border_style = if searching {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let search = Paragraph::new(text)
        .style(if searching {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::White)
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search ")
                .padding(Padding::horizontal(1))
                .border_style(border_style),
        );
    frame.render_widget(search, area);
}

const NAV_ITEMS: [(&str, View); 4] = [
    ("Home", View::Home),
    ("Recently Played", View::Recent),
    ("Liked Songs", View::Liked),
    ("Your Library", View::Library),
];

pub fn render_sidebar(frame: &mut Frame, area: Rect, session: &SessionState) {
    let items: Vec<ListItem> = NAV_ITEMS
        .iter()
        .map(|(name, view)| {
            let active = match view {
                // A live search keeps the Home row highlighted
                View::Home => matches!(session.view, View::Home | View::Search),
                v => *v == session.view || matches!((v, &session.view), (View::Library, View::Playlist(_))),
            };
            let style = if active {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(*name).style(style)
        })
        .collect();

    let nav = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Menu ")
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(nav, area);
}
