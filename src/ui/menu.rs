use crate::db::session::SessionSummary;
use crate::study::DeckOverview;
use crate::ui::layout::help_line;
use crate::ui::sessions::format_session_item;
use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

fn format_deck_item(deck: &DeckOverview) -> String {
    if deck.due == 0 {
        format!("{} ({} cards, nothing due)", deck.name, deck.total)
    } else {
        format!("{} ({}/{} due)", deck.name, deck.due, deck.total)
    }
}

fn empty_item(text: &str) -> ListItem<'_> {
    ListItem::new(text).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )
}

pub fn draw_menu(
    f: &mut Frame,
    decks: &[DeckOverview],
    selected_deck_index: usize,
    sessions: &[SessionSummary],
    today: DateTime<Local>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(8),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new(format!("Leitner Flashcards v{}", env!("CARGO_PKG_VERSION")))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let deck_items: Vec<ListItem> = if decks.is_empty() {
        vec![empty_item("No CSV decks found")]
    } else {
        decks
            .iter()
            .enumerate()
            .map(|(i, deck)| {
                let style = if i == selected_deck_index {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else if deck.due == 0 {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                };
                ListItem::new(format_deck_item(deck)).style(style)
            })
            .collect()
    };
    let deck_list = List::new(deck_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Decks")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(deck_list, chunks[1]);

    let session_items: Vec<ListItem> = if sessions.is_empty() {
        vec![empty_item("No past sessions")]
    } else {
        sessions
            .iter()
            .map(|session| ListItem::new(format_session_item(session, today)))
            .collect()
    };
    let session_list = List::new(session_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Recent Sessions")
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(session_list, chunks[2]);

    let help = Paragraph::new(help_line(&[
        ("↑/↓", "Navigate"),
        ("Enter", "Study"),
        ("s", "Stats"),
        ("r", "Reset Progress"),
        ("q", "Quit"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}
