use crate::ui::layout::help_line;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn draw_confirmation(f: &mut Frame, title: &str, message: &str, keys: &[(&'static str, &'static str)]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new(title.to_string())
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help = Paragraph::new(help_line(keys))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

pub fn draw_quit_confirmation(f: &mut Frame, answered: usize) {
    let message = format!(
        "Return to main menu? {} answer(s) are already saved.",
        answered
    );
    draw_confirmation(
        f,
        "Quit Session",
        &message,
        &[("y", "Yes (Return to Menu)"), ("n", "No (Keep Studying)")],
    );
}

pub fn draw_reset_confirmation(f: &mut Frame, deck_name: &str) {
    let message = format!(
        "Forget all progress for '{}'? Every card goes back to box 0.",
        deck_name
    );
    draw_confirmation(f, "Reset Deck", &message, &[("y", "Reset"), ("n", "Cancel")]);
}
