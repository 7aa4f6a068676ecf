use crate::scheduler::BoxLevel;
use crate::study::StudySession;
use crate::ui::layout::{calculate_study_chunks, help_line};
use crate::utils::{format_due, format_interval};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn box_label(level: Option<BoxLevel>) -> String {
    match level {
        Some(level) => format!("Box {}", level),
        None => "New card".to_string(),
    }
}

pub fn draw_study(f: &mut Frame, session: &StudySession, now: DateTime<Utc>) {
    let layout = calculate_study_chunks(f.area());
    let Some(card) = session.current_card() else {
        return;
    };
    let state = session.current_state();

    let progress = format!(
        "{} - card {} ({} left) - {}",
        session.deck.name,
        session.current_index + 1,
        session.remaining(),
        box_label(state.map(|s| s.box_level))
    );
    let header = Paragraph::new(progress)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let question = Paragraph::new(card.question.as_str())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question, layout.question_area);

    let answer_content = if session.showing_answer {
        let current = state.map(|s| s.box_level).unwrap_or_default();
        let promoted = current.promoted();

        let mut text = Text::default();
        text.push_line(Line::from(Span::styled(
            "Answer:",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )));
        text.push_line(Line::from(""));
        text.push_line(Line::from(card.answer.as_str()));
        text.push_line(Line::from(""));
        text.push_line(Line::from(Span::styled(
            format!(
                "Correct: box {} ({})   Incorrect: box 0 ({})",
                promoted,
                format_interval(promoted.interval_days()),
                format_interval(BoxLevel::MIN.interval_days())
            ),
            Style::default().fg(Color::DarkGray),
        )));
        text
    } else {
        let mut text = Text::from(Line::from(Span::styled(
            "[Think of the answer, then reveal it]",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
        if let Some(state) = state {
            text.push_line(Line::from(""));
            text.push_line(Line::from(format!(
                "Scheduled: {}",
                format_due(state.next_review_due_at, now)
            )));
        }
        text
    };

    let title = if session.showing_answer { "Answer" } else { "Recall" };
    let answer = Paragraph::new(answer_content)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(answer, layout.answer_area);

    let keys: &[(&'static str, &'static str)] = if session.showing_answer {
        &[("y/→", "Correct"), ("n/←", "Incorrect"), ("Esc", "Menu")]
    } else {
        &[("Space/Enter", "Reveal"), ("Esc", "Menu")]
    };
    let help = Paragraph::new(help_line(keys))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::models::{Deck, Flashcard};
    use crate::study::StudyOptions;
    use crate::ui::buffer_text;
    use chrono::TimeZone;
    use ratatui::{Terminal, backend::TestBackend};

    fn session() -> (rusqlite::Connection, StudySession) {
        let conn = test_connection();
        let deck = Deck {
            name: "capitals".to_string(),
            cards: vec![Flashcard::new("Capital of France?", "Paris")],
        };
        let options = StudyOptions {
            shuffle: false,
            limit: None,
        };
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let session = StudySession::start(&conn, deck, now, options).unwrap();
        (conn, session)
    }

    #[test]
    fn test_question_hides_answer_until_revealed() {
        let (_conn, mut session) = session();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();

        terminal.draw(|f| draw_study(f, &session, now)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Capital of France?"));
        assert!(text.contains("New card"));
        assert!(!text.contains("Paris"));

        session.reveal();
        terminal.draw(|f| draw_study(f, &session, now)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Paris"));
        assert!(text.contains("Correct: box 1 (1 day)"));
    }

    #[test]
    fn test_box_label() {
        assert_eq!(box_label(None), "New card");
        assert_eq!(box_label(BoxLevel::new(3)), "Box 3");
    }
}
