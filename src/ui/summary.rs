use crate::study::Dashboard;
use crate::ui::layout::{calculate_summary_chunks, help_line};
use crate::utils::format_due;
use chrono::{DateTime, Utc};
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap},
    Frame,
};

fn percentage(correct: usize, answered: usize) -> String {
    if answered == 0 {
        "-".to_string()
    } else {
        format!("{:.0}%", correct as f64 * 100.0 / answered as f64)
    }
}

fn stats_text(dashboard: &Dashboard, now: DateTime<Utc>) -> Text<'static> {
    let mut text = Text::default();

    if let Some(session) = dashboard.session {
        text.push_line(Line::styled(
            "This session",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        text.push_line(Line::from(format!("  Answered: {}", session.answered)));
        text.push_line(Line::from(format!(
            "  Correct:  {} ({})",
            session.correct,
            percentage(session.correct, session.answered)
        )));
        text.push_line(Line::from(""));
    }

    text.push_line(Line::styled(
        "Last 24 hours",
        Style::default().add_modifier(Modifier::BOLD),
    ));
    text.push_line(Line::from(format!("  Answered: {}", dashboard.last_24h.answered)));
    text.push_line(Line::from(format!(
        "  Accuracy: {}",
        percentage(dashboard.last_24h.correct, dashboard.last_24h.answered)
    )));
    text.push_line(Line::from(""));

    text.push_line(Line::styled("Deck", Style::default().add_modifier(Modifier::BOLD)));
    text.push_line(Line::from(format!("  Cards:    {}", dashboard.total)));
    text.push_line(Line::from(format!("  Due now:  {}", dashboard.due_now)));
    if dashboard.due_now == 0
        && let Some(next) = dashboard.next_due_at
    {
        text.push_line(Line::from(format!("  Next:     {}", format_due(Some(next), now))));
    }

    text
}

pub fn draw_summary(f: &mut Frame, dashboard: &Dashboard, now: DateTime<Utc>) {
    let layout = calculate_summary_chunks(f.area());

    let title = Paragraph::new(format!("Progress - {}", dashboard.deck_name))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    let stats = Paragraph::new(stats_text(dashboard, now))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Summary"));
    f.render_widget(stats, layout.stats_area);

    let bars: Vec<Bar> = dashboard
        .distribution
        .iter()
        .map(|(level, count)| {
            Bar::default()
                .value(count as u64)
                .label(Line::from(format!("Box {}", level)))
                .text_value(count.to_string())
        })
        .collect();
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title("Cards per box"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(6)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Yellow))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(chart, layout.chart_area);

    let help = Paragraph::new(help_line(&[("m", "Main Menu"), ("q", "Quit")]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.footer_area);
}
