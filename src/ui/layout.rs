use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

pub struct StudyLayout {
    pub header_area: Rect,
    pub question_area: Rect,
    pub answer_area: Rect,
    pub help_area: Rect,
}

pub struct SummaryLayout {
    pub header_area: Rect,
    pub stats_area: Rect,
    pub chart_area: Rect,
    pub footer_area: Rect,
}

pub fn calculate_study_chunks(area: Rect) -> StudyLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(40),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    StudyLayout {
        header_area: chunks[0],
        question_area: chunks[1],
        answer_area: chunks[2],
        help_area: chunks[3],
    }
}

pub fn calculate_summary_chunks(area: Rect) -> SummaryLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(area);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    SummaryLayout {
        header_area: chunks[0],
        stats_area: content[0],
        chart_area: content[1],
        footer_area: chunks[2],
    }
}

/// Key hints like `y Correct  n Incorrect`.
pub fn help_line(keys: &[(&'static str, &'static str)]) -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);

    let spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(*key, key_style),
                Span::from(format!(" {}  ", label)),
            ]
        })
        .collect();
    Line::from(spans)
}
