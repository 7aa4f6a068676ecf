mod confirm;
pub mod layout;
mod menu;
mod sessions;
mod study;
mod summary;

pub use confirm::{draw_quit_confirmation, draw_reset_confirmation};
pub use layout::{calculate_study_chunks, calculate_summary_chunks};
pub use menu::draw_menu;
pub use sessions::format_session_date;
pub use study::draw_study;
pub use summary::draw_summary;

#[cfg(test)]
pub(crate) fn buffer_text(terminal: &ratatui::Terminal<ratatui::backend::TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    buffer
        .content
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
