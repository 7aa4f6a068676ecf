use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use leitner_flashcards::{db, logger, App, Config};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> leitner_flashcards::Result<()> {
    while !app.should_quit() {
        let now = Utc::now();
        terminal.draw(|f| app.draw(f, now))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key, Utc::now())?;
        }
    }
    Ok(())
}

fn main() -> leitner_flashcards::Result<()> {
    let config = Config::load()?;
    logger::init(&config.log_file, config.level_filter()?)?;
    log::info!("Starting with decks from {}", config.decks_dir.display());

    let conn = db::init_db(&config.db_path)?;
    let mut app = App::new(config, conn, Utc::now())?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::error!("Exiting after error: {}", e);
    }
    result
}
