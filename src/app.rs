//! Screen state and key handling for the terminal front end.

use crate::config::Config;
use crate::csv::{get_csv_files, load_deck};
use crate::db::progress::delete_deck_progress;
use crate::db::session::{SessionSummary, get_recent_sessions};
use crate::error::Result;
use crate::models::{AppState, Deck};
use crate::study::{
    Dashboard, DeckOverview, StudyOptions, StudySession, deck_dashboard, deck_overview,
    handle_study_input,
};
use crate::ui::{
    draw_menu, draw_quit_confirmation, draw_reset_confirmation, draw_study, draw_summary,
};
use chrono::{DateTime, Local, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use rusqlite::Connection;
use std::path::PathBuf;

const RECENT_SESSIONS: usize = 5;

#[derive(Debug, Clone)]
struct MenuEntry {
    path: PathBuf,
    overview: DeckOverview,
}

pub struct App {
    pub state: AppState,
    config: Config,
    conn: Connection,
    entries: Vec<MenuEntry>,
    selected: usize,
    sessions: Vec<SessionSummary>,
    study: Option<StudySession>,
    dashboard: Option<Dashboard>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, conn: Connection, now: DateTime<Utc>) -> Result<Self> {
        let mut app = Self {
            state: AppState::Menu,
            config,
            conn,
            entries: Vec::new(),
            selected: 0,
            sessions: Vec::new(),
            study: None,
            dashboard: None,
            should_quit: false,
        };
        app.refresh_menu(now)?;
        Ok(app)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn decks(&self) -> Vec<&DeckOverview> {
        self.entries.iter().map(|entry| &entry.overview).collect()
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    pub fn study(&self) -> Option<&StudySession> {
        self.study.as_ref()
    }

    fn refresh_menu(&mut self, now: DateTime<Utc>) -> Result<()> {
        let mut entries = Vec::new();
        for path in get_csv_files(&self.config.decks_dir) {
            match load_deck(&path) {
                Ok(deck) => entries.push(MenuEntry {
                    overview: deck_overview(&self.conn, &deck, now)?,
                    path,
                }),
                Err(e) => log::error!("Skipping deck {}: {}", path.display(), e),
            }
        }

        self.entries = entries;
        self.selected = self.selected.min(self.entries.len().saturating_sub(1));
        self.sessions = get_recent_sessions(&self.conn, RECENT_SESSIONS)?;
        Ok(())
    }

    /// Reloads the selected deck from disk. A deck that no longer loads is
    /// dropped from the menu and the app stays on the menu.
    fn selected_deck(&mut self, now: DateTime<Utc>) -> Result<Option<Deck>> {
        let Some(entry) = self.entries.get(self.selected) else {
            return Ok(None);
        };
        match load_deck(&entry.path) {
            Ok(deck) => Ok(Some(deck)),
            Err(e) => {
                log::error!("Cannot open deck {}: {}", entry.path.display(), e);
                self.state = AppState::Menu;
                self.refresh_menu(now)?;
                Ok(None)
            }
        }
    }

    fn back_to_menu(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.study = None;
        self.dashboard = None;
        self.state = AppState::Menu;
        self.refresh_menu(now)
    }

    fn finish_study(&mut self, now: DateTime<Utc>) -> Result<()> {
        if let Some(session) = self.study.as_mut() {
            session.finish(&self.conn, now)?;
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: DateTime<Utc>) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.finish_study(now)?;
            self.should_quit = true;
            return Ok(());
        }

        match self.state {
            AppState::Menu => self.handle_menu_key(key, now),
            AppState::ResetConfirm => {
                match key.code {
                    KeyCode::Char('y') => {
                        if let Some(entry) = self.entries.get(self.selected) {
                            delete_deck_progress(&self.conn, &entry.overview.name)?;
                        }
                        self.back_to_menu(now)?;
                    }
                    KeyCode::Char('n') | KeyCode::Esc => self.state = AppState::Menu,
                    _ => {}
                }
                Ok(())
            }
            AppState::Study => {
                let Some(session) = self.study.as_mut() else {
                    return self.back_to_menu(now);
                };
                handle_study_input(session, &self.conn, key, &mut self.state, now)?;
                if self.state == AppState::Summary {
                    self.dashboard = Some(session.dashboard(&self.conn, now)?);
                }
                Ok(())
            }
            AppState::StudyQuitConfirm => {
                match key.code {
                    KeyCode::Char('y') => {
                        self.finish_study(now)?;
                        self.back_to_menu(now)?;
                    }
                    KeyCode::Char('n') | KeyCode::Esc => self.state = AppState::Study,
                    _ => {}
                }
                Ok(())
            }
            AppState::Summary => {
                match key.code {
                    KeyCode::Char('m') | KeyCode::Esc => self.back_to_menu(now)?,
                    KeyCode::Char('q') => self.should_quit = true,
                    _ => {}
                }
                Ok(())
            }
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent, now: DateTime<Utc>) -> Result<()> {
        match key.code {
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected < self.entries.len().saturating_sub(1) {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => {
                let Some(deck) = self.selected_deck(now)? else {
                    return Ok(());
                };
                let options = StudyOptions::from(&self.config);
                let session = StudySession::start(&self.conn, deck, now, options)?;
                if session.is_finished() {
                    self.dashboard = Some(session.dashboard(&self.conn, now)?);
                    self.state = AppState::Summary;
                } else {
                    self.study = Some(session);
                    self.state = AppState::Study;
                }
            }
            KeyCode::Char('s') => {
                if let Some(deck) = self.selected_deck(now)? {
                    self.dashboard = Some(deck_dashboard(&self.conn, &deck, now)?);
                    self.state = AppState::Summary;
                }
            }
            KeyCode::Char('r') => {
                if !self.entries.is_empty() {
                    self.state = AppState::ResetConfirm;
                }
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
        Ok(())
    }

    pub fn draw(&self, f: &mut Frame, now: DateTime<Utc>) {
        match self.state {
            AppState::Menu => {
                let decks: Vec<DeckOverview> =
                    self.entries.iter().map(|e| e.overview.clone()).collect();
                draw_menu(f, &decks, self.selected, &self.sessions, now.with_timezone(&Local));
            }
            AppState::ResetConfirm => {
                if let Some(entry) = self.entries.get(self.selected) {
                    draw_reset_confirmation(f, &entry.overview.name);
                }
            }
            AppState::Study => {
                if let Some(session) = &self.study {
                    draw_study(f, session, now);
                }
            }
            AppState::StudyQuitConfirm => {
                let answered = self.study.as_ref().map_or(0, |s| s.answered);
                draw_quit_confirmation(f, answered);
            }
            AppState::Summary => {
                if let Some(dashboard) = &self.dashboard {
                    draw_summary(f, dashboard, now);
                }
            }
        }
    }
}
