use crate::config::Config;
use crate::db::progress::{ReviewRecord, ReviewStats, load_deck_progress, review_stats, save_review};
use crate::db::session::{complete_session, create_session, record_session_answer};
use crate::error::{Error, Result};
use crate::models::{AppState, CardId, Deck, Flashcard};
use crate::scheduler::{
    BoxDistribution, CardReviewState, ReviewOutcome, box_distribution, record_answer,
    select_due_cards,
};
use chrono::{DateTime, Duration, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use rand::seq::SliceRandom;
use rusqlite::Connection;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudyOptions {
    pub shuffle: bool,
    pub limit: Option<usize>,
}

impl Default for StudyOptions {
    fn default() -> Self {
        Self {
            shuffle: true,
            limit: None,
        }
    }
}

impl From<&Config> for StudyOptions {
    fn from(config: &Config) -> Self {
        Self {
            shuffle: config.shuffle,
            limit: config.session_limit,
        }
    }
}

/// Deck listing entry for the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckOverview {
    pub name: String,
    pub total: usize,
    pub due: usize,
}

pub fn deck_overview(conn: &Connection, deck: &Deck, now: DateTime<Utc>) -> Result<DeckOverview> {
    let progress = load_deck_progress(conn, &deck.name)?;
    let due = due_cards(deck, &progress, now);
    Ok(DeckOverview {
        name: deck.name.clone(),
        total: deck.cards.len(),
        due: due.len(),
    })
}

/// Due cards of `deck` in deck order.
fn due_cards(deck: &Deck, progress: &HashMap<CardId, CardReviewState>, now: DateTime<Utc>) -> Vec<CardId> {
    let due = select_due_cards(
        deck.cards
            .iter()
            .map(|card| (&card.id, progress.get(&card.id).copied())),
        now,
    );
    deck.cards
        .iter()
        .filter(|card| due.contains(&card.id))
        .map(|card| card.id.clone())
        .collect()
}

/// Cards never answered count as box 0.
pub fn deck_distribution(deck: &Deck, progress: &HashMap<CardId, CardReviewState>) -> BoxDistribution {
    let states: Vec<CardReviewState> = deck
        .cards
        .iter()
        .map(|card| progress.get(&card.id).copied().unwrap_or_default())
        .collect();
    box_distribution(&states)
}

/// Progress figures shown on the summary screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub deck_name: String,
    pub total: usize,
    pub due_now: usize,
    pub next_due_at: Option<DateTime<Utc>>,
    pub distribution: BoxDistribution,
    pub last_24h: ReviewStats,
    pub session: Option<ReviewStats>,
}

fn build_dashboard(
    conn: &Connection,
    deck: &Deck,
    progress: &HashMap<CardId, CardReviewState>,
    now: DateTime<Utc>,
) -> Result<Dashboard> {
    let next_due_at = deck
        .cards
        .iter()
        .filter_map(|card| progress.get(&card.id).and_then(|s| s.next_review_due_at))
        .filter(|due| *due > now)
        .min();

    Ok(Dashboard {
        deck_name: deck.name.clone(),
        total: deck.cards.len(),
        due_now: due_cards(deck, progress, now).len(),
        next_due_at,
        distribution: deck_distribution(deck, progress),
        last_24h: review_stats(conn, &deck.name, now - Duration::hours(24))?,
        session: None,
    })
}

pub fn deck_dashboard(conn: &Connection, deck: &Deck, now: DateTime<Utc>) -> Result<Dashboard> {
    let progress = load_deck_progress(conn, &deck.name)?;
    build_dashboard(conn, deck, &progress, now)
}

/// One pass over the due cards of a deck. Cards answered incorrectly are due
/// again right away and go to the back of the queue.
#[derive(Debug)]
pub struct StudySession {
    pub deck: Deck,
    pub session_id: Option<u64>,
    pub queue: Vec<CardId>,
    pub current_index: usize,
    pub showing_answer: bool,
    pub progress: HashMap<CardId, CardReviewState>,
    pub cards_due: usize,
    pub answered: usize,
    pub correct: usize,
    pub last_outcome: Option<ReviewOutcome>,
    completed: bool,
}

impl StudySession {
    pub fn start(conn: &Connection, deck: Deck, now: DateTime<Utc>, options: StudyOptions) -> Result<Self> {
        let progress = load_deck_progress(conn, &deck.name)?;
        let mut queue = due_cards(&deck, &progress, now);

        if options.shuffle {
            queue.shuffle(&mut rand::thread_rng());
        }
        if let Some(limit) = options.limit {
            queue.truncate(limit);
        }

        let session_id = if queue.is_empty() {
            None
        } else {
            Some(create_session(conn, &deck.name, queue.len(), now)?)
        };

        log::info!(
            "Study session for '{}': {} of {} cards due",
            deck.name,
            queue.len(),
            deck.cards.len()
        );

        Ok(Self {
            cards_due: queue.len(),
            deck,
            session_id,
            queue,
            current_index: 0,
            showing_answer: false,
            progress,
            answered: 0,
            correct: 0,
            last_outcome: None,
            completed: false,
        })
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        self.queue
            .get(self.current_index)
            .and_then(|id| self.deck.card(id))
    }

    pub fn current_state(&self) -> Option<CardReviewState> {
        self.queue
            .get(self.current_index)
            .and_then(|id| self.progress.get(id).copied())
    }

    pub fn remaining(&self) -> usize {
        self.queue.len().saturating_sub(self.current_index)
    }

    pub fn is_finished(&self) -> bool {
        self.current_index >= self.queue.len()
    }

    pub fn reveal(&mut self) {
        if !self.is_finished() {
            self.showing_answer = true;
        }
    }

    /// Applies the user's judgment to the current card, persists the new
    /// state and moves on. Does nothing until the answer is revealed.
    pub fn grade(&mut self, conn: &Connection, is_correct: bool, now: DateTime<Utc>) -> Result<Option<ReviewOutcome>> {
        if !self.showing_answer {
            return Ok(None);
        }
        let Some(card) = self.queue.get(self.current_index).cloned() else {
            return Ok(None);
        };
        if self.deck.card(&card).is_none() {
            return Err(Error::CardNotFound(card.to_string()));
        }

        let before = self.progress.get(&card).map(|state| state.box_level);
        let outcome = record_answer(before, is_correct, now);

        save_review(
            conn,
            &ReviewRecord {
                deck_name: &self.deck.name,
                card: &card,
                box_before: before,
                was_correct: is_correct,
                outcome,
                answered_at: now,
            },
        )?;
        if let Some(session_id) = self.session_id {
            record_session_answer(conn, session_id, is_correct, now)?;
        }

        self.progress.insert(card.clone(), outcome.into());
        self.answered += 1;
        if is_correct {
            self.correct += 1;
        } else {
            self.queue.push(card);
        }

        self.current_index += 1;
        self.showing_answer = false;
        self.last_outcome = Some(outcome);
        Ok(Some(outcome))
    }

    pub fn distribution(&self) -> BoxDistribution {
        deck_distribution(&self.deck, &self.progress)
    }

    pub fn dashboard(&self, conn: &Connection, now: DateTime<Utc>) -> Result<Dashboard> {
        let mut dashboard = build_dashboard(conn, &self.deck, &self.progress, now)?;
        dashboard.session = Some(ReviewStats {
            answered: self.answered,
            correct: self.correct,
        });
        Ok(dashboard)
    }

    pub fn finish(&mut self, conn: &Connection, now: DateTime<Utc>) -> Result<()> {
        if self.completed {
            return Ok(());
        }
        if let Some(session_id) = self.session_id {
            complete_session(conn, session_id, now)?;
        }
        self.completed = true;
        log::info!(
            "Finished session for '{}': {}/{} correct",
            self.deck.name,
            self.correct,
            self.answered
        );
        Ok(())
    }
}

pub fn handle_study_input(
    session: &mut StudySession,
    conn: &Connection,
    key: KeyEvent,
    app_state: &mut AppState,
    now: DateTime<Utc>,
) -> Result<()> {
    if key.code == KeyCode::Esc {
        *app_state = AppState::StudyQuitConfirm;
        return Ok(());
    }

    if !session.showing_answer {
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            session.reveal();
        }
        return Ok(());
    }

    let is_correct = match key.code {
        KeyCode::Char('y') | KeyCode::Right => true,
        KeyCode::Char('n') | KeyCode::Left => false,
        _ => return Ok(()),
    };
    session.grade(conn, is_correct, now)?;

    if session.is_finished() {
        session.finish(conn, now)?;
        *app_state = AppState::Summary;
    }
    Ok(())
}
