//! Per-card Leitner state and answer history.

use crate::models::CardId;
use crate::scheduler::{BoxLevel, CardReviewState, ReviewOutcome};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Result, params};
use std::collections::HashMap;

/// One graded answer, as written to the store.
#[derive(Debug, Clone)]
pub struct ReviewRecord<'a> {
    pub deck_name: &'a str,
    pub card: &'a CardId,
    pub box_before: Option<BoxLevel>,
    pub was_correct: bool,
    pub outcome: ReviewOutcome,
    pub answered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewStats {
    pub answered: usize,
    pub correct: usize,
}

impl ReviewStats {
    pub fn accuracy(&self) -> Option<f64> {
        (self.answered > 0).then(|| self.correct as f64 / self.answered as f64)
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn state_from_row(deck_name: &str, card_key: &str, raw_level: i64, due: Option<String>) -> CardReviewState {
    let box_level = BoxLevel::from_stored(raw_level);
    if i64::from(box_level.value()) != raw_level {
        log::warn!(
            "{}/{}: stored box level {} out of range, using {}",
            deck_name,
            card_key,
            raw_level,
            box_level
        );
    }

    let next_review_due_at = due.and_then(|raw| match DateTime::parse_from_rfc3339(&raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(e) => {
            log::warn!("{}/{}: bad due date '{}': {}", deck_name, card_key, raw, e);
            None
        }
    });

    CardReviewState {
        box_level,
        next_review_due_at,
    }
}

pub fn load_deck_progress(conn: &Connection, deck_name: &str) -> Result<HashMap<CardId, CardReviewState>> {
    let mut stmt = conn.prepare(
        "SELECT card_key, box_level, next_review_due_at
         FROM card_progress WHERE deck_name = ?",
    )?;

    let rows = stmt.query_map([deck_name], |row| {
        let card_key: String = row.get(0)?;
        let raw_level: i64 = row.get(1)?;
        let due: Option<String> = row.get(2)?;
        Ok((card_key, raw_level, due))
    })?;

    let mut progress = HashMap::new();
    for row in rows {
        let (card_key, raw_level, due) = row?;
        let state = state_from_row(deck_name, &card_key, raw_level, due);
        progress.insert(CardId::new(&card_key), state);
    }

    Ok(progress)
}

pub fn get_card_state(conn: &Connection, deck_name: &str, card: &CardId) -> Result<Option<CardReviewState>> {
    conn.query_row(
        "SELECT box_level, next_review_due_at FROM card_progress
         WHERE deck_name = ? AND card_key = ?",
        params![deck_name, card.as_str()],
        |row| {
            let raw_level: i64 = row.get(0)?;
            let due: Option<String> = row.get(1)?;
            Ok(state_from_row(deck_name, card.as_str(), raw_level, due))
        },
    )
    .optional()
}

/// Replaces the card's state and appends to the history in one transaction.
pub fn save_review(conn: &Connection, record: &ReviewRecord) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let answered_at = record.answered_at.timestamp();

    tx.execute(
        "INSERT INTO card_progress (deck_name, card_key, box_level, next_review_due_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(deck_name, card_key) DO UPDATE SET
             box_level = excluded.box_level,
             next_review_due_at = excluded.next_review_due_at,
             updated_at = excluded.updated_at",
        params![
            record.deck_name,
            record.card.as_str(),
            record.outcome.new_box_level.value(),
            format_timestamp(record.outcome.next_review_due_at),
            answered_at
        ],
    )?;

    tx.execute(
        "INSERT INTO reviews (deck_name, card_key, answered_at, was_correct, box_before, box_after)
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            record.deck_name,
            record.card.as_str(),
            answered_at,
            record.was_correct,
            record.box_before.map(BoxLevel::value),
            record.outcome.new_box_level.value()
        ],
    )?;

    tx.commit()?;

    log::debug!(
        "{}/{}: box {:?} -> {} ({}), due {}",
        record.deck_name,
        record.card,
        record.box_before.map(BoxLevel::value),
        record.outcome.new_box_level,
        if record.was_correct { "correct" } else { "incorrect" },
        format_timestamp(record.outcome.next_review_due_at)
    );
    Ok(())
}

/// Forgets all progress and history of a deck. Returns the number of
/// cards whose state was removed.
pub fn delete_deck_progress(conn: &Connection, deck_name: &str) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let removed = tx.execute("DELETE FROM card_progress WHERE deck_name = ?", [deck_name])?;
    tx.execute("DELETE FROM reviews WHERE deck_name = ?", [deck_name])?;
    tx.commit()?;

    log::info!("Reset progress of deck '{}' ({} cards)", deck_name, removed);
    Ok(removed)
}

pub fn review_stats(conn: &Connection, deck_name: &str, since: DateTime<Utc>) -> Result<ReviewStats> {
    conn.query_row(
        "SELECT COUNT(*), COALESCE(SUM(was_correct), 0)
         FROM reviews WHERE deck_name = ? AND answered_at >= ?",
        params![deck_name, since.timestamp()],
        |row| {
            Ok(ReviewStats {
                answered: row.get(0)?,
                correct: row.get(1)?,
            })
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_connection;
    use crate::scheduler::record_answer;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn answer(conn: &Connection, deck: &str, card: &CardId, correct: bool, at: DateTime<Utc>) -> ReviewOutcome {
        let before = get_card_state(conn, deck, card).unwrap().map(|s| s.box_level);
        let outcome = record_answer(before, correct, at);
        save_review(
            conn,
            &ReviewRecord {
                deck_name: deck,
                card,
                box_before: before,
                was_correct: correct,
                outcome,
                answered_at: at,
            },
        )
        .unwrap();
        outcome
    }

    #[test]
    fn test_save_and_load_progress() {
        let conn = test_connection();
        let card = CardId::new("Q1");

        answer(&conn, "deck", &card, true, now());
        answer(&conn, "deck", &card, true, now());

        let progress = load_deck_progress(&conn, "deck").unwrap();
        let state = progress.get(&card).unwrap();
        assert_eq!(state.box_level.value(), 2);
        assert_eq!(state.next_review_due_at, Some(now() + Duration::days(3)));
    }

    #[test]
    fn test_progress_is_scoped_by_deck() {
        let conn = test_connection();
        let card = CardId::new("Shared question");
        answer(&conn, "a", &card, true, now());

        assert_eq!(load_deck_progress(&conn, "a").unwrap().len(), 1);
        assert!(load_deck_progress(&conn, "b").unwrap().is_empty());
        assert!(get_card_state(&conn, "b", &card).unwrap().is_none());
    }

    #[test]
    fn test_incorrect_answer_overwrites_state() {
        let conn = test_connection();
        let card = CardId::new("Q1");
        for _ in 0..4 {
            answer(&conn, "deck", &card, true, now());
        }
        answer(&conn, "deck", &card, false, now());

        let state = get_card_state(&conn, "deck", &card).unwrap().unwrap();
        assert_eq!(state.box_level, BoxLevel::MIN);
        assert_eq!(state.next_review_due_at, Some(now()));
    }

    #[test]
    fn test_out_of_range_level_is_normalized() {
        let conn = test_connection();
        conn.execute(
            "INSERT INTO card_progress VALUES ('deck', 'Q1', 42, '2024-01-05T00:00:00Z', 0),
                                              ('deck', 'Q2', -3, NULL, 0)",
            [],
        )
        .unwrap();

        let progress = load_deck_progress(&conn, "deck").unwrap();
        assert_eq!(progress[&CardId::new("Q1")].box_level, BoxLevel::MIN);
        assert_eq!(progress[&CardId::new("Q2")].box_level, BoxLevel::MIN);
        assert_eq!(
            progress[&CardId::new("Q1")].next_review_due_at,
            Some(Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_unparsable_due_date_makes_card_due() {
        let conn = test_connection();
        conn.execute(
            "INSERT INTO card_progress VALUES ('deck', 'Q1', 3, 'next tuesday', 0)",
            [],
        )
        .unwrap();

        let state = get_card_state(&conn, "deck", &CardId::new("Q1")).unwrap().unwrap();
        assert_eq!(state.box_level.value(), 3);
        assert!(state.next_review_due_at.is_none());
        assert!(state.is_due(now()));
    }

    #[test]
    fn test_review_stats_and_history() {
        let conn = test_connection();
        let q1 = CardId::new("Q1");
        let q2 = CardId::new("Q2");

        answer(&conn, "deck", &q1, true, now() - Duration::days(2));
        answer(&conn, "deck", &q1, true, now());
        answer(&conn, "deck", &q2, false, now());
        answer(&conn, "other", &q2, true, now());

        let all = review_stats(&conn, "deck", now() - Duration::days(7)).unwrap();
        assert_eq!(all, ReviewStats { answered: 3, correct: 2 });

        let today = review_stats(&conn, "deck", now() - Duration::hours(1)).unwrap();
        assert_eq!(today, ReviewStats { answered: 2, correct: 1 });
        assert_eq!(today.accuracy(), Some(0.5));

        let empty = review_stats(&conn, "missing", now()).unwrap();
        assert_eq!(empty, ReviewStats::default());
        assert_eq!(empty.accuracy(), None);
    }

    #[test]
    fn test_history_records_box_transition() {
        let conn = test_connection();
        let card = CardId::new("Q1");
        answer(&conn, "deck", &card, true, now());
        answer(&conn, "deck", &card, false, now());

        let rows: Vec<(Option<i64>, i64, bool)> = conn
            .prepare("SELECT box_before, box_after, was_correct FROM reviews ORDER BY id")
            .unwrap()
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert_eq!(rows, vec![(None, 1, true), (Some(1), 0, false)]);
    }

    #[test]
    fn test_delete_deck_progress() {
        let conn = test_connection();
        answer(&conn, "deck", &CardId::new("Q1"), true, now());
        answer(&conn, "deck", &CardId::new("Q2"), true, now());
        answer(&conn, "keep", &CardId::new("Q1"), true, now());

        assert_eq!(delete_deck_progress(&conn, "deck").unwrap(), 2);
        assert!(load_deck_progress(&conn, "deck").unwrap().is_empty());
        assert_eq!(review_stats(&conn, "deck", now() - Duration::days(1)).unwrap().answered, 0);
        assert_eq!(load_deck_progress(&conn, "keep").unwrap().len(), 1);
    }
}
