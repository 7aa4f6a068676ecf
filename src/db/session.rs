use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Result, params};

#[derive(Debug, Clone)]
pub struct SessionData {
    pub id: u64,
    pub created_at: i64,
    pub updated_at: i64,
    pub deck_name: String,
    pub started_at: i64,
    pub completed_at: Option<i64>,
    pub cards_total: usize,
    pub cards_answered: usize,
    pub cards_correct: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub id: u64,
    pub deck_name: String,
    pub started_at: i64,
    pub completed_at: Option<i64>,
    pub cards_total: usize,
    pub cards_answered: usize,
    pub cards_correct: usize,
}

pub fn create_session(
    conn: &Connection,
    deck_name: &str,
    cards_total: usize,
    now: DateTime<Utc>,
) -> Result<u64> {
    let created_at = now.timestamp();

    conn.execute(
        "INSERT INTO sessions (created_at, updated_at, deck_name, started_at, cards_total)
         VALUES (?1, ?1, ?2, ?1, ?3)",
        params![created_at, deck_name, cards_total],
    )?;

    Ok(conn.last_insert_rowid() as u64)
}

pub fn get_session(conn: &Connection, id: u64) -> Result<Option<SessionData>> {
    conn.query_row(
        "SELECT id, created_at, updated_at, deck_name, started_at, completed_at,
                cards_total, cards_answered, cards_correct
         FROM sessions WHERE id = ?",
        [id],
        |row| {
            Ok(SessionData {
                id: row.get(0)?,
                created_at: row.get(1)?,
                updated_at: row.get(2)?,
                deck_name: row.get(3)?,
                started_at: row.get(4)?,
                completed_at: row.get(5)?,
                cards_total: row.get(6)?,
                cards_answered: row.get(7)?,
                cards_correct: row.get(8)?,
            })
        },
    )
    .optional()
}

pub fn record_session_answer(
    conn: &Connection,
    session_id: u64,
    was_correct: bool,
    now: DateTime<Utc>,
) -> Result<()> {
    conn.execute(
        "UPDATE sessions
         SET updated_at = ?, cards_answered = cards_answered + 1,
             cards_correct = cards_correct + ?
         WHERE id = ?",
        params![now.timestamp(), was_correct as i64, session_id],
    )?;
    Ok(())
}

pub fn complete_session(conn: &Connection, session_id: u64, now: DateTime<Utc>) -> Result<()> {
    let completed_at = now.timestamp();
    conn.execute(
        "UPDATE sessions SET updated_at = ?1, completed_at = ?1 WHERE id = ?2",
        params![completed_at, session_id],
    )?;
    Ok(())
}

/// Most recently started sessions first.
pub fn get_recent_sessions(conn: &Connection, limit: usize) -> Result<Vec<SessionSummary>> {
    let mut stmt = conn.prepare(
        "SELECT id, deck_name, started_at, completed_at, cards_total, cards_answered, cards_correct
         FROM sessions ORDER BY started_at DESC, id DESC LIMIT ?",
    )?;

    let sessions = stmt
        .query_map([limit], |row| {
            Ok(SessionSummary {
                id: row.get(0)?,
                deck_name: row.get(1)?,
                started_at: row.get(2)?,
                completed_at: row.get(3)?,
                cards_total: row.get(4)?,
                cards_answered: row.get(5)?,
                cards_correct: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;

    Ok(sessions)
}
