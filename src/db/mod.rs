use rusqlite::{Connection, Result};
use std::path::Path;

pub mod progress;
pub mod session;

pub fn init_db(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent()
        && let Err(e) = std::fs::create_dir_all(parent)
    {
        log::warn!("Could not create {}: {}", parent.display(), e);
    }

    let conn = Connection::open(db_path)?;
    run_migrations(&conn)?;
    log::info!("Opened progress database at {}", db_path.display());

    Ok(conn)
}

pub(crate) fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS card_progress (
            deck_name TEXT NOT NULL,
            card_key TEXT NOT NULL,
            box_level INTEGER NOT NULL,
            next_review_due_at TEXT,
            updated_at INTEGER NOT NULL,
            PRIMARY KEY (deck_name, card_key)
        );

        CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            deck_name TEXT NOT NULL,
            card_key TEXT NOT NULL,
            answered_at INTEGER NOT NULL,
            was_correct INTEGER NOT NULL,
            box_before INTEGER,
            box_after INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_reviews_deck_time ON reviews(deck_name, answered_at);

        CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            deck_name TEXT NOT NULL,
            started_at INTEGER NOT NULL,
            completed_at INTEGER,
            cards_total INTEGER NOT NULL,
            cards_answered INTEGER NOT NULL DEFAULT 0,
            cards_correct INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_deck ON sessions(deck_name);
        CREATE INDEX IF NOT EXISTS idx_sessions_started ON sessions(started_at);",
    )
}

#[cfg(test)]
pub(crate) fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_db_creates_directory_and_tables() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("nested").join("progress.db");
        let conn = init_db(&db_path).unwrap();
        assert!(db_path.exists());

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"card_progress".to_string()));
        assert!(tables.contains(&"reviews".to_string()));
        assert!(tables.contains(&"sessions".to_string()));
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("progress.db");
        drop(init_db(&db_path).unwrap());
        let conn = init_db(&db_path).unwrap();
        run_migrations(&conn).unwrap();
    }
}
