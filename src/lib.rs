pub mod app;
pub mod config;
pub mod csv;
pub mod db;
pub mod error;
pub mod logger;
pub mod models;
pub mod scheduler;
pub mod study;
pub mod ui;
pub mod utils;

// Re-exports for convenience
pub use app::App;
pub use config::Config;
pub use crate::csv::{get_csv_files, load_deck};
pub use error::{Error, Result};
pub use models::{AppState, CardId, Deck, Flashcard};
pub use scheduler::{
    box_distribution, record_answer, select_due_cards, BoxDistribution, BoxLevel,
    CardReviewState, ReviewOutcome, INTERVALS_DAYS, MAX_BOX_LEVEL,
};
pub use study::{handle_study_input, StudyOptions, StudySession};
