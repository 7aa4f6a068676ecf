//! Leitner box scheduling.
//!
//! Every card sits in one of six boxes. A correct answer moves it up one box
//! (capped at [`MAX_BOX_LEVEL`]), an incorrect answer sends it back to box 0.
//! The box a card lands in decides how many days pass before it is due again:
//!
//! | box | 0 | 1 | 2 | 3 | 4  | 5  |
//! |-----|---|---|---|---|----|----|
//! | days| 0 | 1 | 3 | 7 | 14 | 30 |
//!
//! All functions here are pure. The caller passes `now` and persists the
//! resulting state itself.

use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// Review interval in days, indexed by box level.
pub const INTERVALS_DAYS: [u64; 6] = [0, 1, 3, 7, 14, 30];

pub const MAX_BOX_LEVEL: u8 = 5;

/// A mastery tier in `0..=MAX_BOX_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BoxLevel(u8);

impl BoxLevel {
    pub const MIN: BoxLevel = BoxLevel(0);
    pub const MAX: BoxLevel = BoxLevel(MAX_BOX_LEVEL);

    pub fn new(level: u8) -> Option<Self> {
        (level <= MAX_BOX_LEVEL).then_some(BoxLevel(level))
    }

    /// Normalizes a level read from outside the program. Anything outside
    /// `0..=5` is treated as box 0.
    pub fn from_stored(raw: i64) -> Self {
        u8::try_from(raw)
            .ok()
            .and_then(BoxLevel::new)
            .unwrap_or(BoxLevel::MIN)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn interval_days(self) -> u64 {
        INTERVALS_DAYS[self.0 as usize]
    }

    /// The box a correct answer moves to.
    pub fn promoted(self) -> Self {
        BoxLevel((self.0 + 1).min(MAX_BOX_LEVEL))
    }

    pub fn all() -> impl Iterator<Item = BoxLevel> {
        (0..=MAX_BOX_LEVEL).map(BoxLevel)
    }
}

impl TryFrom<u8> for BoxLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        BoxLevel::new(value).ok_or_else(|| format!("box level {} out of range 0..=5", value))
    }
}

impl From<BoxLevel> for u8 {
    fn from(level: BoxLevel) -> u8 {
        level.0
    }
}

impl fmt::Display for BoxLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review state of one card for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CardReviewState {
    pub box_level: BoxLevel,
    pub next_review_due_at: Option<DateTime<Utc>>,
}

impl CardReviewState {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        match self.next_review_due_at {
            Some(due) => due <= now,
            None => true,
        }
    }
}

/// Result of grading one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub new_box_level: BoxLevel,
    pub next_review_due_at: DateTime<Utc>,
}

impl From<ReviewOutcome> for CardReviewState {
    fn from(outcome: ReviewOutcome) -> Self {
        CardReviewState {
            box_level: outcome.new_box_level,
            next_review_due_at: Some(outcome.next_review_due_at),
        }
    }
}

/// Computes the box and due date after an answer. A card without a level
/// is treated as box 0.
pub fn record_answer(
    current_box_level: Option<BoxLevel>,
    is_correct: bool,
    now: DateTime<Utc>,
) -> ReviewOutcome {
    let current = current_box_level.unwrap_or_default();
    let new_box_level = if is_correct {
        current.promoted()
    } else {
        BoxLevel::MIN
    };

    // Calendar-day addition; overflow only happens near the end of chrono's range.
    let next_review_due_at = now
        .checked_add_days(Days::new(new_box_level.interval_days()))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    ReviewOutcome {
        new_box_level,
        next_review_due_at,
    }
}

/// Returns the ids of all cards that should be shown in the next session:
/// cards never reviewed, and cards whose due date is at or before `now`.
pub fn select_due_cards<K, I>(cards: I, now: DateTime<Utc>) -> HashSet<K>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, Option<CardReviewState>)>,
{
    cards
        .into_iter()
        .filter(|(_, state)| state.is_none_or(|s| s.is_due(now)))
        .map(|(id, _)| id)
        .collect()
}

/// Number of cards in each box. Every level is present, zero if empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BoxDistribution {
    counts: [usize; INTERVALS_DAYS.len()],
}

impl BoxDistribution {
    pub fn count(&self, level: BoxLevel) -> usize {
        self.counts[level.value() as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoxLevel, usize)> + '_ {
        BoxLevel::all().map(|level| (level, self.count(level)))
    }
}

pub fn box_distribution<'a, I>(states: I) -> BoxDistribution
where
    I: IntoIterator<Item = &'a CardReviewState>,
{
    let mut distribution = BoxDistribution::default();
    for state in states {
        distribution.counts[state.box_level.value() as usize] += 1;
    }
    distribution
}
