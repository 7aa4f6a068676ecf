use std::fmt;

/// Stable key of a card within its deck: the trimmed question text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(String);

impl CardId {
    pub fn new(question: &str) -> Self {
        CardId(question.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flashcard {
    pub id: CardId,
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        let question = question.into();
        Self {
            id: CardId::new(&question),
            question,
            answer: answer.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub name: String,
    pub cards: Vec<Flashcard>,
}

impl Deck {
    pub fn card(&self, id: &CardId) -> Option<&Flashcard> {
        self.cards.iter().find(|card| &card.id == id)
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum AppState {
    Menu,
    ResetConfirm,
    Study,
    StudyQuitConfirm,
    Summary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id_trims_question() {
        let card = Flashcard::new("  What is 2+2?\t", "Four");
        assert_eq!(card.id.as_str(), "What is 2+2?");
        assert_eq!(card.question, "  What is 2+2?\t");
    }

    #[test]
    fn test_deck_card_lookup() {
        let deck = Deck {
            name: "math".to_string(),
            cards: vec![Flashcard::new("Q1", "A1"), Flashcard::new("Q2", "A2")],
        };
        assert_eq!(deck.card(&CardId::new("Q2")).unwrap().answer, "A2");
        assert!(deck.card(&CardId::new("Q3")).is_none());
    }
}
