use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::Card;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("deck must contain at least one card")]
    Empty,

    #[error("option count must be at least 2")]
    InvalidOptionCount,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Default number of choices shown per question, the correct answer included.
pub const DEFAULT_OPTION_COUNT: u32 = 5;

/// Quiz presentation settings carried by a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    option_count: u32,
}

impl QuizSettings {
    /// Creates custom quiz settings.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::InvalidOptionCount` if `option_count` is below 2;
    /// a single-option question would have no distractors to choose against.
    pub fn new(option_count: u32) -> Result<Self, DeckError> {
        if option_count < 2 {
            return Err(DeckError::InvalidOptionCount);
        }
        Ok(Self { option_count })
    }

    #[must_use]
    pub fn option_count(&self) -> u32 {
        self.option_count
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            option_count: DEFAULT_OPTION_COUNT,
        }
    }
}

//
// ─── DECK ──────────────────────────────────────────────────────────────────────
//

/// Immutable ordered collection of cards for one loaded quiz.
///
/// A deck always holds at least one card; cards are addressed by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
    settings: QuizSettings,
}

impl Deck {
    /// Creates a deck from an ordered card list.
    ///
    /// # Errors
    ///
    /// Returns `DeckError::Empty` if no cards are provided.
    pub fn new(cards: Vec<Card>, settings: QuizSettings) -> Result<Self, DeckError> {
        if cards.is_empty() {
            return Err(DeckError::Empty);
        }
        Ok(Self { cards, settings })
    }

    #[must_use]
    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Always false; a deck cannot be constructed without cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// All answer values across the deck, deduplicated by exact text.
    ///
    /// Case and whitespace variants remain distinct entries here; collapsing
    /// them is the option generator's concern.
    #[must_use]
    pub fn all_answers(&self) -> Vec<String> {
        let unique: BTreeSet<&str> = self.cards.iter().map(Card::answer).collect();
        unique.into_iter().map(str::to_owned).collect()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn build_cards(pairs: &[(&str, &str)]) -> Vec<Card> {
        pairs
            .iter()
            .map(|(q, a)| Card::new(*q, *a).unwrap())
            .collect()
    }

    #[test]
    fn deck_rejects_empty_card_list() {
        let err = Deck::new(Vec::new(), QuizSettings::default()).unwrap_err();
        assert_eq!(err, DeckError::Empty);
    }

    #[test]
    fn deck_addresses_cards_by_index() {
        let deck = Deck::new(
            build_cards(&[("2+2", "4"), ("3+3", "6")]),
            QuizSettings::default(),
        )
        .unwrap();

        assert_eq!(deck.len(), 2);
        assert_eq!(deck.card(0).unwrap().question(), "2+2");
        assert_eq!(deck.card(1).unwrap().answer(), "6");
        assert!(deck.card(2).is_none());
    }

    #[test]
    fn all_answers_deduplicates_exact_text() {
        let deck = Deck::new(
            build_cards(&[("q1", "4"), ("q2", "6"), ("q3", "4"), ("q4", "Four")]),
            QuizSettings::default(),
        )
        .unwrap();

        let answers = deck.all_answers();
        assert_eq!(answers.len(), 3);
        assert!(answers.contains(&"4".to_string()));
        assert!(answers.contains(&"6".to_string()));
        // Exact-text dedup only; case variants survive.
        assert!(answers.contains(&"Four".to_string()));
    }

    #[test]
    fn settings_reject_too_few_options() {
        let err = QuizSettings::new(1).unwrap_err();
        assert_eq!(err, DeckError::InvalidOptionCount);
        assert_eq!(QuizSettings::new(2).unwrap().option_count(), 2);
    }

    #[test]
    fn settings_default_to_five_options() {
        assert_eq!(QuizSettings::default().option_count(), 5);
    }
}
