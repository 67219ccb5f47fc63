use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("card question cannot be empty")]
    EmptyQuestion,

    #[error("card answer cannot be empty")]
    EmptyAnswer,
}

//
// ─── CARD ──────────────────────────────────────────────────────────────────────
//

/// A single question/answer pair.
///
/// Cards are immutable once loaded and are identified by their position in
/// the owning [`Deck`](crate::model::Deck). Question and answer text is
/// stored exactly as provided; only whitespace-only values are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    question: String,
    answer: String,
}

impl Card {
    /// Creates a new card.
    ///
    /// # Errors
    ///
    /// Returns `CardError` if the question or answer is empty or
    /// whitespace-only.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Result<Self, CardError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(CardError::EmptyQuestion);
        }

        let answer = answer.into();
        if answer.trim().is_empty() {
            return Err(CardError::EmptyAnswer);
        }

        Ok(Self { question, answer })
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
