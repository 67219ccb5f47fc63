/// Placeholder shown when a question was resolved without any selection.
pub const NO_ANSWER: &str = "No answer";

/// Review record for a single resolved question.
///
/// `user_answer` is `None` when the question was revealed without a
/// selection; a `Some` value is the last answer the user had selected at the
/// moment of resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub question: String,
    pub correct_answer: String,
    pub user_answer: Option<String>,
}

impl LogEntry {
    #[must_use]
    pub fn new(
        question: impl Into<String>,
        correct_answer: impl Into<String>,
        user_answer: Option<String>,
    ) -> Self {
        Self {
            question: question.into(),
            correct_answer: correct_answer.into(),
            user_answer,
        }
    }

    /// The user's answer, or [`NO_ANSWER`] when none was selected.
    #[must_use]
    pub fn user_answer_text(&self) -> &str {
        self.user_answer.as_deref().unwrap_or(NO_ANSWER)
    }
}
