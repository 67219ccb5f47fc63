use chrono::{DateTime, Utc};
use std::sync::Arc;

use quiz_core::model::{HistoryEntry, LogEntry};
use storage::repository::{HistoryRepository, InMemoryHistory};

use super::service::{QuizSession, SessionPhase};

//
// ─── QUESTION VIEW ─────────────────────────────────────────────────────────────
//

/// Snapshot of the question currently on screen.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no localization assumptions
///
/// The enablement flags carry the sub-mode policy: while answering, submit
/// needs a non-blank selection and reveal is always available; once
/// resolved, only advancing remains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based position of this question within the run.
    pub number: usize,
    pub total: usize,
    pub question: String,
    pub options: Vec<String>,
    pub selected: Option<String>,
    /// The correct answer, surfaced only once the question is resolved.
    pub correct_answer: Option<String>,
    pub can_submit: bool,
    pub can_reveal: bool,
    pub can_advance: bool,
}

impl QuestionView {
    /// Builds the snapshot for the current question, if one is on screen.
    ///
    /// Returns `None` outside the `Answering`/`Resolved` phases.
    #[must_use]
    pub fn of(session: &QuizSession) -> Option<Self> {
        match session.phase() {
            SessionPhase::Answering | SessionPhase::Resolved => {}
            SessionPhase::NotStarted | SessionPhase::Finished => return None,
        }
        let card = session.current_card()?;
        let options = session.current_options()?.to_vec();

        let resolved = session.is_resolved();
        let selected = session.selected_answer().map(str::to_owned);
        let has_selection = selected
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());

        let number = if resolved {
            session.used_count()
        } else {
            session.used_count() + 1
        };

        Some(Self {
            number,
            total: session.total(),
            question: card.question().to_owned(),
            options,
            selected,
            correct_answer: resolved.then(|| card.answer().to_owned()),
            can_submit: !resolved && has_selection,
            can_reveal: !resolved,
            can_advance: resolved,
        })
    }
}

//
// ─── SUMMARY VIEW ──────────────────────────────────────────────────────────────
//

/// End-of-run totals and review logs.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub total: usize,
    pub correct: u32,
    pub incorrect: u32,
    pub score_percent: f64,
    pub correct_review: Vec<LogEntry>,
    pub incorrect_review: Vec<LogEntry>,
}

impl SummaryView {
    #[must_use]
    pub fn of(session: &QuizSession) -> Self {
        let total = session.total();
        let correct = session.correct_count();
        let score_percent = if total == 0 {
            0.0
        } else {
            f64::from(correct) * 100.0 / total as f64
        };

        Self {
            total,
            correct,
            incorrect: session.incorrect_count(),
            score_percent,
            correct_review: session.correct_log().to_vec(),
            incorrect_review: session.incorrect_log().to_vec(),
        }
    }
}

//
// ─── HISTORY ───────────────────────────────────────────────────────────────────
//

/// Presentation-agnostic list item for one historical session.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryListItem {
    pub recorded_at: DateTime<Utc>,
    pub user: String,
    pub correct: u32,
    pub incorrect: u32,
    pub total: u32,
    pub score_percent: f64,
    pub incorrect_details: String,
}

impl HistoryListItem {
    #[must_use]
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        Self {
            recorded_at: entry.recorded_at(),
            user: entry.user().to_owned(),
            correct: entry.correct(),
            incorrect: entry.incorrect(),
            total: entry.total(),
            score_percent: entry.score_percent(),
            incorrect_details: entry.incorrect_details().to_owned(),
        }
    }
}

/// Read facade over the history ledger that hides the repository from the UI.
#[derive(Clone)]
pub struct HistoryService {
    history: Arc<dyn HistoryRepository>,
}

impl HistoryService {
    #[must_use]
    pub fn new(history: Arc<dyn HistoryRepository>) -> Self {
        Self { history }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryHistory::new()))
    }

    /// Loads all historical entries in insertion order.
    ///
    /// Read failures soft-fail to an empty list: the quiz keeps working
    /// with no history rather than surfacing a storage error.
    pub async fn list_history(&self) -> Vec<HistoryListItem> {
        match self.history.load_entries().await {
            Ok(entries) => entries.iter().map(HistoryListItem::from_entry).collect(),
            Err(err) => {
                tracing::warn!("failed to load quiz history: {err}");
                Vec::new()
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Card, Deck, QuizSettings};
    use quiz_core::time::fixed_now;
    use storage::repository::PersistenceError;

    fn started_session() -> QuizSession {
        let cards = vec![
            Card::new("2+2", "4").unwrap(),
            Card::new("3+3", "6").unwrap(),
        ];
        let deck = Deck::new(cards, QuizSettings::default()).unwrap();
        let mut session = QuizSession::new(deck);
        session.start();
        session
    }

    #[test]
    fn question_view_is_absent_before_start_and_after_finish() {
        let cards = vec![Card::new("2+2", "4").unwrap()];
        let deck = Deck::new(cards, QuizSettings::default()).unwrap();
        let mut session = QuizSession::new(deck);
        assert!(QuestionView::of(&session).is_none());

        session.start();
        session.draw_next().unwrap();
        session.reveal().unwrap();
        assert!(session.is_finished());
        assert!(QuestionView::of(&session).is_none());
    }

    #[test]
    fn answering_view_gates_submit_on_selection() {
        let mut session = started_session();
        session.draw_next().unwrap();

        let view = QuestionView::of(&session).unwrap();
        assert_eq!(view.number, 1);
        assert_eq!(view.total, 2);
        assert!(!view.can_submit);
        assert!(view.can_reveal);
        assert!(!view.can_advance);
        assert!(view.correct_answer.is_none());

        session.select_answer("6").unwrap();
        let view = QuestionView::of(&session).unwrap();
        assert!(view.can_submit);
        assert_eq!(view.selected.as_deref(), Some("6"));
    }

    #[test]
    fn resolved_view_surfaces_answer_and_advance() {
        let mut session = started_session();
        let expected = session.draw_next().unwrap().answer().to_owned();
        session.reveal().unwrap();

        let view = QuestionView::of(&session).unwrap();
        assert!(!view.can_submit);
        assert!(!view.can_reveal);
        assert!(view.can_advance);
        assert_eq!(view.correct_answer.as_deref(), Some(expected.as_str()));
        assert_eq!(view.number, 1);
    }

    #[test]
    fn summary_view_computes_score() {
        let mut session = started_session();
        while !session.is_finished() {
            let answer = session.draw_next().unwrap().answer().to_owned();
            session.select_answer(answer).unwrap();
            session.submit().unwrap();
            if !session.is_finished() {
                session.advance().unwrap();
            }
        }

        let summary = SummaryView::of(&session);
        assert_eq!(summary.correct, 2);
        assert_eq!(summary.incorrect, 0);
        assert!((summary.score_percent - 100.0).abs() < f64::EPSILON);
        assert_eq!(summary.correct_review.len(), 2);
        assert!(summary.incorrect_review.is_empty());
    }

    #[tokio::test]
    async fn history_service_lists_entries() {
        let repo = Arc::new(InMemoryHistory::new());
        repo.append_entry(&HistoryEntry::new("ada", fixed_now(), 2, 1, "x => y").unwrap())
            .await
            .unwrap();

        let service = HistoryService::new(repo);
        let items = service.list_history().await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].user, "ada");
        assert_eq!(items[0].total, 3);
        assert!((items[0].score_percent - 66.666).abs() < 0.01);
    }

    struct FailingHistory;

    #[async_trait::async_trait]
    impl HistoryRepository for FailingHistory {
        async fn append_entry(&self, _entry: &HistoryEntry) -> Result<(), PersistenceError> {
            Err(PersistenceError::Io("disk on fire".into()))
        }

        async fn load_entries(&self) -> Result<Vec<HistoryEntry>, PersistenceError> {
            Err(PersistenceError::Io("disk on fire".into()))
        }
    }

    #[tokio::test]
    async fn history_read_failure_soft_fails_to_empty() {
        let service = HistoryService::new(Arc::new(FailingHistory));
        assert!(service.list_history().await.is_empty());
    }
}
