use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{Deck, HistoryEntry};
use storage::repository::HistoryRepository;

use super::service::QuizSession;
use crate::error::SessionError;

/// Orchestrates session start and the exactly-once history append.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    history: Arc<dyn HistoryRepository>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, history: Arc<dyn HistoryRepository>) -> Self {
        Self { clock, history }
    }

    /// Start a fresh session over the given deck.
    #[must_use]
    pub fn start_session(&self, deck: Deck) -> QuizSession {
        let mut session = QuizSession::new(deck);
        session.start();
        session
    }

    /// Record a finished session to the history ledger.
    ///
    /// Appends at most once per run: the first call after the finished state
    /// is observed writes the entry and marks the session; later calls
    /// return `Ok(None)`. The mark is only set after a successful append, so
    /// a failed write can be retried on the next observation while the
    /// in-memory summary stays intact.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` while questions remain, and
    /// `SessionError::Storage` when the append fails.
    pub async fn record_result(
        &self,
        session: &mut QuizSession,
        user: &str,
    ) -> Result<Option<HistoryEntry>, SessionError> {
        if !session.is_finished() {
            return Err(SessionError::NotFinished);
        }
        if session.result_recorded() {
            return Ok(None);
        }

        let entry = session.build_history_entry(user, self.clock.now())?;
        self.history.append_entry(&entry).await?;
        session.mark_result_recorded();
        tracing::debug!(user = entry.user(), total = entry.total(), "recorded finished session");
        Ok(Some(entry))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
