//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::HistoryEntryError;
use storage::repository::PersistenceError;

/// Errors emitted by the quiz session subsystem.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session has not been started")]
    NotStarted,

    #[error("session is already finished")]
    Finished,

    #[error("session is not finished yet")]
    NotFinished,

    #[error("no question is currently drawn")]
    NoCurrentQuestion,

    #[error("an answer must be selected before submitting")]
    NoSelection,

    #[error("current question is already resolved")]
    AlreadyResolved,

    #[error("current question is not resolved yet")]
    NotResolved,

    #[error(transparent)]
    History(#[from] HistoryEntryError),

    #[error(transparent)]
    Storage(#[from] PersistenceError),
}
