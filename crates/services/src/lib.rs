#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::SessionError;

pub use sessions::{
    AnswerOutcome, HistoryListItem, HistoryService, QuestionView, QuizLoopService, QuizSession,
    SessionPhase, SessionProgress, SummaryView, generate_options,
};
