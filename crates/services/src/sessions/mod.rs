mod options;
mod progress;
mod service;
mod view;
mod workflow;

// Public API of the quiz session subsystem.
pub use crate::error::SessionError;
pub use options::generate_options;
pub use progress::SessionProgress;
pub use service::{AnswerOutcome, QuizSession, SessionPhase};
pub use view::{HistoryListItem, HistoryService, QuestionView, SummaryView};
pub use workflow::QuizLoopService;
