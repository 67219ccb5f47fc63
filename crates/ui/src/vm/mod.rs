mod history_vm;
mod question_vm;
mod summary_vm;
pub mod time_fmt;

pub use history_vm::{HistoryRowVm, map_history_rows};
pub use question_vm::QuestionVm;
pub use summary_vm::SummaryVm;
