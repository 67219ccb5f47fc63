mod card;
mod deck;
mod history;
mod log;

pub use card::{Card, CardError};
pub use deck::{DEFAULT_OPTION_COUNT, Deck, DeckError, QuizSettings};
pub use history::{HistoryEntry, HistoryEntryError};
pub use log::{LogEntry, NO_ANSWER};
