mod deck_reader;
mod history_repo;

pub use deck_reader::{FormatError, parse_deck, read_deck_file};
pub use history_repo::CsvHistoryLedger;
