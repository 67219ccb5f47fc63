use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use quiz_core::model::{Card, CardError};

/// Errors raised while turning a tabular file into quiz cards.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FormatError {
    #[error("deck file contains no cards")]
    Empty,

    #[error("deck row {row} must contain at least two columns")]
    TooFewColumns { row: usize },

    #[error("deck row {row}: {source}")]
    InvalidCard { row: usize, source: CardError },

    #[error("failed to read deck file: {0}")]
    Io(String),

    #[error("malformed deck file: {0}")]
    Malformed(String),
}

/// Reads a deck file from disk into an ordered card list.
///
/// # Errors
///
/// Returns `FormatError::Io` if the file cannot be opened, otherwise the
/// errors of [`parse_deck`].
pub fn read_deck_file(path: impl AsRef<Path>) -> Result<Vec<Card>, FormatError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| FormatError::Io(e.to_string()))?;
    tracing::debug!(path = %path.display(), "reading deck file");
    parse_deck(file)
}

/// Parses delimited text into an ordered card list.
///
/// The first row is treated as a header and skipped. Column one becomes the
/// question, column two the answer; any further columns are ignored.
///
/// # Errors
///
/// Returns `FormatError::Empty` for input without data rows,
/// `FormatError::TooFewColumns` when a row lacks an answer column, and
/// `FormatError::InvalidCard` for blank question/answer cells.
pub fn parse_deck(reader: impl Read) -> Result<Vec<Card>, FormatError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut cards = Vec::new();
    for (i, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|e| FormatError::Malformed(e.to_string()))?;
        // The header occupies row 1.
        let row = i + 2;

        let question = record.get(0).ok_or(FormatError::TooFewColumns { row })?;
        let answer = record.get(1).ok_or(FormatError::TooFewColumns { row })?;

        let card =
            Card::new(question, answer).map_err(|source| FormatError::InvalidCard { row, source })?;
        cards.push(card);
    }

    if cards.is_empty() {
        return Err(FormatError::Empty);
    }

    Ok(cards)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_column_file() {
        let input = "question,answer\n2+2,4\n3+3,6\n";
        let cards = parse_deck(input.as_bytes()).unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].question(), "2+2");
        assert_eq!(cards[0].answer(), "4");
        assert_eq!(cards[1].answer(), "6");
    }

    #[test]
    fn extra_columns_are_ignored() {
        let input = "question,answer,hint,source\ncapital of France,Paris,starts with P,atlas\n";
        let cards = parse_deck(input.as_bytes()).unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].answer(), "Paris");
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = parse_deck("".as_bytes()).unwrap_err();
        assert!(matches!(err, FormatError::Empty));
    }

    #[test]
    fn header_only_input_is_rejected() {
        let err = parse_deck("question,answer\n".as_bytes()).unwrap_err();
        assert!(matches!(err, FormatError::Empty));
    }

    #[test]
    fn single_column_row_is_rejected() {
        let input = "question,answer\nlonely question\n";
        let err = parse_deck(input.as_bytes()).unwrap_err();
        assert!(matches!(err, FormatError::TooFewColumns { row: 2 }));
    }

    #[test]
    fn blank_answer_cell_is_rejected() {
        let input = "question,answer\n2+2,4\n3+3,  \n";
        let err = parse_deck(input.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            FormatError::InvalidCard {
                row: 3,
                source: CardError::EmptyAnswer
            }
        ));
    }

    #[test]
    fn quoted_fields_keep_embedded_commas() {
        let input = "question,answer\n\"largest city, by population\",Tokyo\n";
        let cards = parse_deck(input.as_bytes()).unwrap();
        assert_eq!(cards[0].question(), "largest city, by population");
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = read_deck_file("/nonexistent/deck.csv").unwrap_err();
        assert!(matches!(err, FormatError::Io(_)));
    }
}
