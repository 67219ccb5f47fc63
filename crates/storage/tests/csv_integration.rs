use quiz_core::model::HistoryEntry;
use quiz_core::time::fixed_now;
use storage::csv::{CsvHistoryLedger, FormatError, read_deck_file};
use storage::repository::HistoryRepository;

fn build_entry(user: &str, correct: u32, incorrect: u32, details: &str) -> HistoryEntry {
    HistoryEntry::new(user, fixed_now(), correct, incorrect, details).unwrap()
}

#[tokio::test]
async fn ledger_appends_and_loads_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = CsvHistoryLedger::new(dir.path().join("history.csv"));

    ledger
        .append_entry(&build_entry("ada", 3, 0, ""))
        .await
        .unwrap();
    ledger
        .append_entry(&build_entry("grace", 1, 2, "2+2 => 4 (answered: 5)"))
        .await
        .unwrap();

    let entries = ledger.load_entries().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].user(), "ada");
    assert_eq!(entries[0].total(), 3);
    assert_eq!(entries[1].user(), "grace");
    assert_eq!(entries[1].incorrect_details(), "2+2 => 4 (answered: 5)");
    assert_eq!(entries[1].recorded_at(), fixed_now());
}

#[tokio::test]
async fn ledger_writes_single_header_across_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.csv");
    let ledger = CsvHistoryLedger::new(&path);

    ledger
        .append_entry(&build_entry("ada", 1, 0, ""))
        .await
        .unwrap();
    ledger
        .append_entry(&build_entry("ada", 0, 1, "q => a"))
        .await
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let header_lines = contents
        .lines()
        .filter(|line| line.starts_with("recorded_at"))
        .count();
    assert_eq!(header_lines, 1);
    assert_eq!(contents.lines().count(), 3);
}

#[tokio::test]
async fn missing_ledger_file_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = CsvHistoryLedger::new(dir.path().join("absent.csv"));

    let entries = ledger.load_entries().await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn ledger_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/dir/history.csv");
    let ledger = CsvHistoryLedger::new(&path);

    ledger
        .append_entry(&build_entry("ada", 1, 0, ""))
        .await
        .unwrap();
    assert!(path.exists());
}

#[test]
fn deck_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.csv");
    std::fs::write(&path, "question,answer\n2+2,4\n3+3,6\n4+4,8\n").unwrap();

    let cards = read_deck_file(&path).unwrap();
    assert_eq!(cards.len(), 3);
    assert_eq!(cards[2].question(), "4+4");
    assert_eq!(cards[2].answer(), "8");
}

#[test]
fn empty_deck_file_is_a_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.csv");
    std::fs::write(&path, "").unwrap();

    let err = read_deck_file(&path).unwrap_err();
    assert!(matches!(err, FormatError::Empty));
}
