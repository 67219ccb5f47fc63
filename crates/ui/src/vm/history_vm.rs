use services::HistoryListItem;

use crate::vm::time_fmt::format_datetime;

/// Printable row for one historical session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryRowVm {
    pub recorded_at_str: String,
    pub user: String,
    pub score_line: String,
    pub details: String,
}

impl From<&HistoryListItem> for HistoryRowVm {
    fn from(item: &HistoryListItem) -> Self {
        Self {
            recorded_at_str: format_datetime(item.recorded_at),
            user: item.user.clone(),
            score_line: format!(
                "{} of {} correct ({:.0}%)",
                item.correct, item.total, item.score_percent
            ),
            details: item.incorrect_details.clone(),
        }
    }
}

#[must_use]
pub fn map_history_rows(items: &[HistoryListItem]) -> Vec<HistoryRowVm> {
    items.iter().map(HistoryRowVm::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn rows_render_score_and_timestamp() {
        let item = HistoryListItem {
            recorded_at: fixed_now(),
            user: "ada".into(),
            correct: 2,
            incorrect: 1,
            total: 3,
            score_percent: 200.0 / 3.0,
            incorrect_details: "3+3 => 6 (answered: No answer)".into(),
        };

        let rows = map_history_rows(std::slice::from_ref(&item));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user, "ada");
        assert_eq!(rows[0].score_line, "2 of 3 correct (67%)");
        assert_eq!(rows[0].recorded_at_str, "2023-11-14 22:13 UTC");
    }
}
