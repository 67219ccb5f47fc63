use services::SummaryView;

/// Printable rendering of the end-of-run summary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryVm {
    pub headline: String,
    pub score_line: String,
    pub incorrect_lines: Vec<String>,
    pub correct_lines: Vec<String>,
}

impl From<&SummaryView> for SummaryVm {
    fn from(view: &SummaryView) -> Self {
        let review_line = |entry: &quiz_core::model::LogEntry| {
            format!(
                "  - {} => {} (answered: {})",
                entry.question,
                entry.correct_answer,
                entry.user_answer_text()
            )
        };

        Self {
            headline: "Quiz completed!".to_owned(),
            score_line: format!(
                "{} of {} correct ({:.0}%)",
                view.correct, view.total, view.score_percent
            ),
            incorrect_lines: view.incorrect_review.iter().map(review_line).collect(),
            correct_lines: view.correct_review.iter().map(review_line).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::LogEntry;

    #[test]
    fn summary_renders_score_and_reviews() {
        let view = SummaryView {
            total: 3,
            correct: 1,
            incorrect: 2,
            score_percent: 100.0 / 3.0,
            correct_review: vec![LogEntry::new("2+2", "4", Some("4".into()))],
            incorrect_review: vec![
                LogEntry::new("3+3", "6", None),
                LogEntry::new("4+4", "8", Some("7".into())),
            ],
        };

        let vm = SummaryVm::from(&view);
        assert_eq!(vm.score_line, "1 of 3 correct (33%)");
        assert_eq!(vm.incorrect_lines.len(), 2);
        assert_eq!(vm.incorrect_lines[0], "  - 3+3 => 6 (answered: No answer)");
        assert_eq!(vm.incorrect_lines[1], "  - 4+4 => 8 (answered: 7)");
        assert_eq!(vm.correct_lines[0], "  - 2+2 => 4 (answered: 4)");
    }
}
