use services::QuestionView;

/// Printable rendering of one question screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    pub header: String,
    pub question: String,
    pub option_lines: Vec<String>,
    /// Present once the question is resolved.
    pub answer_line: Option<String>,
    pub action_line: String,
}

impl From<&QuestionView> for QuestionVm {
    fn from(view: &QuestionView) -> Self {
        let option_lines = view
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let marker = if view.selected.as_deref() == Some(option.as_str()) {
                    ">"
                } else {
                    " "
                };
                format!("{marker} {}. {option}", i + 1)
            })
            .collect();

        let mut actions: Vec<&str> = Vec::new();
        if !view.options.is_empty() && view.can_reveal {
            actions.push("[1-9] select");
        }
        if view.can_submit {
            actions.push("[s]ubmit");
        }
        if view.can_reveal {
            actions.push("[r]eveal");
        }
        if view.can_advance {
            actions.push("[n]ext");
        }
        actions.push("[q]uit");

        Self {
            header: format!("Question {} of {}", view.number, view.total),
            question: view.question.clone(),
            option_lines,
            answer_line: view
                .correct_answer
                .as_ref()
                .map(|a| format!("Correct answer: {a}")),
            action_line: actions.join("  "),
        }
    }
}
