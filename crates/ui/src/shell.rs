use std::io::{self, BufRead, Write as _};
use std::sync::Arc;

use quiz_core::model::Deck;
use services::{
    HistoryService, QuestionView, QuizLoopService, QuizSession, SessionPhase, SummaryView,
};

use crate::vm::{QuestionVm, SummaryVm, map_history_rows};

/// Interactive terminal front end.
///
/// Each input line is one discrete event against the session: select an
/// option by number, submit, reveal, advance, restart. The shell only talks
/// to the session through its transition methods and view snapshots.
pub struct Shell {
    quiz: Arc<QuizLoopService>,
    history: Arc<HistoryService>,
    user: String,
}

impl Shell {
    #[must_use]
    pub fn new(quiz: Arc<QuizLoopService>, history: Arc<HistoryService>, user: String) -> Self {
        Self {
            quiz,
            history,
            user,
        }
    }

    /// Runs the quiz loop until the user quits.
    ///
    /// # Errors
    ///
    /// Returns `io::Error` only for terminal I/O failures; session and
    /// ledger errors are reported inline and the loop continues.
    pub async fn run(&self, deck: Deck) -> io::Result<()> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        let mut session = self.quiz.start_session(deck);

        println!("Quiz started for {}.", self.user);

        loop {
            if session.phase() == SessionPhase::Finished {
                self.render_finish(&mut session).await;
                print!("[restart]  [h]istory  [q]uit > ");
                io::stdout().flush()?;

                let Some(line) = lines.next() else { break };
                match line?.trim() {
                    "restart" => session.start(),
                    "h" => self.render_history().await,
                    "q" | "quit" => break,
                    other => println!("unknown command: {other}"),
                }
                continue;
            }

            if session.current_index().is_none() {
                // Lazy draw: entering the answering mode with nothing on
                // screen pulls the next question.
                if let Err(err) = session.draw_next() {
                    println!("{err}");
                    break;
                }
                continue;
            }

            self.render_question(&session);
            print!("> ");
            io::stdout().flush()?;

            let Some(line) = lines.next() else { break };
            let input = line?;
            let input = input.trim();

            match input {
                "" => {}
                "s" | "submit" => match session.submit() {
                    Ok(outcome) if outcome.is_correct => println!("Correct!"),
                    Ok(outcome) => {
                        println!("Incorrect. The answer is: {}", outcome.correct_answer);
                    }
                    Err(err) => println!("{err}"),
                },
                "r" | "reveal" => match session.reveal() {
                    Ok(answer) => println!("The answer is: {answer}"),
                    Err(err) => println!("{err}"),
                },
                "n" | "next" => {
                    if let Err(err) = session.advance() {
                        println!("{err}");
                    }
                }
                "h" | "history" => self.render_history().await,
                "restart" => session.start(),
                "q" | "quit" => break,
                other => match other.parse::<usize>() {
                    Ok(n) => Self::select_option(&mut session, n),
                    Err(_) => println!("unknown command: {other}"),
                },
            }
        }

        Ok(())
    }

    fn select_option(session: &mut QuizSession, n: usize) {
        let Some(options) = session.current_options() else {
            println!("no question on screen");
            return;
        };
        let Some(option) = n.checked_sub(1).and_then(|i| options.get(i)).cloned() else {
            println!("no option {n}");
            return;
        };
        if let Err(err) = session.select_answer(option) {
            println!("{err}");
        }
    }

    fn render_question(&self, session: &QuizSession) {
        let Some(view) = QuestionView::of(session) else {
            return;
        };
        let vm = QuestionVm::from(&view);

        println!();
        println!("{}", vm.header);
        println!("{}", vm.question);
        for line in &vm.option_lines {
            println!("{line}");
        }
        if let Some(answer_line) = &vm.answer_line {
            println!("{answer_line}");
        }
        let progress = session.progress();
        println!("Remaining questions: {}", progress.remaining);
        println!("{}", vm.action_line);
    }

    async fn render_finish(&self, session: &mut QuizSession) {
        // Recording is idempotent; re-rendering the finished state after the
        // first successful append writes nothing.
        if let Err(err) = self.quiz.record_result(session, &self.user).await {
            println!("results could not be saved: {err}");
        }

        let vm = SummaryVm::from(&SummaryView::of(session));
        println!();
        println!("{}", vm.headline);
        println!("{}", vm.score_line);
        if !vm.incorrect_lines.is_empty() {
            println!("Review these:");
            for line in &vm.incorrect_lines {
                println!("{line}");
            }
        }
    }

    async fn render_history(&self) {
        let rows = map_history_rows(&self.history.list_history().await);
        if rows.is_empty() {
            println!("no history yet");
            return;
        }
        for row in rows {
            println!("{}  {}  {}", row.recorded_at_str, row.user, row.score_line);
            if !row.details.is_empty() {
                println!("    {}", row.details);
            }
        }
    }
}
