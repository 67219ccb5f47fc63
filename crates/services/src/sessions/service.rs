use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use rand::rng;
use rand::seq::IndexedRandom;

use quiz_core::answer;
use quiz_core::model::{Card, Deck, HistoryEntry, LogEntry};

use super::options::generate_options;
use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Observable lifecycle phase of a quiz session.
///
/// `Answering` and `Resolved` are the two sub-modes of an in-progress
/// session; they decide which events the current question accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    Answering,
    Resolved,
    Finished,
}

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// Outcome of submitting an answer for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub index: usize,
    pub is_correct: bool,
    pub correct_answer: String,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// The question currently on screen, with its cached option list.
///
/// Options are generated once per draw and reused for every re-render of the
/// same question.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CurrentQuestion {
    index: usize,
    options: Vec<String>,
}

/// Mutable state of one quiz run over a deck.
///
/// The session owns its deck for the whole run. Question order is not a
/// precomputed permutation: every draw samples uniformly from the indices
/// that have not been resolved yet. A question counts exactly once, on its
/// first resolution (submit or reveal), guarded by the `used` set.
pub struct QuizSession {
    deck: Deck,
    started: bool,
    used: BTreeSet<usize>,
    current: Option<CurrentQuestion>,
    answers: HashMap<usize, String>,
    submitted: bool,
    revealed: bool,
    correct_count: u32,
    incorrect_count: u32,
    correct_log: Vec<LogEntry>,
    incorrect_log: Vec<LogEntry>,
    result_recorded: bool,
}

impl QuizSession {
    /// Creates a session over the given deck, in the `NotStarted` phase.
    ///
    /// The deck guarantees at least one card by construction, so this cannot
    /// fail; call [`start`](Self::start) to begin the run.
    #[must_use]
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            started: false,
            used: BTreeSet::new(),
            current: None,
            answers: HashMap::new(),
            submitted: false,
            revealed: false,
            correct_count: 0,
            incorrect_count: 0,
            correct_log: Vec::new(),
            incorrect_log: Vec::new(),
            result_recorded: false,
        }
    }

    /// Starts or restarts the run.
    ///
    /// Valid from any phase: all counters, logs, per-question flags and the
    /// used set are reset, and the next draw starts from the full deck.
    pub fn start(&mut self) {
        self.started = true;
        self.used.clear();
        self.current = None;
        self.answers.clear();
        self.submitted = false;
        self.revealed = false;
        self.correct_count = 0;
        self.incorrect_count = 0;
        self.correct_log.clear();
        self.incorrect_log.clear();
        self.result_recorded = false;
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.deck.len()
    }

    #[must_use]
    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn incorrect_count(&self) -> u32 {
        self.incorrect_count
    }

    #[must_use]
    pub fn correct_log(&self) -> &[LogEntry] {
        &self.correct_log
    }

    #[must_use]
    pub fn incorrect_log(&self) -> &[LogEntry] {
        &self.incorrect_log
    }

    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current.as_ref().map(|c| c.index)
    }

    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        self.current_index().and_then(|i| self.deck.card(i))
    }

    #[must_use]
    pub fn current_options(&self) -> Option<&[String]> {
        self.current.as_ref().map(|c| c.options.as_slice())
    }

    /// The last answer selected for the current question, if any.
    #[must_use]
    pub fn selected_answer(&self) -> Option<&str> {
        self.current_index()
            .and_then(|i| self.answers.get(&i))
            .map(String::as_str)
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// True once every index in the deck has been resolved.
    ///
    /// Finish is detected from the used set alone, whether or not the last
    /// question was advanced past.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.used.len() == self.deck.len()
    }

    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.submitted || self.revealed
    }

    #[must_use]
    pub fn result_recorded(&self) -> bool {
        self.result_recorded
    }

    /// Marks the session's result as written to the ledger.
    ///
    /// Set by the workflow layer after a successful append so later
    /// observations of the finished state do not write again.
    pub fn mark_result_recorded(&mut self) {
        self.result_recorded = true;
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if !self.started {
            return SessionPhase::NotStarted;
        }
        if self.is_finished() {
            return SessionPhase::Finished;
        }
        if self.current.is_some() && self.is_resolved() {
            SessionPhase::Resolved
        } else {
            SessionPhase::Answering
        }
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total(),
            resolved: self.used.len(),
            remaining: self.total().saturating_sub(self.used.len()),
            correct: self.correct_count,
            incorrect: self.incorrect_count,
            is_finished: self.is_finished(),
        }
    }

    //
    // ─── TRANSITIONS ───────────────────────────────────────────────────────
    //

    /// Draws the next question when none is on screen.
    ///
    /// The index is sampled uniformly from the unused pool and the option
    /// list is generated and cached for the question's whole display. When a
    /// question is already current this is a no-op returning it unchanged,
    /// so re-renders never reshuffle.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before [`start`](Self::start) and
    /// `SessionError::Finished` once every question is resolved.
    pub fn draw_next(&mut self) -> Result<&Card, SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }
        if self.is_finished() {
            return Err(SessionError::Finished);
        }

        if self.current.is_none() {
            let open: Vec<usize> = (0..self.deck.len())
                .filter(|i| !self.used.contains(i))
                .collect();
            let index = open
                .choose(&mut rng())
                .copied()
                .ok_or(SessionError::Finished)?;

            let width = usize::try_from(self.deck.settings().option_count()).unwrap_or(usize::MAX);
            let options = {
                let card = self.deck.card(index).ok_or(SessionError::NoCurrentQuestion)?;
                generate_options(card.answer(), &self.deck.all_answers(), width)
            };

            self.current = Some(CurrentQuestion { index, options });
            self.submitted = false;
            self.revealed = false;
            tracing::debug!(index, remaining = open.len(), "drew next question");
        }

        self.current_card().ok_or(SessionError::NoCurrentQuestion)
    }

    /// Records the chosen option text for the current question.
    ///
    /// May be called repeatedly while answering; the last write wins.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyResolved` once the question has been
    /// submitted or revealed, and `SessionError::NoCurrentQuestion` when
    /// nothing is on screen.
    pub fn select_answer(&mut self, answer: impl Into<String>) -> Result<(), SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }
        let index = self.current_index().ok_or(SessionError::NoCurrentQuestion)?;
        if self.is_resolved() {
            return Err(SessionError::AlreadyResolved);
        }

        self.answers.insert(index, answer.into());
        Ok(())
    }

    /// Evaluates the selected answer against the current card.
    ///
    /// On first resolution the matching counter and log are updated and the
    /// index joins the used set. A re-delivered submit on an already
    /// resolved question reports an outcome again without counting.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoSelection` when no non-blank answer is
    /// selected; submitting empty is disabled, not a no-op.
    pub fn submit(&mut self) -> Result<AnswerOutcome, SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }
        let index = self.current_index().ok_or(SessionError::NoCurrentQuestion)?;
        let correct_answer = self
            .deck
            .card(index)
            .ok_or(SessionError::NoCurrentQuestion)?
            .answer()
            .to_owned();
        let selected = self
            .answers
            .get(&index)
            .cloned()
            .filter(|s| !s.trim().is_empty());

        if self.is_resolved() {
            let is_correct = answer::is_correct(selected.as_deref(), &correct_answer);
            return Ok(AnswerOutcome {
                index,
                is_correct,
                correct_answer,
            });
        }

        let Some(chosen) = selected else {
            return Err(SessionError::NoSelection);
        };

        let is_correct = answer::is_correct(Some(&chosen), &correct_answer);
        self.resolve(index, is_correct, Some(chosen));
        self.submitted = true;
        self.revealed = true;
        tracing::debug!(index, is_correct, "submitted answer");

        Ok(AnswerOutcome {
            index,
            is_correct,
            correct_answer,
        })
    }

    /// Surfaces the correct answer without requiring a selection.
    ///
    /// If the question is not resolved yet this counts as an incorrect
    /// attempt with whatever answer was selected at that moment, with the
    /// same bookkeeping as an incorrect submit. Once resolved it only
    /// returns the answer again.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoCurrentQuestion` when nothing is on screen.
    pub fn reveal(&mut self) -> Result<String, SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }
        let index = self.current_index().ok_or(SessionError::NoCurrentQuestion)?;
        let correct_answer = self
            .deck
            .card(index)
            .ok_or(SessionError::NoCurrentQuestion)?
            .answer()
            .to_owned();

        if !self.is_resolved() {
            let selected = self
                .answers
                .get(&index)
                .cloned()
                .filter(|s| !s.trim().is_empty());
            self.resolve(index, false, selected);
            self.submitted = true;
            self.revealed = true;
            tracing::debug!(index, "revealed answer");
        }

        Ok(correct_answer)
    }

    /// Clears the resolved question so the next draw can happen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotResolved` while the current question is
    /// still being answered.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }
        if self.current.is_none() {
            return Err(SessionError::NoCurrentQuestion);
        }
        if !self.is_resolved() {
            return Err(SessionError::NotResolved);
        }

        self.current = None;
        self.submitted = false;
        self.revealed = false;
        Ok(())
    }

    /// Counts and logs the first resolution of `index`.
    ///
    /// Membership in `used` is the double-count guard: a second resolution
    /// of the same index is ignored wholesale.
    fn resolve(&mut self, index: usize, is_correct: bool, user_answer: Option<String>) {
        if self.used.contains(&index) {
            return;
        }
        let Some(card) = self.deck.card(index) else {
            return;
        };

        let entry = LogEntry::new(card.question(), card.answer(), user_answer);
        if is_correct {
            self.correct_count += 1;
            self.correct_log.push(entry);
        } else {
            self.incorrect_count += 1;
            self.incorrect_log.push(entry);
        }
        self.used.insert(index);
    }

    //
    // ─── RESULTS ───────────────────────────────────────────────────────────
    //

    /// One-line rendering of the incorrect log for the history ledger.
    #[must_use]
    pub fn incorrect_details(&self) -> String {
        self.incorrect_log
            .iter()
            .map(|e| {
                format!(
                    "{} => {} (answered: {})",
                    e.question,
                    e.correct_answer,
                    e.user_answer_text()
                )
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Builds the durable record for a finished run.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` while questions remain, and
    /// propagates `HistoryEntryError` for a blank user name.
    pub fn build_history_entry(
        &self,
        user: &str,
        recorded_at: DateTime<Utc>,
    ) -> Result<HistoryEntry, SessionError> {
        if !self.is_finished() {
            return Err(SessionError::NotFinished);
        }
        Ok(HistoryEntry::new(
            user,
            recorded_at,
            self.correct_count,
            self.incorrect_count,
            self.incorrect_details(),
        )?)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("deck_len", &self.deck.len())
            .field("started", &self.started)
            .field("used", &self.used)
            .field("current_index", &self.current_index())
            .field("submitted", &self.submitted)
            .field("revealed", &self.revealed)
            .field("correct_count", &self.correct_count)
            .field("incorrect_count", &self.incorrect_count)
            .field("result_recorded", &self.result_recorded)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
