use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryEntryError {
    #[error("user name cannot be empty")]
    EmptyUser,

    #[error("total ({total}) does not match correct + incorrect ({sum})")]
    CountMismatch { total: u32, sum: u32 },
}

/// Durable record of one completed quiz session.
///
/// Entries are write-once: created when a session finishes, appended to the
/// history ledger, and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    recorded_at: DateTime<Utc>,
    user: String,
    correct: u32,
    incorrect: u32,
    total: u32,
    incorrect_details: String,
}

impl HistoryEntry {
    /// Builds an entry from a finished session's counters.
    ///
    /// The total is derived from the counters, so it cannot disagree with
    /// them.
    ///
    /// # Errors
    ///
    /// Returns `HistoryEntryError::EmptyUser` if the user name is blank.
    pub fn new(
        user: impl Into<String>,
        recorded_at: DateTime<Utc>,
        correct: u32,
        incorrect: u32,
        incorrect_details: impl Into<String>,
    ) -> Result<Self, HistoryEntryError> {
        let user = user.into();
        if user.trim().is_empty() {
            return Err(HistoryEntryError::EmptyUser);
        }

        Ok(Self {
            recorded_at,
            user: user.trim().to_owned(),
            correct,
            incorrect,
            total: correct.saturating_add(incorrect),
            incorrect_details: incorrect_details.into(),
        })
    }

    /// Rehydrates an entry from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `HistoryEntryError::CountMismatch` if the stored total does
    /// not equal `correct + incorrect`, and `HistoryEntryError::EmptyUser`
    /// for a blank user name.
    pub fn from_persisted(
        recorded_at: DateTime<Utc>,
        user: impl Into<String>,
        correct: u32,
        incorrect: u32,
        total: u32,
        incorrect_details: impl Into<String>,
    ) -> Result<Self, HistoryEntryError> {
        let sum = correct.saturating_add(incorrect);
        if sum != total {
            return Err(HistoryEntryError::CountMismatch { total, sum });
        }

        let entry = Self::new(user, recorded_at, correct, incorrect, incorrect_details)?;
        Ok(entry)
    }

    #[must_use]
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn incorrect_details(&self) -> &str {
        &self.incorrect_details
    }

    /// Share of correct answers, in percent.
    #[must_use]
    pub fn score_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.correct) * 100.0 / f64::from(self.total)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn new_derives_total_from_counters() {
        let entry = HistoryEntry::new("ada", fixed_now(), 2, 1, "").unwrap();
        assert_eq!(entry.total(), 3);
        assert_eq!(entry.user(), "ada");
        assert!((entry.score_percent() - 66.666).abs() < 0.01);
    }

    #[test]
    fn new_rejects_blank_user() {
        let err = HistoryEntry::new("  ", fixed_now(), 1, 0, "").unwrap_err();
        assert_eq!(err, HistoryEntryError::EmptyUser);
    }

    #[test]
    fn new_trims_user_name() {
        let entry = HistoryEntry::new("  ada ", fixed_now(), 1, 0, "").unwrap();
        assert_eq!(entry.user(), "ada");
    }

    #[test]
    fn from_persisted_rejects_count_mismatch() {
        let err = HistoryEntry::from_persisted(fixed_now(), "ada", 2, 1, 4, "").unwrap_err();
        assert_eq!(err, HistoryEntryError::CountMismatch { total: 4, sum: 3 });
    }

    #[test]
    fn from_persisted_round_trips() {
        let entry =
            HistoryEntry::from_persisted(fixed_now(), "ada", 1, 2, 3, "2+2 => 4").unwrap();
        assert_eq!(entry.correct(), 1);
        assert_eq!(entry.incorrect(), 2);
        assert_eq!(entry.total(), 3);
        assert_eq!(entry.incorrect_details(), "2+2 => 4");
    }
}
