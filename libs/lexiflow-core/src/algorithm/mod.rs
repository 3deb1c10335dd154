//! Review scheduling.

pub mod leitner;

pub use leitner::Leitner;

use crate::types::{LeitnerBox, SchedulePatch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binary review outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Knew,
    Forgot,
}

impl Answer {
    pub fn from_bool(knew: bool) -> Self {
        if knew { Self::Knew } else { Self::Forgot }
    }
}

/// Result of scheduling a record after review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingResult {
    pub new_box: LeitnerBox,
    pub next_review_at: DateTime<Utc>,
}

impl SchedulingResult {
    /// Store update for this result, stamped with `now`.
    pub fn to_patch(self, now: DateTime<Utc>) -> SchedulePatch {
        SchedulePatch {
            leitner_box: self.new_box,
            next_review_at: self.next_review_at,
            updated_at: now,
        }
    }
}

/// Trait for spaced repetition algorithms.
pub trait SpacedRepetitionAlgorithm: Send + Sync {
    /// Algorithm identifier.
    fn name(&self) -> &'static str;

    /// Calculate the next box and due time after a review.
    fn schedule(&self, current: LeitnerBox, answer: Answer, now: DateTime<Utc>) -> SchedulingResult;
}

/// Schedule with the default Leitner intervals.
pub fn advance(current: LeitnerBox, knew: bool, now: DateTime<Utc>) -> SchedulingResult {
    Leitner::default().schedule(current, Answer::from_bool(knew), now)
}
