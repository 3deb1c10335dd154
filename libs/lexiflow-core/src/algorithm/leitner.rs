//! Fixed-interval Leitner boxes.
//!
//! A known answer moves the record one box up (capped at box 5); a miss
//! sends it back to box 1. The next review is `now` plus the interval of
//! the box the record lands in.

use super::{Answer, SchedulingResult, SpacedRepetitionAlgorithm};
use crate::error::{Error, Result};
use crate::types::LeitnerBox;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Longest accepted interval, ten years.
pub const MAX_INTERVAL_MS: i64 = 3_650 * DAY_MS;

/// Leitner scheduler with configurable per-box intervals.
///
/// Intervals must lie in `1..=MAX_INTERVAL_MS`; both [`Leitner::new`] and
/// deserialization enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LeitnerSettings")]
pub struct Leitner {
    intervals_ms: [i64; 5],
    relearn_ms: i64,
}

#[derive(Deserialize)]
#[serde(default)]
struct LeitnerSettings {
    intervals_ms: [i64; 5],
    relearn_ms: i64,
}

impl Default for LeitnerSettings {
    fn default() -> Self {
        let Leitner {
            intervals_ms,
            relearn_ms,
        } = Leitner::default();
        Self {
            intervals_ms,
            relearn_ms,
        }
    }
}

impl TryFrom<LeitnerSettings> for Leitner {
    type Error = Error;

    fn try_from(settings: LeitnerSettings) -> Result<Self> {
        Self::new(settings.intervals_ms, settings.relearn_ms)
    }
}

impl Default for Leitner {
    fn default() -> Self {
        Self {
            intervals_ms: [HOUR_MS, DAY_MS, 3 * DAY_MS, 7 * DAY_MS, 30 * DAY_MS],
            relearn_ms: HOUR_MS,
        }
    }
}

fn check_interval(name: &str, value: i64) -> Result<()> {
    if (1..=MAX_INTERVAL_MS).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidSchedule(format!(
            "{name} must be between 1 and {MAX_INTERVAL_MS} ms, got {value}"
        )))
    }
}

impl Leitner {
    /// Scheduler with intervals in milliseconds for boxes 1 through 5 and
    /// for a missed answer.
    pub fn new(intervals_ms: [i64; 5], relearn_ms: i64) -> Result<Self> {
        for (index, value) in intervals_ms.iter().enumerate() {
            check_interval(&format!("box {} interval", index + 1), *value)?;
        }
        check_interval("relearn interval", relearn_ms)?;
        Ok(Self {
            intervals_ms,
            relearn_ms,
        })
    }

    pub fn intervals_ms(&self) -> [i64; 5] {
        self.intervals_ms
    }

    pub fn relearn_ms(&self) -> i64 {
        self.relearn_ms
    }

    /// Interval applied when a record lands in `leitner_box`.
    pub fn interval(&self, leitner_box: LeitnerBox) -> Duration {
        Duration::milliseconds(self.intervals_ms[leitner_box.index()])
    }
}

impl SpacedRepetitionAlgorithm for Leitner {
    fn name(&self) -> &'static str {
        "leitner"
    }

    fn schedule(
        &self,
        current: LeitnerBox,
        answer: Answer,
        now: DateTime<Utc>,
    ) -> SchedulingResult {
        let (new_box, wait) = match answer {
            Answer::Knew => {
                let promoted = current.promoted();
                (promoted, self.interval(promoted))
            }
            Answer::Forgot => (LeitnerBox::FIRST, Duration::milliseconds(self.relearn_ms)),
        };

        tracing::trace!(from = %current, to = %new_box, ?answer, "scheduled review");

        // Past the end of the calendar the review is parked at the latest instant.
        let next_review_at = now
            .checked_add_signed(wait)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        SchedulingResult {
            new_box,
            next_review_at,
        }
    }
}
