//! Review session selection.

use crate::types::Record;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Options for building a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Keep only records sharing at least one of these tags. Empty means no filter.
    pub tags: Vec<String>,
    /// Randomise the order (test modes).
    pub shuffle: bool,
}

impl SessionOptions {
    pub fn shuffled() -> Self {
        Self {
            shuffle: true,
            ..Self::default()
        }
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Pick the records for one session.
///
/// Due records (`next_review_at <= now`) are used when there are any,
/// otherwise the whole list, so a non-empty store always yields something
/// to study. The tag filter applies after that choice. Storage order is
/// kept unless shuffling was asked for.
pub fn select_session<R, G>(
    records: &[R],
    now: DateTime<Utc>,
    options: &SessionOptions,
    rng: &mut G,
) -> Vec<R>
where
    R: Record,
    G: Rng + ?Sized,
{
    let due: Vec<&R> = records.iter().filter(|r| r.is_due(now)).collect();
    let pool = if due.is_empty() {
        tracing::debug!(total = records.len(), "nothing due, falling back to all records");
        records.iter().collect()
    } else {
        due
    };

    let mut selected: Vec<R> = pool
        .into_iter()
        .filter(|r| r.matches_tags(&options.tags))
        .cloned()
        .collect();

    if options.shuffle {
        selected.shuffle(rng);
    }
    selected
}

/// Ordered working set for one pass, with a cursor.
///
/// The cursor only moves through [`ReviewSession::advance`], which the deck
/// calls once the review outcome has been written to the store.
#[derive(Debug, Clone)]
pub struct ReviewSession<R> {
    items: Vec<R>,
    position: usize,
}

impl<R: Record> ReviewSession<R> {
    pub fn new(items: Vec<R>) -> Self {
        Self { items, position: 0 }
    }

    pub fn current(&self) -> Option<&R> {
        self.items.get(self.position)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.items.len().saturating_sub(self.position)
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.items.len()
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub(crate) fn current_mut(&mut self) -> Option<&mut R> {
        self.items.get_mut(self.position)
    }

    pub(crate) fn advance(&mut self) {
        if !self.is_finished() {
            self.position += 1;
        }
    }
}
