//! Deck statistics.

use crate::types::{LeitnerBox, Record, VocabularyItem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Number of records in each Leitner box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxDistribution {
    pub boxes: [usize; 5],
}

impl BoxDistribution {
    pub fn from_records<R: Record>(records: &[R]) -> Self {
        let mut boxes = [0; 5];
        for record in records {
            boxes[record.leitner_box().index()] += 1;
        }
        Self { boxes }
    }

    pub fn count(&self, leitner_box: LeitnerBox) -> usize {
        self.boxes[leitner_box.index()]
    }

    pub fn total(&self) -> usize {
        self.boxes.iter().sum()
    }

    /// Records still in box 1.
    pub fn new_items(&self) -> usize {
        self.boxes[0]
    }

    /// Records in boxes 2 to 4.
    pub fn in_progress(&self) -> usize {
        self.boxes[1..4].iter().sum()
    }

    /// Records that reached the last box.
    pub fn learned(&self) -> usize {
        self.boxes[4]
    }
}

/// Every tag used in the deck, sorted and without blanks.
pub fn all_tags(records: &[VocabularyItem]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| record.tags.iter())
        .filter(|tag| !tag.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
