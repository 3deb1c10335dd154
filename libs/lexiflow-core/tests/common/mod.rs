//! Shared helpers for deck integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Fixed reference time so schedules are reproducible.
pub fn now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
}

pub fn hours_later(hours: i64) -> DateTime<Utc> {
    now() + Duration::hours(hours)
}

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(2024)
}

/// Mixed vocabulary list: one line per supported grammar plus noise.
pub const MIXED_WORDS: &str = "\
hello - привет [хэллоу]
world - мир
apple; яблоко
cat, кот, animals, pets
dog\tсобака\tanimals

   
garbage line without separators
HELLO - привет";
