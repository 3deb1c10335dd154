//! Starter decks shipped with the library.
//!
//! Both are plain import text, so they go through the same parser and
//! duplicate check as user input.

/// Common words with translations and pronunciation hints.
pub const STARTER_WORDS: &str = include_str!("../assets/starter-words.txt");

/// Frequent irregular verbs with translations and pronunciation hints.
pub const STARTER_VERBS: &str = include_str!("../assets/starter-irregular-verbs.txt");
