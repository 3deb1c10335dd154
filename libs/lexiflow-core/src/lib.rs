//! Core library for vocabulary and irregular-verb flashcards.
//!
//! Provides:
//! - Line parser for free-form word lists and verb tables
//! - Import validation (completeness and duplicate detection)
//! - Leitner box scheduling
//! - Review sessions, multiple-choice quizzes and deck statistics
//! - The `RecordStore` interface with an in-memory implementation

pub mod algorithm;
pub mod deck;
pub mod error;
pub mod parser;
pub mod quiz;
pub mod session;
pub mod starter;
pub mod stats;
pub mod store;
pub mod types;
pub mod validation;

pub use algorithm::{advance, Answer, Leitner, SchedulingResult, SpacedRepetitionAlgorithm};
pub use deck::{Deck, DeckKind, ImportReport, VerbDeck, VocabularyDeck};
pub use error::{Error, Result, StoreError};
pub use parser::{
    parse_csv, parse_verb_line, parse_verb_table, parse_verbs, parse_word_line, parse_word_table,
    parse_words, write_verb_table, write_word_table, ImportFormat, ImportOptions,
};
pub use quiz::{MultipleChoice, VerbForm, PLACEHOLDER_OPTION};
pub use session::{select_session, ReviewSession, SessionOptions};
pub use stats::{all_tags, BoxDistribution};
pub use store::{MemoryStore, RecordStore};
pub use types::{
    LeitnerBox, NewVerbItem, NewVocabularyItem, ParsedVerb, ParsedWord, Record, RecordId,
    SchedulePatch, VerbItem, VocabularyItem,
};
pub use validation::{validate, Candidate, DedupKey, Validation};
