//! Import text parsers for vocabulary and irregular verbs.
//!
//! # Format
//! One entry per line. Fields are separated by ` - `, `;`, `,` or a tab,
//! depending on the deck kind and the number of fields:
//! ```text
//! hello - привет [хэллоу]
//! apple - эпл - яблоко
//! cat;кот
//! dog, собака, animals, a1
//! go - went - gone - идти [гоу]
//! be - бии - was/were - been - быть
//! ```
//!
//! Each line is tried against an ordered list of grammars; the first one
//! whose shape fits decides the fields. Lines that fit no grammar, or whose
//! required fields come out empty, are dropped without an error.
//!
//! Exports use the fixed-column [`table`] format instead, which carries
//! every field unchanged.

pub mod table;
pub mod verbs;
pub mod vocabulary;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub use table::{parse_verb_table, parse_word_table, write_verb_table, write_word_table};
pub use verbs::{parse_verb_line, parse_verbs};
pub use vocabulary::{parse_csv, parse_word_line, parse_words};

/// A single line grammar: structural match or nothing.
pub(crate) type Grammar<T> = fn(&str) -> Option<T>;

/// How import text is laid out.
///
/// Verb decks read `Text` and `Table`; `Csv` is for vocabulary only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportFormat {
    /// Free-form lines, every grammar is tried.
    #[default]
    Text,
    /// Comma-separated values only; fields past the second are tags.
    Csv,
    /// Tab-separated export rows with fixed columns.
    Table,
}

/// Options applied to a whole import batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Tags added in front of every imported vocabulary entry.
    pub default_tags: Vec<String>,
    pub format: ImportFormat,
}

impl ImportOptions {
    pub fn with_default_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.default_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn csv(mut self) -> Self {
        self.format = ImportFormat::Csv;
        self
    }

    /// Read text produced by a deck export.
    pub fn table(mut self) -> Self {
        self.format = ImportFormat::Table;
        self
    }
}

static DASH_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-+\s*").expect("dash separator regex"));

// Cyrillic letters, whitespace and hyphens only. Decides whether the second
// field of a five-field verb line is a pronunciation hint.
static HINT_SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[а-яё\s-]+$").expect("hint script regex"));

/// Whether a field reads like a pronunciation hint written in the learner's script.
pub fn looks_like_hint(field: &str) -> bool {
    HINT_SCRIPT.is_match(field)
}

/// Split on dash runs (with any surrounding whitespace), trimming each field.
pub(crate) fn split_dashes(line: &str) -> Vec<&str> {
    DASH_SEPARATOR.split(line).map(str::trim).collect()
}

/// Split on a single-character separator, trimming each field.
pub(crate) fn split_on(line: &str, separator: char) -> Vec<&str> {
    line.split(separator).map(str::trim).collect()
}

/// Split raw text into lines on any CR/LF boundary.
pub(crate) fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\r', '\n'])
}

/// Run `line` through `grammars` in order; the first structural match wins.
pub(crate) fn first_match<T>(line: &str, grammars: &[(&'static str, Grammar<T>)]) -> Option<T> {
    grammars.iter().find_map(|(name, grammar)| {
        let parsed = grammar(line)?;
        tracing::trace!(grammar = name, "line matched");
        Some(parsed)
    })
}
