//! Core types for vocabulary and irregular-verb decks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the record store on insert.
pub type RecordId = i64;

/// Leitner box number, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LeitnerBox(u8);

impl LeitnerBox {
    /// Box for new and forgotten items (reviewed most often).
    pub const FIRST: Self = Self(1);
    /// Ceiling box (reviewed least often).
    pub const LAST: Self = Self(5);

    /// Create from a raw box number, rejecting anything outside `1..=5`.
    pub fn new(value: u8) -> Option<Self> {
        (Self::FIRST.0..=Self::LAST.0)
            .contains(&value)
            .then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Next box up, saturating at [`LeitnerBox::LAST`].
    pub fn promoted(self) -> Self {
        Self((self.0 + 1).min(Self::LAST.0))
    }

    /// Zero-based position, handy for indexing per-box tables.
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl Default for LeitnerBox {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u8> for LeitnerBox {
    type Error = crate::error::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(crate::error::Error::InvalidBox(value))
    }
}

impl From<LeitnerBox> for u8 {
    fn from(value: LeitnerBox) -> Self {
        value.0
    }
}

impl fmt::Display for LeitnerBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The only partial update the core issues: box and due time travel together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePatch {
    pub leitner_box: LeitnerBox,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub next_review_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

/// Stored vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: RecordId,
    pub term: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation_hint: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub leitner_box: LeitnerBox,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub next_review_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

/// Vocabulary entry before the store has assigned an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVocabularyItem {
    pub term: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation_hint: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub leitner_box: LeitnerBox,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub next_review_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl NewVocabularyItem {
    /// Fresh entry in box 1, due immediately.
    pub fn from_parsed(parsed: ParsedWord, now: DateTime<Utc>) -> Self {
        Self {
            term: parsed.term,
            translation: parsed.translation,
            pronunciation_hint: parsed.pronunciation_hint,
            tags: parsed.tags,
            leitner_box: LeitnerBox::FIRST,
            next_review_at: now,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Stored irregular verb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbItem {
    pub id: RecordId,
    pub infinitive: String,
    pub past_simple: String,
    pub past_participle: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation_hint: Option<String>,
    pub leitner_box: LeitnerBox,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub next_review_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

/// Irregular verb before the store has assigned an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVerbItem {
    pub infinitive: String,
    pub past_simple: String,
    pub past_participle: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation_hint: Option<String>,
    pub leitner_box: LeitnerBox,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub next_review_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl NewVerbItem {
    /// Fresh verb in box 1, due immediately.
    pub fn from_parsed(parsed: ParsedVerb, now: DateTime<Utc>) -> Self {
        Self {
            infinitive: parsed.infinitive,
            past_simple: parsed.past_simple,
            past_participle: parsed.past_participle,
            translation: parsed.translation,
            pronunciation_hint: parsed.pronunciation_hint,
            leitner_box: LeitnerBox::FIRST,
            next_review_at: now,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Vocabulary candidate produced by the line parser (or a manual form).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedWord {
    pub term: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation_hint: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ParsedWord {
    pub fn new(term: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            translation: translation.into(),
            ..Default::default()
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.pronunciation_hint = non_empty(hint.into());
        self
    }

    /// Copy with every field trimmed, as a hand-typed entry is stored.
    pub fn trimmed(self) -> Self {
        Self {
            term: self.term.trim().to_string(),
            translation: self.translation.trim().to_string(),
            pronunciation_hint: self.pronunciation_hint.and_then(non_empty),
            tags: Vec::new(),
        }
        .with_tags(self.tags)
    }

    /// Append tags, skipping blanks and ones already present.
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        for tag in tags {
            push_tag(&mut self.tags, tag.into());
        }
        self
    }
}

/// Irregular-verb candidate produced by the line parser (or a manual form).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParsedVerb {
    pub infinitive: String,
    pub past_simple: String,
    pub past_participle: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation_hint: Option<String>,
}

impl ParsedVerb {
    pub fn new(
        infinitive: impl Into<String>,
        past_simple: impl Into<String>,
        past_participle: impl Into<String>,
        translation: impl Into<String>,
    ) -> Self {
        Self {
            infinitive: infinitive.into(),
            past_simple: past_simple.into(),
            past_participle: past_participle.into(),
            translation: translation.into(),
            pronunciation_hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.pronunciation_hint = non_empty(hint.into());
        self
    }

    /// Copy with every field trimmed, as a hand-typed entry is stored.
    pub fn trimmed(self) -> Self {
        Self {
            infinitive: self.infinitive.trim().to_string(),
            past_simple: self.past_simple.trim().to_string(),
            past_participle: self.past_participle.trim().to_string(),
            translation: self.translation.trim().to_string(),
            pronunciation_hint: self.pronunciation_hint.and_then(non_empty),
        }
    }
}

/// Common view over stored records of either kind.
pub trait Record: Clone {
    /// Record-without-id accepted by the store.
    type New: Clone;

    fn id(&self) -> RecordId;
    fn leitner_box(&self) -> LeitnerBox;
    fn next_review_at(&self) -> DateTime<Utc>;

    /// Whether this record passes a tag filter. An empty filter passes everything.
    fn matches_tags(&self, _filter: &[String]) -> bool {
        true
    }

    fn from_new(id: RecordId, new: Self::New) -> Self;

    fn apply(&mut self, patch: &SchedulePatch);

    fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at() <= now
    }
}

impl Record for VocabularyItem {
    type New = NewVocabularyItem;

    fn id(&self) -> RecordId {
        self.id
    }

    fn leitner_box(&self) -> LeitnerBox {
        self.leitner_box
    }

    fn next_review_at(&self) -> DateTime<Utc> {
        self.next_review_at
    }

    fn matches_tags(&self, filter: &[String]) -> bool {
        filter.is_empty() || self.tags.iter().any(|tag| filter.contains(tag))
    }

    fn from_new(id: RecordId, new: NewVocabularyItem) -> Self {
        Self {
            id,
            term: new.term,
            translation: new.translation,
            pronunciation_hint: new.pronunciation_hint,
            tags: new.tags,
            leitner_box: new.leitner_box,
            next_review_at: new.next_review_at,
            created_at: new.created_at,
            updated_at: new.updated_at,
        }
    }

    fn apply(&mut self, patch: &SchedulePatch) {
        self.leitner_box = patch.leitner_box;
        self.next_review_at = patch.next_review_at;
        self.updated_at = patch.updated_at;
    }
}

impl Record for VerbItem {
    type New = NewVerbItem;

    fn id(&self) -> RecordId {
        self.id
    }

    fn leitner_box(&self) -> LeitnerBox {
        self.leitner_box
    }

    fn next_review_at(&self) -> DateTime<Utc> {
        self.next_review_at
    }

    fn from_new(id: RecordId, new: NewVerbItem) -> Self {
        Self {
            id,
            infinitive: new.infinitive,
            past_simple: new.past_simple,
            past_participle: new.past_participle,
            translation: new.translation,
            pronunciation_hint: new.pronunciation_hint,
            leitner_box: new.leitner_box,
            next_review_at: new.next_review_at,
            created_at: new.created_at,
            updated_at: new.updated_at,
        }
    }

    fn apply(&mut self, patch: &SchedulePatch) {
        self.leitner_box = patch.leitner_box;
        self.next_review_at = patch.next_review_at;
        self.updated_at = patch.updated_at;
    }
}

pub(crate) fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn push_tag(tags: &mut Vec<String>, tag: String) {
    let tag = tag.trim();
    if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}
