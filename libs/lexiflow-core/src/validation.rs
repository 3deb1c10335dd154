//! Validation and deduplication of import batches.

use crate::types::{ParsedVerb, ParsedWord, VerbItem, VocabularyItem};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

/// Anything that carries a case-insensitive identity.
pub trait DedupKey {
    type Key: Eq + Hash;

    fn dedup_key(&self) -> Self::Key;
}

/// An import candidate: a dedup key plus a completeness check.
pub trait Candidate: DedupKey {
    /// Name of the first required field that is blank, if any.
    fn missing_field(&self) -> Option<&'static str>;

    fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }
}

fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

fn first_blank(fields: &[(&'static str, &str)]) -> Option<&'static str> {
    fields
        .iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
}

impl DedupKey for ParsedWord {
    type Key = (String, String);

    fn dedup_key(&self) -> Self::Key {
        (fold(&self.term), fold(&self.translation))
    }
}

impl Candidate for ParsedWord {
    fn missing_field(&self) -> Option<&'static str> {
        first_blank(&[
            ("term", self.term.as_str()),
            ("translation", self.translation.as_str()),
        ])
    }
}

impl DedupKey for VocabularyItem {
    type Key = (String, String);

    fn dedup_key(&self) -> Self::Key {
        (fold(&self.term), fold(&self.translation))
    }
}

impl DedupKey for ParsedVerb {
    type Key = String;

    fn dedup_key(&self) -> Self::Key {
        fold(&self.infinitive)
    }
}

impl Candidate for ParsedVerb {
    fn missing_field(&self) -> Option<&'static str> {
        first_blank(&[
            ("infinitive", self.infinitive.as_str()),
            ("past_simple", self.past_simple.as_str()),
            ("past_participle", self.past_participle.as_str()),
            ("translation", self.translation.as_str()),
        ])
    }
}

impl DedupKey for VerbItem {
    type Key = String;

    fn dedup_key(&self) -> Self::Key {
        fold(&self.infinitive)
    }
}

/// Three-way partition of a candidate batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation<C> {
    pub valid: Vec<C>,
    pub duplicates: Vec<C>,
    pub invalid: Vec<C>,
}

impl<C> Default for Validation<C> {
    fn default() -> Self {
        Self {
            valid: Vec::new(),
            duplicates: Vec::new(),
            invalid: Vec::new(),
        }
    }
}

impl<C> Validation<C> {
    /// Number of candidates that went in.
    pub fn total(&self) -> usize {
        self.valid.len() + self.duplicates.len() + self.invalid.len()
    }
}

/// Partition `candidates` against each other and against `existing`.
///
/// Candidates are visited in order. A blank required field makes a candidate
/// invalid; a key already seen (stored or earlier in the same batch) makes it
/// a duplicate; anything else is valid and its key joins the seen set.
pub fn validate<C, R>(candidates: Vec<C>, existing: &[R]) -> Validation<C>
where
    C: Candidate,
    R: DedupKey<Key = C::Key>,
{
    let mut seen: HashSet<C::Key> = existing.iter().map(|record| record.dedup_key()).collect();
    let mut result = Validation::default();

    for candidate in candidates {
        if !candidate.is_complete() {
            result.invalid.push(candidate);
            continue;
        }

        if seen.insert(candidate.dedup_key()) {
            result.valid.push(candidate);
        } else {
            result.duplicates.push(candidate);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_verbs, parse_words, ImportOptions};
    use crate::types::{NewVerbItem, NewVocabularyItem, Record};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[test]
    fn in_batch_duplicates_are_caught() {
        let words = parse_words(
            "hello - привет\nworld - мир\nhello - привет",
            &ImportOptions::default(),
        );
        assert_eq!(words.len(), 3);

        let result = validate::<_, VocabularyItem>(words, &[]);
        assert_eq!(
            result.valid,
            vec![ParsedWord::new("hello", "привет"), ParsedWord::new("world", "мир")]
        );
        assert_eq!(result.duplicates, vec![ParsedWord::new("hello", "привет")]);
        assert!(result.invalid.is_empty());
    }

    #[test]
    fn verb_key_ignores_case() {
        let verbs = parse_verbs("Go - went - gone - идти\ngo - WENT - GONE - Идти");
        let result = validate::<_, VerbItem>(verbs, &[]);
        assert_eq!(result.valid.len(), 1);
        assert_eq!(result.duplicates.len(), 1);
    }

    #[test]
    fn word_key_is_term_and_translation() {
        let words = vec![
            ParsedWord::new("bank", "банк"),
            ParsedWord::new("bank", "берег"),
            ParsedWord::new("BANK", "Банк"),
        ];
        let result = validate::<_, VocabularyItem>(words, &[]);
        assert_eq!(result.valid.len(), 2);
        assert_eq!(result.duplicates, vec![ParsedWord::new("BANK", "Банк")]);
    }

    #[test]
    fn stored_records_count_as_seen() {
        let stored = VocabularyItem::from_new(
            7,
            NewVocabularyItem::from_parsed(ParsedWord::new("Hello", "Привет"), Utc::now()),
        );
        let result = validate(vec![ParsedWord::new("hello", "привет")], &[stored]);
        assert!(result.valid.is_empty());
        assert_eq!(result.duplicates.len(), 1);
    }

    #[test]
    fn blank_fields_are_invalid_before_dedup() {
        let stored = VerbItem::from_new(
            1,
            NewVerbItem::from_parsed(ParsedVerb::new("go", "went", "gone", "идти"), Utc::now()),
        );
        let verbs = vec![
            ParsedVerb::new("go", " ", "gone", "идти"),
            ParsedVerb::new("go", "went", "gone", "идти"),
            ParsedVerb::new("take", "took", "taken", "брать"),
        ];
        let result = validate(verbs, &[stored]);
        assert_eq!(result.invalid.len(), 1);
        assert_eq!(result.duplicates.len(), 1);
        assert_eq!(result.valid.len(), 1);
        assert_eq!(result.total(), 3);
    }

    #[test]
    fn missing_field_names_first_blank() {
        assert_eq!(ParsedWord::new("", "").missing_field(), Some("term"));
        assert_eq!(ParsedWord::new("a", " ").missing_field(), Some("translation"));
        assert_eq!(
            ParsedVerb::new("go", "went", "", "").missing_field(),
            Some("past_participle")
        );
    }

    #[test]
    fn partition_covers_every_candidate() {
        let words = vec![
            ParsedWord::new("a", "1"),
            ParsedWord::new("", "2"),
            ParsedWord::new("A", "1"),
            ParsedWord::new("b", ""),
            ParsedWord::new("c", "3"),
        ];
        let result = validate::<_, VocabularyItem>(words, &[]);
        assert_eq!(result.total(), 5);
        assert_eq!(
            (result.valid.len(), result.duplicates.len(), result.invalid.len()),
            (2, 1, 2)
        );
    }
}
