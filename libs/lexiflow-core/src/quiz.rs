//! Multiple-choice questions for test mode.

use crate::types::{Record, RecordId, VerbItem, VocabularyItem};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Filler used when the deck cannot supply three distinct wrong answers.
pub const PLACEHOLDER_OPTION: &str = "Неизвестно";

/// Number of wrong answers offered next to the correct one.
pub const WRONG_OPTIONS: usize = 3;

/// Which verb form a verb test asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbForm {
    PastSimple,
    PastParticiple,
}

impl VerbForm {
    /// Pick one form at random; a session keeps it for every question.
    pub fn random<G: Rng + ?Sized>(rng: &mut G) -> Self {
        if rng.gen_bool(0.5) {
            Self::PastSimple
        } else {
            Self::PastParticiple
        }
    }

    pub fn of(self, verb: &VerbItem) -> &str {
        match self {
            Self::PastSimple => &verb.past_simple,
            Self::PastParticiple => &verb.past_participle,
        }
    }
}

/// One question with its shuffled answer options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoice {
    pub record_id: RecordId,
    pub prompt: String,
    pub correct: String,
    pub options: Vec<String>,
}

impl MultipleChoice {
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct
    }
}

/// Build the option list for `correct`.
///
/// `pool` holds the answer field of every other stored record. Values equal
/// to `correct` are dropped, the rest are shuffled and the first three
/// distinct ones kept, padding with [`PLACEHOLDER_OPTION`]. The correct answer
/// joins them and the four options are shuffled again.
pub fn build_options<'a, I, G>(correct: &str, pool: I, rng: &mut G) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
    G: Rng + ?Sized,
{
    let mut candidates: Vec<&str> = pool
        .into_iter()
        .filter(|value| *value != correct)
        .collect();
    candidates.shuffle(rng);

    let mut wrong: Vec<String> = Vec::with_capacity(WRONG_OPTIONS);
    for value in candidates {
        if wrong.len() == WRONG_OPTIONS {
            break;
        }
        if !wrong.iter().any(|w| w == value) {
            wrong.push(value.to_string());
        }
    }
    while wrong.len() < WRONG_OPTIONS {
        wrong.push(PLACEHOLDER_OPTION.to_string());
    }

    let mut options = Vec::with_capacity(WRONG_OPTIONS + 1);
    options.push(correct.to_string());
    options.extend(wrong);
    options.shuffle(rng);
    options
}

/// Ask for the translation of a vocabulary term.
pub fn vocabulary_question<G: Rng + ?Sized>(
    item: &VocabularyItem,
    all: &[VocabularyItem],
    rng: &mut G,
) -> MultipleChoice {
    let pool = all
        .iter()
        .filter(|other| other.id() != item.id())
        .map(|other| other.translation.as_str());

    MultipleChoice {
        record_id: item.id,
        prompt: item.term.clone(),
        correct: item.translation.clone(),
        options: build_options(&item.translation, pool, rng),
    }
}

/// Ask for one past form of an irregular verb.
pub fn verb_question<G: Rng + ?Sized>(
    verb: &VerbItem,
    form: VerbForm,
    all: &[VerbItem],
    rng: &mut G,
) -> MultipleChoice {
    let correct = form.of(verb);
    let pool = all
        .iter()
        .filter(|other| other.id() != verb.id())
        .map(|other| form.of(other));

    MultipleChoice {
        record_id: verb.id,
        prompt: verb.infinitive.clone(),
        correct: correct.to_string(),
        options: build_options(correct, pool, rng),
    }
}
