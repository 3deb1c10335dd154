//! Deck service: import pipeline, review loop and statistics over an injected store.

use crate::algorithm::{Answer, Leitner, SchedulingResult, SpacedRepetitionAlgorithm};
use crate::error::{Error, Result};
use crate::parser::{self, ImportFormat, ImportOptions};
use crate::quiz::{self, MultipleChoice, VerbForm};
use crate::session::{select_session, ReviewSession, SessionOptions};
use crate::starter;
use crate::stats::{self, BoxDistribution};
use crate::store::RecordStore;
use crate::types::{
    NewVerbItem, NewVocabularyItem, ParsedVerb, ParsedWord, Record, RecordId, VerbItem,
    VocabularyItem,
};
use crate::validation::{validate, Candidate, DedupKey};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Kind-specific glue between a record type, its candidate and its text format.
pub trait DeckKind: Record + DedupKey {
    type Candidate: Candidate<Key = <Self as DedupKey>::Key> + Clone + fmt::Debug;

    /// Short name used in log output.
    const LABEL: &'static str;

    /// Text of the shipped starter deck.
    fn starter_text() -> &'static str;

    fn parse_batch(text: &str, options: &ImportOptions) -> Vec<Self::Candidate>;

    fn prepare(candidate: Self::Candidate) -> Self::Candidate;

    fn create(candidate: Self::Candidate, now: DateTime<Utc>) -> Self::New;

    fn describe(candidate: &Self::Candidate) -> String;

    /// The record's content fields, as an import would have produced them.
    fn to_candidate(&self) -> Self::Candidate;

    fn write_table(candidates: &[Self::Candidate]) -> csv::Result<String>;
}

impl DeckKind for VocabularyItem {
    type Candidate = ParsedWord;

    const LABEL: &'static str = "vocabulary";

    fn starter_text() -> &'static str {
        starter::STARTER_WORDS
    }

    fn parse_batch(text: &str, options: &ImportOptions) -> Vec<ParsedWord> {
        parser::parse_words(text, options)
    }

    fn prepare(candidate: ParsedWord) -> ParsedWord {
        candidate.trimmed()
    }

    fn create(candidate: ParsedWord, now: DateTime<Utc>) -> NewVocabularyItem {
        NewVocabularyItem::from_parsed(candidate, now)
    }

    fn describe(candidate: &ParsedWord) -> String {
        format!("{} - {}", candidate.term, candidate.translation)
    }

    fn to_candidate(&self) -> ParsedWord {
        ParsedWord {
            term: self.term.clone(),
            translation: self.translation.clone(),
            pronunciation_hint: self.pronunciation_hint.clone(),
            tags: self.tags.clone(),
        }
    }

    fn write_table(candidates: &[ParsedWord]) -> csv::Result<String> {
        parser::write_word_table(candidates)
    }
}

impl DeckKind for VerbItem {
    type Candidate = ParsedVerb;

    const LABEL: &'static str = "irregular_verbs";

    fn starter_text() -> &'static str {
        starter::STARTER_VERBS
    }

    fn parse_batch(text: &str, options: &ImportOptions) -> Vec<ParsedVerb> {
        match options.format {
            ImportFormat::Table => parser::parse_verb_table(text),
            ImportFormat::Text | ImportFormat::Csv => parser::parse_verbs(text),
        }
    }

    fn prepare(candidate: ParsedVerb) -> ParsedVerb {
        candidate.trimmed()
    }

    fn create(candidate: ParsedVerb, now: DateTime<Utc>) -> NewVerbItem {
        NewVerbItem::from_parsed(candidate, now)
    }

    fn describe(candidate: &ParsedVerb) -> String {
        candidate.infinitive.clone()
    }

    fn to_candidate(&self) -> ParsedVerb {
        ParsedVerb {
            infinitive: self.infinitive.clone(),
            past_simple: self.past_simple.clone(),
            past_participle: self.past_participle.clone(),
            translation: self.translation.clone(),
            pronunciation_hint: self.pronunciation_hint.clone(),
        }
    }

    fn write_table(candidates: &[ParsedVerb]) -> csv::Result<String> {
        parser::write_verb_table(candidates)
    }
}

/// Outcome of one import batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport<C> {
    /// Candidates produced by the batch parser.
    pub parsed: usize,
    /// Ids of the stored records, in input order.
    pub imported: Vec<RecordId>,
    pub duplicates: Vec<C>,
    pub invalid: Vec<C>,
}

impl<C> ImportReport<C> {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }
}

/// Service object over one record kind.
pub struct Deck<S, R> {
    store: S,
    scheduler: Box<dyn SpacedRepetitionAlgorithm>,
    _kind: PhantomData<R>,
}

pub type VocabularyDeck<S> = Deck<S, VocabularyItem>;
pub type VerbDeck<S> = Deck<S, VerbItem>;

impl<S, R> Deck<S, R>
where
    S: RecordStore<R>,
    R: DeckKind,
{
    /// Deck with the default Leitner intervals.
    pub fn new(store: S) -> Self {
        Self::with_scheduler(store, Box::new(Leitner::default()))
    }

    pub fn with_scheduler(store: S, scheduler: Box<dyn SpacedRepetitionAlgorithm>) -> Self {
        Self {
            store,
            scheduler,
            _kind: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// All stored records in storage order.
    pub fn records(&self) -> Result<Vec<R>> {
        Ok(self.store.list_all()?)
    }

    /// Parse, validate and store the valid part of `text`.
    pub fn import_text(
        &self,
        text: &str,
        options: &ImportOptions,
        now: DateTime<Utc>,
    ) -> Result<ImportReport<R::Candidate>> {
        let candidates = R::parse_batch(text, options);
        self.import_candidates(candidates, now)
    }

    /// Validate already-parsed candidates and store the valid ones.
    pub fn import_candidates(
        &self,
        candidates: Vec<R::Candidate>,
        now: DateTime<Utc>,
    ) -> Result<ImportReport<R::Candidate>> {
        let parsed = candidates.len();
        let existing = self.store.list_all()?;
        let validation = validate(candidates, &existing);

        let imported = if validation.valid.is_empty() {
            Vec::new()
        } else {
            let new_records = validation
                .valid
                .into_iter()
                .map(|candidate| R::create(candidate, now))
                .collect();
            self.store.bulk_insert(new_records)?
        };

        tracing::info!(
            kind = R::LABEL,
            parsed,
            imported = imported.len(),
            duplicates = validation.duplicates.len(),
            invalid = validation.invalid.len(),
            "import finished"
        );

        Ok(ImportReport {
            parsed,
            imported,
            duplicates: validation.duplicates,
            invalid: validation.invalid,
        })
    }

    /// Import the shipped starter deck. Entries already present count as duplicates.
    pub fn import_starter_deck(&self, now: DateTime<Utc>) -> Result<ImportReport<R::Candidate>> {
        self.import_text(R::starter_text(), &ImportOptions::default(), now)
    }

    /// Store one hand-typed entry in box 1, due immediately.
    pub fn add_entry(&self, candidate: R::Candidate, now: DateTime<Utc>) -> Result<RecordId> {
        let candidate = R::prepare(candidate);
        if let Some(field) = candidate.missing_field() {
            return Err(Error::IncompleteEntry { field });
        }

        let key = candidate.dedup_key();
        if self.store.list_all()?.iter().any(|r| r.dedup_key() == key) {
            return Err(Error::DuplicateEntry(R::describe(&candidate)));
        }

        let id = self.store.insert(R::create(candidate, now))?;
        tracing::debug!(kind = R::LABEL, id, "entry added");
        Ok(id)
    }

    /// Build a review session from the current store contents.
    pub fn start_session<G: Rng + ?Sized>(
        &self,
        options: &SessionOptions,
        now: DateTime<Utc>,
        rng: &mut G,
    ) -> Result<ReviewSession<R>> {
        let records = self.store.list_all()?;
        let items = select_session(&records, now, options, rng);
        tracing::debug!(kind = R::LABEL, size = items.len(), "session started");
        Ok(ReviewSession::new(items))
    }

    /// Record the answer for the session's current item.
    ///
    /// The new box and due time are written to the store first; only after
    /// the write succeeds is the in-session copy updated and the cursor moved.
    pub fn review(
        &self,
        session: &mut ReviewSession<R>,
        knew: bool,
        now: DateTime<Utc>,
    ) -> Result<SchedulingResult> {
        let (id, current_box) = session
            .current()
            .map(|item| (item.id(), item.leitner_box()))
            .ok_or(Error::SessionFinished)?;

        let result = self.scheduler.schedule(current_box, Answer::from_bool(knew), now);
        let patch = result.to_patch(now);
        self.store.update(id, &patch)?;

        if let Some(item) = session.current_mut() {
            item.apply(&patch);
        }
        session.advance();

        tracing::debug!(
            kind = R::LABEL,
            id,
            knew,
            algorithm = self.scheduler.name(),
            from = %current_box,
            to = %result.new_box,
            "review recorded"
        );
        Ok(result)
    }

    pub fn delete(&self, id: RecordId) -> Result<()> {
        Ok(self.store.delete(id)?)
    }

    pub fn clear(&self) -> Result<()> {
        self.store.clear()?;
        tracing::info!(kind = R::LABEL, "deck cleared");
        Ok(())
    }

    pub fn stats(&self) -> Result<BoxDistribution> {
        Ok(BoxDistribution::from_records(&self.store.list_all()?))
    }

    /// Every record as a row of the export table.
    ///
    /// Importing the text with [`ImportOptions::table`] into an empty deck
    /// reproduces the content fields and tags of every record.
    pub fn export_text(&self) -> Result<String> {
        let candidates: Vec<R::Candidate> =
            self.store.list_all()?.iter().map(R::to_candidate).collect();
        Ok(R::write_table(&candidates)?)
    }
}

impl<S> Deck<S, VocabularyItem>
where
    S: RecordStore<VocabularyItem>,
{
    /// Multiple-choice translation question for `item`.
    pub fn question<G: Rng + ?Sized>(
        &self,
        item: &VocabularyItem,
        rng: &mut G,
    ) -> Result<MultipleChoice> {
        let all = self.store.list_all()?;
        Ok(quiz::vocabulary_question(item, &all, rng))
    }

    /// Tags available for filtering sessions.
    pub fn tags(&self) -> Result<Vec<String>> {
        Ok(stats::all_tags(&self.store.list_all()?))
    }
}

impl<S> Deck<S, VerbItem>
where
    S: RecordStore<VerbItem>,
{
    /// Multiple-choice question asking for `form` of `verb`.
    pub fn question<G: Rng + ?Sized>(
        &self,
        verb: &VerbItem,
        form: VerbForm,
        rng: &mut G,
    ) -> Result<MultipleChoice> {
        let all = self.store.list_all()?;
        Ok(quiz::verb_question(verb, form, &all, rng))
    }
}
