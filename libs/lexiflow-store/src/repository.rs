//! SQLite implementation of the record stores.

use crate::error::DbError;
use crate::schema::{SCHEMA, SCHEMA_VERSION};
use chrono::{DateTime, Utc};
use lexiflow_core::{
    LeitnerBox, NewVerbItem, NewVocabularyItem, RecordId, RecordStore, SchedulePatch, StoreError,
    VerbItem, VocabularyItem,
};
use rusqlite::{params, Connection, Row};
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

const WORD_COLUMNS: &str = "id, term, translation, pronunciation_hint, tags, leitner_box, next_review_at, created_at, updated_at";

const VERB_COLUMNS: &str = "id, infinitive, past_simple, past_participle, translation, pronunciation_hint, leitner_box, next_review_at, created_at, updated_at";

/// SQLite-backed store for both record kinds.
///
/// Implements `RecordStore` for vocabulary and verbs on the same connection;
/// pass `&store` to each deck to share it.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        self.conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<i32> {
        Ok(self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    fn list_words(&self) -> Result<Vec<VocabularyItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {WORD_COLUMNS} FROM words ORDER BY id"))?;
        let rows = stmt
            .query_map([], WordRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(WordRow::into_item).collect()
    }

    fn insert_word(conn: &Connection, word: &NewVocabularyItem) -> Result<RecordId> {
        conn.prepare_cached(
            "INSERT INTO words (term, translation, pronunciation_hint, tags, leitner_box, next_review_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?
        .execute(params![
            word.term,
            word.translation,
            word.pronunciation_hint,
            serde_json::to_string(&word.tags)?,
            word.leitner_box.get(),
            word.next_review_at.timestamp_millis(),
            word.created_at.timestamp_millis(),
            word.updated_at.timestamp_millis(),
        ])?;
        Ok(conn.last_insert_rowid())
    }

    fn list_verbs(&self) -> Result<Vec<VerbItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {VERB_COLUMNS} FROM irregular_verbs ORDER BY id"
        ))?;
        let rows = stmt
            .query_map([], VerbRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(VerbRow::into_item).collect()
    }

    fn insert_verb(conn: &Connection, verb: &NewVerbItem) -> Result<RecordId> {
        conn.prepare_cached(
            "INSERT INTO irregular_verbs (infinitive, past_simple, past_participle, translation, pronunciation_hint, leitner_box, next_review_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )?
        .execute(params![
            verb.infinitive,
            verb.past_simple,
            verb.past_participle,
            verb.translation,
            verb.pronunciation_hint,
            verb.leitner_box.get(),
            verb.next_review_at.timestamp_millis(),
            verb.created_at.timestamp_millis(),
            verb.updated_at.timestamp_millis(),
        ])?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert every record in one transaction; nothing is kept on failure.
    fn insert_all<T>(
        &self,
        records: &[T],
        insert: fn(&Connection, &T) -> Result<RecordId>,
    ) -> Result<Vec<RecordId>> {
        let tx = self.conn.unchecked_transaction()?;
        let ids = records
            .iter()
            .map(|record| insert(&tx, record))
            .collect::<Result<Vec<_>>>()?;
        tx.commit()?;
        Ok(ids)
    }

    fn update_schedule(&self, table: &str, id: RecordId, patch: &SchedulePatch) -> Result<()> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE {table} SET leitner_box = ?1, next_review_at = ?2, updated_at = ?3 WHERE id = ?4"
            ),
            params![
                patch.leitner_box.get(),
                patch.next_review_at.timestamp_millis(),
                patch.updated_at.timestamp_millis(),
                id
            ],
        )?;
        if changed == 0 {
            return Err(DbError::NotFound(id));
        }
        Ok(())
    }

    fn delete_row(&self, table: &str, id: RecordId) -> Result<()> {
        let changed = self
            .conn
            .execute(&format!("DELETE FROM {table} WHERE id = ?1"), params![id])?;
        if changed == 0 {
            return Err(DbError::NotFound(id));
        }
        Ok(())
    }

    fn clear_table(&self, table: &str) -> Result<()> {
        let removed = self.conn.execute(&format!("DELETE FROM {table}"), [])?;
        tracing::debug!(table, removed, "table cleared");
        Ok(())
    }
}

impl RecordStore<VocabularyItem> for SqliteStore {
    fn list_all(&self) -> std::result::Result<Vec<VocabularyItem>, StoreError> {
        Ok(self.list_words()?)
    }

    fn insert(&self, record: NewVocabularyItem) -> std::result::Result<RecordId, StoreError> {
        Ok(Self::insert_word(&self.conn, &record)?)
    }

    fn bulk_insert(
        &self,
        records: Vec<NewVocabularyItem>,
    ) -> std::result::Result<Vec<RecordId>, StoreError> {
        Ok(self.insert_all(&records, Self::insert_word)?)
    }

    fn update(&self, id: RecordId, patch: &SchedulePatch) -> std::result::Result<(), StoreError> {
        Ok(self.update_schedule("words", id, patch)?)
    }

    fn delete(&self, id: RecordId) -> std::result::Result<(), StoreError> {
        Ok(self.delete_row("words", id)?)
    }

    fn clear(&self) -> std::result::Result<(), StoreError> {
        Ok(self.clear_table("words")?)
    }
}

impl RecordStore<VerbItem> for SqliteStore {
    fn list_all(&self) -> std::result::Result<Vec<VerbItem>, StoreError> {
        Ok(self.list_verbs()?)
    }

    fn insert(&self, record: NewVerbItem) -> std::result::Result<RecordId, StoreError> {
        Ok(Self::insert_verb(&self.conn, &record)?)
    }

    fn bulk_insert(
        &self,
        records: Vec<NewVerbItem>,
    ) -> std::result::Result<Vec<RecordId>, StoreError> {
        Ok(self.insert_all(&records, Self::insert_verb)?)
    }

    fn update(&self, id: RecordId, patch: &SchedulePatch) -> std::result::Result<(), StoreError> {
        Ok(self.update_schedule("irregular_verbs", id, patch)?)
    }

    fn delete(&self, id: RecordId) -> std::result::Result<(), StoreError> {
        Ok(self.delete_row("irregular_verbs", id)?)
    }

    fn clear(&self) -> std::result::Result<(), StoreError> {
        Ok(self.clear_table("irregular_verbs")?)
    }
}

/// Raw `words` row before range and encoding checks.
struct WordRow {
    id: RecordId,
    term: String,
    translation: String,
    pronunciation_hint: Option<String>,
    tags: String,
    leitner_box: u8,
    next_review_at: i64,
    created_at: i64,
    updated_at: i64,
}

impl WordRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            term: row.get(1)?,
            translation: row.get(2)?,
            pronunciation_hint: row.get(3)?,
            tags: row.get(4)?,
            leitner_box: row.get(5)?,
            next_review_at: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn into_item(self) -> Result<VocabularyItem> {
        Ok(VocabularyItem {
            id: self.id,
            term: self.term,
            translation: self.translation,
            pronunciation_hint: self.pronunciation_hint,
            tags: serde_json::from_str(&self.tags)?,
            leitner_box: leitner_box(self.id, self.leitner_box)?,
            next_review_at: timestamp(self.id, self.next_review_at)?,
            created_at: timestamp(self.id, self.created_at)?,
            updated_at: timestamp(self.id, self.updated_at)?,
        })
    }
}

/// Raw `irregular_verbs` row before range checks.
struct VerbRow {
    id: RecordId,
    infinitive: String,
    past_simple: String,
    past_participle: String,
    translation: String,
    pronunciation_hint: Option<String>,
    leitner_box: u8,
    next_review_at: i64,
    created_at: i64,
    updated_at: i64,
}

impl VerbRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            infinitive: row.get(1)?,
            past_simple: row.get(2)?,
            past_participle: row.get(3)?,
            translation: row.get(4)?,
            pronunciation_hint: row.get(5)?,
            leitner_box: row.get(6)?,
            next_review_at: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn into_item(self) -> Result<VerbItem> {
        Ok(VerbItem {
            id: self.id,
            infinitive: self.infinitive,
            past_simple: self.past_simple,
            past_participle: self.past_participle,
            translation: self.translation,
            pronunciation_hint: self.pronunciation_hint,
            leitner_box: leitner_box(self.id, self.leitner_box)?,
            next_review_at: timestamp(self.id, self.next_review_at)?,
            created_at: timestamp(self.id, self.created_at)?,
            updated_at: timestamp(self.id, self.updated_at)?,
        })
    }
}

fn leitner_box(id: RecordId, value: u8) -> Result<LeitnerBox> {
    LeitnerBox::new(value)
        .ok_or_else(|| DbError::InvalidData(format!("record {id}: box {value} out of range")))
}

fn timestamp(id: RecordId, millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| DbError::InvalidData(format!("record {id}: bad timestamp {millis}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexiflow_core::{ParsedVerb, ParsedWord};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_123).unwrap()
    }

    fn word(term: &str, tags: &[&str]) -> NewVocabularyItem {
        NewVocabularyItem::from_parsed(
            ParsedWord::new(term, "перевод")
                .with_hint("хинт")
                .with_tags(tags.iter().copied()),
            now(),
        )
    }

    fn verb(infinitive: &str) -> NewVerbItem {
        NewVerbItem::from_parsed(ParsedVerb::new(infinitive, "x", "y", "z"), now())
    }

    fn words(store: &SqliteStore) -> Vec<VocabularyItem> {
        RecordStore::<VocabularyItem>::list_all(store).unwrap()
    }

    #[test]
    fn schema_version_is_recorded() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn word_fields_survive_a_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id =
            RecordStore::<VocabularyItem>::insert(&store, word("cat", &["animals", "a1"])).unwrap();

        let stored = words(&store).remove(0);
        assert_eq!(
            stored,
            VocabularyItem {
                id,
                term: "cat".into(),
                translation: "перевод".into(),
                pronunciation_hint: Some("хинт".into()),
                tags: vec!["animals".into(), "a1".into()],
                leitner_box: LeitnerBox::FIRST,
                next_review_at: now(),
                created_at: now(),
                updated_at: now(),
            }
        );
    }

    #[test]
    fn tables_are_independent() {
        let store = SqliteStore::open_in_memory().unwrap();
        RecordStore::<VocabularyItem>::insert(&store, word("cat", &[])).unwrap();
        RecordStore::<VerbItem>::insert(&store, verb("go")).unwrap();
        RecordStore::<VerbItem>::clear(&store).unwrap();

        assert_eq!(words(&store).len(), 1);
        assert!(RecordStore::<VerbItem>::list_all(&store).unwrap().is_empty());
    }

    #[test]
    fn bulk_insert_keeps_input_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        let ids =
            RecordStore::<VerbItem>::bulk_insert(&store, vec![verb("be"), verb("do"), verb("go")])
                .unwrap();
        assert_eq!(ids, vec![1, 2, 3]);

        let names: Vec<_> = RecordStore::<VerbItem>::list_all(&store)
            .unwrap()
            .into_iter()
            .map(|v| v.infinitive)
            .collect();
        assert_eq!(names, vec!["be", "do", "go"]);
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let store = SqliteStore::open_in_memory().unwrap();
        RecordStore::<VocabularyItem>::insert(&store, word("a", &[])).unwrap();
        RecordStore::<VocabularyItem>::clear(&store).unwrap();
        assert_eq!(RecordStore::<VocabularyItem>::insert(&store, word("b", &[])).unwrap(), 2);
    }

    #[test]
    fn update_writes_schedule_only() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = RecordStore::<VocabularyItem>::insert(&store, word("cat", &["animals"])).unwrap();
        let later = now() + chrono::Duration::days(3);
        let patch = SchedulePatch {
            leitner_box: LeitnerBox::new(3).unwrap(),
            next_review_at: later,
            updated_at: later,
        };
        RecordStore::<VocabularyItem>::update(&store, id, &patch).unwrap();

        let stored = words(&store).remove(0);
        assert_eq!(stored.leitner_box.get(), 3);
        assert_eq!(stored.next_review_at, later);
        assert_eq!(stored.created_at, now());
        assert_eq!(stored.tags, vec!["animals"]);
    }

    #[test]
    fn missing_rows_map_to_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        let patch = SchedulePatch {
            leitner_box: LeitnerBox::FIRST,
            next_review_at: now(),
            updated_at: now(),
        };
        assert!(matches!(
            RecordStore::<VerbItem>::update(&store, 42, &patch),
            Err(StoreError::NotFound(42))
        ));
        assert!(matches!(
            RecordStore::<VocabularyItem>::delete(&store, 42),
            Err(StoreError::NotFound(42))
        ));
    }

    #[test]
    fn corrupt_rows_are_reported() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .conn
            .execute(
                "INSERT INTO words (term, translation, tags, next_review_at, created_at, updated_at)
                 VALUES ('a', 'b', 'not json', 0, 0, 0)",
                [],
            )
            .unwrap();
        assert!(matches!(
            RecordStore::<VocabularyItem>::list_all(&store),
            Err(StoreError::Backend(_))
        ));
    }
}
