//! SQLite schema definitions.

/// Current schema version, stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema. Timestamps are epoch milliseconds (UTC).
pub const SCHEMA: &str = r#"
-- Vocabulary entries
CREATE TABLE IF NOT EXISTS words (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    term TEXT NOT NULL,
    translation TEXT NOT NULL,
    pronunciation_hint TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    leitner_box INTEGER NOT NULL DEFAULT 1 CHECK (leitner_box BETWEEN 1 AND 5),
    next_review_at INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

-- Irregular verbs
CREATE TABLE IF NOT EXISTS irregular_verbs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    infinitive TEXT NOT NULL,
    past_simple TEXT NOT NULL,
    past_participle TEXT NOT NULL,
    translation TEXT NOT NULL,
    pronunciation_hint TEXT,
    leitner_box INTEGER NOT NULL DEFAULT 1 CHECK (leitner_box BETWEEN 1 AND 5),
    next_review_at INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_words_next_review ON words(next_review_at);
CREATE INDEX IF NOT EXISTS idx_verbs_next_review ON irregular_verbs(next_review_at);
"#;
