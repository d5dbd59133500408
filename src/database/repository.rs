/*!
 * Repository layer for word persistence.
 *
 * `WordRepository` is the storage contract the application service depends
 * on; `SqliteWordRepository` implements it on top of `DatabaseConnection`.
 * Other implementations (e.g. test doubles) can be swapped in without
 * touching the service layer.
 */

use async_trait::async_trait;
use log::{debug, warn};
use rusqlite::{ffi, params, Connection, ErrorCode, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::{
    format_timestamp, parse_timestamp, storage_now, truncate_review_schedule, WordRow, WORD_COLUMNS,
};
use crate::errors::{StorageError, WordError};
use crate::words::{generate_word_id, Word};

/// CRUD contract for word storage
#[async_trait]
pub trait WordRepository: Send + Sync {
    /// Persist a new word, assigning an id when it has none
    ///
    /// Returns the stored record including its timestamps. Fails with
    /// `WordError::Conflict` when the id (or the lemma/language pair) is
    /// already taken.
    async fn create(&self, word: Word) -> Result<Word, WordError>;

    /// Look a word up by id; absence is `Ok(None)`
    async fn get_by_id(&self, id: &str) -> Result<Option<Word>, WordError>;

    /// Look a word up by its natural key; absence is `Ok(None)`
    async fn get_by_lemma(&self, lemma: &str, language: &str) -> Result<Option<Word>, WordError>;

    /// Every stored word, in insertion order
    async fn get_all(&self) -> Result<Vec<Word>, WordError>;

    /// Replace every mutable field of an existing word
    ///
    /// Fails with `WordError::Validation` when the id is missing and
    /// `WordError::NotFound` when no word has that id.
    async fn update(&self, word: Word) -> Result<Word, WordError>;

    /// Hard-delete a word; `Ok(false)` when nothing matched
    async fn delete(&self, id: &str) -> Result<bool, WordError>;
}

/// SQLite-backed word repository
#[derive(Clone, Debug)]
pub struct SqliteWordRepository {
    /// Database connection
    db: DatabaseConnection,
}

impl SqliteWordRepository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self, StorageError> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// The underlying connection handle
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn get_by_id_sync(conn: &Connection, id: &str) -> Result<Option<Word>, WordError> {
        let row = conn
            .query_row(
                &format!("SELECT {} FROM words WHERE id = ?1", WORD_COLUMNS),
                [id],
                WordRow::from_row,
            )
            .optional()?;

        Ok(row.map(WordRow::into_word).transpose()?)
    }
}

/// Classify a write failure: UNIQUE and PRIMARY KEY violations become
/// conflicts, everything else (CHECK and NOT NULL included) propagates as a
/// storage error
fn classify_write_error(error: rusqlite::Error, context: &str) -> WordError {
    let is_uniqueness_violation = matches!(
        &error,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && (failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                    || failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    );

    if is_uniqueness_violation {
        warn!("Uniqueness violation while {}: {}", context, error);
        WordError::Conflict(format!("{}: {}", context, conflict_reason(&error)))
    } else {
        WordError::from(error)
    }
}

fn conflict_reason(error: &rusqlite::Error) -> &'static str {
    let message = error.to_string();
    if message.contains("words.lemma") || message.contains("uq_words_lemma_lang") {
        "a word with this lemma already exists for the language"
    } else if message.contains("words.id") {
        "a word with this id already exists"
    } else {
        "the record duplicates a stored word"
    }
}

#[async_trait]
impl WordRepository for SqliteWordRepository {
    async fn create(&self, word: Word) -> Result<Word, WordError> {
        word.validate()?;

        let mut word = word;
        let id = match word.id() {
            Some(id) => id.to_string(),
            None => generate_word_id(&word.language, &word.lemma),
        };
        let now = storage_now();
        word.id = Some(id.clone());
        word.created_at = Some(now);
        word.updated_at = Some(now);
        truncate_review_schedule(&mut word);

        let row = WordRow::from_word(&word)?;
        debug!("Creating word {}", id);

        self.db
            .transaction_async(move |tx| -> Result<(), WordError> {
                let retired: bool = tx.query_row(
                    "SELECT EXISTS(SELECT 1 FROM retired_word_ids WHERE id = ?1)",
                    [&row.id],
                    |r| r.get(0),
                )?;
                if retired {
                    return Err(WordError::Conflict(format!(
                        "Word ID {} belonged to a deleted word and cannot be reused",
                        row.id
                    )));
                }

                tx.execute(
                    &format!(
                        "INSERT INTO words ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
                        WORD_COLUMNS
                    ),
                    params![
                        row.id,
                        row.lemma,
                        row.lang,
                        row.pos,
                        row.pos_specific,
                        row.defs,
                        row.synonyms,
                        row.examples,
                        row.freq_rank,
                        row.cefr,
                        row.gender,
                        row.plural,
                        row.audio,
                        row.src,
                        row.success_streak,
                        row.last_reviewed_at,
                        row.next_review_at,
                        row.created_at,
                        row.updated_at,
                    ],
                )
                .map_err(|e| classify_write_error(e, "creating word"))?;
                Ok(())
            })
            .await?;

        Ok(word)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Word>, WordError> {
        let id = id.to_string();

        self.db
            .execute_async(move |conn| Self::get_by_id_sync(conn, &id))
            .await
    }

    async fn get_by_lemma(&self, lemma: &str, language: &str) -> Result<Option<Word>, WordError> {
        let lemma = lemma.to_string();
        let language = language.to_string();

        self.db
            .execute_async(move |conn| -> Result<Option<Word>, WordError> {
                let row = conn
                    .query_row(
                        &format!("SELECT {} FROM words WHERE lemma = ?1 AND lang = ?2", WORD_COLUMNS),
                        params![lemma, language],
                        WordRow::from_row,
                    )
                    .optional()?;

                Ok(row.map(WordRow::into_word).transpose()?)
            })
            .await
    }

    async fn get_all(&self) -> Result<Vec<Word>, WordError> {
        self.db
            .execute_async(move |conn| -> Result<Vec<Word>, WordError> {
                let mut stmt =
                    conn.prepare(&format!("SELECT {} FROM words ORDER BY rowid", WORD_COLUMNS))?;

                let rows = stmt.query_map([], WordRow::from_row)?;

                let mut words = Vec::new();
                for row in rows {
                    words.push(row?.into_word()?);
                }
                Ok(words)
            })
            .await
    }

    async fn update(&self, word: Word) -> Result<Word, WordError> {
        let id = word
            .id()
            .ok_or_else(|| WordError::Validation("Word ID is required for update".to_string()))?
            .to_string();
        word.validate()?;

        debug!("Updating word {}", id);

        self.db
            .transaction_async(move |tx| -> Result<Word, WordError> {
                let existing: Option<(String, String)> = tx
                    .query_row(
                        "SELECT created_at, updated_at FROM words WHERE id = ?1",
                        [&id],
                        |r| Ok((r.get(0)?, r.get(1)?)),
                    )
                    .optional()?;

                let (created_at, previous_updated_at) = existing
                    .ok_or_else(|| WordError::NotFound(format!("Word with ID {} not found", id)))?;
                let created_at = parse_timestamp(&created_at)?;
                let previous_updated_at = parse_timestamp(&previous_updated_at)?;

                // Strictly after the previous value even when the clock ties.
                let now = storage_now();
                let updated_at = if now > previous_updated_at {
                    now
                } else {
                    previous_updated_at + chrono::Duration::microseconds(1)
                };

                let mut word = word;
                word.id = Some(id.clone());
                word.created_at = Some(created_at);
                word.updated_at = Some(updated_at);
                truncate_review_schedule(&mut word);
                let row = WordRow::from_word(&word)?;

                tx.execute(
                    r#"
                    UPDATE words SET
                        lemma = ?2, lang = ?3, pos = ?4, pos_specific = ?5, defs = ?6,
                        synonyms = ?7, examples = ?8, freq_rank = ?9, cefr = ?10, gender = ?11,
                        plural = ?12, audio = ?13, src = ?14, success_streak = ?15,
                        last_reviewed_at = ?16, next_review_at = ?17, updated_at = ?18
                    WHERE id = ?1
                    "#,
                    params![
                        row.id,
                        row.lemma,
                        row.lang,
                        row.pos,
                        row.pos_specific,
                        row.defs,
                        row.synonyms,
                        row.examples,
                        row.freq_rank,
                        row.cefr,
                        row.gender,
                        row.plural,
                        row.audio,
                        row.src,
                        row.success_streak,
                        row.last_reviewed_at,
                        row.next_review_at,
                        format_timestamp(updated_at),
                    ],
                )
                .map_err(|e| classify_write_error(e, "updating word"))?;

                Ok(word)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<bool, WordError> {
        let id = id.to_string();

        self.db
            .transaction_async(move |tx| -> Result<bool, WordError> {
                let deleted = tx.execute("DELETE FROM words WHERE id = ?1", [&id])?;
                if deleted == 0 {
                    debug!("Nothing to delete for word {}", id);
                    return Ok(false);
                }

                tx.execute(
                    "INSERT OR IGNORE INTO retired_word_ids (id, retired_at) VALUES (?1, ?2)",
                    params![id, format_timestamp(storage_now())],
                )?;
                debug!("Deleted word {}", id);
                Ok(true)
            })
            .await
    }
}
