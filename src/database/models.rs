/*!
 * Storage mapping for words.
 *
 * `WordRow` mirrors one row of the `words` table: list-valued fields are
 * JSON text, enumerations are their lowercase (or CEFR uppercase) spelling
 * and timestamps are fixed-width RFC 3339 UTC strings.
 */

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::Row;

use crate::errors::StorageError;
use crate::words::{CefrLevel, Example, Gender, PartOfSpeech, Word};

/// Column list shared by every `SELECT` on `words`, in `WordRow::from_row` order
pub const WORD_COLUMNS: &str = "id, lemma, lang, pos, pos_specific, defs, synonyms, examples, \
     freq_rank, cefr, gender, plural, audio, src, success_streak, \
     last_reviewed_at, next_review_at, created_at, updated_at";

/// One persisted word
#[derive(Debug, Clone, PartialEq)]
pub struct WordRow {
    pub id: String,
    pub lemma: String,
    pub lang: String,
    pub pos: String,
    pub pos_specific: Option<String>,
    /// JSON array of strings
    pub defs: String,
    /// JSON array of strings
    pub synonyms: Option<String>,
    /// JSON array of `{text, tr}` objects
    pub examples: Option<String>,
    pub freq_rank: Option<i64>,
    pub cefr: Option<String>,
    pub gender: Option<String>,
    pub plural: Option<String>,
    pub audio: Option<String>,
    pub src: Option<String>,
    pub success_streak: Option<i64>,
    pub last_reviewed_at: Option<String>,
    pub next_review_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl WordRow {
    /// Build a row from a word that already carries its id and timestamps
    pub fn from_word(word: &Word) -> Result<Self, StorageError> {
        let id = word
            .id()
            .ok_or_else(|| StorageError::CorruptRow("word has no id".to_string()))?
            .to_string();
        let created_at = word
            .created_at
            .ok_or_else(|| StorageError::CorruptRow(format!("word {} has no created_at", id)))?;
        let updated_at = word
            .updated_at
            .ok_or_else(|| StorageError::CorruptRow(format!("word {} has no updated_at", id)))?;

        Ok(Self {
            lemma: word.lemma.clone(),
            lang: word.language.clone(),
            pos: word.part_of_speech.to_string(),
            pos_specific: word.part_of_speech_specific.clone(),
            defs: serde_json::to_string(&word.definitions)?,
            synonyms: word.synonyms.as_ref().map(serde_json::to_string).transpose()?,
            examples: word.examples.as_ref().map(serde_json::to_string).transpose()?,
            freq_rank: word.frequency_rank.map(i64::from),
            cefr: word.cefr_level.map(|level| level.to_string()),
            gender: word.gender.map(|gender| gender.to_string()),
            plural: word.plural.clone(),
            audio: word.audio_url.clone(),
            src: word.source.clone(),
            success_streak: word.success_streak.map(i64::from),
            last_reviewed_at: word.last_reviewed_at.map(format_timestamp),
            next_review_at: word.next_review_at.map(format_timestamp),
            created_at: format_timestamp(created_at),
            updated_at: format_timestamp(updated_at),
            id,
        })
    }

    /// Read a row selected with `WORD_COLUMNS`
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            lemma: row.get(1)?,
            lang: row.get(2)?,
            pos: row.get(3)?,
            pos_specific: row.get(4)?,
            defs: row.get(5)?,
            synonyms: row.get(6)?,
            examples: row.get(7)?,
            freq_rank: row.get(8)?,
            cefr: row.get(9)?,
            gender: row.get(10)?,
            plural: row.get(11)?,
            audio: row.get(12)?,
            src: row.get(13)?,
            success_streak: row.get(14)?,
            last_reviewed_at: row.get(15)?,
            next_review_at: row.get(16)?,
            created_at: row.get(17)?,
            updated_at: row.get(18)?,
        })
    }

    /// Convert back into the domain representation
    pub fn into_word(self) -> Result<Word, StorageError> {
        let corrupt = |field: &str, err: anyhow::Error| {
            StorageError::CorruptRow(format!("word {}: {}: {}", self.id, field, err))
        };

        let part_of_speech = self.pos.parse::<PartOfSpeech>().map_err(|e| corrupt("pos", e))?;
        let cefr_level = self
            .cefr
            .as_deref()
            .map(str::parse::<CefrLevel>)
            .transpose()
            .map_err(|e| corrupt("cefr", e))?;
        let gender = self
            .gender
            .as_deref()
            .map(str::parse::<Gender>)
            .transpose()
            .map_err(|e| corrupt("gender", e))?;

        let definitions: Vec<String> = serde_json::from_str(&self.defs)?;
        let synonyms: Option<Vec<String>> =
            self.synonyms.as_deref().map(serde_json::from_str).transpose()?;
        let examples: Option<Vec<Example>> =
            self.examples.as_deref().map(serde_json::from_str).transpose()?;

        let frequency_rank = self
            .freq_rank
            .map(|rank| to_unsigned(&self.id, "freq_rank", rank))
            .transpose()?;
        let success_streak = self
            .success_streak
            .map(|streak| to_unsigned(&self.id, "success_streak", streak))
            .transpose()?;

        Ok(Word {
            part_of_speech,
            part_of_speech_specific: self.pos_specific,
            definitions,
            synonyms,
            examples,
            frequency_rank,
            cefr_level,
            gender,
            plural: self.plural,
            audio_url: self.audio,
            source: self.src,
            success_streak,
            last_reviewed_at: self.last_reviewed_at.as_deref().map(parse_timestamp).transpose()?,
            next_review_at: self.next_review_at.as_deref().map(parse_timestamp).transpose()?,
            created_at: Some(parse_timestamp(&self.created_at)?),
            updated_at: Some(parse_timestamp(&self.updated_at)?),
            lemma: self.lemma,
            language: self.lang,
            id: Some(self.id),
        })
    }
}

fn to_unsigned(id: &str, field: &str, value: i64) -> Result<u32, StorageError> {
    u32::try_from(value)
        .map_err(|_| StorageError::CorruptRow(format!("word {}: {} out of range: {}", id, field, value)))
}

/// Current time at the precision the store keeps
pub fn storage_now() -> DateTime<Utc> {
    to_storage_precision(Utc::now())
}

/// Drop sub-microsecond digits, which `format_timestamp` cannot keep
pub fn to_storage_precision(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp.trunc_subsecs(6)
}

/// Bring client-supplied review times to storage precision, so the word a
/// write returns equals the word a later read yields
pub fn truncate_review_schedule(word: &mut Word) {
    word.last_reviewed_at = word.last_reviewed_at.map(to_storage_precision);
    word.next_review_at = word.next_review_at.map(to_storage_precision);
}

/// Fixed-width RFC 3339 with microseconds, e.g. `2025-09-01T12:44:00.000000Z`
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| StorageError::CorruptRow(format!("invalid timestamp '{}': {}", value, e)))
}
