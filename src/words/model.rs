/*!
 * Word entity schema.
 *
 * `Word` is the canonical in-memory representation of a vocabulary entry.
 * Serialized field names follow the public wire format (`lang`, `pos`,
 * `defs`, ...), which is also the column naming of the `words` table.
 */

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::WordError;

/// Part of speech
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Interjection,
    Article,
    Determiner,
    Particle,
    /// Anything the closed set does not name yet
    Other,
}

impl PartOfSpeech {
    /// All members, in declaration order
    pub const ALL: [PartOfSpeech; 12] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
        PartOfSpeech::Pronoun,
        PartOfSpeech::Preposition,
        PartOfSpeech::Conjunction,
        PartOfSpeech::Interjection,
        PartOfSpeech::Article,
        PartOfSpeech::Determiner,
        PartOfSpeech::Particle,
        PartOfSpeech::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::Adverb => "adverb",
            PartOfSpeech::Pronoun => "pronoun",
            PartOfSpeech::Preposition => "preposition",
            PartOfSpeech::Conjunction => "conjunction",
            PartOfSpeech::Interjection => "interjection",
            PartOfSpeech::Article => "article",
            PartOfSpeech::Determiner => "determiner",
            PartOfSpeech::Particle => "particle",
            PartOfSpeech::Other => "other",
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PartOfSpeech {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        PartOfSpeech::ALL
            .into_iter()
            .find(|pos| pos.as_str() == lowered)
            .ok_or_else(|| anyhow::anyhow!("Invalid part of speech: {}", s))
    }
}

/// CEFR proficiency level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CefrLevel::A1 => write!(f, "A1"),
            CefrLevel::A2 => write!(f, "A2"),
            CefrLevel::B1 => write!(f, "B1"),
            CefrLevel::B2 => write!(f, "B2"),
            CefrLevel::C1 => write!(f, "C1"),
            CefrLevel::C2 => write!(f, "C2"),
        }
    }
}

impl FromStr for CefrLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A1" => Ok(CefrLevel::A1),
            "A2" => Ok(CefrLevel::A2),
            "B1" => Ok(CefrLevel::B1),
            "B2" => Ok(CefrLevel::B2),
            "C1" => Ok(CefrLevel::C1),
            "C2" => Ok(CefrLevel::C2),
            _ => Err(anyhow::anyhow!("Invalid CEFR level: {}", s)),
        }
    }
}

/// Grammatical gender
///
/// Only meaningful for nouns, but not checked against the part of speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Masculine,
    Feminine,
    Neuter,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Masculine => write!(f, "masculine"),
            Gender::Feminine => write!(f, "feminine"),
            Gender::Neuter => write!(f, "neuter"),
        }
    }
}

impl FromStr for Gender {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "masculine" => Ok(Gender::Masculine),
            "feminine" => Ok(Gender::Feminine),
            "neuter" => Ok(Gender::Neuter),
            _ => Err(anyhow::anyhow!("Invalid gender: {}", s)),
        }
    }
}

/// Usage example with its translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Example sentence in the word's language
    pub text: String,
    /// Translation of the sentence
    #[serde(rename = "tr")]
    pub translation: String,
}

impl Example {
    pub fn new(text: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            translation: translation.into(),
        }
    }
}

/// A vocabulary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// `{language}:{lemma}:{variant}`; assigned on create when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Canonical surface form
    pub lemma: String,

    /// Language code, e.g. "de"
    #[serde(rename = "lang")]
    pub language: String,

    #[serde(rename = "pos")]
    pub part_of_speech: PartOfSpeech,

    /// Language-specific refinement of the part of speech
    #[serde(rename = "pos_specific", default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech_specific: Option<String>,

    /// Ordered definitions, never empty once stored
    #[serde(rename = "defs")]
    pub definitions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Example>>,

    #[serde(rename = "freq_rank", default, skip_serializing_if = "Option::is_none")]
    pub frequency_rank: Option<u32>,

    #[serde(rename = "cefr", default, skip_serializing_if = "Option::is_none")]
    pub cefr_level: Option<CefrLevel>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,

    #[serde(rename = "audio", default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,

    #[serde(rename = "src", default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Consecutive successful reviews
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_streak: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review_at: Option<DateTime<Utc>>,

    /// Set by storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Set by storage, refreshed on every mutation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Word {
    /// Create a word with the required fields and nothing else
    pub fn new(
        lemma: impl Into<String>,
        language: impl Into<String>,
        part_of_speech: PartOfSpeech,
        definitions: Vec<String>,
    ) -> Self {
        Self {
            id: None,
            lemma: lemma.into(),
            language: language.into(),
            part_of_speech,
            part_of_speech_specific: None,
            definitions,
            synonyms: None,
            examples: None,
            frequency_rank: None,
            cefr_level: None,
            gender: None,
            plural: None,
            audio_url: None,
            source: None,
            success_streak: None,
            last_reviewed_at: None,
            next_review_at: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_part_of_speech_specific(mut self, specific: impl Into<String>) -> Self {
        self.part_of_speech_specific = Some(specific.into());
        self
    }

    pub fn with_synonyms(mut self, synonyms: Vec<String>) -> Self {
        self.synonyms = Some(synonyms);
        self
    }

    pub fn with_examples(mut self, examples: Vec<Example>) -> Self {
        self.examples = Some(examples);
        self
    }

    pub fn with_frequency_rank(mut self, rank: u32) -> Self {
        self.frequency_rank = Some(rank);
        self
    }

    pub fn with_cefr_level(mut self, level: CefrLevel) -> Self {
        self.cefr_level = Some(level);
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_plural(mut self, plural: impl Into<String>) -> Self {
        self.plural = Some(plural.into());
        self
    }

    pub fn with_audio_url(mut self, url: impl Into<String>) -> Self {
        self.audio_url = Some(url.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_success_streak(mut self, streak: u32) -> Self {
        self.success_streak = Some(streak);
        self
    }

    pub fn with_review_schedule(
        mut self,
        last_reviewed_at: DateTime<Utc>,
        next_review_at: DateTime<Utc>,
    ) -> Self {
        self.last_reviewed_at = Some(last_reviewed_at);
        self.next_review_at = Some(next_review_at);
        self
    }

    /// The id, if one is set and not blank
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    pub fn has_id(&self) -> bool {
        self.id().is_some()
    }

    /// Check the fields every stored word must satisfy
    pub fn validate(&self) -> Result<(), WordError> {
        if self.lemma.trim().is_empty() {
            return Err(WordError::Validation("Word lemma must not be empty".to_string()));
        }
        if self.language.trim().is_empty() {
            return Err(WordError::Validation("Word language must not be empty".to_string()));
        }
        if self.definitions.is_empty() {
            return Err(WordError::Validation(
                "Word must have at least one definition".to_string(),
            ));
        }

        // Storage keeps timestamps as four-digit-year RFC 3339 text
        let review_times = [
            ("last_reviewed_at", self.last_reviewed_at),
            ("next_review_at", self.next_review_at),
        ];
        for (field, timestamp) in review_times {
            if let Some(timestamp) = timestamp {
                if !(0..=9999).contains(&timestamp.year()) {
                    return Err(WordError::Validation(format!(
                        "{} must fall between years 0000 and 9999",
                        field
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Generate a fresh id of the form `{language}:{lemma}:{suffix}`
///
/// The 8 hex digit suffix is only probabilistically unique; the primary key
/// on `words.id` is what actually rejects collisions.
pub fn generate_word_id(language: &str, lemma: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}:{}:{}", language, lemma, &suffix[..8])
}
