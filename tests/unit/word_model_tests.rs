/*!
 * Tests for the Word entity's public JSON contract
 */

use chrono::{TimeZone, Utc};
use serde_json::json;

use wortwirbel::words::{CefrLevel, Gender, PartOfSpeech, Word};

use crate::common::haus;

#[test]
fn test_word_fullEntry_shouldSurviveJsonTransport() {
    let reviewed = Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap();
    let due = Utc.with_ymd_and_hms(2025, 9, 4, 8, 0, 0).unwrap();
    let word = haus()
        .with_id("de:Haus:0badf00d")
        .with_review_schedule(reviewed, due);

    let text = serde_json::to_string(&word).unwrap();
    let back: Word = serde_json::from_str(&text).unwrap();

    assert_eq!(back, word);
}

#[test]
fn test_word_enumsOnTheWire_shouldUseWireCasing() {
    let json = serde_json::to_value(haus()).unwrap();

    assert_eq!(json["pos"], "noun");
    assert_eq!(json["cefr"], "A1");
    assert_eq!(json["gender"], "neuter");
    assert_eq!(json["plural"], "Häuser");
    assert_eq!(json["success_streak"], 3);
}

#[test]
fn test_word_minimalRequest_shouldDeserializeWithDefaults() {
    let word: Word = serde_json::from_value(json!({
        "lemma": "laufen",
        "lang": "de",
        "pos": "verb",
        "defs": ["to run"]
    }))
    .unwrap();

    assert!(word.id.is_none());
    assert_eq!(word.part_of_speech, PartOfSpeech::Verb);
    assert!(word.synonyms.is_none());
    assert!(word.examples.is_none());
    assert!(word.cefr_level.is_none());
    assert!(word.validate().is_ok());
}

#[test]
fn test_word_missingDefinitions_shouldBeRejectedByDeserializer() {
    let result: Result<Word, _> = serde_json::from_value(json!({
        "lemma": "laufen",
        "lang": "de",
        "pos": "verb"
    }));
    assert!(result.is_err());
}

#[test]
fn test_word_invalidEnumValues_shouldBeRejected() {
    let bad_cefr: Result<Word, _> = serde_json::from_value(json!({
        "lemma": "x", "lang": "de", "pos": "noun", "defs": ["x"], "cefr": "a1"
    }));
    assert!(bad_cefr.is_err());

    let bad_gender: Result<Word, _> = serde_json::from_value(json!({
        "lemma": "x", "lang": "de", "pos": "noun", "defs": ["x"], "gender": "common"
    }));
    assert!(bad_gender.is_err());
}

#[test]
fn test_enums_displayMatchesWire() {
    assert_eq!(CefrLevel::C2.to_string(), "C2");
    assert_eq!(Gender::Masculine.to_string(), "masculine");
    assert_eq!(PartOfSpeech::Determiner.to_string(), "determiner");
    assert_eq!(PartOfSpeech::ALL.len(), 12);
}
