/*!
 * Vocabulary words: the entity schema and the application service.
 */

pub mod model;
pub mod service;

pub use model::{generate_word_id, CefrLevel, Example, Gender, PartOfSpeech, Word};
pub use service::WordService;
