/*!
 * # wortwirbel - vocabulary word service
 *
 * A Rust library and HTTP service for storing and managing vocabulary words
 * for language learning.
 *
 * ## Features
 *
 * - Create, look up, list, update and delete words
 * - One word per (lemma, language) pair
 * - Rich entries: definitions, synonyms, examples with translations,
 *   frequency rank, CEFR level, gender, plural, audio and source
 * - SQLite persistence with a versioned schema
 * - JSON REST API
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `words`: The word entity and the application service:
 *   - `words::model`: Entity, enumerations and validation
 *   - `words::service`: Business rules on top of a repository
 * - `database`: SQLite persistence:
 *   - `database::schema`: Table definitions and migrations
 *   - `database::models`: Mapping between words and rows
 *   - `database::connection`: Shared connection handle
 *   - `database::repository`: The `WordRepository` contract and its SQLite implementation
 * - `api`: axum routes over the service
 * - `info`: Service identity and health payloads
 * - `app_config`: Configuration management
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod api;
pub mod database;
pub mod errors;
pub mod info;
pub mod words;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::{DatabaseConnection, SqliteWordRepository, WordRepository};
pub use errors::{AppError, StorageError, WordError};
pub use words::{CefrLevel, Example, Gender, PartOfSpeech, Word, WordService};
