/*!
 * Database schema definitions and migrations.
 *
 * This module contains the SQL schema for the `words` table and the
 * retired-id ledger, and handles schema migrations for version upgrades.
 */

use log::{debug, info};
use rusqlite::Connection;

use crate::errors::StorageError;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> Result<(), StorageError> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Initializing database schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        info!(
            "Migrating database schema from v{} to v{}",
            current_version, SCHEMA_VERSION
        );
        migrate_schema(conn, current_version)?;
    } else {
        debug!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32, StorageError> {
    let table_exists: bool = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
        [],
        |row| row.get(0),
    )?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    // Timestamps are fixed-width RFC 3339 UTC strings, so text comparison
    // orders them chronologically.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS words (
            id TEXT PRIMARY KEY,
            lemma TEXT NOT NULL CHECK (length(trim(lemma)) > 0),
            lang TEXT NOT NULL CHECK (length(trim(lang)) > 0),
            pos TEXT NOT NULL CHECK (pos IN (
                'noun', 'verb', 'adjective', 'adverb', 'pronoun', 'preposition',
                'conjunction', 'interjection', 'article', 'determiner', 'particle', 'other'
            )),
            pos_specific TEXT,
            defs TEXT NOT NULL CHECK (json_array_length(defs) > 0),
            synonyms TEXT,
            examples TEXT,
            freq_rank INTEGER CHECK (freq_rank IS NULL OR freq_rank >= 0),
            cefr TEXT CHECK (cefr IS NULL OR cefr IN ('A1', 'A2', 'B1', 'B2', 'C1', 'C2')),
            gender TEXT CHECK (gender IS NULL OR gender IN ('masculine', 'feminine', 'neuter')),
            plural TEXT,
            audio TEXT,
            src TEXT,
            success_streak INTEGER DEFAULT 0 CHECK (success_streak IS NULL OR success_streak >= 0),
            last_reviewed_at TEXT,
            next_review_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            CHECK (updated_at >= created_at)
        );

        CREATE INDEX IF NOT EXISTS idx_words_lemma ON words(lemma);
        CREATE INDEX IF NOT EXISTS idx_words_lang ON words(lang);
        CREATE UNIQUE INDEX IF NOT EXISTS uq_words_lemma_lang ON words(lemma, lang);
        "#,
    )?;

    // Ids of deleted words, so they are never handed out again
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS retired_word_ids (
            id TEXT PRIMARY KEY,
            retired_at TEXT NOT NULL
        );
        "#,
    )?;

    info!("Database schema created successfully");
    Ok(())
}

/// Migrate the schema from one version to another
fn migrate_schema(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    let mut current = from_version;

    while current < SCHEMA_VERSION {
        current = match current {
            // Add migration steps here as the schema evolves, e.g.
            // 1 => { migrate_v1_to_v2(conn)?; 2 }
            unknown => {
                return Err(StorageError::Migration(format!(
                    "Unknown schema version: {}. Cannot migrate.",
                    unknown
                )));
            }
        };
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    info!("Schema migration completed to v{}", SCHEMA_VERSION);
    Ok(())
}
