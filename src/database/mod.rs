/*!
 * Database module for persistent storage of words.
 *
 * This module provides SQLite-based persistence for:
 * - The `words` table and its row mapping
 * - The ledger of ids retired by deletion
 * - The `WordRepository` contract and its SQLite implementation
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats};
pub use repository::{SqliteWordRepository, WordRepository};
