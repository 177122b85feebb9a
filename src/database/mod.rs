/*!
 * Database module for persistent storage of translations.
 *
 * This module provides SQLite-based persistence for:
 * - The translations table and its schema version bookkeeping
 * - Connection management shared by every bound store
 * - Row models mapped from the translations table
 */

pub mod connection;
pub mod models;
pub mod schema;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats, Executor};
pub use models::{TranslationKey, TranslationRecord};
