/*!
 * Error types for the translation store.
 *
 * Store operations return `StoreError`, defined with the thiserror crate.
 * The connection, schema and configuration layers work with `anyhow` and
 * are folded into `StoreError::Connection` at the store boundary.
 */

use thiserror::Error;

/// Errors surfaced by `TranslationStore` operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// An operation was invoked before an owner was bound
    #[error("Translation store is not bound to an owner")]
    NotBound,

    /// `bind` was called on a store that already has an owner
    #[error("Translation store is already bound to {owner_type}#{owner_id}")]
    AlreadyBound {
        /// Type discriminator of the current owner
        owner_type: String,
        /// Identifier of the current owner
        owner_id: i64,
    },

    /// `update_translation` found no record to update
    #[error("No translation for field '{field}' in locale '{locale}'")]
    NotFound {
        /// Field name
        field: String,
        /// Resolved locale
        locale: String,
    },

    /// `create_translation` hit an existing record for the same key
    #[error("Translation for field '{field}' in locale '{locale}' already exists")]
    AlreadyExists {
        /// Field name
        field: String,
        /// Resolved locale
        locale: String,
    },

    /// Locale rejected by strict locale validation
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// Error reported by SQLite
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Error opening, locking or initializing the database
    #[error("Connection error: {0}")]
    Connection(#[from] anyhow::Error),
}

impl StoreError {
    /// True when the error means the addressed record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when SQLite rejected a write because of the unique key
    pub(crate) fn is_unique_violation(error: &rusqlite::Error) -> bool {
        matches!(
            error,
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
    }
}

/// Result alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;
