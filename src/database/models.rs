/*!
 * Database entity models.
 *
 * These structures map directly to the translations table and provide
 * type-safe access to persisted data.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// One stored translation unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Database ID, assigned on insert
    pub id: i64,
    /// Owner type discriminator (`model` column)
    pub owner_type: String,
    /// Owner identifier (`model_id` column)
    pub owner_id: i64,
    /// Translated field name (`type` column)
    pub field: String,
    /// Locale tag
    pub locale: String,
    /// Translated text
    pub value: String,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Last update timestamp (RFC 3339)
    pub updated_at: String,
}

impl TranslationRecord {
    /// Column list matching `from_row`
    pub(crate) const COLUMNS: &'static str =
        "id, model, model_id, type, locale, value, created_at, updated_at";

    /// Build a record from a row selected with `COLUMNS`
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_type: row.get(1)?,
            owner_id: row.get(2)?,
            field: row.get(3)?,
            locale: row.get(4)?,
            value: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    /// Composite key of this record
    pub fn key(&self) -> TranslationKey<'_> {
        TranslationKey {
            owner_type: &self.owner_type,
            owner_id: self.owner_id,
            field: &self.field,
            locale: &self.locale,
        }
    }
}

/// Natural key of a translation: (owner type, owner id, field, locale)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TranslationKey<'a> {
    pub owner_type: &'a str,
    pub owner_id: i64,
    pub field: &'a str,
    pub locale: &'a str,
}

impl fmt::Display for TranslationKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}.{}[{}]",
            self.owner_type, self.owner_id, self.field, self.locale
        )
    }
}
