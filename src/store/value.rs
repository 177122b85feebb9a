/*!
 * Input and output shapes of the polymorphic `set` operation.
 */

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::database::models::TranslationRecord;

/// Value accepted by `TranslationStore::set`
///
/// Either one value for a single locale, or an ordered locale → value
/// mapping written entry by entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationValue {
    Single(String),
    PerLocale(IndexMap<String, String>),
}

impl From<&str> for TranslationValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for TranslationValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<IndexMap<String, String>> for TranslationValue {
    fn from(values: IndexMap<String, String>) -> Self {
        Self::PerLocale(values)
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for TranslationValue {
    fn from(values: Vec<(K, V)>) -> Self {
        Self::PerLocale(
            values
                .into_iter()
                .map(|(locale, value)| (locale.into(), value.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for TranslationValue {
    fn from(values: [(K, V); N]) -> Self {
        Self::PerLocale(
            values
                .into_iter()
                .map(|(locale, value)| (locale.into(), value.into()))
                .collect(),
        )
    }
}

/// Result of `TranslationStore::set`, mirroring the input shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    Single(TranslationRecord),
    Many(Vec<TranslationRecord>),
}

impl SetOutcome {
    /// The record of a single-value write
    pub fn single(self) -> Option<TranslationRecord> {
        match self {
            Self::Single(record) => Some(record),
            Self::Many(_) => None,
        }
    }

    /// All written records in input order
    pub fn into_records(self) -> Vec<TranslationRecord> {
        match self {
            Self::Single(record) => vec![record],
            Self::Many(records) => records,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
