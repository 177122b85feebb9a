/*!
 * Translation store: per-owner CRUD, upsert and batch operations.
 *
 * Every operation is scoped to the bound owner and addresses records by the
 * composite key (owner type, owner id, field, locale). Writes are single
 * SQL statements against the table's unique key, so concurrent writers on
 * the same key converge to one row instead of racing a lookup.
 */

use indexmap::IndexSet;
use log::{debug, warn};
use rusqlite::{OptionalExtension, ToSql, params};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::database::connection::{DatabaseConnection, Executor};
use crate::database::models::TranslationRecord;
use crate::errors::{StoreError, StoreResult};
use crate::locale::{self, LocaleProvider};

use super::owner::{Owner, OwnerRef};
use super::value::{SetOutcome, TranslationValue};

/// Translation store bound to at most one owner
///
/// `X` is where statements run: a shared `DatabaseConnection` by default,
/// or a borrowed connection inside `Translations::transaction`.
pub struct TranslationStore<X = DatabaseConnection> {
    executor: X,
    table: Arc<str>,
    locales: Arc<dyn LocaleProvider>,
    strict_locales: bool,
    owner: Option<OwnerRef>,
}

impl<X> fmt::Debug for TranslationStore<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationStore")
            .field("table", &self.table)
            .field("strict_locales", &self.strict_locales)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

impl TranslationStore<DatabaseConnection> {
    /// Create an unbound store on the given database
    pub fn new(db: DatabaseConnection, locales: Arc<dyn LocaleProvider>) -> Self {
        let table = Arc::from(db.table());
        Self::from_parts(db, table, locales, false, None)
    }
}

impl<X: Executor> TranslationStore<X> {
    pub(crate) fn from_parts(
        executor: X,
        table: Arc<str>,
        locales: Arc<dyn LocaleProvider>,
        strict_locales: bool,
        owner: Option<OwnerRef>,
    ) -> Self {
        Self {
            executor,
            table,
            locales,
            strict_locales,
            owner,
        }
    }

    /// Reject locales without an ISO 639 language
    pub fn with_strict_locales(mut self, strict: bool) -> Self {
        self.strict_locales = strict;
        self
    }

    // =========================================================================
    // Binding
    // =========================================================================

    /// Bind the store to an owner
    ///
    /// A store is bound once; binding a bound store fails with
    /// `AlreadyBound`.
    pub fn bind<O: Owner + ?Sized>(mut self, owner: &O) -> StoreResult<Self> {
        if let Some(current) = &self.owner {
            return Err(StoreError::AlreadyBound {
                owner_type: current.type_name.clone(),
                owner_id: current.id,
            });
        }

        self.owner = Some(OwnerRef::of(owner));
        Ok(self)
    }

    /// The bound owner
    pub fn owner(&self) -> StoreResult<&OwnerRef> {
        self.owner.as_ref().ok_or(StoreError::NotBound)
    }

    /// Whether an owner has been bound
    pub fn is_bound(&self) -> bool {
        self.owner.is_some()
    }

    /// Name of the backing table
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Resolve an optional locale against the current application locale
    fn resolve_locale(&self, locale: Option<&str>) -> StoreResult<String> {
        let locale = match locale {
            Some(locale) if !locale.is_empty() => locale.to_string(),
            _ => self.locales.current_locale(),
        };
        self.check_locale(&locale)?;
        Ok(locale)
    }

    fn check_locale(&self, locale: &str) -> StoreResult<()> {
        if self.strict_locales {
            locale::validate_locale(locale).map_err(|e| {
                warn!("Rejected locale {:?}: {}", locale, e);
                StoreError::InvalidLocale(locale.to_string())
            })?;
        }
        Ok(())
    }

    fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }

    // =========================================================================
    // Single-record operations
    // =========================================================================

    /// Find the record for (owner, field, locale)
    pub fn lookup(&self, field: &str, locale: Option<&str>) -> StoreResult<Option<TranslationRecord>> {
        let owner = self.owner()?;
        let locale = self.resolve_locale(locale)?;
        let sql = format!(
            "SELECT {} FROM {} WHERE model = ?1 AND model_id = ?2 AND type = ?3 AND locale = ?4",
            TranslationRecord::COLUMNS,
            self.table
        );

        self.executor.run(|conn| {
            let record = conn
                .query_row(
                    &sql,
                    params![owner.type_name, owner.id, field, locale],
                    TranslationRecord::from_row,
                )
                .optional()?;
            Ok::<_, StoreError>(record)
        })
    }

    /// Insert a new record
    ///
    /// Fails with `AlreadyExists` when a record for the same field and
    /// locale is already stored; use `set` to overwrite.
    pub fn create_translation(
        &self,
        field: &str,
        value: &str,
        locale: Option<&str>,
    ) -> StoreResult<TranslationRecord> {
        let owner = self.owner()?;
        let locale = self.resolve_locale(locale)?;
        let now = Self::now();
        let sql = format!(
            "INSERT INTO {} (type, value, locale, model, model_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             RETURNING {}",
            self.table,
            TranslationRecord::COLUMNS
        );

        let record = self.executor.run(|conn| {
            conn.query_row(
                &sql,
                params![field, value, locale, owner.type_name, owner.id, now],
                TranslationRecord::from_row,
            )
            .map_err(|e| {
                if StoreError::is_unique_violation(&e) {
                    StoreError::AlreadyExists {
                        field: field.to_string(),
                        locale: locale.clone(),
                    }
                } else {
                    StoreError::from(e)
                }
            })
        })?;

        debug!("Created translation {}", record.key());
        Ok(record)
    }

    /// Overwrite the value of an existing record
    ///
    /// Fails with `NotFound` when no record exists for the field and locale.
    pub fn update_translation(
        &self,
        field: &str,
        value: &str,
        locale: Option<&str>,
    ) -> StoreResult<TranslationRecord> {
        let owner = self.owner()?;
        let locale = self.resolve_locale(locale)?;
        let now = Self::now();
        let sql = format!(
            "UPDATE {} SET value = ?1, updated_at = ?2
             WHERE model = ?3 AND model_id = ?4 AND type = ?5 AND locale = ?6
             RETURNING {}",
            self.table,
            TranslationRecord::COLUMNS
        );

        let updated = self.executor.run(|conn| {
            let record = conn
                .query_row(
                    &sql,
                    params![value, now, owner.type_name, owner.id, field, locale],
                    TranslationRecord::from_row,
                )
                .optional()?;
            Ok::<_, StoreError>(record)
        })?;

        match updated {
            Some(record) => {
                debug!("Updated translation {}", record.key());
                Ok(record)
            }
            None => Err(StoreError::NotFound {
                field: field.to_string(),
                locale,
            }),
        }
    }

    /// Create the record or overwrite its value, in one statement
    pub fn create_or_update_single_translation(
        &self,
        field: &str,
        value: &str,
        locale: Option<&str>,
    ) -> StoreResult<TranslationRecord> {
        let owner = self.owner()?;
        let locale = self.resolve_locale(locale)?;
        self.upsert(owner, field, value, &locale)
    }

    fn upsert(
        &self,
        owner: &OwnerRef,
        field: &str,
        value: &str,
        locale: &str,
    ) -> StoreResult<TranslationRecord> {
        let now = Self::now();
        let sql = format!(
            "INSERT INTO {} (type, value, locale, model, model_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
             ON CONFLICT(model, model_id, type, locale)
             DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
             RETURNING {}",
            self.table,
            TranslationRecord::COLUMNS
        );

        let record = self.executor.run(|conn| {
            let record = conn.query_row(
                &sql,
                params![field, value, locale, owner.type_name, owner.id, now],
                TranslationRecord::from_row,
            )?;
            Ok::<_, StoreError>(record)
        })?;

        debug!("Upserted translation {}", record.key());
        Ok(record)
    }

    /// Write one value, or a locale → value mapping
    ///
    /// A single value is written for `locale` (or the current locale). For a
    /// mapping, each entry is upserted in order with its own locale and the
    /// records come back in the same order. Entries are not atomic as a
    /// group: a failure leaves earlier entries written.
    pub fn set(
        &self,
        field: &str,
        value: impl Into<TranslationValue>,
        locale: Option<&str>,
    ) -> StoreResult<SetOutcome> {
        match value.into() {
            TranslationValue::Single(value) => self
                .create_or_update_single_translation(field, &value, locale)
                .map(SetOutcome::Single),
            TranslationValue::PerLocale(values) => self.set_many(field, values).map(SetOutcome::Many),
        }
    }

    /// Upsert every (locale, value) entry in order
    pub fn set_many<I, L, V>(&self, field: &str, entries: I) -> StoreResult<Vec<TranslationRecord>>
    where
        I: IntoIterator<Item = (L, V)>,
        L: AsRef<str>,
        V: AsRef<str>,
    {
        let owner = self.owner()?;

        let mut records = Vec::new();
        for (locale, value) in entries {
            let locale = self.resolve_locale(Some(locale.as_ref()))?;
            records.push(self.upsert(owner, field, value.as_ref(), &locale)?);
        }

        debug!("Set {} translations of {}.{}", records.len(), owner, field);
        Ok(records)
    }

    /// The translated value, or `None` when there is no record
    pub fn get(&self, field: &str, locale: Option<&str>) -> StoreResult<Option<String>> {
        Ok(self.lookup(field, locale)?.map(|record| record.value))
    }

    /// Delete the record; `false` when there was nothing to delete
    pub fn clear(&self, field: &str, locale: Option<&str>) -> StoreResult<bool> {
        let owner = self.owner()?;
        let locale = self.resolve_locale(locale)?;
        let sql = format!(
            "DELETE FROM {} WHERE model = ?1 AND model_id = ?2 AND type = ?3 AND locale = ?4",
            self.table
        );

        let deleted = self.executor.run(|conn| {
            let deleted = conn.execute(&sql, params![owner.type_name, owner.id, field, locale])?;
            Ok::<_, StoreError>(deleted)
        })?;

        debug!("Cleared {}.{}[{}]: {} row(s)", owner, field, locale, deleted);
        Ok(deleted > 0)
    }

    // =========================================================================
    // Multi-locale operations
    // =========================================================================

    /// Values of a field keyed by locale
    ///
    /// With no locales every stored locale is returned; otherwise only the
    /// requested ones that exist.
    pub fn get_all(&self, field: &str, locales: &[&str]) -> StoreResult<HashMap<String, String>> {
        let owner = self.owner()?;
        let locales = self.distinct_locales(locales)?;
        let sql = format!(
            "SELECT locale, value FROM {} WHERE model = ?1 AND model_id = ?2 AND type = ?3{}",
            self.table,
            locale_filter(4, locales.len())
        );

        self.executor.run(|conn| {
            let params = filter_params(owner, &field, &locales);
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params.as_slice(), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;

            let values = rows.collect::<rusqlite::Result<HashMap<_, _>>>()?;
            debug!("Fetched {} translations of {}.{}", values.len(), owner, field);
            Ok::<_, StoreError>(values)
        })
    }

    /// Delete all or the listed locales of a field, returning the count
    pub fn clear_all(&self, field: &str, locales: &[&str]) -> StoreResult<usize> {
        let owner = self.owner()?;
        let locales = self.distinct_locales(locales)?;
        let sql = format!(
            "DELETE FROM {} WHERE model = ?1 AND model_id = ?2 AND type = ?3{}",
            self.table,
            locale_filter(4, locales.len())
        );

        let deleted = self.executor.run(|conn| {
            let params = filter_params(owner, &field, &locales);
            let deleted = conn.execute(&sql, params.as_slice())?;
            Ok::<_, StoreError>(deleted)
        })?;

        debug!("Cleared {} translations of {}.{}", deleted, owner, field);
        Ok(deleted)
    }

    /// Delete every translation of the bound owner, across all fields
    pub fn purge(&self) -> StoreResult<usize> {
        let owner = self.owner()?;
        let sql = format!("DELETE FROM {} WHERE model = ?1 AND model_id = ?2", self.table);

        let deleted = self.executor.run(|conn| {
            let deleted = conn.execute(&sql, params![owner.type_name, owner.id])?;
            Ok::<_, StoreError>(deleted)
        })?;

        debug!("Purged {} translations of {}", deleted, owner);
        Ok(deleted)
    }

    fn distinct_locales<'a>(&self, locales: &[&'a str]) -> StoreResult<IndexSet<&'a str>> {
        let distinct: IndexSet<&str> = locales.iter().copied().collect();
        for locale in &distinct {
            self.check_locale(locale)?;
        }
        Ok(distinct)
    }
}

/// `AND locale IN (...)` clause with numbered placeholders, empty for no locales
fn locale_filter(first_index: usize, count: usize) -> String {
    if count == 0 {
        return String::new();
    }

    let placeholders: Vec<String> = (first_index..first_index + count)
        .map(|i| format!("?{}", i))
        .collect();
    format!(" AND locale IN ({})", placeholders.join(", "))
}

/// Parameters for (owner, field) filters followed by the locale list
fn filter_params<'a>(
    owner: &'a OwnerRef,
    field: &'a &str,
    locales: &'a IndexSet<&str>,
) -> Vec<&'a dyn ToSql> {
    let mut params: Vec<&dyn ToSql> = vec![&owner.type_name, &owner.id, field];
    params.extend(locales.iter().map(|locale| locale as &dyn ToSql));
    params
}
