/*!
 * Factory handing out translation stores.
 *
 * `Translations` holds what every store needs (the database handle, the
 * locale provider and locale policy) and binds stores to owners.
 */

use anyhow::Result;
use log::info;
use rusqlite::Connection;
use std::sync::Arc;

use crate::app_config::Config;
use crate::database::connection::{DatabaseConnection, IN_MEMORY_PATH};
use crate::errors::StoreResult;
use crate::locale::{LocaleProvider, SharedLocale};

use super::owner::{Owner, OwnerRef};
use super::translation_store::TranslationStore;

/// Shared entry point for obtaining bound translation stores
#[derive(Clone)]
pub struct Translations {
    /// Database connection shared by all stores
    db: DatabaseConnection,
    /// Source of the current locale
    locales: Arc<dyn LocaleProvider>,
    /// Whether stores validate locales
    strict_locales: bool,
}

impl std::fmt::Debug for Translations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translations")
            .field("db", &self.db)
            .field("strict_locales", &self.strict_locales)
            .finish_non_exhaustive()
    }
}

impl Translations {
    /// Create a factory over an open database
    pub fn new(db: DatabaseConnection, locales: Arc<dyn LocaleProvider>) -> Self {
        Self {
            db,
            locales,
            strict_locales: false,
        }
    }

    /// Create a factory with an in-memory database (for testing)
    pub fn new_in_memory(locales: Arc<dyn LocaleProvider>) -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db, locales))
    }

    /// Open the configured database with `default_locale` as the current locale
    ///
    /// A missing `database.path` uses the per-user data directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let locales = Arc::new(SharedLocale::new(config.default_locale.as_str()));
        Self::from_config_with_locales(config, locales)
    }

    /// Open the configured database, taking the current locale from `locales`
    ///
    /// `default_locale` is ignored; the provider decides the locale.
    pub fn from_config_with_locales(
        config: &Config,
        locales: Arc<dyn LocaleProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let path = match &config.database.path {
            Some(path) => path.clone(),
            None => DatabaseConnection::default_database_path()?,
        };

        let db = DatabaseConnection::open(
            &path,
            &config.database.table_name,
            config.database.busy_timeout(),
        )?;

        info!(
            "Translation store ready (table '{}', {})",
            db.table(),
            if path.as_os_str() == IN_MEMORY_PATH { "in-memory" } else { "file" }
        );

        Ok(Self {
            db,
            locales,
            strict_locales: config.strict_locales,
        })
    }

    /// Enable or disable locale validation for stores created from now on
    pub fn with_strict_locales(mut self, strict: bool) -> Self {
        self.strict_locales = strict;
        self
    }

    /// Get the underlying database connection
    pub fn database(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Locale used when an operation names none
    pub fn current_locale(&self) -> String {
        self.locales.current_locale()
    }

    /// An unbound store; call `bind` before using it
    pub fn store(&self) -> TranslationStore {
        self.build_store(None)
    }

    /// A store bound to `owner`
    pub fn store_for<O: Owner + ?Sized>(&self, owner: &O) -> TranslationStore {
        self.build_store(Some(OwnerRef::of(owner)))
    }

    fn build_store(&self, owner: Option<OwnerRef>) -> TranslationStore {
        TranslationStore::from_parts(
            self.db.clone(),
            Arc::from(self.db.table()),
            self.locales.clone(),
            self.strict_locales,
            owner,
        )
    }

    /// Run `f` against a store bound to `owner` inside one transaction
    ///
    /// Everything `f` writes commits together when it returns `Ok` and is
    /// rolled back when it returns an error.
    ///
    /// The connection stays locked while `f` runs. Stores obtained from this
    /// factory on the same thread fail with `StoreError::Connection` until
    /// `f` returns; use the store passed to `f` instead.
    pub fn transaction<O, T, F>(&self, owner: &O, f: F) -> StoreResult<T>
    where
        O: Owner + ?Sized,
        F: FnOnce(&TranslationStore<&Connection>) -> StoreResult<T>,
    {
        let owner = OwnerRef::of(owner);

        self.db.transaction(|tx| {
            let conn: &Connection = tx;
            let store = TranslationStore::from_parts(
                conn,
                Arc::from(self.db.table()),
                self.locales.clone(),
                self.strict_locales,
                Some(owner),
            );
            f(&store)
        })
    }
}
