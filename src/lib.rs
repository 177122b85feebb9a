/*!
 * # translatable - per-field translation storage for domain entities
 *
 * A Rust library that stores one translated value per
 * (owner, field, locale) in a SQLite table, for any entity that can name
 * its type and identifier.
 *
 * ## Features
 *
 * - Owner binding through the `Owner` and `Translatable` traits
 * - Create, update, upsert and delete of single translations
 * - Multi-locale batch writes that preserve input order
 * - Selective reads and bulk deletes over a list of locales
 * - Atomic upserts against a unique (owner, field, locale) key
 * - Injected current-locale provider, with optional ISO 639 validation
 * - JSON configuration for the database file and table name
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `store`: translation stores and owner binding:
 *   - `store::translation_store`: per-owner operations
 *   - `store::translations`: factory binding stores to owners
 *   - `store::owner`: `Owner` / `Translatable` traits
 * - `database`: SQLite connection, schema and row models
 * - `locale`: current-locale providers and locale tag validation
 * - `app_config`: Configuration management
 * - `errors`: Error types for store operations
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod database;
pub mod errors;
pub mod locale;
pub mod store;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::{DatabaseConnection, TranslationRecord};
pub use errors::{StoreError, StoreResult};
pub use locale::{FixedLocale, LocaleProvider, SharedLocale};
pub use store::{
    Owner, OwnerRef, SetOutcome, Translatable, TranslationStore, TranslationValue, Translations,
};
