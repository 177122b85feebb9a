/*!
 * Database schema definitions.
 *
 * This module contains the SQL schema for the translations table and
 * records which schema version each table was created with.
 */

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Default name of the translations table
pub const DEFAULT_TABLE_NAME: &str = "model_translations";

/// Check that a table name is a plain SQL identifier.
///
/// Table names are interpolated into statements, so only ASCII letters,
/// digits and underscores are accepted, and the first character must not be
/// a digit.
pub fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(anyhow!("Invalid table name: {:?}", name))
    }
}

/// Initialize the schema for the given translations table
pub fn initialize_schema(conn: &Connection, table: &str) -> Result<()> {
    validate_table_name(table)?;
    create_version_table(conn)?;

    let current_version = get_schema_version(conn, table)?;

    if current_version == 0 {
        info!("Initializing translations table '{}' (schema v{})", table, SCHEMA_VERSION);
        create_translations_table(conn, table)?;
        set_schema_version(conn, table, SCHEMA_VERSION)?;
    } else if current_version > SCHEMA_VERSION {
        return Err(anyhow!(
            "Table '{}' uses schema v{}, newer than supported v{}",
            table,
            current_version,
            SCHEMA_VERSION
        ));
    } else {
        debug!("Translations table '{}' is up to date (v{})", table, current_version);
    }

    Ok(())
}

fn create_version_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            table_name TEXT PRIMARY KEY,
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .context("Failed to create schema_version table")?;
    Ok(())
}

/// Get the schema version recorded for a table, 0 if none
fn get_schema_version(conn: &Connection, table: &str) -> Result<i32> {
    let version: Option<i32> = conn
        .query_row(
            "SELECT version FROM schema_version WHERE table_name = ?1",
            [table],
            |row| row.get(0),
        )
        .optional()
        .context("Failed to read schema version")?;

    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, table: &str, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (table_name, version, updated_at) VALUES (?1, ?2, datetime('now'))",
        rusqlite::params![table, version],
    )?;
    Ok(())
}

/// Create the translations table with its unique key and lookup index
fn create_translations_table(conn: &Connection, table: &str) -> Result<()> {
    conn.execute_batch(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            type TEXT NOT NULL,
            value TEXT NOT NULL,
            locale TEXT NOT NULL,
            model TEXT NOT NULL,
            model_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            UNIQUE(model, model_id, type, locale)
        );

        CREATE INDEX IF NOT EXISTS idx_{table}_owner_field
            ON {table}(model, model_id, type, locale);
        "#
    ))
    .with_context(|| format!("Failed to create translations table '{}'", table))?;

    info!("Translations table '{}' created", table);
    Ok(())
}
