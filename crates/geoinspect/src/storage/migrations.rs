//! Database schema versioning for the key-value store.
//!
//! Versions are applied in order inside a single transaction; the reached
//! version is recorded in the `metadata` table.

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};

use super::schema::{CREATE_KV_TABLE, CREATE_METADATA_TABLE};

/// The current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Statements for each schema version, indexed by `version - 1`.
const MIGRATIONS: &[&[&str]] = &[
    // v1: key-value slots
    &[CREATE_KV_TABLE],
];

/// Initialize the database schema, applying any pending versions.
///
/// # Errors
///
/// Returns an error if the stored version is unreadable or a statement fails.
pub fn initialize_schema(conn: &mut Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;

    let from = schema_version(conn)?;
    if from > CURRENT_VERSION {
        return Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {from} is newer than supported version {CURRENT_VERSION}"
            ),
        });
    }
    if from == CURRENT_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for version in (from + 1)..=CURRENT_VERSION {
        for statement in statements_for(version)? {
            tx.execute(statement, [])?;
        }
        debug!("Applied schema version {}", version);
    }
    tx.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, CURRENT_VERSION.to_string()),
    )?;
    tx.commit()?;
    Ok(())
}

/// Get the schema version recorded in the database, 0 if none.
pub fn schema_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
    }
}

fn statements_for(version: i32) -> Result<&'static [&'static str]> {
    usize::try_from(version - 1)
        .ok()
        .and_then(|idx| MIGRATIONS.get(idx))
        .copied()
        .ok_or_else(|| Error::DatabaseMigration {
            message: format!("unknown migration version: {version}"),
        })
}
