//! SQLite schemas for the index store and the dated partitions

use rusqlite::{Connection, OptionalExtension};

/// Current index schema version
pub const DB_VERSION: i32 = 1;

/// Metadata key holding the partition's date
pub const METADATA_DATE: &str = "date";

/// Metadata key holding the partition's time zone label
pub const METADATA_TIMEZONE: &str = "timezone";

/// Initialize the index schema (idempotent)
pub fn init_index_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS metadata (
            key TEXT PRIMARY KEY,
            value TEXT
        );
        CREATE TABLE IF NOT EXISTS date_ranges (
            id TEXT PRIMARY KEY,
            range BLOB NOT NULL
        );",
    )?;

    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES ('version', ?1)",
        [DB_VERSION.to_string()],
    )?;

    Ok(())
}

/// Initialize the partition schema (idempotent)
pub fn init_partition_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS metadata (
            key TEXT PRIMARY KEY,
            value TEXT
        );
        CREATE TABLE IF NOT EXISTS entries (
            id TEXT NOT NULL,
            tag TEXT NOT NULL,
            value BLOB,
            PRIMARY KEY (id, tag)
        );",
    )
}

/// Read a value from a `metadata` table, `None` if the key is absent
pub fn read_metadata(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row("SELECT value FROM metadata WHERE key = ?1", [key], |row| {
        row.get(0)
    })
    .optional()
}

/// Insert or replace a value in a `metadata` table
pub fn write_metadata(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        [key, value],
    )?;
    Ok(())
}
