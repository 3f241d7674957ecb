//! Schema migrations tracked through `PRAGMA user_version`.

use rusqlite::Connection;
use tracing::info;

use crate::error::Result;

pub const SCHEMA_VERSION: u32 = 1;

const MIGRATIONS: &[&str] = &[
    // v1: scored producers and the batch log used for the max-score window
    "CREATE TABLE IF NOT EXISTS nodes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        block_producer_key TEXT NOT NULL UNIQUE,
        score INTEGER,
        score_percent REAL NOT NULL DEFAULT 0,
        application_status INTEGER NOT NULL DEFAULT 0,
        updated_at TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_nodes_score ON nodes(score DESC);

    CREATE TABLE IF NOT EXISTS bot_logs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        files_processed INTEGER NOT NULL DEFAULT 0,
        file_timestamps INTEGER NOT NULL,
        batch_start_epoch INTEGER NOT NULL,
        batch_end_epoch INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_bot_logs_end ON bot_logs(batch_end_epoch DESC);",
];

/// Bring the schema up to [`SCHEMA_VERSION`] and return the resulting version.
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    let current: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;

    for (idx, sql) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        let version = idx as u32 + 1;
        conn.execute_batch(sql)?;
        conn.pragma_update(None, "user_version", version)?;
        info!(target: "storage", version, "applied schema migration");
    }

    Ok(SCHEMA_VERSION.max(current))
}
