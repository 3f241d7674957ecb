//! Leaderboard queries against a source database.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::Connection;
use tracing::{debug, warn};

use crate::config::Config;
use crate::core::{Entry, LeaderboardFetcher, ResultSet, Source};
use crate::error::{LbError, Result};
use crate::storage::sqlite::Database;

/// Display format of the last complete batch window.
pub const LAST_MODIFIED_FORMAT: &str = "%d-%m-%Y %H:%M";

const SECONDS_PER_DAY: i64 = 86_400;

const ENTRIES_SQL: &str = "SELECT block_producer_key, score, score_percent
     FROM nodes
     WHERE application_status = 1 AND score IS NOT NULL
     ORDER BY score DESC, block_producer_key ASC";

const COUNT_SQL: &str =
    "SELECT COUNT(*) FROM nodes WHERE application_status = 1 AND score IS NOT NULL";

// Batches inside the trailing window that ends at the newest batch already
// on disk. An empty bot_logs table yields (0, NULL).
const WINDOW_SQL: &str = "WITH recent AS (
         SELECT batch_end_epoch AS end_epoch,
                batch_end_epoch - ?2 AS start_epoch
         FROM bot_logs
         WHERE file_timestamps <= ?1
         ORDER BY batch_end_epoch DESC
         LIMIT 1
     )
     SELECT COUNT(b.id), MAX(recent.end_epoch)
     FROM recent
     LEFT JOIN bot_logs b
       ON b.batch_start_epoch >= recent.start_epoch
      AND b.batch_end_epoch <= recent.end_epoch";

/// One source's leaderboard store.
pub struct LeaderboardStore {
    source: Source,
    db: Mutex<Database>,
    window_days: u32,
}

impl LeaderboardStore {
    pub fn open(
        source: Source,
        path: impl AsRef<Path>,
        busy_timeout: Duration,
        window_days: u32,
    ) -> Result<Self> {
        let db = Database::open(path, busy_timeout)?;
        Ok(Self {
            source,
            db: Mutex::new(db),
            window_days,
        })
    }

    #[must_use]
    pub const fn source(&self) -> Source {
        self.source
    }

    /// Run `f` against the underlying connection.
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let db = self.db.lock();
        f(db.conn())
    }

    /// Fetch the full result set as of now.
    pub fn fetch(&self) -> Result<ResultSet> {
        self.fetch_at(Utc::now())
    }

    /// Fetch the full result set, treating `now` as the current time.
    ///
    /// Store errors are reported as [`LbError::Fetch`]; an empty table is a
    /// successful, empty result set.
    pub fn fetch_at(&self, now: DateTime<Utc>) -> Result<ResultSet> {
        let db = self.db.lock();
        let result = read_snapshot(db.conn(), self.source, self.window_days, now);
        drop(db);

        match result {
            Ok(result_set) => {
                debug!(
                    target: "storage",
                    source = %self.source,
                    rows = result_set.len(),
                    max_score = result_set.max_score,
                    "fetched leaderboard"
                );
                Ok(result_set)
            }
            Err(err) => {
                warn!(target: "storage", source = %self.source, error = %err, "leaderboard fetch failed");
                Err(LbError::Fetch {
                    tab: self.source,
                    message: err.to_string(),
                })
            }
        }
    }
}

fn read_snapshot(
    conn: &Connection,
    source: Source,
    window_days: u32,
    now: DateTime<Utc>,
) -> rusqlite::Result<ResultSet> {
    // One read transaction so rows, count and window stats agree.
    let tx = conn.unchecked_transaction()?;

    let total_count: i64 = tx.query_row(COUNT_SQL, [], |row| row.get(0))?;

    let mut stmt = tx.prepare(ENTRIES_SQL)?;
    let entries = stmt
        .query_map([], |row| {
            Ok(Entry {
                key: row.get(0)?,
                score: row.get(1)?,
                score_percent: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    drop(stmt);

    let window_seconds = i64::from(window_days) * SECONDS_PER_DAY;
    let (max_score, end_epoch): (i64, Option<i64>) =
        tx.query_row(WINDOW_SQL, (now.timestamp(), window_seconds), |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?;

    tx.commit()?;

    let last_modified = end_epoch
        .and_then(|epoch| DateTime::from_timestamp(epoch, 0))
        .map(|ts| ts.format(LAST_MODIFIED_FORMAT).to_string());

    Ok(ResultSet {
        source,
        total_count: u64::try_from(total_count).unwrap_or_default(),
        entries,
        max_score,
        last_modified,
        fetched_at: now,
    })
}

/// Both source stores, opened from config.
pub struct Stores {
    snark: Arc<LeaderboardStore>,
    sidecar: Arc<LeaderboardStore>,
}

impl Stores {
    pub fn open(config: &Config, root: &Path) -> Result<Self> {
        let busy_timeout = Duration::from_millis(config.database.busy_timeout_ms);
        let open = |source: Source| {
            LeaderboardStore::open(
                source,
                config.database.path_for(source, root),
                busy_timeout,
                config.scoring.window_days,
            )
            .map(Arc::new)
        };
        Ok(Self {
            snark: open(Source::Snark)?,
            sidecar: open(Source::Sidecar)?,
        })
    }

    #[must_use]
    pub const fn get(&self, source: Source) -> &Arc<LeaderboardStore> {
        match source {
            Source::Snark => &self.snark,
            Source::Sidecar => &self.sidecar,
        }
    }
}

impl LeaderboardFetcher for Stores {
    fn fetch(&self, source: Source) -> Result<ResultSet> {
        self.get(source).fetch()
    }
}
