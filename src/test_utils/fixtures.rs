use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::params;
use tempfile::TempDir;

use crate::config::Config;
use crate::core::Source;
use crate::storage::Stores;

/// Isolated data root with both source databases opened and migrated.
pub struct LeaderboardFixture {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub config: Config,
    pub stores: Arc<Stores>,
}

impl Default for LeaderboardFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl LeaderboardFixture {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    #[must_use]
    pub fn with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().join(".leaderboard");
        let stores = Stores::open(&config, &root).expect("Failed to open stores");

        println!("[FIXTURE] Created leaderboard root: {root:?}");

        Self {
            temp_dir,
            root,
            config,
            stores: Arc::new(stores),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Insert one producer row.
    pub fn add_node(&self, source: Source, key: &str, score: Option<i64>, percent: f64, active: bool) {
        self.stores
            .get(source)
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO nodes (block_producer_key, score, score_percent, application_status)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![key, score, percent, active],
                )?;
                Ok(())
            })
            .expect("Failed to insert node");
    }

    /// Insert `count` active producers `B62q0001..` with strictly descending
    /// scores, so key `B62q{n:04}` sits at rank `n`.
    pub fn seed_ranked(&self, source: Source, count: usize) {
        let count = i64::try_from(count).expect("count fits in i64");
        for n in 1..=count {
            let score = count - n + 1;
            let percent = (score as f64 / count as f64 * 10_000.0).round() / 100.0;
            self.add_node(source, &format!("B62q{n:04}"), Some(score), percent, true);
        }
        println!("[FIXTURE] Seeded {count} producers into {source}");
    }

    /// Insert one completed batch into the source's batch log.
    pub fn add_batch(&self, source: Source, start_epoch: i64, end_epoch: i64) {
        self.stores
            .get(source)
            .with_conn(|conn| {
                conn.execute(
                    "INSERT INTO bot_logs (files_processed, file_timestamps, batch_start_epoch, batch_end_epoch)
                     VALUES (1, ?1, ?2, ?3)",
                    params![end_epoch, start_epoch, end_epoch],
                )?;
                Ok(())
            })
            .expect("Failed to insert batch");
    }

    /// Write `config.toml` into the root for CLI runs.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.root.join("config.toml");
        std::fs::write(&path, content).expect("Failed to write config");
        path
    }
}

impl Drop for LeaderboardFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up leaderboard root: {:?}", self.root);
    }
}
