use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::Source;
use crate::error::{LbError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("LB_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("leaderboard/config.toml"))
    }

    fn load_project(root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&root.join("config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| LbError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| LbError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.display {
            self.display.merge(patch);
        }
        if let Some(patch) = patch.database {
            self.database.merge(patch);
        }
        if let Some(patch) = patch.scoring {
            self.scoring.merge(patch);
        }
        if let Some(patch) = patch.pagination {
            self.pagination.merge(patch);
        }
        if let Some(patch) = patch.cache {
            self.cache.merge(patch);
        }
        if let Some(patch) = patch.server {
            self.server.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_bool("LB_SHOW_SCORE_COLUMN") {
            self.display.show_score_column = value;
        }
        if let Some(value) = env_bool("LB_MAINTENANCE_MODE") {
            self.display.maintenance_mode = value;
        }
        if let Some(value) = env_string("LB_EXTERNAL_LINK_URL") {
            self.display.external_link_url = value;
        }

        if let Some(value) = env_string("LB_SNARK_DB") {
            self.database.snark_path = Some(PathBuf::from(value));
        }
        if let Some(value) = env_string("LB_SIDECAR_DB") {
            self.database.sidecar_path = Some(PathBuf::from(value));
        }
        if let Some(value) = env_u64("LB_DB_BUSY_TIMEOUT_MS")? {
            self.database.busy_timeout_ms = value;
        }

        if let Some(value) = env_u32("LB_SCORE_WINDOW_DAYS")? {
            self.scoring.window_days = value;
        }

        if let Some(value) = env_usize("LB_DEFAULT_PAGE_SIZE")? {
            self.pagination.default_page_size = value;
        }

        if let Some(value) = env_bool("LB_CACHE_ENABLED") {
            self.cache.enabled = value;
        }
        if let Some(value) = env_usize("LB_CACHE_CAPACITY")? {
            self.cache.capacity = value;
        }
        if let Some(value) = env_string("LB_CACHE_TTL") {
            self.cache.ttl = humantime_serde::re::humantime::parse_duration(&value)
                .map_err(|err| LbError::Config(format!("invalid LB_CACHE_TTL value {value}: {err}")))?;
        }

        if let Some(value) = env_string("LB_BIND") {
            self.server.bind = value;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.pagination.default_page_size == 0 {
            return Err(LbError::Config(
                "pagination.default_page_size must be at least 1".to_string(),
            ));
        }
        if self.pagination.page_size_options.contains(&0) {
            return Err(LbError::Config(
                "pagination.page_size_options must not contain 0".to_string(),
            ));
        }
        if self.scoring.window_days == 0 {
            return Err(LbError::Config(
                "scoring.window_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Static presentation flags, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub show_score_column: bool,
    #[serde(default)]
    pub maintenance_mode: bool,
    #[serde(default)]
    pub external_link_url: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_score_column: false,
            maintenance_mode: false,
            external_link_url: "https://minaprotocol.com/blog".to_string(),
        }
    }
}

impl DisplayConfig {
    fn merge(&mut self, patch: DisplayPatch) {
        if let Some(value) = patch.show_score_column {
            self.show_score_column = value;
        }
        if let Some(value) = patch.maintenance_mode {
            self.maintenance_mode = value;
        }
        if let Some(value) = patch.external_link_url {
            self.external_link_url = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub snark_path: Option<PathBuf>,
    #[serde(default)]
    pub sidecar_path: Option<PathBuf>,
    #[serde(default)]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            snark_path: None,
            sidecar_path: None,
            busy_timeout_ms: 5000,
        }
    }
}

impl DatabaseConfig {
    /// Database file for `source`, defaulting to `<root>/<source>.db`.
    #[must_use]
    pub fn path_for(&self, source: Source, root: &Path) -> PathBuf {
        let configured = match source {
            Source::Snark => self.snark_path.as_ref(),
            Source::Sidecar => self.sidecar_path.as_ref(),
        };
        match configured {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => root.join(path),
            None => root.join(format!("{source}.db")),
        }
    }

    fn merge(&mut self, patch: DatabasePatch) {
        if let Some(value) = patch.snark_path {
            self.snark_path = Some(value);
        }
        if let Some(value) = patch.sidecar_path {
            self.sidecar_path = Some(value);
        }
        if let Some(value) = patch.busy_timeout_ms {
            self.busy_timeout_ms = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Trailing window used for the max-score batch count.
    #[serde(default)]
    pub window_days: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { window_days: 90 }
    }
}

impl ScoringConfig {
    fn merge(&mut self, patch: ScoringPatch) {
        if let Some(value) = patch.window_days {
            self.window_days = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default)]
    pub default_page_size: usize,
    /// Sizes offered by the page-size selector. The engine accepts any size.
    #[serde(default)]
    pub page_size_options: Vec<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            page_size_options: (1..=10).map(|step| step * 10).collect(),
        }
    }
}

impl PaginationConfig {
    fn merge(&mut self, patch: PaginationPatch) {
        if let Some(value) = patch.default_page_size {
            self.default_page_size = value;
        }
        if let Some(values) = patch.page_size_options {
            self.page_size_options = values;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Maximum number of retained snapshots across both sources.
    #[serde(default)]
    pub capacity: usize,
    #[serde(default, with = "humantime_serde")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 8,
            ttl: Duration::from_secs(15 * 60),
        }
    }
}

impl CacheConfig {
    fn merge(&mut self, patch: CachePatch) {
        if let Some(value) = patch.enabled {
            self.enabled = value;
        }
        if let Some(value) = patch.capacity {
            self.capacity = value;
        }
        if let Some(value) = patch.ttl {
            self.ttl = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

impl ServerConfig {
    fn merge(&mut self, patch: ServerPatch) {
        if let Some(value) = patch.bind {
            self.bind = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub display: Option<DisplayPatch>,
    pub database: Option<DatabasePatch>,
    pub scoring: Option<ScoringPatch>,
    pub pagination: Option<PaginationPatch>,
    pub cache: Option<CachePatch>,
    pub server: Option<ServerPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DisplayPatch {
    pub show_score_column: Option<bool>,
    pub maintenance_mode: Option<bool>,
    pub external_link_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DatabasePatch {
    pub snark_path: Option<PathBuf>,
    pub sidecar_path: Option<PathBuf>,
    pub busy_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ScoringPatch {
    pub window_days: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PaginationPatch {
    pub default_page_size: Option<usize>,
    pub page_size_options: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CachePatch {
    pub enabled: Option<bool>,
    pub capacity: Option<usize>,
    #[serde(default, with = "humantime_serde")]
    pub ttl: Option<Duration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ServerPatch {
    pub bind: Option<String>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_u32(key: &str) -> Result<Option<u32>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u32>()
            .map(Some)
            .map_err(|err| LbError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|err| LbError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|err| LbError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_layout() {
        let config = Config::default();
        assert_eq!(config.pagination.default_page_size, 10);
        assert_eq!(
            config.pagination.page_size_options,
            vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]
        );
        assert_eq!(config.scoring.window_days, 90);
        assert!(!config.display.maintenance_mode);
        assert!(config.cache.enabled);
    }

    #[test]
    fn patch_only_overrides_present_keys() {
        let mut config = Config::default();
        let patch: ConfigPatch = toml::from_str(
            r#"
            [display]
            maintenance_mode = true

            [cache]
            ttl = "2m"
            "#,
        )
        .unwrap();
        config.merge_patch(patch);
        assert!(config.display.maintenance_mode);
        assert!(!config.display.show_score_column);
        assert_eq!(config.cache.ttl, Duration::from_secs(120));
        assert_eq!(config.cache.capacity, 8);
    }

    #[test]
    fn database_paths_resolve_against_root() {
        let root = Path::new("/srv/lb");
        let mut db = DatabaseConfig::default();
        assert_eq!(db.path_for(Source::Snark, root), root.join("snark.db"));
        db.sidecar_path = Some(PathBuf::from("data/side.db"));
        assert_eq!(db.path_for(Source::Sidecar, root), root.join("data/side.db"));
        db.snark_path = Some(PathBuf::from("/var/snark.db"));
        assert_eq!(db.path_for(Source::Snark, root), PathBuf::from("/var/snark.db"));
    }

    #[test]
    fn validate_rejects_zero_page_size() {
        let mut config = Config::default();
        config.pagination.default_page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn full_config_round_trips_through_toml() {
        let config = Config::default();
        let raw = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&raw).unwrap();
        assert_eq!(parsed.cache.ttl, config.cache.ttl);
        assert_eq!(parsed.server.bind, config.server.bind);
    }
}
