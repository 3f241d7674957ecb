//! Error types for the leaderboard

use thiserror::Error;

use crate::core::Source;

#[derive(Error, Debug)]
pub enum LbError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("missing config: {0}")]
    MissingConfig(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid page request: {0}")]
    InvalidRequest(String),

    #[error("unknown source: {0} (expected snark|sidecar)")]
    UnknownSource(String),

    #[error("invalid result set: {0}")]
    InvalidResultSet(String),

    /// The store query for a tab failed. Distinct from a successful fetch
    /// that returned zero rows.
    #[error("fetch failed for {tab}: {message}")]
    Fetch { tab: Source, message: String },

    #[error("snapshot {0} is no longer cached; fetch the leaderboard again")]
    StaleSnapshot(String),
}

impl LbError {
    /// Stable machine-readable code used by robot output and the HTTP API.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Database(_) => "database",
            Self::Config(_) => "config",
            Self::MissingConfig(_) => "missing_config",
            Self::Serialization(_) => "serialization",
            Self::InvalidRequest(_) => "invalid_request",
            Self::UnknownSource(_) => "unknown_source",
            Self::InvalidResultSet(_) => "invalid_result_set",
            Self::Fetch { .. } => "fetch_failed",
            Self::StaleSnapshot(_) => "stale_snapshot",
        }
    }
}

impl From<serde_json::Error> for LbError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LbError>;
