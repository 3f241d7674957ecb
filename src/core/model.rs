//! Leaderboard data contracts shared by the store, the engine and the API.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LbError, Result};

/// One of the two independently fetched uptime leaderboards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Snark-work uptime system
    #[serde(alias = "snark-work")]
    #[value(alias = "snark-work")]
    Snark,
    /// Sidecar uptime system
    Sidecar,
}

impl Source {
    pub const ALL: [Self; 2] = [Self::Snark, Self::Sidecar];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Snark => "snark",
            Self::Sidecar => "sidecar",
        }
    }

    /// Human-facing tab title.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Snark => "Snark-work Uptime System",
            Self::Sidecar => "Sidecar Uptime System",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = LbError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "snark" | "snark-work" | "snarkwork" => Ok(Self::Snark),
            "sidecar" => Ok(Self::Sidecar),
            _ => Err(LbError::UnknownSource(value.to_string())),
        }
    }
}

/// A single block producer row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    pub score_percent: f64,
}

impl Entry {
    #[must_use]
    pub fn new(key: impl Into<String>, score: Option<i64>, score_percent: f64) -> Self {
        Self {
            key: key.into(),
            score,
            score_percent,
        }
    }
}

/// Summary numbers shown above the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardStats {
    pub total_count: u64,
    pub max_score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

/// Full score-descending snapshot of one source, fetched atomically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub source: Source,
    pub entries: Vec<Entry>,
    pub total_count: u64,
    pub max_score: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl ResultSet {
    #[must_use]
    pub fn new(source: Source, entries: Vec<Entry>, max_score: i64, last_modified: Option<String>) -> Self {
        Self {
            source,
            total_count: entries.len() as u64,
            entries,
            max_score,
            last_modified,
            fetched_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A successful fetch that returned no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> LeaderboardStats {
        LeaderboardStats {
            total_count: self.total_count,
            max_score: self.max_score,
            last_modified: self.last_modified.clone(),
        }
    }

    /// Checks a result set received from outside the process.
    pub fn validate(&self) -> Result<()> {
        if self.total_count != self.entries.len() as u64 {
            return Err(LbError::InvalidResultSet(format!(
                "total_count {} does not match {} entries",
                self.total_count,
                self.entries.len()
            )));
        }
        if let Some(pos) = self.entries.iter().position(|e| !e.score_percent.is_finite()) {
            return Err(LbError::InvalidResultSet(format!(
                "entry {} has a non-finite score_percent",
                pos + 1
            )));
        }
        Ok(())
    }
}

/// Client-chosen view over a result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page_size: usize,
    pub page_number: usize,
    /// Explicit start offset; derived from `page_number` when absent.
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub search_term: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(Self::DEFAULT_PAGE_SIZE)
    }
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: usize = 10;

    #[must_use]
    pub const fn first(page_size: usize) -> Self {
        Self::page(page_size, 1)
    }

    #[must_use]
    pub const fn page(page_size: usize, page_number: usize) -> Self {
        Self {
            page_size,
            page_number,
            offset: None,
            search_term: None,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the search term; an empty string means no search.
    #[must_use]
    pub fn with_search(mut self, term: Option<impl Into<String>>) -> Self {
        self.search_term = term.map(Into::into).filter(|t| !t.is_empty());
        self
    }

    /// Active search term, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search_term.as_deref().filter(|t| !t.is_empty())
    }

    #[must_use]
    pub const fn effective_offset(&self) -> usize {
        match self.offset {
            Some(offset) => offset,
            None => self.page_number.saturating_sub(1).saturating_mul(self.page_size),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(LbError::InvalidRequest("page_size must be at least 1".to_string()));
        }
        if self.page_number == 0 {
            return Err(LbError::InvalidRequest("page_number must be at least 1".to_string()));
        }
        Ok(())
    }
}
