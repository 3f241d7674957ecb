//! Snapshot tokens and the cache that backs them
//!
//! A snapshot is one fetched [`ResultSet`]. Its token names the source and
//! the fetch instant, e.g. `snark-1700000000000`.

pub mod cache;

use std::fmt;
use std::str::FromStr;

use crate::core::{ResultSet, Source};
use crate::error::{LbError, Result};

pub use cache::{CacheStats, SnapshotCache};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotKey {
    pub source: Source,
    pub fetched_at_ms: i64,
}

impl SnapshotKey {
    #[must_use]
    pub fn of(result_set: &ResultSet) -> Self {
        Self {
            source: result_set.source,
            fetched_at_ms: result_set.fetched_at.timestamp_millis(),
        }
    }

    #[must_use]
    pub fn token(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.fetched_at_ms)
    }
}

impl FromStr for SnapshotKey {
    type Err = LbError;

    fn from_str(token: &str) -> Result<Self> {
        let invalid = || LbError::InvalidRequest(format!("malformed snapshot token: {token}"));
        let (source, digits) = token.rsplit_once('-').ok_or_else(invalid)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        // Pre-epoch timestamps render with a second dash: `snark--5`.
        let (source, negative) = match source.strip_suffix('-') {
            Some(source) => (source, true),
            None => (source, false),
        };
        let millis: i64 = digits.parse().map_err(|_| invalid())?;
        Ok(Self {
            source: source.parse()?,
            fetched_at_ms: if negative { -millis } else { millis },
        })
    }
}
