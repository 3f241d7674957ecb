//! leaderboard - paginated, searchable block-producer uptime leaderboard
//!
//! Two independently stored leaderboards (Snark-work and Sidecar) share one
//! page engine. The engine filters a score-descending snapshot by key, slices
//! it by offset and builds a fixed seven-slot control strip. It is exposed
//! through the `lb` CLI and an HTTP API.

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod server;
pub mod snapshot;
pub mod storage;
pub mod test_utils;

pub use error::{LbError, Result};
