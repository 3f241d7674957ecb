//! Storage layer
//!
//! Each source keeps its producers and batch log in its own SQLite file.

pub mod leaderboard;
pub mod migrations;
pub mod sqlite;

pub use leaderboard::{LeaderboardStore, Stores};
pub use sqlite::Database;
