//! Pagination and search engine
//!
//! Everything here is free of I/O: a page is a pure function of the full
//! result set, the page request and the display config.

pub mod controls;
pub mod filter;
pub mod model;
pub mod paginate;
pub mod tabs;

pub use controls::{Control, NavTarget, PaginationControls, Slot};
pub use model::{Entry, LeaderboardStats, PageRequest, ResultSet, Source};
pub use paginate::{PageResult, Paginator, RowView};
pub use tabs::{LeaderboardFetcher, Rendered, TabController, Ticket};
