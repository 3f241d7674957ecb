//! Page computation: filter, slice, project and build controls.

use serde::Serialize;
use tracing::debug;

use crate::config::DisplayConfig;
use crate::core::controls::{self, PaginationControls};
use crate::core::filter::{self, Ranked};
use crate::core::model::{LeaderboardStats, PageRequest, ResultSet, Source};
use crate::error::Result;

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub rank: usize,
    pub key: String,
    /// Omitted when the score column is hidden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
    pub score_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    pub source: Source,
    pub rows: Vec<RowView>,
    pub total_filtered_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_size: usize,
    pub offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    pub controls: PaginationControls,
    pub stats: LeaderboardStats,
    pub show_score: bool,
    /// Rows are withheld while the leaderboard is under maintenance.
    pub maintenance: bool,
    /// The fetch succeeded but the source has no scored producers.
    pub leaderboard_empty: bool,
}

/// Pure page engine shared by both tabs.
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    display: DisplayConfig,
}

impl Paginator {
    #[must_use]
    pub const fn new(display: DisplayConfig) -> Self {
        Self { display }
    }

    #[must_use]
    pub const fn display(&self) -> &DisplayConfig {
        &self.display
    }

    /// Compute the visible page of `result_set` for `request`.
    ///
    /// Identical inputs always produce identical output.
    pub fn compute(&self, result_set: &ResultSet, request: &PageRequest) -> Result<PageResult> {
        request.validate()?;

        let search = request.search();
        let offset = request.effective_offset();
        let filtered = filter::filter(&result_set.entries, search);
        let total_filtered_count = filtered.len();
        let total_pages = total_filtered_count.div_ceil(request.page_size);

        let rows = if self.display.maintenance_mode {
            Vec::new()
        } else {
            filter::slice(&filtered, offset, request.page_size, search.is_some())
                .into_iter()
                .map(|ranked| self.project(ranked))
                .collect()
        };

        debug!(
            target: "pagination",
            source = %result_set.source,
            search = ?search,
            offset,
            page_size = request.page_size,
            matched = total_filtered_count,
            rows = rows.len(),
            "computed page"
        );

        Ok(PageResult {
            source: result_set.source,
            rows,
            total_filtered_count,
            total_pages,
            current_page: request.page_number,
            page_size: request.page_size,
            offset,
            search_term: search.map(str::to_string),
            controls: controls::build(request.page_number, total_pages, request.page_size, offset),
            stats: result_set.stats(),
            show_score: self.display.show_score_column,
            maintenance: self.display.maintenance_mode,
            leaderboard_empty: result_set.is_empty(),
        })
    }

    fn project(&self, ranked: Ranked<'_>) -> RowView {
        RowView {
            rank: ranked.rank,
            key: ranked.entry.key.clone(),
            score: if self.display.show_score_column {
                ranked.entry.score
            } else {
                None
            },
            score_percent: ranked.entry.score_percent,
        }
    }
}
