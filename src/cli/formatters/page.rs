//! Leaderboard page formatter
//!
//! Renders a computed page as a styled table (Human), pretty JSON, one JSON
//! row per line, or tab-separated rows with and without a header.

use console::style;
use serde::Serialize;

use crate::cli::output::{Formattable, OutputFormat};
use crate::core::{PageResult, RowView};

/// A computed page plus the context it was requested in.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(flatten)]
    pub page: PageResult,
}

impl PageView {
    #[must_use]
    pub fn new(page: PageResult) -> Self {
        Self {
            label: page.source.label().to_string(),
            token: None,
            page,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn format_human(&self) -> String {
        let page = &self.page;
        let mut out = String::new();

        out.push_str(&style(&self.label).bold().to_string());
        out.push('\n');
        if let Some(updated) = &page.stats.last_modified {
            out.push_str(&style(format!("Last updated {updated}")).dim().to_string());
            out.push('\n');
        }
        out.push('\n');

        if page.maintenance {
            out.push_str(&style("Under Maintenance").yellow().bold().to_string());
            out.push('\n');
        } else if page.leaderboard_empty {
            out.push_str("No scored block producers yet.\n");
        } else if page.rows.is_empty() {
            match &page.search_term {
                Some(term) => out.push_str(&format!("! No block producers match '{term}'\n")),
                None => out.push_str("! No rows on this page\n"),
            }
        } else {
            let key_width = page
                .rows
                .iter()
                .map(|row| row.key.chars().count())
                .max()
                .unwrap_or(0)
                .max("PUBLIC KEY".len());
            let header = if page.show_score {
                format!(
                    "{:>5}  {:key_width$}  {:>7}  {}",
                    "RANK", "PUBLIC KEY", "SCORE", "%(Max Score ",
                )
            } else {
                format!("{:>5}  {:key_width$}  {}", "RANK", "PUBLIC KEY", "%(Max Score ")
            };
            out.push_str(&style(format!("{header}{})", page.stats.max_score)).dim().to_string());
            out.push('\n');
            for row in &page.rows {
                out.push_str(&human_row(row, key_width, page.show_score));
                out.push('\n');
            }
        }

        out.push('\n');
        out.push_str(&self.controls_line());
        out.push('\n');
        out.push_str(
            &style(format!(
                "{} matching, page {} of {}",
                page.total_filtered_count, page.current_page, page.total_pages
            ))
            .dim()
            .to_string(),
        );
        out
    }

    fn controls_line(&self) -> String {
        self.page
            .controls
            .controls
            .iter()
            .map(|control| {
                if control.is_current_indicator() {
                    style(format!("[{}]", control.label)).bold().to_string()
                } else if control.enabled {
                    control.label.clone()
                } else {
                    style(&control.label).dim().to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn format_plain(&self) -> String {
        self.page
            .rows
            .iter()
            .map(|row| tsv_row(row, self.page.show_score))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_tsv(&self) -> String {
        let mut out = if self.page.show_score {
            String::from("rank\tkey\tscore\tscore_percent\n")
        } else {
            String::from("rank\tkey\tscore_percent\n")
        };
        for row in &self.page.rows {
            out.push_str(&tsv_row(row, self.page.show_score));
            out.push('\n');
        }
        out
    }

    fn format_jsonl(&self) -> String {
        self.page
            .rows
            .iter()
            .filter_map(|row| serde_json::to_string(row).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Formattable for PageView {
    fn format(&self, fmt: OutputFormat) -> String {
        match fmt {
            OutputFormat::Human => self.format_human(),
            OutputFormat::Json => serde_json::to_string_pretty(self).unwrap_or_default(),
            OutputFormat::Jsonl => self.format_jsonl(),
            OutputFormat::Plain => self.format_plain(),
            OutputFormat::Tsv => self.format_tsv(),
        }
    }
}

fn human_row(row: &RowView, key_width: usize, show_score: bool) -> String {
    let percent = format!("{:.2} %", row.score_percent);
    if show_score {
        let score = row.score.map(|s| s.to_string()).unwrap_or_default();
        format!("{:>5}  {:key_width$}  {score:>7}  {percent}", row.rank, row.key)
    } else {
        format!("{:>5}  {:key_width$}  {percent}", row.rank, row.key)
    }
}

fn tsv_row(row: &RowView, show_score: bool) -> String {
    if show_score {
        let score = row.score.map(|s| s.to_string()).unwrap_or_default();
        format!("{}\t{}\t{score}\t{:.2}", row.rank, row.key, row.score_percent)
    } else {
        format!("{}\t{}\t{:.2}", row.rank, row.key, row.score_percent)
    }
}
