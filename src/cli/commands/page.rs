//! lb page - Compute one page of a leaderboard

use std::io::Read;
use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::formatters::PageView;
use crate::cli::output::{Formattable, emit_robot, robot_ok};
use crate::core::{LeaderboardFetcher, PageRequest, ResultSet, Source};
use crate::error::{LbError, Result};

#[derive(Args, Debug)]
pub struct PageArgs {
    /// Leaderboard to page through
    #[arg(value_enum)]
    pub source: Source,

    /// Rows per page (default: pagination.default_page_size)
    #[arg(long, short = 's')]
    pub page_size: Option<usize>,

    /// 1-based page number
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: usize,

    /// Explicit start offset (default: derived from --page)
    #[arg(long)]
    pub offset: Option<usize>,

    /// Case-insensitive substring filter on the producer key
    #[arg(long, short = 'q')]
    pub search: Option<String>,

    /// Read the result set from a JSON file ("-" for stdin) instead of the store
    #[arg(long)]
    pub input: Option<PathBuf>,
}

impl PageArgs {
    #[must_use]
    pub fn request(&self, default_page_size: usize) -> PageRequest {
        let request = PageRequest::page(self.page_size.unwrap_or(default_page_size), self.page)
            .with_search(self.search.clone());
        match self.offset {
            Some(offset) => request.with_offset(offset),
            None => request,
        }
    }
}

pub fn run(ctx: &AppContext, args: &PageArgs) -> Result<()> {
    let result_set = match &args.input {
        Some(path) => read_result_set(path, args.source)?,
        None => ctx.stores.fetch(args.source)?,
    };
    let request = args.request(ctx.config.pagination.default_page_size);
    let page = ctx.paginator.compute(&result_set, &request)?;
    print_page(ctx, PageView::new(page))
}

/// Shared by `page` and `browse`.
pub fn print_page(ctx: &AppContext, view: PageView) -> Result<()> {
    if ctx.robot_mode {
        return emit_robot(&robot_ok(view));
    }
    println!("{}", view.format(ctx.output_format));
    Ok(())
}

fn read_result_set(path: &std::path::Path, source: Source) -> Result<ResultSet> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    let result_set: ResultSet = serde_json::from_str(&raw)?;
    if result_set.source != source {
        return Err(LbError::InvalidRequest(format!(
            "input result set is for {} but {source} was requested",
            result_set.source
        )));
    }
    result_set.validate()?;
    Ok(result_set)
}
