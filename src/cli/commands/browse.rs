//! lb browse - Interactive two-tab leaderboard browser
//!
//! Reads one command per line from stdin and prints the active tab's page
//! after each one. Commands:
//!
//! - `next`, `prev` - follow the Prev/Next controls
//! - `page N` - jump to page N
//! - `size N` - change the page size
//! - `search TERM` / `clear` - filter by key substring
//! - `tab snark|sidecar` - switch tabs
//! - `refresh` - refetch the active tab
//! - `quit` - exit

use std::io::BufRead;

use clap::Args;
use tracing::warn;

use crate::app::AppContext;
use crate::cli::commands::page::print_page;
use crate::cli::formatters::PageView;
use crate::core::{LeaderboardFetcher, NavTarget, Rendered, Slot, Source, TabController};
use crate::error::{LbError, Result};

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Tab to open first
    #[arg(long, value_enum, default_value_t = Source::Snark)]
    pub tab: Source,

    /// Initial search term
    #[arg(long, short = 'q')]
    pub search: Option<String>,

    /// Rows per page (default: pagination.default_page_size)
    #[arg(long, short = 's')]
    pub page_size: Option<usize>,
}

/// One parsed line of browser input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Prev,
    Page(usize),
    Size(usize),
    Search(Option<String>),
    Tab(Source),
    Refresh,
    Quit,
}

impl BrowseCommand {
    /// Parse a line; blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let number = |what: &str| {
            rest.parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| LbError::InvalidRequest(format!("{what} needs a positive number")))
        };

        let command = match verb.to_lowercase().as_str() {
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Prev,
            "page" | "g" => Self::Page(number("page")?),
            "size" => Self::Size(number("size")?),
            "search" | "s" => Self::Search(Some(rest.to_string()).filter(|t| !t.is_empty())),
            "clear" => Self::Search(None),
            "tab" | "t" => Self::Tab(rest.parse()?),
            "refresh" | "r" => Self::Refresh,
            "quit" | "q" | "exit" => Self::Quit,
            other => {
                return Err(LbError::InvalidRequest(format!("unknown command: {other}")));
            }
        };
        Ok(Some(command))
    }
}

/// Apply one command; `Ok(None)` means the session is over.
pub fn apply<'a>(
    tabs: &'a mut TabController,
    command: BrowseCommand,
    fetcher: &dyn LeaderboardFetcher,
) -> Result<Option<&'a Rendered>> {
    let rendered = match command {
        BrowseCommand::Quit => return Ok(None),
        BrowseCommand::Next | BrowseCommand::Prev => {
            let slot = if command == BrowseCommand::Next {
                Slot::Next
            } else {
                Slot::Prev
            };
            let target = tabs
                .rendered()
                .and_then(|r| r.page.controls.slot(slot).target)
                .ok_or_else(|| LbError::InvalidRequest(format!("{slot:?} is not available")))?;
            tabs.navigate(target, fetcher)?
        }
        BrowseCommand::Page(page_number) => {
            let page_size = tabs.page_size();
            tabs.navigate(
                NavTarget {
                    page_size,
                    page_number,
                    offset: page_number.saturating_sub(1).saturating_mul(page_size),
                },
                fetcher,
            )?
        }
        BrowseCommand::Size(size) => tabs.set_page_size(size, fetcher)?,
        BrowseCommand::Search(term) => tabs.search(term, fetcher)?,
        BrowseCommand::Tab(source) => tabs.switch_to(source, fetcher)?,
        BrowseCommand::Refresh => tabs.refresh(fetcher)?,
    };
    Ok(Some(rendered))
}

pub fn run(ctx: &AppContext, args: &BrowseArgs) -> Result<()> {
    let page_size = args
        .page_size
        .unwrap_or(ctx.config.pagination.default_page_size);
    let mut tabs = TabController::new(ctx.paginator.clone(), args.tab, page_size);
    let fetcher: &dyn LeaderboardFetcher = &*ctx.stores;

    let first = match &args.search {
        Some(term) => tabs.search(Some(term.clone()), fetcher)?,
        None => tabs.switch_to(args.tab, fetcher)?,
    };
    print_page(ctx, PageView::new(first.page.clone()))?;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let command = match BrowseCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                warn!(target: "browse", error = %err, "ignoring input");
                eprintln!("{err}");
                continue;
            }
        };
        match apply(&mut tabs, command, fetcher) {
            Ok(Some(rendered)) => print_page(ctx, PageView::new(rendered.page.clone()))?,
            Ok(None) => break,
            // navigation errors keep the session alive; store failures end it
            Err(err @ (LbError::InvalidRequest(_) | LbError::UnknownSource(_))) => {
                eprintln!("{err}");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}
