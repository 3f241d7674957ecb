//! Client-side tab orchestration.
//!
//! A [`TabController`] retains one full result set per tab and re-runs the
//! shared [`Paginator`] whenever the user navigates, searches or switches
//! tabs. Only the active tab's page is kept; switching discards it.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::core::controls::NavTarget;
use crate::core::model::{PageRequest, ResultSet, Source};
use crate::core::paginate::{PageResult, Paginator};
use crate::error::Result;

/// Anything that can produce a fresh result set for a tab.
pub trait LeaderboardFetcher {
    fn fetch(&self, source: Source) -> Result<ResultSet>;
}

/// Sequence number attached to each page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket {
    pub seq: u64,
    pub source: Source,
}

/// The page currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub ticket: Ticket,
    pub page: PageResult,
    /// A newer request had already been issued when this one landed.
    pub superseded: bool,
}

#[derive(Debug)]
pub struct TabController {
    paginator: Paginator,
    active: Source,
    page_size: usize,
    search: Option<String>,
    retained: HashMap<Source, Arc<ResultSet>>,
    last_issued: u64,
    rendered: Option<Rendered>,
}

impl TabController {
    #[must_use]
    pub fn new(paginator: Paginator, active: Source, page_size: usize) -> Self {
        Self {
            paginator,
            active,
            page_size: page_size.max(1),
            search: None,
            retained: HashMap::new(),
            last_issued: 0,
            rendered: None,
        }
    }

    #[must_use]
    pub const fn active(&self) -> Source {
        self.active
    }

    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub const fn rendered(&self) -> Option<&Rendered> {
        self.rendered.as_ref()
    }

    #[must_use]
    pub fn retained(&self, source: Source) -> Option<&Arc<ResultSet>> {
        self.retained.get(&source)
    }

    /// Replace a tab's retained result set wholesale.
    pub fn retain(&mut self, result_set: ResultSet) -> Arc<ResultSet> {
        let source = result_set.source;
        let shared = Arc::new(result_set);
        self.retained.insert(source, Arc::clone(&shared));
        shared
    }

    /// Activate `source`, fetching only if nothing is retained for it, and
    /// render its first page with the last-used search term.
    pub fn switch_to(
        &mut self,
        source: Source,
        fetcher: &dyn LeaderboardFetcher,
    ) -> Result<&Rendered> {
        if source != self.active {
            info!(target: "tabs", from = %self.active, to = %source, "switching tab");
            self.rendered = None;
        }
        self.active = source;
        self.load(PageRequest::first(self.page_size), fetcher)
    }

    /// Apply a new search term to the active tab; empty clears it.
    pub fn search(
        &mut self,
        term: Option<String>,
        fetcher: &dyn LeaderboardFetcher,
    ) -> Result<&Rendered> {
        self.search = term.filter(|t| !t.is_empty());
        self.load(PageRequest::first(self.page_size), fetcher)
    }

    /// Change the page size; navigation restarts at page one.
    pub fn set_page_size(
        &mut self,
        page_size: usize,
        fetcher: &dyn LeaderboardFetcher,
    ) -> Result<&Rendered> {
        let request = PageRequest::first(page_size);
        request.validate()?;
        self.page_size = page_size;
        self.load(request, fetcher)
    }

    /// Follow a control's precomputed target.
    pub fn navigate(
        &mut self,
        target: NavTarget,
        fetcher: &dyn LeaderboardFetcher,
    ) -> Result<&Rendered> {
        let request =
            PageRequest::page(target.page_size, target.page_number).with_offset(target.offset);
        request.validate()?;
        self.page_size = target.page_size;
        self.load(request, fetcher)
    }

    /// Refetch the active tab and render its first page.
    pub fn refresh(&mut self, fetcher: &dyn LeaderboardFetcher) -> Result<&Rendered> {
        let fresh = fetcher.fetch(self.active)?;
        self.retain(fresh);
        self.load(PageRequest::first(self.page_size), fetcher)
    }

    /// Start a page request; the ticket orders it against later ones.
    ///
    /// Meant for asynchronous callers that fetch between `begin` and
    /// [`complete`](Self::complete); the synchronous operations above pair
    /// them immediately, so only interleaved callers observe `superseded`.
    pub fn begin(&mut self) -> Ticket {
        self.last_issued += 1;
        Ticket {
            seq: self.last_issued,
            source: self.active,
        }
    }

    /// Accept a response. Whatever arrives last is what gets rendered, even
    /// if a newer request was issued in the meantime.
    pub fn complete(&mut self, ticket: Ticket, page: PageResult) -> &Rendered {
        let superseded = ticket.seq < self.last_issued;
        if superseded {
            debug!(
                target: "tabs",
                seq = ticket.seq,
                newest = self.last_issued,
                "rendering response from a superseded request"
            );
        }
        self.rendered.insert(Rendered {
            ticket,
            page,
            superseded,
        })
    }

    fn load(
        &mut self,
        request: PageRequest,
        fetcher: &dyn LeaderboardFetcher,
    ) -> Result<&Rendered> {
        let result_set = match self.retained.get(&self.active) {
            Some(retained) => Arc::clone(retained),
            None => {
                debug!(target: "tabs", source = %self.active, "no retained result set, fetching");
                let fetched = fetcher.fetch(self.active)?;
                self.retain(fetched)
            }
        };

        let request = request.with_search(self.search.clone());
        let ticket = self.begin();
        let page = self.paginator.compute(&result_set, &request)?;
        Ok(self.complete(ticket, page))
    }
}
