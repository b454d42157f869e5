//! Incremental, restartable accumulator over the portal's paged listing.
//!
//! The feed is owned by exactly one caller (a view, the service facade, or
//! a CLI command); nothing mutates it from outside. Two guards keep the
//! accumulated list coherent:
//!
//! - a single-outstanding-request guard: page N+1 cannot start while page N
//!   is in flight, so pages append strictly in request order;
//! - a generation counter bumped on every [`BidFeed::reset`]: a response
//!   that completes after the feed was restarted (filter change, view
//!   switched tenders) is discarded instead of corrupting the new state.
//!
//! A failed page records the error and leaves everything already
//! accumulated intact, so the caller can retry manually.

use thiserror::Error;

use super::domain::{Bid, BidStatus};
use super::portal::{BidPage, BidPortal, BidQuery, PortalError, DEFAULT_PAGE_LIMIT};
use crate::tenders::TenderId;

/// What the feed is accumulating: the vendor's own bids (optionally
/// filtered by status) or one tender's full participant set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedScope {
    pub tender: Option<TenderId>,
    pub status: Option<BidStatus>,
}

impl FeedScope {
    pub fn my_bids(status: Option<BidStatus>) -> Self {
        Self {
            tender: None,
            status,
        }
    }

    pub fn tender(tender: TenderId) -> Self {
        Self {
            tender: Some(tender),
            status: None,
        }
    }

    fn query_for(&self, page: u32) -> BidQuery {
        BidQuery {
            page,
            limit: DEFAULT_PAGE_LIMIT,
            tender: self.tender.clone(),
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("a page fetch is already in flight")]
    FetchInProgress,
    #[error(transparent)]
    Portal(#[from] PortalError),
}

/// Ticket for one outstanding page request. Only the feed can mint these;
/// handing the ticket back through [`BidFeed::apply`] is the only way to
/// write the response into the feed.
#[derive(Debug)]
pub struct PendingPage {
    query: BidQuery,
    generation: u64,
}

impl PendingPage {
    pub fn query(&self) -> &BidQuery {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }
}

/// What applying a completed page request did to the feed.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// Records appended in request order.
    Appended(usize),
    /// The feed was reset after this request started; the response was
    /// discarded untouched.
    Stale,
    /// The request failed; accumulated records were preserved and the
    /// error recorded on the feed.
    Failed(PortalError),
}

#[derive(Debug)]
pub struct BidFeed {
    scope: FeedScope,
    records: Vec<Bid>,
    loaded_pages: u32,
    total_pages: Option<u32>,
    in_flight: bool,
    generation: u64,
    error: Option<PortalError>,
}

impl BidFeed {
    pub fn new(scope: FeedScope) -> Self {
        Self {
            scope,
            records: Vec::new(),
            loaded_pages: 0,
            total_pages: None,
            in_flight: false,
            generation: 0,
            error: None,
        }
    }

    pub fn records(&self) -> &[Bid] {
        &self.records
    }

    pub fn scope(&self) -> &FeedScope {
        &self.scope
    }

    pub fn loaded_pages(&self) -> u32 {
        self.loaded_pages
    }

    /// Backend-reported page count; `None` until the first page lands.
    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn error(&self) -> Option<&PortalError> {
        self.error.as_ref()
    }

    /// Whether another page remains. True before the first page is loaded.
    pub fn has_more(&self) -> bool {
        match self.total_pages {
            None => true,
            Some(total) => self.loaded_pages < total,
        }
    }

    /// Hand out the ticket for the next page, or `None` when the listing
    /// is exhausted. Refuses while a previous ticket is unapplied.
    pub fn begin_next_page(&mut self) -> Result<Option<PendingPage>, FeedError> {
        if self.in_flight {
            return Err(FeedError::FetchInProgress);
        }
        if !self.has_more() {
            return Ok(None);
        }

        self.in_flight = true;
        Ok(Some(PendingPage {
            query: self.scope.query_for(self.loaded_pages + 1),
            generation: self.generation,
        }))
    }

    /// Write a completed page request back into the feed.
    ///
    /// A ticket minted before the last [`reset`](Self::reset) is stale: the
    /// response is dropped and the feed (including the in-flight guard of
    /// the newer generation) is left untouched.
    pub fn apply(&mut self, pending: PendingPage, result: Result<BidPage, PortalError>) -> PageOutcome {
        if pending.generation != self.generation {
            return PageOutcome::Stale;
        }

        self.in_flight = false;
        match result {
            Ok(page) => {
                let appended = page.records.len();
                self.records.extend(page.records);
                self.loaded_pages = pending.query.page;
                self.total_pages = Some(page.total_pages);
                self.error = None;
                PageOutcome::Appended(appended)
            }
            Err(err) => {
                self.error = Some(err.clone());
                PageOutcome::Failed(err)
            }
        }
    }

    /// Restart from page 1 under a new scope. Clears the accumulated
    /// records immediately and invalidates every outstanding ticket, so a
    /// late response from the old scope cannot land in the new one.
    pub fn reset(&mut self, scope: FeedScope) {
        self.scope = scope;
        self.records.clear();
        self.loaded_pages = 0;
        self.total_pages = None;
        self.in_flight = false;
        self.generation += 1;
        self.error = None;
    }

    /// Awaited convenience for begin -> fetch -> apply. `Ok(None)` when the
    /// listing is exhausted.
    pub async fn load_next<P: BidPortal + ?Sized>(
        &mut self,
        portal: &P,
    ) -> Result<Option<PageOutcome>, FeedError> {
        let Some(pending) = self.begin_next_page()? else {
            return Ok(None);
        };

        let result = portal.list_bids(pending.query()).await;
        Ok(Some(self.apply(pending, result)))
    }

    /// Drain every remaining page. Stops with the recorded error on the
    /// first failure; accumulated records stay available.
    pub async fn load_all<P: BidPortal + ?Sized>(&mut self, portal: &P) -> Result<(), FeedError> {
        loop {
            match self.load_next(portal).await? {
                None => return Ok(()),
                Some(PageOutcome::Appended(_)) => continue,
                Some(PageOutcome::Failed(err)) => return Err(err.into()),
                // A reset mid-drain means the caller restarted the feed;
                // stop without writing anything further.
                Some(PageOutcome::Stale) => return Ok(()),
            }
        }
    }
}
