use std::sync::Arc;

use chrono::NaiveDateTime;
use serde_json::Value;

use super::domain::{BidStatus, VendorId};
use super::feed::{BidFeed, FeedError, FeedScope, PageOutcome};
use super::normalize::normalize_record;
use super::portal::{BidPortal, PortalError};
use super::ranking::rank;
use super::views::{BidListView, ParticipantBoardView, RebidEligibilityView};
use crate::tenders::TenderId;

/// Service composing the portal gateway, normalizer, paged feed, and
/// ranking engine for the HTTP surface and CLI commands.
pub struct VendorBidService<P> {
    portal: Arc<P>,
}

impl<P> VendorBidService<P>
where
    P: BidPortal + 'static,
{
    pub fn new(portal: Arc<P>) -> Self {
        Self { portal }
    }

    /// The vendor's own bids accumulated through the requested page, the
    /// way a scrolling list would hold them. Requesting past the last page
    /// returns what exists with `has_more = false`.
    pub async fn my_bids_page(
        &self,
        page: u32,
        status: Option<BidStatus>,
        now: NaiveDateTime,
    ) -> Result<BidListView, BidServiceError> {
        let page = page.max(1);
        let mut feed = BidFeed::new(FeedScope::my_bids(status));

        while feed.loaded_pages() < page {
            match feed.load_next(self.portal.as_ref()).await? {
                Some(PageOutcome::Appended(_)) => continue,
                Some(PageOutcome::Failed(err)) => return Err(err.into()),
                Some(PageOutcome::Stale) | None => break,
            }
        }

        Ok(BidListView::from_feed(&feed, now))
    }

    /// Ranked participant board for one tender. Drains every page of the
    /// tender's bid list before ranking, so rank labels cover the full
    /// participant set.
    pub async fn participant_board(
        &self,
        tender: TenderId,
        acting_vendor: &VendorId,
    ) -> Result<ParticipantBoardView, BidServiceError> {
        let mut feed = BidFeed::new(FeedScope::tender(tender.clone()));
        feed.load_all(self.portal.as_ref()).await?;

        let ranked = rank(feed.records(), acting_vendor);
        Ok(ParticipantBoardView::new(tender, ranked))
    }

    /// Stateless eligibility check over a raw portal record. Malformed
    /// records degrade through the normalizer instead of failing.
    pub fn rebid_eligibility(&self, record: &Value, now: NaiveDateTime) -> RebidEligibilityView {
        let bid = normalize_record(record);
        RebidEligibilityView::evaluate(&bid, now)
    }
}

/// Error raised by the bid service.
#[derive(Debug, thiserror::Error)]
pub enum BidServiceError {
    #[error(transparent)]
    Portal(#[from] PortalError),
    #[error(transparent)]
    Feed(#[from] FeedError),
}
