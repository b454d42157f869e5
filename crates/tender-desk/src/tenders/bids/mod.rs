//! Bid tracking against competitive tenders: paged retrieval and
//! normalization, lifecycle classification, participant ranking with
//! confidentiality redaction, and the re-bid confirmation gate.

pub mod domain;
pub mod feed;
pub mod lifecycle;
pub mod normalize;
pub mod portal;
pub mod ranking;
pub mod rebid;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{format_inr, Bid, BidDocument, BidId, BidStatus, VendorId, AMOUNT_PLACEHOLDER};
pub use feed::{BidFeed, FeedError, FeedScope, PageOutcome, PendingPage};
pub use lifecycle::{
    actions, is_rebid_eligible, presentation, BadgeTone, BidActions, StatusPresentation,
};
pub use normalize::normalize_record;
pub use portal::{BidPage, BidPortal, BidQuery, HttpBidPortal, PortalError, DEFAULT_PAGE_LIMIT};
pub use ranking::{rank, ParticipantEntry, ParticipantStatus, RankedParticipants, Visibility};
pub use rebid::{refusal_for, RebidRefusal, RebidState, RebidTarget, RebidWorkflow};
pub use router::bid_router;
pub use service::{BidServiceError, VendorBidService};
pub use views::{BidCardView, BidListView, ParticipantBoardView, RebidEligibilityView};
