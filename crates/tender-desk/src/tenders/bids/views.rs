//! Serializable projections handed to the HTTP surface and CLI reports.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::domain::{Bid, BidId, BidStatus};
use super::feed::BidFeed;
use super::lifecycle::{self, BadgeTone, BidActions};
use super::ranking::{ParticipantEntry, RankedParticipants};
use super::rebid;
use crate::tenders::TenderId;

/// One row in the vendor's own bid list.
#[derive(Debug, Clone, Serialize)]
pub struct BidCardView {
    pub id: BidId,
    pub tender_id: TenderId,
    pub title: String,
    pub category: String,
    pub amount_label: String,
    pub deadline_label: String,
    pub submitted_label: String,
    pub timeline: String,
    pub status: BidStatus,
    pub status_label: &'static str,
    pub badge: BadgeTone,
    pub document_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_score: Option<f32>,
    pub actions: BidActions,
}

impl BidCardView {
    pub fn from_bid(bid: &Bid, now: NaiveDateTime) -> Self {
        let presentation = lifecycle::presentation(bid.status);

        Self {
            id: bid.id.clone(),
            tender_id: bid.tender.id.clone(),
            title: bid.tender.title.clone(),
            category: bid.tender.category.clone(),
            amount_label: bid.amount_label(),
            deadline_label: bid.tender.deadline_label(),
            submitted_label: bid.submitted_label(),
            timeline: bid.timeline.clone(),
            status: bid.status,
            status_label: presentation.label,
            badge: presentation.tone,
            document_count: bid.documents.len(),
            technical_score: bid.technical_score,
            actions: lifecycle::actions(bid, now),
        }
    }
}

/// The accumulated list plus the flags a scrolling view binds to.
#[derive(Debug, Clone, Serialize)]
pub struct BidListView {
    pub bids: Vec<BidCardView>,
    pub loaded_pages: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    pub has_more: bool,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BidListView {
    pub fn from_feed(feed: &BidFeed, now: NaiveDateTime) -> Self {
        Self {
            bids: feed
                .records()
                .iter()
                .map(|bid| BidCardView::from_bid(bid, now))
                .collect(),
            loaded_pages: feed.loaded_pages(),
            total_pages: feed.total_pages(),
            has_more: feed.has_more(),
            loading: feed.is_loading(),
            error: feed.error().map(|err| err.to_string()),
        }
    }
}

/// Ranked participant board for one tender.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantBoardView {
    pub tender_id: TenderId,
    pub participant_count: usize,
    pub qualified: Vec<ParticipantEntry>,
    pub rejected: Vec<ParticipantEntry>,
}

impl ParticipantBoardView {
    pub fn new(tender_id: TenderId, ranked: RankedParticipants) -> Self {
        Self {
            tender_id,
            participant_count: ranked.total_entries(),
            qualified: ranked.qualified,
            rejected: ranked.rejected,
        }
    }
}

/// Outcome of a stateless eligibility check. A refusal is part of the
/// normal response, never an HTTP error.
#[derive(Debug, Clone, Serialize)]
pub struct RebidEligibilityView {
    pub bid_id: BidId,
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl RebidEligibilityView {
    pub fn evaluate(bid: &Bid, now: NaiveDateTime) -> Self {
        let refusal = rebid::refusal_for(bid, now);

        Self {
            bid_id: bid.id.clone(),
            eligible: refusal.is_none(),
            reason: refusal.map(|refusal| refusal.to_string()),
        }
    }
}
