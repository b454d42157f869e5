//! Competitive ranking of one tender's participants.
//!
//! Ranks strictly by ascending bid amount. A technical-evaluation rating,
//! when present, is displayed but never reorders entries; the rank label is
//! a presentation convention, not the award decision. Confidentiality rules
//! live here too: rejected participants come back redacted.

use serde::Serialize;

use super::domain::{Bid, BidStatus, VendorId};

/// How much of a competitor's bid the acting vendor may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Full,
    Redacted,
}

/// Display status on the participant board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Awarded,
    Rejected,
    Evaluated,
    Pending,
}

impl ParticipantStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ParticipantStatus::Awarded => "Awarded",
            ParticipantStatus::Rejected => "Rejected",
            ParticipantStatus::Evaluated => "Evaluated",
            ParticipantStatus::Pending => "Pending",
        }
    }
}

/// One row of the ranked participant board. Computed fresh on every ranking
/// call; never cached or persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantEntry {
    pub rank_label: String,
    pub vendor: VendorId,
    pub vendor_name: String,
    pub amount_label: String,
    pub status: ParticipantStatus,
    pub visibility: Visibility,
    pub is_acting_vendor: bool,
    pub document_count: usize,
    pub technical_score: Option<f32>,
    pub disqualification_reason: Option<String>,
}

/// Ranked board split into visibility tiers. Both partitions preserve the
/// amount-sorted order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedParticipants {
    pub qualified: Vec<ParticipantEntry>,
    pub rejected: Vec<ParticipantEntry>,
}

impl RankedParticipants {
    pub fn total_entries(&self) -> usize {
        self.qualified.len() + self.rejected.len()
    }
}

/// Rank one tender's bids for the given acting vendor.
///
/// Pure: the input is only read, and equal inputs always produce identical
/// output. Sorting is stable with ties kept in input order; bids without an
/// amount sort after every priced bid. Labels `L1..Ln` run over the full
/// sorted sequence, so `L1` is always the lowest amount. At most one entry
/// is flagged as the acting vendor (the first match in sorted order).
pub fn rank(bids: &[Bid], acting_vendor: &VendorId) -> RankedParticipants {
    let mut order: Vec<usize> = (0..bids.len()).collect();
    order.sort_by(|&a, &b| amount_key(&bids[a]).total_cmp(&amount_key(&bids[b])));

    let mut qualified = Vec::new();
    let mut rejected = Vec::new();
    let mut acting_seen = false;

    for (position, &index) in order.iter().enumerate() {
        let bid = &bids[index];

        let is_acting_vendor = !acting_seen && bid.vendor == *acting_vendor;
        if is_acting_vendor {
            acting_seen = true;
        }

        let entry = participant_entry(bid, position, is_acting_vendor);
        if bid.status.is_rejected() {
            rejected.push(entry);
        } else {
            qualified.push(entry);
        }
    }

    RankedParticipants {
        qualified,
        rejected,
    }
}

fn amount_key(bid: &Bid) -> f64 {
    bid.amount.unwrap_or(f64::INFINITY)
}

fn participant_entry(bid: &Bid, position: usize, is_acting_vendor: bool) -> ParticipantEntry {
    let status = classify(bid);
    let redacted = bid.status.is_rejected();

    ParticipantEntry {
        rank_label: format!("L{}", position + 1),
        vendor: bid.vendor.clone(),
        vendor_name: bid.vendor_name.clone(),
        // The amount label is carried for redacted rows too: qualified rows
        // already show it, so it exposes nothing extra.
        amount_label: bid.amount_label(),
        status,
        visibility: if redacted {
            Visibility::Redacted
        } else {
            Visibility::Full
        },
        is_acting_vendor,
        document_count: bid.documents.len(),
        technical_score: if redacted { None } else { bid.technical_score },
        disqualification_reason: bid.disqualification_reason.clone(),
    }
}

fn classify(bid: &Bid) -> ParticipantStatus {
    if bid.status == BidStatus::Awarded {
        ParticipantStatus::Awarded
    } else if bid.status.is_rejected() {
        ParticipantStatus::Rejected
    } else if bid.evaluated {
        ParticipantStatus::Evaluated
    } else {
        ParticipantStatus::Pending
    }
}
