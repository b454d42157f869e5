//! Pure classification of a bid's raw status into display state and
//! permitted actions. No hidden state: everything derives from the status,
//! the tender deadline, and the caller-supplied clock.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::domain::{Bid, BidStatus};

/// Visual weight of the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Muted,
    Info,
    Progress,
    Success,
    Danger,
}

/// Display status for a bid card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusPresentation {
    pub label: &'static str,
    pub tone: BadgeTone,
}

pub const fn presentation(status: BidStatus) -> StatusPresentation {
    let tone = match status {
        BidStatus::Draft => BadgeTone::Muted,
        BidStatus::Submitted => BadgeTone::Info,
        BidStatus::UnderEvaluation => BadgeTone::Progress,
        BidStatus::Awarded => BadgeTone::Success,
        BidStatus::Rejected | BidStatus::Disqualified => BadgeTone::Danger,
    };

    StatusPresentation {
        label: status.label(),
        tone,
    }
}

/// Actions the acting vendor may take on one of their own bids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BidActions {
    pub can_rebid: bool,
    pub can_view_contract: bool,
    pub can_view_feedback: bool,
    /// Competitor rankings open up only once this bid is awarded and
    /// carries a finalized evaluation.
    pub participants_visible: bool,
}

pub fn actions(bid: &Bid, now: NaiveDateTime) -> BidActions {
    BidActions {
        can_rebid: is_rebid_eligible(bid, now),
        can_view_contract: bid.status == BidStatus::Awarded,
        can_view_feedback: bid.status.is_rejected() && bid.disqualification_reason.is_some(),
        participants_visible: bid.status == BidStatus::Awarded && bid.evaluated,
    }
}

/// A re-bid is allowed only while the tender's submission window is still
/// open (end-of-day inclusive on the deadline date) and the bid has not
/// reached a terminal status. A tender without a recorded deadline never
/// admits a re-bid.
pub fn is_rebid_eligible(bid: &Bid, now: NaiveDateTime) -> bool {
    if bid.status.is_terminal() {
        return false;
    }

    match bid.tender.deadline {
        Some(deadline) => deadline.is_submission_window_open(now),
        None => false,
    }
}
