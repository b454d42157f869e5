//! Re-bid confirmation gate: idle -> confirming -> (cancelled | proceeding).
//!
//! Ineligible bids are refused at the entry point, so a confirmation is
//! never open for a bid that cannot actually be re-submitted. Confirming
//! hands the target reference to the external submission flow; no draft of
//! the replacement bid is ever held here.

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use super::domain::{Bid, BidId, BidStatus};
use crate::tenders::TenderId;

/// Reference to the bid being superseded. Identifiers only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RebidTarget {
    pub bid: BidId,
    pub tender: TenderId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebidState {
    Idle,
    Confirming(RebidTarget),
}

/// A refused re-bid transition. Not a failure: views render the reason on
/// a disabled control instead of surfacing an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RebidRefusal {
    #[error("submission deadline has passed")]
    DeadlinePassed,
    #[error("tender has no recorded submission deadline")]
    DeadlineMissing,
    #[error("bid is already {}", .0.label())]
    StatusFinal(BidStatus),
    #[error("another re-bid confirmation is already open")]
    AlreadyConfirming,
    #[error("no re-bid confirmation is pending")]
    NothingPending,
}

/// Reason a re-bid would be refused for this bid right now, or `None` when
/// it is eligible. Agrees with [`lifecycle::is_rebid_eligible`]; this form
/// additionally names which rule blocked the action.
///
/// [`lifecycle::is_rebid_eligible`]: super::lifecycle::is_rebid_eligible
pub fn refusal_for(bid: &Bid, now: NaiveDateTime) -> Option<RebidRefusal> {
    if bid.status.is_terminal() {
        return Some(RebidRefusal::StatusFinal(bid.status));
    }

    match bid.tender.deadline {
        None => Some(RebidRefusal::DeadlineMissing),
        Some(deadline) if !deadline.is_submission_window_open(now) => {
            Some(RebidRefusal::DeadlinePassed)
        }
        Some(_) => None,
    }
}

#[derive(Debug)]
pub struct RebidWorkflow {
    state: RebidState,
}

impl Default for RebidWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl RebidWorkflow {
    pub fn new() -> Self {
        Self {
            state: RebidState::Idle,
        }
    }

    pub fn state(&self) -> &RebidState {
        &self.state
    }

    pub fn is_confirming(&self) -> bool {
        matches!(self.state, RebidState::Confirming(_))
    }

    /// Open the confirmation for an eligible bid. Refuses without entering
    /// the confirming state when the bid is ineligible or another
    /// confirmation is already open.
    pub fn request(&mut self, bid: &Bid, now: NaiveDateTime) -> Result<(), RebidRefusal> {
        if self.is_confirming() {
            return Err(RebidRefusal::AlreadyConfirming);
        }
        if let Some(refusal) = refusal_for(bid, now) {
            return Err(refusal);
        }

        self.state = RebidState::Confirming(RebidTarget {
            bid: bid.id.clone(),
            tender: bid.tender.id.clone(),
        });
        Ok(())
    }

    /// Close the confirmation with no side effects.
    pub fn cancel(&mut self) -> Result<(), RebidRefusal> {
        if self.is_confirming() {
            self.state = RebidState::Idle;
            Ok(())
        } else {
            Err(RebidRefusal::NothingPending)
        }
    }

    /// Hand the target to the external submission flow. The workflow
    /// returns to idle; nothing is persisted between confirmation and
    /// submission.
    pub fn confirm(&mut self) -> Result<RebidTarget, RebidRefusal> {
        match std::mem::replace(&mut self.state, RebidState::Idle) {
            RebidState::Confirming(target) => Ok(target),
            RebidState::Idle => Err(RebidRefusal::NothingPending),
        }
    }
}
