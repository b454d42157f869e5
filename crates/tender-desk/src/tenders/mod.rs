//! Tender records and the bids raised against them.

pub mod bids;
pub mod domain;

pub use domain::{SubmissionDeadline, TenderId, TenderPhase, TenderSnapshot};
