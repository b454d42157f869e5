use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::tenders::bids::{
    bid_router, Bid, BidId, BidPage, BidPortal, BidQuery, BidStatus, PortalError,
    VendorBidService, VendorId,
};
use crate::tenders::{SubmissionDeadline, TenderId, TenderPhase, TenderSnapshot};

pub(super) fn april_deadline() -> SubmissionDeadline {
    SubmissionDeadline::new(NaiveDate::from_ymd_opt(2024, 4, 14).expect("valid date"))
}

pub(super) fn tender() -> TenderSnapshot {
    TenderSnapshot {
        id: TenderId("tdr-road-1".to_string()),
        title: "District Road Resurfacing".to_string(),
        category: "Civil Works".to_string(),
        deadline: Some(april_deadline()),
        phase: TenderPhase::Open,
    }
}

pub(super) fn bid(id: &str, vendor: &str, amount: Option<f64>, status: BidStatus) -> Bid {
    Bid {
        id: BidId(id.to_string()),
        vendor: VendorId(vendor.to_string()),
        vendor_name: format!("{vendor} Infrastructure"),
        tender: tender(),
        amount,
        submitted_at: Some(at(2024, 4, 2, 9, 30, 0)),
        timeline: "90 days".to_string(),
        status,
        documents: Vec::new(),
        technical_score: None,
        evaluated: false,
        disqualification_reason: None,
    }
}

pub(super) fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .expect("valid date")
        .and_hms_opt(hour, min, sec)
        .expect("valid time")
}

/// The three-vendor tender from the participant-board walkthrough:
/// X submitted ₹90,000, Y awarded ₹85,000, Z rejected ₹120,000.
pub(super) fn scenario_bids() -> Vec<Bid> {
    vec![
        bid("bid-x", "ven-x", Some(90_000.0), BidStatus::Submitted),
        bid("bid-y", "ven-y", Some(85_000.0), BidStatus::Awarded),
        bid("bid-z", "ven-z", Some(120_000.0), BidStatus::Rejected),
    ]
}

pub(super) fn page(records: Vec<Bid>, total_pages: u32) -> BidPage {
    BidPage {
        records,
        total_pages,
    }
}

/// Portal fake that replays a scripted response sequence and records every
/// query it receives. Past the end of the script it answers with an empty
/// final page.
pub(super) struct ScriptedPortal {
    responses: Mutex<VecDeque<Result<BidPage, PortalError>>>,
    queries: Mutex<Vec<BidQuery>>,
}

impl ScriptedPortal {
    pub(super) fn new(responses: Vec<Result<BidPage, PortalError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn queries(&self) -> Vec<BidQuery> {
        self.queries.lock().expect("query mutex poisoned").clone()
    }
}

#[async_trait]
impl BidPortal for ScriptedPortal {
    async fn list_bids(&self, query: &BidQuery) -> Result<BidPage, PortalError> {
        self.queries
            .lock()
            .expect("query mutex poisoned")
            .push(query.clone());

        self.responses
            .lock()
            .expect("response mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Ok(BidPage {
                    records: Vec::new(),
                    total_pages: query.page,
                })
            })
    }
}

pub(super) fn router_with_portal(portal: ScriptedPortal) -> axum::Router {
    bid_router(Arc::new(VendorBidService::new(Arc::new(portal))))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
