use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use serde_json::{json, Value};

use super::domain::{BidStatus, VendorId};
use super::feed::FeedError;
use super::portal::BidPortal;
use super::service::{BidServiceError, VendorBidService};
use crate::tenders::TenderId;

/// Router builder exposing the bid tracking endpoints.
pub fn bid_router<P>(service: Arc<VendorBidService<P>>) -> Router
where
    P: BidPortal + 'static,
{
    Router::new()
        .route("/api/v1/bids", get(list_bids_handler::<P>))
        .route(
            "/api/v1/bids/rebid-eligibility",
            post(rebid_eligibility_handler::<P>),
        )
        .route(
            "/api/v1/tenders/:tender_id/participants",
            get(participants_handler::<P>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListBidsParams {
    pub(crate) page: Option<u32>,
    pub(crate) status: Option<String>,
    /// Clock override for deterministic deadline checks; defaults to the
    /// local wall clock.
    pub(crate) as_of: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ParticipantsParams {
    /// Acting vendor identity. Always explicit; the board is role-aware
    /// and must not guess the caller from ambient state.
    pub(crate) vendor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AsOfParams {
    pub(crate) as_of: Option<String>,
}

pub(crate) async fn list_bids_handler<P>(
    State(service): State<Arc<VendorBidService<P>>>,
    Query(params): Query<ListBidsParams>,
) -> Response
where
    P: BidPortal + 'static,
{
    let now = match effective_now(params.as_of.as_deref()) {
        Ok(now) => now,
        Err(response) => return response,
    };

    let status = match params.status.as_deref() {
        None => None,
        Some(raw) => match BidStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                let payload = json!({
                    "error": format!("unknown bid status: {raw}"),
                });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
            }
        },
    };

    match service
        .my_bids_page(params.page.unwrap_or(1), status, now)
        .await
    {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => service_error_response(&error),
    }
}

pub(crate) async fn participants_handler<P>(
    State(service): State<Arc<VendorBidService<P>>>,
    Path(tender_id): Path<String>,
    Query(params): Query<ParticipantsParams>,
) -> Response
where
    P: BidPortal + 'static,
{
    let vendor = match params
        .vendor
        .as_deref()
        .map(str::trim)
        .filter(|vendor| !vendor.is_empty())
    {
        Some(vendor) => VendorId(vendor.to_string()),
        None => {
            let payload = json!({
                "error": "missing acting vendor (vendor query parameter)",
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    match service
        .participant_board(TenderId(tender_id), &vendor)
        .await
    {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => service_error_response(&error),
    }
}

pub(crate) async fn rebid_eligibility_handler<P>(
    State(service): State<Arc<VendorBidService<P>>>,
    Query(params): Query<AsOfParams>,
    axum::Json(record): axum::Json<Value>,
) -> Response
where
    P: BidPortal + 'static,
{
    let now = match effective_now(params.as_of.as_deref()) {
        Ok(now) => now,
        Err(response) => return response,
    };

    // A refused re-bid is a normal answer, not an error status.
    let view = service.rebid_eligibility(&record, now);
    (StatusCode::OK, axum::Json(view)).into_response()
}

fn service_error_response(error: &BidServiceError) -> Response {
    let status = match error {
        BidServiceError::Portal(_) | BidServiceError::Feed(FeedError::Portal(_)) => {
            StatusCode::BAD_GATEWAY
        }
        BidServiceError::Feed(FeedError::FetchInProgress) => StatusCode::CONFLICT,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

fn effective_now(as_of: Option<&str>) -> Result<NaiveDateTime, Response> {
    let Some(raw) = as_of else {
        return Ok(Local::now().naive_local());
    };

    parse_as_of(raw).ok_or_else(|| {
        let payload = json!({
            "error": format!("invalid as_of timestamp: {raw}"),
        });
        (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
    })
}

fn parse_as_of(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S").ok()
}
