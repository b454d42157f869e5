//! Gateway to the procurement portal's bid-listing endpoint.
//!
//! The portal is the system of record; this module only reads. All other
//! components consume the [`BidPortal`] trait so tests and the demo mode
//! can substitute deterministic fixtures.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::domain::{Bid, BidStatus};
use super::normalize::normalize_record;
use crate::tenders::TenderId;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Query parameters accepted by the listing endpoint. `tender` scopes the
/// listing to one tender's full participant set; without it the portal
/// returns the authenticated vendor's own bids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidQuery {
    pub page: u32,
    pub limit: u32,
    pub tender: Option<TenderId>,
    pub status: Option<BidStatus>,
}

impl BidQuery {
    pub fn my_bids(page: u32, status: Option<BidStatus>) -> Self {
        Self {
            page,
            limit: DEFAULT_PAGE_LIMIT,
            tender: None,
            status,
        }
    }

    pub fn tender_participants(tender: TenderId, page: u32) -> Self {
        Self {
            page,
            limit: DEFAULT_PAGE_LIMIT,
            tender: Some(tender),
            status: None,
        }
    }
}

/// One page of the listing response, already normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct BidPage {
    pub records: Vec<Bid>,
    pub total_pages: u32,
}

/// Portal failures are retryable from the caller's point of view; nothing
/// here destroys already-fetched state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortalError {
    #[error("portal request failed: {0}")]
    Transport(String),
    #[error("portal returned status {0}")]
    Status(u16),
    #[error("portal payload could not be decoded: {0}")]
    Payload(String),
}

#[async_trait]
pub trait BidPortal: Send + Sync {
    async fn list_bids(&self, query: &BidQuery) -> Result<BidPage, PortalError>;
}

/// Production gateway speaking to `GET {base}/bids`.
#[derive(Debug, Clone)]
pub struct HttpBidPortal {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBidPortal {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PortalError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| PortalError::Transport(err.to_string()))?;

        let base_url = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl BidPortal for HttpBidPortal {
    async fn list_bids(&self, query: &BidQuery) -> Result<BidPage, PortalError> {
        let url = format!("{}/bids", self.base_url);

        let mut params: Vec<(&str, String)> = vec![
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
        ];
        if let Some(tender) = &query.tender {
            params.push(("tender", tender.0.clone()));
        }
        if let Some(status) = query.status {
            params.push(("status", status.as_str().to_string()));
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|err| PortalError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PortalError::Status(status.as_u16()));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| PortalError::Payload(err.to_string()))?;

        Ok(decode_listing(&payload, query.page))
    }
}

/// Decode `{ "data": [...], "totalPages": n }` leniently: records run
/// through the normalizer, and a missing or malformed `totalPages` falls
/// back to the requested page (treats the response as the last page).
fn decode_listing(payload: &Value, requested_page: u32) -> BidPage {
    let records = payload
        .get("data")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(normalize_record).collect())
        .unwrap_or_default();

    let total_pages = payload
        .get("totalPages")
        .and_then(Value::as_u64)
        .map(|total| total as u32)
        .unwrap_or(requested_page);

    BidPage {
        records,
        total_pages,
    }
}

#[cfg(test)]
pub(crate) fn decode_listing_for_tests(payload: &Value, requested_page: u32) -> BidPage {
    decode_listing(payload, requested_page)
}
