use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDateTime};
use metrics_exporter_prometheus::PrometheusHandle;
use tender_desk::config::PortalConfig;
use tender_desk::error::AppError;
use tender_desk::tenders::bids::{
    Bid, BidDocument, BidId, BidPage, BidPortal, BidQuery, BidStatus, HttpBidPortal, PortalError,
    VendorId,
};
use tender_desk::tenders::{SubmissionDeadline, TenderId, TenderPhase, TenderSnapshot};
use tender_desk::PortalExportImporter;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Vendor the sample listing belongs to.
pub(crate) const SAMPLE_VENDOR: &str = "ven-sigma";

/// In-process portal serving a fixed bid set with the live endpoint's
/// paging and filter semantics. Backs the demo mode and the CSV-driven
/// CLI commands.
pub(crate) struct FixtureBidPortal {
    bids: Vec<Bid>,
    own_vendor: Option<VendorId>,
}

impl FixtureBidPortal {
    pub(crate) fn new(bids: Vec<Bid>, own_vendor: Option<VendorId>) -> Self {
        Self { bids, own_vendor }
    }

    /// The built-in sample listing: one open tender with competing
    /// vendors, one whose window closed mid-evaluation, and one awarded
    /// contract.
    pub(crate) fn sample() -> Self {
        Self::new(sample_bids(), Some(VendorId(SAMPLE_VENDOR.to_string())))
    }
}

#[async_trait]
impl BidPortal for FixtureBidPortal {
    async fn list_bids(&self, query: &BidQuery) -> Result<BidPage, PortalError> {
        let filtered: Vec<&Bid> = self
            .bids
            .iter()
            .filter(|bid| match &query.tender {
                Some(tender) => bid.tender.id == *tender,
                // Without a tender scope the portal lists the calling
                // vendor's own bids.
                None => self
                    .own_vendor
                    .as_ref()
                    .map_or(true, |vendor| bid.vendor == *vendor),
            })
            .filter(|bid| query.status.map_or(true, |status| bid.status == status))
            .collect();

        let limit = query.limit.max(1) as usize;
        let start = (query.page.max(1) as usize - 1) * limit;
        let records = filtered
            .iter()
            .skip(start)
            .take(limit)
            .map(|bid| (*bid).clone())
            .collect();
        let total_pages = ((filtered.len() + limit - 1) / limit) as u32;

        Ok(BidPage {
            records,
            total_pages,
        })
    }
}

/// Portal backing resolved from configuration: the live HTTP gateway when
/// a base URL is configured, otherwise a fixture (built-in sample, or one
/// hydrated from a CSV export).
pub(crate) enum ConfiguredPortal {
    Http(HttpBidPortal),
    Fixture(FixtureBidPortal),
}

impl ConfiguredPortal {
    pub(crate) fn is_fixture(&self) -> bool {
        matches!(self, ConfiguredPortal::Fixture(_))
    }
}

#[async_trait]
impl BidPortal for ConfiguredPortal {
    async fn list_bids(&self, query: &BidQuery) -> Result<BidPage, PortalError> {
        match self {
            ConfiguredPortal::Http(portal) => portal.list_bids(query).await,
            ConfiguredPortal::Fixture(portal) => portal.list_bids(query).await,
        }
    }
}

pub(crate) fn configured_portal(
    config: &PortalConfig,
    export_csv: Option<PathBuf>,
) -> Result<ConfiguredPortal, AppError> {
    if let Some(path) = export_csv {
        let bids = PortalExportImporter::from_path(path)?;
        return Ok(ConfiguredPortal::Fixture(FixtureBidPortal::new(bids, None)));
    }

    match config.base_url.as_deref() {
        Some(base_url) => Ok(ConfiguredPortal::Http(HttpBidPortal::new(base_url)?)),
        None => Ok(ConfiguredPortal::Fixture(FixtureBidPortal::sample())),
    }
}

/// Sample listing with deadlines pinned relative to today, so the re-bid
/// window behavior stays visible whenever the demo runs.
pub(crate) fn sample_bids() -> Vec<Bid> {
    let today = Local::now().date_naive();
    let open_window = SubmissionDeadline::new(today + Duration::days(4));
    let closed_window = SubmissionDeadline::new(today - Duration::days(2));

    let metro = TenderSnapshot {
        id: TenderId("tdr-metro-2".to_string()),
        title: "Metro Station Finishes Package 2".to_string(),
        category: "Urban Transport".to_string(),
        deadline: Some(open_window),
        phase: TenderPhase::Open,
    };
    let depot = TenderSnapshot {
        id: TenderId("tdr-depot-7".to_string()),
        title: "Bus Depot Resurfacing".to_string(),
        category: "Roads".to_string(),
        deadline: Some(closed_window),
        phase: TenderPhase::Evaluating,
    };
    let canal = TenderSnapshot {
        id: TenderId("tdr-canal-4".to_string()),
        title: "Canal Desilting Reach 4".to_string(),
        category: "Irrigation".to_string(),
        deadline: Some(closed_window),
        phase: TenderPhase::Awarded,
    };

    vec![
        Bid {
            id: BidId("bid-9001".to_string()),
            vendor: VendorId(SAMPLE_VENDOR.to_string()),
            vendor_name: "Sigma Constructions".to_string(),
            tender: metro.clone(),
            amount: Some(8_450_000.0),
            submitted_at: (today - Duration::days(1)).and_hms_opt(10, 20, 0),
            timeline: "240 days".to_string(),
            status: BidStatus::Submitted,
            documents: vec![BidDocument {
                name: "boq-sigma.pdf".to_string(),
                url: "https://portal.example/docs/boq-sigma.pdf".to_string(),
            }],
            technical_score: None,
            evaluated: false,
            disqualification_reason: None,
        },
        Bid {
            id: BidId("bid-9002".to_string()),
            vendor: VendorId("ven-arka".to_string()),
            vendor_name: "Arka Infra".to_string(),
            tender: metro.clone(),
            amount: Some(8_210_000.0),
            submitted_at: (today - Duration::days(1)).and_hms_opt(9, 5, 0),
            timeline: "260 days".to_string(),
            status: BidStatus::Submitted,
            documents: Vec::new(),
            technical_score: None,
            evaluated: false,
            disqualification_reason: None,
        },
        Bid {
            id: BidId("bid-9003".to_string()),
            vendor: VendorId("ven-bluestone".to_string()),
            vendor_name: "Bluestone JV".to_string(),
            tender: metro.clone(),
            amount: Some(8_725_000.0),
            submitted_at: (today - Duration::days(2)).and_hms_opt(16, 40, 0),
            timeline: "230 days".to_string(),
            status: BidStatus::UnderEvaluation,
            documents: Vec::new(),
            technical_score: Some(68.0),
            evaluated: true,
            disqualification_reason: None,
        },
        Bid {
            id: BidId("bid-9004".to_string()),
            vendor: VendorId("ven-crest".to_string()),
            vendor_name: "Crestline Projects".to_string(),
            tender: metro,
            amount: None,
            submitted_at: None,
            timeline: String::new(),
            status: BidStatus::Draft,
            documents: Vec::new(),
            technical_score: None,
            evaluated: false,
            disqualification_reason: None,
        },
        Bid {
            id: BidId("bid-9005".to_string()),
            vendor: VendorId(SAMPLE_VENDOR.to_string()),
            vendor_name: "Sigma Constructions".to_string(),
            tender: depot.clone(),
            amount: Some(2_310_000.0),
            submitted_at: (today - Duration::days(6)).and_hms_opt(11, 10, 0),
            timeline: "90 days".to_string(),
            status: BidStatus::UnderEvaluation,
            documents: Vec::new(),
            technical_score: None,
            evaluated: false,
            disqualification_reason: None,
        },
        Bid {
            id: BidId("bid-9006".to_string()),
            vendor: VendorId("ven-dhruv".to_string()),
            vendor_name: "Dhruv Builders".to_string(),
            tender: depot,
            amount: Some(2_190_000.0),
            submitted_at: (today - Duration::days(6)).and_hms_opt(14, 25, 0),
            timeline: "90 days".to_string(),
            status: BidStatus::Disqualified,
            documents: Vec::new(),
            technical_score: None,
            evaluated: false,
            disqualification_reason: Some("EMD not furnished".to_string()),
        },
        Bid {
            id: BidId("bid-9007".to_string()),
            vendor: VendorId(SAMPLE_VENDOR.to_string()),
            vendor_name: "Sigma Constructions".to_string(),
            tender: canal,
            amount: Some(5_900_000.0),
            submitted_at: (today - Duration::days(20)).and_hms_opt(12, 0, 0),
            timeline: "180 days".to_string(),
            status: BidStatus::Awarded,
            documents: Vec::new(),
            technical_score: Some(81.5),
            evaluated: true,
            disqualification_reason: None,
        },
    ]
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M:%S")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DDTHH:MM:SS ({err})"))
}

pub(crate) fn parse_status(raw: &str) -> Result<BidStatus, String> {
    BidStatus::parse(raw).ok_or_else(|| format!("unknown bid status '{raw}'"))
}
