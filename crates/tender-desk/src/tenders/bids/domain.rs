use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::tenders::TenderSnapshot;

/// Rendered wherever a numeric or date field is missing from the portal record.
pub const AMOUNT_PLACEHOLDER: &str = "-";

/// Identifier wrapper for bids lodged on the portal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BidId(pub String);

/// Identifier wrapper for participating vendors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VendorId(pub String);

/// Lifecycle status tracked for each bid.
///
/// Transitions run draft -> submitted -> under-evaluation -> awarded/rejected;
/// a re-bid is the only sideways move and only while the submission window
/// is open. `Disqualified` is set by the evaluation authority and is as
/// final as `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BidStatus {
    Draft,
    Submitted,
    UnderEvaluation,
    Awarded,
    Rejected,
    Disqualified,
}

impl BidStatus {
    pub const fn label(self) -> &'static str {
        match self {
            BidStatus::Draft => "Draft",
            BidStatus::Submitted => "Submitted",
            BidStatus::UnderEvaluation => "Under Evaluation",
            BidStatus::Awarded => "Awarded",
            BidStatus::Rejected => "Rejected",
            BidStatus::Disqualified => "Disqualified",
        }
    }

    /// Wire form used in portal payloads and query strings.
    pub const fn as_str(self) -> &'static str {
        match self {
            BidStatus::Draft => "draft",
            BidStatus::Submitted => "submitted",
            BidStatus::UnderEvaluation => "under-evaluation",
            BidStatus::Awarded => "awarded",
            BidStatus::Rejected => "rejected",
            BidStatus::Disqualified => "disqualified",
        }
    }

    /// Lenient parse of portal status strings. Accepts hyphen and underscore
    /// variants case-insensitively; `None` for anything unrecognised.
    pub fn parse(raw: &str) -> Option<Self> {
        let canonical = raw.trim().to_ascii_lowercase().replace('_', "-");
        match canonical.as_str() {
            "draft" => Some(BidStatus::Draft),
            "submitted" => Some(BidStatus::Submitted),
            "under-evaluation" | "underevaluation" | "evaluation" => {
                Some(BidStatus::UnderEvaluation)
            }
            "awarded" => Some(BidStatus::Awarded),
            "rejected" => Some(BidStatus::Rejected),
            "disqualified" => Some(BidStatus::Disqualified),
            _ => None,
        }
    }

    /// Statuses that close the bid; no further transition (including re-bid)
    /// is allowed out of them.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            BidStatus::Awarded | BidStatus::Rejected | BidStatus::Disqualified
        )
    }

    /// Statuses that land a participant in the rejected partition of the
    /// ranked board.
    pub const fn is_rejected(self) -> bool {
        matches!(self, BidStatus::Rejected | BidStatus::Disqualified)
    }
}

/// Uploaded proposal document reference. Storage itself is handled by the
/// portal backend; we only carry the pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidDocument {
    pub name: String,
    pub url: String,
}

/// Canonical bid record after normalization.
///
/// `amount` is kept optional even though the portal requires one past the
/// draft stage; records that violate that arrive anyway and views render
/// the placeholder instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub vendor: VendorId,
    pub vendor_name: String,
    pub tender: TenderSnapshot,
    pub amount: Option<f64>,
    pub submitted_at: Option<NaiveDateTime>,
    pub timeline: String,
    pub status: BidStatus,
    pub documents: Vec<BidDocument>,
    pub technical_score: Option<f32>,
    pub evaluated: bool,
    pub disqualification_reason: Option<String>,
}

impl Bid {
    pub fn amount_label(&self) -> String {
        match self.amount {
            Some(amount) => format_inr(amount),
            None => AMOUNT_PLACEHOLDER.to_string(),
        }
    }

    pub fn submitted_label(&self) -> String {
        match self.submitted_at {
            Some(at) => at.format("%d %b %Y").to_string(),
            None => AMOUNT_PLACEHOLDER.to_string(),
        }
    }
}

/// Format a rupee amount with comma grouping, e.g. `₹85,000` or `₹12,500.50`.
/// Paise are shown only when non-zero. Negative inputs clamp to zero; the
/// normalizer already rejects them, so this is only reachable with
/// hand-built records.
pub fn format_inr(amount: f64) -> String {
    let total_paise = (amount.max(0.0) * 100.0).round() as i64;
    let whole = total_paise / 100;
    let paise = total_paise % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if paise == 0 {
        format!("₹{grouped}")
    } else {
        format!("₹{grouped}.{paise:02}")
    }
}
