use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for published tenders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenderId(pub String);

/// Lifecycle phase the portal reports for a tender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenderPhase {
    Open,
    Evaluating,
    Awarded,
    Cancelled,
}

impl TenderPhase {
    pub const fn label(self) -> &'static str {
        match self {
            TenderPhase::Open => "Open",
            TenderPhase::Evaluating => "Evaluating",
            TenderPhase::Awarded => "Awarded",
            TenderPhase::Cancelled => "Cancelled",
        }
    }

    /// Lenient parse of portal phase strings; unknown values read as `Open`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "evaluating" | "evaluation" | "under-evaluation" => TenderPhase::Evaluating,
            "awarded" | "closed" => TenderPhase::Awarded,
            "cancelled" | "canceled" => TenderPhase::Cancelled,
            _ => TenderPhase::Open,
        }
    }
}

/// Bid-submission deadline for a tender.
///
/// The portal publishes deadlines as bare dates and keeps submissions open
/// through the whole deadline day, so the window closes at 23:59:59.999 local
/// time on that date. Callers pass `now` explicitly; nothing here reads the
/// clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionDeadline(NaiveDate);

impl SubmissionDeadline {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse the date formats the portal emits ("2024-04-14",
    /// "14-04-2024", or a full RFC 3339 timestamp).
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
            return Some(Self(dt.date_naive()));
        }

        for format in ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return Some(Self(date));
            }
        }

        None
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// Last instant at which submission is still allowed.
    pub fn closes_at(self) -> NaiveDateTime {
        let end_of_day = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
            .unwrap_or(NaiveTime::MIN);
        self.0.and_time(end_of_day)
    }

    /// Whether a submission (or re-bid) is still allowed at `now`.
    /// The deadline day itself counts as open, end-of-day inclusive.
    pub fn is_submission_window_open(self, now: NaiveDateTime) -> bool {
        now <= self.closes_at()
    }

    pub fn label(self) -> String {
        self.0.format("%d %b %Y").to_string()
    }
}

/// Tender metadata carried alongside each bid record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenderSnapshot {
    pub id: TenderId,
    pub title: String,
    pub category: String,
    pub deadline: Option<SubmissionDeadline>,
    pub phase: TenderPhase,
}

impl TenderSnapshot {
    pub fn deadline_label(&self) -> String {
        match self.deadline {
            Some(deadline) => deadline.label(),
            None => "-".to_string(),
        }
    }
}
