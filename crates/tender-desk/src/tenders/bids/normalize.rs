//! Defensive normalization of raw portal bid records.
//!
//! The portal has shipped several payload shapes over time (`_id` vs `id`,
//! `bidAmount` vs `amount`, vendor as object vs bare id string), so every
//! field is resolved through a priority list of known keys. Missing or
//! malformed fields fall back to safe defaults; normalization never fails.

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use super::domain::{Bid, BidDocument, BidId, BidStatus, VendorId};
use crate::tenders::{SubmissionDeadline, TenderId, TenderPhase, TenderSnapshot};

const ID_KEYS: &[&str] = &["_id", "id", "bidId"];
const AMOUNT_KEYS: &[&str] = &["bidAmount", "amount", "price"];
const VENDOR_KEYS: &[&str] = &["vendor", "user", "vendorId", "userId"];
const VENDOR_NAME_KEYS: &[&str] = &["name", "vendorName", "companyName", "fullName"];
const STATUS_KEYS: &[&str] = &["status", "bidStatus"];
const SUBMITTED_KEYS: &[&str] = &["submittedAt", "createdAt", "submissionDate"];
const TIMELINE_KEYS: &[&str] = &["timeline", "deliveryTimeline", "duration"];
const DOCUMENT_KEYS: &[&str] = &["bidDocument", "documentUrl", "document", "fileUrl"];
const DEADLINE_KEYS: &[&str] = &["bidDeadline", "deadline", "submissionDeadline"];
const EVALUATION_KEYS: &[&str] = &["technicalEvaluation", "evaluation"];
const REASON_KEYS: &[&str] = &["disqualificationReason", "rejectionReason", "remarks", "reason"];
const TENDER_TITLE_KEYS: &[&str] = &["title", "name", "tenderTitle"];

/// Convert one raw portal record into the canonical [`Bid`].
///
/// Pure and infallible: a record missing every known key (or a non-object
/// value altogether) still yields a renderable bid with placeholder fields
/// and a title generated from the bid id.
pub fn normalize_record(record: &Value) -> Bid {
    let id = BidId(string_field(record, ID_KEYS).unwrap_or_default());
    let (vendor, vendor_name) = vendor_identity(record);

    let mut tender = tender_snapshot(record);
    if tender.title.is_empty() {
        tender.title = generated_title(&id);
    }

    let amount = first_value(record, AMOUNT_KEYS).and_then(parse_amount);
    let submitted_at = string_field(record, SUBMITTED_KEYS)
        .as_deref()
        .and_then(parse_datetime);
    let status = string_field(record, STATUS_KEYS)
        .as_deref()
        .and_then(BidStatus::parse)
        .unwrap_or(BidStatus::Draft);
    let (technical_score, evaluated) = evaluation(record);

    Bid {
        id,
        vendor,
        vendor_name,
        tender,
        amount,
        submitted_at,
        timeline: string_field(record, TIMELINE_KEYS).unwrap_or_default(),
        status,
        documents: documents(record),
        technical_score,
        evaluated,
        disqualification_reason: string_field(record, REASON_KEYS),
    }
}

/// First non-null value among the candidate keys. A non-object record has
/// no keys at all, which makes every lookup miss.
fn first_value<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| record.get(key).filter(|value| !value.is_null()))
}

fn string_field(record: &Value, keys: &[&str]) -> Option<String> {
    first_value(record, keys)
        .and_then(Value::as_str)
        .and_then(non_empty)
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Amounts arrive as JSON numbers or display strings ("₹1,20,000.50").
/// Negative and non-finite values read as missing.
fn parse_amount(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => {
            let cleaned: String = raw
                .chars()
                .filter(|ch| !matches!(ch, '₹' | ',') && !ch.is_whitespace())
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    };

    parsed.filter(|amount| amount.is_finite() && *amount >= 0.0)
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }

    SubmissionDeadline::parse(trimmed).and_then(|deadline| deadline.date().and_hms_opt(0, 0, 0))
}

/// The vendor field is either an object carrying id + display name or a
/// bare id string. A top-level `vendorName` fills the name when the object
/// form is absent.
fn vendor_identity(record: &Value) -> (VendorId, String) {
    let value = first_value(record, VENDOR_KEYS);

    let id = value
        .and_then(|value| match value {
            Value::String(raw) => non_empty(raw),
            Value::Object(map) => ["_id", "id"]
                .iter()
                .find_map(|key| map.get(*key))
                .and_then(Value::as_str)
                .and_then(non_empty),
            _ => None,
        })
        .unwrap_or_default();

    let name = value
        .and_then(Value::as_object)
        .and_then(|map| {
            VENDOR_NAME_KEYS
                .iter()
                .find_map(|key| map.get(*key))
                .and_then(Value::as_str)
                .and_then(non_empty)
        })
        .or_else(|| string_field(record, &["vendorName"]))
        .unwrap_or_default();

    (VendorId(id), name)
}

fn tender_snapshot(record: &Value) -> TenderSnapshot {
    let tender = first_value(record, &["tender"]);

    let id = tender
        .and_then(|value| match value {
            Value::String(raw) => non_empty(raw),
            Value::Object(map) => ["_id", "id"]
                .iter()
                .find_map(|key| map.get(*key))
                .and_then(Value::as_str)
                .and_then(non_empty),
            _ => None,
        })
        .or_else(|| string_field(record, &["tenderId"]))
        .unwrap_or_default();

    let title = tender
        .and_then(|value| {
            TENDER_TITLE_KEYS
                .iter()
                .find_map(|key| value.get(key))
                .and_then(Value::as_str)
                .and_then(non_empty)
        })
        .or_else(|| string_field(record, &["tenderTitle"]))
        .unwrap_or_default();

    let category = tender
        .and_then(|value| value.get("category"))
        .and_then(Value::as_str)
        .and_then(non_empty)
        .or_else(|| string_field(record, &["category"]))
        .unwrap_or_default();

    let deadline = tender
        .and_then(|value| {
            DEADLINE_KEYS
                .iter()
                .find_map(|key| value.get(key))
                .and_then(Value::as_str)
        })
        .and_then(SubmissionDeadline::parse)
        .or_else(|| {
            string_field(record, DEADLINE_KEYS)
                .as_deref()
                .and_then(SubmissionDeadline::parse)
        });

    let phase = tender
        .and_then(|value| {
            ["status", "phase"]
                .iter()
                .find_map(|key| value.get(key))
                .and_then(Value::as_str)
        })
        .map(TenderPhase::parse)
        .unwrap_or(TenderPhase::Open);

    TenderSnapshot {
        id: TenderId(id),
        title,
        category,
        deadline,
        phase,
    }
}

/// Fallback title when the record carries no tender title at all.
fn generated_title(id: &BidId) -> String {
    let tail: String = {
        let chars: Vec<char> = id.0.chars().collect();
        let start = chars.len().saturating_sub(6);
        chars[start..].iter().collect()
    };

    if tail.is_empty() {
        "Untitled bid".to_string()
    } else {
        format!("Bid #{tail}")
    }
}

fn documents(record: &Value) -> Vec<BidDocument> {
    let Some(value) = first_value(record, DOCUMENT_KEYS) else {
        return Vec::new();
    };

    match value {
        Value::Array(items) => items.iter().filter_map(document_from).collect(),
        other => document_from(other).into_iter().collect(),
    }
}

fn document_from(value: &Value) -> Option<BidDocument> {
    match value {
        Value::String(url) => non_empty(url).map(|url| BidDocument {
            name: file_name(&url),
            url,
        }),
        Value::Object(map) => {
            let url = ["url", "fileUrl", "link", "href"]
                .iter()
                .find_map(|key| map.get(*key))
                .and_then(Value::as_str)
                .and_then(non_empty)?;
            let name = ["name", "fileName", "title"]
                .iter()
                .find_map(|key| map.get(*key))
                .and_then(Value::as_str)
                .and_then(non_empty)
                .unwrap_or_else(|| file_name(&url));
            Some(BidDocument { name, url })
        }
        _ => None,
    }
}

fn file_name(url: &str) -> String {
    url.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or("document")
        .to_string()
}

/// Technical evaluation lives in a nested object with a score and a draft
/// marker; flat exports carry `technicalScore` + `evaluated` instead. A
/// draft evaluation does not count as evaluated.
fn evaluation(record: &Value) -> (Option<f32>, bool) {
    let nested = first_value(record, EVALUATION_KEYS).and_then(Value::as_object);

    let score = nested
        .and_then(|map| {
            ["score", "rating"]
                .iter()
                .find_map(|key| map.get(*key))
                .and_then(Value::as_f64)
        })
        .or_else(|| first_value(record, &["technicalScore"]).and_then(Value::as_f64))
        .map(|score| score as f32)
        .filter(|score| score.is_finite());

    let evaluated = match nested {
        Some(map) => !["isDraft", "draft"]
            .iter()
            .find_map(|key| map.get(*key))
            .and_then(Value::as_bool)
            .unwrap_or(false),
        None => first_value(record, &["evaluated"])
            .and_then(Value::as_bool)
            .unwrap_or(false),
    };

    (score, evaluated)
}
