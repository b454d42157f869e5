use std::io::Read;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};

/// Parse every row of a portal bid-history export into raw records shaped
/// like live listing payloads.
pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<Value>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<ExportRow>() {
        records.push(row?.raw_record());
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct ExportRow {
    #[serde(rename = "Bid Id")]
    bid_id: String,
    #[serde(rename = "Tender", default, deserialize_with = "empty_string_as_none")]
    tender_title: Option<String>,
    #[serde(rename = "Tender Id", default, deserialize_with = "empty_string_as_none")]
    tender_id: Option<String>,
    #[serde(rename = "Category", default, deserialize_with = "empty_string_as_none")]
    category: Option<String>,
    #[serde(
        rename = "Bid Deadline",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    bid_deadline: Option<String>,
    #[serde(rename = "Amount", default, deserialize_with = "empty_string_as_none")]
    amount: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(rename = "Vendor Id", default, deserialize_with = "empty_string_as_none")]
    vendor_id: Option<String>,
    #[serde(
        rename = "Vendor Name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    vendor_name: Option<String>,
    #[serde(
        rename = "Submitted At",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    submitted_at: Option<String>,
    #[serde(rename = "Timeline", default, deserialize_with = "empty_string_as_none")]
    timeline: Option<String>,
    #[serde(rename = "Documents", default, deserialize_with = "empty_string_as_none")]
    documents: Option<String>,
    #[serde(
        rename = "Technical Score",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    technical_score: Option<String>,
    #[serde(rename = "Evaluated", default, deserialize_with = "empty_string_as_none")]
    evaluated: Option<String>,
    #[serde(rename = "Remarks", default, deserialize_with = "empty_string_as_none")]
    remarks: Option<String>,
}

impl ExportRow {
    /// Rebuild the record shape the live listing endpoint produces, so the
    /// normalizer applies the same defaults to exported rows. Blank cells
    /// are simply omitted.
    fn raw_record(&self) -> Value {
        let mut record = Map::new();
        record.insert("_id".to_string(), Value::String(self.bid_id.clone()));

        let mut tender = Map::new();
        insert_string(&mut tender, "_id", &self.tender_id);
        insert_string(&mut tender, "title", &self.tender_title);
        insert_string(&mut tender, "category", &self.category);
        insert_string(&mut tender, "bidDeadline", &self.bid_deadline);
        if !tender.is_empty() {
            record.insert("tender".to_string(), Value::Object(tender));
        }

        // The normalizer strips currency symbols and grouping, so the
        // amount cell passes through as-is.
        insert_string(&mut record, "bidAmount", &self.amount);
        insert_string(&mut record, "status", &self.status);
        insert_string(&mut record, "submittedAt", &self.submitted_at);
        insert_string(&mut record, "timeline", &self.timeline);
        insert_string(&mut record, "remarks", &self.remarks);

        let mut vendor = Map::new();
        insert_string(&mut vendor, "_id", &self.vendor_id);
        insert_string(&mut vendor, "name", &self.vendor_name);
        if !vendor.is_empty() {
            record.insert("vendor".to_string(), Value::Object(vendor));
        }

        if let Some(documents) = &self.documents {
            let urls: Vec<Value> = documents
                .split(';')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(|url| Value::String(url.to_string()))
                .collect();
            if !urls.is_empty() {
                record.insert("bidDocument".to_string(), Value::Array(urls));
            }
        }

        if let Some(score) = self
            .technical_score
            .as_deref()
            .and_then(|raw| raw.parse::<f64>().ok())
            .and_then(Number::from_f64)
        {
            record.insert("technicalScore".to_string(), Value::Number(score));
        }

        if let Some(evaluated) = self.evaluated.as_deref().map(parse_bool) {
            record.insert("evaluated".to_string(), Value::Bool(evaluated));
        }

        Value::Object(record)
    }
}

fn insert_string(map: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        map.insert(key.to_string(), Value::String(value.clone()));
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
