//! Offline loading of the procurement portal's bid-history CSV export.
//!
//! Exported rows are rebuilt into raw records and run through the same
//! normalizer as live listing payloads, so a CSV snapshot and the live
//! portal produce identical `Bid` values for identical data.

mod parser;

use std::io::Read;
use std::path::Path;

use crate::tenders::bids::{normalize_record, Bid};

#[derive(Debug)]
pub enum ExportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Io(err) => write!(f, "failed to read portal export: {}", err),
            ExportError::Csv(err) => write!(f, "invalid portal export CSV data: {}", err),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(err) => Some(err),
            ExportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct PortalExportImporter;

impl PortalExportImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Bid>, ExportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Bid>, ExportError> {
        let records = parser::parse_rows(reader)?;
        Ok(records.iter().map(normalize_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tenders::bids::BidStatus;
    use std::io::Cursor;

    const HEADER: &str = "Bid Id,Tender,Tender Id,Category,Bid Deadline,Amount,Status,Vendor Id,Vendor Name,Submitted At,Timeline,Documents,Technical Score,Evaluated,Remarks";

    #[test]
    fn importer_reads_a_full_row() {
        let csv = format!(
            "{HEADER}\n\
bid-1,Road Resurfacing,tdr-9,Civil Works,2024-04-14,\"₹1,20,000\",under-evaluation,ven-2,Sharma Infra,2024-04-02T09:30:00Z,90 days,https://cdn.example/docs/a.pdf;https://cdn.example/docs/b.pdf,78.5,true,\n"
        );

        let bids = PortalExportImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
        assert_eq!(bids.len(), 1);

        let bid = &bids[0];
        assert_eq!(bid.id.0, "bid-1");
        assert_eq!(bid.tender.id.0, "tdr-9");
        assert_eq!(bid.tender.title, "Road Resurfacing");
        assert_eq!(bid.amount, Some(120_000.0));
        assert_eq!(bid.status, BidStatus::UnderEvaluation);
        assert_eq!(bid.vendor.0, "ven-2");
        assert_eq!(bid.vendor_name, "Sharma Infra");
        assert_eq!(bid.documents.len(), 2);
        assert_eq!(bid.documents[0].name, "a.pdf");
        assert_eq!(bid.technical_score, Some(78.5));
        assert!(bid.evaluated);
    }

    #[test]
    fn importer_defaults_blank_cells_like_live_records() {
        let csv = format!("{HEADER}\nbid-2,,,,,,,,,,,,,,\n");

        let bids = PortalExportImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
        let bid = &bids[0];

        assert_eq!(bid.amount, None);
        assert_eq!(bid.amount_label(), "-");
        assert_eq!(bid.status, BidStatus::Draft);
        assert_eq!(bid.tender.title, "Bid #bid-2");
        assert!(bid.documents.is_empty());
        assert!(!bid.evaluated);
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = PortalExportImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            ExportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn importer_surfaces_csv_shape_errors() {
        // Row with an unclosed quote cannot be parsed as CSV.
        let csv = format!("{HEADER}\n\"bid-3,,,,,,,,,,,,,,\n");
        let error =
            PortalExportImporter::from_reader(Cursor::new(csv)).expect_err("expected csv error");

        match error {
            ExportError::Csv(_) => {}
            other => panic!("expected csv error, got {other:?}"),
        }
    }
}
