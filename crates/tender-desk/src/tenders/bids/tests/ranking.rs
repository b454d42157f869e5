use super::common::*;
use crate::tenders::bids::{
    rank, BidDocument, BidStatus, ParticipantStatus, VendorId, Visibility,
};

#[test]
fn three_vendor_board_ranks_and_partitions() {
    let bids = scenario_bids();
    let board = rank(&bids, &VendorId("ven-x".to_string()));

    assert_eq!(board.qualified.len(), 2);
    assert_eq!(board.rejected.len(), 1);

    let l1 = &board.qualified[0];
    assert_eq!(l1.rank_label, "L1");
    assert_eq!(l1.vendor.0, "ven-y");
    assert_eq!(l1.amount_label, "₹85,000");
    assert_eq!(l1.status, ParticipantStatus::Awarded);
    assert_eq!(l1.visibility, Visibility::Full);
    assert!(!l1.is_acting_vendor);

    let l2 = &board.qualified[1];
    assert_eq!(l2.rank_label, "L2");
    assert_eq!(l2.vendor.0, "ven-x");
    assert_eq!(l2.amount_label, "₹90,000");
    assert_eq!(l2.status, ParticipantStatus::Pending);
    assert!(l2.is_acting_vendor);

    let redacted = &board.rejected[0];
    assert_eq!(redacted.rank_label, "L3");
    assert_eq!(redacted.vendor.0, "ven-z");
    assert_eq!(redacted.status, ParticipantStatus::Rejected);
    assert_eq!(redacted.visibility, Visibility::Redacted);
}

#[test]
fn labels_run_gapless_over_both_partitions() {
    let mut bids = scenario_bids();
    bids.push(bid("bid-w", "ven-w", None, BidStatus::UnderEvaluation));
    bids.push(bid("bid-v", "ven-v", Some(85_000.0), BidStatus::Submitted));

    let board = rank(&bids, &VendorId("ven-x".to_string()));
    assert_eq!(board.total_entries(), bids.len());

    let mut labels: Vec<String> = board
        .qualified
        .iter()
        .chain(board.rejected.iter())
        .map(|entry| entry.rank_label.clone())
        .collect();
    labels.sort_by_key(|label| label[1..].parse::<u32>().expect("numeric label"));

    let expected: Vec<String> = (1..=bids.len()).map(|i| format!("L{i}")).collect();
    assert_eq!(labels, expected);
}

#[test]
fn equal_amounts_keep_input_order() {
    let bids = vec![
        bid("bid-a", "ven-a", Some(90_000.0), BidStatus::Submitted),
        bid("bid-b", "ven-b", Some(90_000.0), BidStatus::Submitted),
        bid("bid-c", "ven-c", Some(90_000.0), BidStatus::Submitted),
    ];

    let board = rank(&bids, &VendorId("nobody".to_string()));
    let vendors: Vec<&str> = board
        .qualified
        .iter()
        .map(|entry| entry.vendor.0.as_str())
        .collect();

    assert_eq!(vendors, ["ven-a", "ven-b", "ven-c"]);
    assert_eq!(board.qualified[0].rank_label, "L1");
    assert_eq!(board.qualified[2].rank_label, "L3");
}

#[test]
fn missing_amount_sorts_after_priced_bids() {
    let bids = vec![
        bid("bid-a", "ven-a", None, BidStatus::Submitted),
        bid("bid-b", "ven-b", Some(120_000.0), BidStatus::Submitted),
    ];

    let board = rank(&bids, &VendorId("nobody".to_string()));

    assert_eq!(board.qualified[0].vendor.0, "ven-b");
    assert_eq!(board.qualified[0].rank_label, "L1");
    assert_eq!(board.qualified[1].vendor.0, "ven-a");
    assert_eq!(board.qualified[1].amount_label, "-");
}

#[test]
fn acting_vendor_is_flagged_exactly_once() {
    let bids = scenario_bids();

    let board = rank(&bids, &VendorId("ven-y".to_string()));
    let flagged: Vec<&str> = board
        .qualified
        .iter()
        .chain(board.rejected.iter())
        .filter(|entry| entry.is_acting_vendor)
        .map(|entry| entry.vendor.0.as_str())
        .collect();
    assert_eq!(flagged, ["ven-y"]);

    let outsider = rank(&bids, &VendorId("ven-absent".to_string()));
    assert!(outsider
        .qualified
        .iter()
        .chain(outsider.rejected.iter())
        .all(|entry| !entry.is_acting_vendor));
}

#[test]
fn reranking_unchanged_input_is_idempotent() {
    let bids = scenario_bids();
    let acting = VendorId("ven-x".to_string());

    let first = rank(&bids, &acting);
    let second = rank(&bids, &acting);

    assert_eq!(first, second);
}

#[test]
fn rejected_entries_are_redacted_but_keep_reason_and_documents() {
    let mut disqualified = bid("bid-z", "ven-z", Some(120_000.0), BidStatus::Disqualified);
    disqualified.technical_score = Some(91.0);
    disqualified.disqualification_reason = Some("EMD not furnished".to_string());
    disqualified.documents = vec![
        BidDocument {
            name: "boq.pdf".to_string(),
            url: "https://cdn.example/docs/boq.pdf".to_string(),
        },
        BidDocument {
            name: "emd.pdf".to_string(),
            url: "https://cdn.example/docs/emd.pdf".to_string(),
        },
    ];

    let mut awarded = bid("bid-y", "ven-y", Some(85_000.0), BidStatus::Awarded);
    awarded.technical_score = Some(88.0);

    let board = rank(&[awarded, disqualified], &VendorId("ven-y".to_string()));

    let full = &board.qualified[0];
    assert_eq!(full.technical_score, Some(88.0));

    let redacted = &board.rejected[0];
    assert_eq!(redacted.technical_score, None);
    assert_eq!(redacted.document_count, 2);
    assert_eq!(
        redacted.disqualification_reason.as_deref(),
        Some("EMD not furnished")
    );
    // Amount stays visible at the same level as qualified rows.
    assert_eq!(redacted.amount_label, "₹120,000");
}

#[test]
fn finalized_evaluation_shows_as_evaluated() {
    let mut scored = bid("bid-a", "ven-a", Some(95_000.0), BidStatus::UnderEvaluation);
    scored.evaluated = true;

    let board = rank(&[scored], &VendorId("nobody".to_string()));
    assert_eq!(board.qualified[0].status, ParticipantStatus::Evaluated);
}

#[test]
fn empty_bid_set_yields_empty_board() {
    let board = rank(&[], &VendorId("ven-x".to_string()));
    assert_eq!(board.total_entries(), 0);
    assert!(board.qualified.is_empty());
    assert!(board.rejected.is_empty());
}
