use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use clap::Args;
use tender_desk::error::AppError;
use tender_desk::tenders::bids::{
    refusal_for, Bid, BidActions, BidListView, BidStatus, ParticipantBoardView, ParticipantEntry,
    VendorBidService, VendorId,
};
use tender_desk::tenders::TenderId;
use tender_desk::{AppConfig, PortalExportImporter};

use crate::infra::{configured_portal, sample_bids, FixtureBidPortal, SAMPLE_VENDOR};

#[derive(Args, Debug)]
pub(crate) struct BidsArgs {
    /// Filter to one lifecycle status (draft, submitted, under-evaluation,
    /// awarded, rejected, disqualified)
    #[arg(long, value_parser = crate::infra::parse_status)]
    pub(crate) status: Option<BidStatus>,
    /// Accumulate the listing through this page
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u32,
    /// Clock override for deadline checks (YYYY-MM-DDTHH:MM:SS). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) as_of: Option<NaiveDateTime>,
    /// Serve bids from a portal CSV export instead of the configured portal
    #[arg(long)]
    pub(crate) export_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ParticipantsArgs {
    /// Tender whose participant board to rank
    #[arg(long)]
    pub(crate) tender: String,
    /// Acting vendor to flag in the board
    #[arg(long)]
    pub(crate) vendor: String,
    /// Serve bids from a portal CSV export instead of the configured portal
    #[arg(long)]
    pub(crate) export_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Clock override for the walkthrough (YYYY-MM-DDTHH:MM:SS). Defaults to now.
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) as_of: Option<NaiveDateTime>,
    /// Optional portal CSV export to walk through instead of the sample listing
    #[arg(long)]
    pub(crate) export_csv: Option<PathBuf>,
}

pub(crate) async fn run_bids(args: BidsArgs) -> Result<(), AppError> {
    let BidsArgs {
        status,
        page,
        as_of,
        export_csv,
    } = args;

    let config = AppConfig::load()?;
    let now = as_of.unwrap_or_else(|| Local::now().naive_local());
    let source = if export_csv.is_some() {
        "portal CSV export"
    } else if config.portal.base_url.is_some() {
        "live portal"
    } else {
        "built-in sample listing"
    };

    let portal = configured_portal(&config.portal, export_csv)?;
    let service = VendorBidService::new(Arc::new(portal));
    let listing = service.my_bids_page(page, status, now).await?;

    println!("My bids ({source}, as of {now})");
    render_bid_list(&listing);

    Ok(())
}

pub(crate) async fn run_participants(args: ParticipantsArgs) -> Result<(), AppError> {
    let ParticipantsArgs {
        tender,
        vendor,
        export_csv,
    } = args;

    let config = AppConfig::load()?;
    let portal = configured_portal(&config.portal, export_csv)?;
    let service = VendorBidService::new(Arc::new(portal));

    let board = service
        .participant_board(TenderId(tender), &VendorId(vendor))
        .await?;
    render_board(&board);

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { as_of, export_csv } = args;

    let as_of = as_of.unwrap_or_else(|| Local::now().naive_local());
    let (bids, imported) = match export_csv {
        Some(path) => (PortalExportImporter::from_path(path)?, true),
        None => (sample_bids(), false),
    };

    println!("Tender desk demo (as of {as_of})");
    if imported {
        println!("Data source: portal CSV export");
    } else {
        println!("Data source: built-in sample listing");
    }

    let acting_vendor = bids
        .iter()
        .find(|bid| bid.vendor.0 == SAMPLE_VENDOR)
        .or_else(|| bids.first())
        .map(|bid| bid.vendor.clone())
        .unwrap_or_else(|| VendorId(SAMPLE_VENDOR.to_string()));
    let own_bids: Vec<Bid> = bids
        .iter()
        .filter(|bid| bid.vendor == acting_vendor)
        .cloned()
        .collect();
    let board_tender = own_bids
        .iter()
        .find(|bid| bid.tender.deadline.is_some())
        .map(|bid| bid.tender.clone());

    let portal = FixtureBidPortal::new(bids, Some(acting_vendor.clone()));
    let service = VendorBidService::new(Arc::new(portal));

    println!("\nMy bids ({})", acting_vendor.0);
    let listing = service.my_bids_page(1, None, as_of).await?;
    render_bid_list(&listing);

    if let Some(tender) = board_tender {
        println!("\nParticipant board: {}", tender.title);
        let board = service.participant_board(tender.id, &acting_vendor).await?;
        render_board(&board);
    }

    println!("\nRe-bid checks");
    for bid in &own_bids {
        match refusal_for(bid, as_of) {
            None => println!("- {}: submission window open", bid.id.0),
            Some(refusal) => println!("- {}: {}", bid.id.0, refusal),
        }
    }

    Ok(())
}

fn render_bid_list(listing: &BidListView) {
    if listing.bids.is_empty() {
        println!("- no bids in the listing");
    }
    for card in &listing.bids {
        println!(
            "- [{}] {} | {} | {} | deadline {} | submitted {}",
            card.status_label,
            card.title,
            card.category,
            card.amount_label,
            card.deadline_label,
            card.submitted_label
        );
        let flags = action_flags(&card.actions);
        if !flags.is_empty() {
            println!("    actions: {}", flags.join(", "));
        }
    }

    let more = if listing.has_more {
        ", more available"
    } else {
        ""
    };
    println!("Loaded {} page(s){}", listing.loaded_pages, more);
    if let Some(error) = &listing.error {
        println!("Listing incomplete: {error}");
    }
}

fn action_flags(actions: &BidActions) -> Vec<&'static str> {
    let mut flags = Vec::new();
    if actions.can_rebid {
        flags.push("re-bid open");
    }
    if actions.can_view_contract {
        flags.push("contract available");
    }
    if actions.can_view_feedback {
        flags.push("feedback available");
    }
    if actions.participants_visible {
        flags.push("participants visible");
    }
    flags
}

fn render_board(board: &ParticipantBoardView) {
    println!(
        "Participant board for {} ({} bids ranked)",
        board.tender_id.0, board.participant_count
    );
    for entry in &board.qualified {
        println!("- {}", participant_line(entry));
    }

    if !board.rejected.is_empty() {
        println!("Not qualified:");
        for entry in &board.rejected {
            let reason = entry
                .disqualification_reason
                .as_deref()
                .unwrap_or("no reason recorded");
            println!("- {} | {}", participant_line(entry), reason);
        }
    }
}

fn participant_line(entry: &ParticipantEntry) -> String {
    let you = if entry.is_acting_vendor { " (you)" } else { "" };
    let score = match entry.technical_score {
        Some(score) => format!(" | tech {score}"),
        None => String::new(),
    };
    format!(
        "{} {}{} | {} | {}{}",
        entry.rank_label,
        entry.vendor_name,
        you,
        entry.amount_label,
        entry.status.label(),
        score
    )
}
