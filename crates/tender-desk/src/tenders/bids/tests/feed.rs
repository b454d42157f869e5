use super::common::*;
use crate::tenders::bids::{
    BidFeed, BidStatus, FeedError, FeedScope, PageOutcome, PortalError, DEFAULT_PAGE_LIMIT,
};
use crate::tenders::TenderId;

#[test]
fn second_fetch_refused_while_first_in_flight() {
    let mut feed = BidFeed::new(FeedScope::my_bids(None));

    let pending = feed
        .begin_next_page()
        .expect("first ticket")
        .expect("page available");
    assert_eq!(pending.page(), 1);
    assert!(feed.is_loading());

    assert!(matches!(
        feed.begin_next_page(),
        Err(FeedError::FetchInProgress)
    ));

    let outcome = feed.apply(
        pending,
        Ok(page(
            vec![bid("bid-1", "ven-1", Some(10_000.0), BidStatus::Submitted)],
            2,
        )),
    );
    assert!(matches!(outcome, PageOutcome::Appended(1)));
    assert!(!feed.is_loading());

    let second = feed
        .begin_next_page()
        .expect("second ticket")
        .expect("page 2 available");
    assert_eq!(second.page(), 2);
}

#[test]
fn scope_filters_flow_into_queries() {
    let mut feed = BidFeed::new(FeedScope::tender(TenderId("tdr-9".to_string())));

    let pending = feed
        .begin_next_page()
        .expect("ticket")
        .expect("page available");

    assert_eq!(
        pending.query().tender.as_ref().map(|tender| tender.0.as_str()),
        Some("tdr-9")
    );
    assert_eq!(pending.query().limit, DEFAULT_PAGE_LIMIT);
    assert_eq!(pending.query().status, None);
}

#[tokio::test]
async fn load_next_appends_pages_in_request_order() {
    let portal = ScriptedPortal::new(vec![
        Ok(page(
            vec![
                bid("bid-1", "ven-1", Some(10_000.0), BidStatus::Submitted),
                bid("bid-2", "ven-2", Some(11_000.0), BidStatus::Submitted),
            ],
            2,
        )),
        Ok(page(
            vec![bid("bid-3", "ven-3", Some(12_000.0), BidStatus::Submitted)],
            2,
        )),
    ]);
    let mut feed = BidFeed::new(FeedScope::my_bids(None));

    feed.load_next(&portal).await.expect("page 1 loads");
    assert_eq!(feed.loaded_pages(), 1);
    assert!(feed.has_more());

    feed.load_next(&portal).await.expect("page 2 loads");
    assert_eq!(feed.loaded_pages(), 2);
    assert!(!feed.has_more());

    let ids: Vec<&str> = feed.records().iter().map(|bid| bid.id.0.as_str()).collect();
    assert_eq!(ids, ["bid-1", "bid-2", "bid-3"]);

    let pages: Vec<u32> = portal.queries().iter().map(|query| query.page).collect();
    assert_eq!(pages, [1, 2]);

    // Exhausted listings load nothing further.
    assert!(matches!(feed.load_next(&portal).await, Ok(None)));
}

#[tokio::test]
async fn failed_page_preserves_accumulated_records() {
    let portal = ScriptedPortal::new(vec![
        Ok(page(scenario_bids(), 2)),
        Err(PortalError::Status(502)),
    ]);
    let mut feed = BidFeed::new(FeedScope::my_bids(None));

    feed.load_next(&portal).await.expect("page 1 loads");
    let outcome = feed.load_next(&portal).await.expect("fetch runs");
    assert!(matches!(outcome, Some(PageOutcome::Failed(_))));

    assert_eq!(feed.records().len(), 3);
    assert_eq!(feed.error(), Some(&PortalError::Status(502)));
    assert!(feed.has_more());
}

#[tokio::test]
async fn retry_after_failure_requests_the_same_page() {
    let portal = ScriptedPortal::new(vec![
        Ok(page(scenario_bids(), 2)),
        Err(PortalError::Status(500)),
        Ok(page(
            vec![bid("bid-4", "ven-4", Some(130_000.0), BidStatus::Submitted)],
            2,
        )),
    ]);
    let mut feed = BidFeed::new(FeedScope::my_bids(None));

    feed.load_next(&portal).await.expect("page 1 loads");
    feed.load_next(&portal).await.expect("failed fetch runs");
    assert!(feed.error().is_some());

    let outcome = feed.load_next(&portal).await.expect("retry runs");
    assert!(matches!(outcome, Some(PageOutcome::Appended(1))));
    assert_eq!(feed.error(), None);
    assert_eq!(feed.records().len(), 4);
    assert!(!feed.has_more());

    let pages: Vec<u32> = portal.queries().iter().map(|query| query.page).collect();
    assert_eq!(pages, [1, 2, 2]);
}

#[test]
fn reset_discards_responses_from_the_old_generation() {
    let mut feed = BidFeed::new(FeedScope::my_bids(None));
    let pending = feed
        .begin_next_page()
        .expect("ticket")
        .expect("page available");

    // Filter change while the request is outstanding.
    feed.reset(FeedScope::my_bids(Some(BidStatus::Submitted)));

    let outcome = feed.apply(pending, Ok(page(scenario_bids(), 1)));
    assert!(matches!(outcome, PageOutcome::Stale));
    assert!(feed.records().is_empty());
    assert!(!feed.is_loading());

    let fresh = feed
        .begin_next_page()
        .expect("ticket")
        .expect("page 1 of the new scope");
    assert_eq!(fresh.page(), 1);
    assert_eq!(fresh.query().status, Some(BidStatus::Submitted));
}

#[test]
fn reset_clears_accumulated_state_immediately() {
    let mut feed = BidFeed::new(FeedScope::my_bids(None));
    let pending = feed
        .begin_next_page()
        .expect("ticket")
        .expect("page available");
    feed.apply(pending, Ok(page(scenario_bids(), 2)));
    assert_eq!(feed.records().len(), 3);

    feed.reset(FeedScope::my_bids(None));

    assert!(feed.records().is_empty());
    assert_eq!(feed.loaded_pages(), 0);
    assert_eq!(feed.total_pages(), None);
    assert_eq!(feed.error(), None);
    assert!(feed.has_more());
}

#[tokio::test]
async fn load_all_drains_every_page() {
    let portal = ScriptedPortal::new(vec![
        Ok(page(
            vec![bid("bid-1", "ven-1", Some(10_000.0), BidStatus::Submitted)],
            3,
        )),
        Ok(page(
            vec![bid("bid-2", "ven-2", Some(11_000.0), BidStatus::Submitted)],
            3,
        )),
        Ok(page(
            vec![bid("bid-3", "ven-3", Some(12_000.0), BidStatus::Submitted)],
            3,
        )),
    ]);
    let mut feed = BidFeed::new(FeedScope::my_bids(None));

    feed.load_all(&portal).await.expect("all pages load");

    assert_eq!(feed.records().len(), 3);
    assert_eq!(feed.loaded_pages(), 3);
    assert!(!feed.has_more());
}

#[tokio::test]
async fn load_all_stops_on_failure_with_records_intact() {
    let portal = ScriptedPortal::new(vec![
        Ok(page(scenario_bids(), 2)),
        Err(PortalError::Transport("connection refused".to_string())),
    ]);
    let mut feed = BidFeed::new(FeedScope::my_bids(None));

    let error = feed.load_all(&portal).await.expect_err("second page fails");
    assert!(matches!(error, FeedError::Portal(PortalError::Transport(_))));
    assert_eq!(feed.records().len(), 3);
    assert!(feed.error().is_some());
}

#[test]
fn empty_listing_is_a_valid_terminal_state() {
    let mut feed = BidFeed::new(FeedScope::my_bids(None));
    let pending = feed
        .begin_next_page()
        .expect("ticket")
        .expect("page available");

    let outcome = feed.apply(pending, Ok(page(Vec::new(), 0)));
    assert!(matches!(outcome, PageOutcome::Appended(0)));
    assert!(feed.records().is_empty());
    assert!(!feed.has_more());
    assert_eq!(feed.error(), None);
}
