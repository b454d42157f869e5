use crate::cli::ServeArgs;
use crate::infra::{configured_portal, AppState};
use crate::routes::with_bid_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tender_desk::config::AppConfig;
use tender_desk::error::AppError;
use tender_desk::telemetry;
use tender_desk::tenders::bids::VendorBidService;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let portal = configured_portal(&config.portal, None)?;
    if portal.is_fixture() {
        warn!("PORTAL_BASE_URL unset; serving the built-in sample listing");
    }
    let bid_service = Arc::new(VendorBidService::new(Arc::new(portal)));

    let app = with_bid_routes(bid_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "bid tracking service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
