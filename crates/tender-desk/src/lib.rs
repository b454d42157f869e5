//! Tender Desk: client-side bid tracking and competitive ranking against a
//! procurement portal.
//!
//! The portal backend owns every record; this crate retrieves, normalizes,
//! and classifies bids, ranks a tender's participants with the
//! confidentiality rules applied, and gates the re-bid workflow on the
//! submission deadline. Everything stateful lives in explicit values owned
//! by the caller; nothing here reads ambient identity or the wall clock on
//! its own.

pub mod config;
pub mod error;
pub mod export;
pub mod telemetry;
pub mod tenders;

pub use config::{AppConfig, AppEnvironment, ConfigError};
pub use error::AppError;
pub use export::{ExportError, PortalExportImporter};
pub use telemetry::TelemetryError;
