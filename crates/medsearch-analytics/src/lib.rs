//! # medsearch-analytics
//!
//! The dashboard and upload views of MedSearch.
//!
//! - [`aggregate`]: totals, per-drug figures and below-net-price alerts over
//!   a flat list of pharmacy sale records.
//! - [`dashboard::Dashboard`]: one fetch from a `SalesSource`, aggregated.
//! - [`upload::UploadInbox`]: validates spreadsheet uploads and keeps a
//!   SHA-256 fingerprinted receipt for each.

pub mod aggregate;
pub mod dashboard;
pub mod upload;

pub use aggregate::{below_net_price, summarize};
pub use dashboard::Dashboard;
pub use upload::UploadInbox;
