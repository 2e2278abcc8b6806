//! Posture report library
//!
//! Loads inventory snapshots and per-tenant scope configuration, then
//! assembles the coverage, explanation, asset and scan reports printed by
//! the `posture-report` binary.

pub mod config;
pub mod inputs;
pub mod report;

pub use config::{OutputFormat, ReportConfig};
pub use report::{
    render, AssetListing, AssetQuery, CoverageReport, ExplainReport, Render, ScanReport,
};
