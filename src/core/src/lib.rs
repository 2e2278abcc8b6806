//! # Posture Core
//!
//! Shared inventory types and error handling for the security-posture
//! workspace. Every other crate consumes these shapes: assets as fetched
//! from the asset-listing endpoint, scans, runners, and the tenant
//! context that scopes every lookup.

pub mod types;
pub mod error;
pub mod ratio;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use ratio::percent;
pub use types::{
    Asset, AssetKind, AssetRecord, AssetStatus, AssetType, FindingCounts, Runner, RunnerStatus,
    Scan, ScanStatus, TenantContext, Visibility,
};

pub type AssetId = String;
pub type ScanId = String;
pub type RunnerId = String;
pub type TenantId = String;
