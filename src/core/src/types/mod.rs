//! Shared inventory types

pub mod asset;
pub mod scan;
pub mod runner;
pub mod tenant;

// Re-export commonly used types
pub use asset::{Asset, AssetKind, AssetRecord, AssetStatus, AssetType, Visibility};
pub use scan::{FindingCounts, Scan, ScanStatus};
pub use runner::{Runner, RunnerStatus};
pub use tenant::TenantContext;
