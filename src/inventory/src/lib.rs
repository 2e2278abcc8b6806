//! # Posture Inventory
//!
//! Read-side composition over already-fetched inventory collections:
//! filter predicates combined with logical AND, stable sorting, 1-based
//! pagination, and scan statistics for dashboard cards.
//!
//! ## Example
//!
//! ```rust
//! use posture_core::Asset;
//! use posture_inventory::{AssetFilter, SortOrder, TableQuery};
//!
//! let assets = vec![
//!     Asset::domain("a-2", "www.example.com"),
//!     Asset::domain("a-1", "api.example.com"),
//!     Asset::domain("a-3", "shop.example.org"),
//! ];
//!
//! let page = TableQuery::new()
//!     .filter(AssetFilter::new().search("example.com"))
//!     .sort_by(|a: &Asset| a.name.clone(), SortOrder::Ascending)
//!     .paginate(1, 10)
//!     .run(&assets)
//!     .unwrap();
//!
//! assert_eq!(page.total, 2);
//! assert_eq!(page.items[0].name, "api.example.com");
//! ```

pub mod error;
pub mod filters;
pub mod query;
pub mod stats;

// Re-export commonly used types
pub use error::{InventoryError, Result};
pub use filters::{AssetFilter, RunnerFilter, ScanFilter};
pub use query::{Page, Predicate, SortOrder, TableQuery};
pub use stats::ScanStatistics;
