//! Error types for table composition

use thiserror::Error;

/// Inventory query errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// Page size must be positive
    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),

    /// Pages are numbered from 1
    #[error("Invalid page number: {0}")]
    InvalidPage(usize),
}

/// Result type for inventory operations
pub type Result<T> = std::result::Result<T, InventoryError>;
