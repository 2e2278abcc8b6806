//! Error types for scope configuration loading

use thiserror::Error;

/// Result type for scope operations
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Errors raised while fetching or parsing scope configuration.
///
/// Pattern problems are not represented here: they are confined to the
/// rule that carries them (see [`crate::pattern::PatternError`]).
#[derive(Debug, Error)]
pub enum ScopeError {
    /// No configuration exists for the tenant
    #[error("Scope configuration not found for tenant '{0}'")]
    TenantNotFound(String),

    /// Tenant id cannot be used as a lookup key
    #[error("Invalid tenant id '{0}'")]
    InvalidTenant(String),

    /// Configuration document failed to parse
    #[error("Failed to parse scope configuration: {0}")]
    Parse(String),

    /// File extension is neither json nor toml
    #[error("Unsupported scope configuration format: {0}")]
    UnsupportedFormat(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ScopeError {
    fn from(err: serde_json::Error) -> Self {
        ScopeError::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for ScopeError {
    fn from(err: toml::de::Error) -> Self {
        ScopeError::Parse(err.to_string())
    }
}
