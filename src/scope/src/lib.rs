//! # Posture Scope
//!
//! Scope matching and coverage aggregation for inventory assets.
//!
//! ## Features
//!
//! - **Pattern kinds**: exact names, domain suffixes, CIDR membership and globs
//! - **Fail-open matching**: a malformed pattern never matches and never panics
//! - **Explanations**: every matching target and exclusion is reported
//! - **Coverage**: totals, in-scope and excluded counts, percentage per kind
//! - **Loaders**: in-memory and file-backed per-tenant scope configuration
//!
//! ## Example
//!
//! ```rust
//! use posture_core::Asset;
//! use posture_scope::{calculate_scope_coverage, match_asset, ScopeRule};
//!
//! let asset = Asset::domain("a-1", "app.internal.example.com");
//! let targets = vec![ScopeRule::new("*.example.com")];
//!
//! let result = match_asset(&asset, &targets, &[]);
//! assert!(result.in_scope);
//!
//! let summary = calculate_scope_coverage(&[asset], &targets, &[]);
//! assert_eq!(summary.coverage_percent, 100.0);
//! ```

pub mod active;
pub mod cache;
pub mod coverage;
pub mod error;
pub mod loader;
pub mod matcher;
pub mod pattern;
pub mod rule;

// Re-export commonly used types
pub use active::{ActiveScope, CompiledRule, RejectedRule};
pub use cache::{CacheStats, PatternCache};
pub use coverage::{
    calculate_scope_coverage, coverage_by_kind, scope_matches_for_assets, summarize,
    AssetScopeMatch, CoverageSummary,
};
pub use error::{ScopeError, ScopeResult};
pub use loader::{FileScopeSource, InMemoryScopeSource, ScopeConfig, ScopeLoader, ScopeSource};
pub use matcher::{match_asset, ScopeEvaluator, ScopeMatchResult, ScopeMatcher};
pub use pattern::{CompiledPattern, IpNetwork, PatternError, PatternKind};
pub use rule::{ScopeExclusion, ScopeRule, ScopeTarget};
