//! Target/exclusion loading
//!
//! Scope configuration is owned by an external scope-management subsystem
//! and read here per tenant. A [`ScopeSource`] fetches the raw
//! [`ScopeConfig`]; [`ScopeLoader`] turns it into an [`ActiveScope`]
//! ready for matching.

mod config;
mod file;
mod memory;

pub use config::ScopeConfig;
pub use file::FileScopeSource;
pub use memory::InMemoryScopeSource;

use crate::active::ActiveScope;
use crate::error::ScopeResult;
use async_trait::async_trait;
use posture_core::TenantContext;
use tracing::{info, warn};

/// Backend that holds per-tenant scope configuration
#[async_trait]
pub trait ScopeSource: Send + Sync {
    /// Fetch the raw configuration for a tenant
    async fn load(&self, tenant: &TenantContext) -> ScopeResult<ScopeConfig>;
}

/// Loads and compiles the active scope for a tenant
pub struct ScopeLoader<S> {
    source: S,
}

impl<S: ScopeSource> ScopeLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch the tenant's configuration and compile its enabled rules.
    ///
    /// Fetch and parse failures are returned; malformed patterns are not,
    /// they are reported through [`ActiveScope::rejected`].
    pub async fn active_scope(&self, tenant: &TenantContext) -> ScopeResult<ActiveScope> {
        let mut config = self.source.load(tenant).await?;
        if config.tenant_id.is_none() {
            config.tenant_id = Some(tenant.tenant_id.clone());
        }

        let scope = ActiveScope::from_config(config);

        info!(
            "Loaded scope for tenant {}: {} targets, {} exclusions",
            tenant,
            scope.targets().count(),
            scope.exclusions().count()
        );
        if !scope.rejected().is_empty() {
            warn!(
                "Tenant {} has {} malformed scope rules that will never match",
                tenant,
                scope.rejected().len()
            );
        }

        Ok(scope)
    }
}
