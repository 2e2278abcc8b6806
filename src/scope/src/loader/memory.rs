//! In-memory scope source

use super::{ScopeConfig, ScopeSource};
use crate::error::{ScopeError, ScopeResult};
use async_trait::async_trait;
use posture_core::{TenantContext, TenantId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Scope configurations held in memory, keyed by tenant
#[derive(Clone, Default)]
pub struct InMemoryScopeSource {
    configs: Arc<RwLock<HashMap<TenantId, ScopeConfig>>>,
}

impl InMemoryScopeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the configuration for a tenant
    pub async fn set(&self, tenant_id: impl Into<TenantId>, config: ScopeConfig) {
        self.configs.write().await.insert(tenant_id.into(), config);
    }

    pub async fn remove(&self, tenant_id: &str) -> Option<ScopeConfig> {
        self.configs.write().await.remove(tenant_id)
    }

    pub async fn len(&self) -> usize {
        self.configs.read().await.len()
    }
}

#[async_trait]
impl ScopeSource for InMemoryScopeSource {
    async fn load(&self, tenant: &TenantContext) -> ScopeResult<ScopeConfig> {
        self.configs
            .read()
            .await
            .get(&tenant.tenant_id)
            .cloned()
            .ok_or_else(|| ScopeError::TenantNotFound(tenant.tenant_id.clone()))
    }
}
