//! File-backed scope source
//!
//! Reads `<dir>/<tenant>.json`, falling back to `<dir>/<tenant>.toml`.

use super::{ScopeConfig, ScopeSource};
use crate::error::{ScopeError, ScopeResult};
use async_trait::async_trait;
use posture_core::TenantContext;
use std::path::{Path, PathBuf};
use tracing::debug;

const EXTENSIONS: [&str; 2] = ["json", "toml"];

/// Scope configurations stored as one file per tenant
#[derive(Debug, Clone)]
pub struct FileScopeSource {
    dir: PathBuf,
}

impl FileScopeSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn validate_tenant(tenant_id: &str) -> ScopeResult<()> {
        let valid = !tenant_id.is_empty()
            && tenant_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !tenant_id.starts_with('.');
        if valid {
            Ok(())
        } else {
            Err(ScopeError::InvalidTenant(tenant_id.to_string()))
        }
    }
}

#[async_trait]
impl ScopeSource for FileScopeSource {
    async fn load(&self, tenant: &TenantContext) -> ScopeResult<ScopeConfig> {
        Self::validate_tenant(&tenant.tenant_id)?;

        for ext in EXTENSIONS {
            let path = self.dir.join(format!("{}.{}", tenant.tenant_id, ext));
            match tokio::fs::read_to_string(&path).await {
                Ok(contents) => {
                    debug!("Reading scope configuration from {:?}", path);
                    return ScopeConfig::parse_for_path(&path, &contents);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(ScopeError::TenantNotFound(tenant.tenant_id.clone()))
    }
}
