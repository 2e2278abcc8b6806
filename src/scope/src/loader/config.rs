//! Scope configuration document

use crate::error::{ScopeError, ScopeResult};
use crate::rule::{ScopeExclusion, ScopeTarget};
use posture_core::TenantId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Targets and exclusions as stored by the scope-management subsystem
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,

    #[serde(default)]
    pub targets: Vec<ScopeTarget>,

    #[serde(default)]
    pub exclusions: Vec<ScopeExclusion>,
}

impl ScopeConfig {
    pub fn from_json_str(contents: &str) -> ScopeResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn from_toml_str(contents: &str) -> ScopeResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Parses `contents` according to the extension of `path`
    pub fn parse_for_path(path: &Path, contents: &str) -> ScopeResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(contents),
            Some("toml") => Self::from_toml_str(contents),
            _ => Err(ScopeError::UnsupportedFormat(path.display().to_string())),
        }
    }
}
