//! Scan runner types

use crate::RunnerId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunnerStatus {
    Online,
    Offline,
    Busy,
}

/// Execution agent that picks up scans
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runner {
    pub id: RunnerId,
    pub name: String,
    pub status: RunnerStatus,
    /// Hosting provider (e.g. "aws", "self-hosted")
    pub provider: String,
}

impl Runner {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        status: RunnerStatus,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            provider: provider.into(),
        }
    }
}
