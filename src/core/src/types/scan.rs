//! Scan and finding types

use crate::error::{CoreError, Result};
use crate::{AssetId, RunnerId, ScanId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;
use std::str::FromStr;

/// Scan lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    #[serde(alias = "pending")]
    Queued,
    #[serde(alias = "in_progress")]
    Running,
    #[serde(alias = "succeeded")]
    Completed,
    Failed,
    #[serde(alias = "canceled")]
    Cancelled,
}

impl ScanStatus {
    /// All statuses, in display order
    pub const ALL: [ScanStatus; 5] = [
        ScanStatus::Queued,
        ScanStatus::Running,
        ScanStatus::Completed,
        ScanStatus::Failed,
        ScanStatus::Cancelled,
    ];

    /// Whether the scan has reached a terminal state
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl FromStr for ScanStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queued" | "pending" => Ok(Self::Queued),
            "running" | "in_progress" => Ok(Self::Running),
            "completed" | "succeeded" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(CoreError::invalid(format!("unknown scan status '{}'", other))),
        }
    }
}

/// Finding counts by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FindingCounts {
    #[serde(default)]
    pub critical: u32,
    #[serde(default)]
    pub high: u32,
    #[serde(default)]
    pub medium: u32,
    #[serde(default)]
    pub low: u32,
    #[serde(default)]
    pub info: u32,
}

impl FindingCounts {
    /// Sum over all severities, saturating at `u32::MAX`
    pub fn total(&self) -> u32 {
        [self.high, self.medium, self.low, self.info]
            .into_iter()
            .fold(self.critical, u32::saturating_add)
    }
}

impl AddAssign for FindingCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.critical = self.critical.saturating_add(rhs.critical);
        self.high = self.high.saturating_add(rhs.high);
        self.medium = self.medium.saturating_add(rhs.medium);
        self.low = self.low.saturating_add(rhs.low);
        self.info = self.info.saturating_add(rhs.info);
    }
}

/// Scan execution record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scan {
    pub id: ScanId,

    pub name: String,

    pub status: ScanStatus,

    /// Assets targeted by this scan
    #[serde(default)]
    pub asset_ids: Vec<AssetId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner_id: Option<RunnerId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub findings: FindingCounts,
}

impl Scan {
    /// Create a queued scan with a generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            status: ScanStatus::Queued,
            asset_ids: Vec::new(),
            runner_id: None,
            started_at: None,
            finished_at: None,
            findings: FindingCounts::default(),
        }
    }

    pub fn with_status(mut self, status: ScanStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_assets<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.asset_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_window(mut self, started: DateTime<Utc>, finished: DateTime<Utc>) -> Self {
        self.started_at = Some(started);
        self.finished_at = Some(finished);
        self
    }

    pub fn with_findings(mut self, findings: FindingCounts) -> Self {
        self.findings = findings;
        self
    }

    /// Wall-clock duration in seconds, when both timestamps are known
    /// and ordered
    pub fn duration_secs(&self) -> Option<f64> {
        let (start, end) = (self.started_at?, self.finished_at?);
        let millis = (end - start).num_milliseconds();
        (millis >= 0).then(|| millis as f64 / 1000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_duration() {
        let start = Utc::now();
        let scan = Scan::new("nightly").with_window(start, start + Duration::seconds(90));
        assert_eq!(scan.duration_secs(), Some(90.0));

        let reversed = Scan::new("broken").with_window(start, start - Duration::seconds(1));
        assert_eq!(reversed.duration_secs(), None);

        assert_eq!(Scan::new("pending").duration_secs(), None);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Completed".parse::<ScanStatus>().unwrap(), ScanStatus::Completed);
        assert_eq!("canceled".parse::<ScanStatus>().unwrap(), ScanStatus::Cancelled);
        assert!("done".parse::<ScanStatus>().is_err());
    }

    #[test]
    fn test_status_aliases_deserialize_like_parse() {
        for alias in ["pending", "in_progress", "succeeded", "canceled", "failed"] {
            let from_json: ScanStatus = serde_json::from_value(serde_json::json!(alias)).unwrap();
            assert_eq!(from_json, alias.parse::<ScanStatus>().unwrap(), "alias {}", alias);
        }

        let scan: Scan = serde_json::from_value(serde_json::json!({
            "id": "s-1",
            "name": "nightly",
            "status": "canceled"
        }))
        .unwrap();
        assert_eq!(scan.status, ScanStatus::Cancelled);
        assert_eq!(serde_json::to_value(scan.status).unwrap(), "cancelled");
    }

    #[test]
    fn test_finding_counts_saturate() {
        let mut counts = FindingCounts {
            critical: 3_000_000_000,
            high: 3_000_000_000,
            ..Default::default()
        };
        assert_eq!(counts.total(), u32::MAX);

        counts += FindingCounts {
            critical: 3_000_000_000,
            ..Default::default()
        };
        assert_eq!(counts.critical, u32::MAX);
    }

    #[test]
    fn test_finding_counts_add() {
        let mut total = FindingCounts { critical: 1, high: 2, ..Default::default() };
        total += FindingCounts { high: 1, low: 4, ..Default::default() };
        assert_eq!(total.high, 3);
        assert_eq!(total.total(), 8);
    }

    #[test]
    fn test_scan_json_shape() {
        let scan: Scan = serde_json::from_value(serde_json::json!({
            "id": "s-1",
            "name": "weekly",
            "status": "completed",
            "assetIds": ["a-1", "a-2"],
            "findings": { "critical": 2 }
        }))
        .unwrap();
        assert_eq!(scan.status, ScanStatus::Completed);
        assert_eq!(scan.asset_ids.len(), 2);
        assert_eq!(scan.findings.critical, 2);
        assert!(scan.status.is_finished());
    }
}
