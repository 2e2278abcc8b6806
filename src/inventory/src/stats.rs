//! Scan statistics for dashboard stat cards

use posture_core::{percent, FindingCounts, Scan, ScanStatus};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Aggregate view over a scan collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatistics {
    pub total: usize,

    /// Count per status; every status is present, zero when unused
    pub by_status: BTreeMap<ScanStatus, usize>,

    /// `completed / (completed + failed) * 100`, one decimal place;
    /// 0 when no scan has completed or failed
    pub success_rate: f64,

    /// Findings summed across all scans
    pub findings: FindingCounts,

    /// Mean duration over scans with both timestamps
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_duration_secs: Option<f64>,

    /// Distinct assets targeted by any scan
    pub assets_scanned: usize,
}

impl ScanStatistics {
    pub fn from_scans(scans: &[Scan]) -> Self {
        let mut by_status: BTreeMap<ScanStatus, usize> =
            ScanStatus::ALL.iter().map(|status| (*status, 0)).collect();
        let mut findings = FindingCounts::default();
        let mut assets = HashSet::new();
        let mut durations = Vec::new();

        for scan in scans {
            *by_status.entry(scan.status).or_default() += 1;
            findings += scan.findings;
            assets.extend(scan.asset_ids.iter().map(String::as_str));
            durations.extend(scan.duration_secs());
        }

        let completed = by_status[&ScanStatus::Completed];
        let failed = by_status[&ScanStatus::Failed];

        let average_duration_secs = if durations.is_empty() {
            None
        } else {
            Some(durations.iter().sum::<f64>() / durations.len() as f64)
        };

        let stats = Self {
            total: scans.len(),
            by_status,
            success_rate: percent(completed, completed + failed),
            findings,
            average_duration_secs,
            assets_scanned: assets.len(),
        };

        debug!(
            "Scan statistics: total={}, success_rate={}%, findings={}, assets={}",
            stats.total,
            stats.success_rate,
            stats.findings.total(),
            stats.assets_scanned
        );

        stats
    }

    pub fn count(&self, status: ScanStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// Scans that are queued or running
    pub fn active(&self) -> usize {
        self.count(ScanStatus::Queued) + self.count(ScanStatus::Running)
    }
}
