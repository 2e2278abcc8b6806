//! Report assembly and rendering

use crate::config::OutputFormat;
use anyhow::{Context, Result};
use posture_core::{Asset, AssetStatus, AssetType, Scan, ScanStatus};
use posture_inventory::{AssetFilter, Page, ScanFilter, ScanStatistics, SortOrder, TableQuery};
use posture_scope::{coverage_by_kind, ActiveScope, CoverageSummary, ScopeMatchResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// A report that can be printed as text or JSON
pub trait Render: Serialize {
    fn render_text(&self) -> String;
}

pub fn render<R: Render>(report: &R, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(report.render_text()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report")
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub tenant: String,
    pub summary: CoverageSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_kind: Option<BTreeMap<AssetType, CoverageSummary>>,
    /// Labels of enabled rules that never match because they are malformed
    pub rejected_rules: Vec<String>,
}

impl CoverageReport {
    pub fn build(tenant: &str, assets: &[Asset], scope: &ActiveScope, by_kind: bool) -> Self {
        Self {
            tenant: tenant.to_string(),
            summary: scope.coverage(assets),
            by_kind: by_kind.then(|| coverage_by_kind(assets, scope)),
            rejected_rules: scope
                .rejected()
                .iter()
                .map(|rejected| format!("{} ({})", rejected.rule.label(), rejected.error))
                .collect(),
        }
    }
}

impl Render for CoverageReport {
    fn render_text(&self) -> String {
        let s = &self.summary;
        let mut out = String::new();
        let _ = writeln!(out, "Tenant:       {}", self.tenant);
        let _ = writeln!(out, "Assets:       {}", s.total);
        let _ = writeln!(out, "In scope:     {} ({:.1}%)", s.in_scope, s.coverage_percent);
        let _ = writeln!(out, "Excluded:     {}", s.excluded);
        let _ = writeln!(out, "Out of scope: {}", s.out_of_scope());

        if let Some(by_kind) = &self.by_kind {
            let _ = writeln!(out, "\nBy type:");
            for (kind, summary) in by_kind {
                let _ = writeln!(
                    out,
                    "  {:<14} {:>5}/{:<5} {:>5.1}%",
                    kind.as_str(),
                    summary.in_scope,
                    summary.total,
                    summary.coverage_percent
                );
            }
        }

        if !self.rejected_rules.is_empty() {
            let _ = writeln!(out, "\nIgnored malformed rules:");
            for rule in &self.rejected_rules {
                let _ = writeln!(out, "  {}", rule);
            }
        }
        out
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainReport {
    pub asset_id: String,
    pub name: String,
    pub asset_type: AssetType,
    #[serde(flatten)]
    pub result: ScopeMatchResult,
    pub explanation: String,
}

impl ExplainReport {
    pub fn build(asset_id: &str, assets: &[Asset], scope: &ActiveScope) -> Result<Self> {
        let asset = assets
            .iter()
            .find(|asset| asset.id == asset_id)
            .with_context(|| format!("Asset '{}' not found", asset_id))?;

        let result = scope.match_asset(asset);
        Ok(Self {
            asset_id: asset.id.clone(),
            name: asset.name.clone(),
            asset_type: asset.asset_type(),
            explanation: result.explain(),
            result,
        })
    }
}

impl Render for ExplainReport {
    fn render_text(&self) -> String {
        format!(
            "{} ({}, {})\n{}\n",
            self.name, self.asset_id, self.asset_type, self.explanation
        )
    }
}

/// One row of the asset table with its scope badge
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRow {
    pub id: String,
    pub name: String,
    pub asset_type: AssetType,
    pub status: AssetStatus,
    pub in_scope: bool,
}

#[derive(Debug, Default)]
pub struct AssetQuery {
    pub status: Option<AssetStatus>,
    pub asset_type: Option<AssetType>,
    pub search: Option<String>,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug, Serialize)]
pub struct AssetListing(pub Page<AssetRow>);

impl AssetListing {
    /// Filters, sorts by name and paginates, then badges the visible rows
    pub fn build(assets: &[Asset], scope: &ActiveScope, query: &AssetQuery) -> Result<Self> {
        let mut filter = AssetFilter::new();
        filter.status = query.status;
        filter.asset_type = query.asset_type;
        if let Some(search) = &query.search {
            filter = filter.search(search.as_str());
        }

        let page = TableQuery::new()
            .filter(filter)
            .sort_by(|asset: &Asset| asset.name.to_lowercase(), SortOrder::Ascending)
            .paginate(query.page, query.page_size)
            .run(assets)?;

        let items = page
            .items
            .iter()
            .map(|asset| AssetRow {
                id: asset.id.clone(),
                name: asset.name.clone(),
                asset_type: asset.asset_type(),
                status: asset.status,
                in_scope: scope.match_asset(asset).in_scope,
            })
            .collect();

        Ok(Self(Page {
            items,
            page: page.page,
            page_size: page.page_size,
            total: page.total,
            total_pages: page.total_pages,
        }))
    }
}

impl Render for AssetListing {
    fn render_text(&self) -> String {
        let page = &self.0;
        let mut out = String::new();
        for row in &page.items {
            let badge = if row.in_scope { "in scope" } else { "out of scope" };
            let _ = writeln!(
                out,
                "{:<12} {:<32} {:<14} {}",
                row.id,
                row.name,
                row.asset_type.as_str(),
                badge
            );
        }
        let _ = writeln!(
            out,
            "Page {} of {} ({} assets)",
            page.page,
            page.total_pages.max(1),
            page.total
        );
        out
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub statistics: ScanStatistics,
    pub scans: Vec<Scan>,
}

impl ScanReport {
    /// Statistics over the scans matching `status` (all scans when unset)
    pub fn build(scans: &[Scan], status: Option<ScanStatus>) -> Result<Self> {
        let mut filter = ScanFilter::new();
        filter.status = status;

        let page = TableQuery::new().filter(filter).run(scans)?;
        let selected: Vec<Scan> = page.items.into_iter().cloned().collect();

        Ok(Self {
            statistics: ScanStatistics::from_scans(&selected),
            scans: selected,
        })
    }
}

impl Render for ScanReport {
    fn render_text(&self) -> String {
        let stats = &self.statistics;
        let mut out = String::new();
        let _ = writeln!(out, "Scans:        {}", stats.total);
        for (status, count) in &stats.by_status {
            let _ = writeln!(out, "  {:<12}{}", format!("{:?}", status).to_lowercase(), count);
        }
        let _ = writeln!(out, "Success rate: {:.1}%", stats.success_rate);
        if let Some(avg) = stats.average_duration_secs {
            let _ = writeln!(out, "Avg duration: {:.1}s", avg);
        }
        let f = &stats.findings;
        let _ = writeln!(
            out,
            "Findings:     {} (critical {}, high {}, medium {}, low {}, info {})",
            f.total(),
            f.critical,
            f.high,
            f.medium,
            f.low,
            f.info
        );
        let _ = writeln!(out, "Assets:       {}", stats.assets_scanned);
        out
    }
}
