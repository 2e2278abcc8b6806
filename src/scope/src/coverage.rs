//! Coverage aggregation over asset collections

use crate::matcher::{ScopeEvaluator, ScopeMatchResult, ScopeMatcher};
use crate::rule::{ScopeExclusion, ScopeTarget};
use posture_core::{Asset, AssetId, AssetType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

pub use posture_core::percent;

/// Scope coverage of an asset collection
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageSummary {
    /// Number of assets evaluated
    pub total: usize,

    /// Assets matching a target and no exclusion
    pub in_scope: usize,

    /// Assets matching at least one exclusion, whether or not a target matched
    pub excluded: usize,

    /// `in_scope / total * 100`, one decimal place; 0 for an empty collection
    pub coverage_percent: f64,
}

impl CoverageSummary {
    pub fn from_counts(total: usize, in_scope: usize, excluded: usize) -> Self {
        Self {
            total,
            in_scope,
            excluded,
            coverage_percent: percent(in_scope, total),
        }
    }

    /// Assets not in scope (no target, or excluded)
    pub fn out_of_scope(&self) -> usize {
        self.total - self.in_scope
    }

    fn record(&mut self, result: &ScopeMatchResult) {
        self.total += 1;
        if result.in_scope {
            self.in_scope += 1;
        }
        if result.is_excluded() {
            self.excluded += 1;
        }
        self.coverage_percent = percent(self.in_scope, self.total);
    }
}

/// Per-row scope badge data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetScopeMatch {
    pub asset_id: AssetId,
    pub asset_type: AssetType,
    #[serde(flatten)]
    pub result: ScopeMatchResult,
}

/// Applies `evaluator` to every asset and counts the outcomes
pub fn summarize<E>(assets: &[Asset], evaluator: &E) -> CoverageSummary
where
    E: ScopeEvaluator + ?Sized,
{
    let mut summary = CoverageSummary::default();
    for asset in assets {
        summary.record(&evaluator.evaluate(asset));
    }

    debug!(
        "Scope coverage: total={}, in_scope={}, excluded={}, coverage={}%",
        summary.total, summary.in_scope, summary.excluded, summary.coverage_percent
    );

    summary
}

/// Coverage of `assets` against `targets` and `exclusions`.
///
/// Each distinct pattern is compiled once for the whole collection.
pub fn calculate_scope_coverage(
    assets: &[Asset],
    targets: &[ScopeTarget],
    exclusions: &[ScopeExclusion],
) -> CoverageSummary {
    ScopeMatcher::new().coverage(assets, targets, exclusions)
}

/// Coverage broken down by asset type, for per-type stat cards
pub fn coverage_by_kind<E>(assets: &[Asset], evaluator: &E) -> BTreeMap<AssetType, CoverageSummary>
where
    E: ScopeEvaluator + ?Sized,
{
    let mut by_kind: BTreeMap<AssetType, CoverageSummary> = BTreeMap::new();
    for asset in assets {
        by_kind
            .entry(asset.asset_type())
            .or_default()
            .record(&evaluator.evaluate(asset));
    }
    by_kind
}

/// Match result for every asset, in input order
pub fn scope_matches_for_assets<E>(assets: &[Asset], evaluator: &E) -> Vec<AssetScopeMatch>
where
    E: ScopeEvaluator + ?Sized,
{
    assets
        .iter()
        .map(|asset| AssetScopeMatch {
            asset_id: asset.id.clone(),
            asset_type: asset.asset_type(),
            result: evaluator.evaluate(asset),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::match_asset;
    use crate::rule::ScopeRule;
    use posture_core::AssetKind;

    fn domains(names: &[&str]) -> Vec<Asset> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Asset::domain(format!("a-{}", i), *name))
            .collect()
    }

    #[test]
    fn test_empty_collection() {
        let targets = vec![ScopeRule::new("*")];
        let summary = calculate_scope_coverage(&[], &targets, &[]);
        assert_eq!(summary, CoverageSummary::default());
        assert_eq!(summary.coverage_percent, 0.0);
        assert!(!summary.coverage_percent.is_nan());
    }

    #[test]
    fn test_full_coverage() {
        let assets = domains(&["app.internal.example.com"]);
        let summary = calculate_scope_coverage(&assets, &[ScopeRule::new("*.example.com")], &[]);
        assert_eq!(summary.total, 1);
        assert_eq!(summary.in_scope, 1);
        assert_eq!(summary.coverage_percent, 100.0);
    }

    #[test]
    fn test_partial_coverage_with_exclusion() {
        let assets = domains(&[
            "a.example.com",
            "b.example.com",
            "staging.example.com",
            "one.org",
            "two.org",
            "three.org",
            "four.org",
            "five.org",
            "six.org",
            "seven.org",
        ]);
        let targets = vec![ScopeRule::new(".example.com")];
        let exclusions = vec![ScopeRule::new("staging.*")];

        let summary = calculate_scope_coverage(&assets, &targets, &exclusions);
        assert_eq!(summary.total, 10);
        assert_eq!(summary.in_scope, 2);
        assert_eq!(summary.excluded, 1);
        assert_eq!(summary.coverage_percent, 20.0);
        assert_eq!(summary.out_of_scope(), 8);
    }

    #[test]
    fn test_excluded_counts_without_target_match() {
        let assets = domains(&["staging.other.org", "a.example.com"]);
        let targets = vec![ScopeRule::new(".example.com")];
        let exclusions = vec![ScopeRule::new("staging.*")];

        let summary = calculate_scope_coverage(&assets, &targets, &exclusions);
        assert_eq!(summary.in_scope, 1);
        assert_eq!(summary.excluded, 1);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(percent(1, 3), 33.3);
        assert_eq!(percent(2, 3), 66.7);
        assert_eq!(percent(0, 0), 0.0);
        assert_eq!(percent(5, 5), 100.0);
    }

    #[test]
    fn test_coverage_by_kind() {
        let mut assets = domains(&["a.example.com", "b.other.org"]);
        assets.push(Asset::ip("ip-1", "10.0.0.5".parse().unwrap()));
        assets.push(Asset::new(
            "c-1",
            "deploy-key",
            AssetKind::Credential { provider: "github".to_string() },
        ));

        let targets = vec![ScopeRule::new(".example.com"), ScopeRule::new("10.0.0.0/24")];
        let evaluator = |asset: &Asset| match_asset(asset, &targets, &[]);
        let by_kind = coverage_by_kind(&assets, &evaluator);

        assert_eq!(by_kind.len(), 3);
        assert_eq!(by_kind[&AssetType::Domain].total, 2);
        assert_eq!(by_kind[&AssetType::Domain].coverage_percent, 50.0);
        assert_eq!(by_kind[&AssetType::Ip].in_scope, 1);
        assert_eq!(by_kind[&AssetType::Credential].in_scope, 0);
    }

    #[test]
    fn test_scope_matches_preserve_order() {
        let assets = domains(&["z.example.com", "a.org", "m.example.com"]);
        let targets = vec![ScopeRule::new("*.example.com")];
        let evaluator = |asset: &Asset| match_asset(asset, &targets, &[]);

        let rows = scope_matches_for_assets(&assets, &evaluator);
        let ids: Vec<_> = rows.iter().map(|row| row.asset_id.as_str()).collect();
        assert_eq!(ids, vec!["a-0", "a-1", "a-2"]);
        assert!(rows[0].result.in_scope);
        assert!(!rows[1].result.in_scope);

        let value = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(value["assetId"], "a-0");
        assert_eq!(value["inScope"], true);
    }
}
