//! Asset-to-scope matching
//!
//! An asset is in scope iff it matches at least one enabled target and no
//! enabled exclusion. Every matching rule is reported, not just the first,
//! so callers can explain why an asset is (or is not) in scope.

use crate::cache::{CacheStats, PatternCache};
use crate::coverage::{summarize, CoverageSummary};
use crate::pattern::CompiledPattern;
use crate::rule::{ScopeExclusion, ScopeRule, ScopeTarget};
use posture_core::Asset;
use serde::Serialize;
use tracing::warn;

/// Outcome of matching one asset against a scope
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeMatchResult {
    pub in_scope: bool,
    pub matched_targets: Vec<ScopeTarget>,
    pub matched_exclusions: Vec<ScopeExclusion>,
}

impl ScopeMatchResult {
    /// Builds a result from the matching rules; `in_scope` is derived
    pub fn from_matches(
        matched_targets: Vec<ScopeTarget>,
        matched_exclusions: Vec<ScopeExclusion>,
    ) -> Self {
        Self {
            in_scope: !matched_targets.is_empty() && matched_exclusions.is_empty(),
            matched_targets,
            matched_exclusions,
        }
    }

    /// At least one exclusion matched, regardless of targets
    pub fn is_excluded(&self) -> bool {
        !self.matched_exclusions.is_empty()
    }

    /// Human-readable reason for the outcome
    pub fn explain(&self) -> String {
        fn labels(rules: &[ScopeRule]) -> String {
            rules.iter().map(ScopeRule::label).collect::<Vec<_>>().join(", ")
        }

        match (self.matched_targets.is_empty(), self.is_excluded()) {
            (true, false) => "Out of scope: no target matched".to_string(),
            (true, true) => format!(
                "Out of scope: no target matched; excluded by {}",
                labels(&self.matched_exclusions)
            ),
            (false, true) => format!(
                "Out of scope: matched {} but excluded by {}",
                labels(&self.matched_targets),
                labels(&self.matched_exclusions)
            ),
            (false, false) => format!("In scope: matched {}", labels(&self.matched_targets)),
        }
    }
}

/// Anything that can decide scope membership for a single asset
pub trait ScopeEvaluator {
    fn evaluate(&self, asset: &Asset) -> ScopeMatchResult;
}

impl<F> ScopeEvaluator for F
where
    F: Fn(&Asset) -> ScopeMatchResult,
{
    fn evaluate(&self, asset: &Asset) -> ScopeMatchResult {
        self(asset)
    }
}

/// Collects the enabled rules for which `is_match` holds
pub(crate) fn collect_matches<F>(rules: &[ScopeRule], mut is_match: F) -> Vec<ScopeRule>
where
    F: FnMut(&ScopeRule) -> bool,
{
    rules
        .iter()
        .filter(|rule| rule.enabled && is_match(*rule))
        .cloned()
        .collect()
}

fn compile_or_warn(rule: &ScopeRule) -> Option<CompiledPattern> {
    match rule.compile() {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            warn!(
                "Ignoring malformed scope pattern '{}' ({}): {}",
                rule.pattern,
                rule.label(),
                e
            );
            None
        }
    }
}

/// Matches an asset against targets and exclusions.
///
/// Pure function of its inputs; patterns are compiled per call. Disabled
/// rules are ignored and malformed patterns never match.
pub fn match_asset(
    asset: &Asset,
    targets: &[ScopeTarget],
    exclusions: &[ScopeExclusion],
) -> ScopeMatchResult {
    let is_match = |rule: &ScopeRule| {
        compile_or_warn(rule).is_some_and(|pattern| pattern.matches(asset))
    };

    ScopeMatchResult::from_matches(
        collect_matches(targets, is_match),
        collect_matches(exclusions, is_match),
    )
}

/// Matcher backed by a [`PatternCache`].
///
/// Produces exactly the results of [`match_asset`]; the cache only saves
/// recompiling the same pattern across assets and render passes.
///
/// # Examples
///
/// ```
/// use posture_core::Asset;
/// use posture_scope::{ScopeMatcher, ScopeRule};
///
/// let matcher = ScopeMatcher::new();
/// let targets = vec![ScopeRule::new(".example.com")];
/// let exclusions = vec![ScopeRule::new("staging.*")];
///
/// let asset = Asset::domain("a-1", "staging.example.com");
/// let result = matcher.match_asset(&asset, &targets, &exclusions);
/// assert!(!result.in_scope);
/// assert!(result.is_excluded());
/// ```
#[derive(Default)]
pub struct ScopeMatcher {
    cache: PatternCache,
}

impl ScopeMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a matcher with a caller-configured cache
    pub fn with_cache(cache: PatternCache) -> Self {
        Self { cache }
    }

    /// Checks a single rule, honoring its enabled flag
    pub fn matches_rule(&self, asset: &Asset, rule: &ScopeRule) -> bool {
        if !rule.enabled {
            return false;
        }
        // Compile failures are logged once, by the cache
        self.cache
            .get_or_compile(rule)
            .is_ok_and(|pattern| pattern.matches(asset))
    }

    pub fn match_asset(
        &self,
        asset: &Asset,
        targets: &[ScopeTarget],
        exclusions: &[ScopeExclusion],
    ) -> ScopeMatchResult {
        let is_match = |rule: &ScopeRule| self.matches_rule(asset, rule);
        ScopeMatchResult::from_matches(
            collect_matches(targets, is_match),
            collect_matches(exclusions, is_match),
        )
    }

    /// Coverage over `assets`, sharing this matcher's cache
    pub fn coverage(
        &self,
        assets: &[Asset],
        targets: &[ScopeTarget],
        exclusions: &[ScopeExclusion],
    ) -> CoverageSummary {
        summarize(assets, &|asset: &Asset| self.match_asset(asset, targets, exclusions))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
