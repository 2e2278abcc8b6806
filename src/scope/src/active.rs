//! Pre-compiled active scope for one tenant

use crate::coverage::{summarize, CoverageSummary};
use crate::loader::ScopeConfig;
use crate::matcher::{ScopeEvaluator, ScopeMatchResult};
use crate::pattern::{CompiledPattern, PatternError};
use crate::rule::ScopeRule;
use posture_core::{Asset, TenantId};
use tracing::warn;

/// An enabled rule together with its compiled pattern
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: ScopeRule,
    pub pattern: CompiledPattern,
}

/// An enabled rule whose pattern failed to compile; it never matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRule {
    pub rule: ScopeRule,
    pub error: PatternError,
}

/// The enabled targets and exclusions of a scope configuration, compiled
/// once and reused for every asset.
#[derive(Debug, Clone, Default)]
pub struct ActiveScope {
    tenant_id: Option<TenantId>,
    targets: Vec<CompiledRule>,
    exclusions: Vec<CompiledRule>,
    rejected: Vec<RejectedRule>,
}

impl ActiveScope {
    /// Keeps enabled rules and compiles them; malformed rules are set aside
    pub fn from_config(config: ScopeConfig) -> Self {
        let mut rejected = Vec::new();
        let targets = compile_rules(config.targets, &mut rejected);
        let exclusions = compile_rules(config.exclusions, &mut rejected);

        Self {
            tenant_id: config.tenant_id,
            targets,
            exclusions,
            rejected,
        }
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    pub fn targets(&self) -> impl Iterator<Item = &ScopeRule> {
        self.targets.iter().map(|compiled| &compiled.rule)
    }

    pub fn exclusions(&self) -> impl Iterator<Item = &ScopeRule> {
        self.exclusions.iter().map(|compiled| &compiled.rule)
    }

    /// Enabled rules that were dropped because their pattern is malformed
    pub fn rejected(&self) -> &[RejectedRule] {
        &self.rejected
    }

    /// No usable target: nothing can be in scope
    pub fn has_targets(&self) -> bool {
        !self.targets.is_empty()
    }

    pub fn match_asset(&self, asset: &Asset) -> ScopeMatchResult {
        let matching = |rules: &[CompiledRule]| -> Vec<ScopeRule> {
            rules
                .iter()
                .filter(|compiled| compiled.pattern.matches(asset))
                .map(|compiled| compiled.rule.clone())
                .collect()
        };

        ScopeMatchResult::from_matches(matching(&self.targets), matching(&self.exclusions))
    }

    pub fn coverage(&self, assets: &[Asset]) -> CoverageSummary {
        summarize(assets, self)
    }
}

impl ScopeEvaluator for ActiveScope {
    fn evaluate(&self, asset: &Asset) -> ScopeMatchResult {
        self.match_asset(asset)
    }
}

fn compile_rules(rules: Vec<ScopeRule>, rejected: &mut Vec<RejectedRule>) -> Vec<CompiledRule> {
    let mut compiled = Vec::with_capacity(rules.len());
    for rule in rules.into_iter().filter(|rule| rule.enabled) {
        match rule.compile() {
            Ok(pattern) => compiled.push(CompiledRule { rule, pattern }),
            Err(error) => {
                warn!(
                    "Ignoring malformed scope pattern '{}' ({}): {}",
                    rule.pattern,
                    rule.label(),
                    error
                );
                rejected.push(RejectedRule { rule, error });
            }
        }
    }
    compiled
}
