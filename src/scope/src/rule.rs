//! Scope targets and exclusions

use crate::pattern::{CompiledPattern, PatternError, PatternKind};
use serde::{Deserialize, Serialize};

/// A single scope rule: a pattern plus an enabled flag.
///
/// Targets and exclusions share this shape; an exclusion overrides any
/// target match for the same asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeRule {
    /// Rule identifier (falls back to the pattern text when empty)
    #[serde(default)]
    pub id: String,

    /// Pattern text, interpreted per `kind`
    pub pattern: String,

    #[serde(default)]
    pub kind: PatternKind,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Pattern defining what is in scope
pub type ScopeTarget = ScopeRule;

/// Pattern removing assets from scope
pub type ScopeExclusion = ScopeRule;

impl ScopeRule {
    /// Create an enabled rule whose kind is inferred from the pattern
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        Self {
            id: pattern.clone(),
            pattern,
            kind: PatternKind::Auto,
            enabled: true,
            description: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_kind(mut self, kind: PatternKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Identifier used in logs and explanations
    pub fn label(&self) -> &str {
        if self.id.is_empty() {
            &self.pattern
        } else {
            &self.id
        }
    }

    /// Concrete kind after inference
    pub fn effective_kind(&self) -> PatternKind {
        self.kind.resolve(&self.pattern)
    }

    pub fn compile(&self) -> Result<CompiledPattern, PatternError> {
        CompiledPattern::compile(&self.pattern, self.kind)
    }
}
