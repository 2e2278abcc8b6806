//! Compiled-pattern cache
//!
//! Scope rules are re-evaluated on every render pass; compiling a glob
//! into a regex each time is the dominant cost. The cache keys compiled
//! patterns by `(kind, pattern)` so edits to a rule naturally miss.

use std::sync::Arc;
use dashmap::DashMap;
use tracing::warn;

use crate::pattern::{CompiledPattern, PatternError, PatternKind};
use crate::rule::ScopeRule;

/// Default upper bound on cached patterns
const DEFAULT_MAX_ENTRIES: usize = 10_000;

type CacheKey = (PatternKind, String);
type CachedPattern = Result<Arc<CompiledPattern>, PatternError>;

/// Statistics about cache performance
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
    /// Number of cached compile failures served
    pub failures: usize,
    /// Total number of entries in cache
    pub entries: usize,
}

impl CacheStats {
    /// Calculates the cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe cache of compiled scope patterns.
///
/// Compile failures are cached as well, so a malformed rule costs one
/// compile attempt rather than one per asset.
pub struct PatternCache {
    /// Compiled patterns (or their compile error)
    entries: Arc<DashMap<CacheKey, CachedPattern>>,
    /// Entry bound; the cache is flushed when it is reached
    max_entries: usize,
    /// Cache statistics
    stats: Arc<DashMap<&'static str, usize>>,
}

impl PatternCache {
    /// Creates a new cache with the default bound
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    /// Creates a new cache holding at most `max_entries` patterns
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            max_entries: max_entries.max(1),
            stats: Arc::new(DashMap::new()),
        }
    }

    /// Returns the compiled pattern for `rule`, compiling on first use
    pub fn get_or_compile(&self, rule: &ScopeRule) -> CachedPattern {
        let key = (rule.kind, rule.pattern.trim().to_string());

        if let Some(entry) = self.entries.get(&key) {
            self.increment_stat("hits");
            if entry.is_err() {
                self.increment_stat("failures");
            }
            return entry.value().clone();
        }
        self.increment_stat("misses");

        let compiled = rule.compile().map(Arc::new);
        if let Err(e) = &compiled {
            warn!(
                "Ignoring malformed scope pattern '{}' ({}): {}",
                rule.pattern,
                rule.label(),
                e
            );
        }

        if self.entries.len() >= self.max_entries {
            self.entries.clear();
        }
        self.entries.insert(key, compiled.clone());

        compiled
    }

    /// Clears the cache
    pub fn clear(&self) {
        self.entries.clear();
        self.stats.clear();
    }

    /// Returns cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.get_stat("hits"),
            misses: self.get_stat("misses"),
            failures: self.get_stat("failures"),
            entries: self.entries.len(),
        }
    }

    /// Number of cached patterns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn increment_stat(&self, key: &'static str) {
        self.stats
            .entry(key)
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }

    fn get_stat(&self, key: &'static str) -> usize {
        self.stats.get(key).map(|v| *v).unwrap_or(0)
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_once() {
        let cache = PatternCache::new();
        let rule = ScopeRule::new("*.example.com");

        let first = cache.get_or_compile(&rule).unwrap();
        let second = cache.get_or_compile(&rule).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_kind_is_part_of_key() {
        let cache = PatternCache::new();
        cache.get_or_compile(&ScopeRule::new("example.com")).unwrap();
        cache
            .get_or_compile(&ScopeRule::new("example.com").with_kind(PatternKind::DomainSuffix))
            .unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_failures_are_cached() {
        let cache = PatternCache::new();
        let rule = ScopeRule::new("10.0.0.0/99");

        assert!(cache.get_or_compile(&rule).is_err());
        assert!(cache.get_or_compile(&rule).is_err());

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.failures, 1);
    }

    #[test]
    fn test_bound_flushes() {
        let cache = PatternCache::with_max_entries(2);
        cache.get_or_compile(&ScopeRule::new("a")).unwrap();
        cache.get_or_compile(&ScopeRule::new("b")).unwrap();
        cache.get_or_compile(&ScopeRule::new("c")).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = PatternCache::new();
        cache.get_or_compile(&ScopeRule::new("a")).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 0);
    }

    #[test]
    fn test_concurrent_access() {
        use std::thread;

        let cache = Arc::new(PatternCache::new());
        let mut handles = vec![];

        for i in 0..10 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                let rule = ScopeRule::new(format!("host-{}.example.com", i % 2));
                cache.get_or_compile(&rule).is_ok()
            }));
        }

        for handle in handles {
            assert!(handle.join().unwrap());
        }

        let stats = cache.stats();
        assert_eq!(stats.hits + stats.misses, 10);
        assert_eq!(stats.entries, 2);
    }
}
