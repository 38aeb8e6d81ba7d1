// SPDX-License-Identifier: GPL-3.0-or-later
use std::sync::Arc;

use moka::sync::Cache;
use regex::{Regex, RegexBuilder};
use tracing::warn;

const DEFAULT_CAPACITY: u64 = 10_000;

/// A condition pattern after compilation. Patterns that fail to compile are
/// replaced by `Never` so one bad rule cannot break evaluation.
#[derive(Debug)]
pub enum CompiledPattern {
    Regex(Regex),
    Never,
}

impl CompiledPattern {
    pub fn compile(pattern: &str) -> Self {
        match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => Self::Regex(regex),
            Err(err) => {
                warn!(
                    target: "matching",
                    pattern = pattern,
                    error = %err,
                    "invalid condition pattern; it will never match"
                );
                Self::Never
            }
        }
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        match self {
            Self::Regex(regex) => regex.is_match(haystack),
            Self::Never => false,
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Self::Never)
    }
}

/// Shared, bounded cache of compiled condition patterns keyed by pattern text.
///
/// Cloning is cheap and every clone sees the same entries. A miss recompiles
/// the identical pattern, so the cache never changes evaluation results.
#[derive(Clone)]
pub struct PatternCache {
    cache: Cache<String, Arc<CompiledPattern>>,
}

impl PatternCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            cache: Cache::new(capacity.max(1)),
        }
    }

    pub fn get(&self, pattern: &str) -> Arc<CompiledPattern> {
        if let Some(cached) = self.cache.get(pattern) {
            return cached;
        }

        let compiled = Arc::new(CompiledPattern::compile(pattern));
        self.cache.insert(pattern.to_string(), compiled.clone());
        compiled
    }

    pub fn is_match(&self, pattern: &str, haystack: &str) -> bool {
        self.get(pattern).is_match(haystack)
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.cache.contains_key(pattern)
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl std::fmt::Debug for PatternCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCache")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}
