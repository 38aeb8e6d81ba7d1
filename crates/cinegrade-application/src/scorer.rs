// SPDX-License-Identifier: GPL-3.0-or-later
use std::collections::BTreeMap;
use std::sync::Arc;

use cinegrade_domain::{
    CategoryBreakdown, FormatCategory, ReleaseAttributes, ScoredFormat, ScoringProfile,
    ScoringResult, SizeContext, TotalScore,
};
use cinegrade_formats::FormatCatalog;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::exclusivity::resolve_exclusivity;
use crate::matcher::{evaluate_catalog, match_catalog, FormatMatch};
use crate::patterns::PatternCache;
use crate::release_parsing::{ReleaseParser, SceneNameParser};
use crate::size::validate_size;

/// Lists shorter than this are ranked on the calling thread.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

/// One release to score: its name plus whatever the caller already knows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReleaseCandidate {
    pub name: String,
    /// Pre-parsed attributes; the engine's parser runs when absent.
    #[serde(default)]
    pub attributes: Option<ReleaseAttributes>,
    #[serde(default)]
    pub file_size_bytes: Option<u64>,
    #[serde(default)]
    pub size_context: Option<SizeContext>,
}

impl ReleaseCandidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attributes(mut self, attributes: ReleaseAttributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn with_size(mut self, size_bytes: u64, context: SizeContext) -> Self {
        self.file_size_bytes = Some(size_bytes);
        self.size_context = Some(context);
        self
    }
}

impl From<&str> for ReleaseCandidate {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ReleaseCandidate {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Scores releases against profiles using a shared, read-only catalog.
///
/// The engine holds no per-call state; a single instance can serve any
/// number of profiles from any number of threads.
#[derive(Clone)]
pub struct ScoringEngine {
    catalog: Arc<FormatCatalog>,
    parser: Arc<dyn ReleaseParser>,
    patterns: PatternCache,
    parallel_threshold: usize,
}

impl ScoringEngine {
    pub fn new(catalog: Arc<FormatCatalog>) -> Self {
        Self {
            catalog,
            parser: Arc::new(SceneNameParser),
            patterns: PatternCache::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    pub fn with_parser(mut self, parser: Arc<dyn ReleaseParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_pattern_cache(mut self, patterns: PatternCache) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    pub fn catalog(&self) -> &FormatCatalog {
        &self.catalog
    }

    pub fn patterns(&self) -> &PatternCache {
        &self.patterns
    }

    pub(crate) fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn parse(&self, name: &str) -> ReleaseAttributes {
        self.parser.parse(name)
    }

    /// Score a bare release name.
    pub fn score(&self, name: &str, profile: &ScoringProfile) -> ScoringResult {
        self.score_candidate(&ReleaseCandidate::new(name), profile)
    }

    pub fn score_candidate(
        &self,
        candidate: &ReleaseCandidate,
        profile: &ScoringProfile,
    ) -> ScoringResult {
        let attributes = self.attributes_for(&candidate.name, candidate.attributes.as_ref());

        let matched = match_catalog(&self.catalog, &attributes, &self.patterns);
        let resolved = resolve_exclusivity(matched, self.catalog.exclusivity());

        let formats: Vec<ScoredFormat> = resolved
            .into_iter()
            .map(|format| ScoredFormat {
                id: format.id.clone(),
                name: format.name.clone(),
                category: format.category,
                weight: profile.weight_for(format),
            })
            .collect();

        let sum: i64 = formats.iter().map(|format| i64::from(format.weight)).sum();
        let banned_reasons: Vec<String> = formats
            .iter()
            .filter(|format| format.bans())
            .map(|format| format.name.clone())
            .collect();
        let is_banned = !banned_reasons.is_empty();

        let size = match (candidate.file_size_bytes, candidate.size_context.as_ref()) {
            (Some(bytes), Some(context)) => validate_size(bytes, context, &profile.size_limits),
            _ => Default::default(),
        };

        let total_score = if is_banned {
            TotalScore::Banned
        } else {
            TotalScore::Points(sum)
        };
        let meets_minimum = !is_banned && !size.rejected && sum >= profile.min_score;

        debug!(
            target: "scoring",
            release = %candidate.name,
            profile = %profile.id,
            score = %total_score,
            formats = formats.len(),
            banned = is_banned,
            size_rejected = size.rejected,
            "release scored"
        );

        ScoringResult {
            release_name: candidate.name.clone(),
            profile_name: profile.name.clone(),
            total_score,
            breakdown: breakdown(&formats),
            formats,
            meets_minimum,
            is_banned,
            banned_reasons,
            size_rejected: size.rejected,
            size_rejection_reason: size.reason,
            attributes,
        }
    }

    /// Ids of the formats that would be scored for this release, after
    /// exclusivity resolution and in catalog order.
    pub fn matched_rule_ids(
        &self,
        name: &str,
        attributes: Option<&ReleaseAttributes>,
    ) -> Vec<String> {
        let attributes = self.attributes_for(name, attributes);
        let matched = match_catalog(&self.catalog, &attributes, &self.patterns);
        resolve_exclusivity(matched, self.catalog.exclusivity())
            .into_iter()
            .map(|format| format.id.clone())
            .collect()
    }

    /// Per-condition match details for every catalog format.
    pub fn inspect<'a>(&'a self, attributes: &ReleaseAttributes) -> Vec<FormatMatch<'a>> {
        evaluate_catalog(&self.catalog, attributes, &self.patterns)
    }

    fn attributes_for(&self, name: &str, supplied: Option<&ReleaseAttributes>) -> ReleaseAttributes {
        match supplied {
            Some(attributes) => attributes.clone(),
            None => self.parser.parse(name),
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(Arc::new(FormatCatalog::builtin()))
    }
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("formats", &self.catalog.len())
            .field("patterns", &self.patterns)
            .field("parallel_threshold", &self.parallel_threshold)
            .finish()
    }
}

fn breakdown(formats: &[ScoredFormat]) -> BTreeMap<FormatCategory, CategoryBreakdown> {
    let mut breakdown: BTreeMap<FormatCategory, CategoryBreakdown> = BTreeMap::new();
    for format in formats.iter().filter(|format| format.weight != 0) {
        let entry = breakdown.entry(format.category).or_default();
        entry.subtotal += i64::from(format.weight);
        entry.formats.push(format.name.clone());
    }
    breakdown
}
