// SPDX-License-Identifier: GPL-3.0-or-later
//! Decisions built on top of single-release scoring: pairwise comparison,
//! ranking, acceptability filtering and upgrade checks.

use std::cmp::{Ordering, Reverse};

use cinegrade_domain::{ScoreDelta, ScoringProfile, ScoringResult, TotalScore};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::scorer::{ReleaseCandidate, ScoringEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    A,
    B,
    Tie,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub winner: Winner,
    pub score_a: ScoringResult,
    pub score_b: ScoringResult,
    /// Score of `a` minus score of `b`.
    pub delta: ScoreDelta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRelease {
    /// 1-based position after sorting.
    pub rank: usize,
    #[serde(flatten)]
    pub result: ScoringResult,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeOptions {
    pub minimum_improvement: i64,
    /// Accept an equal score as an upgrade.
    pub allow_sidegrade: bool,
    /// Never upgrade a release already at or above the profile cutoff.
    pub respect_cutoff: bool,
}

impl UpgradeOptions {
    /// Options carrying the profile's own upgrade delta and cutoff.
    pub fn from_profile(profile: &ScoringProfile) -> Self {
        Self {
            minimum_improvement: profile.min_upgrade_delta,
            allow_sidegrade: false,
            respect_cutoff: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeDecision {
    pub is_upgrade: bool,
    /// Candidate score minus existing score.
    pub improvement: ScoreDelta,
    pub existing: ScoringResult,
    pub candidate: ScoringResult,
    pub reason: String,
}

/// Whether `result` already satisfies the profile's upgrade cutoff.
pub fn cutoff_met(result: &ScoringResult, profile: &ScoringProfile) -> bool {
    match result.total_score {
        TotalScore::Points(points) => points >= profile.upgrade_until,
        TotalScore::Banned => false,
    }
}

impl ScoringEngine {
    pub fn compare(
        &self,
        a: &ReleaseCandidate,
        b: &ReleaseCandidate,
        profile: &ScoringProfile,
    ) -> Comparison {
        let score_a = self.score_candidate(a, profile);
        let score_b = self.score_candidate(b, profile);

        let winner = match score_a.total_score.cmp(&score_b.total_score) {
            Ordering::Greater => Winner::A,
            Ordering::Less => Winner::B,
            Ordering::Equal => Winner::Tie,
        };
        let delta = score_a.total_score.delta(score_b.total_score);

        Comparison {
            winner,
            score_a,
            score_b,
            delta,
        }
    }

    /// Score and order `candidates`, best first.
    ///
    /// Banned and size-rejected releases always follow every acceptable one.
    /// Within each group scores descend, and equal scores keep input order.
    pub fn rank(
        &self,
        candidates: &[ReleaseCandidate],
        profile: &ScoringProfile,
    ) -> Vec<RankedRelease> {
        let mut results = self.score_all(candidates, profile);
        results.sort_by_key(|result| (result.is_rejected(), Reverse(result.total_score)));

        let ranked: Vec<RankedRelease> = results
            .into_iter()
            .enumerate()
            .map(|(index, result)| RankedRelease {
                rank: index + 1,
                result,
            })
            .collect();

        info!(
            target: "scoring",
            profile = %profile.id,
            releases = ranked.len(),
            rejected = ranked.iter().filter(|r| r.result.is_rejected()).count(),
            "releases ranked"
        );
        ranked
    }

    /// Scores of the candidates that meet the minimum and are neither banned
    /// nor size-rejected, in input order.
    pub fn filter_acceptable(
        &self,
        candidates: &[ReleaseCandidate],
        profile: &ScoringProfile,
    ) -> Vec<ScoringResult> {
        self.score_all(candidates, profile)
            .into_iter()
            .filter(|result| result.meets_minimum && !result.is_rejected())
            .collect()
    }

    pub fn is_upgrade(
        &self,
        existing: &ReleaseCandidate,
        candidate: &ReleaseCandidate,
        profile: &ScoringProfile,
        options: &UpgradeOptions,
    ) -> UpgradeDecision {
        let existing = self.score_candidate(existing, profile);
        let candidate = self.score_candidate(candidate, profile);
        let improvement = candidate.total_score.delta(existing.total_score);

        let (is_upgrade, reason) = decide_upgrade(&existing, &candidate, improvement, profile, options);

        debug!(
            target: "scoring",
            existing = %existing.release_name,
            candidate = %candidate.release_name,
            improvement = %improvement,
            is_upgrade,
            reason = %reason,
            "upgrade evaluated"
        );

        UpgradeDecision {
            is_upgrade,
            improvement,
            existing,
            candidate,
            reason,
        }
    }

    fn score_all(
        &self,
        candidates: &[ReleaseCandidate],
        profile: &ScoringProfile,
    ) -> Vec<ScoringResult> {
        if candidates.len() >= self.parallel_threshold() {
            candidates
                .par_iter()
                .map(|candidate| self.score_candidate(candidate, profile))
                .collect()
        } else {
            candidates
                .iter()
                .map(|candidate| self.score_candidate(candidate, profile))
                .collect()
        }
    }
}

fn decide_upgrade(
    existing: &ScoringResult,
    candidate: &ScoringResult,
    improvement: ScoreDelta,
    profile: &ScoringProfile,
    options: &UpgradeOptions,
) -> (bool, String) {
    if candidate.is_banned {
        return (false, "candidate is banned".to_string());
    }
    if candidate.size_rejected {
        return (false, "candidate is outside the size limits".to_string());
    }
    if !candidate.meets_minimum {
        return (
            false,
            format!(
                "candidate score {} is below the minimum of {}",
                candidate.total_score, profile.min_score
            ),
        );
    }
    if options.respect_cutoff && cutoff_met(existing, profile) {
        return (
            false,
            format!(
                "existing score {} already meets the cutoff of {}",
                existing.total_score, profile.upgrade_until
            ),
        );
    }

    match improvement {
        ScoreDelta::PositiveInfinity => (true, "existing release is banned".to_string()),
        ScoreDelta::Points(points) => {
            let threshold = options.minimum_improvement;
            let accepted = if options.allow_sidegrade {
                points >= threshold
            } else {
                points > threshold
            };
            let reason = if accepted {
                format!("improves the score by {points:+}")
            } else if options.allow_sidegrade {
                format!("improvement of {points:+} is below the required {threshold}")
            } else {
                format!("improvement of {points:+} does not exceed the required {threshold}")
            };
            (accepted, reason)
        }
        // Unreachable once the candidate is known not to be banned.
        ScoreDelta::NegativeInfinity | ScoreDelta::Indeterminate => {
            (false, "candidate is banned".to_string())
        }
    }
}
