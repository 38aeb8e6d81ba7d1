// SPDX-License-Identifier: GPL-3.0-or-later
use cinegrade_domain::{MediaType, SizeContext, SizeLimits};
use serde::{Deserialize, Serialize};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const BYTES_PER_GB: f64 = BYTES_PER_MB * 1024.0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeVerdict {
    pub rejected: bool,
    pub reason: Option<String>,
}

impl SizeVerdict {
    fn accepted() -> Self {
        Self::default()
    }

    fn rejected(reason: String) -> Self {
        Self {
            rejected: true,
            reason: Some(reason),
        }
    }
}

/// Check a release size against the profile's bounds for its media type.
///
/// Movies are measured in GB, episodes in MB. Season packs are measured per
/// episode and skipped entirely when the episode count is unknown or zero.
pub fn validate_size(size_bytes: u64, context: &SizeContext, limits: &SizeLimits) -> SizeVerdict {
    match context.media_type {
        MediaType::Movie => {
            let gb = size_bytes as f64 / BYTES_PER_GB;
            check_bounds(gb, "GB", "movie", "", limits.movie_min_gb, limits.movie_max_gb)
        }
        MediaType::Tv => {
            let total_mb = size_bytes as f64 / BYTES_PER_MB;
            if context.is_season_pack {
                match context.episode_count {
                    Some(count) if count > 0 => check_bounds(
                        total_mb / f64::from(count),
                        "MB",
                        "episode",
                        " per episode (avg)",
                        limits.episode_min_mb,
                        limits.episode_max_mb,
                    ),
                    _ => SizeVerdict::accepted(),
                }
            } else {
                check_bounds(
                    total_mb,
                    "MB",
                    "episode",
                    "",
                    limits.episode_min_mb,
                    limits.episode_max_mb,
                )
            }
        }
    }
}

fn check_bounds(
    value: f64,
    unit: &str,
    kind: &str,
    qualifier: &str,
    min: Option<f64>,
    max: Option<f64>,
) -> SizeVerdict {
    if let Some(min) = min {
        if value < min {
            return SizeVerdict::rejected(format!(
                "Size {value:.2} {unit}{qualifier} is below {kind} minimum of {min} {unit}"
            ));
        }
    }
    if let Some(max) = max {
        if value > max {
            return SizeVerdict::rejected(format!(
                "Size {value:.2} {unit}{qualifier} exceeds {kind} maximum of {max} {unit}"
            ));
        }
    }
    SizeVerdict::accepted()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;
    const GB: u64 = 1024 * MB;

    fn limits() -> SizeLimits {
        SizeLimits {
            movie_min_gb: Some(1.0),
            movie_max_gb: Some(20.0),
            episode_min_mb: Some(100.0),
            episode_max_mb: Some(3000.0),
        }
    }

    #[test]
    fn small_episode_is_rejected_with_values() {
        let verdict = validate_size(50 * MB, &SizeContext::episode(), &limits());
        assert!(verdict.rejected);
        assert_eq!(
            verdict.reason.as_deref(),
            Some("Size 50.00 MB is below episode minimum of 100 MB")
        );
    }

    #[test]
    fn oversized_movie_is_rejected_in_gb() {
        let verdict = validate_size(25 * GB, &SizeContext::movie(), &limits());
        assert!(verdict.rejected);
        assert_eq!(
            verdict.reason.as_deref(),
            Some("Size 25.00 GB exceeds movie maximum of 20 GB")
        );
    }

    #[test]
    fn movie_within_bounds_passes() {
        let verdict = validate_size(8 * GB, &SizeContext::movie(), &limits());
        assert_eq!(verdict, SizeVerdict::default());
    }

    #[test]
    fn season_pack_is_averaged_per_episode() {
        let ok = validate_size(10 * 500 * MB, &SizeContext::season_pack(Some(10)), &limits());
        assert!(!ok.rejected);

        let small = validate_size(10 * 50 * MB, &SizeContext::season_pack(Some(10)), &limits());
        assert!(small.rejected);
        assert_eq!(
            small.reason.as_deref(),
            Some("Size 50.00 MB per episode (avg) is below episode minimum of 100 MB")
        );
    }

    #[test]
    fn season_pack_without_episode_count_is_skipped() {
        for context in [SizeContext::season_pack(None), SizeContext::season_pack(Some(0))] {
            assert!(!validate_size(1, &context, &limits()).rejected);
            assert!(!validate_size(u64::MAX, &context, &limits()).rejected);
        }
    }

    #[test]
    fn absent_bounds_do_not_constrain() {
        let open = SizeLimits {
            movie_min_gb: None,
            movie_max_gb: Some(10.0),
            ..SizeLimits::default()
        };
        assert!(!validate_size(0, &SizeContext::movie(), &open).rejected);
        assert!(!validate_size(u64::MAX, &SizeContext::episode(), &open).rejected);
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(!validate_size(100 * MB, &SizeContext::episode(), &limits()).rejected);
        assert!(!validate_size(20 * GB, &SizeContext::movie(), &limits()).rejected);
    }
}
