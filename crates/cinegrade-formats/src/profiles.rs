// SPDX-License-Identifier: GPL-3.0-or-later

//! Built-in scoring profiles, one per quality philosophy.

use cinegrade_domain::{ReleaseProtocol, ScoringProfile, SizeLimits};

use crate::builtin::ids::*;

pub const MAXIMUM_QUALITY: &str = "maximum-quality";
pub const BALANCED_1080P: &str = "balanced-1080p";
pub const EFFICIENT: &str = "efficient";
pub const DEFAULTS: &str = "defaults";

/// Remuxes and lossless audio first; micro-encodes and re-encodes are buried.
pub fn maximum_quality() -> ScoringProfile {
    let mut profile = ScoringProfile::new(MAXIMUM_QUALITY, "Maximum Quality");
    profile.min_score = 0;
    profile.upgrade_until = 10_000;
    profile.min_upgrade_delta = 100;
    profile
        .with_weight(RES_2160P, 1000)
        .with_weight(RES_1080P, 300)
        .with_weight(RES_720P, -500)
        .with_weight(RES_576P, -2000)
        .with_weight(RES_480P, -2000)
        .with_weight(RES_UNKNOWN, -1000)
        .with_weight(SRC_REMUX, 2500)
        .with_weight(SRC_BLURAY, 1200)
        .with_weight(SRC_WEBDL, 800)
        .with_weight(SRC_WEBRIP, 400)
        .with_weight(SRC_HDTV, -500)
        .with_weight(SRC_DVD, -1000)
        .with_weight(CODEC_XVID, -10_000)
        .with_weight(CODEC_MPEG2, -1000)
        .with_weight(CODEC_X265_HD, -10_000)
        .with_weight(HDR_DV_HDR10PLUS, 1600)
        .with_weight(HDR_DV_HDR10, 1500)
        .with_weight(HDR_DV, 1000)
        .with_weight(HDR_HDR10PLUS, 1400)
        .with_weight(HDR_HDR10, 1300)
        .with_weight(HDR_GENERIC, 1000)
        .with_weight(HDR_HLG, 500)
        .with_weight(AUDIO_TRUEHD_ATMOS, 800)
        .with_weight(AUDIO_DTS_X, 750)
        .with_weight(AUDIO_TRUEHD, 700)
        .with_weight(AUDIO_DTS_HD_MA, 650)
        .with_weight(AUDIO_FLAC, 600)
        .with_weight(AUDIO_PCM, 600)
        .with_weight(AUDIO_MP3, -500)
        .with_weight(TIER_LQ, -10_000)
        .with_weight(TIER_NO_GROUP, -10_000)
        .with_weight(ENH_DV_NO_FALLBACK, -10_000)
        .with_weight(ENH_IMAX_ENHANCED, 800)
        .with_weight(ENH_HYBRID, 100)
}

/// 1080p WEB and BluRay encodes at sane sizes; 4K and remuxes are not wanted.
pub fn balanced_1080p() -> ScoringProfile {
    let mut profile = ScoringProfile::new(BALANCED_1080P, "Balanced 1080p");
    profile.min_score = 500;
    profile.upgrade_until = 4000;
    profile.min_upgrade_delta = 50;
    profile.size_limits = SizeLimits {
        movie_min_gb: Some(1.0),
        movie_max_gb: Some(20.0),
        episode_min_mb: Some(100.0),
        episode_max_mb: Some(3000.0),
    };
    profile
        .with_weight(RES_2160P, -10_000)
        .with_weight(RES_1080P, 1000)
        .with_weight(RES_720P, 200)
        .with_weight(RES_480P, -1000)
        .with_weight(SRC_REMUX, -10_000)
        .with_weight(SRC_BLURAY, 800)
        .with_weight(SRC_WEBDL, 700)
        .with_weight(SRC_WEBRIP, 500)
        .with_weight(CODEC_XVID, -10_000)
        .with_weight(TIER_LQ, -10_000)
        .with_weight(ENH_3D, -10_000)
}

/// Small HEVC/AV1 encodes for constrained storage.
pub fn efficient() -> ScoringProfile {
    let mut profile = ScoringProfile::new(EFFICIENT, "Efficient");
    profile.min_score = 0;
    profile.upgrade_until = 2500;
    profile.min_upgrade_delta = 25;
    profile.protocols = vec![ReleaseProtocol::Usenet];
    profile.size_limits = SizeLimits {
        movie_min_gb: None,
        movie_max_gb: Some(10.0),
        episode_min_mb: None,
        episode_max_mb: Some(1500.0),
    };
    profile
        .with_weight(CODEC_X265, 1000)
        .with_weight(CODEC_X265_HD, 0)
        .with_weight(CODEC_AV1, 800)
        .with_weight(CODEC_X264, 200)
        .with_weight(SRC_REMUX, -10_000)
        .with_weight(AUDIO_TRUEHD_ATMOS, -200)
        .with_weight(AUDIO_TRUEHD, -200)
        .with_weight(AUDIO_DTS_HD_MA, -200)
        .with_weight(AUDIO_OPUS, 200)
        .with_weight(AUDIO_AAC, 150)
}

/// No overrides: every format scores its catalog default.
pub fn defaults() -> ScoringProfile {
    ScoringProfile::new(DEFAULTS, "Defaults")
}

pub fn builtin() -> Vec<ScoringProfile> {
    vec![maximum_quality(), balanced_1080p(), efficient(), defaults()]
}

/// Look up a built-in profile by id, case-insensitively.
pub fn find(id: &str) -> Option<ScoringProfile> {
    builtin()
        .into_iter()
        .find(|profile| profile.id.eq_ignore_ascii_case(id))
}
