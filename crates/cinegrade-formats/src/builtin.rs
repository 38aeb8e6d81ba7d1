// SPDX-License-Identifier: GPL-3.0-or-later

//! The built-in custom-format catalog.
//!
//! Every classification is data: a [`CustomFormat`] assembled from a small set
//! of condition builders. Adding a format means adding a row here (or to a
//! JSON catalog), never touching the matcher or scorer.

use cinegrade_domain::{
    AudioCodec, ConditionKind, CustomFormat, FormatCategory, FormatCondition, HdrFormat,
    ReleaseFlag, Resolution, Source, VideoCodec, BAN_THRESHOLD,
};

/// Ids referenced outside the catalog (priority tables, profiles, tests).
pub mod ids {
    pub const RES_2160P: &str = "res-2160p";
    pub const RES_1080P: &str = "res-1080p";
    pub const RES_720P: &str = "res-720p";
    pub const RES_576P: &str = "res-576p";
    pub const RES_480P: &str = "res-480p";
    pub const RES_UNKNOWN: &str = "res-unknown";

    pub const SRC_REMUX: &str = "src-remux";
    pub const SRC_BLURAY: &str = "src-bluray";
    pub const SRC_WEBDL: &str = "src-webdl";
    pub const SRC_WEBRIP: &str = "src-webrip";
    pub const SRC_HDTV: &str = "src-hdtv";
    pub const SRC_DVD: &str = "src-dvd";

    pub const CODEC_X265: &str = "codec-x265";
    pub const CODEC_X265_HD: &str = "codec-x265-hd";
    pub const CODEC_X264: &str = "codec-x264";
    pub const CODEC_AV1: &str = "codec-av1";
    pub const CODEC_VP9: &str = "codec-vp9";
    pub const CODEC_XVID: &str = "codec-xvid";
    pub const CODEC_MPEG2: &str = "codec-mpeg2";

    pub const AUDIO_TRUEHD_ATMOS: &str = "audio-truehd-atmos";
    pub const AUDIO_DTS_X: &str = "audio-dts-x";
    pub const AUDIO_TRUEHD: &str = "audio-truehd";
    pub const AUDIO_DTS_HD_MA: &str = "audio-dts-hd-ma";
    pub const AUDIO_FLAC: &str = "audio-flac";
    pub const AUDIO_PCM: &str = "audio-pcm";
    pub const AUDIO_DDPLUS_ATMOS: &str = "audio-ddplus-atmos";
    pub const AUDIO_DDPLUS: &str = "audio-ddplus";
    pub const AUDIO_DTS: &str = "audio-dts";
    pub const AUDIO_DD: &str = "audio-dd";
    pub const AUDIO_AAC: &str = "audio-aac";
    pub const AUDIO_OPUS: &str = "audio-opus";
    pub const AUDIO_MP3: &str = "audio-mp3";

    pub const HDR_DV_HDR10PLUS: &str = "hdr-dv-hdr10plus";
    pub const HDR_DV_HDR10: &str = "hdr-dv-hdr10";
    pub const HDR_DV: &str = "hdr-dv";
    pub const HDR_HDR10PLUS: &str = "hdr-hdr10plus";
    pub const HDR_HDR10: &str = "hdr-hdr10";
    pub const HDR_GENERIC: &str = "hdr-generic";
    pub const HDR_HLG: &str = "hdr-hlg";
    pub const HDR_PQ: &str = "hdr-pq";

    pub const TIER_REMUX_1: &str = "tier-remux-01";
    pub const TIER_REMUX_2: &str = "tier-remux-02";
    pub const TIER_UHD_BLURAY_1: &str = "tier-uhd-bluray-01";
    pub const TIER_UHD_BLURAY_2: &str = "tier-uhd-bluray-02";
    pub const TIER_HD_BLURAY_1: &str = "tier-hd-bluray-01";
    pub const TIER_HD_BLURAY_2: &str = "tier-hd-bluray-02";
    pub const TIER_WEB_1: &str = "tier-web-01";
    pub const TIER_WEB_2: &str = "tier-web-02";
    pub const TIER_WEB_3: &str = "tier-web-03";
    pub const TIER_LQ: &str = "tier-lq";
    pub const TIER_NO_GROUP: &str = "tier-no-group";

    pub const BANNED_FAKE_HDR: &str = "banned-fake-hdr";
    pub const BANNED_CAM: &str = "banned-cam";
    pub const BANNED_TELESYNC: &str = "banned-telesync";
    pub const BANNED_TELECINE: &str = "banned-telecine";
    pub const BANNED_SCREENER: &str = "banned-screener";
    pub const BANNED_UPSCALED: &str = "banned-upscaled";
    pub const BANNED_HARDCODED_SUBS: &str = "banned-hardcoded-subs";
    pub const BANNED_LINE_DUBBED: &str = "banned-line-dubbed";
    pub const BANNED_OBFUSCATED: &str = "banned-obfuscated";
    pub const BANNED_RETAGS: &str = "banned-retags";
    pub const BANNED_SAMPLE: &str = "banned-sample";

    pub const ENH_REPACK: &str = "enh-repack";
    pub const ENH_PROPER: &str = "enh-proper";
    pub const ENH_REPACK2: &str = "enh-repack2";
    pub const ENH_IMAX_ENHANCED: &str = "enh-imax-enhanced";
    pub const ENH_IMAX: &str = "enh-imax";
    pub const ENH_HYBRID: &str = "enh-hybrid";
    pub const ENH_REMASTER: &str = "enh-remaster";
    pub const ENH_CRITERION: &str = "enh-criterion";
    pub const ENH_OPEN_MATTE: &str = "enh-open-matte";
    pub const ENH_DIRECTORS_CUT: &str = "enh-directors-cut";
    pub const ENH_EXTENDED: &str = "enh-extended";
    pub const ENH_THEATRICAL: &str = "enh-theatrical";
    pub const ENH_UNRATED: &str = "enh-unrated";
    pub const ENH_10BIT: &str = "enh-10bit";
    pub const ENH_HFR: &str = "enh-hfr";
    pub const ENH_3D: &str = "enh-3d";
    pub const ENH_MULTI: &str = "enh-multi";
    pub const ENH_DUAL_AUDIO: &str = "enh-dual-audio";
    pub const ENH_SEASON_PACK: &str = "enh-season-pack";
    pub const ENH_COMPLETE_SERIES: &str = "enh-complete-series";
    pub const ENH_INTERNAL: &str = "enh-internal";
    pub const ENH_EXTRAS: &str = "enh-extras";
    pub const ENH_UHD_BLURAY: &str = "enh-uhd-bluray";
    pub const ENH_DV_NO_FALLBACK: &str = "enh-dv-no-fallback";
}

/// Streaming services as `(tag, display name, default weight)`. Tags are the
/// case-sensitive codes scene releases place before the `WEB` token.
pub const STREAMING_SERVICES: &[(&str, &str, i32)] = &[
    ("AMZN", "Amazon Prime Video", 75),
    ("ATVP", "Apple TV+", 100),
    ("BCORE", "Bravia Core", 100),
    ("CC", "Comedy Central", 25),
    ("CRAV", "Crave", 25),
    ("CRiT", "Criterion Channel", 100),
    ("DSNP", "Disney+", 75),
    ("FOD", "Fuji TV On Demand", 0),
    ("HBO", "HBO", 50),
    ("HMAX", "HBO Max", 75),
    ("HULU", "Hulu", 50),
    ("iP", "BBC iPlayer", 50),
    ("iT", "iTunes", 25),
    ("MA", "Movies Anywhere", 100),
    ("MAX", "Max", 75),
    ("MY5", "Channel 5", 10),
    ("NF", "Netflix", 75),
    ("NLZ", "NLZiet", 25),
    ("PCOK", "Peacock", 50),
    ("PMTP", "Paramount+", 50),
    ("RED", "YouTube Premium", 0),
    ("ROKU", "Roku", 0),
    ("SHO", "Showtime", 25),
    ("STAN", "Stan", 25),
    ("ALL4", "Channel 4", 25),
    ("VDL", "Videoland", 25),
];

/// Release groups per tier as `(id, name, default weight, group patterns)`.
/// Each pattern is anchored and matched against the whole group name.
const GROUP_TIERS: &[(&str, &str, i32, &[&str])] = &[
    (
        ids::TIER_REMUX_1,
        "Remux Tier 01",
        1950,
        &[
            "3L", "BiZKiT", "BLURANiUM", "BMF", "CiNEPHiLES", "FraMeSToR", "PiRaTeS", "PmP",
            "SiCFoI", "SURFINBIRD", "TRiToN", "WiLDCAT", "ZQ", "Flights", "decibeL",
        ],
    ),
    (
        ids::TIER_REMUX_2,
        "Remux Tier 02",
        1900,
        &[
            "ATELiER", "NCmt", "playBD", "SPHD", "12GaugeShotgun", "EPSiLON", "KRaLiMaRKo",
            "PTer", "TDD",
        ],
    ),
    (
        ids::TIER_UHD_BLURAY_1,
        "UHD Bluray Tier 01",
        1800,
        &["CtrlHD", "MainFrame", "DON", "W4NK3R", "HQMUX"],
    ),
    (
        ids::TIER_UHD_BLURAY_2,
        "UHD Bluray Tier 02",
        1750,
        &["HiFi", "ESiR", "WMING", "Kitsune"],
    ),
    (
        ids::TIER_HD_BLURAY_1,
        "HD Bluray Tier 01",
        1800,
        &[
            "BBQ", "c0kE", "Chotab", "CRiSC", "D-Z0N3", "Dariush", "EbP", "EDPH", "Geek",
            "LolHD", "TayTO", "TnP", "VietHD",
        ],
    ),
    (
        ids::TIER_HD_BLURAY_2,
        "HD Bluray Tier 02",
        1750,
        &["EA", "HiDt", "HiSD", "iFT", "QOQ", "SA89", "sbR", "NORDiCHD"],
    ),
    (
        ids::TIER_WEB_1,
        "WEB Tier 01",
        1700,
        &[
            "ABBIE", "AJP69", "APEX", "CMRG", "FLUX", "GNOME", "HONE", "KiNGS", "monkee",
            "NOSiViD", "NTb", "NTG", "RTN", "SiC", "T6D", "TOMMY", "ViSUM",
        ],
    ),
    (
        ids::TIER_WEB_2,
        "WEB Tier 02",
        1650,
        &[
            "3cTWeB", "BLUTONiUM", "BTW", "Cinefeel", "CiT", "Coo7", "dB", "DEEP", "END", "iJP",
            "iKA", "iT00NZ", "JETIX", "KHN", "KiMCHI", "LAZY", "MZABI", "NPMS", "NYH",
            "orbitron", "PHOENiX", "playWEB", "PSiG", "ROCCaT", "RTFM", "SDCC", "SIGMA",
            "SMURF", "SPiRiT", "TEPES", "TVSmash", "WELP",
        ],
    ),
    (
        ids::TIER_WEB_3,
        "WEB Tier 03",
        1600,
        &["DRACULA", "NINJACENTRAL", "SLiGNOME", "SwAgLaDy", "ZoroSenpai", "GRiMM"],
    ),
    (
        ids::TIER_LQ,
        "LQ Groups",
        -10_000,
        &[
            "24xHD", "41RGB", "4K4U", "aXXo", "BRrip", "CDDHD", "CHD", "d3g", "DNL", "EVO",
            "FaNGDiNG0", "FGT", "HDS", "HDT", "iPlanet", "iVy", "KC", "KiNGDOM", "Leffe",
            "LiGaS", "LUCY", "MeGusta", "mHD", "mSD", "MTeam", "NhaNc3", "nHD", "nikt0",
            "PRODJi", "RDN", "SANTi", "STUTTERSHIT", "TERMiNAL", "ViSION", "WAF", "x0r",
            "YIFY", r"YTS(\.(MX|LT|AG|AM))?", "Pahe(\\.in)?", "PSA", "TGx",
        ],
    ),
];

/// Groups known for fake HDR (SDR sources with injected HDR metadata).
const FAKE_HDR_GROUPS: &[&str] = &[
    "BiTOR",
    "VisionXpert",
    "SasukeducK",
    "jennaortegaUHD",
    "DepraveD",
    "TEKNO3D",
];

/// Group patterns referenced by the tier and fake-HDR tables, in table order.
pub fn known_group_patterns() -> impl Iterator<Item = &'static str> {
    GROUP_TIERS
        .iter()
        .flat_map(|(_, _, _, groups)| groups.iter().copied())
        .chain(FAKE_HDR_GROUPS.iter().copied())
}

fn title(name: &str, pattern: &str) -> FormatCondition {
    FormatCondition::new(name, ConditionKind::Title(pattern.to_string()))
}

fn group_exact(name: &str) -> FormatCondition {
    FormatCondition::optional(name, ConditionKind::ReleaseGroup(format!("^(?:{name})$")))
}

fn format(
    id: &str,
    name: &str,
    category: FormatCategory,
    weight: i32,
    conditions: Vec<FormatCondition>,
) -> CustomFormat {
    CustomFormat::new(id, name, category, weight, conditions)
}

fn resolution_formats() -> Vec<CustomFormat> {
    use ids::*;
    [
        (RES_2160P, Resolution::R2160p, 300),
        (RES_1080P, Resolution::R1080p, 200),
        (RES_720P, Resolution::R720p, 50),
        (RES_576P, Resolution::R576p, -100),
        (RES_480P, Resolution::R480p, -200),
        (RES_UNKNOWN, Resolution::Unknown, -50),
    ]
    .into_iter()
    .map(|(id, resolution, weight)| {
        let name = match resolution {
            Resolution::Unknown => "Unknown Resolution".to_string(),
            other => other.to_string(),
        };
        format(
            id,
            &name,
            FormatCategory::Resolution,
            weight,
            vec![FormatCondition::new(
                name.clone(),
                ConditionKind::Resolution(resolution),
            )],
        )
    })
    .collect()
}

fn source_formats() -> Vec<CustomFormat> {
    use ids::*;
    [
        (SRC_REMUX, "Remux", Source::Remux, 600),
        (SRC_BLURAY, "BluRay", Source::BluRay, 400),
        (SRC_WEBDL, "WEB-DL", Source::WebDl, 300),
        (SRC_WEBRIP, "WEBRip", Source::WebRip, 200),
        (SRC_HDTV, "HDTV", Source::Hdtv, 50),
        (SRC_DVD, "DVD", Source::Dvd, -50),
    ]
    .into_iter()
    .map(|(id, name, source, weight)| {
        format(
            id,
            name,
            FormatCategory::Source,
            weight,
            vec![FormatCondition::new(name, ConditionKind::Source(source))],
        )
    })
    .collect()
}

fn codec_formats() -> Vec<CustomFormat> {
    use ids::*;
    let mut formats: Vec<CustomFormat> = [
        (CODEC_X265, "x265", VideoCodec::Hevc, 50),
        (CODEC_X264, "x264", VideoCodec::Avc, 0),
        (CODEC_AV1, "AV1", VideoCodec::Av1, 25),
        (CODEC_VP9, "VP9", VideoCodec::Vp9, 0),
        (CODEC_XVID, "XviD", VideoCodec::Xvid, -500),
        (CODEC_MPEG2, "MPEG-2", VideoCodec::Mpeg2, -300),
    ]
    .into_iter()
    .map(|(id, name, codec, weight)| {
        format(
            id,
            name,
            FormatCategory::Codec,
            weight,
            vec![FormatCondition::new(name, ConditionKind::Codec(codec))],
        )
    })
    .collect();

    // HEVC below 2160p; usually a re-encode of an HD source.
    formats.push(format(
        CODEC_X265_HD,
        "x265 (HD)",
        FormatCategory::Codec,
        0,
        vec![
            FormatCondition::new("x265", ConditionKind::Codec(VideoCodec::Hevc)),
            FormatCondition::optional("1080p", ConditionKind::Resolution(Resolution::R1080p)),
            FormatCondition::optional("720p", ConditionKind::Resolution(Resolution::R720p)),
            FormatCondition::optional("576p", ConditionKind::Resolution(Resolution::R576p)),
            FormatCondition::optional("480p", ConditionKind::Resolution(Resolution::R480p)),
        ],
    ));
    formats
}

fn audio_formats() -> Vec<CustomFormat> {
    use ids::*;
    let atmos = || title("Atmos", r"\batmos\b");
    let audio = |name: &str, codec: AudioCodec| FormatCondition::new(name, ConditionKind::Audio(codec));

    vec![
        format(
            AUDIO_TRUEHD_ATMOS,
            "TrueHD Atmos",
            FormatCategory::Audio,
            500,
            vec![audio("TrueHD", AudioCodec::TrueHd), atmos()],
        ),
        format(
            AUDIO_DTS_X,
            "DTS:X",
            FormatCategory::Audio,
            450,
            vec![audio("DTS:X", AudioCodec::DtsX)],
        ),
        format(
            AUDIO_TRUEHD,
            "TrueHD",
            FormatCategory::Audio,
            400,
            vec![audio("TrueHD", AudioCodec::TrueHd), atmos().negated()],
        ),
        format(
            AUDIO_DTS_HD_MA,
            "DTS-HD MA",
            FormatCategory::Audio,
            350,
            vec![audio("DTS-HD MA", AudioCodec::DtsHdMa)],
        ),
        format(
            AUDIO_FLAC,
            "FLAC",
            FormatCategory::Audio,
            300,
            vec![audio("FLAC", AudioCodec::Flac)],
        ),
        format(
            AUDIO_PCM,
            "PCM",
            FormatCategory::Audio,
            300,
            vec![audio("PCM", AudioCodec::Pcm)],
        ),
        format(
            AUDIO_DDPLUS_ATMOS,
            "DD+ Atmos",
            FormatCategory::Audio,
            250,
            vec![audio("DD+", AudioCodec::DolbyDigitalPlus), atmos()],
        ),
        format(
            AUDIO_DDPLUS,
            "DD+",
            FormatCategory::Audio,
            150,
            vec![audio("DD+", AudioCodec::DolbyDigitalPlus), atmos().negated()],
        ),
        format(
            AUDIO_DTS,
            "DTS",
            FormatCategory::Audio,
            100,
            vec![audio("DTS", AudioCodec::Dts)],
        ),
        format(
            AUDIO_DD,
            "DD",
            FormatCategory::Audio,
            50,
            vec![audio("DD", AudioCodec::DolbyDigital)],
        ),
        format(
            AUDIO_AAC,
            "AAC",
            FormatCategory::Audio,
            25,
            vec![audio("AAC", AudioCodec::Aac)],
        ),
        format(
            AUDIO_OPUS,
            "Opus",
            FormatCategory::Audio,
            25,
            vec![audio("Opus", AudioCodec::Opus)],
        ),
        format(
            AUDIO_MP3,
            "MP3",
            FormatCategory::Audio,
            -50,
            vec![audio("MP3", AudioCodec::Mp3)],
        ),
    ]
}

fn hdr_formats() -> Vec<CustomFormat> {
    use ids::*;
    let hdr = |name: &str, format: HdrFormat| FormatCondition::new(name, ConditionKind::Hdr(format));
    let any_hdr = |name: &str, format: HdrFormat| {
        FormatCondition::optional(name, ConditionKind::Hdr(format))
    };

    vec![
        format(
            HDR_DV_HDR10PLUS,
            "DV HDR10+",
            FormatCategory::Hdr,
            600,
            vec![
                hdr("DV", HdrFormat::DolbyVision),
                hdr("HDR10+", HdrFormat::Hdr10Plus),
            ],
        ),
        format(
            HDR_DV_HDR10,
            "DV HDR10",
            FormatCategory::Hdr,
            550,
            vec![
                hdr("DV", HdrFormat::DolbyVision),
                any_hdr("HDR10", HdrFormat::Hdr10),
                any_hdr("HDR", HdrFormat::Hdr),
            ],
        ),
        format(
            HDR_DV,
            "DV",
            FormatCategory::Hdr,
            400,
            vec![hdr("DV", HdrFormat::DolbyVision)],
        ),
        format(
            HDR_HDR10PLUS,
            "HDR10+",
            FormatCategory::Hdr,
            500,
            vec![hdr("HDR10+", HdrFormat::Hdr10Plus)],
        ),
        format(
            HDR_HDR10,
            "HDR10",
            FormatCategory::Hdr,
            450,
            vec![hdr("HDR10", HdrFormat::Hdr10)],
        ),
        format(
            HDR_GENERIC,
            "HDR",
            FormatCategory::Hdr,
            300,
            vec![
                any_hdr("HDR", HdrFormat::Hdr),
                any_hdr("HDR10", HdrFormat::Hdr10),
                any_hdr("HDR10+", HdrFormat::Hdr10Plus),
            ],
        ),
        format(
            HDR_HLG,
            "HLG",
            FormatCategory::Hdr,
            200,
            vec![hdr("HLG", HdrFormat::Hlg)],
        ),
        format(
            HDR_PQ,
            "PQ",
            FormatCategory::Hdr,
            150,
            vec![title("PQ", r"\bPQ\b")],
        ),
    ]
}

fn streaming_formats() -> Vec<CustomFormat> {
    STREAMING_SERVICES
        .iter()
        .map(|(tag, name, weight)| {
            format(
                &format!("streaming-{}", tag.to_lowercase()),
                name,
                FormatCategory::Streaming,
                *weight,
                vec![FormatCondition::new(
                    *tag,
                    ConditionKind::StreamingService(tag.to_string()),
                )],
            )
        })
        .collect()
}

fn group_tier_formats() -> Vec<CustomFormat> {
    let mut formats: Vec<CustomFormat> = GROUP_TIERS
        .iter()
        .map(|(id, name, weight, groups)| {
            format(
                id,
                name,
                FormatCategory::ReleaseGroupTier,
                *weight,
                groups.iter().map(|group| group_exact(group)).collect(),
            )
        })
        .collect();

    // Raw match is false when no group was parsed, so the negation fires.
    formats.push(format(
        ids::TIER_NO_GROUP,
        "No Release Group",
        FormatCategory::ReleaseGroupTier,
        -50,
        vec![FormatCondition::new("Any group", ConditionKind::ReleaseGroup(".+".into())).negated()],
    ));
    formats
}

fn banned_formats() -> Vec<CustomFormat> {
    use ids::*;
    let banned = |id: &str, name: &str, conditions: Vec<FormatCondition>| {
        format(id, name, FormatCategory::Banned, BAN_THRESHOLD, conditions)
    };

    vec![
        banned(
            BANNED_FAKE_HDR,
            "Fake HDR Groups",
            FAKE_HDR_GROUPS.iter().map(|group| group_exact(group)).collect(),
        ),
        banned(
            BANNED_CAM,
            "CAM",
            vec![title("CAM", r"\b(?:cam|camrip|cam-rip|hdcam|hd-cam)\b")],
        ),
        banned(
            BANNED_TELESYNC,
            "Telesync",
            vec![title(
                "Telesync",
                r"\b(?:telesync|hdts|hd-ts|pdvd|predvdrip)\b|[ ._-]ts[ ._-]",
            )],
        ),
        banned(
            BANNED_TELECINE,
            "Telecine",
            vec![title("Telecine", r"\b(?:tc|telecine|hdtc|hd-tc)\b")],
        ),
        banned(
            BANNED_SCREENER,
            "Screener",
            vec![title(
                "Screener",
                r"\b(?:scr|screener|dvdscr|dvd-scr|bdscr|webscreener)\b",
            )],
        ),
        banned(
            BANNED_UPSCALED,
            "Upscaled",
            vec![title(
                "Upscaled",
                r"\b(?:up-?scaled?|ai[ ._-]?upscaled?|regraded?)\b",
            )],
        ),
        banned(
            BANNED_HARDCODED_SUBS,
            "Hardcoded Subs",
            vec![title(
                "Hardcoded",
                r"\b(?:hc|hardsubs?|hard-?coded[ ._-]?subs?)\b",
            )],
        ),
        banned(
            BANNED_LINE_DUBBED,
            "Line/Mic Dubbed",
            vec![title("Dubbed", r"\b(?:line|mic)[ ._-]?dub(?:bed)?\b")],
        ),
        banned(
            BANNED_OBFUSCATED,
            "Obfuscated",
            vec![title(
                "Obfuscated",
                r"\b(?:obfuscated|scrambled)\b|\bpost[ ._-]?bot\b",
            )],
        ),
        banned(
            BANNED_RETAGS,
            "Retags",
            vec![title("Retag", r"\[(?:rarbg|eztv|ettv|rartv)\]")],
        ),
        banned(BANNED_SAMPLE, "Sample", vec![title("Sample", r"\bsample\b")]),
    ]
}

fn enhancement_formats() -> Vec<CustomFormat> {
    use ids::*;
    let enh = |id: &str, name: &str, weight: i32, conditions: Vec<FormatCondition>| {
        format(id, name, FormatCategory::Enhancement, weight, conditions)
    };
    let flag = |name: &str, flag: ReleaseFlag| FormatCondition::new(name, ConditionKind::Flag(flag));
    let edition = |name: &str, pattern: &str| {
        FormatCondition::optional(name, ConditionKind::Edition(pattern.to_string()))
    };
    let title_any = |name: &str, pattern: &str| {
        FormatCondition::optional(name, ConditionKind::Title(pattern.to_string()))
    };

    vec![
        enh(ENH_REPACK, "Repack", 5, vec![flag("Repack", ReleaseFlag::Repack)]),
        enh(ENH_PROPER, "Proper", 5, vec![flag("Proper", ReleaseFlag::Proper)]),
        enh(ENH_REPACK2, "Repack v2", 6, vec![title("Repack2", r"\brepack2\b")]),
        enh(
            ENH_IMAX_ENHANCED,
            "IMAX Enhanced",
            50,
            vec![title("IMAX Enhanced", r"\bimax[ ._-]?enhanced\b")],
        ),
        enh(
            ENH_IMAX,
            "IMAX",
            25,
            vec![
                title("IMAX", r"\bimax\b"),
                title("Enhanced", r"\bimax[ ._-]?enhanced\b").negated(),
            ],
        ),
        enh(ENH_HYBRID, "Hybrid", 50, vec![title("Hybrid", r"\bhybrid\b")]),
        enh(
            ENH_REMASTER,
            "Remaster",
            25,
            vec![
                edition("Remastered edition", r"remaster"),
                title_any("Remastered title", r"\bremaster(?:ed)?\b"),
            ],
        ),
        enh(
            ENH_CRITERION,
            "Criterion Collection",
            25,
            vec![
                edition("Criterion edition", r"criterion"),
                title_any("Criterion title", r"\bcriterion\b"),
            ],
        ),
        enh(
            ENH_OPEN_MATTE,
            "Open Matte",
            10,
            vec![title("Open Matte", r"\bopen[ ._-]?matte\b")],
        ),
        enh(
            ENH_DIRECTORS_CUT,
            "Director's Cut",
            10,
            vec![edition("Director's Cut", r"director'?s?[ ._-]?cut")],
        ),
        enh(
            ENH_EXTENDED,
            "Extended",
            10,
            vec![edition("Extended", r"extended")],
        ),
        enh(
            ENH_THEATRICAL,
            "Theatrical",
            0,
            vec![edition("Theatrical", r"theatrical")],
        ),
        enh(
            ENH_UNRATED,
            "Unrated",
            0,
            vec![edition("Unrated", r"unrated|uncut")],
        ),
        enh(
            ENH_10BIT,
            "10-bit",
            10,
            vec![title("10bit", r"\b(?:10[ ._-]?bit|hi10p?)\b")],
        ),
        enh(
            ENH_HFR,
            "High Frame Rate",
            0,
            vec![title("HFR", r"\bhfr\b|\b(?:48|60|120)fps\b")],
        ),
        enh(ENH_3D, "3D", -10_000, vec![flag("3D", ReleaseFlag::ThreeD)]),
        enh(
            ENH_MULTI,
            "Multi-language",
            10,
            vec![FormatCondition::new("MULTi", ConditionKind::Language("multi".into()))],
        ),
        enh(
            ENH_DUAL_AUDIO,
            "Dual Audio",
            0,
            vec![title("Dual Audio", r"\bdual[ ._-]?audio\b")],
        ),
        enh(
            ENH_SEASON_PACK,
            "Season Pack",
            10,
            vec![flag("Season pack", ReleaseFlag::SeasonPack)],
        ),
        enh(
            ENH_COMPLETE_SERIES,
            "Complete Series",
            10,
            vec![flag("Complete", ReleaseFlag::CompleteSeries)],
        ),
        enh(ENH_INTERNAL, "Internal", 0, vec![title("Internal", r"\binternal\b")]),
        enh(
            ENH_EXTRAS,
            "Extras",
            -10_000,
            vec![title("Extras", r"\b(?:extras|featurettes?|bonus[ ._-]?disc)\b")],
        ),
        enh(
            ENH_UHD_BLURAY,
            "UHD BluRay",
            0,
            vec![
                FormatCondition::new("BluRay", ConditionKind::Source(Source::BluRay)),
                title("UHD", r"\buhd\b"),
            ],
        ),
        // Dolby Vision profile 5 WEB releases play back with wrong colours
        // on displays without DV support.
        enh(
            ENH_DV_NO_FALLBACK,
            "DV (no HDR fallback)",
            0,
            vec![
                FormatCondition::new("DV", ConditionKind::Hdr(HdrFormat::DolbyVision)),
                FormatCondition::new("WEB-DL", ConditionKind::Source(Source::WebDl)),
                FormatCondition::new("HDR10", ConditionKind::Hdr(HdrFormat::Hdr10)).negated(),
                FormatCondition::new("HDR10+", ConditionKind::Hdr(HdrFormat::Hdr10Plus)).negated(),
                FormatCondition::new("HDR", ConditionKind::Hdr(HdrFormat::Hdr)).negated(),
            ],
        ),
    ]
}

/// Every built-in format, grouped by category in breakdown order.
pub fn formats() -> Vec<CustomFormat> {
    let mut formats = Vec::new();
    formats.extend(resolution_formats());
    formats.extend(source_formats());
    formats.extend(codec_formats());
    formats.extend(audio_formats());
    formats.extend(hdr_formats());
    formats.extend(streaming_formats());
    formats.extend(group_tier_formats());
    formats.extend(banned_formats());
    formats.extend(enhancement_formats());
    formats
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinegrade_domain::Validate;
    use std::collections::HashSet;

    #[test]
    fn builtin_ids_are_unique() {
        let formats = formats();
        let unique: HashSet<&str> = formats.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(unique.len(), formats.len());
    }

    #[test]
    fn builtin_formats_validate() {
        for format in formats() {
            assert!(format.validate().is_ok(), "{} failed validation", format.id);
        }
    }

    #[test]
    fn banned_formats_carry_ban_threshold() {
        let banned: Vec<_> = formats()
            .into_iter()
            .filter(|f| f.category == FormatCategory::Banned)
            .collect();
        assert!(!banned.is_empty());
        assert!(banned.iter().all(|f| f.default_weight <= BAN_THRESHOLD));
    }

    #[test]
    fn fake_hdr_rule_lists_bitor() {
        let formats = formats();
        let fake_hdr = formats
            .iter()
            .find(|f| f.id == ids::BANNED_FAKE_HDR)
            .unwrap();
        assert!(fake_hdr
            .conditions
            .iter()
            .any(|c| c.kind == ConditionKind::ReleaseGroup("^(?:BiTOR)$".into())));
        assert!(fake_hdr.conditions.iter().all(|c| !c.required));
    }

    #[test]
    fn known_groups_include_hyphenated_names() {
        let groups: Vec<&str> = known_group_patterns().collect();
        assert!(groups.contains(&"D-Z0N3"));
        assert!(groups.contains(&"BiTOR"));
    }

    #[test]
    fn every_category_is_represented() {
        let categories: HashSet<FormatCategory> =
            formats().iter().map(|f| f.category).collect();
        assert_eq!(categories.len(), 9);
    }
}
