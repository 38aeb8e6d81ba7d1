// SPDX-License-Identifier: GPL-3.0-or-later
use cinegrade_domain::{
    AudioCodec, HdrFormat, ReleaseAttributes, Resolution, Source, VideoCodec,
};
use cinegrade_formats::builtin::{known_group_patterns, STREAMING_SERVICES};
use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Turns a raw release name into structured attributes.
///
/// Implementations must never fail: tokens they cannot recognise leave the
/// corresponding field unknown or empty.
pub trait ReleaseParser: Send + Sync {
    fn parse(&self, name: &str) -> ReleaseAttributes;
}

/// Heuristic parser for scene-style names such as
/// `Movie.2024.2160p.UHD.BluRay.HDR.x265-GROUP`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneNameParser;

impl ReleaseParser for SceneNameParser {
    fn parse(&self, name: &str) -> ReleaseAttributes {
        parse_release_name(name)
    }
}

pub fn parse_release_name(name: &str) -> ReleaseAttributes {
    let normalized = normalize_whitespace(name);
    let stem = strip_extension(&normalized);

    let source = detect_source(stem);
    let mut attributes = ReleaseAttributes::unknown(name);
    attributes.cleaned_title = clean_title(stem);
    attributes.year = detect_year(stem);
    attributes.resolution = detect_resolution(stem);
    attributes.source = source;
    attributes.codec = detect_codec(stem);
    attributes.hdr = detect_hdr(stem);
    attributes.audio = detect_audio(stem);
    attributes.release_group = detect_release_group(stem);
    attributes.streaming_service = detect_streaming_service(stem);
    attributes.edition = detect_edition(stem);
    attributes.languages = detect_languages(stem);
    attributes.is_remux = source == Source::Remux;
    attributes.is_repack = matches_flag(&REPACK_REGEX, stem);
    attributes.is_proper = matches_flag(&PROPER_REGEX, stem);
    attributes.is_3d = matches_flag(&THREE_D_REGEX, stem);
    attributes.is_season_pack = detect_season_pack(stem);
    attributes.is_complete_series = matches_flag(&COMPLETE_REGEX, stem);
    attributes
}

lazy_static! {
    static ref REPACK_REGEX: Regex =
        Regex::new(r"(?i)\b(?:repack\d?|rerip)\b").expect("valid repack regex");
    static ref PROPER_REGEX: Regex = Regex::new(r"(?i)\bproper\b").expect("valid proper regex");
    static ref THREE_D_REGEX: Regex =
        Regex::new(r"(?i)\b(?:3d|h-?sbs|half-sbs|h-?ou|half-ou|mvc)\b").expect("valid 3d regex");
    static ref COMPLETE_REGEX: Regex =
        Regex::new(r"(?i)\bcomplete(?:[ ._-]series)?\b").expect("valid complete regex");
}

fn matches_flag(regex: &Regex, title: &str) -> bool {
    regex.is_match(title)
}

fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<&str>>().join(" ")
}

fn strip_extension(title: &str) -> &str {
    lazy_static! {
        static ref EXTENSION_REGEX: Regex =
            Regex::new(r"(?i)\.(?:mkv|mp4|m4v|avi|wmv|m2ts|ts|nzb|torrent)$")
                .expect("valid extension regex");
    }

    match EXTENSION_REGEX.find(title) {
        Some(m) => &title[..m.start()],
        None => title,
    }
}

fn detect_resolution(title: &str) -> Resolution {
    lazy_static! {
        static ref RESOLUTION_REGEX: Regex = Regex::new(
            r"(?i)\b(?:(?P<r2160>2160p|4k)|(?P<r1080>1080[pi])|(?P<r720>720p)|(?P<r576>576[pi])|(?P<r480>480[pi]))\b"
        )
        .expect("valid resolution regex");
        static ref UHD_REGEX: Regex = Regex::new(r"(?i)\buhd\b").expect("valid uhd regex");
    }

    if let Some(captures) = RESOLUTION_REGEX.captures(title) {
        if captures.name("r2160").is_some() {
            return Resolution::R2160p;
        }
        if captures.name("r1080").is_some() {
            return Resolution::R1080p;
        }
        if captures.name("r720").is_some() {
            return Resolution::R720p;
        }
        if captures.name("r576").is_some() {
            return Resolution::R576p;
        }
        if captures.name("r480").is_some() {
            return Resolution::R480p;
        }
    }

    if UHD_REGEX.is_match(title) {
        Resolution::R2160p
    } else {
        Resolution::Unknown
    }
}

fn detect_source(title: &str) -> Source {
    lazy_static! {
        static ref SOURCE_PATTERNS: Vec<(Regex, Source)> = vec![
            (
                Regex::new(r"(?i)\b(?:remux|bdremux)\b").expect("valid remux regex"),
                Source::Remux,
            ),
            (
                Regex::new(r"(?i)\bweb[ .-]?rip\b").expect("valid webrip regex"),
                Source::WebRip,
            ),
            (
                Regex::new(r"(?i)\b(?:web[ .-]?dl|web)\b").expect("valid webdl regex"),
                Source::WebDl,
            ),
            (
                Regex::new(r"(?i)\b(?:blu-?ray|bdrip|brrip|bd25|bd50|bdmv)\b")
                    .expect("valid bluray regex"),
                Source::BluRay,
            ),
            (
                Regex::new(r"(?i)\b(?:hdtv|pdtv|sdtv|dsr)\b").expect("valid hdtv regex"),
                Source::Hdtv,
            ),
            (
                Regex::new(r"(?i)\b(?:dvd|dvdrip|dvd5|dvd9|dvdr)\b").expect("valid dvd regex"),
                Source::Dvd,
            ),
        ];
    }

    SOURCE_PATTERNS
        .iter()
        .find(|(regex, _)| regex.is_match(title))
        .map(|(_, source)| *source)
        .unwrap_or(Source::Unknown)
}

fn detect_codec(title: &str) -> VideoCodec {
    lazy_static! {
        static ref CODEC_PATTERNS: Vec<(Regex, VideoCodec)> = vec![
            (
                Regex::new(r"(?i)\b(?:x265|h\.?265|hevc)\b").expect("valid hevc regex"),
                VideoCodec::Hevc,
            ),
            (
                Regex::new(r"(?i)\b(?:x264|h\.?264|avc)\b").expect("valid avc regex"),
                VideoCodec::Avc,
            ),
            (Regex::new(r"(?i)\bav1\b").expect("valid av1 regex"), VideoCodec::Av1),
            (Regex::new(r"(?i)\bvp9\b").expect("valid vp9 regex"), VideoCodec::Vp9),
            (
                Regex::new(r"(?i)\b(?:xvid|divx)\b").expect("valid xvid regex"),
                VideoCodec::Xvid,
            ),
            (
                Regex::new(r"(?i)\bmpeg-?2\b").expect("valid mpeg2 regex"),
                VideoCodec::Mpeg2,
            ),
        ];
    }

    CODEC_PATTERNS
        .iter()
        .find(|(regex, _)| regex.is_match(title))
        .map(|(_, codec)| *codec)
        .unwrap_or(VideoCodec::Unknown)
}

fn detect_hdr(title: &str) -> Vec<HdrFormat> {
    lazy_static! {
        static ref HDR_PATTERNS: Vec<(Regex, HdrFormat)> = vec![
            (
                Regex::new(r"(?i)\b(?:dv|dovi|dolby[ .-]?vision)\b").expect("valid dv regex"),
                HdrFormat::DolbyVision,
            ),
            (
                Regex::new(r"(?i)\bhdr10(?:\+|plus\b|p\b)").expect("valid hdr10+ regex"),
                HdrFormat::Hdr10Plus,
            ),
            (
                Regex::new(r"(?i)\bhdr10(?:$|[^+a-z0-9])").expect("valid hdr10 regex"),
                HdrFormat::Hdr10,
            ),
            (Regex::new(r"(?i)\bhdr\b").expect("valid hdr regex"), HdrFormat::Hdr),
            (Regex::new(r"(?i)\bhlg\b").expect("valid hlg regex"), HdrFormat::Hlg),
        ];
    }

    HDR_PATTERNS
        .iter()
        .filter(|(regex, _)| regex.is_match(title))
        .map(|(_, format)| *format)
        .collect()
}

fn detect_audio(title: &str) -> AudioCodec {
    lazy_static! {
        static ref AUDIO_PATTERNS: Vec<(Regex, AudioCodec)> = vec![
            (
                Regex::new(r"(?i)\btrue-?hd\b").expect("valid truehd regex"),
                AudioCodec::TrueHd,
            ),
            (
                Regex::new(r"(?i)\bdts[ .:-]?x\b").expect("valid dts:x regex"),
                AudioCodec::DtsX,
            ),
            (
                Regex::new(r"(?i)\bdts[ .-]?hd[ .-]?ma\b").expect("valid dts-hd ma regex"),
                AudioCodec::DtsHdMa,
            ),
            (Regex::new(r"(?i)\bflac\b").expect("valid flac regex"), AudioCodec::Flac),
            (Regex::new(r"(?i)\bl?pcm\b").expect("valid pcm regex"), AudioCodec::Pcm),
            (
                Regex::new(r"(?i)\b(?:ddp|dd\+|e-?ac-?3)").expect("valid dd+ regex"),
                AudioCodec::DolbyDigitalPlus,
            ),
            (Regex::new(r"(?i)\bdts\b").expect("valid dts regex"), AudioCodec::Dts),
            (
                Regex::new(r"(?i)\b(?:dd|ac-?3)(?:[ .]?\d|\b)").expect("valid dd regex"),
                AudioCodec::DolbyDigital,
            ),
            (Regex::new(r"(?i)\baac").expect("valid aac regex"), AudioCodec::Aac),
            (Regex::new(r"(?i)\bopus\b").expect("valid opus regex"), AudioCodec::Opus),
            (Regex::new(r"(?i)\bmp3\b").expect("valid mp3 regex"), AudioCodec::Mp3),
        ];
    }

    AUDIO_PATTERNS
        .iter()
        .find(|(regex, _)| regex.is_match(title))
        .map(|(_, codec)| *codec)
        .unwrap_or(AudioCodec::Unknown)
}

fn detect_release_group(title: &str) -> Option<String> {
    lazy_static! {
        static ref TRAILING_TAG_REGEX: Regex =
            Regex::new(r"\s*\[[^\]]*\]$").expect("valid trailing tag regex");
        static ref GROUP_REGEX: Regex =
            Regex::new(r"-(?P<group>[A-Za-z0-9][A-Za-z0-9_]{1,31}(?:\.[A-Za-z]{2,3})?)$")
                .expect("valid group regex");
        static ref NOT_A_GROUP_REGEX: Regex =
            Regex::new(r"(?i)^(?:dl|rip|hd|web|sbs|ou|x264|x265|h264|h265|\d+)$")
                .expect("valid group blacklist regex");
        // Known groups with a hyphen in their name, tried before the generic capture.
        static ref HYPHENATED_GROUP_REGEX: Option<Regex> = {
            let groups = known_group_patterns()
                .filter(|group| group.contains('-'))
                .map(|group| format!("(?:{group})"))
                .collect::<Vec<_>>()
                .join("|");
            (!groups.is_empty()).then(|| {
                Regex::new(&format!(r"(?i)-(?P<group>{groups})$"))
                    .expect("valid hyphenated group regex")
            })
        };
    }

    let title = TRAILING_TAG_REGEX.replace(title, "");
    if let Some(group) = HYPHENATED_GROUP_REGEX
        .as_ref()
        .and_then(|regex| regex.captures(&title))
        .and_then(|captures| captures.name("group"))
    {
        return Some(group.as_str().to_string());
    }

    GROUP_REGEX
        .captures(&title)
        .and_then(|captures| captures.name("group").map(|m| m.as_str().to_string()))
        .filter(|group| !NOT_A_GROUP_REGEX.is_match(group))
}

fn detect_streaming_service(title: &str) -> Option<String> {
    lazy_static! {
        static ref STREAMING_REGEX: Regex = {
            let codes = STREAMING_SERVICES
                .iter()
                .map(|(tag, _, _)| regex::escape(tag))
                .collect::<Vec<_>>()
                .join("|");
            Regex::new(&format!(r"\b(?P<service>{codes})[ ._-]+(?i:web)"))
                .expect("valid streaming service regex")
        };
    }

    STREAMING_REGEX
        .captures(title)
        .and_then(|captures| captures.name("service").map(|m| m.as_str().to_string()))
}

fn detect_edition(title: &str) -> Option<String> {
    lazy_static! {
        static ref EDITION_REGEX: Regex = Regex::new(
            r"(?i)\b(?:director'?s[ ._-]?cut|extended(?:[ ._-](?:cut|edition))?|theatrical(?:[ ._-]cut)?|unrated|uncut|remastered|criterion(?:[ ._-]collection)?|special[ ._-]edition|collector'?s[ ._-]edition|ultimate[ ._-]edition|final[ ._-]cut|anniversary[ ._-]edition)\b"
        )
        .expect("valid edition regex");
    }

    EDITION_REGEX
        .find(title)
        .map(|m| m.as_str().replace(['.', '_', '-'], " "))
}

fn detect_languages(title: &str) -> Vec<String> {
    lazy_static! {
        static ref LANGUAGE_PATTERNS: Vec<(Regex, &'static str)> = [
            (r"(?i)\bmulti\b", "multi"),
            (r"(?i)\b(?:french|truefrench|vff|vfq)\b", "fr"),
            (r"(?i)\bgerman\b", "de"),
            (r"(?i)\b(?:spanish|castellano|latino)\b", "es"),
            (r"(?i)\b(?:italian|ita)\b", "it"),
            (r"(?i)\b(?:japanese|jpn)\b", "ja"),
            (r"(?i)\b(?:korean|kor)\b", "ko"),
            (r"(?i)\bhindi\b", "hi"),
            (r"(?i)\b(?:russian|rus)\b", "ru"),
            (r"(?i)\b(?:dutch|nl)\b", "nl"),
            (r"(?i)\bnordic\b", "nordic"),
        ]
        .into_iter()
        .map(|(pattern, code)| (Regex::new(pattern).expect("valid language regex"), code))
        .collect();
    }

    LANGUAGE_PATTERNS
        .iter()
        .filter(|(regex, _)| regex.is_match(title))
        .map(|(_, code)| code.to_string())
        .collect()
}

fn detect_year(title: &str) -> Option<u16> {
    lazy_static! {
        static ref YEAR_REGEX: Regex =
            Regex::new(r"\b(?P<year>19\d{2}|20\d{2})\b").expect("valid year regex");
    }

    // The last year-like token wins so titles such as "2001 A Space Odyssey 1968"
    // resolve to the release year.
    YEAR_REGEX
        .captures_iter(title)
        .filter_map(|captures| captures.name("year"))
        .filter(|m| m.start() > 0)
        .last()
        .and_then(|m| m.as_str().parse().ok())
}

fn detect_season_pack(title: &str) -> bool {
    lazy_static! {
        static ref SEASON_REGEX: Regex =
            Regex::new(r"(?i)\bs\d{1,2}\b|\bseason[ ._-]?\d{1,2}\b").expect("valid season regex");
        static ref EPISODE_REGEX: Regex =
            Regex::new(r"(?i)\bs\d{1,2}e\d{1,3}\b|\b\d{1,2}x\d{2,3}\b").expect("valid episode regex");
    }

    SEASON_REGEX.is_match(title) && !EPISODE_REGEX.is_match(title)
}

fn clean_title(title: &str) -> String {
    lazy_static! {
        static ref TITLE_END_REGEX: Regex = Regex::new(
            r"(?i)[ ._(\[-](?:19\d{2}|20\d{2}|s\d{1,2}(?:e\d{1,3})?|season[ ._-]?\d|2160p|1080[pi]|720p|576[pi]|480[pi]|4k|uhd)(?:[ ._)\]-]|$)"
        )
        .expect("valid title end regex");
        static ref SEPARATOR_REGEX: Regex = Regex::new(r"[._]+").expect("valid separator regex");
    }

    let head = match TITLE_END_REGEX.find(title) {
        Some(m) if m.start() > 0 => &title[..m.start()],
        _ => title,
    };
    let spaced = SEPARATOR_REGEX.replace_all(head, " ");
    normalize_whitespace(&spaced.nfkc().collect::<String>())
        .trim_matches(|c: char| c == '-' || c.is_whitespace())
        .to_string()
}
