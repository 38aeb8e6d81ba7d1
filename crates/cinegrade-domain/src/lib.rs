// SPDX-License-Identifier: GPL-3.0-or-later
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Any resolved weight at or below this value vetoes the release outright.
pub const BAN_THRESHOLD: i32 = -999_999;

// ============================================================================
// Enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    #[serde(rename = "2160p")]
    R2160p,
    #[serde(rename = "1080p")]
    R1080p,
    #[serde(rename = "720p")]
    R720p,
    #[serde(rename = "576p")]
    R576p,
    #[serde(rename = "480p")]
    R480p,
    Unknown,
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::R2160p => write!(f, "2160p"),
            Self::R1080p => write!(f, "1080p"),
            Self::R720p => write!(f, "720p"),
            Self::R576p => write!(f, "576p"),
            Self::R480p => write!(f, "480p"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Remux,
    BluRay,
    WebDl,
    WebRip,
    Hdtv,
    Dvd,
    Unknown,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remux => write!(f, "remux"),
            Self::BluRay => write!(f, "bluray"),
            Self::WebDl => write!(f, "webdl"),
            Self::WebRip => write!(f, "webrip"),
            Self::Hdtv => write!(f, "hdtv"),
            Self::Dvd => write!(f, "dvd"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    Hevc,
    Avc,
    Av1,
    Vp9,
    Xvid,
    Mpeg2,
    Unknown,
}

impl std::fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hevc => write!(f, "hevc"),
            Self::Avc => write!(f, "avc"),
            Self::Av1 => write!(f, "av1"),
            Self::Vp9 => write!(f, "vp9"),
            Self::Xvid => write!(f, "xvid"),
            Self::Mpeg2 => write!(f, "mpeg2"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioCodec {
    TrueHd,
    DtsX,
    DtsHdMa,
    Dts,
    DolbyDigitalPlus,
    DolbyDigital,
    Aac,
    Flac,
    Pcm,
    Opus,
    Mp3,
    Unknown,
}

impl std::fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrueHd => write!(f, "TrueHD"),
            Self::DtsX => write!(f, "DTS:X"),
            Self::DtsHdMa => write!(f, "DTS-HD MA"),
            Self::Dts => write!(f, "DTS"),
            Self::DolbyDigitalPlus => write!(f, "DD+"),
            Self::DolbyDigital => write!(f, "DD"),
            Self::Aac => write!(f, "AAC"),
            Self::Flac => write!(f, "FLAC"),
            Self::Pcm => write!(f, "PCM"),
            Self::Opus => write!(f, "Opus"),
            Self::Mp3 => write!(f, "MP3"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HdrFormat {
    DolbyVision,
    Hdr10Plus,
    Hdr10,
    Hdr,
    Hlg,
}

impl std::fmt::Display for HdrFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DolbyVision => write!(f, "DV"),
            Self::Hdr10Plus => write!(f, "HDR10+"),
            Self::Hdr10 => write!(f, "HDR10"),
            Self::Hdr => write!(f, "HDR"),
            Self::Hlg => write!(f, "HLG"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseFlag {
    Remux,
    Repack,
    Proper,
    #[serde(rename = "3d")]
    ThreeD,
    SeasonPack,
    CompleteSeries,
}

impl std::fmt::Display for ReleaseFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remux => write!(f, "remux"),
            Self::Repack => write!(f, "repack"),
            Self::Proper => write!(f, "proper"),
            Self::ThreeD => write!(f, "3d"),
            Self::SeasonPack => write!(f, "season-pack"),
            Self::CompleteSeries => write!(f, "complete-series"),
        }
    }
}

/// Grouping tag for custom formats. Declaration order is the order used in
/// score breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatCategory {
    Resolution,
    Source,
    Codec,
    Audio,
    Hdr,
    Streaming,
    ReleaseGroupTier,
    Banned,
    Enhancement,
}

impl std::fmt::Display for FormatCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolution => write!(f, "resolution"),
            Self::Source => write!(f, "source"),
            Self::Codec => write!(f, "codec"),
            Self::Audio => write!(f, "audio"),
            Self::Hdr => write!(f, "hdr"),
            Self::Streaming => write!(f, "streaming"),
            Self::ReleaseGroupTier => write!(f, "release-group-tier"),
            Self::Banned => write!(f, "banned"),
            Self::Enhancement => write!(f, "enhancement"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseProtocol {
    Torrent,
    Usenet,
}

impl std::fmt::Display for ReleaseProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Torrent => write!(f, "torrent"),
            Self::Usenet => write!(f, "usenet"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

// ============================================================================
// Release Attributes
// ============================================================================

/// Structured facts about one release, as produced by a release-name parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseAttributes {
    pub raw_title: String,
    pub cleaned_title: String,
    pub year: Option<u16>,
    pub resolution: Resolution,
    pub source: Source,
    pub codec: VideoCodec,
    /// Every HDR format present; empty when the release is SDR.
    pub hdr: Vec<HdrFormat>,
    pub audio: AudioCodec,
    pub release_group: Option<String>,
    pub streaming_service: Option<String>,
    pub edition: Option<String>,
    pub languages: Vec<String>,
    pub is_remux: bool,
    pub is_repack: bool,
    pub is_proper: bool,
    pub is_3d: bool,
    pub is_season_pack: bool,
    pub is_complete_series: bool,
}

impl ReleaseAttributes {
    /// Attributes with every field unknown or empty.
    pub fn unknown(raw_title: impl Into<String>) -> Self {
        let raw_title = raw_title.into();
        Self {
            cleaned_title: raw_title.clone(),
            raw_title,
            year: None,
            resolution: Resolution::Unknown,
            source: Source::Unknown,
            codec: VideoCodec::Unknown,
            hdr: Vec::new(),
            audio: AudioCodec::Unknown,
            release_group: None,
            streaming_service: None,
            edition: None,
            languages: Vec::new(),
            is_remux: false,
            is_repack: false,
            is_proper: false,
            is_3d: false,
            is_season_pack: false,
            is_complete_series: false,
        }
    }

    pub fn has_hdr(&self, format: HdrFormat) -> bool {
        self.hdr.contains(&format)
    }

    pub fn has_flag(&self, flag: ReleaseFlag) -> bool {
        match flag {
            ReleaseFlag::Remux => self.is_remux,
            ReleaseFlag::Repack => self.is_repack,
            ReleaseFlag::Proper => self.is_proper,
            ReleaseFlag::ThreeD => self.is_3d,
            ReleaseFlag::SeasonPack => self.is_season_pack,
            ReleaseFlag::CompleteSeries => self.is_complete_series,
        }
    }
}

// ============================================================================
// Custom Formats
// ============================================================================

/// The predicate a condition tests. Pattern kinds carry a regular expression
/// that is matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConditionKind {
    Resolution(Resolution),
    Source(Source),
    Title(String),
    ReleaseGroup(String),
    Codec(VideoCodec),
    Audio(AudioCodec),
    Hdr(HdrFormat),
    StreamingService(String),
    Language(String),
    Edition(String),
    Flag(ReleaseFlag),
}

impl ConditionKind {
    /// The regular expression carried by pattern kinds.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            Self::Title(pattern) | Self::ReleaseGroup(pattern) | Self::Edition(pattern) => {
                Some(pattern)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatCondition {
    pub name: String,
    #[serde(flatten)]
    pub kind: ConditionKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub negate: bool,
}

impl FormatCondition {
    /// A required, non-negated condition.
    pub fn new(name: impl Into<String>, kind: ConditionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            negate: false,
        }
    }

    /// A non-required condition; at least one optional condition of a format must match.
    pub fn optional(name: impl Into<String>, kind: ConditionKind) -> Self {
        Self {
            required: false,
            ..Self::new(name, kind)
        }
    }

    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFormat {
    pub id: String,
    pub name: String,
    pub category: FormatCategory,
    pub conditions: Vec<FormatCondition>,
    pub default_weight: i32,
}

impl CustomFormat {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: FormatCategory,
        default_weight: i32,
        conditions: Vec<FormatCondition>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            conditions,
            default_weight,
        }
    }
}

// ============================================================================
// Scoring Profiles
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SizeLimits {
    pub movie_min_gb: Option<f64>,
    pub movie_max_gb: Option<f64>,
    pub episode_min_mb: Option<f64>,
    pub episode_max_mb: Option<f64>,
}

impl SizeLimits {
    pub fn is_unbounded(&self) -> bool {
        self.movie_min_gb.is_none()
            && self.movie_max_gb.is_none()
            && self.episode_min_mb.is_none()
            && self.episode_max_mb.is_none()
    }
}

/// A named taste profile: thresholds plus per-format weight overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub min_score: i64,
    #[serde(default = "default_upgrade_until")]
    pub upgrade_until: i64,
    #[serde(default)]
    pub min_upgrade_delta: i64,
    #[serde(default)]
    pub weights: BTreeMap<String, i32>,
    #[serde(default = "default_protocols")]
    pub protocols: Vec<ReleaseProtocol>,
    #[serde(default)]
    pub size_limits: SizeLimits,
}

fn default_upgrade_until() -> i64 {
    i64::MAX
}

fn default_protocols() -> Vec<ReleaseProtocol> {
    vec![ReleaseProtocol::Torrent, ReleaseProtocol::Usenet]
}

impl ScoringProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            min_score: 0,
            upgrade_until: default_upgrade_until(),
            min_upgrade_delta: 0,
            weights: BTreeMap::new(),
            protocols: default_protocols(),
            size_limits: SizeLimits::default(),
        }
    }

    pub fn with_weight(mut self, format_id: impl Into<String>, weight: i32) -> Self {
        self.weights.insert(format_id.into(), weight);
        self
    }

    /// The profile override for `format`, falling back to its default weight.
    pub fn weight_for(&self, format: &CustomFormat) -> i32 {
        self.weights
            .get(&format.id)
            .copied()
            .unwrap_or(format.default_weight)
    }

    pub fn allows_protocol(&self, protocol: ReleaseProtocol) -> bool {
        self.protocols.contains(&protocol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeContext {
    pub media_type: MediaType,
    #[serde(default)]
    pub is_season_pack: bool,
    #[serde(default)]
    pub episode_count: Option<u32>,
}

impl SizeContext {
    pub fn movie() -> Self {
        Self {
            media_type: MediaType::Movie,
            is_season_pack: false,
            episode_count: None,
        }
    }

    pub fn episode() -> Self {
        Self {
            media_type: MediaType::Tv,
            is_season_pack: false,
            episode_count: None,
        }
    }

    pub fn season_pack(episode_count: Option<u32>) -> Self {
        Self {
            media_type: MediaType::Tv,
            is_season_pack: true,
            episode_count,
        }
    }
}

// ============================================================================
// Scores
// ============================================================================

/// A release's total score. `Banned` stands for negative infinity and orders
/// below every finite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TotalScore {
    Banned,
    Points(i64),
}

impl TotalScore {
    pub fn is_banned(&self) -> bool {
        matches!(self, Self::Banned)
    }

    pub fn points(&self) -> Option<i64> {
        match self {
            Self::Banned => None,
            Self::Points(points) => Some(*points),
        }
    }

    /// `self - other`, following extended-real arithmetic.
    pub fn delta(self, other: TotalScore) -> ScoreDelta {
        match (self, other) {
            (Self::Points(a), Self::Points(b)) => ScoreDelta::Points(a.saturating_sub(b)),
            (Self::Points(_), Self::Banned) => ScoreDelta::PositiveInfinity,
            (Self::Banned, Self::Points(_)) => ScoreDelta::NegativeInfinity,
            (Self::Banned, Self::Banned) => ScoreDelta::Indeterminate,
        }
    }
}

impl std::fmt::Display for TotalScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Banned => f.pad("-inf"),
            Self::Points(points) => f.pad(&points.to_string()),
        }
    }
}

const NEGATIVE_INFINITY: &str = "-Infinity";

impl Serialize for TotalScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Banned => serializer.serialize_str(NEGATIVE_INFINITY),
            Self::Points(points) => serializer.serialize_i64(*points),
        }
    }
}

impl<'de> Deserialize<'de> for TotalScore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Points(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Points(points) => Ok(Self::Points(points)),
            Raw::Text(text) if text == NEGATIVE_INFINITY => Ok(Self::Banned),
            Raw::Text(text) => Err(serde::de::Error::custom(format!(
                "invalid total score: {text}"
            ))),
        }
    }
}

/// Difference between two total scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreDelta {
    NegativeInfinity,
    Points(i64),
    PositiveInfinity,
    /// Both sides banned.
    Indeterminate,
}

impl ScoreDelta {
    pub fn points(&self) -> Option<i64> {
        match self {
            Self::Points(points) => Some(*points),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScoreDelta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NegativeInfinity => write!(f, "-inf"),
            Self::Points(points) => write!(f, "{:+}", points),
            Self::PositiveInfinity => write!(f, "+inf"),
            Self::Indeterminate => write!(f, "n/a"),
        }
    }
}

// ============================================================================
// Scoring Results
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredFormat {
    pub id: String,
    pub name: String,
    pub category: FormatCategory,
    pub weight: i32,
}

impl ScoredFormat {
    pub fn bans(&self) -> bool {
        self.weight <= BAN_THRESHOLD
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub subtotal: i64,
    pub formats: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub release_name: String,
    pub profile_name: String,
    pub total_score: TotalScore,
    pub formats: Vec<ScoredFormat>,
    pub breakdown: BTreeMap<FormatCategory, CategoryBreakdown>,
    pub meets_minimum: bool,
    pub is_banned: bool,
    pub banned_reasons: Vec<String>,
    pub size_rejected: bool,
    pub size_rejection_reason: Option<String>,
    pub attributes: ReleaseAttributes,
}

impl ScoringResult {
    /// Banned or outside the profile's size bounds.
    pub fn is_rejected(&self) -> bool {
        self.is_banned || self.size_rejected
    }

    pub fn format_ids(&self) -> Vec<&str> {
        self.formats.iter().map(|format| format.id.as_str()).collect()
    }
}

// ============================================================================
// Domain Validation
// ============================================================================

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

pub trait Validate {
    fn validate(&self) -> Result<(), Vec<ValidationError>>;
}

impl Validate for ScoringProfile {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.id.trim().is_empty() {
            errors.push(ValidationError {
                field: "id",
                message: "id cannot be empty".into(),
            });
        }
        if self.name.trim().is_empty() {
            errors.push(ValidationError {
                field: "name",
                message: "name cannot be empty".into(),
            });
        }
        if self.upgrade_until < self.min_score {
            errors.push(ValidationError {
                field: "upgrade_until",
                message: "upgrade_until must be >= min_score".into(),
            });
        }
        if self.min_upgrade_delta < 0 {
            errors.push(ValidationError {
                field: "min_upgrade_delta",
                message: "min_upgrade_delta must be >= 0".into(),
            });
        }
        let limits = &self.size_limits;
        for (field, bound) in [
            ("size_limits.movie_min_gb", limits.movie_min_gb),
            ("size_limits.movie_max_gb", limits.movie_max_gb),
            ("size_limits.episode_min_mb", limits.episode_min_mb),
            ("size_limits.episode_max_mb", limits.episode_max_mb),
        ] {
            if let Some(value) = bound {
                if !value.is_finite() || value < 0.0 {
                    errors.push(ValidationError {
                        field,
                        message: "size bound must be a non-negative number".into(),
                    });
                }
            }
        }
        if let (Some(min), Some(max)) = (limits.movie_min_gb, limits.movie_max_gb) {
            if min > max {
                errors.push(ValidationError {
                    field: "size_limits.movie_min_gb",
                    message: "movie minimum exceeds movie maximum".into(),
                });
            }
        }
        if let (Some(min), Some(max)) = (limits.episode_min_mb, limits.episode_max_mb) {
            if min > max {
                errors.push(ValidationError {
                    field: "size_limits.episode_min_mb",
                    message: "episode minimum exceeds episode maximum".into(),
                });
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Validate for CustomFormat {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.id.trim().is_empty() {
            errors.push(ValidationError {
                field: "id",
                message: "id cannot be empty".into(),
            });
        }
        if self.name.trim().is_empty() {
            errors.push(ValidationError {
                field: "name",
                message: "name cannot be empty".into(),
            });
        }
        if self.conditions.is_empty() {
            errors.push(ValidationError {
                field: "conditions",
                message: "at least one condition is required".into(),
            });
        }
        if self
            .conditions
            .iter()
            .filter_map(|condition| condition.kind.pattern())
            .any(|pattern| pattern.trim().is_empty())
        {
            errors.push(ValidationError {
                field: "conditions",
                message: "pattern conditions cannot be empty".into(),
            });
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
