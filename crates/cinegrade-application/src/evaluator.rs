// SPDX-License-Identifier: GPL-3.0-or-later
use cinegrade_domain::{ConditionKind, FormatCondition, ReleaseAttributes};
use serde::Serialize;

use crate::patterns::PatternCache;

/// Outcome of testing one condition against one release.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionEvaluation<'a> {
    pub condition: &'a FormatCondition,
    /// Result of the predicate before negation.
    pub raw_match: bool,
    /// `raw_match`, inverted when the condition is negated.
    pub matches: bool,
}

pub fn evaluate_condition<'a>(
    condition: &'a FormatCondition,
    attributes: &ReleaseAttributes,
    patterns: &PatternCache,
) -> ConditionEvaluation<'a> {
    let raw_match = raw_match(&condition.kind, attributes, patterns);
    ConditionEvaluation {
        condition,
        raw_match,
        matches: raw_match != condition.negate,
    }
}

fn raw_match(kind: &ConditionKind, attributes: &ReleaseAttributes, patterns: &PatternCache) -> bool {
    match kind {
        ConditionKind::Resolution(resolution) => attributes.resolution == *resolution,
        ConditionKind::Source(source) => attributes.source == *source,
        ConditionKind::Codec(codec) => attributes.codec == *codec,
        ConditionKind::Audio(audio) => attributes.audio == *audio,
        ConditionKind::Hdr(format) => attributes.has_hdr(*format),
        ConditionKind::Flag(flag) => attributes.has_flag(*flag),
        ConditionKind::Title(pattern) => patterns.is_match(pattern, &attributes.raw_title),
        ConditionKind::ReleaseGroup(pattern) => attributes
            .release_group
            .as_deref()
            .is_some_and(|group| patterns.is_match(pattern, group)),
        ConditionKind::Edition(pattern) => attributes
            .edition
            .as_deref()
            .is_some_and(|edition| patterns.is_match(pattern, edition)),
        ConditionKind::StreamingService(service) => attributes
            .streaming_service
            .as_deref()
            .is_some_and(|tag| tag.eq_ignore_ascii_case(service)),
        ConditionKind::Language(language) => attributes
            .languages
            .iter()
            .any(|code| code.eq_ignore_ascii_case(language)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinegrade_domain::{HdrFormat, ReleaseFlag, Resolution, Source};

    fn attrs() -> ReleaseAttributes {
        let mut attrs = ReleaseAttributes::unknown("Movie.2024.2160p.UHD.BluRay.HDR.x265-BiTOR");
        attrs.resolution = Resolution::R2160p;
        attrs.source = Source::BluRay;
        attrs.hdr = vec![HdrFormat::Hdr];
        attrs.release_group = Some("BiTOR".into());
        attrs.languages = vec!["multi".into()];
        attrs
    }

    #[test]
    fn enum_kinds_compare_exactly() {
        let cache = PatternCache::default();
        let attrs = attrs();

        let hit = FormatCondition::new("4K", ConditionKind::Resolution(Resolution::R2160p));
        let miss = FormatCondition::new("1080p", ConditionKind::Resolution(Resolution::R1080p));
        assert!(evaluate_condition(&hit, &attrs, &cache).matches);
        assert!(!evaluate_condition(&miss, &attrs, &cache).matches);

        let source = FormatCondition::new("BluRay", ConditionKind::Source(Source::BluRay));
        assert!(evaluate_condition(&source, &attrs, &cache).raw_match);
    }

    #[test]
    fn negation_inverts_raw_match() {
        let cache = PatternCache::default();
        let condition =
            FormatCondition::new("Not remux", ConditionKind::Flag(ReleaseFlag::Remux)).negated();
        let evaluation = evaluate_condition(&condition, &attrs(), &cache);
        assert!(!evaluation.raw_match);
        assert!(evaluation.matches);
    }

    #[test]
    fn title_pattern_is_case_insensitive_search() {
        let cache = PatternCache::default();
        let condition = FormatCondition::new("UHD", ConditionKind::Title(r"\buhd\b".into()));
        assert!(evaluate_condition(&condition, &attrs(), &cache).matches);
    }

    #[test]
    fn release_group_pattern_targets_group_only() {
        let cache = PatternCache::default();
        let condition =
            FormatCondition::new("Movie", ConditionKind::ReleaseGroup("^movie$".into()));
        assert!(!evaluate_condition(&condition, &attrs(), &cache).raw_match);

        let condition =
            FormatCondition::new("BiTOR", ConditionKind::ReleaseGroup("^bitor$".into()));
        assert!(evaluate_condition(&condition, &attrs(), &cache).raw_match);
    }

    #[test]
    fn missing_group_is_a_plain_non_match() {
        let cache = PatternCache::default();
        let mut attrs = attrs();
        attrs.release_group = None;

        let condition = FormatCondition::new("Any", ConditionKind::ReleaseGroup(".*".into()));
        let evaluation = evaluate_condition(&condition, &attrs, &cache);
        assert!(!evaluation.raw_match);

        let negated = condition.clone().negated();
        assert!(evaluate_condition(&negated, &attrs, &cache).matches);
    }

    #[test]
    fn malformed_pattern_matches_nothing() {
        let cache = PatternCache::default();
        let condition = FormatCondition::new("Broken", ConditionKind::Title("(?P<".into()));
        let evaluation = evaluate_condition(&condition, &attrs(), &cache);
        assert!(!evaluation.raw_match);
        assert!(!evaluation.matches);
    }

    #[test]
    fn set_and_text_kinds() {
        let cache = PatternCache::default();
        let mut attrs = attrs();
        attrs.streaming_service = Some("AMZN".into());
        attrs.edition = Some("Directors Cut".into());

        let checks = [
            (ConditionKind::Hdr(HdrFormat::Hdr), true),
            (ConditionKind::Hdr(HdrFormat::DolbyVision), false),
            (ConditionKind::StreamingService("amzn".into()), true),
            (ConditionKind::StreamingService("NF".into()), false),
            (ConditionKind::Language("MULTI".into()), true),
            (ConditionKind::Language("fr".into()), false),
            (ConditionKind::Edition(r"director'?s?[ ._-]?cut".into()), true),
        ];
        for (kind, expected) in checks {
            let condition = FormatCondition::new("check", kind.clone());
            assert_eq!(
                evaluate_condition(&condition, &attrs, &cache).raw_match,
                expected,
                "{kind:?}"
            );
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let cache = PatternCache::default();
        let condition = FormatCondition::new("HDR", ConditionKind::Title(r"\bhdr\b".into()));
        let attrs = attrs();
        let first = evaluate_condition(&condition, &attrs, &cache);
        let second = evaluate_condition(&condition, &attrs, &cache);
        assert_eq!(first, second);
    }
}
