// SPDX-License-Identifier: GPL-3.0-or-later
use cinegrade_domain::{CustomFormat, ReleaseAttributes};
use cinegrade_formats::FormatCatalog;
use serde::Serialize;
use tracing::trace;

use crate::evaluator::{evaluate_condition, ConditionEvaluation};
use crate::patterns::PatternCache;

/// Every condition of a format evaluated against one release.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatMatch<'a> {
    pub format: &'a CustomFormat,
    pub matched: bool,
    /// One entry per condition, in declaration order.
    pub evaluations: Vec<ConditionEvaluation<'a>>,
}

/// Test `format` against `attributes`.
///
/// All required conditions must match. When the format also has optional
/// conditions, at least one of them must match as well. Every condition is
/// evaluated even after the outcome is known.
pub fn match_format<'a>(
    format: &'a CustomFormat,
    attributes: &ReleaseAttributes,
    patterns: &PatternCache,
) -> FormatMatch<'a> {
    let evaluations: Vec<ConditionEvaluation<'a>> = format
        .conditions
        .iter()
        .map(|condition| evaluate_condition(condition, attributes, patterns))
        .collect();

    let required_ok = evaluations
        .iter()
        .filter(|evaluation| evaluation.condition.required)
        .all(|evaluation| evaluation.matches);

    let mut optional = evaluations
        .iter()
        .filter(|evaluation| !evaluation.condition.required)
        .peekable();
    let optional_ok = optional.peek().is_none() || optional.any(|evaluation| evaluation.matches);

    FormatMatch {
        format,
        matched: required_ok && optional_ok,
        evaluations,
    }
}

/// Full match details for every format, in catalog order.
pub fn evaluate_catalog<'a>(
    catalog: &'a FormatCatalog,
    attributes: &ReleaseAttributes,
    patterns: &PatternCache,
) -> Vec<FormatMatch<'a>> {
    catalog
        .formats()
        .iter()
        .map(|format| match_format(format, attributes, patterns))
        .collect()
}

/// The formats that match `attributes`, in catalog order.
pub fn match_catalog<'a>(
    catalog: &'a FormatCatalog,
    attributes: &ReleaseAttributes,
    patterns: &PatternCache,
) -> Vec<&'a CustomFormat> {
    let matched: Vec<&CustomFormat> = catalog
        .formats()
        .iter()
        .filter(|format| match_format(format, attributes, patterns).matched)
        .collect();

    trace!(
        target: "matching",
        release = %attributes.raw_title,
        matched = matched.len(),
        "catalog matched"
    );
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinegrade_domain::{ConditionKind, FormatCategory, FormatCondition, Resolution, Source};

    fn attrs() -> ReleaseAttributes {
        let mut attrs = ReleaseAttributes::unknown("Film.2020.1080p.BluRay.x264-GRP");
        attrs.resolution = Resolution::R1080p;
        attrs.source = Source::BluRay;
        attrs.release_group = Some("GRP".into());
        attrs
    }

    fn format(conditions: Vec<FormatCondition>) -> CustomFormat {
        CustomFormat::new("f", "F", FormatCategory::Enhancement, 10, conditions)
    }

    fn res(resolution: Resolution) -> ConditionKind {
        ConditionKind::Resolution(resolution)
    }

    #[test]
    fn all_required_conditions_must_match() {
        let cache = PatternCache::default();
        let both = format(vec![
            FormatCondition::new("1080p", res(Resolution::R1080p)),
            FormatCondition::new("BluRay", ConditionKind::Source(Source::BluRay)),
        ]);
        assert!(match_format(&both, &attrs(), &cache).matched);

        let one_fails = format(vec![
            FormatCondition::new("1080p", res(Resolution::R1080p)),
            FormatCondition::new("WEB", ConditionKind::Source(Source::WebDl)),
        ]);
        assert!(!match_format(&one_fails, &attrs(), &cache).matched);
    }

    #[test]
    fn optional_conditions_need_one_hit() {
        let cache = PatternCache::default();
        let any_hd = format(vec![
            FormatCondition::optional("720p", res(Resolution::R720p)),
            FormatCondition::optional("1080p", res(Resolution::R1080p)),
        ]);
        assert!(match_format(&any_hd, &attrs(), &cache).matched);

        let none = format(vec![
            FormatCondition::optional("720p", res(Resolution::R720p)),
            FormatCondition::optional("2160p", res(Resolution::R2160p)),
        ]);
        assert!(!match_format(&none, &attrs(), &cache).matched);
    }

    #[test]
    fn required_and_optional_combine() {
        let cache = PatternCache::default();
        let combined = format(vec![
            FormatCondition::new("BluRay", ConditionKind::Source(Source::BluRay)),
            FormatCondition::optional("720p", res(Resolution::R720p)),
            FormatCondition::optional("1080p", res(Resolution::R1080p)),
        ]);
        assert!(match_format(&combined, &attrs(), &cache).matched);

        let mut other = attrs();
        other.source = Source::WebDl;
        assert!(!match_format(&combined, &other, &cache).matched);
    }

    #[test]
    fn every_condition_is_evaluated() {
        let cache = PatternCache::default();
        let format = format(vec![
            FormatCondition::new("WEB", ConditionKind::Source(Source::WebDl)),
            FormatCondition::new("1080p", res(Resolution::R1080p)),
            FormatCondition::optional("GRP", ConditionKind::ReleaseGroup("^grp$".into())),
        ]);
        let result = match_format(&format, &attrs(), &cache);
        assert!(!result.matched);
        assert_eq!(result.evaluations.len(), 3);
        assert!(result.evaluations[1].matches);
        assert!(result.evaluations[2].matches);
    }

    #[test]
    fn catalog_matches_keep_catalog_order() {
        let cache = PatternCache::default();
        let catalog = FormatCatalog::from_formats(vec![
            CustomFormat::new(
                "b",
                "B",
                FormatCategory::Source,
                1,
                vec![FormatCondition::new("BluRay", ConditionKind::Source(Source::BluRay))],
            ),
            CustomFormat::new(
                "x",
                "X",
                FormatCategory::Resolution,
                1,
                vec![FormatCondition::new("720p", res(Resolution::R720p))],
            ),
            CustomFormat::new(
                "a",
                "A",
                FormatCategory::Resolution,
                1,
                vec![FormatCondition::new("1080p", res(Resolution::R1080p))],
            ),
        ])
        .unwrap();

        let ids: Vec<&str> = match_catalog(&catalog, &attrs(), &cache)
            .iter()
            .map(|format| format.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(evaluate_catalog(&catalog, &attrs(), &cache).len(), 3);
    }

    #[test]
    fn unknown_attributes_do_not_panic_against_builtin_catalog() {
        let cache = PatternCache::default();
        let catalog = FormatCatalog::builtin();
        let attrs = ReleaseAttributes::unknown("");
        let matched = match_catalog(&catalog, &attrs, &cache);
        assert!(matched
            .iter()
            .any(|format| format.id == cinegrade_formats::builtin::ids::RES_UNKNOWN));
    }
}
