// SPDX-License-Identifier: GPL-3.0-or-later
use std::fmt::Write;

use cinegrade_domain::ScoringResult;

/// Render a result as a multi-line, human-readable report.
pub fn explain(result: &ScoringResult) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, result);
    out
}

fn write_report(out: &mut String, result: &ScoringResult) -> std::fmt::Result {
    writeln!(out, "Release: {}", result.release_name)?;
    writeln!(out, "Profile: {}", result.profile_name)?;
    if result.is_banned {
        writeln!(out, "Score: {} (BANNED)", result.total_score)?;
    } else {
        writeln!(out, "Score: {}", result.total_score)?;
    }
    writeln!(
        out,
        "Meets minimum: {}",
        if result.meets_minimum { "yes" } else { "no" }
    )?;

    if result.is_banned {
        writeln!(out, "Banned by:")?;
        for reason in &result.banned_reasons {
            writeln!(out, "  - {reason}")?;
        }
    }

    if let Some(reason) = &result.size_rejection_reason {
        writeln!(out, "Size rejected: {reason}")?;
    }

    if result.breakdown.is_empty() {
        writeln!(out, "Breakdown: no scoring formats matched")?;
    } else {
        writeln!(out, "Breakdown:")?;
        for (category, entry) in &result.breakdown {
            writeln!(
                out,
                "  {category}: {:+} ({})",
                entry.subtotal,
                entry.formats.join(", ")
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinegrade_domain::{
        CategoryBreakdown, FormatCategory, ReleaseAttributes, ScoredFormat, TotalScore,
    };
    use std::collections::BTreeMap;

    fn result() -> ScoringResult {
        let mut breakdown = BTreeMap::new();
        breakdown.insert(
            FormatCategory::Source,
            CategoryBreakdown {
                subtotal: 400,
                formats: vec!["BluRay".into()],
            },
        );
        breakdown.insert(
            FormatCategory::Resolution,
            CategoryBreakdown {
                subtotal: -50,
                formats: vec!["720p".into()],
            },
        );
        ScoringResult {
            release_name: "Film.2020.720p.BluRay.x264-GRP".into(),
            profile_name: "Profile".into(),
            total_score: TotalScore::Points(350),
            formats: vec![ScoredFormat {
                id: "src-bluray".into(),
                name: "BluRay".into(),
                category: FormatCategory::Source,
                weight: 400,
            }],
            breakdown,
            meets_minimum: true,
            is_banned: false,
            banned_reasons: Vec::new(),
            size_rejected: false,
            size_rejection_reason: None,
            attributes: ReleaseAttributes::unknown("Film.2020.720p.BluRay.x264-GRP"),
        }
    }

    #[test]
    fn lists_breakdown_with_signs_in_category_order() {
        let text = explain(&result());
        assert_eq!(
            text,
            "Release: Film.2020.720p.BluRay.x264-GRP\n\
             Profile: Profile\n\
             Score: 350\n\
             Meets minimum: yes\n\
             Breakdown:\n  \
             resolution: -50 (720p)\n  \
             source: +400 (BluRay)\n"
        );
    }

    #[test]
    fn shows_ban_and_size_reasons() {
        let mut result = result();
        result.is_banned = true;
        result.total_score = TotalScore::Banned;
        result.meets_minimum = false;
        result.banned_reasons = vec!["Fake HDR Groups".into()];
        result.size_rejected = true;
        result.size_rejection_reason = Some("Size 50.00 MB is below episode minimum of 100 MB".into());

        let text = explain(&result);
        assert!(text.contains("Score: -inf (BANNED)"));
        assert!(text.contains("Banned by:\n  - Fake HDR Groups"));
        assert!(text.contains("Size rejected: Size 50.00 MB is below episode minimum of 100 MB"));
        assert!(text.contains("Meets minimum: no"));
    }

    #[test]
    fn empty_breakdown_is_stated() {
        let mut result = result();
        result.breakdown.clear();
        assert!(explain(&result).contains("Breakdown: no scoring formats matched"));
    }
}
