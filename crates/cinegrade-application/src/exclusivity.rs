// SPDX-License-Identifier: GPL-3.0-or-later
use std::collections::HashSet;

use cinegrade_domain::CustomFormat;
use cinegrade_formats::ExclusivityTable;
use tracing::debug;

/// Collapse each conflict class to its single best match.
///
/// Within a class the format listed earliest in the priority table wins;
/// unlisted formats rank below every listed one, and ties fall back to
/// catalog order. The winner keeps its original position and formats outside
/// any conflict class pass through untouched. Applying this to its own
/// output changes nothing.
pub fn resolve_exclusivity<'a>(
    matched: Vec<&'a CustomFormat>,
    table: &ExclusivityTable,
) -> Vec<&'a CustomFormat> {
    let mut dropped: HashSet<usize> = HashSet::new();

    for class in table.classes() {
        let members: Vec<usize> = matched
            .iter()
            .enumerate()
            .filter(|(_, format)| format.category == class.category)
            .map(|(index, _)| index)
            .collect();

        if members.len() < 2 {
            continue;
        }

        let winner = members
            .iter()
            .copied()
            .min_by_key(|&index| (class.rank_of(&matched[index].id).unwrap_or(usize::MAX), index));

        if let Some(winner) = winner {
            debug!(
                target: "matching",
                category = %class.category,
                kept = %matched[winner].id,
                collapsed = members.len() - 1,
                "resolved conflicting matches"
            );
            dropped.extend(members.into_iter().filter(|&index| index != winner));
        }
    }

    matched
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !dropped.contains(index))
        .map(|(_, format)| format)
        .collect()
}
