// SPDX-License-Identifier: GPL-3.0-or-later

//! Priority tables for categories whose formats must not stack.
//!
//! A release can match several formats of the same conflict class (a title
//! carrying both `HDR` and `HDR10+` tokens, for instance). Only the format
//! ranked highest in the class's priority list contributes to the score.
//! Formats missing from the list rank below every listed one.

use cinegrade_domain::{CustomFormat, FormatCategory};
use serde::{Deserialize, Serialize};

use crate::builtin::ids;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictClass {
    pub category: FormatCategory,
    /// Format ids, best first.
    pub priority: Vec<String>,
}

impl ConflictClass {
    pub fn new<I, S>(category: FormatCategory, priority: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            category,
            priority: priority.into_iter().map(Into::into).collect(),
        }
    }

    /// Position of `format_id` in the priority list (0 is best).
    pub fn rank_of(&self, format_id: &str) -> Option<usize> {
        self.priority.iter().position(|id| id == format_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExclusivityTable {
    classes: Vec<ConflictClass>,
}

impl ExclusivityTable {
    pub fn new(classes: Vec<ConflictClass>) -> Self {
        Self { classes }
    }

    /// HDR is the only built-in conflict class.
    pub fn builtin() -> Self {
        Self::new(vec![ConflictClass::new(
            FormatCategory::Hdr,
            [
                ids::HDR_DV_HDR10PLUS,
                ids::HDR_DV_HDR10,
                ids::HDR_DV,
                ids::HDR_HDR10PLUS,
                ids::HDR_HDR10,
                ids::HDR_GENERIC,
                ids::HDR_HLG,
                ids::HDR_PQ,
            ],
        )])
    }

    /// Copy of the table listing only ids present in `formats`. Classes
    /// stay even when their list ends up empty.
    pub fn restricted_to(&self, formats: &[CustomFormat]) -> Self {
        let classes = self
            .classes
            .iter()
            .map(|class| ConflictClass {
                category: class.category,
                priority: class
                    .priority
                    .iter()
                    .filter(|id| formats.iter().any(|format| &format.id == *id))
                    .cloned()
                    .collect(),
            })
            .collect();
        Self::new(classes)
    }

    pub fn classes(&self) -> &[ConflictClass] {
        &self.classes
    }

    pub fn class_for(&self, category: FormatCategory) -> Option<&ConflictClass> {
        self.classes.iter().find(|class| class.category == category)
    }

    pub fn is_conflict_class(&self, category: FormatCategory) -> bool {
        self.class_for(category).is_some()
    }

    pub fn rank_of(&self, category: FormatCategory, format_id: &str) -> Option<usize> {
        self.class_for(category)
            .and_then(|class| class.rank_of(format_id))
    }
}
