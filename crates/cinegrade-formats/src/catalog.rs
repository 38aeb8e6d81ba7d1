// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashSet;
use std::path::Path;

use cinegrade_domain::{CustomFormat, FormatCategory, Validate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::builtin;
use crate::error::{CatalogError, Result};
use crate::exclusivity::ExclusivityTable;

/// On-disk shape of a JSON catalog.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    formats: Vec<CustomFormat>,
    #[serde(default)]
    exclusivity: Option<ExclusivityTable>,
}

/// Ordered, read-only collection of custom formats plus the priority tables
/// that govern them. Loaded once and shared across threads.
#[derive(Debug, Clone)]
pub struct FormatCatalog {
    formats: Vec<CustomFormat>,
    exclusivity: ExclusivityTable,
}

impl FormatCatalog {
    /// The compiled-in catalog with the built-in HDR priority table.
    pub fn builtin() -> Self {
        Self {
            formats: builtin::formats(),
            exclusivity: ExclusivityTable::builtin(),
        }
    }

    /// Validate and wrap `formats`, keeping their order. Uses the built-in
    /// priority table restricted to these formats; replace it with
    /// [`FormatCatalog::with_exclusivity`].
    pub fn from_formats(formats: Vec<CustomFormat>) -> Result<Self> {
        check_formats(&formats)?;
        let exclusivity = ExclusivityTable::builtin().restricted_to(&formats);
        Ok(Self {
            formats,
            exclusivity,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut catalog = Self::from_formats(file.formats)?;
        if let Some(table) = file.exclusivity {
            catalog = catalog.with_exclusivity(table)?;
        }
        debug!(
            target: "formats",
            formats = catalog.len(),
            "catalog parsed from JSON"
        );
        Ok(catalog)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        info!(
            target: "formats",
            path = %path.display(),
            formats = catalog.len(),
            "custom format catalog loaded"
        );
        Ok(catalog)
    }

    /// Replace the priority tables. Every listed id must exist in the catalog.
    pub fn with_exclusivity(mut self, table: ExclusivityTable) -> Result<Self> {
        for class in table.classes() {
            for id in &class.priority {
                if self.get(id).is_none() {
                    return Err(CatalogError::UnknownPriorityEntry {
                        category: class.category.to_string(),
                        id: id.clone(),
                    });
                }
            }
        }
        self.exclusivity = table;
        Ok(self)
    }

    pub fn formats(&self) -> &[CustomFormat] {
        &self.formats
    }

    pub fn exclusivity(&self) -> &ExclusivityTable {
        &self.exclusivity
    }

    pub fn get(&self, id: &str) -> Option<&CustomFormat> {
        self.formats.iter().find(|format| format.id == id)
    }

    pub fn by_category(&self, category: FormatCategory) -> impl Iterator<Item = &CustomFormat> {
        self.formats
            .iter()
            .filter(move |format| format.category == category)
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    pub fn to_json_string(&self) -> Result<String> {
        let file = CatalogFile {
            formats: self.formats.clone(),
            exclusivity: Some(self.exclusivity.clone()),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }
}

impl Default for FormatCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_formats(formats: &[CustomFormat]) -> Result<()> {
    let mut seen = HashSet::with_capacity(formats.len());
    for format in formats {
        if !seen.insert(format.id.as_str()) {
            return Err(CatalogError::DuplicateId(format.id.clone()));
        }
        if let Err(errors) = format.validate() {
            let message = errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(CatalogError::InvalidFormat {
                id: format.id.clone(),
                message,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::ids;
    use crate::exclusivity::ConflictClass;
    use cinegrade_domain::{ConditionKind, FormatCondition};

    fn tiny_format(id: &str) -> CustomFormat {
        CustomFormat::new(
            id,
            id.to_uppercase(),
            FormatCategory::Enhancement,
            10,
            vec![FormatCondition::new("t", ConditionKind::Title(id.into()))],
        )
    }

    #[test]
    fn builtin_catalog_is_ordered_and_searchable() {
        let catalog = FormatCatalog::builtin();
        assert!(catalog.len() > 100);
        assert_eq!(catalog.formats()[0].id, ids::RES_2160P);
        assert!(catalog.get(ids::BANNED_FAKE_HDR).is_some());
        assert_eq!(catalog.by_category(FormatCategory::Hdr).count(), 8);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = FormatCatalog::from_formats(vec![tiny_format("a"), tiny_format("a")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn invalid_format_is_rejected() {
        let mut broken = tiny_format("b");
        broken.conditions.clear();
        let err = FormatCatalog::from_formats(vec![broken]).unwrap_err();
        assert!(err.to_string().contains("conditions"));
    }

    #[test]
    fn malformed_regex_is_not_a_load_error() {
        let mut format = tiny_format("c");
        format.conditions[0].kind = ConditionKind::Title("([unclosed".into());
        assert!(FormatCatalog::from_formats(vec![format]).is_ok());
    }

    #[test]
    fn priority_table_must_reference_known_ids() {
        let catalog = FormatCatalog::from_formats(vec![tiny_format("x")]).unwrap();
        let err = catalog
            .with_exclusivity(ExclusivityTable::new(vec![ConflictClass::new(
                FormatCategory::Enhancement,
                ["x", "missing"],
            )]))
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownPriorityEntry { id, .. } if id == "missing"));
    }

    #[test]
    fn json_round_trip_preserves_catalog() {
        let catalog = FormatCatalog::builtin();
        let json = catalog.to_json_string().unwrap();
        let reloaded = FormatCatalog::from_json_str(&json).unwrap();
        assert_eq!(reloaded.formats(), catalog.formats());
        assert_eq!(reloaded.exclusivity(), catalog.exclusivity());
    }

    #[test]
    fn custom_catalog_round_trips_through_json() {
        let catalog = FormatCatalog::from_formats(vec![tiny_format("solo")]).unwrap();
        let json = catalog.to_json_string().unwrap();
        let reloaded = FormatCatalog::from_json_str(&json).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.exclusivity(), catalog.exclusivity());
    }

    #[test]
    fn json_without_exclusivity_keeps_default_table() {
        let json = r#"{"formats":[{"id":"a","name":"A","category":"audio","default_weight":5,
            "conditions":[{"name":"a","kind":"title","value":"\\ba\\b","required":true}]}]}"#;
        let catalog = FormatCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.exclusivity().is_conflict_class(FormatCategory::Hdr));
    }
}
