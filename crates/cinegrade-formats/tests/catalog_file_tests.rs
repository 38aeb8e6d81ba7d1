// SPDX-License-Identifier: GPL-3.0-or-later

use cinegrade_domain::FormatCategory;
use cinegrade_formats::{CatalogError, FormatCatalog};
use std::io::Write;
use tempfile::NamedTempFile;

const CATALOG: &str = r#"{
  "formats": [
    {
      "id": "hdr-plain",
      "name": "HDR",
      "category": "hdr",
      "default_weight": 100,
      "conditions": [{ "name": "HDR", "kind": "hdr", "value": "hdr", "required": true }]
    },
    {
      "id": "hdr-dv",
      "name": "DV",
      "category": "hdr",
      "default_weight": 300,
      "conditions": [{ "name": "DV", "kind": "hdr", "value": "dolby-vision", "required": true }]
    },
    {
      "id": "grp-bad",
      "name": "Bad Group",
      "category": "banned",
      "default_weight": -999999,
      "conditions": [
        { "name": "BadGrp", "kind": "release_group", "value": "^BadGrp$" },
        { "name": "Worse", "kind": "release_group", "value": "^Worse$" }
      ]
    }
  ],
  "exclusivity": [
    { "category": "hdr", "priority": ["hdr-dv", "hdr-plain"] }
  ]
}"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn loads_catalog_from_file() {
    let file = write_temp(CATALOG);
    let catalog = FormatCatalog::from_json_file(file.path()).expect("catalog should load");

    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.formats()[0].id, "hdr-plain");
    assert_eq!(
        catalog.exclusivity().rank_of(FormatCategory::Hdr, "hdr-dv"),
        Some(0)
    );
    assert_eq!(catalog.by_category(FormatCategory::Banned).count(), 1);
}

#[test]
fn missing_file_reports_path() {
    let err = FormatCatalog::from_json_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
    assert!(err.to_string().contains("/definitely/not/here.json"));
}

#[test]
fn malformed_json_is_an_error() {
    let file = write_temp("{ \"formats\": [ ");
    let err = FormatCatalog::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err, CatalogError::Json(_)));
}

#[test]
fn unknown_condition_kind_is_an_error() {
    let file = write_temp(
        r#"{"formats":[{"id":"x","name":"X","category":"codec","default_weight":1,
        "conditions":[{"name":"x","kind":"bitrate","value":5}]}]}"#,
    );
    assert!(FormatCatalog::from_json_file(file.path()).is_err());
}
