// SPDX-License-Identifier: GPL-3.0-or-later

//! Declarative custom-format data for the scoring engine.
//!
//! This crate provides:
//! - The built-in rule catalog, one [`CustomFormat`](cinegrade_domain::CustomFormat) per classification
//! - JSON catalog loading for user-authored rule sets
//! - Mutual-exclusivity priority tables per conflict category
//! - Built-in scoring profiles

pub mod builtin;
pub mod catalog;
pub mod error;
pub mod exclusivity;
pub mod profiles;

pub use catalog::FormatCatalog;
pub use error::{CatalogError, Result};
pub use exclusivity::{ConflictClass, ExclusivityTable};
