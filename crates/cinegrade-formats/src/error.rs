// SPDX-License-Identifier: GPL-3.0-or-later

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate custom format id: {0}")]
    DuplicateId(String),

    #[error("Invalid custom format {id}: {message}")]
    InvalidFormat { id: String, message: String },

    #[error("Priority table references unknown format {id} in {category} class")]
    UnknownPriorityEntry { category: String, id: String },
}
