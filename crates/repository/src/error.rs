// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! Repository errors
//!

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading, saving, or querying spells, collections,
/// designs, or the config
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// An error occured when working with a file or directory
    #[error(transparent)]
    StdIo(#[from] std::io::Error),

    /// A JSON error occured (most likely when reading a JSON file)
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// A JSON file couldn't be parsed (with the path for context)
    #[error("Invalid JSON in {path}: {source}")]
    InvalidFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The platform config directory couldn't be determined
    #[error("Unable to determine the config directory")]
    Config,

    /// No spell matched
    #[error("Spell not found: {0}")]
    SpellNotFound(String),

    /// A design edit named an element cards don't have
    #[error("Unknown card element: {0}")]
    UnknownElement(String),
}
