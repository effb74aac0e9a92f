//! Error types for the migration engine
//!
//! Every failure the core can report is a variant of [`MigrationError`].
//! Adapter implementations report their own failures as [`PlatformError`],
//! which the engine wraps without interpretation.

use thiserror::Error;

/// Failure reported by a platform adapter (source or target workspace)
#[derive(Debug, Error)]
#[error("{operation} failed: {message}")]
pub struct PlatformError {
    /// Adapter operation that failed (e.g. "get_items")
    pub operation: String,
    /// Human readable cause
    pub message: String,
}

impl PlatformError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// A value extraction failure for one field of one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError {
    pub list: String,
    pub item_id: u32,
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} item {} field '{}': {}",
            self.list, self.item_id, self.field, self.message
        )
    }
}

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("no qualifying lists in '{workspace}' after excluding system paths")]
    NoQualifyingLists { workspace: String },

    #[error("malformed value in field '{field}' ({kind}): {detail}")]
    MalformedFieldValue {
        field: String,
        kind: String,
        detail: String,
    },

    #[error("schema of field '{field}' is not well-formed markup: {detail}")]
    SchemaParse { field: String, detail: String },

    #[error("field '{field}' is defined more than once in list '{list}'")]
    DuplicateField { list: String, field: String },

    #[error("palette document is invalid: {detail}")]
    PaletteFormat { detail: String },

    #[error("template '{name}' does not exist in '{location}'")]
    TemplateNotFound { name: String, location: String },

    #[error("restored page path already exists: {}", paths.join(", "))]
    PathRestoreConflict { paths: Vec<String> },

    #[error(
        "list '{list}': {} item value(s) failed to extract (threshold {threshold})",
        errors.len()
    )]
    TooManyItemErrors {
        list: String,
        threshold: usize,
        errors: Vec<ItemError>,
    },

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("template store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("template '{name}' could not be (de)serialized: {detail}")]
    TemplateFormat { name: String, detail: String },
}

pub type Result<T, E = MigrationError> = std::result::Result<T, E>;
