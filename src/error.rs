//! Error types for the file-system inventory.
//!
//! Only load-time failures surface as errors. Problems with an individual
//! definition file are reported through the diagnostics sink and never abort
//! a run.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for inventory operations.
pub type InventoryResult<T> = std::result::Result<T, InventoryError>;

/// Errors that can occur while generating an inventory
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A classification map file could not be read or parsed.
    #[error("failed to load classification map '{path}': {message}")]
    ClassificationMapLoad {
        /// Path to the map file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// A classification map has the wrong top-level shape.
    #[error("invalid classification map: {0}")]
    InvalidClassificationMap(String),

    /// The definitions root could not be listed.
    #[error("cannot read definitions directory '{path}': {message}")]
    DefinitionsDirectory {
        /// Path to the definitions root
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// A definition file parsed but does not have a usable shape.
    #[error("unexpected layout in definition file '{path}': {message}")]
    DefinitionShape {
        /// Path to the definition file
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// A required option was not supplied by any configuration source.
    #[error("missing required option: {0}")]
    MissingOption(String),

    /// An option was supplied with an unusable value.
    #[error("invalid configuration value for '{key}': {message}")]
    InvalidConfig {
        /// Configuration key
        key: String,
        /// Error message
        message: String,
    },

    #[error("host not found: {0}")]
    HostNotFound(String),
}

impl InventoryError {
    /// Creates a classification map load error.
    pub fn classification_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ClassificationMapLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            InventoryError::MissingOption(_) | InventoryError::InvalidConfig { .. } => 2,
            InventoryError::ClassificationMapLoad { .. }
            | InventoryError::InvalidClassificationMap(_) => 3,
            InventoryError::DefinitionsDirectory { .. } => 4,
            InventoryError::HostNotFound(_) => 5,
            _ => 1,
        }
    }
}
