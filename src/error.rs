//! Error types for the sysprop generator

use std::path::PathBuf;

use thiserror::Error;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, SyspropError>;

/// Schema rejections.
///
/// The `Display` text of every variant is part of the tool's contract: build
/// rules and tests match on it verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid module name \"{0}\"")]
    InvalidModuleName(String),

    #[error("Invalid name \"{0}\" in module")]
    InvalidModuleSegment(String),

    #[error("Invalid prefix \"{0}\"")]
    InvalidPrefix(String),

    #[error("There is no defined property")]
    NoProperties,

    #[error("Invalid prop name \"{0}\"")]
    InvalidPropName(String),

    #[error("Invalid enum value \"{value}\" for prop \"{prop}\"")]
    InvalidEnumValue { value: String, prop: String },

    #[error("Duplicated enum value \"{value}\" for prop \"{prop}\"")]
    DuplicatedEnumValue { value: String, prop: String },

    #[error("Prop \"{0}\" owned by platform cannot have vendor. or odm. namespace")]
    PlatformNamespace(String),

    #[error("Duplicated prop name \"{0}\"")]
    DuplicatedPropName(String),

    #[error("Platform-defined properties should have \"android.os.PlatformProperties\" as module name")]
    PlatformModuleRequired,

    #[error("Vendor or Odm cannot use \"android.os.PlatformProperties\" as module name")]
    ReservedModuleName,
}

/// Generator errors
#[derive(Error, Debug)]
pub enum SyspropError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Error parsing file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Unsupported schema format for {}: expected .json or .toml", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("{operation} failed: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Props \"{first}\" and \"{second}\" both map to the Rust item \"{item}\"")]
    RustNameCollision {
        first: String,
        second: String,
        item: String,
    },

    #[error("Enum values \"{first}\" and \"{second}\" of prop \"{prop}\" both map to the Rust variant \"{variant}\"")]
    RustVariantCollision {
        prop: String,
        first: String,
        second: String,
        variant: String,
    },

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl SyspropError {
    /// Wrap an I/O error with the operation that caused it
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        SyspropError::Io {
            operation: operation.into(),
            source,
        }
    }
}
