//! Error types for papis-config

use std::path::PathBuf;

use crate::value::ValueKind;

/// Result type for papis-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or resolving configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Key has neither a loaded value nor a registered default
    #[error("No default value registered for '{key}' in section [{section}]")]
    MissingDefault { section: String, key: String },

    /// Library section exists but does not describe where its documents live
    #[error("Library '{library}' is misconfigured: {message}")]
    LibraryConfig { library: String, message: String },

    /// Identifier is neither a library section nor an existing path
    #[error("Path or library '{identifier}' does not seem to exist")]
    LibraryNotFound { identifier: String },

    /// Loaded text could not be coerced into the requested kind
    #[error("Value '{value}' of [{section}] {key} is not a valid {expected}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        expected: ValueKind,
    },

    /// Registered default has a kind the caller cannot use
    #[error("Default for '{key}' is a {found}, not a {expected}")]
    TypeMismatch {
        key: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// Setting resolved to an unset (null) default
    #[error("Setting '{key}' has no value")]
    Unset { key: String },

    #[error("Failed to parse {} at line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Lock acquisition failed for {}", path.display())]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
