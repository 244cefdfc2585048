//! Error types for template and watcher operations.
//!
//! Every fallible library operation returns [`ScaffoldError`]. Per-file
//! generation problems are not errors; they are collected as warnings in a
//! [`GenerateReport`](crate::engine::GenerateReport).

use std::{io, path::PathBuf};

use thiserror::Error;

/// Categorized failure of a store, engine or watcher operation.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// A template, file or directory does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A path exists but is not a directory.
    #[error("path is a file, not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A directory exists but cannot be listed.
    #[error("permission denied: cannot access directory {}", .0.display())]
    PermissionDenied(PathBuf),

    /// The template failed structural validation. Nothing was written.
    #[error("template '{name}' is invalid: {}", .errors.join("; "))]
    SchemaInvalid { name: String, errors: Vec<String> },

    /// A JSON document could not be parsed or decoded.
    #[error("malformed JSON in {}: {source}", .path.display())]
    MalformedInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A template name that would escape its namespace directory.
    #[error("invalid template name '{0}'")]
    InvalidName(String),

    /// A descriptor value that would place files outside the output directory.
    #[error("project value '{0}' must not contain a path separator")]
    UnsafeProjectValue(String),

    /// The out-of-process generator could not be run or reported failure.
    #[error("generator failed: {0}")]
    GeneratorFailed(String),

    /// Filesystem failure outside per-file generation.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScaffoldError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, ScaffoldError>;
