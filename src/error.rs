//! Error types for folder comparison and file diffing.
//!
//! Only input errors surface through the public entry points. I/O failures met
//! while walking a tree or hashing a file are degraded locally and logged.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("Path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Path is not a file: {path}")]
    NotAFile { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Invalid configuration: {message}")]
    Config { message: String },
}

pub type Result<T> = std::result::Result<T, CompareError>;

impl CompareError {
    pub fn path_not_found(path: impl AsRef<Path>) -> Self {
        Self::PathNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn not_a_directory(path: impl AsRef<Path>) -> Self {
        Self::NotADirectory {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn not_a_file(path: impl AsRef<Path>) -> Self {
        Self::NotAFile {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn read_error(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, source: glob::PatternError) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
