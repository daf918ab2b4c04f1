//! Configuration management for FolderComp
//!
//! This module provides configuration structures and defaults for folder
//! comparison and file diffing. Values come from a TOML file, environment
//! variables and finally command line flags, each layer overriding the last.

use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::compare::DEFAULT_HASH_BUFFER_SIZE;
use crate::diff::{DiffAlgorithmType, DEFAULT_CONTEXT_LINES};
use crate::error::{CompareError, Result};
use crate::filter::ExclusionFilter;

/// Global configuration for FolderComp
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderCompConfig {
    /// Folder comparison configuration
    pub compare: CompareConfig,
    /// File diff configuration
    pub diff: DiffSettings,
}

/// Configuration for folder comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Glob patterns for file names to leave out
    pub exclude_files: Vec<String>,
    /// Glob patterns for directory names to leave out
    pub exclude_folders: Vec<String>,
    /// Read buffer used when fingerprinting file content
    pub hash_buffer_size: usize,
}

/// Configuration for file diffs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffSettings {
    /// Context lines around each unified hunk
    pub context_lines: usize,
    /// Line alignment algorithm
    pub algorithm: DiffAlgorithmType,
    /// Default width for side-by-side text output
    pub width: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            exclude_files: Vec::new(),
            exclude_folders: Vec::new(),
            hash_buffer_size: DEFAULT_HASH_BUFFER_SIZE,
        }
    }
}

impl Default for DiffSettings {
    fn default() -> Self {
        Self {
            context_lines: DEFAULT_CONTEXT_LINES,
            algorithm: DiffAlgorithmType::default(),
            width: 120,
        }
    }
}

impl CompareConfig {
    /// Compile the exclusion patterns
    pub fn exclusion_filter(&self) -> Result<ExclusionFilter> {
        ExclusionFilter::new(&self.exclude_files, &self.exclude_folders)
    }
}

/// Configuration loading and management
impl FolderCompConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| CompareError::read_error(path, e))?;
        toml::from_str(&text)
            .map_err(|e| CompareError::config(format!("{}: {}", path.display(), e)))
    }

    /// Load configuration from file if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Override values with environment variables if present
    pub fn with_env(mut self) -> Self {
        if let Ok(val) = std::env::var("FOLDERCOMP_CONTEXT_LINES") {
            if let Ok(lines) = val.parse::<usize>() {
                self.diff.context_lines = lines;
            }
        }

        if let Ok(val) = std::env::var("FOLDERCOMP_ALGORITHM") {
            if let Ok(algorithm) = val.parse::<DiffAlgorithmType>() {
                self.diff.algorithm = algorithm;
            }
        }

        if let Ok(val) = std::env::var("FOLDERCOMP_EXCLUDE_FILES") {
            self.compare.exclude_files.extend(split_list(&val));
        }

        if let Ok(val) = std::env::var("FOLDERCOMP_EXCLUDE_FOLDERS") {
            self.compare.exclude_folders.extend(split_list(&val));
        }

        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.compare.hash_buffer_size == 0 {
            return Err(CompareError::config("hash_buffer_size must be greater than 0"));
        }

        if self.diff.width < 20 {
            return Err(CompareError::config("width must be at least 20"));
        }

        self.compare.exclusion_filter().map(|_| ())
    }
}

fn split_list(val: &str) -> impl Iterator<Item = String> + '_ {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
