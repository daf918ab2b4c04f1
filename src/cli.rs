use std::path::{Path, PathBuf};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::FolderCompConfig;
use crate::error::CompareError;
use crate::diff::{DiffAlgorithmType, DiffMode};

#[derive(Parser)]
#[command(name = "foldercomp")]
#[command(author = "FolderComp Team")]
#[command(version)]
#[command(about = "Compare two directory trees and diff the files that differ")]
#[command(long_about = "FolderComp walks two directory trees side by side, classifies every entry as same, added, removed or modified, and renders unified or side-by-side diffs with intra-line highlighting for changed files.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file
    #[arg(long, global = true, value_name = "FILE", help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Disable colors in output
    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compare two directory trees
    Compare {
        #[arg(value_name = "LEFT", help = "Baseline directory")]
        left: PathBuf,

        #[arg(value_name = "RIGHT", help = "Candidate directory")]
        right: PathBuf,

        #[arg(long, value_delimiter = ',', help = "File name patterns to exclude (e.g., *.tmp,*.log)")]
        exclude_files: Vec<String>,

        #[arg(long, value_delimiter = ',', help = "Folder name patterns to exclude (e.g., .git,target)")]
        exclude_folders: Vec<String>,

        #[arg(long, default_value = "tree", help = "Output format")]
        output: CompareOutput,

        #[arg(long, help = "Hide entries that are identical on both sides")]
        hide_same: bool,
    },

    /// Diff two files
    Diff {
        #[arg(value_name = "LEFT", help = "Baseline file")]
        left: PathBuf,

        #[arg(value_name = "RIGHT", help = "Candidate file")]
        right: PathBuf,

        #[arg(short, long, default_value = "unified", help = "Diff representation")]
        mode: DiffMode,

        #[arg(long, default_value = "text", help = "Output format")]
        output: DiffOutputFormat,

        #[arg(long, help = "Number of context lines in unified diffs")]
        context: Option<usize>,

        #[arg(long, help = "Line alignment algorithm")]
        algorithm: Option<DiffAlgorithmType>,

        #[arg(long, help = "Total width of side-by-side text output")]
        width: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompareOutput {
    /// Indented tree with status markers (default)
    Tree,
    /// JSON result tree for scripting
    Json,
    /// Counts per status only
    Summary,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DiffOutputFormat {
    /// Plain text output (default)
    Text,
    /// JSON output for scripting
    Json,
}

impl Cli {
    pub fn setup_logging(&self) {
        let level = if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }

    /// Configuration from file and environment, with command line flags
    /// applied on top.
    pub fn load_config(&self) -> crate::Result<FolderCompConfig> {
        let mut config = FolderCompConfig::load_or_default(self.config.as_deref())?.with_env();

        match &self.command {
            Command::Compare {
                exclude_files,
                exclude_folders,
                ..
            } => {
                config.compare.exclude_files.extend(exclude_files.iter().cloned());
                config.compare.exclude_folders.extend(exclude_folders.iter().cloned());
            }
            Command::Diff {
                context,
                algorithm,
                width,
                ..
            } => {
                if let Some(context) = context {
                    config.diff.context_lines = *context;
                }
                if let Some(algorithm) = algorithm {
                    config.diff.algorithm = *algorithm;
                }
                if let Some(width) = width {
                    config.diff.width = *width;
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Compare { left, right, .. } => {
                for path in [left, right] {
                    require_exists(path)?;
                    if !path.is_dir() {
                        return Err(CompareError::not_a_directory(path).to_string());
                    }
                }
            }
            Command::Diff { left, right, .. } => {
                for path in [left, right] {
                    require_exists(path)?;
                    if path.is_dir() {
                        return Err(CompareError::not_a_file(path).to_string());
                    }
                }
            }
        }
        Ok(())
    }
}

fn require_exists(path: &Path) -> Result<(), String> {
    if path.exists() {
        Ok(())
    } else {
        Err(CompareError::path_not_found(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_compare() {
        let cli = Cli::parse_from([
            "foldercomp",
            "compare",
            "a",
            "b",
            "--exclude-files",
            "*.tmp,*.log",
            "--output",
            "json",
        ]);

        match cli.command {
            Command::Compare {
                exclude_files,
                output,
                hide_same,
                ..
            } => {
                assert_eq!(exclude_files, vec!["*.tmp", "*.log"]);
                assert!(matches!(output, CompareOutput::Json));
                assert!(!hide_same);
            }
            Command::Diff { .. } => panic!("Expected compare command"),
        }
    }

    #[test]
    fn test_parse_diff_mode() {
        let cli = Cli::parse_from(["foldercomp", "--verbose", "diff", "l.txt", "r.txt", "--mode", "side-by-side"]);

        assert!(cli.verbose);
        match cli.command {
            Command::Diff { mode, algorithm, .. } => {
                assert_eq!(mode, DiffMode::SideBySide);
                assert!(algorithm.is_none());
            }
            Command::Compare { .. } => panic!("Expected diff command"),
        }
    }

    #[test]
    fn test_validate_rejects_missing_paths() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        let cli = Cli::parse_from([
            "foldercomp",
            "compare",
            dir.path().to_str().unwrap(),
            missing.to_str().unwrap(),
        ]);

        let err = cli.validate().unwrap_err();
        assert!(err.contains("does not exist"));
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from(["foldercomp", "diff", "l", "r", "--context", "9", "--algorithm", "lcs"]);
        let config = cli.load_config().unwrap();

        assert_eq!(config.diff.context_lines, 9);
        assert_eq!(config.diff.algorithm, DiffAlgorithmType::Lcs);
    }
}
