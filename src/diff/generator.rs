use std::ops::Range;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::algorithms::{group_opcodes, DiffAlgorithmType, OpTag, SequenceAligner};
use super::content::{read_text_lossy, split_lines};
use super::formatter::{DiffFormatter, DEFAULT_CONTEXT_LINES};
use super::rows::{RowAligner, SideBySide};
use crate::error::{CompareError, Result};

/// Which representation a file diff should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffMode {
    #[default]
    Unified,
    SideBySide,
    /// Unified and side-by-side, computed independently.
    Combined,
    /// Both file contents, without alignment.
    Raw,
}

/// Line counts of a diff. `groups` is the number of unified hunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineStats {
    pub added: usize,
    pub removed: usize,
    pub groups: usize,
}

impl LineStats {
    pub fn total_changes(&self) -> usize {
        self.added + self.removed
    }
}

/// Result of diffing two files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOutput {
    pub mode: DiffMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<Vec<String>>,
    #[serde(flatten)]
    pub side_by_side: Option<SideBySide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<LineStats>,
}

impl DiffOutput {
    fn empty(mode: DiffMode) -> Self {
        Self {
            mode,
            diff: None,
            side_by_side: None,
            left_content: None,
            right_content: None,
            stats: None,
        }
    }

    /// Row index ranges of each maximal run of changed rows.
    pub fn change_groups(&self) -> Vec<Range<usize>> {
        self.side_by_side
            .as_ref()
            .map(SideBySide::change_groups)
            .unwrap_or_default()
    }

    /// Start row of the first change group beginning after `row`.
    pub fn next_change(&self, row: usize) -> Option<usize> {
        self.change_groups()
            .into_iter()
            .map(|g| g.start)
            .find(|&start| start > row)
    }

    /// Start row of the last change group beginning before `row`.
    pub fn prev_change(&self, row: usize) -> Option<usize> {
        self.change_groups()
            .into_iter()
            .map(|g| g.start)
            .filter(|&start| start < row)
            .last()
    }
}

/// High-level entry point turning two texts into a [`DiffOutput`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffGenerator {
    formatter: DiffFormatter,
}

impl DiffGenerator {
    pub fn new(algorithm: DiffAlgorithmType) -> Self {
        Self {
            formatter: DiffFormatter::new(SequenceAligner::new(algorithm), DEFAULT_CONTEXT_LINES),
        }
    }

    pub fn with_formatter(formatter: DiffFormatter) -> Self {
        Self { formatter }
    }

    pub fn algorithm(&self) -> DiffAlgorithmType {
        self.formatter.aligner().algorithm()
    }

    pub fn formatter(&self) -> &DiffFormatter {
        &self.formatter
    }

    pub fn generate(&self, left: &str, right: &str, mode: DiffMode) -> DiffOutput {
        let mut output = DiffOutput::empty(mode);

        if mode == DiffMode::Raw {
            output.left_content = Some(left.to_string());
            output.right_content = Some(right.to_string());
            return output;
        }

        let left_lines = split_lines(left);
        let right_lines = split_lines(right);
        let aligner = self.formatter.aligner();
        let ops = aligner.align(&left_lines, &right_lines);

        let mut stats = LineStats::default();
        for op in ops.iter().filter(|op| op.tag != OpTag::Equal) {
            stats.removed += op.old_range.len();
            stats.added += op.new_range.len();
        }
        stats.groups = group_opcodes(&ops, self.formatter.context_lines()).len();
        output.stats = Some(stats);

        if matches!(mode, DiffMode::Unified | DiffMode::Combined) {
            output.diff = Some(self.formatter.unified_from_ops(&left_lines, &right_lines, &ops));
        }
        if matches!(mode, DiffMode::SideBySide | DiffMode::Combined) {
            output.side_by_side = Some(RowAligner::align(aligner, &left_lines, &right_lines, &ops));
        }

        tracing::debug!(
            "Generated {:?} diff: +{} -{} in {} group(s)",
            mode,
            stats.added,
            stats.removed,
            stats.groups
        );
        output
    }

    /// Diffs two files on disk. Both paths must exist and be files; content
    /// that cannot be read is diffed as empty.
    pub fn diff_files<P: AsRef<Path>, Q: AsRef<Path>>(&self, left: P, right: Q, mode: DiffMode) -> Result<DiffOutput> {
        let (left, right) = (left.as_ref(), right.as_ref());
        for path in [left, right] {
            if !path.exists() {
                return Err(CompareError::path_not_found(path));
            }
            if path.is_dir() {
                return Err(CompareError::not_a_file(path));
            }
        }

        let left_text = read_or_empty(left);
        let right_text = read_or_empty(right);
        Ok(self.generate(&left_text, &right_text, mode))
    }
}

fn read_or_empty(path: &Path) -> String {
    read_text_lossy(path).unwrap_or_else(|err| {
        tracing::warn!("{}", err);
        String::new()
    })
}

/// Builder for configuring diff generation
pub struct DiffConfig {
    algorithm: DiffAlgorithmType,
    context_lines: usize,
}

impl DiffConfig {
    pub fn new() -> Self {
        Self {
            algorithm: DiffAlgorithmType::default(),
            context_lines: DEFAULT_CONTEXT_LINES,
        }
    }

    pub fn algorithm(mut self, algorithm: DiffAlgorithmType) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn context_lines(mut self, lines: usize) -> Self {
        self.context_lines = lines;
        self
    }

    pub fn build(self) -> DiffGenerator {
        DiffGenerator::with_formatter(DiffFormatter::new(
            SequenceAligner::new(self.algorithm),
            self.context_lines,
        ))
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self::new()
    }
}
