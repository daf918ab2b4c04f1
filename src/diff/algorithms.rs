use std::hash::Hash;
use std::ops::Range;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use similar::{Algorithm, DiffTag};

/// Kind of a single alignment instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// One alignment instruction covering `old[old_range]` and `new[new_range]`.
///
/// `Delete` has an empty `new_range` and `Insert` an empty `old_range`; the
/// empty range still records the position on that side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub old_range: Range<usize>,
    pub new_range: Range<usize>,
}

impl Opcode {
    pub fn is_equal(&self) -> bool {
        self.tag == OpTag::Equal
    }
}

/// Available diff algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffAlgorithmType {
    /// Myers' O(ND) algorithm, fast and widely used
    #[default]
    Myers,
    /// Patience diff, anchors on unique lines; good for moved blocks
    Patience,
    /// Longest common subsequence, minimal but slower
    Lcs,
}

impl DiffAlgorithmType {
    pub fn all() -> &'static [DiffAlgorithmType] {
        &[Self::Myers, Self::Patience, Self::Lcs]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Myers => "Myers",
            Self::Patience => "Patience",
            Self::Lcs => "LCS",
        }
    }

    fn as_similar(&self) -> Algorithm {
        match self {
            Self::Myers => Algorithm::Myers,
            Self::Patience => Algorithm::Patience,
            Self::Lcs => Algorithm::Lcs,
        }
    }
}

impl std::fmt::Display for DiffAlgorithmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DiffAlgorithmType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

/// Aligns two ordered sequences into equal/replace/delete/insert runs.
///
/// Works on any comparable element: whole lines for file diffs, characters
/// for highlighting inside a changed line. Every index of both inputs is
/// covered by exactly one opcode, in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceAligner {
    algorithm: DiffAlgorithmType,
}

impl SequenceAligner {
    pub fn new(algorithm: DiffAlgorithmType) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> DiffAlgorithmType {
        self.algorithm
    }

    pub fn align<T: Eq + Hash + Ord>(&self, old: &[T], new: &[T]) -> Vec<Opcode> {
        similar::capture_diff_slices(self.algorithm.as_similar(), old, new)
            .into_iter()
            .map(|op| {
                let (tag, old_range, new_range) = op.as_tag_tuple();
                let tag = match tag {
                    DiffTag::Equal => OpTag::Equal,
                    DiffTag::Replace => OpTag::Replace,
                    DiffTag::Delete => OpTag::Delete,
                    DiffTag::Insert => OpTag::Insert,
                };
                Opcode { tag, old_range, new_range }
            })
            .filter(|op| !(op.old_range.is_empty() && op.new_range.is_empty()))
            .collect()
    }
}

/// Groups opcodes into hunks with at most `context` equal elements around
/// each change. Inputs without any change yield no hunks.
pub fn group_opcodes(ops: &[Opcode], context: usize) -> Vec<Vec<Opcode>> {
    if ops.iter().all(Opcode::is_equal) {
        return Vec::new();
    }

    let mut ops = ops.to_vec();
    if let Some(first) = ops.first_mut().filter(|op| op.is_equal()) {
        let skip = first.old_range.len().saturating_sub(context);
        first.old_range.start += skip;
        first.new_range.start += skip;
    }
    if let Some(last) = ops.last_mut().filter(|op| op.is_equal()) {
        let keep = last.old_range.len().min(context);
        last.old_range.end = last.old_range.start + keep;
        last.new_range.end = last.new_range.start + keep;
    }

    let mut groups = Vec::new();
    let mut pending = Vec::new();
    for op in ops {
        if op.is_equal() && op.old_range.len() > context * 2 {
            // Close the current hunk and open the next one inside this run.
            pending.push(Opcode {
                tag: OpTag::Equal,
                old_range: op.old_range.start..op.old_range.start + context,
                new_range: op.new_range.start..op.new_range.start + context,
            });
            groups.push(std::mem::take(&mut pending));
            pending.push(Opcode {
                tag: OpTag::Equal,
                old_range: op.old_range.end - context..op.old_range.end,
                new_range: op.new_range.end - context..op.new_range.end,
            });
            continue;
        }
        pending.push(op);
    }

    if pending.iter().any(|op| !op.is_equal()) {
        groups.push(pending);
    }
    groups.retain(|group| group.iter().any(|op| !op.is_equal()));
    groups
}
