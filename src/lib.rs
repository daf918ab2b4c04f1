//! FolderComp - compare two directory trees and diff the files that differ.
//!
//! The crate exposes two entry points: [`compare_trees`] builds a status tree
//! for two roots, and [`diff_files`] renders the difference between two files
//! as unified hunks, aligned side-by-side rows, or both.
//!
//! # Example
//!
//! ```no_run
//! use foldercomp::{compare_trees, diff_files, DiffMode, NodeStatus};
//!
//! # fn example() -> foldercomp::Result<()> {
//! let tree = compare_trees("left", "right", &["*.tmp"], &[".git"])?;
//! for node in tree.iter().filter(|n| !n.is_dir() && n.status == NodeStatus::Modified) {
//!     let left = std::path::Path::new("left").join(&node.path);
//!     let right = std::path::Path::new("right").join(&node.path);
//!     let diff = diff_files(&left, &right, DiffMode::SideBySide)?;
//!     println!("{}: {:?}", node.path, diff.stats);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::Path;

pub mod cli;
pub mod compare;
pub mod config;
pub mod diff;
pub mod error;
pub mod filter;

pub use compare::{EqualityOracle, FileNode, NodeStatus, NodeType, TreeComparator, TreeStats};
pub use config::FolderCompConfig;
pub use diff::{
    DiffConfig, DiffGenerator, DiffMode, DiffOutput, DiffRow, DiffSegment, LineStats, RowKind,
    SegmentKind, SequenceAligner,
};
pub use error::{CompareError, Result};
pub use filter::ExclusionFilter;

/// Compares two directory trees with default settings.
///
/// Fails only when a root does not exist or a pattern is not a valid glob.
pub fn compare_trees<P, Q, S>(left_root: P, right_root: Q, exclude_files: &[S], exclude_folders: &[S]) -> Result<FileNode>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    S: AsRef<str>,
{
    let filter = ExclusionFilter::new(exclude_files, exclude_folders)?;
    TreeComparator::new(filter).compare(left_root, right_root)
}

/// Diffs two files with default settings.
pub fn diff_files<P: AsRef<Path>, Q: AsRef<Path>>(left_path: P, right_path: Q, mode: DiffMode) -> Result<DiffOutput> {
    DiffGenerator::default().diff_files(left_path, right_path, mode)
}
