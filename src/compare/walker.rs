use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs::{self, Metadata};
use std::path::Path;

use super::equality::EqualityOracle;
use super::node::{FileNode, NodeStatus, NodeType};
use crate::error::{CompareError, Result};
use crate::filter::ExclusionFilter;

/// Walks two directory trees in lockstep and classifies every entry.
///
/// Entries are paired by their path relative to the roots. A directory that
/// cannot be listed keeps an empty listing and is reported as modified, and
/// unreadable or special files compare as modified, so a partial failure
/// never aborts the whole walk.
#[derive(Debug, Clone, Default)]
pub struct TreeComparator {
    filter: ExclusionFilter,
    oracle: EqualityOracle,
}

impl TreeComparator {
    pub fn new(filter: ExclusionFilter) -> Self {
        Self {
            filter,
            oracle: EqualityOracle::default(),
        }
    }

    pub fn with_oracle(mut self, oracle: EqualityOracle) -> Self {
        self.oracle = oracle;
        self
    }

    pub fn compare<P: AsRef<Path>, Q: AsRef<Path>>(&self, left_root: P, right_root: Q) -> Result<FileNode> {
        let (left_root, right_root) = (left_root.as_ref(), right_root.as_ref());

        let left_meta = fs::metadata(left_root).map_err(|_| CompareError::path_not_found(left_root))?;
        let right_meta = fs::metadata(right_root).map_err(|_| CompareError::path_not_found(right_root))?;
        if !left_meta.is_dir() {
            return Err(CompareError::not_a_directory(left_root));
        }
        if !right_meta.is_dir() {
            return Err(CompareError::not_a_directory(right_root));
        }

        tracing::info!("Comparing {} with {}", left_root.display(), right_root.display());
        if !self.filter.is_empty() {
            tracing::debug!("Exclusions: {:?}", self.filter);
        }

        let left_name = display_name(left_root);
        let right_name = display_name(right_root);

        let mut root = self.visit_both(left_root, right_root, &left_meta, &right_meta, "", &left_name);
        root.left_name = Some(left_name);
        root.right_name = Some(right_name);

        let stats = root.stats();
        tracing::info!(
            "Comparison finished: {} modified, {} added, {} removed, {} same",
            stats.modified,
            stats.added,
            stats.removed,
            stats.same
        );

        Ok(root)
    }

    fn visit(
        &self,
        left: &Path,
        right: &Path,
        left_meta: Option<Metadata>,
        right_meta: Option<Metadata>,
        rel_path: &str,
        name: &str,
    ) -> Option<FileNode> {
        match (left_meta, right_meta) {
            (Some(l), Some(r)) => Some(self.visit_both(left, right, &l, &r, rel_path, name)),
            (Some(l), None) => Some(self.visit_one_side(left, l.is_dir(), NodeStatus::Removed, rel_path, name)),
            (None, Some(r)) => Some(self.visit_one_side(right, r.is_dir(), NodeStatus::Added, rel_path, name)),
            (None, None) => {
                tracing::debug!("Entry vanished during comparison: {}", rel_path);
                None
            }
        }
    }

    fn visit_both(
        &self,
        left: &Path,
        right: &Path,
        left_meta: &Metadata,
        right_meta: &Metadata,
        rel_path: &str,
        name: &str,
    ) -> FileNode {
        match (left_meta.is_dir(), right_meta.is_dir()) {
            (false, false) => {
                let status = if self.oracle.files_equal(left, right) {
                    NodeStatus::Same
                } else {
                    NodeStatus::Modified
                };
                FileNode::file(name, rel_path, status)
            }
            (true, true) => {
                tracing::debug!("Comparing directory '{}'", rel_path);

                let left_entries = list_dir(left);
                let right_entries = list_dir(right);
                let unlisted = left_entries.is_none() || right_entries.is_none();

                let mut entries: BTreeSet<OsString> = left_entries.unwrap_or_default().into_iter().collect();
                entries.extend(right_entries.unwrap_or_default());

                let mut children = Vec::with_capacity(entries.len());
                for entry in entries {
                    let child_left = left.join(&entry);
                    let child_right = right.join(&entry);
                    let child_left_meta = fs::metadata(&child_left).ok();
                    let child_right_meta = fs::metadata(&child_right).ok();

                    let Some(kind) = entry_kind(child_left_meta.as_ref(), child_right_meta.as_ref()) else {
                        continue;
                    };
                    let child_name = entry.to_string_lossy().into_owned();
                    if self.filter.is_excluded(&child_name, kind) {
                        tracing::debug!("Excluded '{}'", join_rel(rel_path, &child_name));
                        continue;
                    }

                    let child_rel = join_rel(rel_path, &child_name);
                    if let Some(node) = self.visit(
                        &child_left,
                        &child_right,
                        child_left_meta,
                        child_right_meta,
                        &child_rel,
                        &child_name,
                    ) {
                        children.push(node);
                    }
                }

                FileNode::sort_children(&mut children);
                // An unlistable side can hide differences.
                let status = if !unlisted && children.iter().all(|c| c.status.is_same()) {
                    NodeStatus::Same
                } else {
                    NodeStatus::Modified
                };
                FileNode::directory(name, rel_path, status, children)
            }
            _ => {
                // A file facing a directory: the two sides are not walked.
                tracing::debug!("Type mismatch at '{}'", rel_path);
                FileNode::directory(name, rel_path, NodeStatus::Modified, Vec::new())
            }
        }
    }

    /// Lists a subtree that exists on one side only, tagging every
    /// descendant with `status`.
    fn visit_one_side(&self, path: &Path, is_dir: bool, status: NodeStatus, rel_path: &str, name: &str) -> FileNode {
        if !is_dir {
            return FileNode::file(name, rel_path, status);
        }

        let mut children = Vec::new();
        for entry in list_dir(path).unwrap_or_default() {
            let child = path.join(&entry);
            let Ok(meta) = fs::metadata(&child) else {
                continue;
            };
            let child_name = entry.to_string_lossy().into_owned();
            let kind = if meta.is_dir() { NodeType::Directory } else { NodeType::File };
            if self.filter.is_excluded(&child_name, kind) {
                continue;
            }

            let child_rel = join_rel(rel_path, &child_name);
            children.push(self.visit_one_side(&child, meta.is_dir(), status, &child_rel, &child_name));
        }

        FileNode::sort_children(&mut children);
        FileNode::directory(name, rel_path, status, children)
    }
}

/// Kind used for exclusion matching. An entry that is a directory on either
/// side is treated as a directory.
fn entry_kind(left: Option<&Metadata>, right: Option<&Metadata>) -> Option<NodeType> {
    if left.is_none() && right.is_none() {
        return None;
    }
    let is_dir = left.is_some_and(Metadata::is_dir) || right.is_some_and(Metadata::is_dir);
    Some(if is_dir { NodeType::Directory } else { NodeType::File })
}

/// Entry names of `path`, or `None` when the directory cannot be opened.
fn list_dir(path: &Path) -> Option<Vec<OsString>> {
    let reader = match fs::read_dir(path) {
        Ok(reader) => reader,
        Err(err) => {
            tracing::warn!("Could not list {}: {}", path.display(), err);
            return None;
        }
    };

    let entries = reader
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.file_name()),
            Err(err) => {
                tracing::warn!("Error reading entry in {}: {}", path.display(), err);
                None
            }
        })
        .collect();
    Some(entries)
}

fn join_rel(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_join_rel() {
        assert_eq!(join_rel("", "a"), "a");
        assert_eq!(join_rel("a/b", "c"), "a/b/c");
    }

    #[test]
    fn test_entry_kind_prefers_directory() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "f", "x");
        let file_meta = fs::metadata(dir.path().join("f")).unwrap();
        let dir_meta = fs::metadata(dir.path()).unwrap();

        assert_eq!(entry_kind(Some(&file_meta), Some(&dir_meta)), Some(NodeType::Directory));
        assert_eq!(entry_kind(Some(&file_meta), None), Some(NodeType::File));
        assert_eq!(entry_kind(None, None), None);
    }

    #[test]
    fn test_root_names() {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();

        let root = TreeComparator::default().compare(left.path(), right.path()).unwrap();
        assert_eq!(root.path, "");
        assert_eq!(root.left_name.as_deref(), Some(display_name(left.path()).as_str()));
        assert_eq!(root.right_name.as_deref(), Some(display_name(right.path()).as_str()));
        // Empty on both sides is vacuously the same.
        assert_eq!(root.status, NodeStatus::Same);
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_type_mismatch_is_modified_and_not_walked() {
        let left = TempDir::new().unwrap();
        let right = TempDir::new().unwrap();
        write(left.path(), "thing/inner.txt", "a");
        write(right.path(), "thing", "now a file");

        let root = TreeComparator::default().compare(left.path(), right.path()).unwrap();
        let thing = root.find("thing").unwrap();
        assert_eq!(thing.status, NodeStatus::Modified);
        assert_eq!(thing.node_type, NodeType::Directory);
        assert!(thing.children().is_empty());
        assert_eq!(root.status, NodeStatus::Modified);
    }

    #[test]
    fn test_missing_root_is_rejected() {
        let left = TempDir::new().unwrap();
        let missing = left.path().join("nope");

        let result = TreeComparator::default().compare(left.path(), &missing);
        assert!(matches!(result, Err(CompareError::PathNotFound { .. })));
    }
}
