//! Result tree of a folder comparison.

use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    File,
    Directory,
}

/// Status of an entry, read with the left tree as baseline and the right tree
/// as candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Same,
    /// Only on the right.
    Added,
    /// Only on the left.
    Removed,
    Modified,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Same => "same",
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
        }
    }

    pub fn is_same(&self) -> bool {
        matches!(self, Self::Same)
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the comparison tree.
///
/// `path` is relative to both roots and is the key pairing the left and right
/// entries. The root has an empty path and additionally carries the base names
/// of both roots, which may differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_name: Option<String>,
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

/// File counts per status. Directories are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub same: usize,
}

impl TreeStats {
    pub fn total_changes(&self) -> usize {
        self.added + self.removed + self.modified
    }

    pub fn is_identical(&self) -> bool {
        self.total_changes() == 0
    }
}

impl FileNode {
    pub fn file(name: impl Into<String>, path: impl Into<String>, status: NodeStatus) -> Self {
        Self {
            name: name.into(),
            left_name: None,
            right_name: None,
            path: path.into(),
            node_type: NodeType::File,
            status,
            children: None,
        }
    }

    pub fn directory(
        name: impl Into<String>,
        path: impl Into<String>,
        status: NodeStatus,
        children: Vec<FileNode>,
    ) -> Self {
        Self {
            name: name.into(),
            left_name: None,
            right_name: None,
            path: path.into(),
            node_type: NodeType::Directory,
            status,
            children: Some(children),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.node_type == NodeType::Directory
    }

    pub fn children(&self) -> &[FileNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Directories first, then files, each group by name.
    pub(crate) fn sort_children(children: &mut [FileNode]) {
        children.sort_by(|a, b| {
            b.is_dir()
                .cmp(&a.is_dir())
                .then_with(|| a.name.cmp(&b.name))
        });
    }

    /// Locates a node by its relative path. The empty path is the root.
    pub fn find(&self, rel_path: &str) -> Option<&FileNode> {
        let rel_path = rel_path.trim_matches('/');
        if rel_path.is_empty() {
            return Some(self);
        }

        let mut current = self;
        for part in rel_path.split('/').filter(|p| !p.is_empty()) {
            current = current.children().iter().find(|c| c.name == part)?;
        }
        Some(current)
    }

    /// Per-status counts over every file at or below this node.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        self.collect_stats(&mut stats);
        stats
    }

    fn collect_stats(&self, stats: &mut TreeStats) {
        if self.is_dir() {
            for child in self.children() {
                child.collect_stats(stats);
            }
            return;
        }
        match self.status {
            NodeStatus::Same => stats.same += 1,
            NodeStatus::Added => stats.added += 1,
            NodeStatus::Removed => stats.removed += 1,
            NodeStatus::Modified => stats.modified += 1,
        }
    }

    /// A copy of the tree with every `same` node pruned. The node it is
    /// called on is always kept.
    pub fn without_same(&self) -> FileNode {
        let mut pruned = self.clone();
        if let Some(children) = pruned.children.as_mut() {
            *children = self
                .children()
                .iter()
                .filter(|c| !c.status.is_same())
                .map(FileNode::without_same)
                .collect();
        }
        pruned
    }

    /// Depth-first iterator over this node and all of its descendants.
    pub fn iter(&self) -> impl Iterator<Item = &FileNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().iter().rev());
            Some(node)
        })
    }
}
