use glob::Pattern;

use crate::compare::NodeType;
use crate::error::{CompareError, Result};

/// Decides which directory entries are left out of a comparison.
///
/// File names and directory names are matched against separate pattern sets
/// using shell-style wildcards (`*`, `?`, `[...]`). Matching is done on the
/// entry's own name, never on its relative path.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    file_patterns: Vec<Pattern>,
    dir_patterns: Vec<Pattern>,
}

impl ExclusionFilter {
    pub fn new<S: AsRef<str>>(exclude_files: &[S], exclude_folders: &[S]) -> Result<Self> {
        Ok(Self {
            file_patterns: compile(exclude_files)?,
            dir_patterns: compile(exclude_folders)?,
        })
    }

    /// A filter that keeps every entry.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_excluded(&self, name: &str, kind: NodeType) -> bool {
        let patterns = match kind {
            NodeType::File => &self.file_patterns,
            NodeType::Directory => &self.dir_patterns,
        };
        patterns.iter().any(|pattern| pattern.matches(name))
    }

    pub fn is_empty(&self) -> bool {
        self.file_patterns.is_empty() && self.dir_patterns.is_empty()
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            let p = p.as_ref();
            Pattern::new(p).map_err(|e| CompareError::invalid_pattern(p, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_patterns_only_apply_to_files() {
        let filter = ExclusionFilter::new(&["*.tmp"], &["build"]).unwrap();

        assert!(filter.is_excluded("scratch.tmp", NodeType::File));
        assert!(!filter.is_excluded("scratch.tmp", NodeType::Directory));
        assert!(filter.is_excluded("build", NodeType::Directory));
        assert!(!filter.is_excluded("build", NodeType::File));
    }

    #[test]
    fn test_wildcards() {
        let filter = ExclusionFilter::new(&["file?.log", "[ab]*.txt"], &["__pycache__"]).unwrap();

        assert!(filter.is_excluded("file1.log", NodeType::File));
        assert!(!filter.is_excluded("file10.log", NodeType::File));
        assert!(filter.is_excluded("alpha.txt", NodeType::File));
        assert!(filter.is_excluded("beta.txt", NodeType::File));
        assert!(!filter.is_excluded("gamma.txt", NodeType::File));
        assert!(filter.is_excluded("__pycache__", NodeType::Directory));
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = ExclusionFilter::none();
        assert!(filter.is_empty());
        assert!(!filter.is_excluded(".git", NodeType::Directory));
        assert!(!filter.is_excluded("a.tmp", NodeType::File));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let result = ExclusionFilter::new(&["[unclosed"], &[] as &[&str]);
        assert!(matches!(result, Err(CompareError::InvalidPattern { .. })));
    }
}
