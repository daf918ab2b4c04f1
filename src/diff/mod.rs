//! Line diff generation and formatting module
//!
//! Lines are aligned with a sequence diff, then rendered either as unified
//! hunks or as paired side-by-side rows with character-level highlighting
//! for modified lines.

pub mod algorithms;
pub mod content;
pub mod formatter;
pub mod generator;
pub mod rows;

// Re-export the main types for easier use
pub use algorithms::{group_opcodes, DiffAlgorithmType, OpTag, Opcode, SequenceAligner};
pub use content::{read_text_lossy, split_lines};
pub use formatter::{DiffFormatter, DEFAULT_CONTEXT_LINES};
pub use generator::{DiffConfig, DiffGenerator, DiffMode, DiffOutput, LineStats};
pub use rows::{highlight_line, DiffRow, DiffSegment, RowAligner, RowContent, RowKind, SegmentKind, SideBySide};

/// Convenience function to generate a unified diff with default settings
pub fn generate_unified_diff(left: &str, right: &str) -> Vec<String> {
    DiffFormatter::default().format_unified(left, right)
}

/// Convenience function to generate side-by-side rows with default settings
pub fn generate_side_by_side_diff(left: &str, right: &str) -> SideBySide {
    DiffFormatter::default().format_side_by_side(left, right)
}

/// Convenience function to get diff statistics
pub fn get_diff_stats(left: &str, right: &str) -> LineStats {
    DiffGenerator::default()
        .generate(left, right, DiffMode::Unified)
        .stats
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convenience_functions() {
        let old = "line1\nline2\nline3";
        let new = "line1\nmodified\nline3";

        let unified = generate_unified_diff(old, new);
        assert!(unified.contains(&"--- Left".to_string()));
        assert!(unified.contains(&"+modified".to_string()));

        let rows = generate_side_by_side_diff(old, new);
        assert_eq!(rows.left_rows.len(), rows.right_rows.len());

        let stats = get_diff_stats(old, new);
        assert_eq!(stats.added, 1);
        assert_eq!(stats.removed, 1);
    }
}
