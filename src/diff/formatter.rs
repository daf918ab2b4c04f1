use super::algorithms::{group_opcodes, OpTag, Opcode, SequenceAligner};
use super::content::split_lines;
use super::rows::{DiffRow, RowAligner, RowKind, SideBySide};

pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// Formats the difference between two texts as unified hunks or as aligned
/// side-by-side rows.
#[derive(Debug, Clone, Copy)]
pub struct DiffFormatter {
    aligner: SequenceAligner,
    context_lines: usize,
}

impl DiffFormatter {
    pub fn new(aligner: SequenceAligner, context_lines: usize) -> Self {
        Self {
            aligner,
            context_lines,
        }
    }

    pub fn aligner(&self) -> SequenceAligner {
        self.aligner
    }

    pub fn context_lines(&self) -> usize {
        self.context_lines
    }

    /// Unified diff lines without terminators. Identical inputs produce no
    /// output at all, not even the file headers.
    pub fn format_unified(&self, left: &str, right: &str) -> Vec<String> {
        let left_lines = split_lines(left);
        let right_lines = split_lines(right);
        let ops = self.aligner.align(&left_lines, &right_lines);
        self.unified_from_ops(&left_lines, &right_lines, &ops)
    }

    pub(crate) fn unified_from_ops(&self, left: &[&str], right: &[&str], ops: &[Opcode]) -> Vec<String> {
        let groups = group_opcodes(ops, self.context_lines);
        if groups.is_empty() {
            return Vec::new();
        }

        let mut output = vec!["--- Left".to_string(), "+++ Right".to_string()];
        for group in &groups {
            let (first, last) = match (group.first(), group.last()) {
                (Some(first), Some(last)) => (first, last),
                _ => continue,
            };
            output.push(format!(
                "@@ -{} +{} @@",
                format_range(first.old_range.start, last.old_range.end),
                format_range(first.new_range.start, last.new_range.end)
            ));

            for op in group {
                match op.tag {
                    OpTag::Equal => {
                        for line in &left[op.old_range.clone()] {
                            output.push(format!(" {}", line));
                        }
                    }
                    OpTag::Replace | OpTag::Delete | OpTag::Insert => {
                        for line in &left[op.old_range.clone()] {
                            output.push(format!("-{}", line));
                        }
                        for line in &right[op.new_range.clone()] {
                            output.push(format!("+{}", line));
                        }
                    }
                }
            }
        }
        output
    }

    pub fn format_side_by_side(&self, left: &str, right: &str) -> SideBySide {
        let left_lines = split_lines(left);
        let right_lines = split_lines(right);
        let ops = self.aligner.align(&left_lines, &right_lines);
        RowAligner::align(self.aligner, &left_lines, &right_lines, &ops)
    }

    /// Renders aligned rows as two plain-text columns for a terminal.
    pub fn render_columns(rows: &SideBySide, width: usize) -> String {
        let half_width = width.saturating_sub(3) / 2; // Account for separator " | "
        let mut output = Vec::with_capacity(rows.len() + 2);

        output.push(format!("{:<width$} | {}", "--- Left", "+++ Right", width = half_width));
        output.push("-".repeat(width));

        for (left, right) in rows.left_rows.iter().zip(&rows.right_rows) {
            let cell = |row: &DiffRow| {
                let marker = match row.kind {
                    RowKind::Same => ' ',
                    RowKind::Added => '+',
                    RowKind::Removed => '-',
                    RowKind::Modified => '~',
                    RowKind::Empty => return String::new(),
                };
                let number = row.line_number.map(|n| n.to_string()).unwrap_or_default();
                Self::truncate_line(&format!("{:>4}{} {}", number, marker, row.content.plain_text()), half_width)
            };
            output.push(format!("{:<width$} | {}", cell(left), cell(right), width = half_width));
        }

        output.join("\n")
    }

    fn truncate_line(line: &str, max_width: usize) -> String {
        if line.chars().count() <= max_width {
            return line.to_string();
        }
        if max_width > 3 {
            let kept: String = line.chars().take(max_width - 3).collect();
            format!("{}...", kept)
        } else {
            line.chars().take(max_width).collect()
        }
    }
}

impl Default for DiffFormatter {
    fn default() -> Self {
        Self::new(SequenceAligner::default(), DEFAULT_CONTEXT_LINES)
    }
}

/// Hunk header range: `start,len`, or just `start` for a single line. An
/// empty range points at the line before it.
fn format_range(start: usize, end: usize) -> String {
    let len = end - start;
    let mut beginning = start + 1;
    match len {
        1 => beginning.to_string(),
        _ => {
            if len == 0 {
                beginning -= 1;
            }
            format!("{},{}", beginning, len)
        }
    }
}
