//! Side-by-side row alignment.
//!
//! Turns a line-level edit script into two equally long columns of rows.
//! Runs of removed and added lines that are not separated by a context line
//! are buffered and paired index-for-index on flush, so an edited block shows
//! up as modified pairs with character-level highlighting instead of a
//! removed block followed by an added block.

use serde::{Deserialize, Serialize};

use super::algorithms::{OpTag, Opcode, SequenceAligner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Same,
    Added,
    Removed,
}

/// A highlighted piece of a modified line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: SegmentKind,
}

impl DiffSegment {
    pub fn new(text: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Same,
    Added,
    Removed,
    Modified,
    /// Spacer keeping both columns vertically aligned.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowContent {
    Text(String),
    Segments(Vec<DiffSegment>),
}

impl RowContent {
    /// The row's text with highlighting flattened away.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Segments(segments) => segments.iter().map(|s| s.text.as_str()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRow {
    #[serde(rename = "text")]
    pub content: RowContent,
    #[serde(rename = "type")]
    pub kind: RowKind,
    /// 1-based source line; spacers have none.
    #[serde(rename = "line", default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
}

impl DiffRow {
    fn text(text: &str, kind: RowKind, line: usize) -> Self {
        Self {
            content: RowContent::Text(text.to_string()),
            kind,
            line_number: Some(line),
        }
    }

    fn modified(segments: Vec<DiffSegment>, line: usize) -> Self {
        Self {
            content: RowContent::Segments(segments),
            kind: RowKind::Modified,
            line_number: Some(line),
        }
    }

    pub fn empty() -> Self {
        Self {
            content: RowContent::Text(String::new()),
            kind: RowKind::Empty,
            line_number: None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self.kind, RowKind::Same)
    }
}

/// Paired columns; `left_rows[i]` and `right_rows[i]` render the same slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideBySide {
    pub left_rows: Vec<DiffRow>,
    pub right_rows: Vec<DiffRow>,
}

impl SideBySide {
    pub fn len(&self) -> usize {
        self.left_rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left_rows.is_empty()
    }

    /// Row ranges of each maximal run of non-`same` rows, in order.
    pub fn change_groups(&self) -> Vec<std::ops::Range<usize>> {
        let mut groups = Vec::new();
        let mut start = None;

        for (i, (left, right)) in self.left_rows.iter().zip(&self.right_rows).enumerate() {
            let changed = left.is_change() || right.is_change();
            match (changed, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    groups.push(s..i);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            groups.push(s..self.len());
        }
        groups
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingLine<'a> {
    text: &'a str,
    line: usize,
}

/// Accumulator state for one side-by-side alignment.
///
/// Line counters are 1-based, advance once per consumed source line and are
/// never reset.
pub struct RowAligner<'a> {
    aligner: SequenceAligner,
    left_line: usize,
    right_line: usize,
    removed: Vec<PendingLine<'a>>,
    added: Vec<PendingLine<'a>>,
    rows: SideBySide,
}

impl<'a> RowAligner<'a> {
    pub fn new(aligner: SequenceAligner) -> Self {
        Self {
            aligner,
            left_line: 1,
            right_line: 1,
            removed: Vec::new(),
            added: Vec::new(),
            rows: SideBySide::default(),
        }
    }

    /// Aligns `left`/`right` lines following the line-level `ops`.
    pub fn align(aligner: SequenceAligner, left: &[&'a str], right: &[&'a str], ops: &[Opcode]) -> SideBySide {
        let mut rows = Self::new(aligner);
        for op in ops {
            match op.tag {
                OpTag::Equal => {
                    for (&l, &r) in left[op.old_range.clone()].iter().zip(&right[op.new_range.clone()]) {
                        rows.push_context(l, r);
                    }
                }
                OpTag::Replace | OpTag::Delete | OpTag::Insert => {
                    for &line in &left[op.old_range.clone()] {
                        rows.push_removed(line);
                    }
                    for &line in &right[op.new_range.clone()] {
                        rows.push_added(line);
                    }
                }
            }
        }
        rows.finish()
    }

    pub fn push_context(&mut self, left: &'a str, right: &'a str) {
        self.flush();
        self.rows.left_rows.push(DiffRow::text(left, RowKind::Same, self.left_line));
        self.rows.right_rows.push(DiffRow::text(right, RowKind::Same, self.right_line));
        self.left_line += 1;
        self.right_line += 1;
    }

    pub fn push_removed(&mut self, text: &'a str) {
        self.removed.push(PendingLine {
            text,
            line: self.left_line,
        });
        self.left_line += 1;
    }

    pub fn push_added(&mut self, text: &'a str) {
        self.added.push(PendingLine {
            text,
            line: self.right_line,
        });
        self.right_line += 1;
    }

    pub fn finish(mut self) -> SideBySide {
        self.flush();
        self.rows
    }

    fn flush(&mut self) {
        let paired = self.removed.len().min(self.added.len());

        for (removed, added) in self.removed.iter().zip(&self.added) {
            let (left_segments, right_segments) = highlight_line(&self.aligner, removed.text, added.text);
            self.rows.left_rows.push(DiffRow::modified(left_segments, removed.line));
            self.rows.right_rows.push(DiffRow::modified(right_segments, added.line));
        }

        for removed in &self.removed[paired..] {
            self.rows.left_rows.push(DiffRow::text(removed.text, RowKind::Removed, removed.line));
            self.rows.right_rows.push(DiffRow::empty());
        }

        for added in &self.added[paired..] {
            self.rows.left_rows.push(DiffRow::empty());
            self.rows.right_rows.push(DiffRow::text(added.text, RowKind::Added, added.line));
        }

        self.removed.clear();
        self.added.clear();
    }
}

/// Character-level highlighting for a pair of modified lines.
pub fn highlight_line(aligner: &SequenceAligner, old: &str, new: &str) -> (Vec<DiffSegment>, Vec<DiffSegment>) {
    let old_chars: Vec<char> = old.chars().collect();
    let new_chars: Vec<char> = new.chars().collect();
    let slice = |chars: &[char], range: std::ops::Range<usize>| chars[range].iter().collect::<String>();

    let mut left = Vec::new();
    let mut right = Vec::new();
    for op in aligner.align(&old_chars, &new_chars) {
        match op.tag {
            OpTag::Equal => {
                let text = slice(&old_chars, op.old_range);
                left.push(DiffSegment::new(text.clone(), SegmentKind::Same));
                right.push(DiffSegment::new(text, SegmentKind::Same));
            }
            OpTag::Replace => {
                left.push(DiffSegment::new(slice(&old_chars, op.old_range), SegmentKind::Removed));
                right.push(DiffSegment::new(slice(&new_chars, op.new_range), SegmentKind::Added));
            }
            OpTag::Delete => {
                left.push(DiffSegment::new(slice(&old_chars, op.old_range), SegmentKind::Removed));
            }
            OpTag::Insert => {
                right.push(DiffSegment::new(slice(&new_chars, op.new_range), SegmentKind::Added));
            }
        }
    }
    (left, right)
}
