use std::fs;
use tempfile::TempDir;
use foldercomp::diff::{RowAligner, RowContent, SequenceAligner};
use foldercomp::{diff_files, CompareError, DiffMode, DiffSegment, RowKind, SegmentKind};

fn write_pair(left: &str, right: &str) -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let left_path = dir.path().join("left.txt");
    let right_path = dir.path().join("right.txt");
    fs::write(&left_path, left).expect("Failed to write left file");
    fs::write(&right_path, right).expect("Failed to write right file");
    (dir, left_path, right_path)
}

#[test]
fn test_single_line_change_end_to_end() {
    let (_dir, left, right) = write_pair("a\nb\nc\n", "a\nx\nc\n");

    let output = diff_files(&left, &right, DiffMode::Combined).expect("Diff failed");

    let unified = output.diff.as_ref().expect("unified diff missing");
    let body: Vec<&str> = unified.iter().skip(3).map(String::as_str).collect();
    assert_eq!(body, vec![" a", "-b", "+x", " c"]);

    let rows = output.side_by_side.as_ref().expect("rows missing");
    assert_eq!(rows.left_rows.len(), 3);
    assert_eq!(rows.right_rows.len(), 3);

    assert_eq!(rows.left_rows[0].kind, RowKind::Same);
    assert_eq!(rows.left_rows[0].content, RowContent::Text("a".to_string()));
    assert_eq!(rows.right_rows[0].content, RowContent::Text("a".to_string()));

    assert_eq!(rows.left_rows[1].kind, RowKind::Modified);
    assert_eq!(
        rows.left_rows[1].content,
        RowContent::Segments(vec![DiffSegment::new("b", SegmentKind::Removed)])
    );
    assert_eq!(
        rows.right_rows[1].content,
        RowContent::Segments(vec![DiffSegment::new("x", SegmentKind::Added)])
    );

    assert_eq!(rows.left_rows[2].kind, RowKind::Same);
    assert_eq!(rows.left_rows[2].line_number, Some(3));
    assert_eq!(rows.right_rows[2].line_number, Some(3));
}

#[test]
fn test_two_deletes_two_inserts_pair_without_spacers() {
    let mut rows = RowAligner::new(SequenceAligner::default());
    rows.push_removed("first old");
    rows.push_removed("second old");
    rows.push_added("first new");
    rows.push_added("second new");
    let result = rows.finish();

    assert_eq!(result.left_rows.len(), 2);
    assert_eq!(result.right_rows.len(), 2);
    assert!(result.left_rows.iter().all(|r| r.kind == RowKind::Modified));
    assert!(result.right_rows.iter().all(|r| r.kind == RowKind::Modified));
}

#[test]
fn test_three_deletes_one_insert() {
    let (_dir, left, right) = write_pair("keep\none\ntwo\nthree\nend\n", "keep\nuno\nend\n");

    let output = diff_files(&left, &right, DiffMode::SideBySide).expect("Diff failed");
    let rows = output.side_by_side.expect("rows missing");

    let left_kinds: Vec<_> = rows.left_rows.iter().map(|r| r.kind).collect();
    let right_kinds: Vec<_> = rows.right_rows.iter().map(|r| r.kind).collect();
    assert_eq!(
        left_kinds,
        vec![RowKind::Same, RowKind::Modified, RowKind::Removed, RowKind::Removed, RowKind::Same]
    );
    assert_eq!(
        right_kinds,
        vec![RowKind::Same, RowKind::Modified, RowKind::Empty, RowKind::Empty, RowKind::Same]
    );
    assert_eq!(rows.right_rows[4].line_number, Some(3));
    assert_eq!(rows.left_rows[4].line_number, Some(5));
}

#[test]
fn test_rows_always_equal_length() {
    let cases = [
        ("", "a\nb\n"),
        ("a\nb\n", ""),
        ("1\n2\n3\n4\n5\n", "0\n2\n3\nx\ny\nz\n5\n6\n"),
        ("same\n", "same\n"),
    ];

    for (left, right) in cases {
        let (_dir, l, r) = write_pair(left, right);
        let output = diff_files(&l, &r, DiffMode::SideBySide).expect("Diff failed");
        let rows = output.side_by_side.expect("rows missing");
        assert_eq!(rows.left_rows.len(), rows.right_rows.len(), "{:?} vs {:?}", left, right);
    }
}

#[test]
fn test_identical_files_have_empty_unified_diff() {
    let (_dir, left, right) = write_pair("one\ntwo\n", "one\ntwo\n");

    let output = diff_files(&left, &right, DiffMode::Unified).expect("Diff failed");
    assert_eq!(output.diff, Some(Vec::new()));
    assert_eq!(output.stats.map(|s| s.total_changes()), Some(0));
    assert!(output.change_groups().is_empty());
}

#[test]
fn test_binary_content_is_decoded_lossily() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let left = dir.path().join("left.bin");
    let right = dir.path().join("right.bin");
    fs::write(&left, b"header\n\xff\xfe\x00data\n").expect("Failed to write left file");
    fs::write(&right, b"header\nplain data\n").expect("Failed to write right file");

    let output = diff_files(&left, &right, DiffMode::Unified).expect("Diff failed");
    let diff = output.diff.expect("unified diff missing");
    assert!(diff.iter().any(|l| l.starts_with('-') && l.contains('\u{fffd}')));
    assert!(diff.contains(&"+plain data".to_string()));
}

#[test]
fn test_raw_mode_returns_contents() {
    let (_dir, left, right) = write_pair("left side\n", "right side\n");

    let output = diff_files(&left, &right, DiffMode::Raw).expect("Diff failed");
    assert_eq!(output.left_content.as_deref(), Some("left side\n"));
    assert_eq!(output.right_content.as_deref(), Some("right side\n"));
    assert!(output.side_by_side.is_none());
}

#[test]
fn test_input_errors() {
    let (dir, left, _right) = write_pair("a", "b");

    let missing = diff_files(&left, dir.path().join("missing.txt"), DiffMode::Unified);
    assert!(matches!(missing, Err(CompareError::PathNotFound { .. })));

    let directory = diff_files(dir.path(), &left, DiffMode::Unified);
    assert!(matches!(directory, Err(CompareError::NotAFile { .. })));
}
