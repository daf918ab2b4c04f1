use std::path::Path;

use crate::error::{CompareError, Result};

/// Reads a file as text, replacing invalid UTF-8 sequences instead of failing.
pub fn read_text_lossy<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| CompareError::read_error(path, e))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!("{} is not valid UTF-8, decoding lossily", path.display());
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    })
}

/// Splits on `\n`, `\r\n` and lone `\r`, dropping the terminators. A trailing
/// terminator does not produce an empty last line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b"]);
        assert_eq!(split_lines("a\r\nb\rc"), vec!["a", "b", "c"]);
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_lossy_decoding() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mixed.bin");
        std::fs::write(&path, b"caf\xe9\nok\n").unwrap();

        let text = read_text_lossy(&path).unwrap();
        assert!(text.starts_with("caf\u{fffd}"));
        assert!(text.ends_with("ok\n"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let result = read_text_lossy(dir.path().join("missing"));
        assert!(matches!(result, Err(CompareError::ReadError { .. })));
    }
}
