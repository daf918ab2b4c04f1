use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

pub const DEFAULT_HASH_BUFFER_SIZE: usize = 64 * 1024;

/// SHA-256 digest of a file's bytes.
pub type Fingerprint = [u8; 32];

/// Decides whether two existing regular files have identical content.
///
/// Sizes are compared first so files of different length are never read.
/// Same-sized files are streamed through SHA-256 in fixed-size chunks. A file
/// that cannot be read has no fingerprint and never compares equal. Only
/// regular files are opened; pipes, sockets and devices are never equal.
#[derive(Debug, Clone)]
pub struct EqualityOracle {
    buffer_size: usize,
}

impl EqualityOracle {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    pub fn files_equal<P: AsRef<Path>, Q: AsRef<Path>>(&self, left: P, right: Q) -> bool {
        let (left, right) = (left.as_ref(), right.as_ref());

        let (left_len, right_len) = match (left.metadata(), right.metadata()) {
            (Ok(l), Ok(r)) if l.is_file() && r.is_file() => (l.len(), r.len()),
            (Ok(_), Ok(_)) => {
                tracing::debug!(
                    "Not comparing content of special file {} / {}",
                    left.display(),
                    right.display()
                );
                return false;
            }
            (l, r) => {
                tracing::warn!(
                    "Could not stat {} or {}: {:?} / {:?}",
                    left.display(),
                    right.display(),
                    l.err(),
                    r.err()
                );
                return false;
            }
        };

        if left_len != right_len {
            return false;
        }

        match (self.fingerprint(left), self.fingerprint(right)) {
            (Some(l), Some(r)) => l == r,
            _ => false,
        }
    }

    /// Content digest of `path`, or `None` if any read fails.
    pub fn fingerprint<P: AsRef<Path>>(&self, path: P) -> Option<Fingerprint> {
        let path = path.as_ref();
        match self.hash_file(path) {
            Ok(digest) => Some(digest),
            Err(err) => {
                tracing::warn!("Could not fingerprint {}: {}", path.display(), err);
                None
            }
        }
    }

    fn hash_file(&self, path: &Path) -> std::io::Result<Fingerprint> {
        // Opening a FIFO with no writer blocks forever.
        if !path.metadata()?.is_file() {
            return Err(std::io::Error::new(ErrorKind::InvalidInput, "not a regular file"));
        }

        let mut file = File::open(path)?;
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; self.buffer_size];

        loop {
            match file.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => hasher.update(&buf[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        Ok(digest)
    }
}

impl Default for EqualityOracle {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_BUFFER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_identical_content_is_equal() {
        let dir = TempDir::new().unwrap();
        let left = dir.path().join("left.txt");
        let right = dir.path().join("right.txt");
        fs::write(&left, "same bytes\n").unwrap();
        fs::write(&right, "same bytes\n").unwrap();

        assert!(EqualityOracle::default().files_equal(&left, &right));
    }

    #[test]
    fn test_same_size_different_content() {
        let dir = TempDir::new().unwrap();
        let left = dir.path().join("left.txt");
        let right = dir.path().join("right.txt");
        fs::write(&left, "abc").unwrap();
        fs::write(&right, "abd").unwrap();

        assert!(!EqualityOracle::default().files_equal(&left, &right));
    }

    #[test]
    fn test_small_buffer_spans_many_chunks() {
        let dir = TempDir::new().unwrap();
        let left = dir.path().join("left.bin");
        let right = dir.path().join("right.bin");
        let content: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&left, &content).unwrap();
        fs::write(&right, &content).unwrap();

        let oracle = EqualityOracle::new(7);
        assert!(oracle.files_equal(&left, &right));
        assert_eq!(
            oracle.fingerprint(&left),
            EqualityOracle::default().fingerprint(&right)
        );
    }

    #[test]
    fn test_size_mismatch_short_circuits() {
        let dir = TempDir::new().unwrap();
        let huge = dir.path().join("huge.bin");
        let small = dir.path().join("small.bin");
        // Sparse file: far too large to hash within a unit test.
        fs::File::create(&huge).unwrap().set_len(8 * 1024 * 1024 * 1024).unwrap();
        fs::write(&small, "x").unwrap();

        assert!(!EqualityOracle::default().files_equal(&huge, &small));
    }

    #[cfg(unix)]
    #[test]
    fn test_fifos_are_not_opened() {
        let dir = TempDir::new().unwrap();
        let left = dir.path().join("left.pipe");
        let right = dir.path().join("right.pipe");
        for pipe in [&left, &right] {
            let status = std::process::Command::new("mkfifo").arg(pipe).status().unwrap();
            assert!(status.success());
        }

        let oracle = EqualityOracle::default();
        assert!(oracle.fingerprint(&left).is_none());
        assert!(!oracle.files_equal(&left, &right));
    }

    #[test]
    fn test_unreadable_files_are_never_equal() {
        let dir = TempDir::new().unwrap();
        let missing_a = dir.path().join("a");
        let missing_b = dir.path().join("b");

        let oracle = EqualityOracle::default();
        assert!(oracle.fingerprint(&missing_a).is_none());
        assert!(!oracle.files_equal(&missing_a, &missing_b));
    }
}
