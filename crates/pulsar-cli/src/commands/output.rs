//! Shared output helpers: atomic file writes and VERBOSE progress logs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use colored::Colorize;

/// True when `VERBOSE=1` is set in the environment. Progress logs go to
/// stderr only; stdout may be the PPM pipe.
pub fn verbose_enabled() -> bool {
    std::env::var("VERBOSE").map(|v| v == "1").unwrap_or(false)
}

/// Prints a progress line to stderr when VERBOSE is enabled.
pub fn vlog(message: &str) {
    if verbose_enabled() {
        eprintln!("{} {message}", "pulsar:".dimmed());
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `bytes` to `path` atomically: the data lands in a sibling temp
/// file first and is renamed into place, so a failed run never leaves a
/// partial artifact.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = temp_path(path);
    let write_result = fs::write(&tmp, bytes).and_then(|()| fs::rename(&tmp, path));
    if write_result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    write_result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_creates_final_file_only() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.wav");
        write_atomic(&target, b"payload").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"payload");
        // No temp file left behind.
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn atomic_write_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.json");
        write_atomic(&target, b"old").unwrap();
        write_atomic(&target, b"new").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"new");
    }

    #[test]
    fn failed_write_leaves_no_artifact() {
        let missing_dir = Path::new("/definitely/not/here/out.wav");
        assert!(write_atomic(missing_dir, b"x").is_err());
    }
}
