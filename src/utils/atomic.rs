//! Atomic file writes for the tour catalog
//!
//! The catalog file is rewritten as a whole on every change:
//!
//! 1. Write to a sibling `.tmp` file
//! 2. `sync_all()` to flush it to disk
//! 3. Rename over the final path
//!
//! A crash leaves either the old catalog or the new one, never a torn file.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::error::AnalyticsError;

/// Result type for atomic operations
pub type AtomicResult<T> = Result<T, AtomicError>;

/// Errors that can occur during atomic operations
#[derive(Error, Debug)]
pub enum AtomicError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Path has no file name: {0}")]
    InvalidPath(String),
}

impl From<AtomicError> for AnalyticsError {
    fn from(e: AtomicError) -> Self {
        AnalyticsError::Storage(e.to_string())
    }
}

/// Atomically replace `path` with whatever `write_fn` writes
///
/// ```ignore
/// atomic_write_with("data/tours.jsonl", |file| {
///     writeln!(file, "{}", line)?;
///     Ok(())
/// })?;
/// ```
pub fn atomic_write_with<P, F>(path: P, write_fn: F) -> AtomicResult<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let path = path.as_ref();
    if path.file_name().is_none() {
        return Err(AtomicError::InvalidPath(path.display().to_string()));
    }
    let temp_path = path.with_extension("tmp");

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(&temp_path)?;
    write_fn(&mut file)?;
    file.sync_all()?;

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Remove `.tmp` files left behind by an interrupted write
///
/// Called when the catalog is opened.
pub fn cleanup_temp_files<P: AsRef<Path>>(dir: P) -> AtomicResult<usize> {
    let dir = dir.as_ref();
    let mut cleaned = 0;

    if !dir.exists() {
        return Ok(0);
    }

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|e| e == "tmp") {
            fs::remove_file(&path)?;
            cleaned += 1;
        }
    }

    Ok(cleaned)
}
