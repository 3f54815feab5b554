//! Directory scanning: find the PDFs waiting in the watched directory.
//!
//! Listing goes through the [`DirectoryLister`] trait so passes can be driven
//! from a fixed list in tests. Selection is a pure filter on the file name:
//! exact, case-insensitive `.pdf` suffix, no recursion, no ordering promise.

use crate::error::ScanError;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source of directory entries.
pub trait DirectoryLister: Send + Sync {
    /// Return the regular files directly inside `dir`.
    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}

/// [`DirectoryLister`] backed by `std::fs::read_dir`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLister;

impl DirectoryLister for FsLister {
    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            // `Path::is_file` follows symlinks, so a link to a PDF still counts.
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }
}

/// `true` when the file name ends in `.pdf`, compared case-insensitively.
///
/// `report.PDF` matches; `archive.PDF.bak` and `NOTES.TXT` do not.
pub fn is_pdf_name(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_ascii_lowercase().ends_with(".pdf"))
        .unwrap_or(false)
}

/// List `dir` and keep only the PDF candidates.
pub fn scan(lister: &dyn DirectoryLister, dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let entries = lister.list_files(dir).map_err(|source| ScanError {
        dir: dir.to_path_buf(),
        source,
    })?;
    let total = entries.len();
    let pdfs: Vec<PathBuf> = entries.into_iter().filter(|p| is_pdf_name(p)).collect();
    debug!(
        "Scanned {}: {} entries, {} PDFs",
        dir.display(),
        total,
        pdfs.len()
    );
    Ok(pdfs)
}
