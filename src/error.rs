//! Error types for the edgequake-pdf2gif library.
//!
//! Failures fall into two groups:
//!
//! * [`Pdf2GifError`] — **Fatal**: the watcher cannot start or cannot keep
//!   its promises (output directory cannot be created, pdfium cannot be
//!   bound, configuration is invalid). Returned as `Err(Pdf2GifError)`.
//!
//! * [`ConversionError`] — **Per file**: one PDF could not be turned into a
//!   GIF. Stored in [`crate::output::FileOutcome::Failed`]; the file stays in
//!   the watched directory and the pass moves on to the next one.
//!
//! [`DeleteError`] and [`ScanError`] are recovered where they occur and only
//! ever reach the log.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdf2gif library.
#[derive(Debug, Error)]
pub enum Pdf2GifError {
    /// The output directory does not exist and could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Place libpdfium next to the binary, install it system-wide, or\n\
set PDFIUM_LIB_PATH=/path/to/libpdfium.\n\
Pre-built libraries: https://github.com/bblanchon/pdfium-binaries/releases"
    )]
    PdfiumBindingFailed(String),

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single input file.
///
/// The file is left in place so the next pass retries it.
#[derive(Debug, Clone, Error, serde::Serialize)]
pub enum ConversionError {
    /// File missing, unreadable, or not a PDF pdfium can parse.
    #[error("Cannot open '{path}': {detail}")]
    DocumentOpen { path: PathBuf, detail: String },

    /// The document parsed but has no pages.
    #[error("'{path}' has no pages")]
    EmptyDocument { path: PathBuf },

    /// pdfium failed to rasterise the first page.
    #[error("Rasterisation of '{path}' failed: {detail}")]
    Render { path: PathBuf, detail: String },

    /// The GIF could not be encoded or written.
    #[error("Failed to write GIF '{path}': {detail}")]
    Encode { path: PathBuf, detail: String },

    /// The blocking conversion task panicked or was aborted.
    #[error("Conversion of '{path}' aborted: {detail}")]
    Internal { path: PathBuf, detail: String },
}

impl ConversionError {
    /// The file this error is about (input PDF, or output GIF for `Encode`).
    pub fn path(&self) -> &std::path::Path {
        match self {
            ConversionError::DocumentOpen { path, .. }
            | ConversionError::EmptyDocument { path }
            | ConversionError::Render { path, .. }
            | ConversionError::Encode { path, .. }
            | ConversionError::Internal { path, .. } => path,
        }
    }
}

/// The GIF was written but the source PDF could not be removed.
#[derive(Debug, Error)]
#[error("Failed to delete '{path}': {source}")]
pub struct DeleteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// The watched directory could not be listed.
#[derive(Debug, Error)]
#[error("Failed to scan '{dir}': {source}")]
pub struct ScanError {
    pub dir: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn directory_creation_display() {
        let e = Pdf2GifError::DirectoryCreation {
            path: PathBuf::from("/ro/gifs"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/ro/gifs"), "got: {msg}");
        assert!(msg.contains("denied"), "got: {msg}");
    }

    #[test]
    fn binding_failure_mentions_env_var() {
        let e = Pdf2GifError::PdfiumBindingFailed("no such file".into());
        assert!(e.to_string().contains("PDFIUM_LIB_PATH"));
    }

    #[test]
    fn conversion_error_names_file() {
        let e = ConversionError::EmptyDocument {
            path: PathBuf::from("b.pdf"),
        };
        assert!(e.to_string().contains("b.pdf"));
        assert_eq!(e.path(), std::path::Path::new("b.pdf"));
    }

    #[test]
    fn conversion_error_serialises() {
        let e = ConversionError::Render {
            path: PathBuf::from("a.pdf"),
            detail: "bitmap alloc".into(),
        };
        let json = serde_json::to_string(&e).expect("serialise");
        assert!(json.contains("Render"), "got: {json}");
        assert!(json.contains("bitmap alloc"), "got: {json}");
    }

    #[test]
    fn delete_and_scan_errors_carry_cause() {
        let d = DeleteError {
            path: PathBuf::from("a.pdf"),
            source: io::Error::new(io::ErrorKind::Other, "busy"),
        };
        assert!(d.to_string().contains("busy"));

        let s = ScanError {
            dir: PathBuf::from("/gone"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(s.to_string().contains("/gone"));
    }
}
