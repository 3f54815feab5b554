//! # edgequake-pdf2gif
//!
//! Watch a directory for PDF files and turn the first page of each into a
//! small grayscale GIF, then delete the PDF.
//!
//! ## Pipeline Overview
//!
//! ```text
//! watch dir
//!  │
//!  ├─ 1. Scan       list *.pdf (case-insensitive), no recursion
//!  ├─ 2. Render     rasterise page 1 via pdfium at dpi/72 (spawn_blocking)
//!  ├─ 3. Transform  luminance grayscale, Lanczos resize by scale factor
//!  ├─ 4. Quantize   adaptive gray palette, at most max_colors entries
//!  ├─ 5. Encode     single-frame GIF → <output_dir>/<stem>.gif
//!  ├─ 6. Delete     remove the PDF only after the GIF is in place
//!  └─ 7. Sleep      scan interval, interruptible by a CancellationToken
//! ```
//!
//! A broken PDF never stops the loop: it is logged, left where it is, and
//! retried on the next pass.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2gif::{PdfiumRasterizer, WatchConfig, Watcher};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WatchConfig::builder()
//!         .watch_dir("/srv/inbox")
//!         .scan_interval_secs(60)
//!         .build()?;
//!     let rasterizer = Arc::new(PdfiumRasterizer::bind(None)?);
//!     let watcher = Watcher::new(config, rasterizer);
//!
//!     let cancel = CancellationToken::new();
//!     let stop = cancel.clone();
//!     tokio::spawn(async move {
//!         let _ = tokio::signal::ctrl_c().await;
//!         stop.cancel();
//!     });
//!
//!     let summary = watcher.run(cancel).await?;
//!     eprintln!("{} PDFs converted", summary.total_converted);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2gif` binary and [`logging`] (clap + anyhow + tracing-subscriber + chrono) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-pdf2gif = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
#[cfg(feature = "cli")]
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod watch;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{WatchConfig, WatchConfigBuilder, WatchConfigFile};
pub use convert::{Converter, GifInfo};
pub use error::{ConversionError, DeleteError, Pdf2GifError, ScanError};
pub use output::{FileOutcome, PassReport, RunSummary};
pub use pipeline::render::{PageRasterizer, PdfiumRasterizer};
pub use pipeline::scan::{DirectoryLister, FsLister};
pub use watch::Watcher;
