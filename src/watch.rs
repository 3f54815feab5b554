//! The poll loop: ensure the output directory, then scan → convert → sleep
//! until cancelled.
//!
//! ## Cancellation
//!
//! [`Watcher::run`] takes a [`CancellationToken`] instead of looping
//! forever. The token is checked before each pass and between files, and the
//! inter-pass sleep races against it, so a SIGINT during a five-minute wait
//! stops the process immediately. Tests cancel the token from a fake lister
//! to run an exact number of passes without touching the clock.
//!
//! A file already handed to the blocking pool is always finished first;
//! pdfium work cannot be interrupted midway.

use crate::config::WatchConfig;
use crate::convert::Converter;
use crate::error::Pdf2GifError;
use crate::output::{PassReport, RunSummary};
use crate::pipeline::render::PageRasterizer;
use crate::pipeline::scan::{self, DirectoryLister, FsLister};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Watches one directory and converts the PDFs that land in it.
#[derive(Clone)]
pub struct Watcher {
    converter: Converter,
    lister: Arc<dyn DirectoryLister>,
}

impl Watcher {
    /// Watcher listing the real filesystem.
    pub fn new(config: WatchConfig, rasterizer: Arc<dyn PageRasterizer>) -> Self {
        Self {
            converter: Converter::new(config, rasterizer),
            lister: Arc::new(FsLister),
        }
    }

    /// Replace the directory listing, e.g. with a fixed list in tests.
    pub fn with_lister(mut self, lister: Arc<dyn DirectoryLister>) -> Self {
        self.lister = lister;
        self
    }

    pub fn config(&self) -> &WatchConfig {
        self.converter.config()
    }

    /// Create the output directory (and parents) if it does not exist.
    pub async fn ensure_output_dir(&self) -> Result<(), Pdf2GifError> {
        let dir = &self.config().output_dir;
        tokio::fs::create_dir_all(dir).await.map_err(|source| {
            error!("Failed to create output directory {}: {}", dir.display(), source);
            Pdf2GifError::DirectoryCreation {
                path: dir.clone(),
                source,
            }
        })?;
        info!("Output directory ready: {}", dir.display());
        Ok(())
    }

    /// One scan-and-convert pass. Never fails: scan errors and per-file
    /// errors are logged and recorded in the report.
    pub async fn run_pass(&self, cancel: &CancellationToken) -> PassReport {
        let mut report = PassReport::default();

        let candidates = match self.list_candidates().await {
            Ok(c) => c,
            Err(e) => {
                error!("Error while scanning for PDFs: {}", e);
                report.scan_error = Some(e);
                return report;
            }
        };
        debug!("Pass found {} PDF(s)", candidates.len());

        for path in candidates {
            if cancel.is_cancelled() {
                info!("Pass interrupted; remaining PDFs left for the next run");
                report.interrupted = true;
                break;
            }
            report.outcomes.push(self.converter.convert_file(&path).await);
        }

        info!("PDFs converted in this pass: {}", report.converted());
        report
    }

    /// List the watched directory on the blocking pool.
    async fn list_candidates(&self) -> Result<Vec<PathBuf>, String> {
        let lister = Arc::clone(&self.lister);
        let dir = self.config().watch_dir.clone();
        tokio::task::spawn_blocking(move || scan::scan(lister.as_ref(), &dir))
            .await
            .map_err(|e| format!("Scan task panicked: {}", e))?
            .map_err(|e| e.to_string())
    }

    /// Ensure the output directory, then run passes until `cancel` fires.
    ///
    /// Returns `Err` only when the output directory cannot be created, in
    /// which case no pass runs.
    pub async fn run(&self, cancel: CancellationToken) -> Result<RunSummary, Pdf2GifError> {
        self.ensure_output_dir().await?;

        let interval = self.config().scan_interval();
        info!(
            "Watching {} for PDFs every {}s",
            self.config().watch_dir.display(),
            interval.as_secs()
        );

        let start = Instant::now();
        let mut summary = RunSummary::default();

        while !cancel.is_cancelled() {
            let report = self.run_pass(&cancel).await;
            summary.passes += 1;
            summary.total_converted += report.converted();

            info!("Waiting {} seconds before the next scan", interval.as_secs());
            tokio::select! {
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(interval) => {}
            }
        }

        summary.elapsed = start.elapsed();
        info!("Watcher stopped");
        info!("Total run time: {:.1?}", summary.elapsed);
        info!(
            "Total PDFs converted during this run: {} ({} passes)",
            summary.total_converted, summary.passes
        );
        Ok(summary)
    }
}
