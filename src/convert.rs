//! Per-file conversion: one PDF in, one GIF out, source removed.
//!
//! [`Converter::convert_file`] is the failure boundary for a single file.
//! Whatever goes wrong inside (unreadable PDF, empty document, pdfium error,
//! disk full) is logged and returned as [`FileOutcome::Failed`]; nothing
//! propagates to the pass. The source PDF is deleted only after the GIF has
//! been renamed into place.

use crate::config::WatchConfig;
use crate::error::{ConversionError, DeleteError};
use crate::output::FileOutcome;
use crate::pipeline::render::PageRasterizer;
use crate::pipeline::{encode, quantize, transform};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Converts single PDFs to GIFs with a fixed configuration.
///
/// Cheap to clone: the configuration and the rasteriser are shared.
#[derive(Clone)]
pub struct Converter {
    config: Arc<WatchConfig>,
    rasterizer: Arc<dyn PageRasterizer>,
}

/// Shape of a GIF that was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GifInfo {
    pub width: u32,
    pub height: u32,
    pub colors: usize,
}

impl Converter {
    pub fn new(config: WatchConfig, rasterizer: Arc<dyn PageRasterizer>) -> Self {
        Self {
            config: Arc::new(config),
            rasterizer,
        }
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Convert `input`, then delete it if the GIF was written.
    pub async fn convert_file(&self, input: &Path) -> FileOutcome {
        let output = self.config.output_path_for(input);
        info!(
            "Converting PDF: {} to GIF: {}",
            file_name(input),
            file_name(&output)
        );

        let start = Instant::now();
        match self.render_to_gif(input, &output).await {
            Ok(gif) => {
                info!(
                    "GIF created: {} ({}x{}, {} colours, {}ms)",
                    output.display(),
                    gif.width,
                    gif.height,
                    gif.colors,
                    start.elapsed().as_millis()
                );
                let source_removed = match remove_source(input).await {
                    Ok(()) => {
                        info!("PDF deleted: {}", input.display());
                        true
                    }
                    Err(e) => {
                        error!("{}", e);
                        false
                    }
                };
                FileOutcome::Converted {
                    input: input.to_path_buf(),
                    output,
                    width: gif.width,
                    height: gif.height,
                    colors: gif.colors,
                    source_removed,
                }
            }
            Err(e) => {
                error!("Failed to convert {}: {}", file_name(input), e);
                FileOutcome::Failed {
                    input: input.to_path_buf(),
                    error: e,
                }
            }
        }
    }

    /// Run the CPU-bound part on the blocking pool.
    async fn render_to_gif(&self, input: &Path, output: &Path) -> Result<GifInfo, ConversionError> {
        let rasterizer = Arc::clone(&self.rasterizer);
        let config = Arc::clone(&self.config);
        let in_path = input.to_path_buf();
        let out_path = output.to_path_buf();

        tokio::task::spawn_blocking(move || {
            convert_blocking(rasterizer.as_ref(), &config, &in_path, &out_path)
        })
        .await
        .map_err(|e| ConversionError::Internal {
            path: input.to_path_buf(),
            detail: format!("Conversion task panicked: {}", e),
        })?
    }
}

/// Blocking implementation: rasterise → grayscale → resize → quantize → write.
pub fn convert_blocking(
    rasterizer: &dyn PageRasterizer,
    config: &WatchConfig,
    input: &Path,
    output: &Path,
) -> Result<GifInfo, ConversionError> {
    let page = rasterizer.rasterize_first_page(input, config.render_scale())?;

    let gray = transform::to_grayscale(&page);
    drop(page);
    let gray = transform::scale_image(gray, config.scale_factor);

    let indexed = quantize::quantize(&gray, config.max_colors as usize);
    debug!(
        "Quantized {} to {} colours",
        file_name(input),
        indexed.palette.len()
    );

    encode::write_gif(&indexed, output)?;

    Ok(GifInfo {
        width: indexed.width,
        height: indexed.height,
        colors: indexed.palette.len(),
    })
}

async fn remove_source(input: &Path) -> Result<(), DeleteError> {
    tokio::fs::remove_file(input)
        .await
        .map_err(|source| DeleteError {
            path: input.to_path_buf(),
            source,
        })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
