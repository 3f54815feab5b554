//! PDF rasterisation: render the first page to a `DynamicImage` via pdfium.
//!
//! ## Why a trait?
//!
//! [`PageRasterizer`] is the seam between the pipeline and the native
//! pdfium library. Production code uses [`PdfiumRasterizer`]; tests plug in
//! a synthetic rasteriser so whole passes run without libpdfium installed.
//!
//! ## Handle lifetime
//!
//! The `PdfDocument` lives only inside [`PdfiumRasterizer::rasterize_first_page`]
//! and is dropped on every return path, so a watcher running for weeks does
//! not accumulate open documents.

use crate::error::{ConversionError, Pdf2GifError};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Rasterises the first page of a document.
///
/// Implementations are called from Tokio's blocking pool and must be
/// `Send + Sync`.
pub trait PageRasterizer: Send + Sync {
    /// Render page one of `path`, scaling PDF points by `scale` on both axes.
    fn rasterize_first_page(&self, path: &Path, scale: f32)
        -> Result<DynamicImage, ConversionError>;
}

/// [`PageRasterizer`] backed by pdfium-render.
pub struct PdfiumRasterizer {
    pdfium: Pdfium,
}

impl PdfiumRasterizer {
    /// Wrap an already bound pdfium instance.
    pub fn new(pdfium: Pdfium) -> Self {
        Self { pdfium }
    }

    /// Bind to libpdfium.
    ///
    /// Tries `library_path` when given, then a platform library in the
    /// working directory, then the system library.
    pub fn bind(library_path: Option<&Path>) -> Result<Self, Pdf2GifError> {
        let bindings = match library_path {
            Some(path) => {
                info!("Binding pdfium from {}", path.display());
                Pdfium::bind_to_library(path)
            }
            None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| Pdf2GifError::PdfiumBindingFailed(e.to_string()))?;

        Ok(Self::new(Pdfium::new(bindings)))
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize_first_page(
        &self,
        path: &Path,
        scale: f32,
    ) -> Result<DynamicImage, ConversionError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| ConversionError::DocumentOpen {
                path: path.to_path_buf(),
                detail: format!("{:?}", e),
            })?;

        let pages = document.pages();
        if pages.len() == 0 {
            return Err(ConversionError::EmptyDocument {
                path: path.to_path_buf(),
            });
        }

        let page = pages.get(0).map_err(|e| ConversionError::Render {
            path: path.to_path_buf(),
            detail: format!("{:?}", e),
        })?;

        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap =
            page.render_with_config(&render_config)
                .map_err(|e| ConversionError::Render {
                    path: path.to_path_buf(),
                    detail: format!("{:?}", e),
                })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered {} page 1 at {:.3}x → {}x{} px",
            path.display(),
            scale,
            image.width(),
            image.height()
        );

        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn pdfium_rasterizer_can_be_shared_across_threads() {
        assert_send_sync::<PdfiumRasterizer>();
        // The converter hands the rasteriser to the blocking pool as a trait object.
        assert_send_sync::<Arc<dyn PageRasterizer>>();
        let _: fn(PdfiumRasterizer) -> Arc<dyn PageRasterizer> = |r| Arc::new(r);
    }
}
