//! Pipeline stages for PDF-to-GIF conversion.
//!
//! Each submodule implements exactly one transformation step so each can be
//! tested on its own and the rasterisation backend can be swapped without
//! touching the rest.
//!
//! ## Data Flow
//!
//! ```text
//! scan ──▶ render ──▶ transform ──▶ quantize ──▶ encode
//! (*.pdf)  (pdfium)   (gray+resize) (palette)    (GIF)
//! ```
//!
//! 1. [`scan`]      — list the watched directory, keep `*.pdf` files
//! 2. [`render`]    — rasterise page one through the [`render::PageRasterizer`] seam
//! 3. [`transform`] — luminance conversion and Lanczos resampling
//! 4. [`quantize`]  — adaptive gray palette of bounded size
//! 5. [`encode`]    — single-frame GIF written via temp file + rename

pub mod encode;
pub mod quantize;
pub mod render;
pub mod scan;
pub mod transform;
