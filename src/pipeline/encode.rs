//! GIF encoding: `IndexedImage` → single-frame GIF on disk.
//!
//! The `gif` crate is used directly instead of `image::codecs::gif`, which
//! only accepts RGBA frames and would run its own NeuQuant pass over pixels
//! that are already palette-reduced. Writing the indices as-is keeps the
//! palette bound exact.
//!
//! Output goes to a `.gif.tmp` sibling first and is renamed into place, so an
//! existing GIF is either fully replaced or left untouched.

use crate::error::ConversionError;
use crate::pipeline::quantize::IndexedImage;
use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Encode `img` as a GIF at `path`, overwriting any existing file.
pub fn write_gif(img: &IndexedImage, path: &Path) -> Result<(), ConversionError> {
    let encode_err = |detail: String| ConversionError::Encode {
        path: path.to_path_buf(),
        detail,
    };

    let width = u16::try_from(img.width)
        .map_err(|_| encode_err(format!("width {} exceeds the GIF limit", img.width)))?;
    let height = u16::try_from(img.height)
        .map_err(|_| encode_err(format!("height {} exceeds the GIF limit", img.height)))?;

    let tmp_path = tmp_path_for(path);
    let result = encode_to_file(img, width, height, &tmp_path)
        .and_then(|()| fs::rename(&tmp_path, path).map_err(|e| format!("rename: {e}")));

    if let Err(detail) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(encode_err(detail));
    }

    debug!(
        "Wrote {} ({}x{}, {} colours)",
        path.display(),
        width,
        height,
        img.palette.len()
    );
    Ok(())
}

fn encode_to_file(img: &IndexedImage, width: u16, height: u16, path: &Path) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
    let palette = img.rgb_palette();

    let mut encoder = gif::Encoder::new(BufWriter::new(file), width, height, &palette)
        .map_err(|e| e.to_string())?;

    let frame = gif::Frame {
        width,
        height,
        buffer: Cow::Borrowed(&img.indices),
        ..gif::Frame::default()
    };
    encoder.write_frame(&frame).map_err(|e| e.to_string())?;

    let mut writer = encoder.into_inner().map_err(|e| e.to_string())?;
    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
