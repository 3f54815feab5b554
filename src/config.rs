//! Configuration types for the PDF-to-GIF watcher.
//!
//! Every knob lives in one immutable [`WatchConfig`], built through
//! [`WatchConfigBuilder`] and handed to the converter and the poll loop at
//! construction time. Nothing is read from process-wide state after that,
//! so tests can run several watchers side by side with different settings.

use crate::error::Pdf2GifError;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the output folder created inside the watched directory.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "gifs";

/// Points per inch in PDF user space; DPI is divided by this to get the
/// rasterisation scale.
pub const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Configuration for the directory watcher and the per-file conversion.
///
/// Built via [`WatchConfig::builder()`] or using [`WatchConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_pdf2gif::WatchConfig;
///
/// let config = WatchConfig::builder()
///     .watch_dir("/srv/inbox")
///     .scan_interval_secs(60)
///     .max_colors(8)
///     .build()
///     .unwrap();
/// assert_eq!(config.output_dir, std::path::Path::new("/srv/inbox/gifs"));
/// ```
///
/// Deserialising goes through [`WatchConfigFile`] and the same validation as
/// [`WatchConfigBuilder::build`]; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WatchConfigFile")]
pub struct WatchConfig {
    /// Directory scanned for `*.pdf` files. Default: `.`.
    pub watch_dir: PathBuf,

    /// Directory the GIFs are written to. Default: `<watch_dir>/gifs`.
    pub output_dir: PathBuf,

    /// Seconds to sleep between two passes. Default: 300.
    pub scan_interval_secs: u64,

    /// Rendering density. Range: 36–600. Default: 100.
    ///
    /// The page is rasterised at `dpi / 72` pixels per PDF point on both axes.
    pub dpi: u32,

    /// Geometric scale applied after rasterisation. Default: 0.80.
    ///
    /// `1.0` skips resampling entirely; anything else resizes to
    /// `round(w * s) × round(h * s)` with a Lanczos filter.
    pub scale_factor: f32,

    /// Upper bound on palette entries in the output GIF. Range: 2–256. Default: 15.
    pub max_colors: u16,
}

impl Default for WatchConfig {
    fn default() -> Self {
        let watch_dir = PathBuf::from(".");
        Self {
            output_dir: watch_dir.join(DEFAULT_OUTPUT_DIR_NAME),
            watch_dir,
            scan_interval_secs: 300,
            dpi: 100,
            scale_factor: 0.80,
            max_colors: 15,
        }
    }
}

impl WatchConfig {
    /// Create a new builder for `WatchConfig`.
    pub fn builder() -> WatchConfigBuilder {
        WatchConfigBuilder {
            config: Self::default(),
            output_dir_set: false,
        }
    }

    /// Rasterisation scale derived from [`Self::dpi`].
    pub fn render_scale(&self) -> f32 {
        self.dpi as f32 / PDF_POINTS_PER_INCH
    }

    /// Sleep between passes as a [`Duration`].
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    /// Output path for `input`: same stem, `.gif` extension, in [`Self::output_dir`].
    ///
    /// Deterministic, so converting the same name twice overwrites. The stem
    /// is kept as raw `OsStr`, so non-UTF-8 names map to distinct outputs.
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let mut name = input.file_stem().map(OsString::from).unwrap_or_default();
        name.push(".gif");
        self.output_dir.join(name)
    }
}

/// A [`WatchConfig`] as read from JSON or another serde format.
///
/// Every field is optional. Values are taken as written, without the
/// clamping the builder setters apply, so out-of-range input is rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchConfigFile {
    pub watch_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub scan_interval_secs: Option<u64>,
    pub dpi: Option<u32>,
    pub scale_factor: Option<f32>,
    pub max_colors: Option<u16>,
}

impl TryFrom<WatchConfigFile> for WatchConfig {
    type Error = Pdf2GifError;

    fn try_from(file: WatchConfigFile) -> Result<Self, Self::Error> {
        let mut builder = WatchConfig::builder();
        if let Some(dir) = file.watch_dir {
            builder = builder.watch_dir(dir);
        }
        if let Some(dir) = file.output_dir {
            builder = builder.output_dir(dir);
        }
        let c = &mut builder.config;
        if let Some(secs) = file.scan_interval_secs {
            c.scan_interval_secs = secs;
        }
        if let Some(dpi) = file.dpi {
            c.dpi = dpi;
        }
        if let Some(factor) = file.scale_factor {
            c.scale_factor = factor;
        }
        if let Some(n) = file.max_colors {
            c.max_colors = n;
        }
        builder.build()
    }
}

/// Builder for [`WatchConfig`].
#[derive(Debug)]
pub struct WatchConfigBuilder {
    config: WatchConfig,
    output_dir_set: bool,
}

impl WatchConfigBuilder {
    /// Set the watched directory. Unless [`Self::output_dir`] is also called,
    /// the output directory follows it to `<dir>/gifs`.
    pub fn watch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.watch_dir = dir.into();
        if !self.output_dir_set {
            self.config.output_dir = self.config.watch_dir.join(DEFAULT_OUTPUT_DIR_NAME);
        }
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self.output_dir_set = true;
        self
    }

    pub fn scan_interval_secs(mut self, secs: u64) -> Self {
        self.config.scan_interval_secs = secs;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(36, 600);
        self
    }

    pub fn scale_factor(mut self, factor: f32) -> Self {
        self.config.scale_factor = factor;
        self
    }

    pub fn max_colors(mut self, n: u16) -> Self {
        self.config.max_colors = n.clamp(2, 256);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// The setters already clamp DPI and palette size; the range checks here
    /// guard values arriving through [`WatchConfigFile`].
    pub fn build(self) -> Result<WatchConfig, Pdf2GifError> {
        let c = &self.config;
        if !(36..=600).contains(&c.dpi) {
            return Err(Pdf2GifError::InvalidConfig(format!(
                "DPI must be 36–600, got {}",
                c.dpi
            )));
        }
        if !c.scale_factor.is_finite() || c.scale_factor <= 0.0 || c.scale_factor > 4.0 {
            return Err(Pdf2GifError::InvalidConfig(format!(
                "Scale factor must be in (0, 4], got {}",
                c.scale_factor
            )));
        }
        if !(2..=256).contains(&c.max_colors) {
            return Err(Pdf2GifError::InvalidConfig(format!(
                "Palette size must be 2–256, got {}",
                c.max_colors
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let c = WatchConfig::default();
        assert_eq!(c.scan_interval_secs, 300);
        assert_eq!(c.dpi, 100);
        assert_eq!(c.max_colors, 15);
        assert!((c.scale_factor - 0.80).abs() < f32::EPSILON);
        assert_eq!(c.output_dir, Path::new("./gifs"));
    }

    #[test]
    fn render_scale_is_dpi_over_72() {
        let c = WatchConfig::builder().dpi(144).build().unwrap();
        assert!((c.render_scale() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn output_dir_follows_watch_dir_unless_set() {
        let c = WatchConfig::builder().watch_dir("/in").build().unwrap();
        assert_eq!(c.output_dir, Path::new("/in/gifs"));

        let c = WatchConfig::builder()
            .output_dir("/out")
            .watch_dir("/in")
            .build()
            .unwrap();
        assert_eq!(c.output_dir, Path::new("/out"));
    }

    #[test]
    fn output_path_keeps_stem() {
        let c = WatchConfig::builder().output_dir("/out").build().unwrap();
        assert_eq!(
            c.output_path_for(Path::new("/in/report.pdf")),
            Path::new("/out/report.gif")
        );
        assert_eq!(
            c.output_path_for(Path::new("/in/Scan.2024.PDF")),
            Path::new("/out/Scan.2024.gif")
        );
    }

    #[cfg(unix)]
    #[test]
    fn output_path_keeps_non_utf8_stem() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let c = WatchConfig::builder().output_dir("/out").build().unwrap();
        let a = c.output_path_for(Path::new(OsStr::from_bytes(b"/in/scan\xff.pdf")));
        let b = c.output_path_for(Path::new(OsStr::from_bytes(b"/in/scan\xfe.pdf")));

        assert_eq!(a.file_name().unwrap().as_bytes(), b"scan\xff.gif");
        assert_ne!(a, b);
    }

    #[test]
    fn setters_clamp_ranges() {
        let c = WatchConfig::builder().dpi(5).max_colors(1000).build().unwrap();
        assert_eq!(c.dpi, 36);
        assert_eq!(c.max_colors, 256);
    }

    #[test]
    fn rejects_bad_scale_factor() {
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY, 10.0] {
            let err = WatchConfig::builder().scale_factor(bad).build();
            assert!(
                matches!(err, Err(Pdf2GifError::InvalidConfig(_))),
                "scale {bad} should be rejected"
            );
        }
    }

    #[test]
    fn round_trips_through_json() {
        let c = WatchConfig::builder().max_colors(4).build().unwrap();
        let json = serde_json::to_string(&c).unwrap();
        let back: WatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: WatchConfig = serde_json::from_str(r#"{"watch_dir": "/in", "dpi": 150}"#).unwrap();
        assert_eq!(c.output_dir, Path::new("/in/gifs"));
        assert_eq!(c.dpi, 150);
        assert_eq!(c.max_colors, 15);
    }

    #[test]
    fn deserialising_validates_ranges() {
        for bad in [
            r#"{"dpi": 5}"#,
            r#"{"dpi": 601}"#,
            r#"{"max_colors": 1}"#,
            r#"{"max_colors": 300}"#,
            r#"{"scale_factor": 0.0}"#,
            r#"{"scale_factor": 4.5}"#,
            r#"{"colours": 8}"#,
        ] {
            let err = serde_json::from_str::<WatchConfig>(bad);
            assert!(err.is_err(), "{bad} should be rejected");
        }
        let msg = serde_json::from_str::<WatchConfig>(r#"{"dpi": 5}"#)
            .unwrap_err()
            .to_string();
        assert!(msg.contains("DPI"), "got: {msg}");
    }
}
