//! CLI binary for edgequake-pdf2gif.
//!
//! A thin shim over the library crate that maps CLI flags to `WatchConfig`,
//! installs logging, binds pdfium, and runs the watcher until SIGINT/SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2gif::{logging, PdfiumRasterizer, WatchConfig, Watcher};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Watch the current directory, write GIFs to ./gifs every 5 minutes
  pdf2gif

  # Watch an inbox once a minute with a tighter palette
  pdf2gif --watch-dir /srv/inbox --interval 60 --max-colors 8

  # Single pass, machine-readable report
  pdf2gif --once --json

  # Full-size output at higher density
  pdf2gif --dpi 150 --scale 1.0

OUTPUT:
  Each <name>.pdf becomes <output-dir>/<name>.gif (first page only,
  grayscale, palette of at most --max-colors entries). The PDF is deleted
  once the GIF is written; PDFs that fail stay put and are retried next pass.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to an existing libpdfium
  RUST_LOG          Overrides the log filter (e.g. debug)

SETUP:
  pdf2gif needs the pdfium shared library. Put libpdfium next to the
  working directory, install it system-wide, or point PDFIUM_LIB_PATH at it.
  Pre-built binaries: https://github.com/bblanchon/pdfium-binaries/releases
"#;

/// Watch a directory and convert the first page of each PDF to a grayscale GIF.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2gif",
    version,
    about = "Watch a directory and convert each PDF's first page to a grayscale GIF",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory scanned for PDF files.
    #[arg(long, env = "PDF2GIF_WATCH_DIR", default_value = ".")]
    watch_dir: PathBuf,

    /// Directory GIFs are written to. Default: <watch-dir>/gifs.
    #[arg(short, long, env = "PDF2GIF_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Seconds between two scans.
    #[arg(long, env = "PDF2GIF_INTERVAL", default_value_t = 300)]
    interval: u64,

    /// Rendering DPI (36–600).
    #[arg(long, env = "PDF2GIF_DPI", default_value_t = 100,
          value_parser = clap::value_parser!(u32).range(36..=600))]
    dpi: u32,

    /// Geometric scale applied after rendering (0 < s ≤ 4).
    #[arg(long, env = "PDF2GIF_SCALE", default_value_t = 0.80)]
    scale: f32,

    /// Maximum palette entries in the GIF (2–256).
    #[arg(long, env = "PDF2GIF_MAX_COLORS", default_value_t = 15,
          value_parser = clap::value_parser!(u16).range(2..=256))]
    max_colors: u16,

    /// Append-only log file.
    #[arg(long, env = "PDF2GIF_LOG_FILE", default_value = "pdf_to_gif_converter.log")]
    log_file: PathBuf,

    /// Path to libpdfium. Default: working directory, then system library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Run one pass and exit.
    #[arg(long, env = "PDF2GIF_ONCE")]
    once: bool,

    /// With --once, print the pass report as JSON on stdout.
    #[arg(long, env = "PDF2GIF_JSON", requires = "once")]
    json: bool,

    /// Enable DEBUG-level logs.
    #[arg(short, long, env = "PDF2GIF_VERBOSE")]
    verbose: bool,

    /// Do not mirror logs to stderr.
    #[arg(short, long, env = "PDF2GIF_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose { "debug" } else { "info" };
    logging::init(&cli.log_file, filter, cli.quiet)
        .with_context(|| format!("Failed to open log file {}", cli.log_file.display()))?;

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;
    tracing::debug!("Configuration: {:?}", config);

    // ── Bind PDFium ──────────────────────────────────────────────────────
    let rasterizer = PdfiumRasterizer::bind(cli.pdfium_lib.as_deref())
        .context("PDFium is not available")?;
    let watcher = Watcher::new(config, Arc::new(rasterizer));

    // ── Single pass ──────────────────────────────────────────────────────
    if cli.once {
        watcher
            .ensure_output_dir()
            .await
            .context("Cannot prepare output directory")?;
        let report = watcher.run_pass(&CancellationToken::new()).await;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialise report")?
            );
        }
        return Ok(());
    }

    // ── Watch until interrupted ──────────────────────────────────────────
    let cancel = CancellationToken::new();
    let stop = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        stop.cancel();
    });

    watcher
        .run(cancel)
        .await
        .context("Watcher could not start")?;

    Ok(())
}

/// Map CLI args to `WatchConfig`.
fn build_config(cli: &Cli) -> Result<WatchConfig> {
    let mut builder = WatchConfig::builder()
        .watch_dir(&cli.watch_dir)
        .scan_interval_secs(cli.interval)
        .dpi(cli.dpi)
        .scale_factor(cli.scale)
        .max_colors(cli.max_colors);

    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_dir(dir);
    }

    builder.build().context("Invalid configuration")
}

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Interrupted by user"),
            Err(e) => tracing::error!("Failed to install Ctrl+C handler: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received SIGTERM");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_map_to_reference_config() {
        let cli = Cli::parse_from(["pdf2gif"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config, WatchConfig::default());
    }

    #[test]
    fn output_dir_flag_overrides_default() {
        let cli = Cli::parse_from(["pdf2gif", "--watch-dir", "/in", "-o", "/out"]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.watch_dir, PathBuf::from("/in"));
        assert_eq!(config.output_dir, PathBuf::from("/out"));
    }

    #[test]
    fn json_requires_once() {
        assert!(Cli::try_parse_from(["pdf2gif", "--json"]).is_err());
        assert!(Cli::try_parse_from(["pdf2gif", "--once", "--json"]).is_ok());
    }

    #[test]
    fn rejects_out_of_range_palette() {
        assert!(Cli::try_parse_from(["pdf2gif", "--max-colors", "1"]).is_err());
    }
}
