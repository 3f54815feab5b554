//! Result types produced by the converter and the poll loop.

use crate::error::ConversionError;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// What happened to one input file during a pass.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// The GIF was written.
    Converted {
        input: PathBuf,
        output: PathBuf,
        /// Output width in pixels.
        width: u32,
        /// Output height in pixels.
        height: u32,
        /// Palette entries actually used.
        colors: usize,
        /// `false` when the GIF exists but the PDF could not be deleted.
        source_removed: bool,
    },
    /// Nothing was written; the input stays for the next pass.
    Failed {
        input: PathBuf,
        error: ConversionError,
    },
}

impl FileOutcome {
    pub fn input(&self) -> &std::path::Path {
        match self {
            FileOutcome::Converted { input, .. } | FileOutcome::Failed { input, .. } => input,
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, FileOutcome::Converted { .. })
    }
}

/// Outcome of one scan-and-convert pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PassReport {
    /// One entry per file attempted, in scan order.
    pub outcomes: Vec<FileOutcome>,
    /// Set when the watched directory could not be listed.
    pub scan_error: Option<String>,
    /// `true` when cancellation stopped the pass before every file was tried.
    pub interrupted: bool,
}

impl PassReport {
    /// Number of GIFs written in this pass.
    pub fn converted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_converted()).count()
    }

    /// Number of files that failed and were left in place.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.converted()
    }
}

/// Totals reported when the poll loop stops.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Passes started (a pass interrupted midway still counts).
    pub passes: u64,
    /// Successful conversions across all passes.
    pub total_converted: usize,
    /// Wall-clock time from start to stop.
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converted(name: &str) -> FileOutcome {
        FileOutcome::Converted {
            input: PathBuf::from(format!("{name}.pdf")),
            output: PathBuf::from(format!("gifs/{name}.gif")),
            width: 10,
            height: 10,
            colors: 4,
            source_removed: true,
        }
    }

    #[test]
    fn pass_report_counts() {
        let report = PassReport {
            outcomes: vec![
                converted("a"),
                FileOutcome::Failed {
                    input: PathBuf::from("b.pdf"),
                    error: ConversionError::EmptyDocument {
                        path: PathBuf::from("b.pdf"),
                    },
                },
                converted("c"),
            ],
            ..Default::default()
        };
        assert_eq!(report.converted(), 2);
        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn outcome_json_is_tagged() {
        let json = serde_json::to_value(converted("a")).unwrap();
        assert_eq!(json["status"], "converted");
        assert_eq!(json["colors"], 4);
    }

    #[test]
    fn summary_elapsed_in_seconds() {
        let s = RunSummary {
            passes: 2,
            total_converted: 3,
            elapsed: Duration::from_millis(1500),
        };
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["elapsed"], 1.5);
    }
}
