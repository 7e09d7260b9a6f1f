//! Batch summary reports.
//!
//! [`BatchSummary`] aggregates a set of [`ExtractionResult`]s into counts
//! and total time, and renders them as a small Markdown document through
//! its [`Display`] implementation. [`write_summary`] writes that document to
//! disk.
//!
//! # Example
//!
//! ```no_run
//! use framepipe::{FrameExtractor, write_summary};
//!
//! let extractor = FrameExtractor::new();
//! let results: Vec<_> = extractor
//!     .extract_batch(["a.mp4", "b.mp4"], "data/output", None)
//!     .collect();
//!
//! write_summary(&results, "data/output/frame_extraction_report.md")?;
//! # Ok::<(), std::io::Error>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs;
use std::io::Result as IoResult;
use std::path::Path;
use std::time::Duration;

use crate::result::ExtractionResult;

/// One line of the details section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    /// File name of the source video.
    pub input_name: String,
    /// Time spent on the video.
    pub processing_time: Duration,
    /// Failure cause, `None` on success.
    pub error_message: Option<String>,
}

/// Aggregate view of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct BatchSummary {
    /// Number of videos processed.
    pub total: usize,
    /// Number of successful extractions.
    pub succeeded: usize,
    /// Number of failed extractions (`total - succeeded`).
    pub failed: usize,
    /// Sum of all processing times.
    pub total_time: Duration,
    /// Per-video entries, in input order.
    pub entries: Vec<SummaryEntry>,
}

impl BatchSummary {
    /// Build a summary from results.
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ExtractionResult>,
    {
        let entries: Vec<SummaryEntry> = results
            .into_iter()
            .map(|result| SummaryEntry {
                input_name: result.input_name(),
                processing_time: result.processing_time,
                error_message: result.error_message(),
            })
            .collect();

        let total = entries.len();
        let succeeded = entries.iter().filter(|entry| entry.error_message.is_none()).count();

        Self {
            total,
            succeeded,
            failed: total - succeeded,
            total_time: entries.iter().map(|entry| entry.processing_time).sum(),
            entries,
        }
    }

    /// Returns `true` if every video succeeded (vacuously true when empty).
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

impl Display for BatchSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "# Frame Extraction Report")?;
        writeln!(f)?;
        writeln!(f, "## Summary")?;
        writeln!(f, "- Files processed: {}", self.total)?;
        writeln!(f, "- Succeeded: {}", self.succeeded)?;
        writeln!(f, "- Failed: {}", self.failed)?;
        writeln!(f, "- Total processing time: {:.2}s", self.total_time.as_secs_f64())?;
        writeln!(f)?;
        write!(f, "## Details")?;

        for entry in &self.entries {
            let marker = if entry.error_message.is_none() { "✅" } else { "❌" };
            write!(
                f,
                "\n- {marker} {} ({:.2}s)",
                entry.input_name,
                entry.processing_time.as_secs_f64()
            )?;
            if let Some(message) = &entry.error_message {
                write!(f, "\n  - Error: {message}")?;
            }
        }
        Ok(())
    }
}

/// Write a summary report for `results` to `report_path`.
///
/// Any existing file is overwritten. Parent directories are not created.
///
/// # Errors
///
/// Returns the I/O error from writing the file.
pub fn write_summary<P: AsRef<Path>>(results: &[ExtractionResult], report_path: P) -> IoResult<()> {
    let report_path = report_path.as_ref();
    let summary = BatchSummary::from_results(results);
    fs::write(report_path, summary.to_string())?;
    log::info!("Wrote report {}", report_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::ExtractionError;

    #[test]
    fn renders_document() {
        let results = vec![
            ExtractionResult::success(
                PathBuf::from("in/a.mp4"),
                PathBuf::from("out/a"),
                Duration::from_millis(1250),
            ),
            ExtractionResult::failure(
                PathBuf::from("in/b.mp4"),
                ExtractionError::Unexpected("boom".to_string()),
                Duration::from_millis(500),
            ),
        ];

        let text = BatchSummary::from_results(&results).to_string();
        let expected = "\
# Frame Extraction Report

## Summary
- Files processed: 2
- Succeeded: 1
- Failed: 1
- Total processing time: 1.75s

## Details
- ✅ a.mp4 (1.25s)
- ❌ b.mp4 (0.50s)
  - Error: Unexpected error: boom";
        assert_eq!(text, expected);
    }

    #[test]
    fn empty_batch() {
        let summary = BatchSummary::from_results(&Vec::<ExtractionResult>::new());
        assert_eq!(summary.total, 0);
        assert!(summary.all_succeeded());
        assert!(summary.to_string().ends_with("## Details"));
    }
}
