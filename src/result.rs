//! Per-video extraction outcomes.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ExtractionError;

/// Whether an extraction attempt succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionStatus {
    /// Frames were produced.
    Success,
    /// The attempt failed; see [`ExtractionResult::error`].
    Error,
}

impl Display for ExtractionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ExtractionStatus::Success => f.write_str("success"),
            ExtractionStatus::Error => f.write_str("error"),
        }
    }
}

/// The outcome of one extraction attempt.
///
/// Created once at the end of an attempt and never modified. The output
/// directory and the error are mutually exclusive: `outcome` is either the
/// directory the frames were written to, or the reason there are none.
#[derive(Debug)]
#[must_use]
pub struct ExtractionResult {
    /// Source video.
    pub input_path: PathBuf,
    /// Wall-clock time spent on the attempt.
    pub processing_time: Duration,
    /// Output directory on success, cause on failure.
    pub outcome: Result<PathBuf, ExtractionError>,
}

impl ExtractionResult {
    pub(crate) fn success(input_path: PathBuf, output_path: PathBuf, processing_time: Duration) -> Self {
        Self {
            input_path,
            processing_time,
            outcome: Ok(output_path),
        }
    }

    pub(crate) fn failure(input_path: PathBuf, error: ExtractionError, processing_time: Duration) -> Self {
        Self {
            input_path,
            processing_time,
            outcome: Err(error),
        }
    }

    /// `Success` or `Error`.
    pub fn status(&self) -> ExtractionStatus {
        match self.outcome {
            Ok(_) => ExtractionStatus::Success,
            Err(_) => ExtractionStatus::Error,
        }
    }

    /// Returns `true` on success.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Directory the frames were written to; `None` on failure.
    pub fn output_path(&self) -> Option<&Path> {
        self.outcome.as_deref().ok()
    }

    /// The failure cause; `None` on success.
    pub fn error(&self) -> Option<&ExtractionError> {
        self.outcome.as_ref().err()
    }

    /// Human-readable failure cause; `None` on success.
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }

    /// File name of the source video, for display.
    pub fn input_name(&self) -> String {
        self.input_path
            .file_name()
            .unwrap_or(self.input_path.as_os_str())
            .to_string_lossy()
            .into_owned()
    }
}
