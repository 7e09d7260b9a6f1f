//! Extraction configuration.
//!
//! [`ExtractionConfig`] is a builder describing *what* to pull out of a
//! video (frame stride, time window, image format). [`GatewayTimeouts`]
//! bounds *how long* each call to the transcoder gateway may take.
//!
//! Both are plain values: the engine resolves them once at the start of an
//! extraction and never re-reads them mid-operation.
//!
//! # Example
//!
//! ```
//! use framepipe::{ExtractionConfig, FrameFormat};
//!
//! let config = ExtractionConfig::new()
//!     .with_frame_interval(10)
//!     .with_start_time(5.0)
//!     .with_end_time(20.0)
//!     .with_frame_format(FrameFormat::Jpeg);
//!
//! assert_eq!(config.frame_interval(), 10);
//! assert_eq!(config.end_time(), Some(20.0));
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

/// Frame interval used when none is configured.
pub const DEFAULT_FRAME_INTERVAL: u32 = 30;

/// Image format written for each extracted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameFormat {
    /// Lossless PNG. This is the default.
    #[default]
    Png,
    /// JPEG, encoded by the gateway with its default quality.
    Jpeg,
}

impl FrameFormat {
    /// File extension (without the dot) used in frame file names.
    pub fn extension(self) -> &'static str {
        match self {
            FrameFormat::Png => "png",
            FrameFormat::Jpeg => "jpg",
        }
    }

    /// Parse a user-supplied format name such as `"png"` or `"JPEG"`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Some(FrameFormat::Png),
            "jpg" | "jpeg" => Some(FrameFormat::Jpeg),
            _ => None,
        }
    }
}

impl Display for FrameFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.extension())
    }
}

/// What to extract from a video.
///
/// All fields have defaults: a default-constructed config selects every
/// 30th frame from the start of the video to its end and writes PNG files.
/// Passing `None` to [`FrameExtractor::extract`](crate::FrameExtractor::extract)
/// is identical to passing `&ExtractionConfig::default()`.
///
/// The builder clamps values that the gateway cannot express (a zero
/// interval, a negative start), but it deliberately does **not** check
/// `end_time > start_time`; an inverted window is handed to the gateway
/// as-is and normally ends as
/// [`NoOutputProduced`](crate::ExtractionError::NoOutputProduced).
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct ExtractionConfig {
    pub(crate) frame_interval: u32,
    pub(crate) start_time: f64,
    pub(crate) end_time: Option<f64>,
    pub(crate) frame_format: FrameFormat,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionConfig {
    /// Create a configuration with default settings.
    ///
    /// Defaults: interval 30, start 0.0 s, no end, PNG output.
    pub fn new() -> Self {
        Self {
            frame_interval: DEFAULT_FRAME_INTERVAL,
            start_time: 0.0,
            end_time: None,
            frame_format: FrameFormat::Png,
        }
    }

    /// Emit one frame every `interval` source frames.
    ///
    /// Clamped to a minimum of 1.
    pub fn with_frame_interval(mut self, interval: u32) -> Self {
        self.frame_interval = interval.max(1);
        self
    }

    /// Seek to `seconds` before selecting frames.
    ///
    /// Negative and non-finite values are clamped to 0.0.
    pub fn with_start_time(mut self, seconds: f64) -> Self {
        self.start_time = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        self
    }

    /// Stop extracting at `seconds` (measured from the start of the video).
    pub fn with_end_time(mut self, seconds: f64) -> Self {
        self.end_time = Some(seconds);
        self
    }

    /// Remove a previously configured end time.
    pub fn without_end_time(mut self) -> Self {
        self.end_time = None;
        self
    }

    /// Select the image format of the emitted frames.
    pub fn with_frame_format(mut self, format: FrameFormat) -> Self {
        self.frame_format = format;
        self
    }

    /// Frame stride.
    pub fn frame_interval(&self) -> u32 {
        self.frame_interval
    }

    /// Start offset in seconds.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// End offset in seconds, if any.
    pub fn end_time(&self) -> Option<f64> {
        self.end_time
    }

    /// Image format of the emitted frames.
    pub fn frame_format(&self) -> FrameFormat {
        self.frame_format
    }

    /// Length of the extraction window in seconds, when an end is set.
    ///
    /// May be zero or negative for an inverted window; it is passed to the
    /// gateway unchanged.
    pub fn window_length(&self) -> Option<f64> {
        self.end_time.map(|end| end - self.start_time)
    }

    /// Returns `true` when an end time is set but does not lie after the
    /// start time.
    pub fn has_inverted_window(&self) -> bool {
        self.end_time.is_some_and(|end| end <= self.start_time)
    }
}

/// Per-call time limits for the transcoder gateway.
///
/// Defaults: 10 s for the availability check, 30 s for a metadata probe,
/// 300 s for a frame extraction. A zero duration is clamped to one
/// millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct GatewayTimeouts {
    /// Limit for `<gateway> -version`.
    pub availability: Duration,
    /// Limit for the metadata probe.
    pub probe: Duration,
    /// Limit for the extraction call itself.
    pub extraction: Duration,
}

impl Default for GatewayTimeouts {
    fn default() -> Self {
        Self {
            availability: Duration::from_secs(10),
            probe: Duration::from_secs(30),
            extraction: Duration::from_secs(300),
        }
    }
}

impl GatewayTimeouts {
    /// Create the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the availability-check limit.
    pub fn with_availability(mut self, limit: Duration) -> Self {
        self.availability = limit.max(Duration::from_millis(1));
        self
    }

    /// Set the metadata-probe limit.
    pub fn with_probe(mut self, limit: Duration) -> Self {
        self.probe = limit.max(Duration::from_millis(1));
        self
    }

    /// Set the extraction limit.
    pub fn with_extraction(mut self, limit: Duration) -> Self {
        self.extraction = limit.max(Duration::from_millis(1));
        self
    }
}
