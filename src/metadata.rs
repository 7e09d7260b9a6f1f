//! Video metadata types.
//!
//! [`VideoInfo`] is produced by [`MetadataProbe`](crate::MetadataProbe). It
//! is stringly-typed: each field holds the text exactly as the
//! gateway printed it, and a missing field means "could not be parsed", not
//! "zero". The accessor methods turn the text into numbers on demand.

use crate::config::ExtractionConfig;

/// Best-effort metadata for a video file.
///
/// # Example
///
/// ```
/// use framepipe::VideoInfo;
///
/// let info = VideoInfo {
///     duration: Some("00:01:30.50".to_string()),
///     fps: Some("29.97".to_string()),
///     width: Some("1920".to_string()),
///     height: Some("1080".to_string()),
/// };
/// assert_eq!(info.duration_seconds(), Some(90.5));
/// assert_eq!(info.dimensions(), Some((1920, 1080)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct VideoInfo {
    /// Container duration as printed, e.g. `"00:00:05.00"`.
    pub duration: Option<String>,
    /// Frame rate as printed, e.g. `"30"` or `"29.97"`.
    pub fps: Option<String>,
    /// Frame width in pixels, as printed.
    pub width: Option<String>,
    /// Frame height in pixels, as printed.
    pub height: Option<String>,
}

impl VideoInfo {
    /// Returns `true` if no field could be parsed.
    pub fn is_empty(&self) -> bool {
        self.duration.is_none() && self.fps.is_none() && self.width.is_none() && self.height.is_none()
    }

    /// Duration in seconds, parsed from `HH:MM:SS(.ff)`.
    ///
    /// Returns `None` for `"N/A"` and anything else that is not a timecode.
    pub fn duration_seconds(&self) -> Option<f64> {
        let text = self.duration.as_deref()?.trim();
        let mut parts = text.split(':');
        let hours: f64 = parts.next()?.parse().ok()?;
        let minutes: f64 = parts.next()?.parse().ok()?;
        let seconds: f64 = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(hours * 3600.0 + minutes * 60.0 + seconds)
    }

    /// Frame rate as a number.
    ///
    /// Accepts plain decimals and the `"k"` suffix the gateway uses for
    /// large rates (`"1k"` → 1000).
    pub fn frames_per_second(&self) -> Option<f64> {
        let text = self.fps.as_deref()?.trim();
        let value = match text.strip_suffix('k') {
            Some(thousands) => thousands.parse::<f64>().ok()? * 1000.0,
            None => text.parse::<f64>().ok()?,
        };
        (value.is_finite() && value > 0.0).then_some(value)
    }

    /// Frame dimensions as `(width, height)`.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        let width = self.width.as_deref()?.parse().ok()?;
        let height = self.height.as_deref()?.parse().ok()?;
        Some((width, height))
    }

    /// Estimate how many frames an extraction with `config` would emit.
    ///
    /// Needs both a duration and a frame rate. The time window is clipped
    /// to the video; an empty or inverted window yields zero.
    pub fn estimated_frame_count(&self, config: &ExtractionConfig) -> Option<u64> {
        let duration = self.duration_seconds()?;
        let fps = self.frames_per_second()?;

        let start = config.start_time().min(duration);
        let end = config.end_time().map_or(duration, |end| end.min(duration));
        if end <= start {
            return Some(0);
        }

        let source_frames = ((end - start) * fps).round() as u64;
        let interval = u64::from(config.frame_interval());
        Some(source_frames.div_ceil(interval))
    }
}
