//! Lightweight video metadata probing.
//!
//! [`MetadataProbe`] runs the gateway once against a file, decoding it to
//! the null muxer, and scrapes the diagnostic text the gateway prints to
//! stderr. The scraping itself lives in [`parse_video_info`], a pure
//! function that can be exercised against captured output without a
//! gateway installed.
//!
//! Probing is best-effort. Informational invocations of the gateway often
//! exit non-zero, so the exit status is ignored; only the text matters.

use std::ffi::OsStr;
use std::path::Path;

use crate::error::ExtractionError;
use crate::gateway::Gateway;
use crate::metadata::VideoInfo;

/// Video metadata probe.
///
/// # Example
///
/// ```no_run
/// use framepipe::{Gateway, MetadataProbe};
///
/// let probe = MetadataProbe::new(Gateway::new("ffmpeg"));
/// if let Some(info) = probe.probe("input.mp4") {
///     println!("{:?} @ {:?} fps", info.duration, info.fps);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetadataProbe {
    gateway: Gateway,
}

impl MetadataProbe {
    /// Create a probe that talks to `gateway`.
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Probe a video and return whatever metadata could be parsed.
    ///
    /// Returns `None` if the gateway could not be run, timed out, or
    /// printed nothing recognisable. Failures are logged, never returned.
    pub fn probe<P: AsRef<Path>>(&self, video_path: P) -> Option<VideoInfo> {
        let video_path = video_path.as_ref();
        match self.try_probe(video_path) {
            Ok(info) => info,
            Err(error) => {
                log::error!(
                    "Failed to read video info for {}: {error}",
                    video_path.display()
                );
                None
            }
        }
    }

    /// Probe a video, surfacing gateway failures as errors.
    ///
    /// `Ok(None)` means the gateway ran but its output contained none of
    /// the expected markers.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::Timeout`] or [`ExtractionError::IoError`]
    /// from the runner.
    pub fn try_probe(&self, video_path: &Path) -> Result<Option<VideoInfo>, ExtractionError> {
        log::debug!("Probing {}", video_path.display());
        let args = [
            OsStr::new("-i"),
            video_path.as_os_str(),
            OsStr::new("-f"),
            OsStr::new("null"),
            OsStr::new("-"),
        ];
        let output = self.gateway.run(args, self.gateway.timeouts().probe)?;
        Ok(parse_video_info(&output.stderr))
    }

    /// Probe several videos, one after another.
    pub fn probe_many<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<Option<VideoInfo>> {
        paths.iter().map(|path| self.probe(path)).collect()
    }
}

/// Parse gateway diagnostic text into a [`VideoInfo`].
///
/// Only the first line carrying each marker is consulted:
///
/// - `Duration:` gives the text up to the next comma;
/// - ` fps` gives the token right before its first occurrence on that
///   line; a line where nothing precedes ` fps` leaves the frame rate
///   unset while the other fields are still reported;
/// - `Video:` gives the first `<width>x<height>` token.
///
/// Returns `None` when none of the three could be found; an all-empty
/// record is never returned.
///
/// # Example
///
/// ```
/// use framepipe::parse_video_info;
///
/// let text = "  Duration: 00:00:05.00, start: 0.000000, bitrate: 1205 kb/s\n\
///             Stream #0:0: Video: h264, yuv420p, 640x360, 30 fps, 30 tbr\n";
/// let info = parse_video_info(text).unwrap();
/// assert_eq!(info.duration.as_deref(), Some("00:00:05.00"));
/// assert_eq!(info.fps.as_deref(), Some("30"));
/// assert_eq!(info.dimensions(), Some((640, 360)));
/// ```
pub fn parse_video_info(diagnostics: &str) -> Option<VideoInfo> {
    let mut info = VideoInfo::default();

    if let Some(line) = first_line_containing(diagnostics, "Duration:") {
        info.duration = line
            .split_once("Duration:")
            .map(|(_, rest)| rest.split(',').next().unwrap_or(rest).trim().to_string());
    }

    if let Some(line) = first_line_containing(diagnostics, " fps") {
        info.fps = line
            .split(" fps")
            .next()
            .and_then(|before| before.split_whitespace().last())
            .map(str::to_string);
    }

    if let Some(line) = first_line_containing(diagnostics, "Video:") {
        if let Some((width, height)) = line.split_whitespace().find_map(parse_resolution) {
            info.width = Some(width.to_string());
            info.height = Some(height.to_string());
        }
    }

    (!info.is_empty()).then_some(info)
}

fn first_line_containing<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    text.lines().find(|line| line.contains(marker))
}

/// Match a `<digits>x<digits>` token, optionally followed by one comma.
fn parse_resolution(token: &str) -> Option<(&str, &str)> {
    let token = token.strip_suffix(',').unwrap_or(token);
    let (width, height) = token.split_once('x')?;
    let is_number = |part: &str| !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit());
    (is_number(width) && is_number(height)).then_some((width, height))
}
