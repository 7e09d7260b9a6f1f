//! Frame file naming and listing.
//!
//! Extracted frames are named `<stem>_frame_<index>.<ext>`, where `index`
//! starts at 1 and is zero-padded to at least four digits. The gateway is
//! handed the printf-style pattern from [`frame_pattern`]; afterwards
//! [`list_frames`] finds what it actually wrote.

use std::fs;
use std::io::Result as IoResult;
use std::path::{Path, PathBuf};

use crate::config::FrameFormat;
use crate::error::ExtractionError;

/// Printf-style output pattern passed to the gateway, e.g.
/// `clip_frame_%04d.png`.
///
/// A literal `%` in the stem is doubled so the gateway does not read it as
/// a conversion; the files it writes still carry the stem unchanged.
pub fn frame_pattern(stem: &str, format: FrameFormat) -> String {
    format!("{}_frame_%04d.{}", stem.replace('%', "%%"), format.extension())
}

/// Concrete file name of the frame with 1-based `index`.
///
/// ```
/// use framepipe::{FrameFormat, frames::frame_file_name};
///
/// assert_eq!(frame_file_name("clip", 7, FrameFormat::Png), "clip_frame_0007.png");
/// assert_eq!(frame_file_name("clip", 12345, FrameFormat::Jpeg), "clip_frame_12345.jpg");
/// ```
pub fn frame_file_name(stem: &str, index: u64, format: FrameFormat) -> String {
    format!("{stem}_frame_{index:04}.{}", format.extension())
}

/// Parse the frame index out of a file name produced for `stem`.
///
/// Returns `None` for names that do not follow the naming contract.
pub fn frame_index(file_name: &str, stem: &str, format: FrameFormat) -> Option<u64> {
    let digits = file_name
        .strip_prefix(stem)?
        .strip_prefix("_frame_")?
        .strip_suffix(format.extension())?
        .strip_suffix('.')?;
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// List the frames for `stem` in `directory`, ordered by frame index.
///
/// Only regular files whose names follow the naming contract are returned;
/// frames of other videos sharing the directory are ignored.
///
/// # Errors
///
/// Returns the I/O error if `directory` cannot be read.
pub fn list_frames(directory: &Path, stem: &str, format: FrameFormat) -> IoResult<Vec<PathBuf>> {
    let mut frames = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(index) = file_name
            .to_str()
            .and_then(|name| frame_index(name, stem, format))
        else {
            continue;
        };
        frames.push((index, entry.path()));
    }
    frames.sort();
    Ok(frames.into_iter().map(|(_, path)| path).collect())
}

/// Read the pixel dimensions of an extracted frame without decoding it
/// fully.
///
/// # Errors
///
/// Returns [`ExtractionError::ImageError`] if the file is not a readable
/// PNG or JPEG.
pub fn frame_dimensions(path: &Path) -> Result<(u32, u32), ExtractionError> {
    Ok(image::image_dimensions(path)?)
}
