//! Input video discovery.
//!
//! Batch runs read their videos from an input directory (by convention
//! `data/input`). [`find_videos`] collects the files there whose extension
//! is a known video container, matching extensions case-insensitively.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ExtractionError;

/// Container extensions treated as videos.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm"];

/// Returns `true` if `path` has one of the [`VIDEO_EXTENSIONS`].
pub fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension))
        })
}

/// List video files in `directory`, sorted and without duplicates.
///
/// With `recursive` set, subdirectories are searched too. Entries that
/// cannot be read are skipped.
///
/// # Errors
///
/// Returns [`ExtractionError::MissingInput`] if `directory` does not exist.
pub fn find_videos(directory: &Path, recursive: bool) -> Result<Vec<PathBuf>, ExtractionError> {
    if !directory.is_dir() {
        return Err(ExtractionError::MissingInput {
            path: directory.to_path_buf(),
        });
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut videos: Vec<PathBuf> = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_video_file(path))
        .collect();
    videos.sort();
    videos.dedup();

    log::debug!("Found {} video(s) in {}", videos.len(), directory.display());
    Ok(videos)
}
