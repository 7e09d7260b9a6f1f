//! Lazy, sequential batch extraction.
//!
//! [`BatchExtraction`] implements [`Iterator`] and runs one extraction per
//! call to [`next()`](Iterator::next), in input order. Videos are processed
//! strictly one after another; a failure produces an error result and the
//! batch moves on.
//!
//! Create a `BatchExtraction` via
//! [`FrameExtractor::extract_batch`](crate::FrameExtractor::extract_batch).
//!
//! # Example
//!
//! ```no_run
//! use framepipe::FrameExtractor;
//!
//! let extractor = FrameExtractor::new();
//! let videos = ["data/input/a.mp4", "data/input/b.mp4"];
//!
//! for result in extractor.extract_batch(videos, "data/output", None) {
//!     println!("{}: {}", result.input_name(), result.status());
//! }
//! ```

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::ExtractionConfig;
use crate::extractor::FrameExtractor;
use crate::result::ExtractionResult;

/// A lazy iterator over per-video extraction results.
///
/// Each video `v` is extracted into `output_base_dir / stem(v)`. The
/// iterator is forward-only and cannot be resumed: building a new one for
/// the same inputs re-runs every extraction from scratch.
///
/// Two inputs with the same stem (e.g. `a/clip.mp4` and `b/clip.mov`)
/// share an output directory and their frames overwrite each other. The
/// iterator logs a warning when it sees a repeated stem but still honours
/// the per-stem layout.
pub struct BatchExtraction<'a, I> {
    extractor: &'a FrameExtractor,
    video_paths: I,
    output_base_dir: PathBuf,
    config: Option<ExtractionConfig>,
    seen_stems: HashSet<OsString>,
}

impl<'a, I> BatchExtraction<'a, I> {
    pub(crate) fn new(
        extractor: &'a FrameExtractor,
        video_paths: I,
        output_base_dir: PathBuf,
        config: Option<ExtractionConfig>,
    ) -> Self {
        Self {
            extractor,
            video_paths,
            output_base_dir,
            config,
            seen_stems: HashSet::new(),
        }
    }

    /// Base directory under which per-video directories are created.
    pub fn output_base_dir(&self) -> &Path {
        &self.output_base_dir
    }
}

impl<I, P> Iterator for BatchExtraction<'_, I>
where
    I: Iterator<Item = P>,
    P: AsRef<Path>,
{
    type Item = ExtractionResult;

    fn next(&mut self) -> Option<Self::Item> {
        let video_path = self.video_paths.next()?;
        let video_path = video_path.as_ref();

        let stem = video_path.file_stem().unwrap_or_default().to_os_string();
        let output_dir = batch_output_dir(&self.output_base_dir, video_path);
        if !self.seen_stems.insert(stem) {
            log::warn!(
                "{} shares its output directory {} with an earlier video in this batch",
                video_path.display(),
                output_dir.display()
            );
        }

        Some(
            self.extractor
                .extract(video_path, &output_dir, self.config.as_ref()),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.video_paths.size_hint()
    }
}

/// Output directory a batch uses for `video_path`.
///
/// ```
/// use std::path::Path;
///
/// use framepipe::batch::batch_output_dir;
///
/// assert_eq!(
///     batch_output_dir(Path::new("out"), Path::new("in/clip.mp4")),
///     Path::new("out").join("clip"),
/// );
/// ```
pub fn batch_output_dir(output_base_dir: &Path, video_path: &Path) -> PathBuf {
    output_base_dir.join(video_path.file_stem().unwrap_or_default())
}
