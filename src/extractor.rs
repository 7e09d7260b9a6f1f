//! The frame extraction engine.
//!
//! [`FrameExtractor::extract`] runs one attempt for one video:
//!
//! 1. the input must exist;
//! 2. the gateway must answer `-version` (checked every time);
//! 3. the configuration is resolved once;
//! 4. the output directory is created if needed;
//! 5. the gateway is asked to write every Nth frame as a numbered image;
//! 6. the call is bounded by the extraction timeout;
//! 7. the output directory must then contain at least one frame for this
//!    video, because a clean exit alone does not prove anything was written.
//!
//! Every path ends in an [`ExtractionResult`]; nothing is raised past this
//! boundary, so a batch can carry on after a bad file.

use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::batch::BatchExtraction;
use crate::config::ExtractionConfig;
use crate::error::ExtractionError;
use crate::frames::{frame_pattern, list_frames};
use crate::gateway::Gateway;
use crate::metadata::VideoInfo;
use crate::probe::MetadataProbe;
use crate::result::ExtractionResult;

/// Extracts frames from videos through the transcoder gateway.
///
/// Holds no per-video state; every call is independent and may be retried
/// by calling it again. Frame files left behind by an earlier attempt are
/// not cleaned up; a new run replaces the files whose indices it writes
/// again.
///
/// # Example
///
/// ```no_run
/// use framepipe::{ExtractionConfig, FrameExtractor};
///
/// let extractor = FrameExtractor::new();
/// let config = ExtractionConfig::new().with_frame_interval(10);
/// let result = extractor.extract("data/input/clip.mp4", "data/output/clip", Some(&config));
///
/// match result.output_path() {
///     Some(directory) => println!("frames in {}", directory.display()),
///     None => eprintln!("failed: {}", result.error_message().unwrap_or_default()),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrameExtractor {
    gateway: Gateway,
    probe: MetadataProbe,
}

impl FrameExtractor {
    /// Create an extractor that runs `ffmpeg` from `PATH` with the default
    /// timeouts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor on top of a configured [`Gateway`].
    pub fn with_gateway(gateway: Gateway) -> Self {
        Self {
            probe: MetadataProbe::new(gateway.clone()),
            gateway,
        }
    }

    /// The gateway this extractor drives.
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Whether the gateway can be run right now.
    pub fn is_available(&self) -> bool {
        self.gateway.is_available()
    }

    /// Best-effort metadata for `video_path`. See [`MetadataProbe::probe`].
    pub fn video_info<P: AsRef<Path>>(&self, video_path: P) -> Option<VideoInfo> {
        self.probe.probe(video_path)
    }

    /// Extract frames from one video into `output_dir`.
    ///
    /// `None` for `config` means [`ExtractionConfig::default`]. The returned
    /// result carries the output directory on success; the number of frames
    /// is not part of it and can be recovered with
    /// [`list_frames`](crate::frames::list_frames).
    ///
    /// A missing input or an unavailable gateway fails immediately with a
    /// zero processing time and without running the extraction.
    pub fn extract<P, Q>(
        &self,
        video_path: P,
        output_dir: Q,
        config: Option<&ExtractionConfig>,
    ) -> ExtractionResult
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let video_path = video_path.as_ref();
        let output_dir = output_dir.as_ref();

        if !video_path.exists() {
            let error = ExtractionError::MissingInput {
                path: video_path.to_path_buf(),
            };
            return self.fail(video_path, error, Duration::ZERO);
        }

        if !self.gateway.is_available() {
            let error = ExtractionError::GatewayUnavailable {
                program: self.gateway.program().to_path_buf(),
            };
            return self.fail(video_path, error, Duration::ZERO);
        }

        let config = config.cloned().unwrap_or_default();
        if log::log_enabled!(log::Level::Debug) {
            self.log_estimate(video_path, &config);
        }

        let started = Instant::now();

        match self.run_extraction(video_path, output_dir, &config) {
            Ok(frame_count) => {
                let elapsed = started.elapsed();
                log::info!(
                    "Extracted {frame_count} frame(s) from {} in {:.2}s",
                    display_name(video_path),
                    elapsed.as_secs_f64()
                );
                ExtractionResult::success(video_path.to_path_buf(), output_dir.to_path_buf(), elapsed)
            }
            Err(error) => self.fail(video_path, error, started.elapsed()),
        }
    }

    /// Extract frames from each video into `output_base_dir/<stem>`.
    ///
    /// Nothing runs until the returned iterator is advanced. See
    /// [`BatchExtraction`].
    pub fn extract_batch<I, P, Q>(
        &self,
        video_paths: I,
        output_base_dir: Q,
        config: Option<&ExtractionConfig>,
    ) -> BatchExtraction<'_, I::IntoIter>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        BatchExtraction::new(
            self,
            video_paths.into_iter(),
            output_base_dir.as_ref().to_path_buf(),
            config.cloned(),
        )
    }

    /// Returns the number of frames written.
    fn run_extraction(
        &self,
        video_path: &Path,
        output_dir: &Path,
        config: &ExtractionConfig,
    ) -> Result<usize, ExtractionError> {
        fs::create_dir_all(output_dir)?;

        let stem = video_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ExtractionError::Unexpected(format!(
                    "cannot derive a file stem from {}",
                    video_path.display()
                ))
            })?;

        if config.has_inverted_window() {
            log::warn!(
                "End time {:?}s is not after start time {}s for {}; passing it through",
                config.end_time(),
                config.start_time(),
                display_name(video_path)
            );
        }

        let args = extraction_arguments(video_path, output_dir, &stem, config);
        log::info!("Extracting frames from {}", display_name(video_path));
        log::debug!(
            "Gateway command: {} {}",
            self.gateway.program().display(),
            args.iter()
                .map(|arg| arg.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = self.gateway.run(&args, self.gateway.timeouts().extraction)?;
        if !output.success() {
            return Err(ExtractionError::GatewayFailure {
                code: output.code,
                diagnostics: output.stderr.trim().to_string(),
            });
        }

        let frames = list_frames(output_dir, &stem, config.frame_format())?;
        if frames.is_empty() {
            return Err(ExtractionError::NoOutputProduced {
                directory: output_dir.to_path_buf(),
            });
        }

        Ok(frames.len())
    }

    /// Debug aid only: runs outside the timed region and never fails the
    /// extraction.
    fn log_estimate(&self, video_path: &Path, config: &ExtractionConfig) {
        match self.probe.try_probe(video_path) {
            Ok(Some(info)) => log::debug!(
                "{}: duration={:?} fps={:?} size={:?}, expecting ~{:?} frame(s)",
                display_name(video_path),
                info.duration,
                info.fps,
                info.dimensions(),
                info.estimated_frame_count(config)
            ),
            Ok(None) => log::debug!("{}: no metadata in probe output", display_name(video_path)),
            Err(error) => log::debug!("{}: metadata probe skipped: {error}", display_name(video_path)),
        }
    }

    fn fail(&self, video_path: &Path, error: ExtractionError, elapsed: Duration) -> ExtractionResult {
        log::error!("{}: {error}", display_name(video_path));
        ExtractionResult::failure(video_path.to_path_buf(), error, elapsed)
    }
}

/// Build the gateway arguments for one extraction.
///
/// `select` keeps frames whose 0-based index is a multiple of the interval
/// and `-vsync vfr` emits them as selected, so file spacing follows source
/// frame indices rather than wall-clock time.
pub(crate) fn extraction_arguments(
    video_path: &Path,
    output_dir: &Path,
    stem: &str,
    config: &ExtractionConfig,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-i".into(),
        video_path.as_os_str().to_os_string(),
        "-vf".into(),
        format!("select='not(mod(n,{}))'", config.frame_interval()).into(),
        "-vsync".into(),
        "vfr".into(),
        "-start_number".into(),
        "1".into(),
    ];

    if config.start_time() > 0.0 {
        args.push("-ss".into());
        args.push(config.start_time().to_string().into());
    }

    if let Some(length) = config.window_length() {
        args.push("-t".into());
        args.push(length.to_string().into());
    }

    args.push(
        output_dir
            .join(frame_pattern(stem, config.frame_format()))
            .into_os_string(),
    );
    args
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
