//! # framepipe
//!
//! Batch video frame extraction on top of the `ffmpeg` command-line tool.
//!
//! `framepipe` drives an installed `ffmpeg` to dump every Nth frame of a
//! video as numbered images, checks that frames were really written, and
//! summarises a batch of videos in a small Markdown report. Each video is
//! handled on its own: a bad file yields an error result and the batch
//! carries on.
//!
//! ## Quick Start
//!
//! ### Extract Frames From One Video
//!
//! ```no_run
//! use framepipe::{ExtractionConfig, FrameExtractor};
//!
//! let extractor = FrameExtractor::new();
//! let config = ExtractionConfig::new().with_frame_interval(30);
//! let result = extractor.extract("clip.mp4", "frames/clip", Some(&config));
//! println!("{}: {}", result.input_name(), result.status());
//! ```
//!
//! ### Process a Directory and Write a Report
//!
//! ```no_run
//! use std::path::Path;
//!
//! use framepipe::{FrameExtractor, discovery, write_summary};
//!
//! let videos = discovery::find_videos(Path::new("data/input"), false)?;
//! let extractor = FrameExtractor::new();
//! let results: Vec<_> = extractor.extract_batch(&videos, "data/output", None).collect();
//! write_summary(&results, "data/output/frame_extraction_report.md")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Inspect a Video
//!
//! ```no_run
//! use framepipe::FrameExtractor;
//!
//! if let Some(info) = FrameExtractor::new().video_info("clip.mp4") {
//!     println!("{:?} {:?} {:?}", info.duration, info.fps, info.dimensions());
//! }
//! ```
//!
//! ## Features
//!
//! - **Interval extraction**: every Nth source frame, optionally inside a
//!   start/end window, as PNG or JPEG
//! - **Availability check**: the gateway is asked for `-version` before
//!   every extraction
//! - **Timeouts**: every gateway call is bounded (10 s / 30 s / 300 s by
//!   default) and killed when it overruns
//! - **Output verification**: a clean exit without frame files is a failure
//! - **Lazy batches**: [`BatchExtraction`] runs one video per `next()`
//! - **Reports**: [`BatchSummary`] and [`write_summary`]
//! - **Metadata probing**: duration, frame rate, and resolution scraped
//!   from the gateway's diagnostics
//!
//! ## Requirements
//!
//! An `ffmpeg` executable on `PATH`, or passed explicitly through
//! [`Gateway::new`].

pub mod batch;
pub mod config;
pub mod discovery;
pub mod error;
pub mod extractor;
pub mod frames;
pub mod gateway;
pub mod logging;
pub mod metadata;
pub mod probe;
pub mod report;
pub mod result;

pub use batch::BatchExtraction;
pub use config::{DEFAULT_FRAME_INTERVAL, ExtractionConfig, FrameFormat, GatewayTimeouts};
pub use error::ExtractionError;
pub use extractor::FrameExtractor;
pub use gateway::{CommandOutput, CommandRunner, DEFAULT_GATEWAY_PROGRAM, Gateway, SystemRunner};
pub use metadata::VideoInfo;
pub use probe::{MetadataProbe, parse_video_info};
pub use report::{BatchSummary, SummaryEntry, write_summary};
pub use result::{ExtractionResult, ExtractionStatus};
