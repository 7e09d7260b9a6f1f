//! Error types for the `framepipe` crate.
//!
//! This module defines [`ExtractionError`], the error type carried by every
//! failed [`ExtractionResult`](crate::ExtractionResult) and returned by the
//! fallible helpers in the crate. Variants carry enough context (paths,
//! exit codes, gateway diagnostics) to be printed straight into a report.

use std::{io::Error as IoError, path::PathBuf, time::Duration};

use image::ImageError;
use thiserror::Error;

/// The unified error type for all `framepipe` operations.
///
/// The extraction engine never lets one of these escape: it is stored in the
/// [`ExtractionResult`](crate::ExtractionResult) of the failed video so a
/// batch can keep going.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractionError {
    /// The input video (or input directory) does not exist.
    #[error("Input does not exist: {}", path.display())]
    MissingInput {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The transcoder gateway could not be run.
    #[error("Gateway not found: {} is not installed or not runnable", program.display())]
    GatewayUnavailable {
        /// Program that failed the availability probe.
        program: PathBuf,
    },

    /// The gateway ran but exited with a non-zero status.
    #[error("Gateway error: {diagnostics}")]
    GatewayFailure {
        /// Exit code, or `None` when the process was terminated by a signal.
        code: Option<i32>,
        /// Diagnostic text the gateway wrote to stderr.
        diagnostics: String,
    },

    /// The gateway did not finish within its allotted time.
    #[error("Processing timed out after {0:?}")]
    Timeout(Duration),

    /// The gateway exited cleanly but left no frame files behind.
    #[error("No frames extracted into {}", directory.display())]
    NoOutputProduced {
        /// Directory that was searched for frames.
        directory: PathBuf,
    },

    /// Any other failure, with its cause captured verbatim.
    #[error("Unexpected error: {0}")]
    Unexpected(String),

    /// An I/O error occurred while preparing, running, or verifying.
    #[error("Unexpected error: {0}")]
    IoError(#[from] IoError),

    /// An extracted frame could not be read back as an image.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}
