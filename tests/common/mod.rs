//! Shared helpers for integration tests.
//!
//! [`FakeRunner`] stands in for the ffmpeg process: it records every call
//! and answers `-version`, probe, and extraction invocations according to
//! its configuration.

#![allow(dead_code)]

use std::ffi::OsString;
use std::fs;
use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use framepipe::{CommandOutput, CommandRunner, ExtractionError, FrameExtractor, Gateway};

/// What the fake does when asked to extract frames.
#[derive(Debug, Clone)]
pub enum Extraction {
    /// Exit 0 after writing this many frame files.
    Frames(usize),
    /// Exit 0 without writing anything.
    Nothing,
    /// Exit with `code`, printing `stderr`.
    Fail { code: i32, stderr: String },
    /// Report a timeout.
    Timeout,
}

#[derive(Debug)]
pub struct FakeRunner {
    pub available: bool,
    pub extraction: Extraction,
    pub probe_stderr: String,
    /// When set, probe calls wait this long and then report a timeout.
    pub probe_delay: Option<Duration>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeRunner {
    pub fn new(extraction: Extraction) -> Self {
        Self {
            available: true,
            extraction,
            probe_stderr: String::new(),
            probe_delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(Extraction::Frames(1))
        }
    }

    pub fn with_probe_stderr(mut self, stderr: &str) -> Self {
        self.probe_stderr = stderr.to_string();
        self
    }

    pub fn with_slow_probe(mut self, delay: Duration) -> Self {
        self.probe_delay = Some(delay);
        self
    }

    /// Every recorded call, as lossily-decoded argument lists.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Only the extraction calls (those carrying a `-vf` filter).
    pub fn extraction_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|args| args.iter().any(|arg| arg == "-vf"))
            .collect()
    }

    pub fn version_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|args| args.as_slice() == ["-version"])
            .count()
    }
}

impl CommandRunner for FakeRunner {
    fn run(
        &self,
        _program: &Path,
        args: &[OsString],
        timeout: Duration,
    ) -> Result<CommandOutput, ExtractionError> {
        let args: Vec<String> = args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        self.calls.lock().unwrap().push(args.clone());

        if args.as_slice() == ["-version"] {
            return if self.available {
                Ok(CommandOutput {
                    code: Some(0),
                    stdout: "ffmpeg version fake".to_string(),
                    stderr: String::new(),
                })
            } else {
                Err(IoError::new(ErrorKind::NotFound, "no such file").into())
            };
        }

        if args.last().is_some_and(|last| last == "-") {
            if let Some(delay) = self.probe_delay {
                std::thread::sleep(delay);
                return Err(ExtractionError::Timeout(delay));
            }
            return Ok(CommandOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: self.probe_stderr.clone(),
            });
        }

        let pattern = args.last().cloned().unwrap_or_default();
        match &self.extraction {
            Extraction::Frames(count) => {
                for index in 1..=*count {
                    fs::write(expand_pattern(&pattern, index), b"frame")?;
                }
                Ok(CommandOutput {
                    code: Some(0),
                    ..CommandOutput::default()
                })
            }
            Extraction::Nothing => Ok(CommandOutput {
                code: Some(0),
                ..CommandOutput::default()
            }),
            Extraction::Fail { code, stderr } => Ok(CommandOutput {
                code: Some(*code),
                stdout: String::new(),
                stderr: stderr.clone(),
            }),
            Extraction::Timeout => Err(ExtractionError::Timeout(timeout)),
        }
    }
}

/// Expand the `%%` and `%04d` conversions the way the gateway does.
fn expand_pattern(pattern: &str, index: usize) -> String {
    let mut expanded = String::new();
    let mut rest = pattern;
    while let Some(position) = rest.find('%') {
        expanded.push_str(&rest[..position]);
        let tail = &rest[position..];
        if let Some(after) = tail.strip_prefix("%%") {
            expanded.push('%');
            rest = after;
        } else if let Some(after) = tail.strip_prefix("%04d") {
            expanded.push_str(&format!("{index:04}"));
            rest = after;
        } else {
            panic!("unsupported conversion in {pattern}");
        }
    }
    expanded.push_str(rest);
    expanded
}

pub fn extractor(runner: &Arc<FakeRunner>) -> FrameExtractor {
    FrameExtractor::with_gateway(Gateway::new("ffmpeg").with_runner(runner.clone()))
}

/// Create an (empty) stand-in video file.
pub fn touch_video(directory: &Path, name: &str) -> PathBuf {
    let path = directory.join(name);
    fs::write(&path, b"not really a video").expect("Failed to write video stub");
    path
}
