//! Access to the transcoder gateway (the `ffmpeg` executable).
//!
//! All decoding, frame selection, and encoding is delegated to an external
//! command-line tool. This module owns the process boundary:
//!
//! - [`CommandRunner`] is the seam between the crate and the operating
//!   system. [`SystemRunner`] spawns real processes; tests substitute a
//!   recording fake.
//! - [`Gateway`] couples a program path with a runner and the per-call
//!   [`GatewayTimeouts`], and implements the availability probe.
//!
//! Every call is synchronous and blocking. Timeouts are enforced here, not
//! by callers: once the deadline passes the child is killed and the call
//! fails with [`ExtractionError::Timeout`].

use std::ffi::{OsStr, OsString};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::GatewayTimeouts;
use crate::error::ExtractionError;

/// Program name used when no explicit gateway path is configured.
pub const DEFAULT_GATEWAY_PROGRAM: &str = "ffmpeg";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Captured result of a finished gateway process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    /// Everything written to stdout, lossily decoded as UTF-8.
    pub stdout: String,
    /// Everything written to stderr, lossily decoded as UTF-8.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns `true` if the process exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs one external command to completion under a time limit.
///
/// Implementations must be [`Send`] and [`Sync`] so a single runner can be
/// shared between extractors.
///
/// # Errors
///
/// Implementations return [`ExtractionError::Timeout`] when the limit is
/// exceeded and [`ExtractionError::IoError`] when the process cannot be
/// spawned (a missing executable surfaces as [`ErrorKind::NotFound`]).
/// A non-zero exit is **not** an error at this level; it is reported
/// through [`CommandOutput::code`].
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, waiting at most `timeout`.
    fn run(
        &self,
        program: &Path,
        args: &[OsString],
        timeout: Duration,
    ) -> Result<CommandOutput, ExtractionError>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
///
/// The child's stdin is closed so an interactive prompt (for example
/// "overwrite? [y/N]") fails fast instead of hanging. Stdout and stderr are
/// drained on helper threads while the child is polled for exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &Path,
        args: &[OsString],
        timeout: Duration,
    ) -> Result<CommandOutput, ExtractionError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(error) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(error.into());
                }
            }

            let now = Instant::now();
            if now >= deadline {
                // Readers are left detached: grandchildren may still hold
                // the pipes open.
                let _ = child.kill();
                let _ = child.wait();
                log::debug!(
                    "Killed {} after exceeding {:?}",
                    program.display(),
                    timeout
                );
                return Err(ExtractionError::Timeout(timeout));
            }
            thread::sleep(POLL_INTERVAL.min(deadline - now));
        };

        Ok(CommandOutput {
            code: status.code(),
            stdout: collect(stdout),
            stderr: collect(stderr),
        })
    }
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = reader.read_to_end(&mut buffer);
        buffer
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .map(|handle| handle.join().unwrap_or_default())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

/// The transcoder gateway: a program path, a runner, and time limits.
///
/// Cheap to clone; the runner is shared.
///
/// # Example
///
/// ```no_run
/// use framepipe::Gateway;
///
/// let gateway = Gateway::new("ffmpeg");
/// if !gateway.is_available() {
///     eprintln!("ffmpeg is not installed");
/// }
/// ```
#[derive(Clone)]
pub struct Gateway {
    program: PathBuf,
    runner: Arc<dyn CommandRunner>,
    timeouts: GatewayTimeouts,
}

impl Debug for Gateway {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Gateway")
            .field("program", &self.program)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_PROGRAM)
    }
}

impl Gateway {
    /// Create a gateway for `program` using the [`SystemRunner`] and the
    /// default [`GatewayTimeouts`].
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            runner: Arc::new(SystemRunner),
            timeouts: GatewayTimeouts::default(),
        }
    }

    /// Replace the process runner.
    #[must_use]
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Replace the per-call time limits.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: GatewayTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Path or name of the gateway program.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Configured time limits.
    pub fn timeouts(&self) -> GatewayTimeouts {
        self.timeouts
    }

    /// Check whether the gateway can be run right now.
    ///
    /// Runs `<gateway> -version` under the availability time limit and
    /// returns `true` only on a zero exit. A timeout, a missing executable,
    /// or any other failure yields `false`. The answer is never cached;
    /// the extraction engine asks again before every video.
    pub fn is_available(&self) -> bool {
        match self.run(["-version"], self.timeouts.availability) {
            Ok(output) => output.success(),
            Err(ExtractionError::IoError(error)) if error.kind() == ErrorKind::NotFound => {
                log::debug!("Gateway {} not found on PATH", self.program.display());
                false
            }
            Err(error) => {
                log::debug!(
                    "Gateway {} availability check failed: {error}",
                    self.program.display()
                );
                false
            }
        }
    }

    /// Run the gateway with `args` under `timeout`.
    pub(crate) fn run<I, S>(&self, args: I, timeout: Duration) -> Result<CommandOutput, ExtractionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_os_string())
            .collect();
        self.runner.run(&self.program, &args, timeout)
    }
}
