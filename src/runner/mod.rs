//! Runs the target command while mirroring and capturing its output.
//!
//! Standard output is copied live to this process's stdout and into two
//! buffers: one holding only stdout, one holding everything. Standard error
//! is copied live to this process's stderr and into the combined buffer.
//! Both streams are drained by their own task while the child runs, and
//! the result is only assembled once both drains and the wait are done.

pub mod tee;
pub mod usage;

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::error::Error;
use tee::{Passthrough, SharedBuffer, Tee};

const READ_CHUNK: usize = 8 * 1024;

/// Outcome of one finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Program followed by its arguments.
    pub command: Vec<String>,
    /// Exit code; `128 + signal` when the child was killed by a signal.
    pub exit_code: i32,
    /// User-mode CPU time charged to the child.
    pub user_time: Duration,
    /// Everything the child wrote to standard output.
    pub stdout: Vec<u8>,
    /// Everything the child wrote to either stream, in arrival order.
    pub combined: Vec<u8>,
}

impl ExecutionResult {
    /// Whether the command exited with code zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Spawns commands and collects an [`ExecutionResult`] for each.
#[derive(Debug, Clone, Copy)]
pub struct ProcessRunner {
    passthrough: bool,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self { passthrough: true }
    }
}

impl ProcessRunner {
    /// Runner that mirrors child output onto this process's stdout and stderr.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that only captures, without live mirroring.
    #[must_use]
    pub fn capture_only() -> Self {
        Self { passthrough: false }
    }

    /// Runs `command` to completion.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInvocation`] if `command` is empty.
    /// - [`Error::ProcessStart`] if the program cannot be launched.
    /// - [`Error::Capture`] if draining the streams or waiting on the child fails.
    pub async fn run(&self, command: &[String]) -> Result<ExecutionResult, Error> {
        let Some((program, args)) = command.split_first() else {
            return Err(Error::InvalidInvocation { program: env!("CARGO_PKG_NAME").into() });
        };

        let capture_error =
            |message: String| Error::Capture { command: program.clone(), message };

        let cpu_before = usage::children_user_time();
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::ProcessStart { command: program.clone(), source })?;
        tracing::debug!(command = ?command, pid = child.id(), "spawned child");

        let child_stdout =
            child.stdout.take().ok_or_else(|| capture_error("stdout was not piped".into()))?;
        let child_stderr =
            child.stderr.take().ok_or_else(|| capture_error("stderr was not piped".into()))?;

        let stdout_only = SharedBuffer::new("stdout-only");
        let combined = SharedBuffer::new("combined");

        let mut stdout_tee = Tee::new();
        let mut stderr_tee = Tee::new();
        if self.passthrough {
            stdout_tee = stdout_tee.with(Passthrough::stdout());
            stderr_tee = stderr_tee.with(Passthrough::stderr());
        }
        let stdout_tee = stdout_tee.with(stdout_only.clone()).with(combined.clone());
        let stderr_tee = stderr_tee.with(combined.clone());

        let stdout_task = tokio::spawn(drain(child_stdout, stdout_tee));
        let stderr_task = tokio::spawn(drain(child_stderr, stderr_tee));

        let (status, stdout_drained, stderr_drained) =
            tokio::join!(child.wait(), stdout_task, stderr_task);

        let status = status.map_err(|e| capture_error(format!("wait failed: {e}")))?;
        for (stream, drained) in [("stdout", stdout_drained), ("stderr", stderr_drained)] {
            drained
                .map_err(|e| capture_error(format!("{stream} reader task failed: {e}")))?
                .map_err(|e| capture_error(format!("reading {stream} failed: {e}")))?;
        }
        let user_time = usage::children_user_time().saturating_sub(cpu_before);

        let result = ExecutionResult {
            command: command.to_vec(),
            exit_code: exit_code(status),
            user_time,
            stdout: stdout_only.snapshot(),
            combined: combined.snapshot(),
        };
        tracing::debug!(
            exit_code = result.exit_code,
            user_time = ?result.user_time,
            stdout_bytes = result.stdout.len(),
            combined_bytes = result.combined.len(),
            "child exited"
        );
        Ok(result)
    }
}

/// Copies `reader` into `tee` until end of stream.
async fn drain<R>(mut reader: R, mut tee: Tee) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READ_CHUNK];
    let mut total = 0u64;
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Ok(total);
        }
        tee.write(&buf[..n]);
        total += n as u64;
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status.code().or_else(|| status.signal().map(|sig| 128 + sig)).unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}
