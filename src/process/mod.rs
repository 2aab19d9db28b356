//! Child process management: spawning, stdin feeding, and output capture.

use std::{future::Future, io, path::Path, process::Stdio, time::Duration};

use tokio::{
    io::AsyncWriteExt,
    process::{Child, ChildStderr, ChildStdin, ChildStdout, Command},
};
use tracing::debug;

use crate::{
    error::{Error, Result},
    language::CommandLine,
};

pub mod python;

pub struct ProcessHandle {
    pub child: Child,
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// Captured result of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl From<std::process::Output> for ProcessOutput {
    fn from(out: std::process::Output) -> Self {
        Self {
            code: out.status.code(),
            success: out.status.success(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        }
    }
}

/// Run `cmd` in `cwd` to completion, feeding `input` on stdin when given.
///
/// stdout and stderr are buffered until the process exits. With a `timeout`
/// the child is killed once the deadline passes.
pub async fn run_captured(
    cmd: &CommandLine,
    input: Option<&str>,
    cwd: &Path,
    timeout: Option<Duration>,
) -> Result<ProcessOutput> {
    debug!(command = %cmd, cwd = %cwd.display(), "spawning process");
    let mut command = Command::new(&cmd.program);
    command
        .args(&cmd.args)
        .current_dir(cwd)
        .stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn()?;
    if let Some(text) = input {
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| Error::Interpreter("no stdin".into()))?;
        let data = text.as_bytes().to_vec();
        // Written concurrently so a child that prints before reading cannot deadlock us.
        tokio::spawn(async move {
            let _ = stdin.write_all(&data).await;
        });
    }

    let output = with_timeout(child.wait_with_output(), timeout).await?;
    Ok(output.into())
}

/// Await `fut`, failing with [`Error::Timeout`] when `timeout` elapses first.
pub async fn with_timeout<F, T>(fut: F, timeout: Option<Duration>) -> Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| Error::Timeout(limit.as_secs()))?
            .map_err(Error::from),
        None => Ok(fut.await?),
    }
}
