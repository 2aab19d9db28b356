//! Hosted Python execution: a JSON request on stdin, a JSON reply file back.

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::debug;

use super::ExecutionResult;
use crate::{
    error::{Error, Result},
    language::SourceFile,
    process::{
        python::{start_python, BOOTSTRAP},
        with_timeout, ProcessHandle,
    },
};

#[derive(Debug, Serialize)]
struct HostedRequest<'a> {
    code: &'a str,
    inputs: &'a [String],
    filename: String,
    reply_path: String,
}

#[derive(Debug, Deserialize)]
struct HostedReply {
    success: bool,
    #[serde(default)]
    output: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    kind: Option<String>,
}

/// Run `code` inside the hosted interpreter with stdout captured in memory and
/// each `input()` call served from `inputs` in order.
pub async fn execute_ndjson(
    interpreter: &str,
    code: &str,
    inputs: &[String],
    file: &SourceFile,
    timeout: Option<Duration>,
) -> Result<ExecutionResult> {
    let ProcessHandle {
        mut child,
        mut stdin,
        mut stdout,
        mut stderr,
    } = start_python(interpreter, BOOTSTRAP, &file.dir).await?;

    let reply_path = file.dir.join(REPLY_FILE);
    // A stale reply from an earlier run in a reused work dir must not be picked up.
    if reply_path.exists() {
        fs::remove_file(&reply_path)?;
    }
    let request = HostedRequest {
        code,
        inputs,
        filename: file.path.display().to_string(),
        reply_path: reply_path.display().to_string(),
    };
    let mut line = serde_json::to_string(&request)?;
    line.push('\n');
    stdin.write_all(line.as_bytes()).await?;
    drop(stdin);

    let (raw, errors) = with_timeout(
        async {
            let mut raw = String::new();
            let mut errors = String::new();
            let (out, err) = tokio::join!(
                stdout.read_to_string(&mut raw),
                stderr.read_to_string(&mut errors)
            );
            out?;
            err?;
            child.wait().await?;
            Ok::<_, std::io::Error>((raw, errors))
        },
        timeout,
    )
    .await?;

    if !raw.trim().is_empty() {
        debug!(bytes = raw.len(), "ignoring output written past the stdout redirect");
    }

    let reply = read_reply(&reply_path, &errors)?;
    debug!(success = reply.success, kind = ?reply.kind, "hosted interpreter replied");
    Ok(into_result(reply).with_stderr(&errors))
}

const REPLY_FILE: &str = ".snipcheck-reply.json";

fn read_reply(path: &Path, stderr: &str) -> Result<HostedReply> {
    let text = fs::read_to_string(path).map_err(|_| {
        Error::Interpreter(format!("no reply from interpreter: {}", stderr.trim()))
    })?;
    Ok(serde_json::from_str(&text)?)
}

fn into_result(reply: HostedReply) -> ExecutionResult {
    if reply.success {
        return ExecutionResult::succeeded(&reply.output);
    }
    let error = match reply.kind.as_deref() {
        Some("read_exhausted") => Error::ReadExhausted.to_string(),
        _ => reply
            .error
            .unwrap_or_else(|| "execution failed".to_string()),
    };
    ExecutionResult::failed(error).with_output(&reply.output)
}
