//! External process strategy: optional compile step, then the program itself.

use std::{path::Path, time::Duration};

use crate::{
    error::Result,
    language::CommandLine,
    process::{run_captured, ProcessOutput},
};

use super::ExecutionResult;

/// Run `compile` (if any) and then `run`, feeding `inputs` joined by newlines to the
/// program's stdin. A non-zero exit from either step is a failed result.
pub async fn run_steps(
    compile: Option<&CommandLine>,
    run: &CommandLine,
    inputs: &[String],
    cwd: &Path,
    timeout: Option<Duration>,
) -> Result<ExecutionResult> {
    if let Some(compile) = compile {
        let out = run_captured(compile, None, cwd, timeout).await?;
        if !out.success {
            return Ok(exit_failure("compilation", &out));
        }
    }

    let stdin = inputs.join("\n");
    let out = run_captured(run, Some(&stdin), cwd, timeout).await?;
    if !out.success {
        return Ok(exit_failure("program", &out));
    }

    let mut result = ExecutionResult::succeeded(&out.stdout).with_stderr(&out.stderr);
    result.exit_code = out.code;
    Ok(result)
}

fn exit_failure(step: &str, out: &ProcessOutput) -> ExecutionResult {
    let status = out
        .code
        .map(|c| format!("status {}", c))
        .unwrap_or_else(|| "a signal".to_string());
    let mut error = format!("{} exited with {}", step, status);
    let stderr = out.stderr.trim();
    if !stderr.is_empty() {
        error.push_str(": ");
        error.push_str(stderr);
    }

    let mut result = ExecutionResult::failed(error)
        .with_output(&out.stdout)
        .with_stderr(&out.stderr);
    result.exit_code = out.code;
    result
}
