//! Hosted Python interpreter bootstrap and I/O glue.

use std::path::Path;

use tokio::process::{Child, Command};

use super::ProcessHandle;
use crate::error::{Error, Result};

/// Runs one request read from stdin as a single JSON line:
/// `{"code": str, "inputs": [str], "filename": str, "reply_path": str}`.
///
/// The code executes with stdout redirected into a buffer and `input()` served
/// from `inputs`. The reply is written as JSON to `reply_path`, out of reach of
/// anything the code writes to the real stdout:
/// `{"success": bool, "output": str, "error": str|null, "kind": str|null}`.
pub const BOOTSTRAP: &str = r#"
import builtins, contextlib, io, json, sys

class ReadExhausted(Exception):
    pass

def _serve():
    request = json.loads(sys.stdin.readline())
    lines = iter(request.get("inputs", []))

    def _input(prompt=""):
        try:
            return next(lines)
        except StopIteration:
            raise ReadExhausted("input requested but no input lines remain") from None

    builtins.input = _input
    buf = io.StringIO()
    reply = {"success": True, "error": None, "kind": None}
    try:
        with contextlib.redirect_stdout(buf):
            code = compile(request["code"], request.get("filename", "<snippet>"), "exec")
            exec(code, {"__name__": "__main__", "__builtins__": builtins})
    except ReadExhausted as e:
        reply.update(success=False, error=str(e), kind="read_exhausted")
    except SystemExit as e:
        if e.code not in (None, 0):
            reply.update(success=False, error="SystemExit: %s" % (e.code,), kind="exit")
    except BaseException as e:
        reply.update(success=False, error="%s: %s" % (type(e).__name__, e), kind="exception")
    reply["output"] = buf.getvalue()
    with open(request["reply_path"], "w", encoding="utf-8") as f:
        json.dump(reply, f)

_serve()
"#;

pub async fn start_python(interpreter: &str, bootstrap: &str, cwd: &Path) -> Result<ProcessHandle> {
    let mut cmd = Command::new(interpreter);
    cmd.arg("-u") // unbuffered
        .arg("-c")
        .arg(bootstrap)
        .current_dir(cwd)
        .kill_on_drop(true)
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped());

    let mut child: Child = cmd.spawn()?;
    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| Error::Interpreter("no stdin".into()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| Error::Interpreter("no stdout".into()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| Error::Interpreter("no stderr".into()))?;

    Ok(ProcessHandle {
        child,
        stdin,
        stdout,
        stderr,
    })
}
