//! PDF text extraction utilities.
//!
//! Prefers the external `pdftotext` (quiet, UTF-8) when available and falls back
//! to `pdf-extract` with stderr suppressed on Unix to avoid glyph warnings. Page
//! breaks become blank lines so fences and sentinels survive extraction.

use std::path::Path;
use std::process::{Command, Stdio};

use pdf_extract::extract_text;

use crate::error::{Error, Result};

/// Extract the text content of a PDF file.
pub fn extract_pdf_text(path: &Path) -> Result<String> {
    // `-layout` is left off: it pads lines with spaces and splits code fences.
    if let Ok(output) = Command::new("pdftotext")
        .arg("-q")
        .arg("-enc")
        .arg("UTF-8")
        .arg(path)
        .arg("-")
        .stderr(Stdio::null())
        .output()
    {
        if output.status.success() {
            let raw = String::from_utf8_lossy(&output.stdout);
            return Ok(join_pages(&raw));
        }
    }

    let raw = with_stderr_suppressed_unix(|| extract_text(path))
        .unwrap_or_else(|_| extract_text(path))
        .map_err(|e| {
            Error::Document(format!(
                "Failed to extract text from PDF '{}': {}",
                path.display(),
                e
            ))
        })?;

    Ok(join_pages(&raw))
}

/// Replace form feeds between pages with blank lines.
fn join_pages(raw: &str) -> String {
    raw.split('\u{000C}')
        .map(|page| page.trim_end_matches(['\r', '\n']))
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(unix)]
fn with_stderr_suppressed_unix<F, T>(f: F) -> std::io::Result<T>
where
    F: FnOnce() -> T,
{
    use std::fs::OpenOptions;
    use std::io;
    use std::os::unix::io::AsRawFd;

    extern "C" {
        fn dup(fd: i32) -> i32;
        fn dup2(oldfd: i32, newfd: i32) -> i32;
        fn close(fd: i32) -> i32;
    }

    let null = OpenOptions::new().write(true).open("/dev/null")?;
    let null_fd = null.as_raw_fd();

    unsafe {
        let stderr_fd = 2;
        let saved = dup(stderr_fd);
        if saved == -1 {
            return Err(io::Error::last_os_error());
        }

        if dup2(null_fd, stderr_fd) == -1 {
            let _ = close(saved);
            return Err(io::Error::last_os_error());
        }

        let result = f();

        let _ = dup2(saved, stderr_fd);
        let _ = close(saved);

        Ok(result)
    }
}

#[cfg(not(unix))]
fn with_stderr_suppressed_unix<F, T>(f: F) -> std::io::Result<T>
where
    F: FnOnce() -> T,
{
    Ok(f())
}
