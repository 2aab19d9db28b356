//! Reading input documents from files or stdin.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{Error, Result};

/// Read a document file and return its text.
///
/// Supported formats:
/// - Text files: .md, .txt, .rst, .log, and files without extension
/// - PDF files: .pdf (text extraction)
pub fn read_document(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::Document(format!(
            "Document file '{}' does not exist",
            path.display()
        )));
    }

    if !path.is_file() {
        return Err(Error::Document(format!("'{}' is not a file", path.display())));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "md" | "markdown" | "txt" | "rst" | "log" | "" => Ok(fs::read_to_string(path)?),
        "pdf" => super::pdf::extract_pdf_text(path),
        _ => Err(Error::Document(format!(
            "Unsupported file type: .{}\nCurrently supported: .md, .txt, .rst, .log, .pdf, and files without extension",
            extension
        ))),
    }
}

/// Read the whole of stdin as a document.
pub fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
