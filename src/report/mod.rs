//! JSON report of install and execution results.

use std::{fs, path::Path};

use serde::Serialize;

use crate::{error::Result, execution::ExecutionResult, install::InstallResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportEntry {
    Install {
        library_install_results: Vec<InstallResult>,
    },
    Execution(ExecutionResult),
}

impl ReportEntry {
    pub fn as_execution(&self) -> Option<&ExecutionResult> {
        match self {
            ReportEntry::Execution(r) => Some(r),
            ReportEntry::Install { .. } => None,
        }
    }
}

pub fn to_json(entries: &[ReportEntry]) -> Result<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}

/// Write `entries` as a JSON array, creating parent directories as needed.
pub fn write(path: &Path, entries: &[ReportEntry]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_json(entries)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_serialize_as_flat_records() {
        let entries = vec![
            ReportEntry::Install {
                library_install_results: vec![InstallResult {
                    library: "requests".into(),
                    language: "python".into(),
                    success: true,
                    output: "ok".into(),
                    error: String::new(),
                }],
            },
            ReportEntry::Execution(ExecutionResult::succeeded("Hello, World!")),
        ];
        let value: serde_json::Value = serde_json::from_str(&to_json(&entries).unwrap()).unwrap();
        assert_eq!(value[0]["library_install_results"][0]["library"], "requests");
        assert_eq!(value[1]["success"], true);
        assert_eq!(value[1]["output"], "Hello, World!");
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/report.json");
        write(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "[]");
    }
}
