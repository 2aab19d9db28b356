//! Dependency installation through the language's package manager.

use std::{path::Path, time::Duration};

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    language::{CommandLine, Language, Toolchain},
    process::run_captured,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallResult {
    pub library: String,
    pub language: String,
    pub success: bool,
    pub output: String,
    pub error: String,
}

pub struct Installer {
    toolchain: Toolchain,
    timeout: Option<Duration>,
}

impl Installer {
    pub fn new(toolchain: Toolchain) -> Self {
        Self { toolchain, timeout: None }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Package-manager command for `library`, or `None` when `language` has none.
    pub fn command_for(&self, language: &str, library: &str) -> Option<CommandLine> {
        let defaults = Toolchain::default();
        let (configured, fallback) = match language.parse::<Language>() {
            Ok(Language::Python) => (&self.toolchain.pip, defaults.pip),
            Ok(Language::JavaScript) => (&self.toolchain.npm, defaults.npm),
            _ => return None,
        };
        // Managers may be configured with arguments, e.g. `python3 -m pip`.
        let mut parts = configured.split_whitespace();
        let mut cmd = CommandLine::new(parts.next().unwrap_or(fallback.as_str()));
        for part in parts {
            cmd = cmd.arg(part);
        }
        Some(cmd.arg("install").arg(library))
    }

    /// Install each library once, in order. A failure is recorded and does not
    /// stop the remaining installs.
    pub async fn install(&self, language: &str, libraries: &[String], cwd: &Path) -> Vec<InstallResult> {
        let mut results = Vec::with_capacity(libraries.len());
        for library in libraries {
            let result = match self.command_for(language, library) {
                Some(cmd) => match run_captured(&cmd, None, cwd, self.timeout).await {
                    Ok(out) => InstallResult {
                        library: library.clone(),
                        language: language.to_string(),
                        success: out.success,
                        output: out.stdout,
                        error: out.stderr,
                    },
                    Err(e) => InstallResult {
                        library: library.clone(),
                        language: language.to_string(),
                        success: false,
                        output: String::new(),
                        error: e.to_string(),
                    },
                },
                None => InstallResult {
                    library: library.clone(),
                    language: language.to_string(),
                    success: true,
                    output: format!("Unsupported language: {}", language),
                    error: String::new(),
                },
            };

            if result.success {
                info!(library = %result.library, language, "installed dependency");
            } else {
                warn!(library = %result.library, language, error = %result.error.trim(), "dependency install failed");
            }
            results.push(result);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_manager_per_language() {
        let installer = Installer::new(Toolchain::default());
        assert_eq!(
            installer.command_for("python", "requests").unwrap().to_string(),
            "pip install requests"
        );
        assert_eq!(
            installer.command_for("JS", "lodash").unwrap().to_string(),
            "npm install lodash"
        );
        assert!(installer.command_for("java", "junit").is_none());
        assert!(installer.command_for("ruby", "rails").is_none());
    }

    #[test]
    fn configured_manager_keeps_its_arguments() {
        let toolchain = Toolchain {
            pip: "python3 -m pip".into(),
            ..Toolchain::default()
        };
        let cmd = Installer::new(toolchain).command_for("python", "flask").unwrap();
        assert_eq!(cmd.to_string(), "python3 -m pip install flask");
    }

    #[test]
    fn blank_manager_falls_back_to_default() {
        let toolchain = Toolchain {
            pip: "  ".into(),
            npm: String::new(),
            ..Toolchain::default()
        };
        let installer = Installer::new(toolchain);
        assert_eq!(
            installer.command_for("python", "flask").unwrap().to_string(),
            "pip install flask"
        );
        assert_eq!(
            installer.command_for("javascript", "lodash").unwrap().to_string(),
            "npm install lodash"
        );
    }

    #[tokio::test]
    async fn unsupported_language_is_informational() {
        let dir = tempfile::tempdir().unwrap();
        let results = Installer::new(Toolchain::default())
            .install("c", &["libm".to_string()], dir.path())
            .await;
        assert_eq!(results.len(), 1);
        assert!(results[0].success);
        assert_eq!(results[0].output, "Unsupported language: c");
    }

    #[tokio::test]
    async fn missing_manager_records_each_failure() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = Toolchain {
            pip: "snipcheck-missing-pip".into(),
            ..Toolchain::default()
        };
        let libs = vec!["a".to_string(), "b".to_string()];
        let results = Installer::new(toolchain).install("python", &libs, dir.path()).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| !r.success && !r.error.is_empty()));
        assert_eq!(results[1].library, "b");
    }
}
