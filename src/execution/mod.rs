//! Execution engine: materializes code blocks and dispatches them to a run strategy.
//!
//! `Engine::execute` never fails. Every error raised while writing, interpreting,
//! compiling, or running a block is turned into a failed [`ExecutionResult`].

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    error::Result,
    language::{self, Invocation, Language, SourceFile, Toolchain},
};

pub mod external;
pub mod python;

/// Outcome of running one code block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub success: bool,
    /// 1-based position of the block in the document.
    pub block: usize,
    pub language: String,
    /// Captured stdout, trimmed.
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_state: Option<BTreeMap<String, String>>,
}

impl ExecutionResult {
    pub fn succeeded(output: &str) -> Self {
        Self {
            success: true,
            output: output.trim().to_string(),
            ..Default::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn with_output(mut self, output: &str) -> Self {
        self.output = output.trim().to_string();
        self
    }

    /// Record stderr; blank text is dropped.
    pub fn with_stderr(mut self, stderr: &str) -> Self {
        let trimmed = stderr.trim();
        self.stderr = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }
}

pub struct Engine {
    toolchain: Toolchain,
    work_dir: PathBuf,
    timeout: Option<Duration>,
    blocks: usize,
}

impl Engine {
    /// `work_dir` is created if missing and made absolute, since children run
    /// from inside their block directory.
    pub fn new(toolchain: Toolchain, work_dir: &Path) -> Result<Self> {
        fs::create_dir_all(work_dir)?;
        let work_dir = fs::canonicalize(work_dir)?;
        Ok(Self {
            toolchain,
            work_dir,
            timeout: None,
            blocks: 0,
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Run `source` as `language`, serving `inputs` to interactive reads.
    pub async fn execute(&mut self, language: &str, source: &str, inputs: &[String]) -> ExecutionResult {
        self.blocks += 1;
        let block = self.blocks;
        let mut result = match self.try_execute(block, language, source, inputs).await {
            Ok(result) => result,
            Err(e) => ExecutionResult::failed(e.to_string()),
        };
        result.block = block;
        result.language = language.trim().to_ascii_lowercase();

        if result.success {
            info!(block, language = %result.language, "block succeeded");
        } else {
            warn!(
                block,
                language = %result.language,
                error = result.error.as_deref().unwrap_or_default(),
                "block failed"
            );
        }
        result
    }

    async fn try_execute(
        &self,
        block: usize,
        language: &str,
        source: &str,
        inputs: &[String],
    ) -> Result<ExecutionResult> {
        let lang = language::resolve(language)?;
        let file = self.materialize(block, lang, source)?;

        match lang.invocation(&self.toolchain, &file) {
            Invocation::Hosted { interpreter } => {
                python::execute_ndjson(&interpreter, source, inputs, &file, self.timeout).await
            }
            Invocation::Interpreted { run } => {
                external::run_steps(None, &run, inputs, &file.dir, self.timeout).await
            }
            Invocation::CompileThenRun { compile, run } => {
                external::run_steps(Some(&compile), &run, inputs, &file.dir, self.timeout).await
            }
        }
    }

    /// Write the block into its own directory, named by position and content hash.
    fn materialize(&self, block: usize, lang: Language, source: &str) -> Result<SourceFile> {
        let digest = format!("{:x}", md5::compute(source.as_bytes()));
        let dir = self
            .work_dir
            .join(format!("block-{:03}-{}", block, &digest[..8]));
        fs::create_dir_all(&dir)?;

        let file = SourceFile::new(&dir, &lang.source_file_name(source));
        fs::write(&file.path, source)?;
        debug!(path = %file.path.display(), "materialized code block");
        Ok(file)
    }
}
