//! Orchestrator: parse a document, install its dependencies once, run every block.

use std::str::FromStr;

use tracing::{debug, info};

use crate::{
    execution::Engine,
    install::{InstallResult, Installer},
    memory::MemoryStore,
    parser::{self, ParsedDocument},
    report::ReportEntry,
};

/// Which annotation is attached to each execution record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Mode {
    /// Attach the document's expected-output text.
    #[default]
    Expected,
    /// Apply `CommonMemory:` directives and attach the store snapshot.
    Memory,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expected" => Ok(Mode::Expected),
            "memory" => Ok(Mode::Memory),
            other => Err(format!("unknown mode: {}", other)),
        }
    }
}

pub struct Pipeline {
    engine: Engine,
    /// `None` skips the install phase.
    installer: Option<Installer>,
    mode: Mode,
}

impl Pipeline {
    pub fn new(engine: Engine, installer: Option<Installer>, mode: Mode) -> Self {
        Self { engine, installer, mode }
    }

    /// Parse `text` and run it. In memory mode the directives are applied to
    /// `memory` before anything executes.
    pub async fn run_document(&mut self, text: &str, memory: &mut MemoryStore) -> Vec<ReportEntry> {
        let doc = parser::parse(text);
        if self.mode == Mode::Memory {
            parser::apply_memory_directives(text, memory);
        }
        self.run_parsed(&doc, memory).await
    }

    /// One entry per code block in document order, preceded by a single
    /// install entry when dependencies were installed.
    pub async fn run_parsed(&mut self, doc: &ParsedDocument, memory: &MemoryStore) -> Vec<ReportEntry> {
        let mut entries = Vec::with_capacity(doc.code_blocks.len() + 1);

        if let Some(installs) = self.install_phase(doc).await {
            entries.push(ReportEntry::Install {
                library_install_results: installs,
            });
        }

        for block in &doc.code_blocks {
            let language = block.language.trim().to_ascii_lowercase();
            let mut result = self.engine.execute(&language, &block.source, &doc.inputs).await;
            match self.mode {
                Mode::Expected => result.expected_output = doc.expected_output.clone(),
                Mode::Memory => result.memory_state = Some(memory.snapshot()),
            }
            entries.push(ReportEntry::Execution(result));
        }

        info!(
            blocks = doc.code_blocks.len(),
            entries = entries.len(),
            "document finished"
        );
        entries
    }

    /// Each library is installed once per distinct block language, in order of
    /// first appearance.
    async fn install_phase(&self, doc: &ParsedDocument) -> Option<Vec<InstallResult>> {
        let installer = self.installer.as_ref()?;
        if doc.libraries.is_empty() || doc.code_blocks.is_empty() {
            return None;
        }

        let mut languages: Vec<String> = Vec::new();
        for block in &doc.code_blocks {
            let language = block.language.trim().to_ascii_lowercase();
            if !languages.contains(&language) {
                languages.push(language);
            }
        }
        debug!(?languages, libraries = ?doc.libraries, "installing dependencies");

        let mut results = Vec::new();
        for language in &languages {
            results.extend(
                installer
                    .install(language, &doc.libraries, self.engine.work_dir())
                    .await,
            );
        }
        Some(results)
    }
}
