mod cli;

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use is_terminal::IsTerminal;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use snipcheck::{
    config::Config,
    execution::Engine,
    install::Installer,
    memory::MemoryStore,
    parser,
    pipeline::{Mode, Pipeline},
    printer::SummaryPrinter,
    report, utils,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // CLI flags override file and environment
    let mut cfg = Config::load();
    if let Some(path) = &args.report {
        cfg.set("SNIPCHECK_REPORT_PATH", path.to_string_lossy());
    }
    if let Some(dir) = &args.work_dir {
        cfg.set("SNIPCHECK_WORK_DIR", dir.to_string_lossy());
    }
    if let Some(secs) = args.timeout {
        cfg.set("SNIPCHECK_EXEC_TIMEOUT", secs.to_string());
    }
    if args.skip_install {
        cfg.set("SNIPCHECK_SKIP_INSTALL", "true");
    }
    debug!(config = %cfg.config_path.display(), "loaded config");

    let text = match args.document.as_deref() {
        Some(path) if path != Path::new("-") => utils::read_document(path)
            .with_context(|| format!("Document processing failed: {}", path.display()))?,
        _ => {
            if std::io::stdin().is_terminal() {
                return Err(anyhow!("Provide a document path or pipe a document on stdin"));
            }
            utils::read_stdin()?
        }
    };

    let mode = match args.mode {
        Some(mode) => mode,
        None => cfg
            .get("SNIPCHECK_MODE")
            .map(|m| m.parse::<Mode>())
            .transpose()
            .map_err(|e| anyhow!(e))?
            .unwrap_or_default(),
    };

    if args.parse_only {
        let doc = parser::parse(&text);
        let mut value = serde_json::to_value(&doc)?;
        if mode == Mode::Memory {
            let mut memory = MemoryStore::new();
            parser::apply_memory_directives(&text, &mut memory);
            value["memory_state"] = serde_json::to_value(memory.snapshot())?;
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    // Keep the temporary directory alive until the report is written
    let temp_dir;
    let work_dir = match cfg.work_dir() {
        Some(dir) => dir,
        None => {
            temp_dir = tempfile::Builder::new().prefix("snipcheck-").tempdir()?;
            temp_dir.path().to_path_buf()
        }
    };

    let toolchain = cfg.toolchain();
    let timeout = cfg.exec_timeout();
    let engine = Engine::new(toolchain.clone(), &work_dir)
        .with_context(|| format!("Cannot prepare work directory {}", work_dir.display()))?
        .with_timeout(timeout);
    let installer = (!cfg.skip_install()).then(|| Installer::new(toolchain).with_timeout(timeout));

    let mut pipeline = Pipeline::new(engine, installer, mode);
    let mut memory = MemoryStore::new();
    let entries = pipeline.run_document(&text, &mut memory).await;

    let report_path = cfg.report_path();
    report::write(&report_path, &entries)
        .with_context(|| format!("Cannot write report to {}", report_path.display()))?;

    if !args.no_summary {
        let printer = SummaryPrinter { color: std::io::stdout().is_terminal() };
        printer.print(&entries);
    }
    println!("Results saved to {}", report_path.display());
    Ok(())
}
