use std::path::PathBuf;

use clap::Parser;

use snipcheck::pipeline::Mode;

#[derive(Parser, Debug, Clone)]
#[command(name = "snipcheck", about = "Run the code blocks embedded in a document and report their output", version)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging\n    SNIPCHECK_*       Override config keys (see ~/.config/snipcheck/.snipcheckrc)")]
pub struct Cli {
    /// Document to check (.md, .txt, .rst, .log, .pdf). Reads stdin when omitted or "-".
    #[arg(value_name = "DOCUMENT")]
    pub document: Option<PathBuf>,

    /// Annotation attached to each result.
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,

    /// Where to write the JSON report.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Directory code blocks are written to. Defaults to a temporary directory
    /// removed at exit.
    #[arg(long = "work-dir")]
    pub work_dir: Option<PathBuf>,

    /// Kill a compile, run, or install step after this many seconds (0 = no limit).
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Do not install the document's dependencies.
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Print the parsed document as JSON and run nothing.
    #[arg(long = "parse-only")]
    pub parse_only: bool,

    /// Do not print the per-block summary.
    #[arg(long = "no-summary")]
    pub no_summary: bool,

    /// Debug logging unless RUST_LOG is set.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
