//! Terminal summary of a run.

use owo_colors::OwoColorize;

use crate::report::ReportEntry;

pub struct SummaryPrinter {
    pub color: bool,
}

impl SummaryPrinter {
    pub fn print(&self, entries: &[ReportEntry]) {
        for line in self.render(entries) {
            println!("{}", line);
        }
    }

    pub fn render(&self, entries: &[ReportEntry]) -> Vec<String> {
        let mut lines = Vec::new();
        let (mut passed, mut failed) = (0usize, 0usize);

        for entry in entries {
            match entry {
                ReportEntry::Install { library_install_results } => {
                    for r in library_install_results {
                        let tag = if r.success { self.ok("installed") } else { self.fail("install failed") };
                        lines.push(format!("{} {} ({})", tag, r.library, r.language));
                    }
                }
                ReportEntry::Execution(r) => {
                    if r.success {
                        passed += 1;
                    } else {
                        failed += 1;
                    }
                    let tag = if r.success { self.ok("ok") } else { self.fail("FAIL") };
                    let mut line = format!("{} block {} [{}]", tag, r.block, r.language);
                    if let Some(err) = &r.error {
                        let first = err.lines().next().unwrap_or_default();
                        line.push_str(&format!(": {}", first));
                    }
                    lines.push(line);
                }
            }
        }

        lines.push(format!("{} passed, {} failed", passed, failed));
        lines
    }

    fn ok(&self, s: &str) -> String {
        if self.color { s.green().to_string() } else { s.to_string() }
    }

    fn fail(&self, s: &str) -> String {
        if self.color { s.red().to_string() } else { s.to_string() }
    }
}
