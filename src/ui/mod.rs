use anyhow::Error;
use std::io::{self, Write};

use crate::core::{Report, Severity};

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub color: bool,
    pub stdout_is_tty: bool,
    pub stderr_is_tty: bool,
    pub quiet: bool,
    pub verbose: bool,
}

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "error:");
    let _ = writeln!(stderr, "  {err}");

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        let _ = writeln!(stderr, "caused by:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }

    let _ = writeln!(stderr, "next:");
    let _ = writeln!(stderr, "  - re-run with `--verbose` for more detail");
    let _ = writeln!(
        stderr,
        "  - see `mysql-preflight --help` for available commands and options"
    );
}

pub fn print_report(report: &Report, cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }

    let advisory = &report.advisory;
    let mut out = io::stdout().lock();

    let severity = format_severity(advisory.severity, cfg.color);
    let _ = writeln!(out, "{} [{severity}]", advisory.title);
    let _ = writeln!(out);
    for paragraph in advisory.summary.split("\n\n") {
        let _ = writeln!(out, "{paragraph}");
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Remediation:");
    for line in advisory.remediation.hint.lines() {
        let _ = writeln!(out, "  {line}");
    }

    if !advisory.external_links.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Links:");
        for link in &advisory.external_links {
            let _ = writeln!(out, "- {} <{}>", link.title, link.url);
        }
    }

    if !advisory.related_resources.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Related:");
        for resource in &advisory.related_resources {
            let _ = writeln!(out, "- {}: {}", resource.kind, resource.name);
        }
    }

    if cfg.verbose {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "generated_at={} tool_version={} schema_version={}",
            report.generated_at, report.tool_version, report.schema_version
        );
    }
}

pub fn print_catalog(entries: &[&str], cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }

    let mut out = io::stdout().lock();
    for entry in entries {
        let _ = writeln!(out, "{entry}");
    }
}

fn format_severity(severity: Severity, color: bool) -> String {
    let s = severity.as_str();
    if !color {
        return s.to_string();
    }

    let code = match severity {
        Severity::Low => "32",
        Severity::Medium => "33",
        Severity::High => "31",
    };
    format!("\x1b[{code}m{s}\x1b[0m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_is_plain_without_color() {
        assert_eq!(format_severity(Severity::Medium, false), "medium");
    }

    #[test]
    fn severity_is_wrapped_in_ansi_with_color() {
        assert_eq!(format_severity(Severity::High, true), "\x1b[31mhigh\x1b[0m");
    }
}
