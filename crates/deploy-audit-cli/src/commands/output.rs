//! Console output for the audit.

use anyhow::Result;
use deploy_audit_core::{AnalysisResult, Progress, Status, Summary};
use std::path::Path;

use crate::OutputFormat;

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const GREEN: &str = "\x1b[32m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Prints phase headings and progress lines to stdout.
#[derive(Debug, Default)]
pub struct TerminalProgress;

impl TerminalProgress {
    /// Creates a progress printer writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self
    }
}

impl Progress for TerminalProgress {
    fn phase_started(&mut self, index: usize, title: &str) {
        println!("\n{}", phase_heading(index, title));
    }

    fn report(&mut self, status: Status, message: &str) {
        println!("{}", progress_line(status, message));
    }
}

fn phase_heading(index: usize, title: &str) -> String {
    format!("{BOLD}Phase {index}: {title}{RESET}")
}

fn progress_line(status: Status, message: &str) -> String {
    let indicator = match status {
        Status::Ok => format!("{GREEN}ok{RESET}  "),
        Status::Warning => format!("{YELLOW}warn{RESET}"),
        Status::Failed => format!("{RED}fail{RESET}"),
    };
    format!("  {indicator} {message}")
}

/// Prints the heading shown before the first phase.
pub fn print_banner(root: &Path) {
    println!("{BOLD}Docker Configuration Analysis{RESET}");
    println!("Project root: {}", root.display());
}

/// Prints summary counts, issues and recommendations.
pub fn print_summary(result: &AnalysisResult) {
    for line in summary_lines(result) {
        println!("{line}");
    }
}

fn summary_lines(result: &AnalysisResult) -> Vec<String> {
    let summary = Summary::of(result);
    let mut lines = vec![
        String::new(),
        format!("{BOLD}ANALYSIS SUMMARY{RESET}"),
        format!("   Docker Compose files: {}", summary.compose_files),
        format!("   Dockerfiles: {}", summary.dockerfiles),
        format!("   Issues found: {}", summary.issues),
        format!("   Recommendations: {}", summary.recommendations),
    ];

    if !result.issues.is_empty() {
        lines.push(String::new());
        lines.push(format!("{RED}Issues Found:{RESET}"));
        lines.extend(result.issues.iter().map(|issue| format!("   - {issue}")));
    }

    if !result.recommendations.is_empty() {
        lines.push(String::new());
        lines.push(format!("{YELLOW}Recommendations:{RESET}"));
        lines.extend(result.recommendations.iter().map(|rec| format!("   - {rec}")));
    }

    lines
}

/// Prints the full result document as JSON.
pub fn print_json(result: &AnalysisResult) -> Result<()> {
    let json = deploy_audit_core::report::to_json_pretty(result)?;
    println!("{json}");
    Ok(())
}

/// Prints where the report was saved.
///
/// In JSON mode this goes to stderr so stdout stays a single document.
pub fn print_saved(path: &Path, format: OutputFormat) {
    let line = format!("Results saved to: {}", path.display());
    match format {
        OutputFormat::Text => println!("\n{line}"),
        OutputFormat::Json => eprintln!("{line}"),
    }
}

/// Prints the final status line.
pub fn print_status(result: &AnalysisResult, format: OutputFormat) {
    let line = status_line(result);
    match format {
        OutputFormat::Text => println!("\n{line}"),
        OutputFormat::Json => eprintln!("{line}"),
    }
}

fn status_line(result: &AnalysisResult) -> String {
    if result.has_critical() {
        format!(
            "{RED}CRITICAL: {} security issues found!{RESET}",
            result.critical_count()
        )
    } else if !result.issues.is_empty() {
        format!("{YELLOW}WARNING: {} issues found{RESET}", result.issues.len())
    } else {
        format!("{GREEN}SUCCESS: Configuration analysis completed{RESET}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(s: &str) -> String {
        [RED, YELLOW, GREEN, BOLD, RESET]
            .iter()
            .fold(s.to_string(), |acc, code| acc.replace(code, ""))
    }

    #[test]
    fn test_status_success() {
        let result = AnalysisResult::new();
        assert_eq!(
            strip(&status_line(&result)),
            "SUCCESS: Configuration analysis completed"
        );
    }

    #[test]
    fn test_status_warning_counts_issues() {
        let mut result = AnalysisResult::new();
        result.push_issue("Failed to parse docker-compose.yml: bad");
        result.push_issue("Failed to parse Prometheus config: bad");
        assert_eq!(strip(&status_line(&result)), "WARNING: 2 issues found");
    }

    #[test]
    fn test_status_critical_wins_over_issues() {
        let mut result = AnalysisResult::new();
        result.push_issue("Failed to parse docker-compose.yml: bad");
        result.security.secrets_detected = vec!["CHANGE_ME".into(), "admin123".into()];
        assert_eq!(
            strip(&status_line(&result)),
            "CRITICAL: 2 security issues found!"
        );
    }

    #[test]
    fn test_summary_lists_issues_and_recommendations() {
        let mut result = AnalysisResult::new();
        result.push_issue("Failed to analyze Dockerfile: denied");
        result.recommendations = vec!["Configure Prometheus for production monitoring".into()];

        let lines: Vec<String> = summary_lines(&result).iter().map(|l| strip(l)).collect();

        assert!(lines.contains(&"   Issues found: 1".to_string()));
        assert!(lines.contains(&"   Recommendations: 1".to_string()));
        assert!(lines.contains(&"   - Failed to analyze Dockerfile: denied".to_string()));
        assert!(lines.contains(&"   - Configure Prometheus for production monitoring".to_string()));
    }

    #[test]
    fn test_summary_omits_empty_sections() {
        let lines: Vec<String> = summary_lines(&AnalysisResult::new())
            .iter()
            .map(|l| strip(l))
            .collect();
        assert!(!lines.iter().any(|l| l == "Issues Found:"));
        assert!(!lines.iter().any(|l| l == "Recommendations:"));
    }

    #[test]
    fn test_progress_formatting() {
        assert_eq!(
            strip(&phase_heading(2, "Dockerfile Analysis")),
            "Phase 2: Dockerfile Analysis"
        );
        assert_eq!(
            strip(&progress_line(Status::Failed, "docker-compose.yml: Parse error")),
            "  fail docker-compose.yml: Parse error"
        );
    }
}
