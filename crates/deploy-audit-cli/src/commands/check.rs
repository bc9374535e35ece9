//! Check command implementation.

use anyhow::{bail, Context, Result};
use deploy_audit_core::{report, AnalysisResult, Analyzer, PhaseBox, Progress, SilentProgress};
use deploy_audit_phases::{default_phases, phase_by_name};
use std::path::{Path, PathBuf};

use super::output::{self, TerminalProgress};
use crate::{config_resolver, OutputFormat};

/// Options for one audit run.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Project root to audit.
    pub path: PathBuf,
    /// Console output format.
    pub format: OutputFormat,
    /// Report path override, relative to the root.
    pub output: Option<PathBuf>,
    /// Whether to write the JSON report.
    pub write: bool,
    /// Extra exclude patterns on top of the config.
    pub exclude: Vec<String>,
    /// Phase names or codes to run instead of the default set.
    pub phases: Vec<String>,
    /// Explicit config file.
    pub config: Option<PathBuf>,
}

/// Outcome of an audit run.
#[derive(Debug)]
pub struct CheckOutcome {
    /// The aggregate result.
    pub result: AnalysisResult,
    /// Where the report was written, if it was.
    pub report: Option<PathBuf>,
}

/// Runs the check command and returns the process exit code.
pub fn run(opts: &CheckOptions) -> Result<u8> {
    let analyzer = prepare(opts)?;

    let outcome = match opts.format {
        OutputFormat::Text => {
            output::print_banner(analyzer.root());
            execute(&analyzer, opts, &mut TerminalProgress::stdout())?
        }
        OutputFormat::Json => execute(&analyzer, opts, &mut SilentProgress)?,
    };

    match opts.format {
        OutputFormat::Text => output::print_summary(&outcome.result),
        OutputFormat::Json => output::print_json(&outcome.result)?,
    }

    if let Some(path) = &outcome.report {
        output::print_saved(path, opts.format);
    }
    output::print_status(&outcome.result, opts.format);

    Ok(exit_code(&outcome.result))
}

/// Exit code for a finished audit: 1 when default secrets were found.
#[must_use]
pub fn exit_code(result: &AnalysisResult) -> u8 {
    u8::from(result.has_critical())
}

/// Resolves the config, runs every selected phase and writes the report.
pub fn audit(opts: &CheckOptions, progress: &mut dyn Progress) -> Result<CheckOutcome> {
    let analyzer = prepare(opts)?;
    execute(&analyzer, opts, progress)
}

fn prepare(opts: &CheckOptions) -> Result<Analyzer> {
    let loaded = config_resolver::load_config(&opts.path, opts.config.as_deref())?;
    if let Some(path) = &loaded.path {
        tracing::info!("Using {} config: {}", loaded.origin, path.display());
    }

    let mut config = loaded.config;
    if let Some(output) = &opts.output {
        config.analyzer.output.clone_from(output);
    }

    let mut builder = Analyzer::builder().root(&opts.path).config(config);
    for pattern in &opts.exclude {
        builder = builder.exclude(pattern.clone());
    }
    for phase in select_phases(&opts.phases)? {
        builder = builder.phase_box(phase);
    }
    builder.build().context("Failed to build analyzer")
}

fn execute(
    analyzer: &Analyzer,
    opts: &CheckOptions,
    progress: &mut dyn Progress,
) -> Result<CheckOutcome> {
    tracing::info!(
        "Auditing {} with {} phases",
        analyzer.root().display(),
        analyzer.phase_count()
    );

    let result = analyzer.analyze(progress);

    let report = if opts.write {
        let path = analyzer.output_path();
        write_report(&result, &path)?;
        Some(path)
    } else {
        None
    };

    Ok(CheckOutcome { result, report })
}

/// Default phases, or the named ones in the order given.
fn select_phases(names: &[String]) -> Result<Vec<PhaseBox>> {
    if names.is_empty() {
        return Ok(default_phases());
    }

    let mut selected: Vec<PhaseBox> = Vec::new();
    for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        let Some(phase) = phase_by_name(name) else {
            bail!("Unknown phase: {name} (see `deploy-audit list-phases`)");
        };
        if !selected.iter().any(|p| p.code() == phase.code()) {
            selected.push(phase);
        }
    }
    Ok(selected)
}

fn write_report(result: &AnalysisResult, path: &Path) -> Result<()> {
    report::write_json(result, path)
        .with_context(|| format!("Failed to write report: {}", path.display()))
}
