//! Core analyzer for orchestrating audit phases.

use crate::config::Config;
use crate::context::ProjectContext;
use crate::phase::{Phase, PhaseBox, Progress};
use crate::summary;
use crate::types::AnalysisResult;

use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while setting up an analysis.
#[derive(Debug, Error, miette::Diagnostic)]
pub enum AnalyzerError {
    /// IO error resolving the root directory.
    #[error("IO error: {0}")]
    #[diagnostic(code(deploy_audit::analyzer::io))]
    Io(#[from] std::io::Error),

    /// The project root is missing or not a directory.
    #[error("Project root {path} is not a directory")]
    #[diagnostic(code(deploy_audit::analyzer::root))]
    RootNotFound {
        /// The offending path.
        path: PathBuf,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    #[diagnostic(
        code(deploy_audit::analyzer::glob),
        help("check the `exclude` entries in your config and --exclude flags")
    )]
    Glob(#[from] glob::PatternError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    phases: Vec<PhaseBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project root to audit.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a phase to the analyzer. Phases run in the order added.
    #[must_use]
    pub fn phase<P: Phase + 'static>(mut self, phase: P) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Adds a boxed phase to the analyzer.
    #[must_use]
    pub fn phase_box(mut self, phase: PhaseBox) -> Self {
        self.phases.push(phase);
        self
    }

    /// Adds an exclude glob pattern for file discovery.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory doesn't exist or an exclude
    /// pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };
        // Drop `.` segments so "." reports as the working directory itself.
        let root: PathBuf = root
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect();

        if !root.is_dir() {
            return Err(AnalyzerError::RootNotFound { path: root });
        }

        let config = self.config.unwrap_or_default();

        // Merge exclude patterns from config
        let mut excludes = Vec::new();
        for pattern in self
            .exclude_patterns
            .iter()
            .chain(config.analyzer.exclude.iter())
        {
            excludes.push(glob::Pattern::new(pattern)?);
        }

        Ok(Analyzer {
            root,
            phases: self.phases,
            excludes,
            config,
        })
    }
}

/// The main analyzer that runs each phase and then the summary.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    phases: Vec<PhaseBox>,
    excludes: Vec<glob::Pattern>,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the project root being audited.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the number of registered phases.
    #[must_use]
    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Returns where the report should be written.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.config.analyzer.output)
    }

    /// Runs every enabled phase in order, then derives the recommendations.
    ///
    /// Per-file problems end up in [`AnalysisResult::issues`]; the run itself
    /// always completes.
    pub fn analyze(&self, progress: &mut dyn Progress) -> AnalysisResult {
        info!("Starting audit at {}", self.root.display());

        let ctx =
            ProjectContext::new(&self.root, &self.config).with_excludes(self.excludes.clone());
        let mut result = AnalysisResult::new();
        let mut index = 0;

        for phase in &self.phases {
            if !self.config.is_phase_enabled(phase.name()) {
                debug!("Skipping disabled phase: {}", phase.name());
                continue;
            }

            index += 1;
            progress.phase_started(index, phase.title());
            debug!("Running phase {} ({})", phase.name(), phase.code());
            phase.run(&ctx, &mut result, progress);
        }

        progress.phase_started(index + 1, "Summary Generation");
        result.recommendations = summary::recommendations(&result);

        info!(
            "Audit complete: {} issue(s), {} recommendation(s)",
            result.issues.len(),
            result.recommendations.len()
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{RecordedProgress, Status};
    use crate::summary::PROMETHEUS;

    struct Marker(&'static str);

    impl Phase for Marker {
        fn name(&self) -> &'static str {
            self.0
        }
        fn code(&self) -> &'static str {
            "TEST"
        }
        fn title(&self) -> &'static str {
            self.0
        }
        fn run(
            &self,
            _ctx: &ProjectContext<'_>,
            result: &mut AnalysisResult,
            progress: &mut dyn Progress,
        ) {
            result.push_issue(self.0);
            progress.report(Status::Ok, self.0);
        }
    }

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/target/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().is_absolute());
        assert!(analyzer.root().exists());
        assert_eq!(analyzer.phase_count(), 0);
    }

    #[test]
    fn relative_root_has_no_current_dir_segment() {
        let analyzer = Analyzer::builder().root("./.").build().unwrap();

        assert_eq!(analyzer.root(), std::env::current_dir().unwrap());
        assert!(!analyzer
            .root()
            .components()
            .any(|c| matches!(c, Component::CurDir)));
    }

    #[test]
    fn missing_root_is_rejected() {
        let err = Analyzer::builder()
            .root("/definitely/not/a/real/root")
            .build()
            .err()
            .expect("build should fail");
        assert!(matches!(err, AnalyzerError::RootNotFound { .. }));
    }

    #[test]
    fn invalid_exclude_is_rejected() {
        let err = Analyzer::builder()
            .root(".")
            .exclude("[unclosed")
            .build()
            .err()
            .expect("build should fail");
        assert!(matches!(err, AnalyzerError::Glob(_)));
    }

    #[test]
    fn phases_run_in_order_and_summary_runs_last() {
        let analyzer = Analyzer::builder()
            .root(".")
            .phase(Marker("first"))
            .phase(Marker("second"))
            .build()
            .unwrap();

        let mut progress = RecordedProgress::new();
        let result = analyzer.analyze(&mut progress);

        assert_eq!(result.issues, vec!["first", "second"]);
        assert_eq!(
            progress.phases,
            vec!["first", "second", "Summary Generation"]
        );
        assert_eq!(result.recommendations, vec![PROMETHEUS]);
    }

    #[test]
    fn disabled_phases_are_skipped() {
        let config = Config::parse("[phases.second]\nenabled = false\n").unwrap();
        let analyzer = Analyzer::builder()
            .root(".")
            .config(config)
            .phase(Marker("first"))
            .phase(Marker("second"))
            .build()
            .unwrap();

        let result = analyzer.analyze(&mut RecordedProgress::new());
        assert_eq!(result.issues, vec!["first"]);
    }

    #[test]
    fn output_path_is_under_root() {
        let analyzer = Analyzer::builder().root(".").build().unwrap();
        assert!(analyzer
            .output_path()
            .ends_with("docker/analysis-results.json"));
        assert!(analyzer.output_path().starts_with(analyzer.root()));
    }
}
