//! Phase and progress traits.

use crate::context::ProjectContext;
use crate::types::AnalysisResult;

/// One step of the audit.
///
/// Phases are independent of each other: each reads its own inputs through
/// the [`ProjectContext`] and writes only its own part of the
/// [`AnalysisResult`]. Per-file failures are recorded with
/// [`AnalysisResult::push_issue`] rather than returned.
///
/// # Example
///
/// ```ignore
/// use deploy_audit_core::{AnalysisResult, Phase, Progress, ProjectContext, Status};
///
/// pub struct ReadmePresence;
///
/// impl Phase for ReadmePresence {
///     fn name(&self) -> &'static str { "readme" }
///     fn code(&self) -> &'static str { "DA100" }
///     fn title(&self) -> &'static str { "README Check" }
///
///     fn run(
///         &self,
///         ctx: &ProjectContext,
///         _result: &mut AnalysisResult,
///         progress: &mut dyn Progress,
///     ) {
///         if ctx.resolve("README.md").exists() {
///             progress.report(Status::Ok, "README.md: Found");
///         } else {
///             progress.report(Status::Warning, "README.md: Not found");
///         }
///     }
/// }
/// ```
pub trait Phase: Send + Sync {
    /// Returns the kebab-case name of this phase (e.g., "compose").
    fn name(&self) -> &'static str;

    /// Returns the phase code (e.g., "DA001").
    fn code(&self) -> &'static str;

    /// Returns the heading shown when the phase starts.
    fn title(&self) -> &'static str;

    /// Returns a brief description of what this phase checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Runs the phase against the project, accumulating into `result`.
    fn run(
        &self,
        ctx: &ProjectContext<'_>,
        result: &mut AnalysisResult,
        progress: &mut dyn Progress,
    );
}

/// Type alias for boxed Phase trait objects.
pub type PhaseBox = Box<dyn Phase>;

/// Outcome attached to a progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Found and analyzed.
    Ok,
    /// Missing, or found something worth attention.
    Warning,
    /// Could not be read or parsed.
    Failed,
}

/// Receiver for human-readable progress while the audit runs.
pub trait Progress {
    /// Called before a phase runs. `index` starts at 1.
    fn phase_started(&mut self, index: usize, title: &str) {
        let _ = (index, title);
    }

    /// Reports one line of progress.
    fn report(&mut self, status: Status, message: &str);
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl Progress for SilentProgress {
    fn report(&mut self, _status: Status, _message: &str) {}
}

/// Keeps progress in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordedProgress {
    /// Titles of the phases that started, in order.
    pub phases: Vec<String>,
    /// Every reported line, in order.
    pub lines: Vec<(Status, String)>,
}

impl RecordedProgress {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the messages reported with `status`.
    #[must_use]
    pub fn with_status(&self, status: Status) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(s, _)| *s == status)
            .map(|(_, m)| m.as_str())
            .collect()
    }
}

impl Progress for RecordedProgress {
    fn phase_started(&mut self, _index: usize, title: &str) {
        self.phases.push(title.to_string());
    }

    fn report(&mut self, status: Status, message: &str) {
        self.lines.push((status, message.to_string()));
    }
}
