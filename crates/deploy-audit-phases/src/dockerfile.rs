//! Phase that analyzes Dockerfiles.
//!
//! Every file named `Dockerfile*` under the project root is scanned line by
//! line. Blank lines and comments are skipped; every other line is matched
//! against [`LINE_RULES`] top to bottom and only the first match applies.
//!
//! | Line | Effect |
//! |------|--------|
//! | `FROM` ... `AS` ... | new stage, base image recorded |
//! | `FROM` ... | base image recorded |
//! | `USER ` ... | `non-root-user` |
//! | `HEALTHCHECK` ... | `health-check` |
//! | `EXPOSE` ... | exposes a port |
//! | `ENTRYPOINT` / `CMD` ... | has an entrypoint |
//! | contains `--mount=type=cache` | `build-cache` |
//! | contains `BUILDKIT` | `buildkit` |
//! | contains `--platform=` | `multi-platform` |
//!
//! A file with base images but no `AS` stage counts as one stage.

use deploy_audit_core::{
    AnalysisResult, DockerfileAnalysis, Phase, Progress, ProjectContext, Status,
};
use tracing::debug;

/// Phase code for Dockerfile analysis.
pub const CODE: &str = "DA002";

/// Phase name for Dockerfile analysis.
pub const NAME: &str = "dockerfiles";

/// Discovery pattern, relative to the project root.
pub const DOCKERFILE_PATTERN: &str = "**/Dockerfile*";

/// One entry of the line classification table.
pub struct LineRule {
    /// Short label used in debug logs.
    pub label: &'static str,
    /// Whether the trimmed line belongs to this rule.
    pub matches: fn(&str) -> bool,
    /// Applies the rule to the analysis.
    pub apply: fn(&str, &mut DockerfileAnalysis),
}

/// Ordered line classification table. First match wins.
pub const LINE_RULES: &[LineRule] = &[
    LineRule {
        label: "from-stage",
        matches: |line| line.starts_with("FROM") && line.contains("AS"),
        apply: |line, a| {
            a.stages += 1;
            a.base_images.push(base_image(line));
        },
    },
    LineRule {
        label: "from",
        matches: |line| line.starts_with("FROM"),
        apply: |line, a| a.base_images.push(base_image(line)),
    },
    LineRule {
        label: "user",
        matches: |line| line.starts_with("USER "),
        apply: |_, a| {
            a.has_user = true;
            a.security_features.push("non-root-user".to_string());
        },
    },
    LineRule {
        label: "healthcheck",
        matches: |line| line.starts_with("HEALTHCHECK"),
        apply: |_, a| {
            a.has_healthcheck = true;
            a.security_features.push("health-check".to_string());
        },
    },
    LineRule {
        label: "expose",
        matches: |line| line.starts_with("EXPOSE"),
        apply: |_, a| a.has_expose = true,
    },
    LineRule {
        label: "entrypoint",
        matches: |line| line.starts_with("ENTRYPOINT") || line.starts_with("CMD"),
        apply: |_, a| a.has_entrypoint = true,
    },
    LineRule {
        label: "build-cache",
        matches: |line| line.contains("--mount=type=cache"),
        apply: |_, a| a.optimization_features.push("build-cache".to_string()),
    },
    LineRule {
        label: "buildkit",
        matches: |line| line.contains("BUILDKIT"),
        apply: |_, a| a.optimization_features.push("buildkit".to_string()),
    },
    LineRule {
        label: "multi-platform",
        matches: |line| line.contains("--platform="),
        apply: |_, a| a.optimization_features.push("multi-platform".to_string()),
    },
];

/// Second whitespace-delimited token of a `FROM` line.
fn base_image(line: &str) -> String {
    line.split_whitespace()
        .nth(1)
        .unwrap_or("unknown")
        .to_string()
}

/// Analyzes Dockerfile text.
#[must_use]
pub fn analyze_content(content: &str) -> DockerfileAnalysis {
    let mut analysis = DockerfileAnalysis::default();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rule) = LINE_RULES.iter().find(|rule| (rule.matches)(line)) {
            (rule.apply)(line, &mut analysis);
        }
    }

    if analysis.stages == 0 && !analysis.base_images.is_empty() {
        analysis.stages = 1;
    }

    analysis
}

/// Classifies a single line, returning the label of the rule that applies.
#[must_use]
pub fn classify(line: &str) -> Option<&'static str> {
    LINE_RULES
        .iter()
        .find(|rule| (rule.matches)(line.trim()))
        .map(|rule| rule.label)
}

/// Analyzes every Dockerfile in the project.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dockerfiles;

impl Dockerfiles {
    /// Creates the phase.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Phase for Dockerfiles {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Dockerfile Analysis"
    }

    fn description(&self) -> &'static str {
        "Counts build stages and detects security and build optimization features"
    }

    fn run(
        &self,
        ctx: &ProjectContext<'_>,
        result: &mut AnalysisResult,
        progress: &mut dyn Progress,
    ) {
        let files = match ctx.discover(DOCKERFILE_PATTERN) {
            Ok(files) => files,
            Err(e) => {
                result.push_issue(format!("Failed to discover Dockerfiles: {e}"));
                return;
            }
        };

        debug!("Found {} Dockerfiles", files.len());

        for path in files {
            let key = ctx.relative_path(&path).to_string_lossy().into_owned();

            match std::fs::read_to_string(&path) {
                Ok(content) => {
                    let analysis = analyze_content(&content);
                    progress.report(Status::Ok, &format!("{key}: {} stages", analysis.stages));
                    result.dockerfiles.insert(key, analysis);
                }
                Err(e) => {
                    result.push_issue(format!("Failed to analyze {key}: {e}"));
                    progress.report(Status::Failed, &format!("{key}: Analysis error"));
                }
            }
        }
    }
}
