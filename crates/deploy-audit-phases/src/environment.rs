//! Phase that checks auxiliary configuration files are present.

use deploy_audit_core::{
    AnalysisResult, EnvironmentAnalysis, FilePresence, Phase, Progress, ProjectContext, Status,
};

/// Phase code for the presence check.
pub const CODE: &str = "DA005";

/// Phase name for the presence check.
pub const NAME: &str = "environment";

/// Display names for the default config files.
const LABELS: &[(&str, &str)] = &[
    ("nginx/nginx.conf", "Nginx Configuration"),
    ("redis.conf", "Redis Configuration"),
    ("redis.prod.conf", "Redis Production Configuration"),
];

fn label_for(file: &str) -> &str {
    LABELS
        .iter()
        .find(|(path, _)| *path == file)
        .map_or(file, |(_, label)| *label)
}

/// Records whether each configured auxiliary file exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigPresence;

impl ConfigPresence {
    /// Creates the phase.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Phase for ConfigPresence {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Environment Configuration Analysis"
    }

    fn description(&self) -> &'static str {
        "Checks that nginx and redis configuration files exist"
    }

    fn run(
        &self,
        ctx: &ProjectContext<'_>,
        result: &mut AnalysisResult,
        progress: &mut dyn Progress,
    ) {
        let mut environment = EnvironmentAnalysis::default();

        for file in &ctx.config.targets.config_files {
            let exists = ctx.resolve(file).exists();
            let label = label_for(file);
            if exists {
                progress.report(Status::Ok, &format!("{label}: Found"));
            } else {
                progress.report(Status::Warning, &format!("{label}: Missing"));
            }
            environment
                .config_files
                .insert(file.clone(), FilePresence { exists });
        }

        result.environment = environment;
    }
}
