//! Summary counts and recommendations.
//!
//! Reads the fully populated [`AnalysisResult`], so it runs after every
//! phase. Each recommendation is an independent threshold check; all that
//! apply are emitted, in a fixed order.

use crate::types::AnalysisResult;

/// Recommended when some Dockerfile is single-stage.
pub const MULTI_STAGE: &str =
    "Consider using multi-stage builds for all Dockerfiles to reduce image size";

/// Recommended when some compose file has no healthchecks.
pub const HEALTHCHECKS: &str = "Add health checks to all services for better reliability";

/// Recommended when any default secret was detected.
pub const DEFAULT_SECRETS: &str =
    "CRITICAL: Replace default passwords in environment files before production";

/// Recommended when some Dockerfile has no `USER` directive.
pub const NON_ROOT_USER: &str = "Configure non-root users in all Dockerfiles for security";

/// Recommended when the Prometheus config was not found.
pub const PROMETHEUS: &str = "Configure Prometheus for production monitoring";

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Compose files that were analyzed.
    pub compose_files: usize,
    /// Dockerfiles that were analyzed.
    pub dockerfiles: usize,
    /// Issues recorded by any phase.
    pub issues: usize,
    /// Recommendations emitted.
    pub recommendations: usize,
}

impl Summary {
    /// Computes the counts for a result.
    #[must_use]
    pub fn of(result: &AnalysisResult) -> Self {
        Self {
            compose_files: result.compose_files.len(),
            dockerfiles: result.dockerfiles.len(),
            issues: result.issues.len(),
            recommendations: result.recommendations.len(),
        }
    }
}

/// Derives recommendations from a populated result.
#[must_use]
pub fn recommendations(result: &AnalysisResult) -> Vec<String> {
    let total_dockerfiles = result.dockerfiles.len();
    let total_compose = result.compose_files.len();
    let mut recommendations = Vec::new();

    let multi_stage = result
        .dockerfiles
        .values()
        .filter(|d| d.is_multi_stage())
        .count();
    if multi_stage < total_dockerfiles {
        recommendations.push(MULTI_STAGE.to_string());
    }

    let with_healthchecks = result
        .compose_files
        .values()
        .filter(|c| c.has_healthchecks)
        .count();
    if with_healthchecks < total_compose {
        recommendations.push(HEALTHCHECKS.to_string());
    }

    if result.has_critical() {
        recommendations.push(DEFAULT_SECRETS.to_string());
    }

    let with_user = result.dockerfiles.values().filter(|d| d.has_user).count();
    if with_user < total_dockerfiles {
        recommendations.push(NON_ROOT_USER.to_string());
    }

    if !result.monitoring.prometheus.exists {
        recommendations.push(PROMETHEUS.to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ComposeFileAnalysis, DockerfileAnalysis};

    fn dockerfile(stages: usize, has_user: bool) -> DockerfileAnalysis {
        DockerfileAnalysis {
            stages,
            has_user,
            ..DockerfileAnalysis::default()
        }
    }

    #[test]
    fn empty_project_only_recommends_prometheus() {
        let result = AnalysisResult::new();
        assert_eq!(recommendations(&result), vec![PROMETHEUS]);
    }

    #[test]
    fn fully_compliant_project_has_no_recommendations() {
        let mut result = AnalysisResult::new();
        result
            .dockerfiles
            .insert("Dockerfile".to_string(), dockerfile(2, true));
        result.compose_files.insert(
            "docker-compose.yml".to_string(),
            ComposeFileAnalysis {
                has_healthchecks: true,
                ..ComposeFileAnalysis::default()
            },
        );
        result.monitoring.prometheus.exists = true;

        assert!(recommendations(&result).is_empty());
    }

    #[test]
    fn all_recommendations_in_order() {
        let mut result = AnalysisResult::new();
        result
            .dockerfiles
            .insert("Dockerfile".to_string(), dockerfile(1, false));
        result
            .compose_files
            .insert("docker-compose.yml".to_string(), ComposeFileAnalysis::default());
        result
            .security
            .secrets_detected
            .push("CHANGE_ME".to_string());

        assert_eq!(
            recommendations(&result),
            vec![
                MULTI_STAGE,
                HEALTHCHECKS,
                DEFAULT_SECRETS,
                NON_ROOT_USER,
                PROMETHEUS
            ]
        );
    }

    #[test]
    fn one_single_stage_dockerfile_is_enough() {
        let mut result = AnalysisResult::new();
        result
            .dockerfiles
            .insert("a/Dockerfile".to_string(), dockerfile(3, true));
        result
            .dockerfiles
            .insert("b/Dockerfile".to_string(), dockerfile(1, true));
        result.monitoring.prometheus.exists = true;

        assert_eq!(recommendations(&result), vec![MULTI_STAGE]);
    }

    #[test]
    fn summary_counts() {
        let mut result = AnalysisResult::new();
        result
            .dockerfiles
            .insert("Dockerfile".to_string(), dockerfile(1, false));
        result.issues.push("Failed to parse x".to_string());
        result.recommendations = recommendations(&result);

        let summary = Summary::of(&result);
        assert_eq!(summary.compose_files, 0);
        assert_eq!(summary.dockerfiles, 1);
        assert_eq!(summary.issues, 1);
        assert_eq!(summary.recommendations, 3);
    }
}
