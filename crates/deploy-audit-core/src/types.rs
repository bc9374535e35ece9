//! Result model for a deployment configuration audit.
//!
//! Field names mirror the keys of the JSON report, so the serialized form of
//! [`AnalysisResult`] is the report document itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate produced by one audit run.
///
/// Created empty, filled in by each phase, then serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Compose file analyses keyed by path relative to the project root.
    pub compose_files: BTreeMap<String, ComposeFileAnalysis>,
    /// Dockerfile analyses keyed by path relative to the project root.
    pub dockerfiles: BTreeMap<String, DockerfileAnalysis>,
    /// Monitoring stack status.
    pub monitoring: MonitoringAnalysis,
    /// Environment file secret scan.
    pub security: SecurityAnalysis,
    /// Human-readable parse and read failures.
    pub issues: Vec<String>,
    /// Recommendations derived by the summary.
    pub recommendations: Vec<String>,
    /// Auxiliary configuration file presence.
    pub environment: EnvironmentAnalysis,
}

impl AnalysisResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a non-fatal issue.
    pub fn push_issue(&mut self, issue: impl Into<String>) {
        let issue = issue.into();
        tracing::warn!("{issue}");
        self.issues.push(issue);
    }

    /// Returns true if any default secret was found in an environment file.
    #[must_use]
    pub fn has_critical(&self) -> bool {
        !self.security.secrets_detected.is_empty()
    }

    /// Number of default secret occurrences across all environment files.
    #[must_use]
    pub fn critical_count(&self) -> usize {
        self.security.secrets_detected.len()
    }
}

/// Analysis of a single compose file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComposeFileAnalysis {
    /// Per-service analysis keyed by service name.
    pub services: BTreeMap<String, ServiceAnalysis>,
    /// Top-level named volumes.
    pub volumes: Vec<String>,
    /// Top-level named networks.
    pub networks: Vec<String>,
    /// At least one service declares a healthcheck.
    pub has_healthchecks: bool,
    /// At least one service declares `security_opt`.
    pub has_security_opts: bool,
    /// At least one service declares a `deploy` section.
    pub has_resource_limits: bool,
}

impl ComposeFileAnalysis {
    /// Adds a service and folds its flags into the file-level booleans.
    pub fn insert_service(&mut self, name: impl Into<String>, service: ServiceAnalysis) {
        self.has_healthchecks |= service.healthcheck;
        self.has_security_opts |= service.security_opt;
        self.has_resource_limits |= service.deploy;
        self.services.insert(name.into(), service);
    }
}

/// Attributes extracted from one compose service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAnalysis {
    /// Image reference, if any.
    pub image: Option<String>,
    /// Raw `build` value (context string or mapping).
    pub build: Option<serde_json::Value>,
    /// Raw port entries.
    pub ports: Vec<serde_json::Value>,
    /// Raw volume entries.
    pub volumes: Vec<serde_json::Value>,
    /// An `environment` section is present and non-empty.
    pub environment: bool,
    /// Names of services this one depends on.
    pub depends_on: Vec<String>,
    /// A healthcheck is declared.
    pub healthcheck: bool,
    /// `security_opt` is declared.
    pub security_opt: bool,
    /// A `deploy` section is declared.
    pub deploy: bool,
    /// Restart policy, `"no"` when unset.
    pub restart: String,
}

impl Default for ServiceAnalysis {
    fn default() -> Self {
        Self {
            image: None,
            build: None,
            ports: Vec::new(),
            volumes: Vec::new(),
            environment: false,
            depends_on: Vec::new(),
            healthcheck: false,
            security_opt: false,
            deploy: false,
            restart: "no".to_string(),
        }
    }
}

/// Analysis of a single Dockerfile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerfileAnalysis {
    /// Number of build stages.
    pub stages: usize,
    /// Base images in the order they appear.
    pub base_images: Vec<String>,
    /// A `USER` directive is present.
    pub has_user: bool,
    /// A `HEALTHCHECK` directive is present.
    pub has_healthcheck: bool,
    /// An `EXPOSE` directive is present.
    pub has_expose: bool,
    /// An `ENTRYPOINT` or `CMD` directive is present.
    pub has_entrypoint: bool,
    /// Security feature tags, one per matching line.
    pub security_features: Vec<String>,
    /// Build optimization tags, one per matching line.
    pub optimization_features: Vec<String>,
}

impl DockerfileAnalysis {
    /// Returns true for builds with more than one stage.
    #[must_use]
    pub fn is_multi_stage(&self) -> bool {
        self.stages > 1
    }
}

/// Monitoring stack status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringAnalysis {
    /// Prometheus server configuration.
    pub prometheus: PrometheusStatus,
    /// Grafana dashboard provisioning.
    pub grafana: GrafanaStatus,
    /// Alertmanager configuration. Never populated.
    pub alertmanager: AlertmanagerStatus,
    /// Jaeger tracing. Never populated.
    pub jaeger: JaegerStatus,
}

/// Prometheus configuration status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrometheusStatus {
    /// The config exists and parsed.
    pub exists: bool,
    /// Number of `scrape_configs` entries.
    pub scrape_configs: usize,
}

/// Grafana provisioning status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrafanaStatus {
    /// The dashboard provisioning file exists.
    pub exists: bool,
    /// Number of JSON dashboards next to it.
    pub dashboards: usize,
}

/// Alertmanager status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertmanagerStatus {
    /// Always false.
    pub exists: bool,
    /// Always zero.
    pub routes: usize,
}

/// Jaeger status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JaegerStatus {
    /// Always false.
    pub configured: bool,
}

/// Secret scan over environment files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityAnalysis {
    /// Per-file results keyed by file name.
    pub environment_files: BTreeMap<String, EnvFileAnalysis>,
    /// Every default secret token found, across all files, duplicates kept.
    pub secrets_detected: Vec<String>,
    /// Reserved, always empty.
    pub security_practices: Vec<String>,
}

/// Scan result for one environment file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvFileAnalysis {
    /// The file exists.
    pub exists: bool,
    /// Present only when the file was read.
    #[serde(flatten)]
    pub findings: Option<EnvFileFindings>,
}

impl EnvFileAnalysis {
    /// Result for a file that does not exist.
    #[must_use]
    pub fn missing() -> Self {
        Self {
            exists: false,
            findings: None,
        }
    }

    /// Result for a file that was read.
    #[must_use]
    pub fn found(findings: EnvFileFindings) -> Self {
        Self {
            exists: true,
            findings: Some(findings),
        }
    }
}

/// Content checks for an environment file that was read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvFileFindings {
    /// Default secret tokens present in the file.
    pub default_secrets: Vec<String>,
    /// `JWT_SECRET` is mentioned.
    pub has_jwt_secret: bool,
    /// `POSTGRES_PASSWORD` or `DB_PASSWORD` is mentioned.
    pub has_db_password: bool,
    /// `REDIS_PASSWORD` is mentioned.
    pub has_redis_password: bool,
}

/// Auxiliary configuration file presence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentAnalysis {
    /// Presence keyed by path relative to the project root.
    pub config_files: BTreeMap<String, FilePresence>,
}

/// Existence flag for a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePresence {
    /// The file exists.
    pub exists: bool,
}
