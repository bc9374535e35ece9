//! Phase that checks the monitoring stack configuration.
//!
//! Looks at four well-known paths under `monitoring/`. Prometheus scrape
//! configs and Grafana dashboards are counted; Alertmanager and Jaeger are
//! only reported as found or not and keep their default status.

use deploy_audit_core::utils::{as_mapping, read_mapping, YamlError};
use deploy_audit_core::{
    AnalysisResult, MonitoringAnalysis, Phase, Progress, ProjectContext, Status,
};
use serde_yaml::{Mapping, Value};
use tracing::debug;

/// Phase code for monitoring analysis.
pub const CODE: &str = "DA003";

/// Phase name for monitoring analysis.
pub const NAME: &str = "monitoring";

/// Prometheus server configuration.
pub const PROMETHEUS_CONFIG: &str = "monitoring/prometheus/prometheus.yml";

/// Grafana dashboard provisioning file.
pub const GRAFANA_DASHBOARDS: &str = "monitoring/grafana/dashboards/dashboards.yml";

/// Grafana datasource provisioning file.
pub const GRAFANA_DATASOURCES: &str = "monitoring/grafana/datasources/prometheus.yml";

/// Alertmanager configuration.
pub const ALERTMANAGER_CONFIG: &str = "monitoring/alertmanager/alertmanager.yml";

/// Directory holding Grafana dashboard JSON files.
pub const DASHBOARD_DIR: &str = "monitoring/grafana/dashboards";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Prometheus,
    GrafanaDashboards,
    GrafanaDatasources,
    Alertmanager,
}

const TARGETS: &[(&str, &str, Target)] = &[
    (PROMETHEUS_CONFIG, "Prometheus Config", Target::Prometheus),
    (
        GRAFANA_DASHBOARDS,
        "Grafana Dashboards",
        Target::GrafanaDashboards,
    ),
    (
        GRAFANA_DATASOURCES,
        "Grafana Datasources",
        Target::GrafanaDatasources,
    ),
    (ALERTMANAGER_CONFIG, "Alert Manager", Target::Alertmanager),
];

/// Checks Prometheus, Grafana and Alertmanager configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonitoringConfig;

impl MonitoringConfig {
    /// Creates the phase.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Phase for MonitoringConfig {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Monitoring Configuration Analysis"
    }

    fn description(&self) -> &'static str {
        "Counts Prometheus scrape configs and Grafana dashboards"
    }

    fn run(
        &self,
        ctx: &ProjectContext<'_>,
        result: &mut AnalysisResult,
        progress: &mut dyn Progress,
    ) {
        let mut monitoring = MonitoringAnalysis::default();

        for (file, label, target) in TARGETS {
            let path = ctx.resolve(file);
            if !path.exists() {
                progress.report(Status::Warning, &format!("{label}: Not found"));
                continue;
            }
            progress.report(Status::Ok, &format!("{label}: Found"));

            match target {
                Target::Prometheus => {
                    match read_mapping(&path).and_then(|config| scrape_count(&config)) {
                        Ok(count) => {
                            monitoring.prometheus.exists = true;
                            monitoring.prometheus.scrape_configs = count;
                        }
                        Err(e) => {
                            result.push_issue(format!("Failed to parse Prometheus config: {e}"));
                        }
                    }
                }
                Target::GrafanaDashboards => {
                    monitoring.grafana.exists = true;
                    monitoring.grafana.dashboards = count_dashboards(ctx);
                }
                Target::GrafanaDatasources | Target::Alertmanager => {}
            }
        }

        result.monitoring = monitoring;
    }
}

/// Number of `scrape_configs` entries. An absent key counts as zero; a key
/// holding anything but a list or mapping is malformed.
fn scrape_count(config: &Mapping) -> Result<usize, YamlError> {
    match config.get("scrape_configs") {
        None => Ok(0),
        Some(Value::Sequence(seq)) => Ok(seq.len()),
        Some(value) => as_mapping(value)
            .map(Mapping::len)
            .ok_or_else(|| YamlError::Shape {
                key: "scrape_configs".to_string(),
                expected: "list",
            }),
    }
}

/// Dashboards are every `*.json` directly under the dashboard directory.
/// Exclude patterns only apply to Dockerfile discovery.
fn count_dashboards(ctx: &ProjectContext<'_>) -> usize {
    let dir = glob::Pattern::escape(&ctx.resolve(DASHBOARD_DIR).to_string_lossy());
    match glob::glob(&format!("{dir}/*.json")) {
        Ok(paths) => paths.filter_map(Result::ok).filter(|p| p.is_file()).count(),
        Err(e) => {
            debug!("Dashboard discovery failed: {e}");
            0
        }
    }
}
