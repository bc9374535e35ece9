//! Phase that analyzes Docker Compose files.
//!
//! # Checked Files
//!
//! The `targets.compose_files` list, by default:
//!
//! - `docker-compose.yml`
//! - `docker-compose.prod.yml`
//! - `docker-compose.dev.yml`
//! - `docker-compose.monitoring.yml`
//! - `docker/docker-compose.optimized.yml`
//!
//! # Extracted Attributes
//!
//! Top-level `volumes` and `networks` names, and per service: image, build,
//! ports, volumes, environment, `depends_on`, healthcheck, `security_opt`,
//! deploy and restart policy.
//!
//! # Failures
//!
//! A file that is not valid YAML, whose root is not a mapping, or whose
//! `services`, service bodies, `volumes` or `networks` have the wrong shape
//! produces one issue and no entry. Missing files are skipped.

use deploy_audit_core::utils::{
    as_mapping, is_truthy, mapping_keys, read_mapping, scalar_to_string, to_json, YamlError,
};
use deploy_audit_core::{
    AnalysisResult, ComposeFileAnalysis, Phase, Progress, ProjectContext, ServiceAnalysis, Status,
};
use serde_yaml::{Mapping, Value};
use tracing::debug;

/// Phase code for compose analysis.
pub const CODE: &str = "DA001";

/// Phase name for compose analysis.
pub const NAME: &str = "compose";

/// Analyzes Docker Compose files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposeFiles;

impl ComposeFiles {
    /// Creates the phase.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Phase for ComposeFiles {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Docker Compose Analysis"
    }

    fn description(&self) -> &'static str {
        "Extracts services, volumes and networks from compose files"
    }

    fn run(
        &self,
        ctx: &ProjectContext<'_>,
        result: &mut AnalysisResult,
        progress: &mut dyn Progress,
    ) {
        for file in &ctx.config.targets.compose_files {
            let path = ctx.resolve(file);
            if !path.exists() {
                progress.report(Status::Warning, &format!("{file}: Not found"));
                continue;
            }

            match read_mapping(&path).and_then(|document| analyze_document(&document)) {
                Ok(analysis) => {
                    debug!("{}: {} services", file, analysis.services.len());
                    progress.report(
                        Status::Ok,
                        &format!("{file}: {} services", analysis.services.len()),
                    );
                    result.compose_files.insert(file.clone(), analysis);
                }
                Err(e) => {
                    result.push_issue(format!("Failed to parse {file}: {e}"));
                    progress.report(Status::Failed, &format!("{file}: Parse error"));
                }
            }
        }
    }
}

/// Analyzes a parsed compose document.
///
/// # Errors
///
/// Returns [`YamlError::Shape`] if `services` or one of its entries is not
/// a mapping, or if `volumes`/`networks` hold a non-empty value that is not
/// a mapping.
pub fn analyze_document(document: &Mapping) -> Result<ComposeFileAnalysis, YamlError> {
    let mut analysis = ComposeFileAnalysis {
        volumes: named_section(document, "volumes")?,
        networks: named_section(document, "networks")?,
        ..ComposeFileAnalysis::default()
    };

    let Some(services) = document.get("services") else {
        return Ok(analysis);
    };
    let services = as_mapping(services).ok_or_else(|| shape("services", "mapping"))?;

    for (name, config) in services {
        let Some(name) = scalar_to_string(name) else {
            continue;
        };
        let config =
            as_mapping(config).ok_or_else(|| shape(&format!("services.{name}"), "mapping"))?;
        analysis.insert_service(name, analyze_service(config));
    }

    Ok(analysis)
}

/// Extracts the audited attributes of one service definition.
#[must_use]
pub fn analyze_service(config: &Mapping) -> ServiceAnalysis {
    let field = |key: &str| config.get(key).filter(|v| !v.is_null());
    let present = |key: &str| field(key).is_some_and(is_truthy);

    ServiceAnalysis {
        image: field("image").and_then(scalar_to_string),
        build: field("build").map(to_json),
        ports: items(field("ports")),
        volumes: items(field("volumes")),
        environment: present("environment"),
        depends_on: field("depends_on").map(dependencies).unwrap_or_default(),
        healthcheck: present("healthcheck"),
        security_opt: present("security_opt"),
        deploy: present("deploy"),
        restart: field("restart")
            .and_then(restart_policy)
            .unwrap_or_else(|| "no".to_string()),
    }
}

/// Top-level `volumes` or `networks`: an empty value means none.
fn named_section(document: &Mapping, key: &str) -> Result<Vec<String>, YamlError> {
    match document.get(key) {
        Some(value) if is_truthy(value) => as_mapping(value)
            .map(|_| mapping_keys(value))
            .ok_or_else(|| shape(key, "mapping")),
        _ => Ok(Vec::new()),
    }
}

fn shape(key: &str, expected: &'static str) -> YamlError {
    YamlError::Shape {
        key: key.to_string(),
        expected,
    }
}

fn items(value: Option<&Value>) -> Vec<serde_json::Value> {
    match value {
        Some(Value::Sequence(seq)) => seq.iter().map(to_json).collect(),
        _ => Vec::new(),
    }
}

/// Short syntax lists names; long syntax maps names to conditions.
fn dependencies(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(seq) => seq.iter().filter_map(scalar_to_string).collect(),
        other => mapping_keys(other),
    }
}

fn restart_policy(value: &Value) -> Option<String> {
    match value {
        Value::Bool(false) => Some("no".to_string()),
        other => scalar_to_string(other),
    }
}
