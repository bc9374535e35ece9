//! Integration test: the default phases end-to-end via Analyzer.
//!
//! Each test lays out a small project in a temporary directory, runs the
//! full audit and checks the aggregate and the written report.

use deploy_audit_core::summary::{
    DEFAULT_SECRETS, HEALTHCHECKS, MULTI_STAGE, NON_ROOT_USER, PROMETHEUS,
};
use deploy_audit_core::{report, AnalysisResult, Analyzer, Config, RecordedProgress, Summary};
use deploy_audit_phases::default_phases;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("fixture path has a parent"))
        .expect("fixture directory should be created");
    fs::write(path, content).expect("fixture should be written");
}

fn analyzer_for(root: &Path, config: Config) -> Analyzer {
    let mut builder = Analyzer::builder().root(root).config(config);
    for phase in default_phases() {
        builder = builder.phase_box(phase);
    }
    builder.build().expect("analyzer should build")
}

fn audit(root: &Path) -> (AnalysisResult, RecordedProgress) {
    let mut progress = RecordedProgress::new();
    let result = analyzer_for(root, Config::default()).analyze(&mut progress);
    (result, progress)
}

fn production_project() -> TempDir {
    let tmp = TempDir::new().expect("temp dir");
    let root = tmp.path();

    write(
        root,
        "docker-compose.yml",
        r"
services:
  api:
    build: .
    ports: ['8080:8080']
    healthcheck:
      test: ['CMD', 'true']
    security_opt: ['no-new-privileges:true']
    deploy:
      resources:
        limits:
          cpus: '0.5'
    restart: always
volumes:
  data:
",
    );
    write(
        root,
        "Dockerfile",
        r#"
FROM rust:1.75 AS builder
RUN --mount=type=cache,target=/usr/local/cargo/registry cargo build --release
FROM gcr.io/distroless/cc AS runtime
USER nonroot
HEALTHCHECK CMD ["/app", "health"]
ENTRYPOINT ["/app"]
"#,
    );
    write(
        root,
        "monitoring/prometheus/prometheus.yml",
        "scrape_configs:\n  - job_name: api\n",
    );
    write(root, ".env.production", "JWT_SECRET=3b1f\nDB_PASSWORD=9c2e\n");
    write(root, "nginx/nginx.conf", "events {}\n");
    tmp
}

#[test]
fn empty_project_only_recommends_prometheus() {
    let tmp = TempDir::new().expect("temp dir");
    let (result, progress) = audit(tmp.path());

    assert!(result.compose_files.is_empty());
    assert!(result.dockerfiles.is_empty());
    assert!(result.issues.is_empty());
    assert_eq!(result.recommendations, vec![PROMETHEUS]);
    assert!(!result.has_critical());

    assert_eq!(
        progress.phases,
        vec![
            "Docker Compose Analysis",
            "Dockerfile Analysis",
            "Monitoring Configuration Analysis",
            "Security Configuration Analysis",
            "Environment Configuration Analysis",
            "Summary Generation",
        ]
    );
}

#[test]
fn compliant_project_has_no_recommendations() {
    let tmp = production_project();
    let (result, _) = audit(tmp.path());

    assert!(result.issues.is_empty(), "{:?}", result.issues);
    assert!(result.recommendations.is_empty(), "{:?}", result.recommendations);

    let compose = &result.compose_files["docker-compose.yml"];
    assert_eq!(compose.volumes, vec!["data"]);
    assert_eq!(compose.services["api"].restart, "always");
    assert_eq!(
        compose.services["api"].build,
        Some(serde_json::json!("."))
    );

    let dockerfile = &result.dockerfiles["Dockerfile"];
    assert_eq!(dockerfile.stages, 2);
    assert_eq!(
        dockerfile.base_images,
        vec!["rust:1.75", "gcr.io/distroless/cc"]
    );
    assert_eq!(dockerfile.optimization_features, vec!["build-cache"]);

    assert_eq!(result.monitoring.prometheus.scrape_configs, 1);
    assert!(result.environment.config_files["nginx/nginx.conf"].exists);

    let summary = Summary::of(&result);
    assert_eq!(summary.compose_files, 1);
    assert_eq!(summary.dockerfiles, 1);
    assert_eq!(summary.issues, 0);
}

#[test]
fn default_secret_is_critical() {
    let tmp = production_project();
    write(tmp.path(), ".env.dev", "POSTGRES_PASSWORD=password123\n");

    let (result, _) = audit(tmp.path());

    assert!(result.has_critical());
    assert_eq!(result.security.secrets_detected, vec!["password123"]);
    assert_eq!(result.recommendations, vec![DEFAULT_SECRETS]);
}

#[test]
fn weak_project_gets_every_recommendation() {
    let tmp = TempDir::new().expect("temp dir");
    write(
        tmp.path(),
        "docker-compose.dev.yml",
        "services:\n  web:\n    image: nginx\n",
    );
    write(tmp.path(), "web/Dockerfile", "FROM nginx\nCOPY . /usr/share/nginx/html\n");
    write(tmp.path(), ".env.example", "JWT_SECRET=CHANGE_ME\n");

    let (result, _) = audit(tmp.path());

    assert_eq!(
        result.recommendations,
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
fn parse_failures_do_not_stop_the_run() {
    let tmp = production_project();
    write(tmp.path(), "docker-compose.prod.yml", "services:\n  web: {image: nginx\n");
    write(tmp.path(), "monitoring/prometheus/prometheus.yml", "- just\n- a list\n");

    let (result, _) = audit(tmp.path());

    assert_eq!(result.issues.len(), 2, "{:?}", result.issues);
    assert!(result.issues[0].contains("docker-compose.prod.yml"));
    assert!(result.issues[1].starts_with("Failed to parse Prometheus config"));
    assert!(!result.compose_files.contains_key("docker-compose.prod.yml"));
    assert!(!result.monitoring.prometheus.exists);
    assert_eq!(result.recommendations, vec![PROMETHEUS]);
    assert!(!result.has_critical());
}

#[test]
fn disabled_phase_keeps_defaults() {
    let tmp = production_project();
    let config = Config::parse("[phases.dockerfiles]\nenabled = false\n").expect("config");

    let result = analyzer_for(tmp.path(), config).analyze(&mut RecordedProgress::new());

    assert!(result.dockerfiles.is_empty());
    assert_eq!(result.compose_files.len(), 1);
}

#[test]
fn excluded_dockerfiles_are_not_analyzed() {
    let tmp = production_project();
    write(tmp.path(), "node_modules/pkg/Dockerfile", "FROM node\n");
    let config = Config::parse("[analyzer]\nexclude = [\"**/node_modules/**\"]\n").expect("config");

    let result = analyzer_for(tmp.path(), config).analyze(&mut RecordedProgress::new());

    assert_eq!(result.dockerfiles.len(), 1);
    assert!(result.dockerfiles.contains_key("Dockerfile"));
}

#[test]
fn written_report_round_trips() {
    let tmp = production_project();
    write(tmp.path(), ".env.dev", "REDIS_PASSWORD=admin123\n");
    write(tmp.path(), "docker-compose.monitoring.yml", "services: [\n");

    let analyzer = analyzer_for(tmp.path(), Config::default());
    let result = analyzer.analyze(&mut RecordedProgress::new());
    let output = analyzer.output_path();

    report::write_json(&result, &output).expect("report should be written");
    assert!(output.ends_with("docker/analysis-results.json"));

    let raw = fs::read_to_string(&output).expect("report should be readable");
    let on_disk: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    assert_eq!(on_disk, serde_json::to_value(&result).expect("serializable"));
    assert_eq!(
        on_disk["security"]["environment_files"][".env.example"],
        serde_json::json!({ "exists": false })
    );

    let back = report::read_json(&output).expect("report should deserialize");
    assert_eq!(back, result);
}
