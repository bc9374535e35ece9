//! # deploy-audit-core
//!
//! Core framework for auditing container deployment configuration.
//!
//! This crate provides the result model and the machinery the phases plug
//! into. It includes:
//!
//! - [`AnalysisResult`] and its per-area analyses, serialized as the report
//! - [`Phase`] trait for one step of the audit
//! - [`Progress`] trait for human-readable progress while phases run
//! - [`Analyzer`] for running phases and deriving recommendations
//!
//! ## Example
//!
//! ```ignore
//! use deploy_audit_core::{report, Analyzer, SilentProgress};
//!
//! let analyzer = Analyzer::builder()
//!     .root(".")
//!     .phase(MyPhase::new())
//!     .build()?;
//!
//! let result = analyzer.analyze(&mut SilentProgress);
//! report::write_json(&result, &analyzer.output_path())?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod phase;
mod types;

/// JSON report writer.
pub mod report;
/// Summary counts and recommendations.
pub mod summary;
/// Utility modules for phase implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{
    AnalyzerConfig, Config, ConfigError, PhaseConfig, TargetsConfig, DEFAULT_COMPOSE_FILES,
    DEFAULT_CONFIG_FILES, DEFAULT_ENV_FILES, DEFAULT_OUTPUT, DEFAULT_SECRET_TOKENS,
};
pub use context::ProjectContext;
pub use phase::{Phase, PhaseBox, Progress, RecordedProgress, SilentProgress, Status};
pub use report::ReportError;
pub use summary::Summary;
pub use types::{
    AlertmanagerStatus, AnalysisResult, ComposeFileAnalysis, DockerfileAnalysis,
    EnvFileAnalysis, EnvFileFindings, EnvironmentAnalysis, FilePresence, GrafanaStatus,
    JaegerStatus, MonitoringAnalysis, PrometheusStatus, SecurityAnalysis, ServiceAnalysis,
};
