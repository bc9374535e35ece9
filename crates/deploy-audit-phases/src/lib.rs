//! # deploy-audit-phases
//!
//! Built-in audit phases for deploy-audit.
//!
//! ## Available Phases
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | DA001 | `compose` | Services, volumes and networks of compose files |
//! | DA002 | `dockerfiles` | Build stages, non-root users, healthchecks, build cache |
//! | DA003 | `monitoring` | Prometheus scrape configs and Grafana dashboards |
//! | DA004 | `security` | Default secrets and secret variables in env files |
//! | DA005 | `environment` | Presence of nginx and redis configuration |
//!
//! ## Usage
//!
//! ```ignore
//! use deploy_audit_core::{Analyzer, SilentProgress};
//! use deploy_audit_phases::default_phases;
//!
//! let mut builder = Analyzer::builder().root(".");
//! for phase in default_phases() {
//!     builder = builder.phase_box(phase);
//! }
//! let result = builder.build()?.analyze(&mut SilentProgress);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod compose;
pub mod dockerfile;
pub mod environment;
pub mod monitoring;
mod presets;
pub mod secrets;

pub use compose::ComposeFiles;
pub use dockerfile::Dockerfiles;
pub use environment::ConfigPresence;
pub use monitoring::MonitoringConfig;
pub use presets::{all_phases, default_phases, phase_by_name};
pub use secrets::EnvSecrets;

/// Re-export core types for convenience.
pub use deploy_audit_core::{AnalysisResult, Phase, Status};
