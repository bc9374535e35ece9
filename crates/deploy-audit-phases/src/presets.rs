//! Phase presets.

use crate::{ComposeFiles, ConfigPresence, Dockerfiles, EnvSecrets, MonitoringConfig};
use deploy_audit_core::PhaseBox;

/// Returns the default audit, in execution order.
///
/// Includes:
/// - `compose` (DA001) - Compose services, volumes and networks
/// - `dockerfiles` (DA002) - Build stages and security features
/// - `monitoring` (DA003) - Prometheus and Grafana configuration
/// - `security` (DA004) - Default secrets in env files
/// - `environment` (DA005) - Auxiliary config presence
#[must_use]
pub fn default_phases() -> Vec<PhaseBox> {
    vec![
        Box::new(ComposeFiles::new()),
        Box::new(Dockerfiles::new()),
        Box::new(MonitoringConfig::new()),
        Box::new(EnvSecrets::new()),
        Box::new(ConfigPresence::new()),
    ]
}

/// Returns all available phases.
#[must_use]
pub fn all_phases() -> Vec<PhaseBox> {
    default_phases()
}

/// Looks up a phase by name or code.
#[must_use]
pub fn phase_by_name(name: &str) -> Option<PhaseBox> {
    all_phases()
        .into_iter()
        .find(|phase| phase.name() == name || phase.code().eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_order() {
        let names: Vec<&str> = default_phases().iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec!["compose", "dockerfiles", "monitoring", "security", "environment"]
        );
    }

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<&str> = all_phases().iter().map(|p| p.code()).collect();
        assert_eq!(codes.len(), all_phases().len());
    }

    #[test]
    fn test_phase_by_name() {
        assert_eq!(phase_by_name("security").unwrap().code(), "DA004");
        assert_eq!(phase_by_name("da002").unwrap().name(), "dockerfiles");
        assert!(phase_by_name("nope").is_none());
    }
}
