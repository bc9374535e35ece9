//! Phase that scans environment files for default secrets.
//!
//! # Detected Patterns
//!
//! - Default secret tokens from `targets.default_secrets`
//!   (`CHANGE_ME`, `password123`, `admin123`, `secret123`)
//! - `JWT_SECRET`
//! - `POSTGRES_PASSWORD` or `DB_PASSWORD`
//! - `REDIS_PASSWORD`
//!
//! All checks are plain substring tests on the raw file text. Any default
//! secret found makes the run critical.

use deploy_audit_core::{
    AnalysisResult, EnvFileAnalysis, EnvFileFindings, Phase, Progress, ProjectContext,
    SecurityAnalysis, Status,
};
use tracing::debug;

/// Phase code for the secret scan.
pub const CODE: &str = "DA004";

/// Phase name for the secret scan.
pub const NAME: &str = "security";

const JWT_VARS: &[&str] = &["JWT_SECRET"];
const DB_PASSWORD_VARS: &[&str] = &["POSTGRES_PASSWORD", "DB_PASSWORD"];
const REDIS_PASSWORD_VARS: &[&str] = &["REDIS_PASSWORD"];

/// Scans environment files for placeholder credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl EnvSecrets {
    /// Creates the phase.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Runs every content check against one file's text.
#[must_use]
pub fn scan(content: &str, default_secrets: &[String]) -> EnvFileFindings {
    let mentions_any = |vars: &[&str]| vars.iter().any(|v| content.contains(v));

    EnvFileFindings {
        default_secrets: default_secrets
            .iter()
            .filter(|token| content.contains(token.as_str()))
            .cloned()
            .collect(),
        has_jwt_secret: mentions_any(JWT_VARS),
        has_db_password: mentions_any(DB_PASSWORD_VARS),
        has_redis_password: mentions_any(REDIS_PASSWORD_VARS),
    }
}

impl Phase for EnvSecrets {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn title(&self) -> &'static str {
        "Security Configuration Analysis"
    }

    fn description(&self) -> &'static str {
        "Flags default secrets and checks required secret variables in env files"
    }

    fn run(
        &self,
        ctx: &ProjectContext<'_>,
        result: &mut AnalysisResult,
        progress: &mut dyn Progress,
    ) {
        let mut security = SecurityAnalysis::default();

        for file in &ctx.config.targets.env_files {
            let path = ctx.resolve(file);
            if !path.exists() {
                security
                    .environment_files
                    .insert(file.clone(), EnvFileAnalysis::missing());
                progress.report(Status::Warning, &format!("{file}: Not found"));
                continue;
            }

            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    result.push_issue(format!("Failed to analyze {file}: {e}"));
                    progress.report(Status::Failed, &format!("{file}: Analysis error"));
                    continue;
                }
            };

            let findings = scan(&content, &ctx.config.targets.default_secrets);
            if findings.default_secrets.is_empty() {
                progress.report(Status::Ok, &format!("{file}: No default secrets"));
            } else {
                debug!("{}: default secrets {:?}", file, findings.default_secrets);
                security
                    .secrets_detected
                    .extend(findings.default_secrets.iter().cloned());
                progress.report(Status::Warning, &format!("{file}: Default secrets found"));
            }

            security
                .environment_files
                .insert(file.clone(), EnvFileAnalysis::found(findings));
        }

        result.security = security;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploy_audit_core::{Config, RecordedProgress, DEFAULT_SECRET_TOKENS};
    use std::fs;
    use tempfile::TempDir;

    fn tokens() -> Vec<String> {
        DEFAULT_SECRET_TOKENS.iter().map(ToString::to_string).collect()
    }

    fn run_in(dir: &TempDir) -> (AnalysisResult, RecordedProgress) {
        let config = Config::default();
        let ctx = ProjectContext::new(dir.path(), &config);
        let mut result = AnalysisResult::new();
        let mut progress = RecordedProgress::new();
        EnvSecrets.run(&ctx, &mut result, &mut progress);
        (result, progress)
    }

    #[test]
    fn test_scan_detects_default_secrets() {
        let findings = scan(
            "POSTGRES_PASSWORD=password123\nREDIS_PASSWORD=CHANGE_ME\n",
            &tokens(),
        );
        assert_eq!(findings.default_secrets, vec!["CHANGE_ME", "password123"]);
        assert!(findings.has_db_password);
        assert!(findings.has_redis_password);
        assert!(!findings.has_jwt_secret);
    }

    #[test]
    fn test_scan_clean_file() {
        let findings = scan("JWT_SECRET=foo\n", &tokens());
        assert!(findings.default_secrets.is_empty());
        assert!(findings.has_jwt_secret);
        assert!(!findings.has_db_password);
    }

    #[test]
    fn test_db_password_alias() {
        assert!(scan("DB_PASSWORD=s3cure", &tokens()).has_db_password);
    }

    #[test]
    fn test_missing_files_are_recorded() {
        let tmp = TempDir::new().unwrap();
        let (result, progress) = run_in(&tmp);

        assert_eq!(result.security.environment_files.len(), 3);
        assert!(result
            .security
            .environment_files
            .values()
            .all(|f| !f.exists && f.findings.is_none()));
        assert!(result.security.secrets_detected.is_empty());
        assert!(!result.has_critical());
        assert_eq!(progress.with_status(Status::Warning).len(), 3);
    }

    #[test]
    fn test_secrets_aggregate_across_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".env.production"), "DB_PASSWORD=password123\n").unwrap();
        fs::write(tmp.path().join(".env.dev"), "DB_PASSWORD=password123\n").unwrap();
        fs::write(tmp.path().join(".env.example"), "JWT_SECRET=foo\n").unwrap();

        let (result, progress) = run_in(&tmp);

        assert_eq!(
            result.security.secrets_detected,
            vec!["password123", "password123"]
        );
        assert!(result.has_critical());

        let production = result.security.environment_files[".env.production"]
            .findings
            .as_ref()
            .unwrap();
        assert_eq!(production.default_secrets, vec!["password123"]);

        let example = result.security.environment_files[".env.example"]
            .findings
            .as_ref()
            .unwrap();
        assert!(example.has_jwt_secret);
        assert!(example.default_secrets.is_empty());

        assert_eq!(
            progress.with_status(Status::Ok),
            vec![".env.example: No default secrets"]
        );
        assert!(result.security.security_practices.is_empty());
    }

    #[test]
    fn test_unreadable_env_file_is_issue() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".env.dev"), [0xc3, 0x28]).unwrap();

        let (result, _) = run_in(&tmp);

        assert_eq!(result.issues.len(), 1);
        assert!(result.issues[0].starts_with("Failed to analyze .env.dev"));
        assert!(!result.security.environment_files.contains_key(".env.dev"));
    }
}
