//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_NAME: &str = "deploy-audit.toml";

const DEFAULT_CONFIG: &str = r#"# deploy-audit configuration

[analyzer]
# Report location, relative to the project root
output = "docker/analysis-results.json"

# Glob patterns excluded from Dockerfile discovery
exclude = [
    "**/node_modules/**",
    "**/target/**",
]

[targets]
compose_files = [
    "docker-compose.yml",
    "docker-compose.prod.yml",
    "docker-compose.dev.yml",
    "docker-compose.monitoring.yml",
    "docker/docker-compose.optimized.yml",
]
env_files = [".env.production", ".env.dev", ".env.example"]
config_files = ["nginx/nginx.conf", "redis.conf", "redis.prod.conf"]
default_secrets = ["CHANGE_ME", "password123", "admin123", "secret123"]

# Phases can be switched off individually
# [phases.monitoring]
# enabled = false
"#;

/// Runs the init command in the current directory.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("."), force)?;

    println!("Created {CONFIG_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_NAME} to match your deployment files");
    println!("  2. Run: deploy-audit check");

    Ok(())
}

fn write_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}
