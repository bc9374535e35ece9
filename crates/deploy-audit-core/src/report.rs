//! JSON report writer.

use crate::types::AnalysisResult;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Errors writing the report.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ReportError {
    /// The result could not be serialized.
    #[error("Failed to serialize report: {0}")]
    #[diagnostic(code(deploy_audit::report::serialize))]
    Serialize(#[from] serde_json::Error),

    /// The report file could not be written.
    #[error("Failed to write report {path}: {source}")]
    #[diagnostic(
        code(deploy_audit::report::io),
        help("check that the output directory is writable, or pass --no-write")
    )]
    Io {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Serializes a result as 2-space indented JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_pretty(result: &AnalysisResult) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Writes the report to `path`, creating missing parent directories and
/// replacing any existing file.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub fn write_json(result: &AnalysisResult, path: &Path) -> Result<(), ReportError> {
    let json = to_json_pretty(result)?;
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, json).map_err(io_err)?;

    debug!("Wrote report to {}", path.display());
    Ok(())
}

/// Reads a report back from disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid report.
pub fn read_json(path: &Path) -> Result<AnalysisResult, ReportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}
