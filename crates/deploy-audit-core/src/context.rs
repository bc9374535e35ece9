//! Context types for phase execution.

use crate::config::Config;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Context provided to every phase.
///
/// Carries the project root and configuration, and resolves paths against
/// the root so phases never touch the process working directory.
#[derive(Debug, Clone)]
pub struct ProjectContext<'a> {
    /// Root directory of the project.
    pub root: &'a Path,
    /// Active configuration.
    pub config: &'a Config,
    /// Compiled exclude patterns for file discovery.
    excludes: Vec<glob::Pattern>,
}

impl<'a> ProjectContext<'a> {
    /// Creates a new project context.
    #[must_use]
    pub fn new(root: &'a Path, config: &'a Config) -> Self {
        Self {
            root,
            config,
            excludes: Vec::new(),
        }
    }

    /// Sets the exclude patterns used by [`ProjectContext::discover`].
    #[must_use]
    pub fn with_excludes(mut self, excludes: Vec<glob::Pattern>) -> Self {
        self.excludes = excludes;
        self
    }

    /// Resolves a root-relative path.
    #[must_use]
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Returns `path` relative to the root, or unchanged if it lies outside.
    #[must_use]
    pub fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }

    /// Finds regular files matching a root-relative glob pattern.
    ///
    /// Results come back in glob order (sorted by path). Excluded paths and
    /// entries that cannot be read are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if `pattern` is not a valid glob.
    pub fn discover(&self, pattern: &str) -> Result<Vec<PathBuf>, glob::PatternError> {
        let root = glob::Pattern::escape(&self.root.to_string_lossy());
        let full = format!("{root}/{pattern}");
        let mut files = Vec::new();

        for entry in glob::glob(&full)? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping unreadable path {}: {}", e.path().display(), e);
                    continue;
                }
            };

            if !path.is_file() {
                continue;
            }

            if self.is_excluded(&path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path);
        }

        Ok(files)
    }

    /// Checks if a path matches any exclude pattern.
    ///
    /// Patterns are matched against the root-relative path, and also as a
    /// plain substring with `**` removed so `**/vendor/**` catches any
    /// `/vendor/` segment.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        let relative = self.relative_path(path);
        let relative_str = relative.to_string_lossy();

        self.excludes.iter().any(|pattern| {
            if pattern.matches(&relative_str) {
                return true;
            }
            let normalized = pattern.as_str().replace("**", "");
            !normalized.is_empty() && relative_str.contains(&normalized)
        })
    }
}
