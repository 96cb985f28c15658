//! Configuration file resolution with global fallback.
//!
//! Resolves the configuration file path using a deterministic priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `{project}/dj-lint.toml` or `.dj-lint.toml`
//! 3. `{project}/pyproject.toml` when it has a `[tool.dj-lint]` table
//! 4. `~/.dj-lint/config.toml` (global fallback)
//! 5. No config found → defaults

use dj_lint_core::Config;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// The `[tool.dj-lint]` table of the project's `pyproject.toml`.
    PyProject(PathBuf),
    /// Loaded from the global config directory (`~/.dj-lint/`).
    Global(PathBuf),
    /// No config found; defaults will be used.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::PyProject(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` if the config was loaded from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_NAMES: &[&str] = &["dj-lint.toml", ".dj-lint.toml"];

/// Python packaging metadata that may carry a `[tool.dj-lint]` table.
const PYPROJECT: &str = "pyproject.toml";

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file path for the file or directory `target`.
///
/// See module-level docs for resolution order.
#[must_use]
pub fn resolve(target: &Path, explicit: Option<&Path>) -> ConfigSource {
    let project_dir = if target.is_file() {
        target.parent().unwrap_or(target)
    } else {
        target
    };
    resolve_inner(project_dir, explicit, global_config_dir())
}

/// Testable core: accepts `global_dir` as parameter to avoid env var races.
fn resolve_inner(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    // 1. Explicit path from --config flag
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    // 2. Project-level config
    for name in PROJECT_CONFIG_NAMES {
        let candidate = project_dir.join(name);
        if candidate.exists() {
            tracing::debug!("Found project config: {}", candidate.display());
            return ConfigSource::Project(candidate);
        }
    }

    // 3. pyproject.toml, only if it configures dj-lint
    let candidate = project_dir.join(PYPROJECT);
    if has_tool_table(&candidate) {
        tracing::debug!("Found [tool.dj-lint] in {}", candidate.display());
        return ConfigSource::PyProject(candidate);
    }

    // 4. Global fallback
    if let Some(dir) = global_dir {
        let candidate = dir.join(GLOBAL_CONFIG_NAME);
        if candidate.exists() {
            tracing::debug!("Found global config: {}", candidate.display());
            return ConfigSource::Global(candidate);
        }
    }

    ConfigSource::Default
}

/// A malformed `pyproject.toml` counts as configured so that loading it
/// reports the parse error instead of silently falling back.
fn has_tool_table(path: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(path) else {
        return false;
    };
    !matches!(Config::from_pyproject(&content), Ok(None))
}

/// Returns the global config directory path.
///
/// Resolution: `$DJ_LINT_CONFIG_DIR` > `~/.dj-lint/`
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("DJ_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".dj-lint"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_takes_priority_over_project() {
        let tmp = TempDir::new().unwrap();
        let explicit = tmp.path().join("custom.toml");
        fs::write(&explicit, "").unwrap();

        let project = tmp.path().join("project");
        fs::create_dir(&project).unwrap();
        fs::write(project.join("dj-lint.toml"), "").unwrap();

        let result = resolve_inner(&project, Some(&explicit), None);
        assert_eq!(result, ConfigSource::Explicit(explicit));
    }

    #[test]
    fn explicit_does_not_check_existence() {
        let result = resolve_inner(
            Path::new("/tmp"),
            Some(Path::new("/nonexistent.toml")),
            None,
        );
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/nonexistent.toml"))
        );
    }

    #[test]
    fn dj_lint_toml_preferred_over_dot_prefix() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("dj-lint.toml"), "").unwrap();
        fs::write(tmp.path().join(".dj-lint.toml"), "").unwrap();

        let result = resolve_inner(tmp.path(), None, None);
        assert_eq!(
            result,
            ConfigSource::Project(tmp.path().join("dj-lint.toml"))
        );
    }

    #[test]
    fn dot_dj_lint_toml_found() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".dj-lint.toml"), "").unwrap();

        let result = resolve_inner(tmp.path(), None, None);
        assert_eq!(
            result,
            ConfigSource::Project(tmp.path().join(".dj-lint.toml"))
        );
    }

    #[test]
    fn pyproject_with_tool_table() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("pyproject.toml"),
            "[project]\nname = \"pipeline\"\n\n[tool.dj-lint.datajoint]\npermit_filepath = true\n",
        )
        .unwrap();

        let result = resolve_inner(tmp.path(), None, None);
        assert_eq!(
            result,
            ConfigSource::PyProject(tmp.path().join("pyproject.toml"))
        );
    }

    #[test]
    fn pyproject_without_tool_table_falls_through() {
        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join("pyproject.toml"),
            "[tool.black]\nline-length = 88\n",
        )
        .unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(
            result,
            ConfigSource::Global(global.path().join("config.toml"))
        );
    }

    #[test]
    fn project_file_beats_pyproject() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".dj-lint.toml"), "").unwrap();
        fs::write(tmp.path().join("pyproject.toml"), "[tool.dj-lint]\n").unwrap();

        let result = resolve_inner(tmp.path(), None, None);
        assert!(matches!(result, ConfigSource::Project(_)));
    }

    #[test]
    fn global_dir_missing_config_file_returns_default() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Default);
    }

    #[test]
    fn file_target_uses_its_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("dj-lint.toml"), "").unwrap();
        let schema = tmp.path().join("schema.py");
        fs::write(&schema, "").unwrap();

        assert_eq!(
            resolve(&schema, None),
            ConfigSource::Project(tmp.path().join("dj-lint.toml"))
        );
    }

    #[test]
    fn config_source_path_and_global_flag() {
        let p = PathBuf::from("/tmp/test.toml");
        assert!(ConfigSource::Default.path().is_none());
        assert_eq!(ConfigSource::PyProject(p.clone()).path(), Some(p.as_path()));
        assert!(ConfigSource::Global(p.clone()).is_global());
        assert!(!ConfigSource::Project(p).is_global());
    }
}
