//! Source location discovery.
//!
//! Resolves the bundle root and the paths of each settings source from
//! built-in defaults, then environment variables, then explicit overrides.

use std::fmt;
use std::path::{Path, PathBuf};

/// Project description file, relative to the bundle root.
pub const PROJECT_FILE: &str = "pyproject.toml";

/// Local override file, relative to the working directory.
pub const ENV_FILE: &str = ".env";

/// Tool table read into [`crate::settings::ToolSettings`].
pub const DEFAULT_TOOL_TABLE: &str = "tool.project-vars";

/// Default output file for the CI export script.
pub const DEFAULT_EXPORT_FILE: &str = "pipeline_env_vars.sh";

/// Explicit bundled-resource directory (packaged execution).
pub const BUNDLE_DIR_VAR: &str = "PROJECT_VARS_BUNDLE_DIR";

/// Explicit `.env` path.
pub const ENV_FILE_VAR: &str = "PROJECT_VARS_ENV_FILE";

/// Dotted tool table path.
pub const TOOL_TABLE_VAR: &str = "PROJECT_VARS_TOOL_TABLE";

/// Set by documentation builds, which run two levels below the project root.
pub const DOCS_BUILD_VAR: &str = "PY_PKG_YEAR";

/// How the process was launched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Running from a checkout; the project root is the working directory.
    Interactive,
    /// Running from a packaged executable with its resources unpacked elsewhere.
    Packaged,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Interactive => write!(f, "interactive"),
            ExecutionMode::Packaged => write!(f, "packaged"),
        }
    }
}

/// Directory treated as the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRoot {
    dir: PathBuf,
    mode: ExecutionMode,
}

impl BundleRoot {
    /// Bundle root for a checkout at `dir`.
    pub fn interactive(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            mode: ExecutionMode::Interactive,
        }
    }

    /// Bundle root for resources unpacked at `dir`.
    pub fn packaged(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            mode: ExecutionMode::Packaged,
        }
    }

    /// Discover the bundle root from the process environment.
    pub fn discover() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::resolve(
            std::env::var_os(BUNDLE_DIR_VAR).map(PathBuf::from),
            std::env::var_os(DOCS_BUILD_VAR).is_some(),
            cwd,
        )
    }

    /// Resolve from already-collected inputs.
    ///
    /// An explicit bundle directory selects packaged mode. Otherwise the
    /// working directory is used, lifted two levels for documentation builds.
    pub fn resolve(bundle_dir: Option<PathBuf>, docs_build: bool, cwd: PathBuf) -> Self {
        match bundle_dir {
            Some(dir) => Self::packaged(dir),
            None if docs_build => Self::interactive(cwd.join("..").join("..")),
            None => Self::interactive(cwd),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }
}

/// Locations of every settings source.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub bundle_root: BundleRoot,
    /// Project file name, joined onto the bundle root.
    pub project_file: PathBuf,
    /// Override file path.
    pub env_file: PathBuf,
    /// Table path of the tool settings, e.g. `["tool", "project-vars"]`.
    pub tool_table: Vec<String>,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl SourcePaths {
    /// Discover source paths from environment and defaults.
    pub fn discover() -> Self {
        let env_file = std::env::var_os(ENV_FILE_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(ENV_FILE));

        let tool_table = std::env::var(TOOL_TABLE_VAR)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOOL_TABLE.to_string());

        Self {
            bundle_root: BundleRoot::discover(),
            project_file: PathBuf::from(PROJECT_FILE),
            env_file,
            tool_table: parse_table_path(&tool_table),
        }
    }

    /// Paths rooted at a single checkout directory, with `.env` beside the project file.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            env_file: root.join(ENV_FILE),
            bundle_root: BundleRoot::interactive(root),
            project_file: PathBuf::from(PROJECT_FILE),
            tool_table: parse_table_path(DEFAULT_TOOL_TABLE),
        }
    }

    /// Replace the bundle root.
    pub fn with_bundle_root(mut self, root: BundleRoot) -> Self {
        self.bundle_root = root;
        self
    }

    /// Replace the override file path.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    /// Replace the tool table from a dotted path.
    pub fn with_tool_table(mut self, dotted: &str) -> Self {
        self.tool_table = parse_table_path(dotted);
        self
    }

    /// Full path of the project description file.
    pub fn project_file_path(&self) -> PathBuf {
        self.bundle_root.dir().join(&self.project_file)
    }

    /// Tool table path as written in TOML.
    pub fn tool_table_name(&self) -> String {
        self.tool_table.join(".")
    }
}

/// Split a dotted table path. Empty segments are dropped.
///
/// A path with no segments left falls back to [`DEFAULT_TOOL_TABLE`].
pub fn parse_table_path(dotted: &str) -> Vec<String> {
    let segments: Vec<String> = dotted
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if segments.is_empty() {
        return DEFAULT_TOOL_TABLE.split('.').map(str::to_string).collect();
    }
    segments
}
