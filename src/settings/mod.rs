//! Settings aggregation.
//!
//! Collects project metadata from three sources and derives an
//! [`ImageDescriptor`]:
//! 1. **Project file** - `pyproject.toml` at the bundle root
//! 2. **Override file** - `.env` in the working directory (optional)
//! 3. **Environment** - `CI`, `GIT_COMMIT` and pass-through variables
//!
//! Data flows one way: readers, then [`SettingsAggregator`], then
//! [`crate::export::Exporter`]. The descriptor is built once by the caller
//! and passed by reference.

mod aggregator;
mod descriptor;
mod env_file;
mod env_vars;
mod project;

pub use aggregator::SettingsAggregator;
pub use descriptor::{DescriptorField, ImageDescriptor};
pub use env_file::{EnvFileOverrides, EnvFileReader};
pub use env_vars::{CI_VAR, EnvVarReader, EnvVars, GIT_COMMIT_VAR};
pub use project::{Author, ProjectIdentity, ProjectUrls, SourceReader, ToolSettings};

use crate::config::SourcePaths;
use crate::error::SettingsResult;
use tracing::debug;

/// Entry point tying the readers to the aggregator.
#[derive(Debug, Clone)]
pub struct Sources {
    paths: SourcePaths,
}

impl Sources {
    pub fn new(paths: SourcePaths) -> Self {
        Self { paths }
    }

    /// Sources at their discovered default locations.
    pub fn discover() -> Self {
        Self::new(SourcePaths::discover())
    }

    pub fn paths(&self) -> &SourcePaths {
        &self.paths
    }

    /// Read every source, including the live process environment, and build
    /// the descriptor.
    pub fn gather(&self) -> SettingsResult<ImageDescriptor> {
        self.gather_with_env(EnvVarReader::new().read())
    }

    /// Same as [`Sources::gather`] with an explicit environment snapshot.
    pub fn gather_with_env(&self, env_vars: EnvVars) -> SettingsResult<ImageDescriptor> {
        debug!(
            mode = %self.paths.bundle_root.mode(),
            project_file = %self.paths.project_file_path().display(),
            env_file = %self.paths.env_file.display(),
            "Gathering settings"
        );

        let (identity, tool_settings) = SourceReader::new(&self.paths).read()?;
        let env_file = EnvFileReader::new(&self.paths.env_file).read()?;
        SettingsAggregator::build(identity, tool_settings, env_file, env_vars)
    }
}
