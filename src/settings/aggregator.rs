//! Builds the [`ImageDescriptor`] from the raw sources.

use super::descriptor::ImageDescriptor;
use super::env_file::EnvFileOverrides;
use super::env_vars::EnvVars;
use super::project::{ProjectIdentity, ToolSettings};
use crate::error::{SettingsError, SettingsResult};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

/// Combines validated sources into a descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsAggregator;

impl SettingsAggregator {
    /// Build a descriptor stamped with the current instant.
    pub fn build(
        identity: ProjectIdentity,
        tool_settings: ToolSettings,
        env_file: EnvFileOverrides,
        env_vars: EnvVars,
    ) -> SettingsResult<ImageDescriptor> {
        Self::build_at(identity, tool_settings, env_file, env_vars, Utc::now())
    }

    /// Build a descriptor stamped with `now`.
    ///
    /// Fails with [`SettingsError::MissingProvenance`] when CI is active and
    /// no commit hash is available.
    pub fn build_at(
        identity: ProjectIdentity,
        tool_settings: ToolSettings,
        env_file: EnvFileOverrides,
        env_vars: EnvVars,
        now: DateTime<Utc>,
    ) -> SettingsResult<ImageDescriptor> {
        let git_hash = env_vars.git_commit().map(str::to_string);
        if env_vars.is_ci() && git_hash.is_none() {
            return Err(SettingsError::MissingProvenance);
        }

        let descriptor = ImageDescriptor {
            built_at: now,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Micros, false),
            authors: identity.authors_display(),
            git_hash,
            identity,
            tool_settings,
            env_file,
            env_vars,
        };

        info!(
            name = %descriptor.name(),
            version = %descriptor.version(),
            ci = descriptor.is_ci(),
            git_hash = descriptor.git_hash().unwrap_or("-"),
            "Built image descriptor"
        );
        Ok(descriptor)
    }
}
