//! The canonical image descriptor.

use super::env_file::EnvFileOverrides;
use super::env_vars::EnvVars;
use super::project::{ProjectIdentity, ToolSettings};
use chrono::{DateTime, Utc};
use heck::ToSnakeCase;
use std::fmt;
use std::str::FromStr;

/// Public fields of an [`ImageDescriptor`], in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DescriptorField {
    Timestamp,
    Name,
    Version,
    SourceUrl,
    DocUrl,
    Description,
    Authors,
    License,
    DockerUrl,
    GitHash,
}

impl DescriptorField {
    pub const ALL: [DescriptorField; 10] = [
        DescriptorField::Timestamp,
        DescriptorField::Name,
        DescriptorField::Version,
        DescriptorField::SourceUrl,
        DescriptorField::DocUrl,
        DescriptorField::Description,
        DescriptorField::Authors,
        DescriptorField::License,
        DescriptorField::DockerUrl,
        DescriptorField::GitHash,
    ];

    pub fn field_name(self) -> &'static str {
        match self {
            DescriptorField::Timestamp => "timestamp",
            DescriptorField::Name => "name",
            DescriptorField::Version => "version",
            DescriptorField::SourceUrl => "source_url",
            DescriptorField::DocUrl => "doc_url",
            DescriptorField::Description => "description",
            DescriptorField::Authors => "authors",
            DescriptorField::License => "license",
            DescriptorField::DockerUrl => "docker_url",
            DescriptorField::GitHash => "git_hash",
        }
    }

    /// Shell variable name used when exporting.
    pub fn export_key(self) -> &'static str {
        match self {
            DescriptorField::Timestamp => "IMAGE_TIMESTAMP",
            DescriptorField::Name => "IMAGE_NAME",
            DescriptorField::Version => "IMAGE_VERSION",
            DescriptorField::SourceUrl => "IMAGE_SRC",
            DescriptorField::DocUrl => "IMAGE_DOC",
            DescriptorField::Description => "IMAGE_DESCRIPTION",
            DescriptorField::Authors => "IMAGE_AUTHORS",
            DescriptorField::License => "IMAGE_LICENSE",
            DescriptorField::DockerUrl => "IMAGE_URL",
            DescriptorField::GitHash => "IMAGE_GIT_HASH",
        }
    }
}

impl fmt::Display for DescriptorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for DescriptorField {
    type Err = String;

    /// Accepts the field name (`git_hash`) or the export key (`IMAGE_GIT_HASH`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_snake_case();
        DescriptorField::ALL
            .into_iter()
            .find(|field| {
                field.field_name() == wanted || field.export_key().to_snake_case() == wanted
            })
            .ok_or_else(|| format!("unknown descriptor field: {}", s))
    }
}

/// Canonical, read-only record stamped onto build and container artifacts.
///
/// Only [`super::SettingsAggregator`] constructs it. The raw sources it was
/// built from stay reachable through accessors but are never exported.
#[derive(Debug)]
pub struct ImageDescriptor {
    pub(super) built_at: DateTime<Utc>,
    pub(super) timestamp: String,
    pub(super) authors: String,
    pub(super) git_hash: Option<String>,
    pub(super) identity: ProjectIdentity,
    pub(super) tool_settings: ToolSettings,
    pub(super) env_file: EnvFileOverrides,
    pub(super) env_vars: EnvVars,
}

impl ImageDescriptor {
    /// Construction instant, ISO-8601 UTC.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn name(&self) -> &str {
        self.identity.name()
    }

    pub fn version(&self) -> &str {
        self.identity.version()
    }

    pub fn source_url(&self) -> &str {
        self.identity.urls().repository()
    }

    pub fn doc_url(&self) -> &str {
        self.identity.urls().documentation()
    }

    pub fn description(&self) -> &str {
        self.identity.description()
    }

    pub fn authors(&self) -> &str {
        &self.authors
    }

    pub fn license(&self) -> &str {
        self.identity.license()
    }

    pub fn docker_url(&self) -> &str {
        self.identity.urls().docker()
    }

    pub fn git_hash(&self) -> Option<&str> {
        self.git_hash.as_deref()
    }

    /// Value of a public field; `None` only for an absent `git_hash`.
    pub fn value(&self, field: DescriptorField) -> Option<&str> {
        match field {
            DescriptorField::Timestamp => Some(self.timestamp()),
            DescriptorField::Name => Some(self.name()),
            DescriptorField::Version => Some(self.version()),
            DescriptorField::SourceUrl => Some(self.source_url()),
            DescriptorField::DocUrl => Some(self.doc_url()),
            DescriptorField::Description => Some(self.description()),
            DescriptorField::Authors => Some(self.authors()),
            DescriptorField::License => Some(self.license()),
            DescriptorField::DockerUrl => Some(self.docker_url()),
            DescriptorField::GitHash => self.git_hash(),
        }
    }

    /// Whether the descriptor was built for a CI run.
    pub fn is_ci(&self) -> bool {
        self.env_vars.is_ci()
    }

    pub fn identity(&self) -> &ProjectIdentity {
        &self.identity
    }

    pub fn tool_settings(&self) -> &ToolSettings {
        &self.tool_settings
    }

    pub fn env_file(&self) -> &EnvFileOverrides {
        &self.env_file
    }

    pub fn env_vars(&self) -> &EnvVars {
        &self.env_vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_from_str_accepts_both_spellings() {
        assert_eq!(
            "git_hash".parse::<DescriptorField>().unwrap(),
            DescriptorField::GitHash
        );
        assert_eq!(
            "IMAGE_GIT_HASH".parse::<DescriptorField>().unwrap(),
            DescriptorField::GitHash
        );
        assert_eq!(
            "IMAGE_SRC".parse::<DescriptorField>().unwrap(),
            DescriptorField::SourceUrl
        );
        assert_eq!(
            "docker_url".parse::<DescriptorField>().unwrap(),
            DescriptorField::DockerUrl
        );
        assert!("jfrog_url".parse::<DescriptorField>().is_err());
    }

    #[test]
    fn test_export_keys_unique() {
        let mut keys: Vec<_> = DescriptorField::ALL.iter().map(|f| f.export_key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), DescriptorField::ALL.len());
    }
}
