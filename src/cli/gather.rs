//! Gather subcommand for project-vars CLI
//!
//! Builds the image descriptor, writes the export script when running in CI,
//! and prints the exported variables as JSON.

use crate::config::DEFAULT_EXPORT_FILE;
use crate::export::ToolExport;
use crate::settings::DescriptorField;
use clap::Args;
use std::collections::HashSet;
use std::path::PathBuf;

/// Arguments for the gather subcommand
#[derive(Args, Debug)]
pub struct GatherArgs {
    /// Export script path, relative to the working directory
    #[arg(value_name = "FILE", default_value = DEFAULT_EXPORT_FILE)]
    pub output: PathBuf,

    /// Comma-separated descriptor fields to leave out
    ///
    /// Accepts field names (git_hash) or variable names (IMAGE_GIT_HASH).
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub exclude: Vec<DescriptorField>,

    /// Tool settings to export as KEY or KEY=VAR (comma-separated)
    ///
    /// Without `=VAR` the variable name is KEY in upper snake case,
    /// e.g. jfrog-url becomes JFROG_URL.
    #[arg(long = "tool-var", value_name = "LIST", value_delimiter = ',')]
    pub tool_vars: Vec<ToolExport>,
}

impl Default for GatherArgs {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_EXPORT_FILE),
            exclude: Vec::new(),
            tool_vars: Vec::new(),
        }
    }
}

impl GatherArgs {
    pub fn exclude_set(&self) -> HashSet<DescriptorField> {
        super::exclude_set(&self.exclude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    fn parse(args: &[&str]) -> GatherArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Some(Command::Gather(args)) => args,
            other => panic!("expected gather, got {other:?}"),
        }
    }

    #[test]
    fn test_default_output() {
        let args = parse(&["project-vars", "gather"]);
        assert_eq!(args.output, PathBuf::from("pipeline_env_vars.sh"));
        assert!(args.exclude.is_empty());
    }

    #[test]
    fn test_exclude_and_tool_vars() {
        let args = parse(&[
            "project-vars",
            "gather",
            "out/vars.sh",
            "--exclude",
            "timestamp,IMAGE_GIT_HASH",
            "--tool-var",
            "jfrog-url,jfrog-user=REGISTRY_USER",
        ]);
        assert_eq!(args.output, PathBuf::from("out/vars.sh"));
        assert_eq!(
            args.exclude_set(),
            HashSet::from([DescriptorField::Timestamp, DescriptorField::GitHash])
        );
        assert_eq!(
            args.tool_vars,
            vec![
                ToolExport::new("jfrog-url", "JFROG_URL").unwrap(),
                ToolExport::new("jfrog-user", "REGISTRY_USER").unwrap(),
            ]
        );
    }

    #[test]
    fn test_unknown_exclude_rejected() {
        assert!(Cli::try_parse_from(["project-vars", "gather", "--exclude", "bogus"]).is_err());
    }
}
