//! CLI command definitions for project-vars
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod gather;
pub mod show;

use crate::config::{BundleRoot, SourcePaths};
use crate::settings::DescriptorField;
use clap::{Parser, Subcommand};
use gather::GatherArgs;
use show::ShowArgs;
use std::collections::HashSet;
use std::path::PathBuf;

/// Project metadata aggregation for build and CI tooling
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Bundled resource directory (packaged execution)
    #[arg(long, global = true, value_name = "DIR")]
    pub bundle_dir: Option<PathBuf>,

    /// Path to the local override file (default: ./.env)
    #[arg(long, global = true, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Dotted path of the tool settings table (default: tool.project-vars)
    #[arg(long, global = true, value_name = "TABLE")]
    pub tool_table: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Discovered source paths with command-line overrides applied.
    pub fn source_paths(&self) -> SourcePaths {
        let mut paths = SourcePaths::discover();
        if let Some(ref dir) = self.bundle_dir {
            paths = paths.with_bundle_root(BundleRoot::packaged(dir));
        }
        if let Some(ref env_file) = self.env_file {
            paths = paths.with_env_file(env_file);
        }
        if let Some(ref table) = self.tool_table {
            paths = paths.with_tool_table(table);
        }
        paths
    }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the image descriptor and write the CI export script (default)
    Gather(GatherArgs),

    /// Print the image variables without writing anything
    Show(ShowArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Gather(GatherArgs::default())
    }
}

/// Collect `--exclude` values into a set.
pub(crate) fn exclude_set(fields: &[DescriptorField]) -> HashSet<DescriptorField> {
    fields.iter().copied().collect()
}
