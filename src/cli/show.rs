//! Show subcommand for project-vars CLI

use crate::export::ToolExport;
use crate::settings::DescriptorField;
use clap::Args;
use std::collections::HashSet;

/// Arguments for the show subcommand
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Output format: json, shell, or markdown
    #[arg(short, long, default_value = "json")]
    pub format: String,

    /// Comma-separated descriptor fields to leave out
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub exclude: Vec<DescriptorField>,

    /// Tool settings to include as KEY or KEY=VAR (comma-separated)
    #[arg(long = "tool-var", value_name = "LIST", value_delimiter = ',')]
    pub tool_vars: Vec<ToolExport>,
}

impl ShowArgs {
    pub fn exclude_set(&self) -> HashSet<DescriptorField> {
        super::exclude_set(&self.exclude)
    }
}
