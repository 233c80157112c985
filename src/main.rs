//! project-vars
//!
//! Gathers project metadata into the image descriptor used to tag and label
//! build artifacts, and writes the CI export script.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use project_vars::cli::gather::GatherArgs;
use project_vars::cli::show::ShowArgs;
use project_vars::cli::{Cli, Command};
use project_vars::export::Exporter;
use project_vars::format::{OutputFormat, format_vars};
use project_vars::logging::{self, LogTarget};
use project_vars::settings::Sources;
use tracing::debug;

fn run_gather(sources: &Sources, args: &GatherArgs) -> Result<()> {
    let descriptor = sources
        .gather()
        .context("Failed to gather project settings")?;

    let exporter = Exporter::for_descriptor(&descriptor).with_tool_exports(args.tool_vars.clone());
    let vars = exporter.render(&descriptor, &args.exclude_set())?;
    let vars = exporter
        .export_shell(vars, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("{}", serde_json::to_string_pretty(&vars)?);
    Ok(())
}

fn run_show(sources: &Sources, args: &ShowArgs) -> Result<()> {
    let format = OutputFormat::from_str(&args.format)
        .ok_or_else(|| anyhow!("Unknown format '{}': expected json, shell, or markdown", args.format))?;

    let descriptor = sources
        .gather()
        .context("Failed to gather project settings")?;

    // Rendering only; show never writes the export script.
    let exporter = Exporter::for_descriptor(&descriptor).with_tool_exports(args.tool_vars.clone());
    let vars = exporter.render(&descriptor, &args.exclude_set())?;

    print!("{}", format_vars(&vars, format)?);
    if format != OutputFormat::Shell {
        println!();
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let sources = Sources::new(cli.source_paths());
    debug!(
        mode = %sources.paths().bundle_root.mode(),
        root = %sources.paths().bundle_root.dir().display(),
        tool_table = %sources.paths().tool_table_name(),
        "Resolved sources"
    );

    match cli.command.unwrap_or_default() {
        Command::Gather(args) => run_gather(&sources, &args),
        Command::Show(args) => run_show(&sources, &args),
    }
}
