//! Output formatting for rendered export variables.

use crate::export::{ExportVars, shell};

/// Output format for the `show` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Shell,
    Markdown,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "shell" | "sh" | "bash" => Some(OutputFormat::Shell),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

/// Format export variables for display.
pub fn format_vars(vars: &ExportVars, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(vars),
        OutputFormat::Shell => Ok(shell::render_script(vars)),
        OutputFormat::Markdown => Ok(format_vars_markdown(vars)),
    }
}

/// Format export variables as a markdown table.
pub fn format_vars_markdown(vars: &ExportVars) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Image variables ({})\n\n", vars.len()));
    md.push_str("| Variable | Value |\n");
    md.push_str("|----------|-------|\n");
    for (key, value) in vars.iter() {
        md.push_str(&format!("| `{}` | {} |\n", key, value.replace('|', "\\|")));
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExportVars {
        let mut vars = ExportVars::new();
        vars.insert("IMAGE_NAME", "demo");
        vars.insert("IMAGE_DESCRIPTION", "a | b");
        vars
    }

    #[test]
    fn test_from_str() {
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("sh"), Some(OutputFormat::Shell));
        assert_eq!(OutputFormat::from_str("md"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::from_str("yaml"), None);
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let md = format_vars_markdown(&sample());
        assert!(md.starts_with("# Image variables (2)"));
        assert!(md.contains("| `IMAGE_NAME` | demo |"));
        assert!(md.contains("| `IMAGE_DESCRIPTION` | a \\| b |"));
    }

    #[test]
    fn test_shell_format() {
        let out = format_vars(&sample(), OutputFormat::Shell).unwrap();
        assert!(out.starts_with("#!/bin/bash\n\n"));
        assert!(out.contains("export IMAGE_NAME='demo'\n"));
    }
}
