//! Shell script rendering for CI pipelines.

use super::ExportVars;
use crate::error::{SettingsError, SettingsResult};
use std::path::Path;
use tracing::info;

/// First line of every generated script.
pub const SHEBANG: &str = "#!/bin/bash";

/// Quote a value for a single-quoted shell string.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Render the script text: shebang, blank line, one `export` per entry.
pub fn render_script(vars: &ExportVars) -> String {
    let mut script = String::new();
    script.push_str(SHEBANG);
    script.push_str("\n\n");
    for (key, value) in vars.iter() {
        script.push_str(&format!("export {}={}\n", key, quote(value)));
    }
    script
}

/// Write the script to `path`, creating parent directories.
pub fn write_script(vars: &ExportVars, path: &Path) -> SettingsResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| SettingsError::io(parent, e))?;
    }
    std::fs::write(path, render_script(vars)).map_err(|e| SettingsError::io(path, e))?;
    info!(path = %path.display(), vars = vars.len(), "Wrote CI export script");
    Ok(())
}
