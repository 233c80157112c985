//! Export of the image descriptor.
//!
//! Renders the public descriptor fields as an ordered `KEY -> VALUE` mapping
//! and, in CI runs, writes it out as a sourceable shell script:
//! - descriptor fields come first, in [`DescriptorField::ALL`] order
//! - requested tool settings follow, in request order
//! - raw sources (env file, env vars, tool table) are never exported implicitly

pub mod shell;

use crate::error::{SettingsError, SettingsResult};
use crate::settings::{DescriptorField, ImageDescriptor, ToolSettings};
use heck::ToShoutySnakeCase;
use regex_lite::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use toml::Value;
use tracing::{debug, warn};

/// Ordered export mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportVars {
    entries: Vec<(String, String)>,
}

impl ExportVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ExportVars {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Render the descriptor's public fields minus `exclude`.
///
/// `git_hash` is omitted when the descriptor has none.
pub fn render(descriptor: &ImageDescriptor, exclude: &HashSet<DescriptorField>) -> ExportVars {
    let mut vars = ExportVars::new();
    for field in DescriptorField::ALL {
        if exclude.contains(&field) {
            continue;
        }
        if let Some(value) = descriptor.value(field) {
            vars.insert(field.export_key(), value);
        }
    }
    vars
}

/// Names a POSIX shell accepts after `export`.
static VAR_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("variable name pattern compiles")
});

/// A tool setting to export under a shell variable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExport {
    setting: String,
    var: String,
}

impl ToolExport {
    /// Rejects an empty setting key or a variable name the shell cannot export.
    pub fn new(setting: impl Into<String>, var: impl Into<String>) -> SettingsResult<Self> {
        let setting = setting.into();
        let var = var.into();
        if setting.is_empty() {
            return Err(SettingsError::invalid_export(var, "setting key is empty"));
        }
        if !VAR_NAME_PATTERN.is_match(&var) {
            return Err(SettingsError::invalid_export(
                var,
                "not a valid shell variable name",
            ));
        }
        Ok(Self { setting, var })
    }

    /// Key inside the tool table, e.g. `jfrog-url`.
    pub fn setting(&self) -> &str {
        &self.setting
    }

    /// Exported variable name, e.g. `JFROG_URL`.
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl FromStr for ToolExport {
    type Err = SettingsError;

    /// `key=VAR`, or just `key` to derive `VAR` in shouty snake case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((setting, var)) => Self::new(setting.trim(), var.trim()),
            None => Self::new(s.trim(), s.trim().to_shouty_snake_case()),
        }
    }
}

fn tool_value(tool: &ToolSettings, export: &ToolExport) -> SettingsResult<String> {
    let field = format!("{}.{}", tool.namespace(), export.setting);
    match tool.get(&export.setting) {
        None => Err(SettingsError::missing_field(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Integer(i)) => Ok(i.to_string()),
        Some(Value::Float(f)) => Ok(f.to_string()),
        Some(Value::Boolean(b)) => Ok(b.to_string()),
        Some(Value::Datetime(d)) => Ok(d.to_string()),
        Some(_) => Err(SettingsError::wrong_type(field, "a scalar value")),
    }
}

/// Renders descriptors and writes CI export scripts.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    ci: bool,
    tool_exports: Vec<ToolExport>,
}

impl Exporter {
    pub fn new(ci: bool) -> Self {
        Self {
            ci,
            tool_exports: Vec::new(),
        }
    }

    /// Exporter whose CI context comes from the descriptor's environment.
    pub fn for_descriptor(descriptor: &ImageDescriptor) -> Self {
        Self::new(descriptor.is_ci())
    }

    /// Also export these tool settings after the descriptor fields.
    pub fn with_tool_exports(mut self, exports: impl IntoIterator<Item = ToolExport>) -> Self {
        self.tool_exports.extend(exports);
        self
    }

    pub fn is_ci(&self) -> bool {
        self.ci
    }

    /// Render descriptor fields and requested tool settings.
    ///
    /// A tool export may not reuse a descriptor variable name, excluded or
    /// not, nor the name of an earlier tool export.
    pub fn render(
        &self,
        descriptor: &ImageDescriptor,
        exclude: &HashSet<DescriptorField>,
    ) -> SettingsResult<ExportVars> {
        let mut vars = render(descriptor, exclude);
        let mut seen = HashSet::new();
        for export in &self.tool_exports {
            if DescriptorField::ALL
                .iter()
                .any(|field| field.export_key() == export.var)
            {
                return Err(SettingsError::invalid_export(
                    &export.var,
                    "collides with a descriptor field",
                ));
            }
            if !seen.insert(export.var.as_str()) {
                return Err(SettingsError::invalid_export(
                    &export.var,
                    "requested more than once",
                ));
            }
            let value = tool_value(descriptor.tool_settings(), export)?;
            vars.insert(export.var.clone(), value);
        }
        Ok(vars)
    }

    /// Write `vars` as a shell script at `path` when running in CI.
    ///
    /// Outside CI nothing is written. The mapping is returned unchanged
    /// either way.
    pub fn export_shell(&self, vars: ExportVars, path: &Path) -> SettingsResult<ExportVars> {
        if !self.ci {
            debug!(path = %path.display(), "Not a CI run, skipping export script");
            return Ok(vars);
        }
        if vars.is_empty() {
            warn!(path = %path.display(), "Writing export script with no variables");
        }
        shell::write_script(&vars, path)?;
        Ok(vars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_vars_preserve_insertion_order() {
        let mut vars = ExportVars::new();
        vars.insert("B", "2");
        vars.insert("A", "1");
        vars.insert("B", "3");
        let keys: Vec<_> = vars.keys().collect();
        assert_eq!(keys, vec!["B", "A"]);
        assert_eq!(vars.get("B"), Some("3"));
    }

    #[test]
    fn test_export_vars_serialize_as_ordered_object() {
        let mut vars = ExportVars::new();
        vars.insert("IMAGE_NAME", "demo");
        vars.insert("IMAGE_VERSION", "1.0.0");
        let json = serde_json::to_string(&vars).unwrap();
        assert_eq!(json, r#"{"IMAGE_NAME":"demo","IMAGE_VERSION":"1.0.0"}"#);
    }

    #[test]
    fn test_tool_export_parse() {
        let export: ToolExport = "jfrog-url".parse().unwrap();
        assert_eq!(export.setting(), "jfrog-url");
        assert_eq!(export.var(), "JFROG_URL");

        let export: ToolExport = "jfrog-user=ARTIFACTORY_USER".parse().unwrap();
        assert_eq!(export.var(), "ARTIFACTORY_USER");

        assert!("=X".parse::<ToolExport>().is_err());
        assert!("key=".parse::<ToolExport>().is_err());
    }

    #[test]
    fn test_tool_export_rejects_non_shell_names() {
        for input in ["url=X;touch /tmp/x;Y", "url=1ST", "url=A-B", "url=$HOME", "2fa-token"] {
            let err = input.parse::<ToolExport>().unwrap_err();
            assert_eq!(err.code(), crate::error::ErrorCode::InvalidExport, "{input}");
        }
        assert!(ToolExport::new("url", "with space").is_err());
        assert!(ToolExport::new("url", "_PRIVATE_1").is_ok());
    }

    #[test]
    fn test_tool_value_scalars() {
        let table: toml::Table = toml::from_str(
            r#"
url = "https://jfrog.example.com"
retries = 3
enabled = true
nested = { a = 1 }
"#,
        )
        .unwrap();
        let tool = ToolSettings::new("tool.project-vars", table);

        assert_eq!(
            tool_value(&tool, &ToolExport::new("url", "U").unwrap()).unwrap(),
            "https://jfrog.example.com"
        );
        assert_eq!(tool_value(&tool, &ToolExport::new("retries", "R").unwrap()).unwrap(), "3");
        assert_eq!(tool_value(&tool, &ToolExport::new("enabled", "E").unwrap()).unwrap(), "true");

        let err = tool_value(&tool, &ToolExport::new("nested", "N").unwrap()).unwrap_err();
        assert_eq!(err.field(), Some("tool.project-vars.nested"));

        let err = tool_value(&tool, &ToolExport::new("jfrog-user", "J").unwrap()).unwrap_err();
        assert_eq!(err.field(), Some("tool.project-vars.jfrog-user"));
    }
}
