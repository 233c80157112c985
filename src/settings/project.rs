//! Project description source.
//!
//! Reads `pyproject.toml` from the bundle root and validates the `[project]`
//! table into a [`ProjectIdentity`]. The tool table is carried as-is.

use crate::config::SourcePaths;
use crate::error::{SettingsError, SettingsResult};
use heck::ToSnakeCase;
use regex_lite::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use toml::{Table, Value};
use tracing::debug;

/// Release segment followed by an optional pre/post/local suffix.
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?\d+(\.\d+)*([-+._]?[0-9A-Za-z]+([-+._][0-9A-Za-z]+)*)?$")
        .expect("version pattern compiles")
});

/// A single `{ name, email }` entry of `project.authors`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    name: String,
    email: String,
}

impl Author {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// The `[project.urls]` set. Every entry is a validated absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectUrls {
    homepage: String,
    repository: String,
    documentation: String,
    bug_tracker: String,
    changelog: String,
    docker: String,
}

impl ProjectUrls {
    pub fn homepage(&self) -> &str {
        &self.homepage
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    pub fn bug_tracker(&self) -> &str {
        &self.bug_tracker
    }

    pub fn changelog(&self) -> &str {
        &self.changelog
    }

    pub fn docker(&self) -> &str {
        &self.docker
    }

    /// Validate a raw urls table.
    ///
    /// Keys are compared in snake case, so `Bug Tracker`, `bug-tracker` and
    /// `bug_tracker` all name the same entry.
    fn from_table(table: &Table) -> SettingsResult<Self> {
        let normalized: BTreeMap<String, &Value> = table
            .iter()
            .map(|(key, value)| (key.to_snake_case(), value))
            .collect();

        let url = |key: &str| -> SettingsResult<String> {
            let field = format!("project.urls.{}", key);
            let value = normalized
                .get(key)
                .ok_or_else(|| SettingsError::missing_field(&field))?;
            let text = value
                .as_str()
                .ok_or_else(|| SettingsError::wrong_type(&field, "a string"))?;
            if text.trim().is_empty() {
                return Err(SettingsError::empty_field(&field));
            }
            url::Url::parse(text).map_err(|e| SettingsError::malformed(&field, e))?;
            Ok(text.to_string())
        };

        Ok(Self {
            homepage: url("homepage")?,
            repository: url("repository")?,
            documentation: url("documentation")?,
            bug_tracker: url("bug_tracker")?,
            changelog: url("changelog")?,
            docker: url("docker")?,
        })
    }
}

/// Validated identity of the project, built from the `[project]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdentity {
    name: String,
    version: String,
    description: String,
    authors: Vec<Author>,
    license: String,
    urls: ProjectUrls,
}

impl ProjectIdentity {
    /// Validate a raw `[project]` table.
    ///
    /// Fields are checked in declaration order and the first failure is
    /// returned, naming the dotted key.
    pub fn from_table(project: &Table) -> SettingsResult<Self> {
        let name = require_str(project, "name")?;
        if name.trim().is_empty() {
            return Err(SettingsError::empty_field("project.name"));
        }

        let version = require_str(project, "version")?;
        if version.trim().is_empty() {
            return Err(SettingsError::empty_field("project.version"));
        }
        if !VERSION_PATTERN.is_match(version) {
            return Err(SettingsError::malformed(
                "project.version",
                format!("'{}' is not a release version", version),
            ));
        }

        let description = require_str(project, "description")?;
        let authors = parse_authors(project)?;
        let license = parse_license(project)?;

        let urls = match project.get("urls") {
            None => return Err(SettingsError::missing_field("project.urls")),
            Some(Value::Table(table)) => ProjectUrls::from_table(table)?,
            Some(_) => return Err(SettingsError::wrong_type("project.urls", "a table")),
        };

        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            description: description.to_string(),
            authors,
            license,
            urls,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    pub fn license(&self) -> &str {
        &self.license
    }

    pub fn urls(&self) -> &ProjectUrls {
        &self.urls
    }

    /// Authors as `Name <email>` joined by `", "`, in declaration order.
    pub fn authors_display(&self) -> String {
        self.authors
            .iter()
            .map(Author::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn require_str<'a>(project: &'a Table, key: &str) -> SettingsResult<&'a str> {
    let field = format!("project.{}", key);
    match project.get(key) {
        None => Err(SettingsError::missing_field(field)),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(SettingsError::wrong_type(field, "a string")),
    }
}

fn parse_authors(project: &Table) -> SettingsResult<Vec<Author>> {
    let entries = match project.get("authors") {
        None => return Err(SettingsError::missing_field("project.authors")),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(SettingsError::wrong_type("project.authors", "an array")),
    };
    if entries.is_empty() {
        return Err(SettingsError::empty_field("project.authors"));
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let prefix = format!("project.authors[{}]", i);
            let table = entry
                .as_table()
                .ok_or_else(|| SettingsError::wrong_type(&prefix, "a table"))?;
            let part = |key: &str| -> SettingsResult<String> {
                let field = format!("{}.{}", prefix, key);
                let value = table
                    .get(key)
                    .ok_or_else(|| SettingsError::missing_field(&field))?
                    .as_str()
                    .ok_or_else(|| SettingsError::wrong_type(&field, "a string"))?;
                if value.trim().is_empty() {
                    return Err(SettingsError::empty_field(&field));
                }
                Ok(value.to_string())
            };
            Ok(Author {
                name: part("name")?,
                email: part("email")?,
            })
        })
        .collect()
}

/// `license` may be `{ text = "..." }` or a bare SPDX expression.
fn parse_license(project: &Table) -> SettingsResult<String> {
    let text = match project.get("license") {
        None => return Err(SettingsError::missing_field("project.license.text")),
        Some(Value::String(expr)) => expr.as_str(),
        Some(Value::Table(table)) => match table.get("text") {
            None => return Err(SettingsError::missing_field("project.license.text")),
            Some(Value::String(text)) => text.as_str(),
            Some(_) => {
                return Err(SettingsError::wrong_type("project.license.text", "a string"));
            }
        },
        Some(_) => {
            return Err(SettingsError::wrong_type(
                "project.license",
                "a string or a table",
            ));
        }
    };
    if text.trim().is_empty() {
        return Err(SettingsError::empty_field("project.license.text"));
    }
    Ok(text.to_string())
}

/// Open-ended tool table. Keys are owned by downstream tooling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolSettings {
    namespace: String,
    values: Table,
}

impl ToolSettings {
    pub fn new(namespace: impl Into<String>, values: Table) -> Self {
        Self {
            namespace: namespace.into(),
            values,
        }
    }

    /// Look up the table at `path` inside a parsed document.
    ///
    /// A missing table yields empty settings; an empty path or a non-table
    /// value at the path is rejected.
    pub fn from_document(document: &Table, path: &[String]) -> SettingsResult<Self> {
        if path.is_empty() {
            return Err(SettingsError::empty_field("tool table path"));
        }
        let namespace = path.join(".");
        let mut current = document;
        for (depth, segment) in path.iter().enumerate() {
            match current.get(segment) {
                None => return Ok(Self::new(namespace, Table::new())),
                Some(Value::Table(next)) => current = next,
                Some(_) => {
                    let field = path[..=depth].join(".");
                    return Err(SettingsError::wrong_type(field, "a table"));
                }
            }
        }
        Ok(Self::new(namespace, current.clone()))
    }

    /// Dotted table path these settings were read from.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Reads the project description file.
#[derive(Debug, Clone)]
pub struct SourceReader {
    path: PathBuf,
    tool_table: Vec<String>,
}

impl SourceReader {
    pub fn new(paths: &SourcePaths) -> Self {
        Self {
            path: paths.project_file_path(),
            tool_table: paths.tool_table.clone(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the project identity and tool settings.
    pub fn read(&self) -> SettingsResult<(ProjectIdentity, ToolSettings)> {
        let document = self.load_document()?;
        let tool = ToolSettings::from_document(&document, &self.tool_table)?;

        let empty = Table::new();
        let project = match document.get("project") {
            None => &empty,
            Some(Value::Table(table)) => table,
            Some(_) => return Err(SettingsError::wrong_type("project", "a table")),
        };
        let identity = ProjectIdentity::from_table(project)?;

        debug!(
            project = %identity.name(),
            tool_table = %tool.namespace(),
            tool_keys = tool.len(),
            "Read project description"
        );
        Ok((identity, tool))
    }

    /// Parse the raw document. A missing file reads as an empty document.
    pub fn load_document(&self) -> SettingsResult<Table> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| SettingsError::parse(&self.path, e))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Project file not found, using empty document");
                Ok(Table::new())
            }
            Err(e) => Err(SettingsError::io(&self.path, e)),
        }
    }
}
