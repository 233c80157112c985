//! Integration tests for settings aggregation.
//!
//! Drives `Sources::gather_with_env` against project directories in temp dirs:
//! - project file validation and missing keys
//! - CI / commit hash gate
//! - optional override file
//! - pass-through of unrecognized keys

use project_vars::config::SourcePaths;
use project_vars::error::{ErrorCode, SettingsError};
use project_vars::export::render;
use project_vars::settings::{DescriptorField, EnvVars, ImageDescriptor, Sources};
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

/// Project file with one author and the full URL set.
fn demo_pyproject() -> &'static str {
    r#"
[project]
name = "demo"
version = "1.0.0"
description = "Demo package"
authors = [{ name = "Ada Lovelace", email = "ada@example.com" }]
license = { text = "MIT" }

[project.urls]
homepage = "https://example.com/demo"
repository = "https://git.example.com/demo"
documentation = "https://docs.example.com/demo"
"Bug Tracker" = "https://git.example.com/demo/issues"
changelog = "https://git.example.com/demo/CHANGELOG.md"
docker = "https://registry.example.com/demo"

[tool.project-vars]
jfrog-url = "https://jfrog.example.com"
jfrog-user = "ci-bot"
"#
}

/// Helper to create a project directory holding `pyproject`.
fn project_dir(pyproject: &str) -> (TempDir, Sources) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp.path().join("pyproject.toml"), pyproject).unwrap();
    let sources = Sources::new(SourcePaths::with_root(temp.path()));
    (temp, sources)
}

fn no_env() -> EnvVars {
    EnvVars::default()
}

fn all_but_timestamp() -> HashSet<DescriptorField> {
    HashSet::from([DescriptorField::Timestamp])
}

fn gather(sources: &Sources, env: EnvVars) -> ImageDescriptor {
    sources.gather_with_env(env).expect("Failed to gather settings")
}

#[test]
fn test_scenario_a_local_build() {
    let (_temp, sources) = project_dir(demo_pyproject());

    let descriptor = gather(&sources, no_env());

    assert_eq!(descriptor.name(), "demo");
    assert_eq!(descriptor.version(), "1.0.0");
    assert_eq!(descriptor.git_hash(), None);
    assert_eq!(descriptor.authors(), "Ada Lovelace <ada@example.com>");
    assert_eq!(descriptor.license(), "MIT");
    assert!(!descriptor.is_ci());
    assert!(descriptor.env_file().is_empty());
}

#[test]
fn test_scenario_b_ci_with_commit() {
    let (_temp, sources) = project_dir(demo_pyproject());

    let descriptor = gather(
        &sources,
        EnvVars::from_vars([("CI", "1"), ("GIT_COMMIT", "abc123")]),
    );

    assert!(descriptor.is_ci());
    assert_eq!(descriptor.git_hash(), Some("abc123"));
}

#[test]
fn test_scenario_c_ci_without_commit() {
    let (_temp, sources) = project_dir(demo_pyproject());

    let err = sources
        .gather_with_env(EnvVars::from_vars([("CI", "1")]))
        .unwrap_err();

    assert!(matches!(err, SettingsError::MissingProvenance));
    assert_eq!(err.code(), ErrorCode::MissingProvenance);
}

#[test]
fn test_scenario_d_missing_repository_url() {
    let pyproject = demo_pyproject().replace("repository = \"https://git.example.com/demo\"\n", "");
    let (_temp, sources) = project_dir(&pyproject);

    let err = sources.gather_with_env(no_env()).unwrap_err();

    assert_eq!(err.code(), ErrorCode::MissingRequiredField);
    assert_eq!(err.field(), Some("project.urls.repository"));
    assert!(err.to_string().contains("project.urls.repository"));
}

#[test]
fn test_missing_project_file_fails_on_first_required_field() {
    let temp = TempDir::new().unwrap();
    let sources = Sources::new(SourcePaths::with_root(temp.path()));

    let err = sources.gather_with_env(no_env()).unwrap_err();

    assert_eq!(err.field(), Some("project.name"));
}

#[test]
fn test_authors_preserve_declaration_order() {
    let pyproject = demo_pyproject().replace(
        r#"authors = [{ name = "Ada Lovelace", email = "ada@example.com" }]"#,
        r#"authors = [
    { name = "Zed", email = "zed@example.com" },
    { name = "Ada Lovelace", email = "ada@example.com" },
    { name = "Mia", email = "mia@example.com" },
]"#,
    );
    let (_temp, sources) = project_dir(&pyproject);

    let descriptor = gather(&sources, no_env());

    assert_eq!(
        descriptor.authors(),
        "Zed <zed@example.com>, Ada Lovelace <ada@example.com>, Mia <mia@example.com>"
    );
}

#[test]
fn test_two_builds_differ_only_in_timestamp() {
    let (_temp, sources) = project_dir(demo_pyproject());
    let env = EnvVars::from_vars([("GIT_COMMIT", "abc123")]);

    let first = gather(&sources, env.clone());
    std::thread::sleep(std::time::Duration::from_millis(2));
    let second = gather(&sources, env);

    assert_ne!(first.timestamp(), second.timestamp());
    assert_eq!(
        render(&first, &all_but_timestamp()),
        render(&second, &all_but_timestamp())
    );
}

#[test]
fn test_timestamp_is_utc_iso8601() {
    let (_temp, sources) = project_dir(demo_pyproject());

    let descriptor = gather(&sources, no_env());

    let parsed = chrono::DateTime::parse_from_rfc3339(descriptor.timestamp()).unwrap();
    assert_eq!(parsed.offset().local_minus_utc(), 0);
    assert!(descriptor.timestamp().ends_with("+00:00"));
}

#[test]
fn test_env_file_is_read_but_not_exported() {
    let (temp, sources) = project_dir(demo_pyproject());
    fs::write(temp.path().join(".env"), "JFROG_TOKEN=s3cr3t\n").unwrap();

    let descriptor = gather(&sources, no_env());

    assert_eq!(descriptor.env_file().expose("JFROG_TOKEN"), Some("s3cr3t"));
    let vars = render(&descriptor, &HashSet::new());
    assert!(!vars.contains_key("JFROG_TOKEN"));
    assert!(vars.iter().all(|(_, v)| v != "s3cr3t"));
}

#[test]
fn test_passthrough_env_vars_reachable_not_rendered() {
    let (_temp, sources) = project_dir(demo_pyproject());

    let descriptor = gather(
        &sources,
        EnvVars::from_vars([("BUILD_NUMBER", "42"), ("GIT_COMMIT", "abc123")]),
    );

    assert_eq!(descriptor.env_vars().get("BUILD_NUMBER"), Some("42"));
    let vars = render(&descriptor, &HashSet::new());
    assert!(!vars.contains_key("BUILD_NUMBER"));
    assert_eq!(vars.len(), DescriptorField::ALL.len());
}

#[test]
fn test_tool_settings_reachable() {
    let (_temp, sources) = project_dir(demo_pyproject());

    let descriptor = gather(&sources, no_env());

    let tool = descriptor.tool_settings();
    assert_eq!(tool.namespace(), "tool.project-vars");
    assert_eq!(tool.get_str("jfrog-user"), Some("ci-bot"));
}

#[test]
fn test_alternate_tool_table() {
    let pyproject = format!(
        "{}\n[datalogic-vars]\njfrog-url = \"https://other.example.com\"\n",
        demo_pyproject()
    );
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("pyproject.toml"), pyproject).unwrap();
    let sources =
        Sources::new(SourcePaths::with_root(temp.path()).with_tool_table("datalogic-vars"));

    let descriptor = gather(&sources, no_env());

    assert_eq!(
        descriptor.tool_settings().get_str("jfrog-url"),
        Some("https://other.example.com")
    );
}

#[test]
fn test_env_file_outside_project_dir() {
    let (_temp, sources) = project_dir(demo_pyproject());
    let other = TempDir::new().unwrap();
    let env_path = other.path().join("local.env");
    fs::write(&env_path, "REGISTRY_USER=dev\n").unwrap();
    let sources = Sources::new(sources.paths().clone().with_env_file(&env_path));

    let descriptor = gather(&sources, no_env());

    assert_eq!(descriptor.env_file().expose("REGISTRY_USER"), Some("dev"));
}
