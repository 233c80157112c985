//! Process environment snapshot.
//!
//! Entries whose name or value is not valid UTF-8 are skipped and their
//! names logged at debug level; every other entry is kept verbatim.

use std::collections::BTreeMap;
use std::ffi::OsString;
use tracing::debug;

/// Environment variable flagging a CI run.
pub const CI_VAR: &str = "CI";

/// Environment variable carrying the commit hash.
pub const GIT_COMMIT_VAR: &str = "GIT_COMMIT";

/// Snapshot of the environment with `ci` and `git_commit` recognized.
///
/// Recognized keys match case-insensitively. Every other key is kept under
/// its original name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    ci: Option<String>,
    git_commit: Option<String>,
    extra: BTreeMap<String, String>,
}

impl EnvVars {
    /// Build from arbitrary `(name, value)` pairs.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut env = Self::default();
        for (key, value) in vars {
            let key = key.into();
            let value = value.into();
            if key.eq_ignore_ascii_case(CI_VAR) {
                env.ci = Some(value);
            } else if key.eq_ignore_ascii_case(GIT_COMMIT_VAR) {
                env.git_commit = Some(value);
            } else {
                env.extra.insert(key, value);
            }
        }
        env
    }

    /// Build from OS strings, skipping entries that are not valid UTF-8.
    pub fn from_os_vars(vars: impl IntoIterator<Item = (OsString, OsString)>) -> Self {
        Self::from_vars(vars.into_iter().filter_map(|(key, value)| {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (Ok(key), Err(_)) => {
                    debug!(name = %key, "Skipping variable with non-UTF-8 value");
                    None
                }
                (Err(key), _) => {
                    debug!(name = %key.to_string_lossy(), "Skipping variable with non-UTF-8 name");
                    None
                }
            }
        }))
    }

    /// Raw `CI` value, if set.
    pub fn ci(&self) -> Option<&str> {
        self.ci.as_deref()
    }

    /// Whether CI mode is active.
    ///
    /// Set, non-empty and not one of `0`, `false`, `no`, `off`.
    pub fn is_ci(&self) -> bool {
        match self.ci.as_deref().map(str::trim) {
            None | Some("") => false,
            Some(v) => !["0", "false", "no", "off"]
                .iter()
                .any(|falsy| v.eq_ignore_ascii_case(falsy)),
        }
    }

    /// Commit hash, if set and non-empty.
    pub fn git_commit(&self) -> Option<&str> {
        self.git_commit
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Pass-through lookup of any unrecognized variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }

    /// Unrecognized variables, by original name.
    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }
}

/// Snapshots the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvVarReader;

impl EnvVarReader {
    pub fn new() -> Self {
        Self
    }

    /// Capture the environment at call time.
    pub fn read(&self) -> EnvVars {
        let env = EnvVars::from_os_vars(std::env::vars_os());
        debug!(
            ci = env.is_ci(),
            git_commit = env.git_commit().is_some(),
            passthrough = env.extra.len(),
            "Captured environment"
        );
        env
    }
}
