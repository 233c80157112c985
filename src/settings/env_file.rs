//! Local developer override file (`.env`).

use crate::error::{SettingsError, SettingsResult};
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Values read from the override file. Every value is treated as a secret.
#[derive(Debug, Default)]
pub struct EnvFileOverrides {
    values: BTreeMap<String, SecretString>,
}

impl EnvFileOverrides {
    /// Build from raw pairs. Later duplicates replace earlier ones.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), SecretString::from(v.into())))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&SecretString> {
        self.values.get(key)
    }

    /// Expose a value. Callers must not log the result.
    pub fn expose(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.expose_secret())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Reads `KEY=VALUE` lines from the override file.
#[derive(Debug, Clone)]
pub struct EnvFileReader {
    path: PathBuf,
}

impl EnvFileReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file. A missing file yields an empty mapping.
    pub fn read(&self) -> SettingsResult<EnvFileOverrides> {
        let iter = match dotenvy::from_path_iter(&self.path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No override file");
                return Ok(EnvFileOverrides::default());
            }
            Err(dotenvy::Error::Io(e)) => return Err(SettingsError::io(&self.path, e)),
            Err(e) => return Err(SettingsError::parse(&self.path, e)),
        };

        let mut pairs = Vec::new();
        for item in iter {
            let pair = item.map_err(|e| SettingsError::parse(&self.path, e))?;
            pairs.push(pair);
        }

        let overrides = EnvFileOverrides::from_pairs(pairs);
        // Key names only; values stay redacted.
        debug!(
            path = %self.path.display(),
            keys = ?overrides.keys().collect::<Vec<_>>(),
            "Read override file"
        );
        Ok(overrides)
    }
}
