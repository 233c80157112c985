//! Structured error types for settings aggregation.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    MissingRequiredField,
    MissingProvenance,
    InvalidExport,

    // Source errors
    ParseError,
    IoError,
}

/// Why a required field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    /// Key not present at all.
    Absent,
    /// Present but empty (or an empty array where one entry is required).
    Empty,
    /// Present with the wrong TOML type.
    WrongType { expected: &'static str },
    /// Present but failed a format check (URL, version).
    Malformed(String),
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Absent => write!(f, "is required"),
            FieldProblem::Empty => write!(f, "must not be empty"),
            FieldProblem::WrongType { expected } => write!(f, "must be {}", expected),
            FieldProblem::Malformed(reason) => write!(f, "is malformed: {}", reason),
        }
    }
}

/// Errors raised while reading sources or building the descriptor.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A mandatory project attribute is absent or malformed.
    #[error("{field} {problem}")]
    MissingRequiredField { field: String, problem: FieldProblem },

    /// CI mode is active but no commit hash was supplied.
    #[error(
        "GIT_COMMIT not present in pipeline while CI is set; \
         make sure the pipeline checks out the repository"
    )]
    MissingProvenance,

    /// A requested export cannot be written as a shell variable.
    #[error("invalid export '{name}': {reason}")]
    InvalidExport { name: String, reason: String },

    /// A source file exists but could not be parsed.
    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// A file could not be read or written.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SettingsError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SettingsError::MissingRequiredField { .. } => ErrorCode::MissingRequiredField,
            SettingsError::MissingProvenance => ErrorCode::MissingProvenance,
            SettingsError::InvalidExport { .. } => ErrorCode::InvalidExport,
            SettingsError::Parse { .. } => ErrorCode::ParseError,
            SettingsError::Io { .. } => ErrorCode::IoError,
        }
    }

    /// Dotted key of the offending field, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            SettingsError::MissingRequiredField { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }

    // Convenience constructors

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
            problem: FieldProblem::Absent,
        }
    }

    pub fn empty_field(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
            problem: FieldProblem::Empty,
        }
    }

    pub fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
            problem: FieldProblem::WrongType { expected },
        }
    }

    pub fn malformed(field: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
            problem: FieldProblem::Malformed(reason.to_string()),
        }
    }

    pub fn invalid_export(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidExport {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        Self::Parse {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for settings operations.
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;
