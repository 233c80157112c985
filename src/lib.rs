//! Project Vars Library
//!
//! Aggregates project metadata from `pyproject.toml`, a local `.env` file and
//! the process environment into a read-only image descriptor for build and
//! CI tooling.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod logging;
pub mod settings;
