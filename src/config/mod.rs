//! Source configuration.
//!
//! Resolves where each settings source lives. Every location has a
//! built-in default, an environment override, and a CLI override (highest).
//!
//! ## Environment Variables
//! - `PROJECT_VARS_BUNDLE_DIR` - Bundled resource directory (selects packaged mode)
//! - `PROJECT_VARS_ENV_FILE` - Override file (default: `./.env`)
//! - `PROJECT_VARS_TOOL_TABLE` - Dotted tool table path (default: `tool.project-vars`)
//! - `PY_PKG_YEAR` - Set by documentation builds; root is two levels up

mod paths;

pub use paths::*;
