//! Filter config: YAML document -> validated `SieveConfig`.
//!
//! Unknown keys are rejected at every level, so a misspelled `entries` or
//! `strategy` fails the load instead of silently producing an open filter.

pub mod schema;

use std::fs;
use std::path::Path;

use sieve_core::error::{Result, SieveError};

pub use schema::{FilterConfig, SideConfig, SieveConfig};

/// Read and validate a filter config file.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<SieveConfig> {
    let path = path.as_ref();
    let yaml = fs::read_to_string(path).map_err(|e| {
        SieveError::Internal(format!("cannot read filter config {}: {e}", path.display()))
    })?;
    load_from_str(&yaml)
}

/// Parse and validate an in-memory filter config.
pub fn load_from_str(yaml: &str) -> Result<SieveConfig> {
    let cfg = serde_yaml::from_str::<SieveConfig>(yaml)
        .map_err(|e| SieveError::BadConfig(format!("filter config is not valid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
