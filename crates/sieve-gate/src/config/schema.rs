use std::collections::HashSet;

use serde::Deserialize;
use sieve_core::error::{Result, SieveError};
use sieve_core::Strategy;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SieveConfig {
    pub version: u32,

    #[serde(default)]
    pub filters: Vec<FilterConfig>,
}

impl SieveConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(SieveError::UnsupportedVersion);
        }
        if self.filters.is_empty() {
            return Err(SieveError::BadConfig("filters must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for f in &self.filters {
            if f.id.trim().is_empty() {
                return Err(SieveError::BadConfig("filter id must not be empty".into()));
            }
            if !seen.insert(f.id.as_str()) {
                return Err(SieveError::BadConfig(format!("duplicate filter id: {}", f.id)));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    pub id: String,

    #[serde(default)]
    pub include: SideConfig,

    #[serde(default)]
    pub exclude: SideConfig,
}

/// One side (include or exclude) of a filter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideConfig {
    /// `exact` (default), `prefix`, `suffix`, `glob`, `servlet_path`.
    #[serde(default)]
    pub strategy: Option<String>,

    #[serde(default)]
    pub entries: Vec<String>,
}

impl SideConfig {
    /// Resolve the declared strategy; unknown names are a configuration error.
    pub fn strategy(&self) -> Result<Strategy> {
        match self.strategy.as_deref() {
            None => Ok(Strategy::default()),
            Some(name) => name.parse(),
        }
    }
}
