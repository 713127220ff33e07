//! Audit snapshot of the registry for display and operator tooling.

use serde::Serialize;
use sieve_core::error::{Result, SieveError};
use sieve_core::IncludeExclude;

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub generation: u64,
    pub filters: Vec<FilterAudit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterAudit {
    pub id: String,
    pub include_strategy: &'static str,
    pub exclude_strategy: &'static str,
    /// Sorted.
    pub included: Vec<String>,
    /// Sorted.
    pub excluded: Vec<String>,
}

impl FilterAudit {
    pub fn from_policy(id: &str, policy: &IncludeExclude<String>) -> Self {
        let mut included: Vec<String> = policy.included().into_iter().collect();
        let mut excluded: Vec<String> = policy.excluded().into_iter().collect();
        included.sort();
        excluded.sort();

        Self {
            id: id.to_string(),
            include_strategy: policy.included_strategy(),
            exclude_strategy: policy.excluded_strategy(),
            included,
            excluded,
        }
    }
}

impl AuditReport {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SieveError::Internal(format!("audit render failed: {e}")))
    }
}
