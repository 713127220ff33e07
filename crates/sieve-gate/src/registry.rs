//! Shared filter registry.
//!
//! Construct once at startup from config, then clone the handle into every
//! request path. The filter map is an immutable snapshot; `reload` compiles a
//! complete replacement and swaps it in one step, so concurrent reloads
//! never merge and readers see either the old map or the new one. A reload
//! that fails to compile leaves the registry untouched.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use sieve_core::error::{Result, SieveError};
use sieve_core::{Decision, IncludeExclude};

use crate::audit::{AuditReport, FilterAudit};
use crate::config::SieveConfig;
use crate::filter::compile_filter;

pub type Filter = Arc<IncludeExclude<String>>;

#[derive(Clone, Default)]
pub struct FilterRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    current: RwLock<Arc<Snapshot>>,
}

#[derive(Default)]
struct Snapshot {
    generation: u64,
    filters: HashMap<String, Filter>,
}

impl FilterRegistry {
    /// Build the registry. Returns Result so callers can fail startup cleanly.
    pub fn from_config(cfg: &SieveConfig) -> Result<Self> {
        let reg = Self::default();
        reg.reload(cfg)?;
        Ok(reg)
    }

    /// Compile every filter, then replace the whole map. Filters absent from
    /// `cfg` are gone once this returns.
    pub fn reload(&self, cfg: &SieveConfig) -> Result<()> {
        cfg.validate()?;

        let mut filters: HashMap<String, Filter> = HashMap::with_capacity(cfg.filters.len());
        for f in &cfg.filters {
            filters.insert(f.id.clone(), Arc::new(compile_filter(f)?));
        }
        let count = filters.len();

        // Poisoning only means another writer panicked mid-swap; the stored
        // Arc is always a complete snapshot, so keep going.
        let mut current = self
            .inner
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let generation = current.generation + 1;
        *current = Arc::new(Snapshot { generation, filters });
        drop(current);

        tracing::info!(filters = count, generation, "filter registry loaded");
        Ok(())
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        let current = self
            .inner
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&current)
    }

    /// Per-request decision for `candidate` against filter `filter_id`.
    pub fn admit(&self, filter_id: &str, candidate: &str) -> Result<Decision> {
        let filter = self
            .filter(filter_id)
            .ok_or_else(|| SieveError::UnknownFilter(filter_id.to_string()))?;

        let decision = filter.decide(&candidate.to_string());
        if !decision.is_allowed() {
            tracing::debug!(filter = %filter_id, %candidate, "candidate denied");
        }
        Ok(decision)
    }

    pub fn filter(&self, filter_id: &str) -> Option<Filter> {
        self.snapshot().filters.get(filter_id).cloned()
    }

    pub fn filter_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.snapshot().filters.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of successful loads (initial build counts as 1).
    pub fn generation(&self) -> u64 {
        self.snapshot().generation
    }

    /// Point-in-time view of every filter for display/audit.
    pub fn audit(&self) -> AuditReport {
        let snap = self.snapshot();
        let mut filters: Vec<FilterAudit> = snap
            .filters
            .iter()
            .map(|(id, policy)| FilterAudit::from_policy(id, policy))
            .collect();
        filters.sort_by(|a, b| a.id.cmp(&b.id));

        AuditReport {
            generation: snap.generation,
            filters,
        }
    }
}
