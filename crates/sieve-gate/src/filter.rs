//! Compile filter config into runtime policies.

use std::collections::HashSet;

use sieve_core::error::{Result, SieveError};
use sieve_core::IncludeExclude;

use crate::config::FilterConfig;

/// Build an `IncludeExclude` from one filter section.
///
/// Strategy and pattern errors are reported with the filter id attached.
pub fn compile_filter(cfg: &FilterConfig) -> Result<IncludeExclude<String>> {
    let wrap = |side: &str, e: SieveError| {
        SieveError::BadConfig(format!("filter {} {side}: {e}", cfg.id))
    };

    let inc_strategy = cfg.include.strategy().map_err(|e| wrap("include", e))?;
    let exc_strategy = cfg.exclude.strategy().map_err(|e| wrap("exclude", e))?;

    let policy = IncludeExclude::from_strategies(inc_strategy, exc_strategy);
    policy
        .include_all(cfg.include.entries.iter().cloned())
        .map_err(|e| wrap("include", e))?;
    policy
        .exclude_all(cfg.exclude.entries.iter().cloned())
        .map_err(|e| wrap("exclude", e))?;

    let inc: HashSet<&String> = cfg.include.entries.iter().collect();
    for shadowed in cfg.exclude.entries.iter().filter(|e| inc.contains(e)) {
        tracing::warn!(filter=%cfg.id, entry=%shadowed, "entry is both included and excluded; exclusion wins");
    }

    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SideConfig;

    fn side(strategy: Option<&str>, entries: &[&str]) -> SideConfig {
        SideConfig {
            strategy: strategy.map(str::to_string),
            entries: entries.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn compiles_mixed_strategies() {
        let cfg = FilterConfig {
            id: "paths".into(),
            include: side(Some("servlet_path"), &["/api/*"]),
            exclude: side(None, &["/api/admin"]),
        };
        let p = compile_filter(&cfg).expect("filter must compile");
        assert_eq!(p.included_strategy(), "servlet_path");
        assert_eq!(p.excluded_strategy(), "exact");
        assert!(p.is_included(&"/api/users".to_string()));
        assert!(!p.is_included(&"/api/admin".to_string()));
    }

    #[test]
    fn unknown_strategy_names_filter() {
        let cfg = FilterConfig {
            id: "hosts".into(),
            include: side(Some("regex"), &["a.*"]),
            exclude: SideConfig::default(),
        };
        let msg = compile_filter(&cfg).err().map(|e| e.to_string()).unwrap_or_default();
        assert!(msg.contains("filter hosts include"), "{msg}");
        assert!(msg.contains("unsupported matcher strategy"), "{msg}");
    }

    #[test]
    fn bad_pattern_is_reported_at_compile_time() {
        let cfg = FilterConfig {
            id: "paths".into(),
            include: SideConfig::default(),
            exclude: side(Some("glob"), &["/ok/*", "/broken[", "/never"]),
        };
        let err = compile_filter(&cfg).err();
        assert!(matches!(err, Some(SieveError::BadConfig(ref m)) if m.contains("/broken[")));
    }
}
