//! Include/exclude decision policy.
//!
//! `is_included(e) = (included.is_empty() || included.contains(e)) && !excluded.contains(e)`
//!
//! - Empty include side means "no allowlist": everything passes unless excluded.
//! - A non-empty include side is a strict allowlist.
//! - Exclusion always wins, even over an explicit include.
//!
//! Both sides are concurrent stores, so a policy is shared as
//! `Arc<IncludeExclude<E>>` and mutated through `&self`. The two sides are
//! independent: a reader racing an `include` and an `exclude` may observe
//! either one applied first.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use crate::error::{Result, SieveError};
use crate::matcher::{ExactMatcher, Matcher, MatcherFactory, Strategy};

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

pub struct IncludeExclude<E> {
    included: Box<dyn Matcher<E>>,
    excluded: Box<dyn Matcher<E>>,
}

impl<E> IncludeExclude<E>
where
    E: Eq + Hash + Clone + Send + Sync + 'static,
{
    /// Exact (hashed) matching on both sides.
    pub fn new() -> Self {
        Self {
            included: Box::new(ExactMatcher::new()),
            excluded: Box::new(ExactMatcher::new()),
        }
    }

    /// Same strategy on both sides; the factory is invoked once per side and
    /// must hand back empty matchers.
    pub fn with_factory<F>(factory: F) -> Result<Self>
    where
        F: MatcherFactory<E>,
    {
        let included = build_side(&factory, "included")?;
        let excluded = build_side(&factory, "excluded")?;
        Ok(Self { included, excluded })
    }

    /// Independently supplied stores, e.g. pattern includes with exact excludes.
    pub fn with_matchers<I, X>(included: I, excluded: X) -> Self
    where
        I: Matcher<E> + 'static,
        X: Matcher<E> + 'static,
    {
        Self {
            included: Box::new(included),
            excluded: Box::new(excluded),
        }
    }

    pub fn include(&self, element: E) -> Result<()> {
        self.included.add(element)
    }

    pub fn include_all<I>(&self, elements: I) -> Result<()>
    where
        I: IntoIterator<Item = E>,
    {
        self.included.add_all(elements.into_iter().collect())
    }

    pub fn exclude(&self, element: E) -> Result<()> {
        self.excluded.add(element)
    }

    pub fn exclude_all<I>(&self, elements: I) -> Result<()>
    where
        I: IntoIterator<Item = E>,
    {
        self.excluded.add_all(elements.into_iter().collect())
    }

    /// The decision predicate. Total; never blocks on writers for longer
    /// than a shard lock.
    pub fn is_included(&self, element: &E) -> bool {
        if !self.included.is_empty() && !self.included.contains(element) {
            return false;
        }
        !self.excluded.contains(element)
    }

    pub fn decide(&self, element: &E) -> Decision {
        Decision::from(self.is_included(element))
    }

    /// Snapshot of the include side.
    pub fn included(&self) -> HashSet<E> {
        self.included.snapshot()
    }

    /// Snapshot of the exclude side.
    pub fn excluded(&self) -> HashSet<E> {
        self.excluded.snapshot()
    }

    /// True when no filters are configured (everything passes).
    pub fn is_empty(&self) -> bool {
        self.included.is_empty() && self.excluded.is_empty()
    }

    pub fn clear(&self) {
        let (included, excluded) = (self.included.len(), self.excluded.len());
        self.included.clear();
        self.excluded.clear();
        tracing::trace!(included, excluded, "include/exclude policy cleared");
    }

    pub fn included_strategy(&self) -> &'static str {
        self.included.strategy()
    }

    pub fn excluded_strategy(&self) -> &'static str {
        self.excluded.strategy()
    }
}

impl<E> IncludeExclude<E>
where
    E: AsRef<str> + Eq + Hash + Clone + Send + Sync + 'static,
{
    /// String elements with a declarative strategy on both sides.
    pub fn from_strategy(strategy: Strategy) -> Self {
        Self::from_strategies(strategy, strategy)
    }

    /// String elements with independent strategies per side.
    pub fn from_strategies(included: Strategy, excluded: Strategy) -> Self {
        Self {
            included: included.matcher(),
            excluded: excluded.matcher(),
        }
    }
}

impl<E> Default for IncludeExclude<E>
where
    E: Eq + Hash + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for IncludeExclude<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncludeExclude")
            .field(
                "included",
                &format_args!("{}[{}]", self.included.strategy(), self.included.len()),
            )
            .field(
                "excluded",
                &format_args!("{}[{}]", self.excluded.strategy(), self.excluded.len()),
            )
            .finish()
    }
}

fn build_side<E, F>(factory: &F, side: &str) -> Result<Box<dyn Matcher<E>>>
where
    F: MatcherFactory<E>,
{
    let matcher = factory.create().map_err(|e| match e {
        SieveError::Configuration(_) => e,
        other => SieveError::Configuration(format!("{side} matcher factory failed: {other}")),
    })?;

    if !matcher.is_empty() {
        return Err(SieveError::Configuration(format!(
            "{side} matcher factory returned a non-empty {} store ({} entries)",
            matcher.strategy(),
            matcher.len()
        )));
    }
    Ok(matcher)
}
