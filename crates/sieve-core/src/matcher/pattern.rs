//! Pattern-membership store.
//!
//! Patterns are compiled once on `add`; a malformed pattern is rejected there
//! and never reaches the store. `contains` scans compiled patterns until the
//! first match.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use super::Matcher;
use crate::error::Result;

/// Match semantics for a pattern store, fixed at construction.
pub trait PatternSyntax<E>: Send + Sync {
    /// Validated, pre-parsed form of a pattern.
    type Compiled: Send + Sync;

    /// Validate and pre-parse. Errors must be `SieveError::InvalidPattern`.
    fn compile(&self, pattern: &E) -> Result<Self::Compiled>;

    fn matches(&self, compiled: &Self::Compiled, candidate: &E) -> bool;

    fn name(&self) -> &'static str {
        "custom"
    }
}

/// Adapts a plain `Fn(pattern, candidate) -> bool` into a [`PatternSyntax`].
/// Every pattern is accepted.
#[derive(Clone)]
pub struct MatchFn<F>(pub F);

impl<F> fmt::Debug for MatchFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MatchFn(..)")
    }
}

impl<E, F> PatternSyntax<E> for MatchFn<F>
where
    E: Clone + Send + Sync,
    F: Fn(&E, &E) -> bool + Send + Sync,
{
    type Compiled = E;

    fn compile(&self, pattern: &E) -> Result<E> {
        Ok(pattern.clone())
    }

    fn matches(&self, compiled: &E, candidate: &E) -> bool {
        (self.0)(compiled, candidate)
    }
}

/// Pattern store: `contains(candidate)` is true iff any stored pattern matches.
pub struct PatternMatcher<E, S>
where
    E: Eq + Hash,
    S: PatternSyntax<E>,
{
    syntax: S,
    patterns: DashMap<E, S::Compiled>,
    /// Never below the number of stored patterns; read by `len`/`is_empty`.
    count: AtomicUsize,
}

impl<E, S> PatternMatcher<E, S>
where
    E: Eq + Hash,
    S: PatternSyntax<E>,
{
    pub fn new(syntax: S) -> Self {
        Self {
            syntax,
            patterns: DashMap::new(),
            count: AtomicUsize::new(0),
        }
    }

    pub fn syntax(&self) -> &S {
        &self.syntax
    }
}

impl<E, S> fmt::Debug for PatternMatcher<E, S>
where
    E: Eq + Hash,
    S: PatternSyntax<E>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternMatcher")
            .field("syntax", &self.syntax.name())
            .field("patterns", &self.count.load(Ordering::Acquire))
            .finish()
    }
}

impl<E, S> Matcher<E> for PatternMatcher<E, S>
where
    E: Eq + Hash + Clone + Send + Sync,
    S: PatternSyntax<E>,
{
    fn add(&self, element: E) -> Result<()> {
        if self.patterns.contains_key(&element) {
            return Ok(());
        }
        let compiled = self.syntax.compile(&element)?;
        self.count.fetch_add(1, Ordering::AcqRel);
        if self.patterns.insert(element, compiled).is_some() {
            self.count.fetch_sub(1, Ordering::AcqRel);
        }
        Ok(())
    }

    fn contains(&self, element: &E) -> bool {
        self.patterns
            .iter()
            .any(|p| self.syntax.matches(p.value(), element))
    }

    fn len(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    fn snapshot(&self) -> HashSet<E> {
        self.patterns.iter().map(|p| p.key().clone()).collect()
    }

    fn clear(&self) {
        self.patterns.retain(|_, _| {
            self.count.fetch_sub(1, Ordering::AcqRel);
            false
        });
    }

    fn strategy(&self) -> &'static str {
        self.syntax.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SieveError;

    /// Accepts only even numbers as patterns; matches multiples.
    struct Multiples;

    impl PatternSyntax<u64> for Multiples {
        type Compiled = u64;

        fn compile(&self, pattern: &u64) -> Result<u64> {
            if *pattern == 0 || pattern % 2 != 0 {
                return Err(SieveError::invalid_pattern(
                    pattern.to_string(),
                    "must be a non-zero even number",
                ));
            }
            Ok(*pattern)
        }

        fn matches(&self, compiled: &u64, candidate: &u64) -> bool {
            candidate % compiled == 0
        }

        fn name(&self) -> &'static str {
            "multiples"
        }
    }

    #[test]
    fn custom_syntax_over_non_string_elements() {
        let m: PatternMatcher<u64, _> = PatternMatcher::new(Multiples);
        assert!(m.add(4).is_ok());
        assert!(m.contains(&12));
        assert!(!m.contains(&6));
        assert_eq!(m.strategy(), "multiples");
    }

    #[test]
    fn invalid_pattern_rejected_at_add_and_not_stored() {
        let m: PatternMatcher<u64, _> = PatternMatcher::new(Multiples);
        let err = m.add(3).err();
        assert!(matches!(err, Some(SieveError::InvalidPattern { .. })));
        assert!(m.is_empty());
        assert!(!m.contains(&3));
    }

    #[test]
    fn add_all_stops_at_first_invalid() {
        let m: PatternMatcher<u64, _> = PatternMatcher::new(Multiples);
        assert!(m.add_all(vec![2, 5, 8]).is_err());
        assert_eq!(m.snapshot(), HashSet::from([2]));
    }

    #[test]
    fn match_fn_is_pluggable() {
        let m: PatternMatcher<String, _> = PatternMatcher::new(MatchFn(|p: &String, c: &String| c.contains(p.as_str())));
        assert!(m.add("admin".to_string()).is_ok());
        assert!(m.add("admin".to_string()).is_ok());
        assert_eq!(m.len(), 1);
        assert!(m.contains(&"/v1/admin/users".to_string()));
        assert!(!m.contains(&"/v1/users".to_string()));
        assert_eq!(m.strategy(), "custom");
    }

    #[test]
    fn count_tracks_racing_duplicate_adds() {
        let m: PatternMatcher<u64, _> = PatternMatcher::new(Multiples);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for p in (2..=200u64).step_by(2) {
                        assert!(m.add(p).is_ok());
                    }
                });
            }
        });
        assert_eq!(m.len(), 100);
        assert_eq!(m.snapshot().len(), 100);
        m.clear();
        assert!(m.is_empty());
        assert!(!m.contains(&4));
    }

    #[test]
    fn clear_is_visible_to_next_contains() {
        let m: PatternMatcher<String, _> = PatternMatcher::new(MatchFn(|p: &String, c: &String| c.starts_with(p.as_str())));
        assert!(m.add("/".to_string()).is_ok());
        assert!(m.contains(&"/x".to_string()));
        m.clear();
        assert!(!m.contains(&"/x".to_string()));
    }
}
