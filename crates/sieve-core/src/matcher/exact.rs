//! Exact-membership store.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashSet;

use super::Matcher;
use crate::error::Result;

/// Hashed-equality matcher backed by a sharded concurrent set.
///
/// `count` is bumped before an insert and dropped as entries are removed, so
/// it never undercounts the set; `len`/`is_empty` read it without touching
/// shard locks.
#[derive(Debug)]
pub struct ExactMatcher<E: Eq + Hash> {
    set: DashSet<E>,
    count: AtomicUsize,
}

impl<E: Eq + Hash> ExactMatcher<E> {
    pub fn new() -> Self {
        Self {
            set: DashSet::new(),
            count: AtomicUsize::new(0),
        }
    }
}

impl<E: Eq + Hash> Default for ExactMatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Matcher<E> for ExactMatcher<E>
where
    E: Eq + Hash + Clone + Send + Sync,
{
    fn add(&self, element: E) -> Result<()> {
        self.count.fetch_add(1, Ordering::AcqRel);
        if !self.set.insert(element) {
            self.count.fetch_sub(1, Ordering::AcqRel);
        }
        Ok(())
    }

    fn contains(&self, element: &E) -> bool {
        self.set.contains(element)
    }

    fn len(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    fn snapshot(&self) -> HashSet<E> {
        self.set.iter().map(|e| e.key().clone()).collect()
    }

    fn clear(&self) {
        self.set.retain(|_| {
            self.count.fetch_sub(1, Ordering::AcqRel);
            false
        });
    }

    fn strategy(&self) -> &'static str {
        "exact"
    }
}
