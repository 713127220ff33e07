//! Matcher abstraction backing each side of an include/exclude policy.
//!
//! A `Matcher<E>` is a concurrent membership store. Two strategies ship:
//! - [`ExactMatcher`]: hashed equality (`DashSet`).
//! - [`PatternMatcher`]: stored patterns tested against a candidate by a
//!   [`PatternSyntax`] fixed at construction.
//!
//! All mutation goes through `&self`; stores are shared across threads
//! without caller-side locking.

pub mod exact;
pub mod pattern;
pub mod syntax;

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::{Result, SieveError};

pub use exact::ExactMatcher;
pub use pattern::{MatchFn, PatternMatcher, PatternSyntax};
pub use syntax::MatchMode;

/// Concurrent membership store over elements of type `E`.
pub trait Matcher<E>: Send + Sync {
    /// Insert one element. Pattern strategies validate here, never at query time.
    fn add(&self, element: E) -> Result<()>;

    /// Repeated `add`; stops at the first rejected element.
    fn add_all(&self, elements: Vec<E>) -> Result<()> {
        for e in elements {
            self.add(e)?;
        }
        Ok(())
    }

    fn contains(&self, element: &E) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Owned copy of the current membership (patterns, for pattern strategies).
    fn snapshot(&self) -> HashSet<E>;

    fn clear(&self);

    /// Short strategy label for debug output.
    fn strategy(&self) -> &'static str;
}

impl<E, M> Matcher<E> for Box<M>
where
    M: Matcher<E> + ?Sized,
{
    fn add(&self, element: E) -> Result<()> {
        (**self).add(element)
    }
    fn add_all(&self, elements: Vec<E>) -> Result<()> {
        (**self).add_all(elements)
    }
    fn contains(&self, element: &E) -> bool {
        (**self).contains(element)
    }
    fn len(&self) -> usize {
        (**self).len()
    }
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
    fn snapshot(&self) -> HashSet<E> {
        (**self).snapshot()
    }
    fn clear(&self) {
        (**self).clear()
    }
    fn strategy(&self) -> &'static str {
        (**self).strategy()
    }
}

/// Produces fresh, empty matchers. Invoked once per policy side.
pub trait MatcherFactory<E> {
    fn create(&self) -> Result<Box<dyn Matcher<E>>>;
}

impl<E, F> MatcherFactory<E> for F
where
    F: Fn() -> Result<Box<dyn Matcher<E>>>,
{
    fn create(&self) -> Result<Box<dyn Matcher<E>>> {
        self()
    }
}

/// Declarative strategy selection for string-like elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Hashed equality.
    #[default]
    Exact,
    Prefix,
    Suffix,
    Glob,
    /// Servlet path-spec rules (`/foo/*`, `*.ext`, `/`).
    ServletPath,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Exact => "exact",
            Strategy::Prefix => "prefix",
            Strategy::Suffix => "suffix",
            Strategy::Glob => "glob",
            Strategy::ServletPath => "servlet_path",
        }
    }

    /// Build an empty matcher for this strategy.
    pub fn matcher<E>(self) -> Box<dyn Matcher<E>>
    where
        E: AsRef<str> + Eq + Hash + Clone + Send + Sync + 'static,
    {
        match self {
            Strategy::Exact => Box::new(ExactMatcher::new()),
            Strategy::Prefix => Box::new(PatternMatcher::new(MatchMode::Prefix)),
            Strategy::Suffix => Box::new(PatternMatcher::new(MatchMode::Suffix)),
            Strategy::Glob => Box::new(PatternMatcher::new(MatchMode::Glob)),
            Strategy::ServletPath => Box::new(PatternMatcher::new(MatchMode::ServletPath)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = SieveError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "exact" => Ok(Strategy::Exact),
            "prefix" => Ok(Strategy::Prefix),
            "suffix" => Ok(Strategy::Suffix),
            "glob" => Ok(Strategy::Glob),
            "servlet_path" => Ok(Strategy::ServletPath),
            other => Err(SieveError::Configuration(format!(
                "unsupported matcher strategy: {other} (expected exact|prefix|suffix|glob|servlet_path)"
            ))),
        }
    }
}

impl<E> MatcherFactory<E> for Strategy
where
    E: AsRef<str> + Eq + Hash + Clone + Send + Sync + 'static,
{
    fn create(&self) -> Result<Box<dyn Matcher<E>>> {
        Ok(self.matcher())
    }
}
