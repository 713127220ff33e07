//! sieve core: include/exclude decision policy over pluggable matchers.
//!
//! This crate defines the matcher abstraction, the two built-in matcher
//! strategies (exact membership and pattern membership), the
//! `IncludeExclude` policy, and the error surface shared with the gate.
//! It carries no I/O or runtime dependencies.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Every fallible path surfaces as `SieveError`/`Result`; the decision
//! predicate itself is total.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod matcher;
pub mod policy;

/// Shared result type.
pub use error::{Result, SieveError};
pub use matcher::{
    ExactMatcher, MatchFn, MatchMode, Matcher, MatcherFactory, PatternMatcher, PatternSyntax,
    Strategy,
};
pub use policy::{Decision, IncludeExclude};
