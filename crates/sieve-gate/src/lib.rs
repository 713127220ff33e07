//! sieve gate library entry.
//!
//! Host-side admission layer: loads named filters from strict YAML config,
//! compiles them into `IncludeExclude` policies, and serves per-request
//! admission decisions from a shared registry that supports administrative
//! reload.

pub mod audit;
pub mod config;
pub mod filter;
pub mod registry;

pub use audit::AuditReport;
pub use registry::FilterRegistry;
