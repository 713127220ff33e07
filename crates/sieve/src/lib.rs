//! Top-level facade crate for sieve.
//!
//! Re-exports the core policy types and the gate library so users can depend on a single crate.

pub mod core {
    pub use sieve_core::*;
}

pub mod gate {
    pub use sieve_gate::*;
}
