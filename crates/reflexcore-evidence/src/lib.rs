#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Proof bundle assembly and the post-execution verification algorithm.
//!
//! Grounded in the director/reviewer verdict shape: a pure function
//! computes an outcome from observed before/after state, and a
//! separate assembly step wraps that outcome plus the firing's
//! identity fields into a hashed, auditable [`ProofBundle`].

mod assemble;
mod verify;

pub use assemble::{assemble, EvidenceError};
pub use verify::verify_execution;
