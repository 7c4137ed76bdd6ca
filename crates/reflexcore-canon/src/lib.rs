#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Deterministic canonicalization and content hashing.
//!
//! Two serializations of logically equal data (same keys, different
//! insertion order; `1` vs `1.0`) must hash identically. Object keys
//! are sorted, arrays keep their given order (order is semantic, not
//! incidental), and `NaN`/`Infinity` are rejected outright since they
//! have no canonical JSON representation.

mod canonicalize;
mod digest;

pub use canonicalize::{canonicalize, CanonError};
pub use digest::{content_hash, GOAL_KEY_HEX_LEN};
