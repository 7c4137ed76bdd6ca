#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Need generation and priority scoring over homeostasis snapshots.
//!
//! Both stages are pure functions: a snapshot in, a ranked list out.
//! No shared state is held here; the controller owns everything
//! stateful (accumulators, dedup, eviction).

mod generate;
mod score;

pub use generate::{generate_needs, MIN_NEED_INTENSITY};
pub use score::{score_candidates, ScoringInputs};
