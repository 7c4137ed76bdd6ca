#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! The reflex controller: hysteresis-gated, content-addressed, and
//! fully auditable reflex firing from homeostasis snapshot to proof
//! bundle.

mod controller;
mod error;
mod hysteresis;
mod templates;

pub use controller::{ControllerTuning, ReflexController};
pub use error::ControllerError;
pub use hysteresis::HysteresisGate;
pub use templates::{description_for, need_type_for, template_for};
