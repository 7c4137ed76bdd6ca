#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Execution gateway: the single choke point every dispatched action
//! passes through, origin-tagged and shadow/live-gated.

mod gateway;
mod resolver;
mod security;

pub use gateway::{DispatchVerdict, ExecutionGateway, GatewayError, GatewayReceipt};
pub use resolver::{HeuristicTaskResolver, ResolverError, TaskActionResolver};
pub use security::{evaluate, Verdict};
