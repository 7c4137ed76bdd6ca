//! Shadow/live arming gate and the origin-based dispatch policy.

use reflexcore_config::GatewayMode;
use reflexcore_types::Origin;

/// Result of evaluating a dispatch request against the arming mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The action should actually be dispatched to the actuator.
    Dispatch,
    /// The action should be planned and logged, but not dispatched.
    Shadow,
}

/// Evaluates whether a [`GatewayAction`](reflexcore_types::GatewayAction)
/// with the given origin should dispatch or run in shadow mode.
///
/// `Safety` origin bypasses the arming mode entirely: a safety action
/// preempts any task regardless of whether the process is shadow- or
/// live-armed, so it always dispatches. Every other origin follows the
/// mode: live dispatches, shadow only logs.
#[must_use]
pub fn evaluate(mode: GatewayMode, origin: Origin) -> Verdict {
    match (mode, origin) {
        (_, Origin::Safety) | (GatewayMode::Live, _) => Verdict::Dispatch,
        (GatewayMode::Shadow, _) => Verdict::Shadow,
    }
}
