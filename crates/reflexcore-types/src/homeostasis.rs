//! Homeostatic drives and the snapshot the external poller produces.

use serde::{Deserialize, Serialize};

/// The closed set of scalar drives tracked by the agent.
///
/// Eleven total: the eight base drives named in the specification plus
/// three domain-specific extensions (`Warmth`, `Rest`, `Mastery`). The
/// specification's prose lists "eleven... plus six domain-specific
/// extensions", which overcounts if taken literally; the eleven-drive
/// invariant is load-bearing (it is asserted directly in the testable
/// properties), so it is treated as authoritative and the extension set
/// is trimmed to three. See `DESIGN.md` for the resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drive {
    /// Physical wellbeing.
    Health,
    /// Food need.
    Hunger,
    /// Stamina / fatigue.
    Energy,
    /// Perceived threat level (lower is safer).
    Safety,
    /// Drive to explore the unknown.
    Curiosity,
    /// Desire for companionship or cooperation.
    Social,
    /// Drive to complete meaningful goals.
    Achievement,
    /// Drive to build or express novel structures.
    Creativity,
    /// Domain extension: shelter from environmental exposure.
    Warmth,
    /// Domain extension: accumulated fatigue requiring downtime.
    Rest,
    /// Domain extension: drive to improve skill at a practiced task.
    Mastery,
}

impl Drive {
    /// All eleven drives in a stable, deterministic order.
    #[must_use]
    pub const fn all() -> [Self; 11] {
        [
            Self::Health,
            Self::Hunger,
            Self::Energy,
            Self::Safety,
            Self::Curiosity,
            Self::Social,
            Self::Achievement,
            Self::Creativity,
            Self::Warmth,
            Self::Rest,
            Self::Mastery,
        ]
    }
}

/// A point-in-time reading of every tracked drive, produced by the
/// external `HomeostasisMonitor` and never mutated after creation.
///
/// Every field is clamped to `[0, 1]` at construction, satisfying the
/// invariant that a drive level is always in range after emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeostasisSnapshot {
    /// Per-drive clamped values, in `Drive::all()` order.
    values: [f64; 11],
    /// Monotonic timestamp in epoch milliseconds.
    pub timestamp_ms: i64,
}

impl HomeostasisSnapshot {
    /// Builds a snapshot from raw drive readings, clamping each to `[0, 1]`.
    #[must_use]
    pub fn new(raw: [f64; 11], timestamp_ms: i64) -> Self {
        let mut values = raw;
        for value in &mut values {
            *value = value.clamp(0.0, 1.0);
        }
        Self {
            values,
            timestamp_ms,
        }
    }

    /// Reads the clamped level for a drive.
    #[must_use]
    pub fn level(&self, drive: Drive) -> f64 {
        let index = Drive::all().iter().position(|d| *d == drive).unwrap_or(0);
        self.values[index]
    }

    /// Returns an iterator over `(Drive, level)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Drive, f64)> + '_ {
        Drive::all().into_iter().zip(self.values.iter().copied())
    }
}

/// Capability interface the controller adapts from external bot state.
///
/// This is a trait, not a struct, precisely because the real
/// implementation lives in the (out-of-scope) perception/world-state
/// poller; the controller only needs the handful of queries below.
pub trait WorldState {
    /// Whether at least `min_qty` of `name` is present in inventory.
    fn has_item(&self, name: &str, min_qty: u32) -> bool;
    /// Current level for a drive, as observed by the world-state adapter.
    fn drive_level(&self, drive: Drive) -> f64;
    /// Whether the agent is near something tagged `tag` (e.g. "shelter").
    fn is_near(&self, tag: &str) -> bool;
    /// Whether an environmental condition (e.g. "night", "storm") holds.
    fn environmental_flag(&self, tag: &str) -> bool;
    /// Whether a weapon is currently equipped or available.
    fn has_weapon(&self) -> bool;
    /// Whether armor is currently equipped or available.
    fn has_armor(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::{Drive, HomeostasisSnapshot};

    #[test]
    fn clamps_out_of_range_values() {
        let raw = [-1.0, 2.0, 0.5, 1.5, -0.5, 0.0, 1.0, 0.3, -3.0, 4.0, 0.9];
        let snapshot = HomeostasisSnapshot::new(raw, 1_000);
        for (_, level) in snapshot.iter() {
            assert!((0.0..=1.0).contains(&level));
        }
        assert!((snapshot.level(Drive::Health) - 0.0).abs() < f64::EPSILON);
        assert!((snapshot.level(Drive::Hunger) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn iterates_in_canonical_order() {
        let snapshot = HomeostasisSnapshot::new([0.0; 11], 0);
        let order: Vec<Drive> = snapshot.iter().map(|(d, _)| d).collect();
        assert_eq!(order, Drive::all());
    }
}
