//! Per-drive armed/disarmed state machine with a hysteresis band.
//!
//! A drive arms once its level clears `threshold` and stays armed
//! until it falls below `threshold - margin`, rather than flipping
//! on every tick that straddles a single cutoff. This is what keeps a
//! drive oscillating around the threshold from re-firing on every
//! sample.

use std::collections::HashMap;

use parking_lot::Mutex;
use reflexcore_types::Drive;

/// Tracks armed/disarmed state per drive across evaluation ticks.
#[derive(Debug, Default)]
pub struct HysteresisGate {
    armed: Mutex<HashMap<Drive, bool>>,
}

impl HysteresisGate {
    /// Creates a gate with every drive initially disarmed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            armed: Mutex::new(HashMap::new()),
        }
    }

    /// Updates the armed state for `drive` given its current `level`
    /// and returns whether it is armed after this update.
    ///
    /// Transitions:
    /// - disarmed, `level >= threshold` -> arms.
    /// - armed, `level < threshold - margin` -> disarms.
    /// - otherwise: state is unchanged (the hysteresis band).
    pub fn update(&self, drive: Drive, level: f64, threshold: f64, margin: f64) -> bool {
        let disarm_at = threshold - margin;
        let mut armed = self.armed.lock();
        let current = armed.entry(drive).or_insert(false);
        if !*current && level >= threshold {
            *current = true;
        } else if *current && level < disarm_at {
            *current = false;
        }
        *current
    }

    /// Whether `drive` is currently armed.
    #[must_use]
    pub fn is_armed(&self, drive: Drive) -> bool {
        *self.armed.lock().get(&drive).unwrap_or(&false)
    }

    /// Reports whether `drive` would arm given `level`, without
    /// mutating its state. Used by dry-run evaluation, which gates as
    /// if armed but must leave the real state machine untouched.
    #[must_use]
    pub fn would_arm(&self, drive: Drive, level: f64, threshold: f64) -> bool {
        self.is_armed(drive) || level >= threshold
    }

    /// Explicitly disarms `drive`, independent of its current level.
    ///
    /// Called when a firing commits: the gate re-arms only once the
    /// level has dropped below the disarm threshold and crosses back
    /// up, rather than immediately re-firing on the next tick while
    /// still elevated.
    pub fn disarm(&self, drive: Drive) {
        self.armed.lock().insert(drive, false);
    }
}

#[cfg(test)]
mod tests {
    use super::HysteresisGate;
    use reflexcore_types::Drive;

    #[test]
    fn arms_once_threshold_is_cleared() {
        let gate = HysteresisGate::new();
        assert!(!gate.update(Drive::Hunger, 0.5, 0.7, 0.1));
        assert!(gate.update(Drive::Hunger, 0.8, 0.7, 0.1));
    }

    #[test]
    fn stays_armed_inside_the_hysteresis_band() {
        let gate = HysteresisGate::new();
        gate.update(Drive::Hunger, 0.8, 0.7, 0.1);
        assert!(gate.update(Drive::Hunger, 0.65, 0.7, 0.1));
    }

    #[test]
    fn disarms_once_it_drops_below_the_band() {
        let gate = HysteresisGate::new();
        gate.update(Drive::Hunger, 0.8, 0.7, 0.1);
        assert!(!gate.update(Drive::Hunger, 0.5, 0.7, 0.1));
    }

    #[test]
    fn explicit_disarm_takes_effect_even_while_still_elevated() {
        let gate = HysteresisGate::new();
        gate.update(Drive::Hunger, 0.8, 0.7, 0.1);
        gate.disarm(Drive::Hunger);
        assert!(!gate.is_armed(Drive::Hunger));
        // still above threshold, so the next tick re-arms it rather
        // than refusing to fire forever.
        assert!(gate.update(Drive::Hunger, 0.8, 0.7, 0.1));
    }

    #[test]
    fn would_arm_does_not_mutate_state() {
        let gate = HysteresisGate::new();
        assert!(gate.would_arm(Drive::Hunger, 0.8, 0.7));
        assert!(!gate.is_armed(Drive::Hunger));
    }
}
