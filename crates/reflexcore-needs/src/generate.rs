//! Translates a homeostasis snapshot into a ranked list of needs.

use reflexcore_types::{sort_by_ordering_key, Drive, HomeostasisSnapshot, Need, NeedType};

/// Needs below this intensity are dropped as noise rather than surfaced.
pub const MIN_NEED_INTENSITY: f64 = 0.05;

/// Threshold above which the `Curiosity` drive also produces a
/// separate, more urgent `Exploration` need (the idle-curiosity need
/// is always generated; the exploration need only once the drive is
/// strong enough to be worth acting on).
const EXPLORATION_THRESHOLD: f64 = 0.6;

fn need_type_for(drive: Drive) -> NeedType {
    match drive {
        Drive::Health | Drive::Hunger | Drive::Rest => NeedType::Survival,
        Drive::Safety | Drive::Warmth => NeedType::Safety,
        Drive::Curiosity => NeedType::Curiosity,
        Drive::Social => NeedType::Social,
        Drive::Achievement | Drive::Mastery => NeedType::Achievement,
        Drive::Creativity => NeedType::Creativity,
        Drive::Energy => NeedType::Survival,
    }
}

fn describe(drive: Drive) -> &'static str {
    match drive {
        Drive::Health => "physical wellbeing is degraded",
        Drive::Hunger => "hunger is rising",
        Drive::Energy => "energy is depleted",
        Drive::Safety => "perceived threat is elevated",
        Drive::Curiosity => "idle curiosity",
        Drive::Social => "companionship is lacking",
        Drive::Achievement => "no recent meaningful progress",
        Drive::Creativity => "no recent creative expression",
        Drive::Warmth => "exposed to the elements",
        Drive::Rest => "fatigue is accumulating",
        Drive::Mastery => "skill practice is overdue",
    }
}

/// Generates one [`Need`] per drive whose level clears
/// [`MIN_NEED_INTENSITY`], plus a synthetic `Exploration` need when
/// curiosity clears [`EXPLORATION_THRESHOLD`]. The result is sorted
/// descending by `intensity + urgency`.
#[must_use]
pub fn generate_needs(snapshot: &HomeostasisSnapshot) -> Vec<Need> {
    let mut needs = Vec::new();
    for (drive, level) in snapshot.iter() {
        if level < MIN_NEED_INTENSITY {
            continue;
        }
        needs.push(Need::new(
            need_type_for(drive),
            level,
            level,
            1.0 - level,
            describe(drive),
            snapshot.timestamp_ms,
        ));
        if drive == Drive::Curiosity && level >= EXPLORATION_THRESHOLD {
            needs.push(Need::new(
                NeedType::Exploration,
                level,
                level,
                1.0 - level,
                "an unexplored opportunity is worth pursuing",
                snapshot.timestamp_ms,
            ));
        }
    }
    sort_by_ordering_key(&mut needs);
    needs
}

#[cfg(test)]
mod tests {
    use super::{generate_needs, MIN_NEED_INTENSITY};
    use reflexcore_types::{Drive, HomeostasisSnapshot, NeedType};

    fn snapshot_with(drive: Drive, level: f64) -> HomeostasisSnapshot {
        let mut raw = [0.0; 11];
        let index = Drive::all().iter().position(|d| *d == drive).unwrap();
        raw[index] = level;
        HomeostasisSnapshot::new(raw, 0)
    }

    #[test]
    fn drops_needs_below_minimum_intensity() {
        let snapshot = snapshot_with(Drive::Hunger, MIN_NEED_INTENSITY / 2.0);
        assert!(generate_needs(&snapshot).is_empty());
    }

    #[test]
    fn surfaces_a_need_above_minimum_intensity() {
        let snapshot = snapshot_with(Drive::Hunger, 0.9);
        let needs = generate_needs(&snapshot);
        assert_eq!(needs.len(), 1);
        assert_eq!(needs[0].need_type, NeedType::Survival);
    }

    #[test]
    fn high_curiosity_also_yields_an_exploration_need() {
        let snapshot = snapshot_with(Drive::Curiosity, 0.95);
        let needs = generate_needs(&snapshot);
        assert_eq!(needs.len(), 2);
        assert!(needs.iter().any(|n| n.need_type == NeedType::Curiosity));
        assert!(needs.iter().any(|n| n.need_type == NeedType::Exploration));
    }

    #[test]
    fn is_sorted_descending_by_ordering_key() {
        let mut raw = [0.0; 11];
        raw[0] = 0.2;
        raw[1] = 0.9;
        let snapshot = HomeostasisSnapshot::new(raw, 0);
        let needs = generate_needs(&snapshot);
        let keys: Vec<f64> = needs.iter().map(reflexcore_types::Need::ordering_key).collect();
        assert!(keys.windows(2).all(|w| w[0] >= w[1]));
    }
}
