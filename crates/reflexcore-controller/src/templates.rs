//! Fixed drive-to-template mapping used to name candidate goals.
//!
//! Kept separate from `reflexcore-needs`' need-type mapping: a need
//! type groups several drives together (`Warmth` and `Safety` are
//! both `NeedType::Safety`), but the controller still needs one
//! concrete template per *drive* to keep `GoalKey`s distinguishable.

use reflexcore_types::{Drive, NeedType};

/// Maps a drive to the need type used in its candidate's identity.
/// Mirrors `reflexcore-needs`' grouping (several drives can share a
/// need type) but lives here too since the controller hashes
/// `(need_type, template_name)` independently of need generation.
#[must_use]
pub fn need_type_for(drive: Drive) -> NeedType {
    match drive {
        Drive::Health | Drive::Hunger | Drive::Energy | Drive::Rest => NeedType::Survival,
        Drive::Safety | Drive::Warmth => NeedType::Safety,
        Drive::Curiosity => NeedType::Curiosity,
        Drive::Social => NeedType::Social,
        Drive::Achievement | Drive::Mastery => NeedType::Achievement,
        Drive::Creativity => NeedType::Creativity,
    }
}

/// The template name used when this drive's reflex fires.
#[must_use]
pub fn template_for(drive: Drive) -> &'static str {
    match drive {
        Drive::Health => "recover_health",
        Drive::Hunger => "consume_food",
        Drive::Energy | Drive::Rest => "rest_at_shelter",
        Drive::Safety => "retreat_to_safety",
        Drive::Curiosity => "explore_area",
        Drive::Social => "initiate_social_contact",
        Drive::Achievement | Drive::Mastery => "pursue_objective",
        Drive::Creativity => "create_expression",
        Drive::Warmth => "seek_shelter",
    }
}

/// Human-readable description used both for audit logs and as the
/// resolver's keyword-heuristic fallback input.
#[must_use]
pub fn description_for(drive: Drive) -> &'static str {
    match drive {
        Drive::Health => "recover from degraded health",
        Drive::Hunger => "hungry, needs food",
        Drive::Energy => "low energy, needs rest",
        Drive::Safety => "perceived danger, needs safety",
        Drive::Curiosity => "curious, wants to explore",
        Drive::Social => "lacking companionship",
        Drive::Achievement => "no recent progress on objectives",
        Drive::Creativity => "no recent creative expression",
        Drive::Warmth => "cold, needs shelter",
        Drive::Rest => "fatigued, needs rest",
        Drive::Mastery => "skill practice overdue",
    }
}
