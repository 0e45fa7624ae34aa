// zombie_ai/src/systems/ai/tactics.rs
use crate::core::types::Vec2;
use serde::{Deserialize, Serialize};

/// Fraction of the attack range a ranged attacker holds at. Strictly inside
/// the range so the in-range check does not flicker at the boundary.
pub const RANGED_HOLD_FACTOR: f32 = 0.95;

/// Per-type attack approach, keyed by the zombie type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TacticalVariant {
    #[default]
    Standard,
    /// Approaches from the side instead of head-on.
    Flanker,
    /// Runs straight at the target and stands on it.
    Charger,
    /// Hangs back near the edge of its attack range.
    Ranged,
}

impl TacticalVariant {
    pub fn from_type_tag(tag: &str) -> Self {
        match tag {
            "fast_runner" => TacticalVariant::Flanker,
            "tank" => TacticalVariant::Charger,
            "spitter" => TacticalVariant::Ranged,
            _ => TacticalVariant::Standard,
        }
    }

    /// Offset applied to the standard stand-off point.
    ///
    /// `approach` is the unit vector from the zombie toward its target and
    /// `side` is +1 or -1, fixed per agent so a flanker commits to one side.
    pub fn offset(self, approach: Vec2, attack_range: f32, standoff_factor: f32, side: f32) -> Vec2 {
        match self {
            TacticalVariant::Standard => Vec2::ZERO,
            TacticalVariant::Flanker => approach.perpendicular() * (0.5 * attack_range * side),
            // Cancel the stand-off entirely.
            TacticalVariant::Charger => approach * (standoff_factor * attack_range),
            // Push back out toward the edge of the range.
            TacticalVariant::Ranged => -approach * ((RANGED_HOLD_FACTOR - standoff_factor) * attack_range),
        }
    }
}

/// Point to move to while attacking.
///
/// Inside `separation_distance` the zombie stops closing in and orbits along
/// `circling_direction`; otherwise it aims for a point `standoff_factor *
/// attack_range` short of the target on the approach line, shifted by the
/// variant's offset.
#[allow(clippy::too_many_arguments)]
pub fn tactical_attack_position(
    position: Vec2,
    target: Vec2,
    attack_range: f32,
    separation_distance: f32,
    standoff_factor: f32,
    circling_direction: Vec2,
    variant: TacticalVariant,
    side: f32,
) -> Vec2 {
    let to_target = target - position;
    let distance = to_target.length();
    if distance < separation_distance {
        return position + circling_direction * attack_range.max(1.0);
    }
    let approach = to_target.normalize_or_zero();
    let standoff = target - approach * (standoff_factor * attack_range);
    standoff + variant.offset(approach, attack_range, standoff_factor, side)
}
