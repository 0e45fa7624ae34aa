// zombie_ai/src/systems/ai/targeting.rs
use crate::core::types::{EnemyView, EntityId, Vec2};

/// Distance to `candidate` if it is a legal target: alive, not of our
/// faction, not excluded, and at a finite distance.
#[inline]
pub fn candidate_distance(from: Vec2, exclude: Option<EntityId>, candidate: &EnemyView) -> Option<f32> {
    if candidate.dead || candidate.is_same_faction || Some(candidate.id) == exclude {
        return None;
    }
    if !candidate.position.is_finite() {
        return None;
    }
    let distance = from.distance(candidate.position);
    distance.is_finite().then_some(distance)
}

/// Linear nearest-enemy search. Entries with broken geometry are skipped.
pub fn find_nearest_player(
    from: Vec2,
    exclude: Option<EntityId>,
    candidates: impl IntoIterator<Item = EnemyView>,
) -> Option<EnemyView> {
    if !from.is_finite() {
        return None;
    }
    candidates
        .into_iter()
        .filter_map(|c| candidate_distance(from, exclude, &c).map(|d| (c, d)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}

/// Detection range grows with evolution; attack range does not.
pub fn can_detect_player(
    position: Vec2,
    detection_range_base: f32,
    evolution_multiplier: f32,
    enemy: &EnemyView,
) -> bool {
    let range = detection_range_base * evolution_multiplier;
    if !range.is_finite() || range < 0.0 {
        return false;
    }
    match candidate_distance(position, None, enemy) {
        Some(distance) => distance <= range,
        None => false,
    }
}

pub fn is_in_attack_range(position: Vec2, attack_range: f32, enemy: &EnemyView) -> bool {
    if !attack_range.is_finite() {
        return false;
    }
    matches!(candidate_distance(position, None, enemy), Some(d) if d <= attack_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn entity(index: u32) -> EntityId {
        KeyData::from_ffi(index as u64).into()
    }

    fn enemy(index: u32, x: f32, y: f32) -> EnemyView {
        EnemyView {
            id: entity(index),
            position: Vec2::new(x, y),
            is_same_faction: false,
            dead: false,
            health: 100.0,
            max_health: 100.0,
        }
    }

    #[test]
    fn nearest_excludes_self_faction_dead_and_nan() {
        let me = entity(0);
        let mut own = enemy(0, 0.1, 0.0);
        own.id = me;
        let mut ally = enemy(1, 0.5, 0.0);
        ally.is_same_faction = true;
        let mut corpse = enemy(2, 1.0, 0.0);
        corpse.dead = true;
        let broken = enemy(3, f32::NAN, 0.0);
        let infinite = enemy(4, f32::INFINITY, 0.0);
        let far = enemy(5, 30.0, 0.0);
        let near = enemy(6, -12.0, 0.0);

        let found = find_nearest_player(Vec2::ZERO, Some(me), vec![own, ally, corpse, broken, infinite, far, near]);
        assert_eq!(found.map(|e| e.id), Some(entity(6)));
    }

    #[test]
    fn nearest_of_nothing_is_none() {
        assert!(find_nearest_player(Vec2::ZERO, None, Vec::new()).is_none());
        assert!(find_nearest_player(Vec2::new(f32::NAN, 0.0), None, vec![enemy(1, 1.0, 1.0)]).is_none());
    }

    #[test]
    fn detection_is_evolution_scaled() {
        let e = enemy(1, 20.0, 0.0);
        assert!(!can_detect_player(Vec2::ZERO, 15.0, 1.0, &e));
        assert!(can_detect_player(Vec2::ZERO, 15.0, 1.5, &e));
    }

    #[test]
    fn detection_at_two_hundred_and_ten() {
        assert!(!can_detect_player(Vec2::ZERO, 15.0, 1.0, &enemy(1, 200.0, 0.0)));
        assert!(can_detect_player(Vec2::ZERO, 15.0, 1.0, &enemy(1, 10.0, 0.0)));
    }

    #[test]
    fn attack_range_is_not_scaled_and_rejects_invalid_input() {
        let e = enemy(1, 2.0, 0.0);
        assert!(is_in_attack_range(Vec2::ZERO, 2.5, &e));
        assert!(!is_in_attack_range(Vec2::ZERO, 1.5, &e));
        assert!(!is_in_attack_range(Vec2::ZERO, f32::NAN, &e));
        assert!(!can_detect_player(Vec2::ZERO, f32::NAN, 1.0, &e));
        assert!(!can_detect_player(Vec2::new(f32::NAN, 0.0), 15.0, 1.0, &e));
    }
}
