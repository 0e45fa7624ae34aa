// zombie_ai/src/systems/ai/pack.rs
use crate::core::types::{EnemyView, EntityId, NeighborView, Vec2, ZombieState};
use std::time::Duration;

/// Whether this agent is free to take a target from the pack.
pub fn may_adopt(current_target: Option<EntityId>, last_target_switch: Option<Duration>, now: Duration, cooldown: Duration) -> bool {
    match (current_target, last_target_switch) {
        (None, _) => true,
        (Some(_), None) => true,
        (Some(_), Some(last)) => now.saturating_sub(last) > cooldown,
    }
}

/// Target of the closest hunting neighbor whose target is still alive.
///
/// `resolve` re-validates the neighbor's weak target handle against the host.
pub fn find_pack_target(
    self_id: EntityId,
    position: Vec2,
    current_target: Option<EntityId>,
    neighbors: &[NeighborView],
    resolve: impl Fn(EntityId) -> Option<EnemyView>,
) -> Option<EnemyView> {
    let mut hunters: Vec<&NeighborView> = neighbors
        .iter()
        .filter(|n| n.id != self_id && n.state == ZombieState::Hunting && n.target.is_some())
        .filter(|n| n.target != current_target)
        .collect();
    hunters.sort_by(|a, b| {
        a.position
            .distance_squared(position)
            .total_cmp(&b.position.distance_squared(position))
    });
    hunters
        .into_iter()
        .filter_map(|n| n.target.and_then(&resolve))
        .find(|enemy| !enemy.dead && !enemy.is_same_faction && enemy.position.is_finite())
}

/// Position of the closest other pack member, for the Grouping state.
pub fn nearest_packmate(self_id: EntityId, position: Vec2, neighbors: &[NeighborView]) -> Option<Vec2> {
    neighbors
        .iter()
        .filter(|n| n.id != self_id && n.position.is_finite())
        .min_by(|a, b| {
            a.position
                .distance_squared(position)
                .total_cmp(&b.position.distance_squared(position))
        })
        .map(|n| n.position)
}
