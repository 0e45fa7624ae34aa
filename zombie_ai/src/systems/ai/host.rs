// zombie_ai/src/systems/ai/host.rs
//
// Everything the AI core needs from the game loop goes through `AiHost`.
// The core never holds references into host storage; entities are named by
// generational handles and re-resolved on every use.

use crate::core::types::{Aabb, EnemyView, EntityId, NeighborView, Obstacle, Vec2};
use crate::systems::ai::targeting;
use std::time::Duration;

pub trait AiHost {
    /// Monotonic simulation time.
    fn now(&self) -> Duration;

    /// All potentially targetable entities, zombies included.
    fn living_enemies(&self) -> Vec<EnemyView>;

    /// Re-validates a weak target handle. `None` once the entity is gone.
    fn enemy(&self, id: EntityId) -> Option<EnemyView>;

    /// Nearest valid enemy. Index-backed hosts should override the linear scan.
    fn nearest_enemy(&self, from: Vec2, exclude: Option<EntityId>) -> Option<EnemyView> {
        targeting::find_nearest_player(from, exclude, self.living_enemies())
    }

    /// Non-horde entities within `radius`. Index-backed hosts should override.
    fn enemies_near(&self, center: Vec2, radius: f32) -> Vec<EnemyView> {
        let radius_sq = radius * radius;
        self.living_enemies()
            .into_iter()
            .filter(|e| !e.dead && !e.is_same_faction && e.position.distance_squared(center) <= radius_sq)
            .collect()
    }

    fn nearby_obstacles(&self, region: Aabb) -> Vec<Obstacle>;

    /// Same-faction agents within `radius`, as read-only views.
    fn nearby_agents(&self, center: Vec2, radius: f32) -> Vec<NeighborView>;
}
