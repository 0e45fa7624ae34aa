// zombie_ai/src/systems/horde.rs
//
// Drives every zombie controller for one tick. A failing agent is logged and
// skipped; the rest of the horde still updates.

use crate::core::types::EntityId;
use crate::systems::ai::host::AiHost;
use crate::systems::ai::lod::LodLevel;
use crate::systems::ai::zombie_ai::{AgentBody, ZombieAI};
use dashmap::DashMap;
use metrics::{counter, gauge, histogram};
use std::time::Instant;
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HordeTickStats {
    pub updated: usize,
    pub failed: usize,
    /// Bodies with no controller (removed mid-tick).
    pub skipped: usize,
    /// Agents per LOD level after the update, High..Minimal.
    pub lod_counts: [usize; 4],
}

#[derive(Debug, Default)]
pub struct HordeAISystem;

impl HordeAISystem {
    pub fn new() -> Self {
        HordeAISystem
    }

    pub fn run<H: AiHost + ?Sized>(
        &self,
        frame: u64,
        bodies: &[AgentBody],
        controllers: &DashMap<EntityId, ZombieAI>,
        host: &H,
    ) -> HordeTickStats {
        let started = Instant::now();
        let mut stats = HordeTickStats::default();

        for body in bodies {
            let Some(mut controller) = controllers.get_mut(&body.id) else {
                stats.skipped += 1;
                continue;
            };
            match controller.update(body, host) {
                Ok(()) => stats.updated += 1,
                Err(e) => {
                    warn!("[Frame {}] Zombie {} AI update failed: {}", frame, body.id, e);
                    stats.failed += 1;
                }
            }
            stats.lod_counts[controller.lod() as usize] += 1;
        }

        counter!("zombie_ai_updates_total").increment(stats.updated as u64);
        if stats.failed > 0 {
            counter!("zombie_ai_update_failures_total").increment(stats.failed as u64);
        }
        for level in LodLevel::ALL {
            gauge!("zombie_ai_lod_agents", "level" => level.as_str()).set(stats.lod_counts[level as usize] as f64);
        }
        let elapsed = started.elapsed();
        histogram!("zombie_ai_tick_seconds").record(elapsed.as_secs_f64());
        trace!(
            "[Frame {}] Horde AI: {} updated, {} failed, {} skipped in {:?}",
            frame, stats.updated, stats.failed, stats.skipped, elapsed
        );
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AiConfig;
    use crate::core::types::{Aabb, EnemyView, NeighborView, Obstacle, Vec2, ZombieState};
    use crate::systems::ai::tactics::TacticalVariant;
    use crate::systems::ai::zombie_ai::AiSettings;
    use std::time::Duration;
    use slotmap::KeyData;

    fn entity(index: u32) -> EntityId {
        KeyData::from_ffi(index as u64).into()
    }

    struct EmptyHost;

    impl AiHost for EmptyHost {
        fn now(&self) -> Duration { Duration::from_secs(1) }
        fn living_enemies(&self) -> Vec<EnemyView> { Vec::new() }
        fn enemy(&self, _id: EntityId) -> Option<EnemyView> { None }
        fn nearby_obstacles(&self, _region: Aabb) -> Vec<Obstacle> { Vec::new() }
        fn nearby_agents(&self, _center: Vec2, _radius: f32) -> Vec<NeighborView> { Vec::new() }
    }

    fn body(index: u32, position: Vec2) -> AgentBody {
        AgentBody {
            id: entity(index),
            position,
            detection_range_base: 15.0,
            attack_range: 2.5,
            health: 100.0,
            max_health: 100.0,
            evolution_multiplier: 1.0,
            pack_behavior: false,
            tactics: TacticalVariant::Standard,
        }
    }

    #[test]
    fn one_bad_agent_does_not_stop_the_rest() {
        let settings = AiSettings::new(AiConfig::default()).expect("defaults validate");
        let controllers = DashMap::new();
        for index in 0..3 {
            let id = entity(index);
            controllers.insert(id, ZombieAI::new(id, settings.clone(), 1));
        }
        let bodies = vec![
            body(0, Vec2::new(1.0, 1.0)),
            body(1, Vec2::new(f32::NAN, 0.0)),
            body(2, Vec2::new(-3.0, 4.0)),
            body(9, Vec2::ZERO),
        ];

        let stats = HordeAISystem::new().run(1, &bodies, &controllers, &EmptyHost);
        assert_eq!(stats.updated, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.skipped, 1);
        // No players anywhere: everything sits at Minimal.
        assert_eq!(stats.lod_counts, [0, 0, 0, 3]);

        let healthy = controllers.get(&entity(2)).expect("controller");
        assert_ne!(healthy.state(), ZombieState::Hunting);
    }
}
