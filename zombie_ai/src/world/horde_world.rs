// zombie_ai/src/world/horde_world.rs
//
// Reference host: owns the entities, the spatial indices and one controller
// per zombie, and implements `AiHost` over an immutable per-tick snapshot.

use crate::concurrent::enemy_index::EnemyIndex;
use crate::concurrent::obstacle_index::ObstacleIndex;
use crate::concurrent::spatial_index::GridSpatialIndex;
use crate::core::config::AiConfig;
use crate::core::constants::*;
use crate::core::error::{AiError, AiResult};
use crate::core::types::{
    Aabb, DamageSource, EnemyView, EntityId, MovementIntent, NeighborView, Obstacle, Vec2, ZombieState,
};
use crate::entities::zombie::{Zombie, ZombieProfile};
use crate::systems::ai::host::AiHost;
use crate::systems::ai::zombie_ai::{AiSettings, ZombieAI};
use crate::systems::horde::{HordeAISystem, HordeTickStats};
use ahash::AHashMap;
use dashmap::mapref::one::Ref;
use dashmap::DashMap;
use slotmap::SlotMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace};

#[derive(Debug, Clone)]
pub struct Player {
    pub id: EntityId,
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
}

#[derive(Debug, Clone)]
pub enum WorldEntity {
    Player(Player),
    Zombie(Zombie),
    Obstacle(Obstacle),
}

impl WorldEntity {
    fn position(&self) -> Vec2 {
        match self {
            WorldEntity::Player(p) => p.position,
            WorldEntity::Zombie(z) => z.position,
            WorldEntity::Obstacle(o) => o.bounds.min.lerp(o.bounds.max, 0.5),
        }
    }

    /// How this entity looks to a zombie's targeting, if it can be targeted.
    fn enemy_view(&self, id: EntityId) -> Option<EnemyView> {
        match self {
            WorldEntity::Player(p) => Some(EnemyView {
                id,
                position: p.position,
                is_same_faction: false,
                dead: p.health <= 0.0,
                health: p.health,
                max_health: p.max_health,
            }),
            WorldEntity::Zombie(z) => Some(EnemyView {
                id,
                position: z.position,
                is_same_faction: true,
                dead: z.is_dead(),
                health: z.health,
                max_health: z.max_health,
            }),
            WorldEntity::Obstacle(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub frame: u64,
    pub now: Duration,
    pub zombies: usize,
    pub players: usize,
    pub ai: HordeTickStats,
    /// Zombies per state after the tick, in `ZombieState` declaration order.
    pub state_counts: [usize; 6],
}

impl TickReport {
    pub fn count(&self, state: ZombieState) -> usize {
        self.state_counts[state_slot(state)]
    }
}

fn state_slot(state: ZombieState) -> usize {
    match state {
        ZombieState::Idle => 0,
        ZombieState::Wandering => 1,
        ZombieState::Hunting => 2,
        ZombieState::Attacking => 3,
        ZombieState::Fleeing => 4,
        ZombieState::Grouping => 5,
    }
}

/// Read-only view of the world handed to every controller during a tick.
struct TickSnapshot<'a> {
    now: Duration,
    enemies: EnemyIndex,
    lookup: AHashMap<EntityId, EnemyView>,
    roster: AHashMap<EntityId, NeighborView>,
    agent_index: &'a GridSpatialIndex,
    obstacles: &'a ObstacleIndex,
}

impl AiHost for TickSnapshot<'_> {
    fn now(&self) -> Duration {
        self.now
    }

    fn living_enemies(&self) -> Vec<EnemyView> {
        self.lookup.values().filter(|e| !e.dead).copied().collect()
    }

    fn enemy(&self, id: EntityId) -> Option<EnemyView> {
        self.lookup.get(&id).copied()
    }

    fn nearest_enemy(&self, from: Vec2, exclude: Option<EntityId>) -> Option<EnemyView> {
        self.enemies.nearest(from, exclude)
    }

    fn enemies_near(&self, center: Vec2, radius: f32) -> Vec<EnemyView> {
        self.enemies.within(center, radius)
    }

    fn nearby_obstacles(&self, region: Aabb) -> Vec<Obstacle> {
        self.obstacles.query_region(&region)
    }

    fn nearby_agents(&self, center: Vec2, radius: f32) -> Vec<NeighborView> {
        self.agent_index
            .query_radius(center, radius)
            .into_iter()
            .filter_map(|id| self.roster.get(&id).copied())
            .collect()
    }
}

pub struct HordeWorld {
    settings: Arc<AiSettings>,
    seed: u64,
    entities: SlotMap<EntityId, WorldEntity>,
    agent_index: GridSpatialIndex,
    obstacles: ObstacleIndex,
    controllers: DashMap<EntityId, ZombieAI>,
    system: HordeAISystem,
    now: Duration,
    frame: u64,
}

impl HordeWorld {
    pub fn new(config: AiConfig, seed: u64) -> AiResult<Self> {
        let settings = AiSettings::new(config)?;
        info!("Horde world created (seed {:#x})", seed);
        Ok(HordeWorld {
            settings,
            seed,
            entities: SlotMap::with_key(),
            agent_index: GridSpatialIndex::new(
                WORLD_MAX_X - WORLD_MIN_X,
                WORLD_MAX_Y - WORLD_MIN_Y,
                WORLD_MIN_X,
                WORLD_MIN_Y,
                SPATIAL_INDEX_CELL_SIZE,
            ),
            obstacles: ObstacleIndex::new(),
            controllers: DashMap::new(),
            system: HordeAISystem::new(),
            now: Duration::ZERO,
            frame: 0,
        })
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn spawn_player(&mut self, position: Vec2) -> AiResult<EntityId> {
        if !position.is_finite() {
            return Err(AiError::Config(format!("player spawn position {:?} is not finite", position)));
        }
        let id = self.entities.insert_with_key(|id| {
            WorldEntity::Player(Player { id, position, health: PLAYER_MAX_HEALTH, max_health: PLAYER_MAX_HEALTH })
        });
        debug!("Player {} spawned at ({:.1}, {:.1})", id, position.x, position.y);
        Ok(id)
    }

    pub fn spawn_zombie(&mut self, profile: ZombieProfile, position: Vec2) -> AiResult<EntityId> {
        if !position.is_finite() {
            return Err(AiError::Config(format!("zombie spawn position {:?} is not finite", position)));
        }
        let tag = profile.type_tag.clone();
        let id = self.entities.insert_with_key(|id| WorldEntity::Zombie(Zombie::new(id, profile, position)));
        self.agent_index.update_position(id, position);
        self.controllers.insert(id, ZombieAI::new(id, Arc::clone(&self.settings), self.seed));
        debug!("Zombie {} ({}) spawned at ({:.1}, {:.1})", id, tag, position.x, position.y);
        Ok(id)
    }

    pub fn add_obstacle(&mut self, bounds: Aabb, blocking: bool) -> EntityId {
        let id = self.entities.insert_with_key(|id| WorldEntity::Obstacle(Obstacle { id, bounds, blocking }));
        self.obstacles.insert(Obstacle { id, bounds, blocking });
        id
    }

    /// Teleports a player or zombie.
    pub fn move_entity(&mut self, id: EntityId, position: Vec2) -> AiResult<()> {
        match self.entities.get_mut(id) {
            Some(WorldEntity::Player(p)) => p.position = position,
            Some(WorldEntity::Zombie(z)) => {
                z.position = position;
                self.agent_index.update_position(id, position);
            }
            Some(WorldEntity::Obstacle(_)) | None => return Err(AiError::UnknownEntity(id)),
        }
        Ok(())
    }

    /// Applies damage from `source` and notifies the zombie's controller.
    /// A zombie brought to zero health is removed.
    pub fn damage_zombie(&mut self, id: EntityId, amount: f32, source: EntityId) -> AiResult<()> {
        let source_view = self
            .entities
            .get(source)
            .and_then(|e| e.enemy_view(source))
            .ok_or(AiError::UnknownEntity(source))?;

        let body = match self.entities.get_mut(id) {
            Some(WorldEntity::Zombie(z)) => {
                z.health = (z.health - amount.max(0.0)).max(0.0);
                z.body()
            }
            _ => return Err(AiError::UnknownEntity(id)),
        };

        if body.health <= 0.0 {
            debug!("Zombie {} killed by {}", id, source);
            self.despawn(id)?;
            return Ok(());
        }

        let damage = DamageSource {
            id: source,
            position: source_view.position,
            is_same_faction: source_view.is_same_faction,
        };
        if let Some(mut controller) = self.controllers.get_mut(&id) {
            controller.on_damaged(&body, &damage, self.now);
        }
        Ok(())
    }

    pub fn evolve_zombie(&mut self, id: EntityId, multiplier: f32) -> AiResult<()> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(AiError::Config(format!("evolution multiplier must be positive, got {}", multiplier)));
        }
        match self.entities.get_mut(id) {
            Some(WorldEntity::Zombie(z)) => z.evolution_multiplier = multiplier,
            _ => return Err(AiError::UnknownEntity(id)),
        }
        if let Some(mut controller) = self.controllers.get_mut(&id) {
            controller.on_evolved(multiplier, self.now);
        }
        Ok(())
    }

    /// Removes any entity. Handles held by zombies simply stop resolving.
    pub fn despawn(&mut self, id: EntityId) -> AiResult<()> {
        let removed = self.entities.remove(id).ok_or(AiError::UnknownEntity(id))?;
        match removed {
            WorldEntity::Zombie(_) => {
                self.agent_index.remove(&id);
                self.controllers.remove(&id);
            }
            WorldEntity::Obstacle(_) => {
                let remaining: Vec<Obstacle> = self
                    .entities
                    .iter()
                    .filter_map(|(_, e)| match e {
                        WorldEntity::Obstacle(o) => Some(*o),
                        _ => None,
                    })
                    .collect();
                self.obstacles.rebuild(&remaining, self.frame);
            }
            WorldEntity::Player(_) => {}
        }
        debug!("Entity {} despawned", id);
        Ok(())
    }

    pub fn position(&self, id: EntityId) -> Option<Vec2> {
        self.entities.get(id).map(|e| e.position())
    }

    pub fn controller(&self, id: EntityId) -> Option<Ref<'_, EntityId, ZombieAI>> {
        self.controllers.get(&id)
    }

    pub fn intent(&self, id: EntityId) -> Option<MovementIntent> {
        self.controllers.get(&id).map(|c| c.movement_intent())
    }

    pub fn zombie_count(&self) -> usize {
        self.controllers.len()
    }

    fn snapshot(&self) -> TickSnapshot<'_> {
        let lookup: AHashMap<EntityId, EnemyView> =
            self.entities.iter().filter_map(|(id, e)| e.enemy_view(id).map(|v| (id, v))).collect();
        let enemies = EnemyIndex::build(lookup.values().copied());
        let roster: AHashMap<EntityId, NeighborView> = self
            .entities
            .iter()
            .filter_map(|(id, e)| match e {
                WorldEntity::Zombie(z) if !z.is_dead() => {
                    let state = self.controllers.get(&id).map(|c| c.neighbor_view(z.position))?;
                    Some((id, state))
                }
                _ => None,
            })
            .collect();
        TickSnapshot {
            now: self.now,
            enemies,
            lookup,
            roster,
            agent_index: &self.agent_index,
            obstacles: &self.obstacles,
        }
    }

    /// Advances the clock by `dt`, runs every controller against a snapshot
    /// taken at the start of the tick, then moves the zombies.
    pub fn tick(&mut self, dt: Duration) -> TickReport {
        self.now += dt;
        self.frame += 1;

        let bodies: Vec<_> = self
            .entities
            .iter()
            .filter_map(|(_, e)| match e {
                WorldEntity::Zombie(z) if !z.is_dead() => Some(z.body()),
                _ => None,
            })
            .collect();

        let ai = {
            let snapshot = self.snapshot();
            self.system.run(self.frame, &bodies, &self.controllers, &snapshot)
        };

        self.apply_movement(dt.as_secs_f32());

        let mut report = TickReport {
            frame: self.frame,
            now: self.now,
            zombies: bodies.len(),
            players: self.entities.iter().filter(|(_, e)| matches!(e, WorldEntity::Player(_))).count(),
            ai,
            state_counts: [0; 6],
        };
        for entry in self.controllers.iter() {
            report.state_counts[state_slot(entry.value().state())] += 1;
        }
        trace!("[Frame {}] tick report: {:?}", self.frame, report);
        report
    }

    /// Kinematic integration of the last intents. A move that would overlap a
    /// blocking obstacle is reverted, as is anything leaving the world bounds.
    fn apply_movement(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        let obstacles = &self.obstacles;
        let controllers = &self.controllers;
        let agent_index = &self.agent_index;
        for (id, entity) in self.entities.iter_mut() {
            let WorldEntity::Zombie(zombie) = entity else { continue };
            let Some(intent) = controllers.get(&id).map(|c| c.movement_intent()) else { continue };
            if !intent.is_moving() || !zombie.position.is_finite() {
                continue;
            }
            let step = intent.axis_vector().normalize_or_zero() * (zombie.profile.speed * dt);
            let old = zombie.position;
            let mut next = old + step;
            next.x = next.x.clamp(WORLD_MIN_X + ZOMBIE_RADIUS, WORLD_MAX_X - ZOMBIE_RADIUS);
            next.y = next.y.clamp(WORLD_MIN_Y + ZOMBIE_RADIUS, WORLD_MAX_Y - ZOMBIE_RADIUS);

            if obstacles.blocks(&Aabb::around(next, ZOMBIE_RADIUS)) {
                trace!("Zombie {} blocked at ({:.1}, {:.1})", id, old.x, old.y);
                continue;
            }
            zombie.position = next;
            agent_index.update_position(id, next);
        }
    }
}
