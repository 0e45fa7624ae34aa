// zombie_ai/tests/integration/pack_and_recovery.rs

use std::cell::Cell;
use std::collections::HashSet;
use std::time::Duration;
use slotmap::KeyData;
use zombie_ai::core::constants::{DEFAULT_WORLD_SEED, TICK_DURATION};
use zombie_ai::core::types::{Aabb, EnemyView, EntityId, NeighborView, Obstacle, Vec2, ZombieState};
use zombie_ai::entities::zombie::ZombieProfile;
use zombie_ai::systems::ai::tactics::TacticalVariant;
use zombie_ai::systems::ai::zombie_ai::AiSettings;
use zombie_ai::{AgentBody, AiConfig, AiHost, HordeWorld, ZombieAI};

fn entity(index: u32) -> EntityId {
    KeyData::from_ffi(index as u64).into()
}

/// Host with a hand-driven clock and fixed contents.
struct ScriptedHost {
    now: Cell<Duration>,
    enemies: Vec<EnemyView>,
}

impl AiHost for ScriptedHost {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn living_enemies(&self) -> Vec<EnemyView> {
        self.enemies.clone()
    }

    fn enemy(&self, id: EntityId) -> Option<EnemyView> {
        self.enemies.iter().copied().find(|e| e.id == id)
    }

    fn nearby_obstacles(&self, _region: Aabb) -> Vec<Obstacle> {
        Vec::new()
    }

    fn nearby_agents(&self, _center: Vec2, _radius: f32) -> Vec<NeighborView> {
        Vec::new()
    }
}

fn world() -> HordeWorld {
    HordeWorld::new(AiConfig::default(), DEFAULT_WORLD_SEED).expect("Failed to create horde world")
}

#[test]
fn packmate_adopts_the_hunters_target() {
    let mut world = world();
    let player = world.spawn_player(Vec2::new(-12.0, 0.0)).expect("spawn player");
    let hunter = world.spawn_zombie(ZombieProfile::walker(), Vec2::ZERO).expect("spawn zombie");
    let follower = world.spawn_zombie(ZombieProfile::walker(), Vec2::new(8.0, 0.0)).expect("spawn zombie");

    world.tick(TICK_DURATION);
    assert_eq!(world.controller(hunter).map(|c| c.state()), Some(ZombieState::Hunting));
    assert_ne!(world.controller(follower).map(|c| c.state()), Some(ZombieState::Hunting));

    let mut adopted_at = None;
    for _ in 0..60 {
        world.tick(TICK_DURATION);
        let controller = world.controller(follower).expect("controller");
        if controller.state() == ZombieState::Hunting {
            assert_eq!(controller.target(), Some(player));
            let distance = world.position(follower).expect("alive").distance(Vec2::new(-12.0, 0.0));
            adopted_at = Some(distance);
            break;
        }
    }
    let distance = adopted_at.expect("follower never joined the hunt");
    // Out of its own detection range: the target came from the pack.
    assert!(distance > 15.0, "follower detected the player itself at {}", distance);

    // The tracking bonus keeps the adopted target bound while the pack closes in.
    for _ in 0..30 {
        world.tick(TICK_DURATION);
    }
    assert_eq!(world.controller(follower).and_then(|c| c.target()), Some(player));
}

#[test]
fn lone_zombies_ignore_pack_hunts() {
    let mut world = world();
    world.spawn_player(Vec2::new(-12.0, 0.0)).expect("spawn player");
    world.spawn_zombie(ZombieProfile::walker(), Vec2::ZERO).expect("spawn zombie");
    // Tanks hunt alone.
    let tank = world.spawn_zombie(ZombieProfile::tank(), Vec2::new(6.0, 0.0)).expect("spawn zombie");

    for _ in 0..30 {
        world.tick(TICK_DURATION);
        let state = world.controller(tank).map(|c| c.state());
        assert_ne!(state, Some(ZombieState::Hunting));
    }
}

#[test]
fn gathered_pack_keeps_grouping() {
    let mut world = world();
    let a = world.spawn_zombie(ZombieProfile::walker(), Vec2::ZERO).expect("spawn zombie");
    let b = world.spawn_zombie(ZombieProfile::walker(), Vec2::new(3.0, 0.0)).expect("spawn zombie");

    // No survivors anywhere: the pair meets up and then just holds together.
    for tick in 0..900 {
        world.tick(TICK_DURATION);
        if tick < 60 {
            continue;
        }
        for id in [a, b] {
            let state = world.controller(id).map(|c| c.state());
            assert_eq!(state, Some(ZombieState::Grouping), "{:?} left the group at tick {}", id, tick);
        }
    }
    let gap = world.position(a).expect("alive").distance(world.position(b).expect("alive"));
    assert!(gap < 3.0, "pack drifted apart: {}", gap);
}

#[test]
fn boxed_in_zombie_recovers_then_escalates() {
    let mut world = world();
    // Tank so the state machine stays in Wandering instead of Grouping.
    let zombie = world.spawn_zombie(ZombieProfile::tank(), Vec2::ZERO).expect("spawn zombie");
    for bounds in [
        Aabb::new(Vec2::new(-2.0, 0.6), Vec2::new(2.0, 2.0)),
        Aabb::new(Vec2::new(-2.0, -2.0), Vec2::new(2.0, -0.6)),
        Aabb::new(Vec2::new(0.6, -2.0), Vec2::new(2.0, 2.0)),
        Aabb::new(Vec2::new(-2.0, -2.0), Vec2::new(-0.6, 2.0)),
    ] {
        world.add_obstacle(bounds, true);
    }

    let mut wander_targets = HashSet::new();
    for _ in 0..210 {
        world.tick(TICK_DURATION);
        if let Some(w) = world.controller(zombie).and_then(|c| c.wander_target()) {
            wander_targets.insert((w.x.to_bits(), w.y.to_bits()));
        }
        let position = world.position(zombie).expect("alive");
        assert!(position.length() < 0.2, "escaped the box: {:?}", position);
    }

    // Initial wander pick, the first recovery at ~3 s and the escalation at ~6 s.
    assert!(wander_targets.len() >= 3, "only {} wander targets picked", wander_targets.len());
    let controller = world.controller(zombie).expect("controller");
    assert_eq!(controller.state(), ZombieState::Wandering);
    assert!(controller.stuck_since().map_or(true, |since| world.now() - since <= Duration::from_millis(3000)));
}

#[test]
fn circling_is_abandoned_after_the_timeout() {
    let settings = AiSettings::new(AiConfig::default()).expect("defaults validate");
    let id = entity(1);
    let player = EnemyView {
        id: entity(2),
        position: Vec2::new(2.0, 0.0),
        is_same_faction: false,
        dead: false,
        health: 100.0,
        max_health: 100.0,
    };
    let host = ScriptedHost { now: Cell::new(Duration::ZERO), enemies: vec![player] };
    // Pinned body: the attacker never leaves the circling radius.
    let body = AgentBody {
        id,
        position: Vec2::ZERO,
        detection_range_base: 15.0,
        attack_range: 2.5,
        health: 100.0,
        max_health: 100.0,
        evolution_multiplier: 1.0,
        pack_behavior: false,
        tactics: TacticalVariant::Standard,
    };
    let mut ai = ZombieAI::new(id, settings, DEFAULT_WORLD_SEED);

    let mut attacking_since = None;
    let mut abandoned_at = None;
    for step in 0..80u64 {
        host.now.set(Duration::from_millis(step * 100));
        ai.update(&body, &host).expect("update");
        match ai.state() {
            ZombieState::Attacking if attacking_since.is_none() => attacking_since = Some(host.now()),
            ZombieState::Wandering if attacking_since.is_some() => {
                assert_eq!(ai.target(), None);
                assert!(ai.wander_target().is_some());
                assert_eq!(ai.circling_since(), None);
                abandoned_at = Some(host.now());
                break;
            }
            _ => {}
        }
    }

    let started = attacking_since.expect("never attacked");
    let ended = abandoned_at.expect("never stopped circling");
    assert_eq!(started, Duration::from_millis(500));
    assert_eq!(ended - started, Duration::from_millis(5100));
}
