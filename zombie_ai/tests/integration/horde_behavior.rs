// zombie_ai/tests/integration/horde_behavior.rs

use slotmap::{Key, KeyData};
use zombie_ai::core::constants::{DEFAULT_WORLD_SEED, TICK_DURATION};
use zombie_ai::core::types::{EntityId, Vec2, ZombieState};
use zombie_ai::entities::zombie::ZombieProfile;
use zombie_ai::{AiConfig, HordeWorld};

fn entity(index: u32) -> EntityId {
    KeyData::from_ffi(index as u64).into()
}

struct TestWorld {
    world: HordeWorld,
}

impl TestWorld {
    fn new() -> Self {
        let world = HordeWorld::new(AiConfig::default(), DEFAULT_WORLD_SEED).expect("Failed to create horde world");
        TestWorld { world }
    }

    fn state(&self, id: EntityId) -> ZombieState {
        self.world.controller(id).expect("zombie controller").state()
    }

    /// Ticks `n` times and returns the state after each tick.
    fn run(&mut self, id: EntityId, n: usize) -> Vec<ZombieState> {
        (0..n)
            .map(|_| {
                self.world.tick(TICK_DURATION);
                self.state(id)
            })
            .collect()
    }
}

#[test]
fn zombie_hunts_then_attacks_a_nearby_player() {
    let mut t = TestWorld::new();
    let player = t.world.spawn_player(Vec2::new(10.0, 0.0)).expect("spawn player");
    let zombie = t.world.spawn_zombie(ZombieProfile::walker(), Vec2::ZERO).expect("spawn zombie");

    t.world.tick(TICK_DURATION);
    assert_eq!(t.state(zombie), ZombieState::Hunting);
    assert_eq!(t.world.controller(zombie).and_then(|c| c.target()), Some(player));

    let intent = t.world.intent(zombie).expect("intent");
    assert!(intent.right && !intent.left, "should head toward +x: {:?}", intent);
    assert_eq!(intent.state, ZombieState::Hunting);

    // Walker speed 2: closes 7.5 units in well under 8 s.
    let mut saw_attacking = false;
    let mut saw_attack_intent = false;
    for _ in 0..240 {
        t.world.tick(TICK_DURATION);
        saw_attacking |= t.state(zombie) == ZombieState::Attacking;
        saw_attack_intent |= t.world.intent(zombie).map_or(false, |i| i.attack);
    }
    assert!(saw_attacking, "never reached attack range");
    assert!(saw_attack_intent, "no attack intent while in range");
}

#[test]
fn idle_never_jumps_straight_to_attacking() {
    let mut t = TestWorld::new();
    t.world.spawn_player(Vec2::new(1.0, 0.0)).expect("spawn player");
    let zombie = t.world.spawn_zombie(ZombieProfile::walker(), Vec2::ZERO).expect("spawn zombie");

    let mut previous = t.state(zombie);
    for state in t.run(zombie, 120) {
        assert!(
            !(previous == ZombieState::Idle && state == ZombieState::Attacking),
            "Idle -> Attacking in a single step"
        );
        previous = state;
    }
}

#[test]
fn far_player_is_not_detected() {
    let mut t = TestWorld::new();
    t.world.spawn_player(Vec2::new(190.0, 0.0)).expect("spawn player");
    let zombie = t.world.spawn_zombie(ZombieProfile::walker(), Vec2::new(-10.0, 0.0)).expect("spawn zombie");

    for state in t.run(zombie, 150) {
        assert!(!matches!(state, ZombieState::Hunting | ZombieState::Attacking));
    }
    let controller = t.world.controller(zombie).expect("controller");
    assert_eq!(controller.target(), None);
    assert_eq!(controller.lod_level(), 3);
    assert!(controller.distance_to_nearest_player() > 150.0);
}

#[test]
fn evolution_extends_detection() {
    // Tank: detection 12, no pack behavior. Player at 15 is out of reach
    // until evolution scales the range.
    let mut plain = TestWorld::new();
    plain.world.spawn_player(Vec2::new(15.0, 0.0)).expect("spawn player");
    let slow = plain.world.spawn_zombie(ZombieProfile::tank(), Vec2::ZERO).expect("spawn zombie");
    plain.world.tick(TICK_DURATION);
    assert_eq!(plain.state(slow), ZombieState::Wandering);

    let mut evolved = TestWorld::new();
    let player = evolved.world.spawn_player(Vec2::new(15.0, 0.0)).expect("spawn player");
    let tank = evolved.world.spawn_zombie(ZombieProfile::tank(), Vec2::ZERO).expect("spawn zombie");
    evolved.world.evolve_zombie(tank, 1.5).expect("evolve");
    evolved.world.tick(TICK_DURATION);
    assert_eq!(evolved.state(tank), ZombieState::Hunting);
    assert_eq!(evolved.world.controller(tank).and_then(|c| c.target()), Some(player));
}

#[test]
fn badly_hurt_zombie_flees_away_from_attacker() {
    let mut t = TestWorld::new();
    let player = t.world.spawn_player(Vec2::new(-5.0, 0.0)).expect("spawn player");
    let zombie = t.world.spawn_zombie(ZombieProfile::walker(), Vec2::ZERO).expect("spawn zombie");
    t.world.tick(TICK_DURATION);

    t.world.damage_zombie(zombie, 85.0, player).expect("damage");
    assert_eq!(t.state(zombie), ZombieState::Fleeing);

    t.world.tick(TICK_DURATION);
    let intent = t.world.intent(zombie).expect("intent");
    assert_eq!(intent.state, ZombieState::Fleeing);
    assert!(intent.right && !intent.left, "should run toward +x: {:?}", intent);
    assert!(!intent.attack);

    let before = t.world.position(zombie).expect("alive");
    t.run(zombie, 30);
    let after = t.world.position(zombie).expect("alive");
    assert!(after.x > before.x);
}

#[test]
fn damage_from_unknown_source_is_rejected() {
    let mut t = TestWorld::new();
    let zombie = t.world.spawn_zombie(ZombieProfile::walker(), Vec2::ZERO).expect("spawn zombie");
    let ghost = entity(999);
    assert!(t.world.damage_zombie(zombie, 10.0, ghost).is_err());
    assert_eq!(t.state(zombie), ZombieState::Idle);
}

#[test]
fn despawned_target_is_released() {
    let mut t = TestWorld::new();
    let player = t.world.spawn_player(Vec2::new(8.0, 0.0)).expect("spawn player");
    let zombie = t.world.spawn_zombie(ZombieProfile::tank(), Vec2::ZERO).expect("spawn zombie");
    t.world.tick(TICK_DURATION);
    assert_eq!(t.world.controller(zombie).and_then(|c| c.target()), Some(player));

    t.world.despawn(player).expect("despawn");
    // The handle stops resolving at once; the state change waits for the throttle.
    t.run(zombie, 30);
    let controller = t.world.controller(zombie).expect("controller");
    assert_eq!(controller.target(), None);
    assert!(matches!(controller.state(), ZombieState::Idle | ZombieState::Wandering));
}

#[test]
fn reused_slot_does_not_inherit_the_old_target() {
    let mut t = TestWorld::new();
    let player = t.world.spawn_player(Vec2::new(8.0, 0.0)).expect("spawn player");
    let zombie = t.world.spawn_zombie(ZombieProfile::tank(), Vec2::ZERO).expect("spawn zombie");
    t.world.tick(TICK_DURATION);
    t.world.despawn(player).expect("despawn");

    // Same slot, new generation, far away.
    let newcomer = t.world.spawn_player(Vec2::new(150.0, 150.0)).expect("spawn player");
    let slot = |id: EntityId| id.data().as_ffi() as u32;
    assert_eq!(slot(newcomer), slot(player));
    assert_ne!(newcomer, player);

    t.run(zombie, 30);
    assert_ne!(t.world.controller(zombie).and_then(|c| c.target()), Some(newcomer));
}

#[test]
fn intent_is_stable_between_ticks() {
    let mut t = TestWorld::new();
    t.world.spawn_player(Vec2::new(6.0, 6.0)).expect("spawn player");
    let zombie = t.world.spawn_zombie(ZombieProfile::fast_runner(), Vec2::ZERO).expect("spawn zombie");
    t.run(zombie, 10);
    let a = t.world.intent(zombie).expect("intent");
    let b = t.world.intent(zombie).expect("intent");
    assert_eq!(a, b);
}
