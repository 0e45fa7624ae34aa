// zombie_ai/tests/performance/lod_properties.rs

use proptest::prelude::*;
use slotmap::KeyData;
use zombie_ai::core::config::{LodConfig, SteeringConfig};
use zombie_ai::core::types::{EnemyView, EntityId, NeighborView, Vec2, ZombieState};
use zombie_ai::systems::ai::lod::{LodLevel, LodScheduler};
use zombie_ai::systems::ai::steering::{discretize, steer, SteeringInput};

fn entity(index: u32) -> EntityId {
    KeyData::from_ffi(index as u64).into()
}

fn scheduler() -> LodScheduler {
    LodScheduler::new(LodConfig::default()).expect("default LOD config is valid")
}

fn coord() -> impl Strategy<Value = f32> {
    -200.0f32..200.0
}

fn point() -> impl Strategy<Value = Vec2> {
    (coord(), coord()).prop_map(|(x, y)| Vec2::new(x, y))
}

proptest! {
    #[test]
    fn lod_is_monotonic_in_distance(a in 0.0f32..500.0, b in 0.0f32..500.0) {
        let lod = scheduler();
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(lod.classify(near) <= lod.classify(far));
    }

    #[test]
    fn custom_thresholds_partition_the_line(
        high in 1.0f32..50.0,
        gap1 in 1.0f32..50.0,
        gap2 in 1.0f32..50.0,
        d in 0.0f32..400.0,
    ) {
        let config = LodConfig {
            high_threshold: high,
            medium_threshold: high + gap1,
            low_threshold: high + gap1 + gap2,
            ..LodConfig::default()
        };
        let lod = LodScheduler::new(config.clone()).expect("increasing thresholds are valid");
        let expected = if d <= config.high_threshold {
            LodLevel::High
        } else if d <= config.medium_threshold {
            LodLevel::Medium
        } else if d <= config.low_threshold {
            LodLevel::Low
        } else {
            LodLevel::Minimal
        };
        prop_assert_eq!(lod.classify(d), expected);
    }

    #[test]
    fn steering_never_exceeds_unit_length(
        position in point(),
        goal in proptest::option::of(point()),
        players in proptest::collection::vec(point(), 0..6),
        agents in proptest::collection::vec(point(), 0..12),
        orbit in proptest::option::of(point()),
        side in prop_oneof![Just(1.0f32), Just(-1.0f32)],
    ) {
        let players: Vec<EnemyView> = players
            .into_iter()
            .enumerate()
            .map(|(i, p)| EnemyView {
                id: entity(i as u32),
                // Cluster around the agent so separation actually kicks in.
                position: position + Vec2::new(p.x / 100.0, p.y / 100.0),
                is_same_faction: false,
                dead: false,
                health: 1.0,
                max_health: 1.0,
            })
            .collect();
        let agents: Vec<NeighborView> = agents
            .into_iter()
            .enumerate()
            .map(|(i, p)| NeighborView {
                id: entity(100 + i as u32),
                position: position + Vec2::new(p.x / 200.0, p.y / 200.0),
                state: ZombieState::Wandering,
                target: None,
            })
            .collect();
        let input = SteeringInput {
            position,
            goal,
            players: &players,
            agents: &agents,
            orbit_target: orbit,
            orbit_side: side,
        };
        let out = steer(&input, &SteeringConfig::default());
        prop_assert!(out.is_finite());
        prop_assert!(out.length() <= 1.0 + 1e-5, "length {}", out.length());

        let (up, down, left, right) = discretize(out, 0.1);
        prop_assert!(!(up && down));
        prop_assert!(!(left && right));
    }
}
