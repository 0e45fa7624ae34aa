// zombie_ai/src/entities/zombie.rs
use crate::core::types::{EntityId, Vec2};
use crate::systems::ai::tactics::TacticalVariant;
use crate::systems::ai::zombie_ai::AgentBody;
use serde::{Deserialize, Serialize};

/// Static per-type stats. Read-only to the AI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZombieProfile {
    pub type_tag: String,
    pub health: f32,
    /// World units per second at full input on one axis.
    pub speed: f32,
    pub damage: f32,
    pub attack_range: f32,
    pub detection_range: f32,
    pub aggression: f32,
    pub pack_behavior: bool,
}

impl ZombieProfile {
    #[allow(clippy::too_many_arguments)]
    fn new(
        type_tag: &str,
        health: f32,
        speed: f32,
        damage: f32,
        attack_range: f32,
        detection_range: f32,
        aggression: f32,
        pack_behavior: bool,
    ) -> Self {
        ZombieProfile {
            type_tag: type_tag.to_string(),
            health,
            speed,
            damage,
            attack_range,
            detection_range,
            aggression,
            pack_behavior,
        }
    }

    pub fn walker() -> Self {
        Self::new("walker", 100.0, 2.0, 10.0, 2.5, 15.0, 0.5, true)
    }

    pub fn fast_runner() -> Self {
        Self::new("fast_runner", 60.0, 4.5, 8.0, 2.0, 20.0, 0.8, true)
    }

    pub fn tank() -> Self {
        Self::new("tank", 300.0, 1.2, 25.0, 3.0, 12.0, 0.6, false)
    }

    pub fn spitter() -> Self {
        Self::new("spitter", 80.0, 1.8, 12.0, 8.0, 22.0, 0.4, false)
    }

    pub fn crawler() -> Self {
        Self::new("crawler", 50.0, 1.0, 6.0, 1.5, 10.0, 0.3, true)
    }

    pub fn builtin() -> Vec<ZombieProfile> {
        vec![Self::walker(), Self::fast_runner(), Self::tank(), Self::spitter(), Self::crawler()]
    }

    pub fn by_tag(tag: &str) -> Option<ZombieProfile> {
        Self::builtin().into_iter().find(|p| p.type_tag == tag)
    }

    pub fn tactics(&self) -> TacticalVariant {
        TacticalVariant::from_type_tag(&self.type_tag)
    }
}

/// Host-side state of one zombie.
#[derive(Debug, Clone)]
pub struct Zombie {
    pub id: EntityId,
    pub profile: ZombieProfile,
    pub position: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub evolution_multiplier: f32,
}

impl Zombie {
    pub fn new(id: EntityId, profile: ZombieProfile, position: Vec2) -> Self {
        let health = profile.health;
        Zombie { id, profile, position, health, max_health: health, evolution_multiplier: 1.0 }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn body(&self) -> AgentBody {
        AgentBody {
            id: self.id,
            position: self.position,
            detection_range_base: self.profile.detection_range,
            attack_range: self.profile.attack_range,
            health: self.health,
            max_health: self.max_health,
            evolution_multiplier: self.evolution_multiplier,
            pack_behavior: self.profile.pack_behavior,
            tactics: self.profile.tactics(),
        }
    }
}
