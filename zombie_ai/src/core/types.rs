// zombie_ai/src/core/types.rs
use serde::{Deserialize, Serialize};
use slotmap::Key;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

// --- Entity Handles ---

slotmap::new_key_type! {
    /// Generational handle into the host's entity arena.
    ///
    /// Handles never own the entity they point at; a handle whose slot has been
    /// reused carries a stale version and resolves to nothing.
    pub struct EntityId;
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.data())
    }
}

// --- Basic Geometric Types ---
#[derive(Clone, Debug, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self { Vec2 { x, y } }

    /// Unit vector at `angle` radians scaled by `radius`.
    pub fn from_polar(radius: f32, angle: f32) -> Self {
        Vec2::new(radius * angle.cos(), radius * angle.sin())
    }

    pub fn length_squared(self) -> f32 { self.x * self.x + self.y * self.y }
    pub fn length(self) -> f32 { self.length_squared().sqrt() }

    pub fn distance(self, other: Vec2) -> f32 { (other - self).length() }
    pub fn distance_squared(self, other: Vec2) -> f32 { (other - self).length_squared() }

    pub fn is_finite(self) -> bool { self.x.is_finite() && self.y.is_finite() }

    /// Returns the zero vector for degenerate input instead of NaN.
    pub fn normalize_or_zero(self) -> Vec2 {
        let len = self.length();
        if len > f32::EPSILON && len.is_finite() {
            Vec2::new(self.x / len, self.y / len)
        } else {
            Vec2::ZERO
        }
    }

    /// Counter-clockwise perpendicular.
    pub fn perpendicular(self) -> Vec2 { Vec2::new(-self.y, self.x) }

    pub fn lerp(self, other: Vec2, t: f32) -> Vec2 {
        self + (other - self) * t
    }

    pub fn dot(self, other: Vec2) -> f32 { self.x * other.x + self.y * other.y }

    /// Scales the vector down to `max` length if it is longer.
    pub fn clamp_length(self, max: f32) -> Vec2 {
        let len = self.length();
        if len > max && len > f32::EPSILON {
            self * (max / len)
        } else {
            self
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 { Vec2::new(self.x + rhs.x, self.y + rhs.y) }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 { Vec2::new(self.x - rhs.x, self.y - rhs.y) }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 { Vec2::new(self.x * rhs, self.y * rhs) }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 { Vec2::new(-self.x, -self.y) }
}

/// Axis-aligned box used for obstacle region queries.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Aabb {
            min: Vec2::new(min.x.min(max.x), min.y.min(max.y)),
            max: Vec2::new(min.x.max(max.x), min.y.max(max.y)),
        }
    }

    pub fn around(center: Vec2, half_extent: f32) -> Self {
        let h = Vec2::new(half_extent, half_extent);
        Aabb { min: center - h, max: center + h }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}

// --- AI States ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ZombieState {
    #[default]
    Idle,
    Wandering,
    Hunting,
    Attacking,
    Fleeing,
    Grouping,
}

impl ZombieState {
    pub fn as_str(self) -> &'static str {
        match self {
            ZombieState::Idle => "idle",
            ZombieState::Wandering => "wandering",
            ZombieState::Hunting => "hunting",
            ZombieState::Attacking => "attacking",
            ZombieState::Fleeing => "fleeing",
            ZombieState::Grouping => "grouping",
        }
    }
}

// --- Collaborator Views ---

/// Read-only snapshot of a potentially targetable entity.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct EnemyView {
    pub id: EntityId,
    pub position: Vec2,
    pub is_same_faction: bool,
    pub dead: bool,
    pub health: f32,
    pub max_health: f32,
}

/// What a zombie may know about a same-faction neighbor.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct NeighborView {
    pub id: EntityId,
    pub position: Vec2,
    pub state: ZombieState,
    pub target: Option<EntityId>,
}

#[derive(Clone, Debug, Copy, PartialEq)]
pub struct Obstacle {
    pub id: EntityId,
    pub bounds: Aabb,
    pub blocking: bool,
}

/// Discretised per-tick output handed to the movement/combat model.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct MovementIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub attack: bool,
    pub state: ZombieState,
    pub target_point: Option<Vec2>,
}

impl MovementIntent {
    pub fn idle(state: ZombieState) -> Self {
        MovementIntent {
            up: false,
            down: false,
            left: false,
            right: false,
            attack: false,
            state,
            target_point: None,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Unit-less axis direction implied by the booleans.
    pub fn axis_vector(&self) -> Vec2 {
        let x = (self.right as i8 - self.left as i8) as f32;
        let y = (self.down as i8 - self.up as i8) as f32;
        Vec2::new(x, y)
    }
}

/// Damage notification payload.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct DamageSource {
    pub id: EntityId,
    pub position: Vec2,
    pub is_same_faction: bool,
}
