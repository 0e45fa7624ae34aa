// zombie_ai/src/concurrent/enemy_index.rs
use crate::core::types::{EnemyView, EntityId, Vec2};
use crate::systems::ai::targeting;
use rstar::primitives::GeomWithData;
use rstar::RTree;
use tracing::trace;

type EnemyPoint = GeomWithData<[f32; 2], EnemyView>;

/// Per-tick point R-tree of living non-horde entities. Built once at the
/// start of a tick from the entity arena; answers nearest-enemy lookups
/// in logarithmic time.
pub struct EnemyIndex {
    rtree: RTree<EnemyPoint>,
}

impl EnemyIndex {
    pub fn build(enemies: impl IntoIterator<Item = EnemyView>) -> Self {
        let points: Vec<EnemyPoint> = enemies
            .into_iter()
            .filter(|e| !e.dead && !e.is_same_faction && e.position.is_finite())
            .map(|e| GeomWithData::new([e.position.x, e.position.y], e))
            .collect();
        trace!("Enemy index built with {} entries", points.len());
        EnemyIndex { rtree: RTree::bulk_load(points) }
    }

    /// Nearest entry passing the same filters as a linear scan would.
    /// The iterator yields in distance order, so the first valid hit wins.
    pub fn nearest(&self, from: Vec2, exclude: Option<EntityId>) -> Option<EnemyView> {
        if !from.is_finite() {
            return None;
        }
        self.rtree
            .nearest_neighbor_iter(&[from.x, from.y])
            .map(|p| p.data)
            .find(|e| targeting::candidate_distance(from, exclude, e).is_some())
    }

    pub fn within(&self, center: Vec2, radius: f32) -> Vec<EnemyView> {
        if !center.is_finite() || !radius.is_finite() {
            return Vec::new();
        }
        self.rtree
            .locate_within_distance([center.x, center.y], radius * radius)
            .map(|p| p.data)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }
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
    fn nearest_skips_dead_and_horde_entries() {
        let mut dead = enemy(1, 1.0, 0.0);
        dead.dead = true;
        let mut zombie = enemy(2, 2.0, 0.0);
        zombie.is_same_faction = true;
        let index = EnemyIndex::build(vec![dead, zombie, enemy(3, 6.0, 0.0), enemy(4, -9.0, 0.0)]);

        assert_eq!(index.len(), 2);
        let nearest = index.nearest(Vec2::ZERO, None).expect("an enemy");
        assert_eq!(nearest.id, entity(3));
    }

    #[test]
    fn within_uses_euclidean_radius() {
        let index = EnemyIndex::build(vec![enemy(1, 3.0, 4.0), enemy(2, 4.0, 4.0)]);
        let found = index.within(Vec2::ZERO, 5.0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, entity(1));
        assert!(EnemyIndex::build(Vec::new()).nearest(Vec2::ZERO, None).is_none());
    }
}
