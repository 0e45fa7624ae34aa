// zombie_ai/src/concurrent/obstacle_index.rs
use crate::core::types::{Aabb, Obstacle};
use parking_lot::RwLock;
use rstar::{RTree, RTreeObject, AABB};
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Debug)]
struct SpatialObstacle {
    obstacle: Obstacle,
}

impl RTreeObject for SpatialObstacle {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let b = self.obstacle.bounds;
        AABB::from_corners([b.min.x, b.min.y], [b.max.x, b.max.y])
    }
}

/// R-tree of static obstacles, rebuilt in bulk whenever the obstacle set
/// changes and queried by region during local pathfinding.
pub struct ObstacleIndex {
    rtree: Arc<RwLock<RTree<SpatialObstacle>>>,
}

impl ObstacleIndex {
    pub fn new() -> Self {
        ObstacleIndex {
            rtree: Arc::new(RwLock::new(RTree::new())),
        }
    }

    /// Build or rebuild the index from a collection of obstacles.
    pub fn rebuild(&self, obstacles: &[Obstacle], tick: u64) {
        let spatial: Vec<SpatialObstacle> = obstacles
            .iter()
            .filter(|o| o.bounds.min.is_finite() && o.bounds.max.is_finite())
            .map(|o| SpatialObstacle { obstacle: *o })
            .collect();

        let new_tree = RTree::bulk_load(spatial);

        let mut tree_guard = self.rtree.write();
        *tree_guard = new_tree;

        debug!("Obstacle index rebuilt at tick {} with {} obstacles", tick, tree_guard.size());
    }

    pub fn insert(&self, obstacle: Obstacle) {
        self.rtree.write().insert(SpatialObstacle { obstacle });
    }

    /// Obstacles whose bounds intersect `region`.
    pub fn query_region(&self, region: &Aabb) -> Vec<Obstacle> {
        let query = AABB::from_corners([region.min.x, region.min.y], [region.max.x, region.max.y]);
        self.rtree
            .read()
            .locate_in_envelope_intersecting(&query)
            .map(|spatial| spatial.obstacle)
            .collect()
    }

    /// True if a blocking obstacle overlaps `region`. Passable obstacles never block.
    pub fn blocks(&self, region: &Aabb) -> bool {
        let query = AABB::from_corners([region.min.x, region.min.y], [region.max.x, region.max.y]);
        self.rtree
            .read()
            .locate_in_envelope_intersecting(&query)
            .any(|spatial| spatial.obstacle.blocking)
    }

    pub fn size(&self) -> usize {
        self.rtree.read().size()
    }
}

impl Default for ObstacleIndex {
    fn default() -> Self {
        Self::new()
    }
}
