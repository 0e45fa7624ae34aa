// zombie_ai/src/concurrent/spatial_index.rs

use crate::core::types::{EntityId, Vec2};
use ahash::AHashSet;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default)]
struct SpatialCell {
    entity_ids: AHashSet<EntityId>,
}

/// Uniform grid over the world bounds. Positions outside the bounds are
/// clamped into the border cells, so queries stay correct (just slower) for
/// entities that wander off the map.
pub struct GridSpatialIndex {
    cells: Vec<RwLock<SpatialCell>>,
    grid_width: usize,
    grid_height: usize,
    cell_size: f32,
    world_min_x: f32,
    world_min_y: f32,

    // Position tracking for fast lookups
    positions: Arc<DashMap<EntityId, Vec2>>,
    // Cell index tracking for efficient updates
    entity_cells: Arc<DashMap<EntityId, usize>>,
}

impl GridSpatialIndex {
    pub fn new(
        world_width: f32,
        world_height: f32,
        world_min_x: f32,
        world_min_y: f32,
        cell_size: f32,
    ) -> Self {
        let grid_width = ((world_width / cell_size).ceil() as usize).max(1);
        let grid_height = ((world_height / cell_size).ceil() as usize).max(1);
        let total_cells = grid_width * grid_height;

        let mut cells = Vec::with_capacity(total_cells);
        for _ in 0..total_cells {
            cells.push(RwLock::new(SpatialCell::default()));
        }

        debug!(
            "Grid spatial index initialized: {}x{} grid, {} total cells, cell size: {}",
            grid_width, grid_height, total_cells, cell_size
        );

        GridSpatialIndex {
            cells,
            grid_width,
            grid_height,
            cell_size,
            world_min_x,
            world_min_y,
            positions: Arc::new(DashMap::new()),
            entity_cells: Arc::new(DashMap::new()),
        }
    }

    #[inline]
    fn grid_coord(&self, value: f32, min: f32, cells: usize) -> usize {
        let raw = ((value - min) / self.cell_size).floor();
        // NaN lands in cell 0 via the cast; callers filter non-finite input first.
        (raw.max(0.0) as usize).min(cells.saturating_sub(1))
    }

    #[inline]
    fn cell_index(&self, position: Vec2) -> usize {
        let gx = self.grid_coord(position.x, self.world_min_x, self.grid_width);
        let gy = self.grid_coord(position.y, self.world_min_y, self.grid_height);
        gy * self.grid_width + gx
    }

    fn cells_in_radius(&self, center: Vec2, radius: f32) -> impl Iterator<Item = usize> + '_ {
        let min_gx = self.grid_coord(center.x - radius, self.world_min_x, self.grid_width);
        let max_gx = self.grid_coord(center.x + radius, self.world_min_x, self.grid_width);
        let min_gy = self.grid_coord(center.y - radius, self.world_min_y, self.grid_height);
        let max_gy = self.grid_coord(center.y + radius, self.world_min_y, self.grid_height);
        let width = self.grid_width;
        (min_gy..=max_gy).flat_map(move |gy| (min_gx..=max_gx).map(move |gx| gy * width + gx))
    }

    pub fn update_position(&self, id: EntityId, position: Vec2) {
        if !position.is_finite() {
            self.remove(&id);
            return;
        }
        let new_cell_idx = self.cell_index(position);
        let old_cell_idx = self.entity_cells.get(&id).map(|entry| *entry.value());

        match old_cell_idx {
            Some(old_idx) if old_idx == new_cell_idx => {}
            Some(old_idx) => {
                if let Some(old_cell) = self.cells.get(old_idx) {
                    old_cell.write().entity_ids.remove(&id);
                }
                if let Some(new_cell) = self.cells.get(new_cell_idx) {
                    new_cell.write().entity_ids.insert(id);
                }
                self.entity_cells.insert(id, new_cell_idx);
            }
            None => {
                if let Some(new_cell) = self.cells.get(new_cell_idx) {
                    new_cell.write().entity_ids.insert(id);
                }
                self.entity_cells.insert(id, new_cell_idx);
            }
        }

        self.positions.insert(id, position);
    }

    pub fn remove(&self, id: &EntityId) {
        if let Some((_, cell_idx)) = self.entity_cells.remove(id) {
            if let Some(cell) = self.cells.get(cell_idx) {
                cell.write().entity_ids.remove(id);
            }
        }
        self.positions.remove(id);
    }

    pub fn position(&self, id: &EntityId) -> Option<Vec2> {
        self.positions.get(id).map(|entry| *entry.value())
    }

    /// Ids whose tracked position lies within `radius` of `center`.
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<EntityId> {
        if !center.is_finite() || !radius.is_finite() || radius < 0.0 {
            return Vec::new();
        }
        let radius_squared = radius * radius;
        let mut nearby = Vec::new();

        for cell_idx in self.cells_in_radius(center, radius) {
            if let Some(cell) = self.cells.get(cell_idx) {
                let cell_guard = cell.read();
                for id in &cell_guard.entity_ids {
                    if let Some(pos_entry) = self.positions.get(id) {
                        if pos_entry.value().distance_squared(center) <= radius_squared {
                            nearby.push(*id);
                        }
                    }
                }
            }
        }

        nearby
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get_stats(&self) -> SpatialIndexStats {
        let mut occupied_cells = 0;
        let mut max_entities_per_cell = 0;

        for cell in &self.cells {
            let count = cell.read().entity_ids.len();
            if count > 0 {
                occupied_cells += 1;
                max_entities_per_cell = max_entities_per_cell.max(count);
            }
        }

        SpatialIndexStats {
            total_entities: self.positions.len(),
            occupied_cells,
            total_cells: self.cells.len(),
            max_entities_per_cell,
        }
    }
}

#[derive(Debug)]
pub struct SpatialIndexStats {
    pub total_entities: usize,
    pub occupied_cells: usize,
    pub total_cells: usize,
    pub max_entities_per_cell: usize,
}
