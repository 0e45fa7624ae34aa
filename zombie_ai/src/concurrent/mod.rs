pub mod enemy_index;
pub mod obstacle_index;
pub mod spatial_index;
