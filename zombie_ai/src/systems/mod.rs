pub mod ai;
pub mod horde;
