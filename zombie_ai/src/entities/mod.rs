pub mod zombie;
