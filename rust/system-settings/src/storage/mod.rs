// Storage - Persistence layer (RocksDB + in-memory)
// Principle: The settings layer only sees the typed FlexibleStorage seam

pub mod db;
pub mod flexible;
pub mod memory;

pub use db::*;
pub use flexible::*;
pub use memory::*;
