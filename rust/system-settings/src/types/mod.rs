// Core types for governed settings
// Principle: Minimal, auditable, durable

pub mod primitives;
pub mod value;

pub use primitives::*;
pub use value::*;
