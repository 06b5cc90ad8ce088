// System Settings - Bounded, cross-checked protocol parameters
// Principle: Power is slow, mistakes are refused before they are stored

pub mod cli;
pub mod settings;
pub mod storage;
pub mod types;

#[cfg(test)]
mod tests;
