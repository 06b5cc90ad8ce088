// Tests module
// Settings invariants: bound edges, cross-parameter rules, fresh reads
// Batch commit: exchange fee batches and sequential update lists
// Persistence: the same scenarios end to end on RocksDB

pub mod batch_commit;

use crate::types::{I256, U256};

/// `hundredths` of a unit, e.g. `pct(5)` = 0.05
pub fn pct(hundredths: u128) -> U256 {
    U256::new(hundredths * 10_000_000_000_000_000)
}

/// Signed counterpart of [`pct`]
pub fn spct(hundredths: i128) -> I256 {
    I256::new(hundredths * 10_000_000_000_000_000)
}

/// Deterministic test address derived from a seed byte
pub fn create_address(seed: u8) -> crate::types::Address {
    let mut bytes = [0u8; 20];
    bytes[0] = seed;
    bytes[19] = seed.wrapping_add(1);
    crate::types::Address::from_bytes(bytes)
}
