// In-memory store - Used by tests and dry runs
use super::db::DatabaseError;
use super::flexible::FlexibleStorage;
use crate::types::{Address, StorageKey, I256, U256};
use std::collections::HashMap;

type RecordId = (String, StorageKey);

/// HashMap-backed [`FlexibleStorage`], one map per typed family
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    uints: HashMap<RecordId, U256>,
    ints: HashMap<RecordId, I256>,
    bools: HashMap<RecordId, bool>,
    addresses: HashMap<RecordId, Address>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful writes since creation
    pub fn write_count(&self) -> usize {
        self.writes
    }

    fn id(module: &str, key: &StorageKey) -> RecordId {
        (module.to_string(), *key)
    }
}

impl FlexibleStorage for MemoryStorage {
    fn get_uint(&self, module: &str, key: &StorageKey) -> Result<U256, DatabaseError> {
        Ok(self.uints.get(&Self::id(module, key)).copied().unwrap_or(U256::ZERO))
    }

    fn set_uint(&mut self, module: &str, key: &StorageKey, value: U256) -> Result<(), DatabaseError> {
        self.uints.insert(Self::id(module, key), value);
        self.writes += 1;
        Ok(())
    }

    fn get_int(&self, module: &str, key: &StorageKey) -> Result<I256, DatabaseError> {
        Ok(self.ints.get(&Self::id(module, key)).copied().unwrap_or(I256::ZERO))
    }

    fn set_int(&mut self, module: &str, key: &StorageKey, value: I256) -> Result<(), DatabaseError> {
        self.ints.insert(Self::id(module, key), value);
        self.writes += 1;
        Ok(())
    }

    fn get_bool(&self, module: &str, key: &StorageKey) -> Result<bool, DatabaseError> {
        Ok(self.bools.get(&Self::id(module, key)).copied().unwrap_or(false))
    }

    fn set_bool(&mut self, module: &str, key: &StorageKey, value: bool) -> Result<(), DatabaseError> {
        self.bools.insert(Self::id(module, key), value);
        self.writes += 1;
        Ok(())
    }

    fn get_address(&self, module: &str, key: &StorageKey) -> Result<Address, DatabaseError> {
        Ok(self.addresses.get(&Self::id(module, key)).copied().unwrap_or(Address::ZERO))
    }

    fn set_address(&mut self, module: &str, key: &StorageKey, value: Address) -> Result<(), DatabaseError> {
        self.addresses.insert(Self::id(module, key), value);
        self.writes += 1;
        Ok(())
    }
}
