// Flexible storage - Typed (module, key) store consumed by the settings layer
// Principle: The validator never touches raw bytes, only the four typed families

use super::db::{Database, DatabaseError};
use crate::types::{Address, SettingValue, StorageKey, ValueKind, I256, U256};
use serde::{Deserialize, Serialize};

/// Typed key-value store addressed by `(module, key)`.
///
/// Reads of keys that were never written return the zero value of the
/// requested kind.
pub trait FlexibleStorage {
    fn get_uint(&self, module: &str, key: &StorageKey) -> Result<U256, DatabaseError>;
    fn set_uint(&mut self, module: &str, key: &StorageKey, value: U256) -> Result<(), DatabaseError>;

    fn get_int(&self, module: &str, key: &StorageKey) -> Result<I256, DatabaseError>;
    fn set_int(&mut self, module: &str, key: &StorageKey, value: I256) -> Result<(), DatabaseError>;

    fn get_bool(&self, module: &str, key: &StorageKey) -> Result<bool, DatabaseError>;
    fn set_bool(&mut self, module: &str, key: &StorageKey, value: bool) -> Result<(), DatabaseError>;

    fn get_address(&self, module: &str, key: &StorageKey) -> Result<Address, DatabaseError>;
    fn set_address(&mut self, module: &str, key: &StorageKey, value: Address) -> Result<(), DatabaseError>;

    /// Read through the typed family matching `kind`
    fn get_value(&self, module: &str, key: &StorageKey, kind: ValueKind) -> Result<SettingValue, DatabaseError> {
        Ok(match kind {
            ValueKind::UInt => SettingValue::UInt(self.get_uint(module, key)?),
            ValueKind::Int => SettingValue::Int(self.get_int(module, key)?),
            ValueKind::Bool => SettingValue::Bool(self.get_bool(module, key)?),
            ValueKind::Address => SettingValue::Address(self.get_address(module, key)?),
        })
    }

    /// Write through the typed family matching the value
    fn set_value(&mut self, module: &str, key: &StorageKey, value: SettingValue) -> Result<(), DatabaseError> {
        match value {
            SettingValue::UInt(v) => self.set_uint(module, key, v),
            SettingValue::Int(v) => self.set_int(module, key, v),
            SettingValue::Bool(v) => self.set_bool(module, key, v),
            SettingValue::Address(v) => self.set_address(module, key, v),
        }
    }
}

// =============================================================================
// ROCKSDB-BACKED STORE
// =============================================================================

/// Storage key prefixes (one namespace per typed family)
const PREFIX_UINT: &[u8] = b"uint:";
const PREFIX_INT: &[u8] = b"int:";
const PREFIX_BOOL: &[u8] = b"bool:";
const PREFIX_ADDRESS: &[u8] = b"addr:";

/// On-disk encoding of a stored value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum StoredValue {
    UInt([u8; 32]),
    Int([u8; 32]),
    Bool(bool),
    Address([u8; 20]),
}

/// Persistent settings store on top of RocksDB
pub struct RocksStorage {
    db: Database,
}

impl RocksStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn record_key(prefix: &[u8], module: &str, key: &StorageKey) -> Vec<u8> {
        let mut raw = Vec::with_capacity(prefix.len() + module.len() + 1 + 32);
        raw.extend_from_slice(prefix);
        raw.extend_from_slice(module.as_bytes());
        raw.push(b':');
        raw.extend_from_slice(key.as_bytes());
        raw
    }

    fn load(&self, prefix: &[u8], module: &str, key: &StorageKey) -> Result<Option<StoredValue>, DatabaseError> {
        match self.db.get(&Self::record_key(prefix, module, key))? {
            Some(bytes) => bincode::deserialize(&bytes)
                .map(Some)
                .map_err(|e| DatabaseError::SerializationFailed(e.to_string())),
            None => Ok(None),
        }
    }

    fn store(&self, prefix: &[u8], module: &str, key: &StorageKey, value: &StoredValue) -> Result<(), DatabaseError> {
        let bytes = bincode::serialize(value)
            .map_err(|e| DatabaseError::SerializationFailed(e.to_string()))?;
        self.db.put(&Self::record_key(prefix, module, key), &bytes)
    }

    fn corrupt(key: &StorageKey, found: &StoredValue) -> DatabaseError {
        DatabaseError::SerializationFailed(format!("unexpected record {:?} under key {}", found, key))
    }
}

impl FlexibleStorage for RocksStorage {
    fn get_uint(&self, module: &str, key: &StorageKey) -> Result<U256, DatabaseError> {
        match self.load(PREFIX_UINT, module, key)? {
            Some(StoredValue::UInt(bytes)) => Ok(U256::from_be_bytes(bytes)),
            Some(other) => Err(Self::corrupt(key, &other)),
            None => Ok(U256::ZERO),
        }
    }

    fn set_uint(&mut self, module: &str, key: &StorageKey, value: U256) -> Result<(), DatabaseError> {
        self.store(PREFIX_UINT, module, key, &StoredValue::UInt(value.to_be_bytes()))
    }

    fn get_int(&self, module: &str, key: &StorageKey) -> Result<I256, DatabaseError> {
        match self.load(PREFIX_INT, module, key)? {
            Some(StoredValue::Int(bytes)) => Ok(I256::from_be_bytes(bytes)),
            Some(other) => Err(Self::corrupt(key, &other)),
            None => Ok(I256::ZERO),
        }
    }

    fn set_int(&mut self, module: &str, key: &StorageKey, value: I256) -> Result<(), DatabaseError> {
        self.store(PREFIX_INT, module, key, &StoredValue::Int(value.to_be_bytes()))
    }

    fn get_bool(&self, module: &str, key: &StorageKey) -> Result<bool, DatabaseError> {
        match self.load(PREFIX_BOOL, module, key)? {
            Some(StoredValue::Bool(v)) => Ok(v),
            Some(other) => Err(Self::corrupt(key, &other)),
            None => Ok(false),
        }
    }

    fn set_bool(&mut self, module: &str, key: &StorageKey, value: bool) -> Result<(), DatabaseError> {
        self.store(PREFIX_BOOL, module, key, &StoredValue::Bool(value))
    }

    fn get_address(&self, module: &str, key: &StorageKey) -> Result<Address, DatabaseError> {
        match self.load(PREFIX_ADDRESS, module, key)? {
            Some(StoredValue::Address(bytes)) => Ok(Address::from_bytes(bytes)),
            Some(other) => Err(Self::corrupt(key, &other)),
            None => Ok(Address::ZERO),
        }
    }

    fn set_address(&mut self, module: &str, key: &StorageKey, value: Address) -> Result<(), DatabaseError> {
        self.store(PREFIX_ADDRESS, module, key, &StoredValue::Address(*value.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> RocksStorage {
        RocksStorage::new(Database::open(dir.path()).unwrap())
    }

    #[test]
    fn test_unset_keys_read_as_zero() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let key = StorageKey::from_bytes([1; 32]);

        assert_eq!(store.get_uint("SystemSettings", &key).unwrap(), U256::ZERO);
        assert_eq!(store.get_int("SystemSettings", &key).unwrap(), I256::ZERO);
        assert!(!store.get_bool("SystemSettings", &key).unwrap());
        assert!(store.get_address("SystemSettings", &key).unwrap().is_zero());
    }

    #[test]
    fn test_typed_families_are_separate() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let key = StorageKey::from_bytes([2; 32]);

        store.set_uint("SystemSettings", &key, U256::MAX).unwrap();
        store.set_int("SystemSettings", &key, I256::new(-42)).unwrap();

        assert_eq!(store.get_uint("SystemSettings", &key).unwrap(), U256::MAX);
        assert_eq!(store.get_int("SystemSettings", &key).unwrap(), I256::new(-42));
        assert!(!store.get_bool("SystemSettings", &key).unwrap());
    }

    #[test]
    fn test_modules_are_separate() {
        let dir = TempDir::new().unwrap();
        let mut store = open_store(&dir);
        let key = StorageKey::from_bytes([3; 32]);

        store.set_bool("SystemSettings", &key, true).unwrap();
        assert!(store.get_bool("SystemSettings", &key).unwrap());
        assert!(!store.get_bool("OtherModule", &key).unwrap());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let key = StorageKey::from_bytes([4; 32]);
        let wrapper = Address::from_bytes([9; 20]);
        {
            let mut store = open_store(&dir);
            store.set_address("SystemSettings", &key, wrapper).unwrap();
        }
        let store = open_store(&dir);
        assert_eq!(store.get_address("SystemSettings", &key).unwrap(), wrapper);
    }
}
