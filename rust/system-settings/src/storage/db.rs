// Database - RocksDB handle behind the settings store
use rocksdb::{Options, DB};
use std::path::Path;
use std::sync::Arc;

/// Raw byte-keyed RocksDB handle
pub struct Database {
    db: Arc<DB>,
}

impl Database {
    /// Open the database, creating it if missing
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DatabaseError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        // Settings volume is tiny, keep the file footprint small
        opts.set_keep_log_file_num(2);
        opts.set_max_background_jobs(1);

        tracing::debug!("Opening settings database at {:?}", path.as_ref());
        let db = DB::open(&opts, path).map_err(|e| DatabaseError::OpenFailed(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, DatabaseError> {
        self.db
            .get(key)
            .map_err(|e| DatabaseError::ReadFailed(e.to_string()))
    }

    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<(), DatabaseError> {
        self.db
            .put(key, value)
            .map_err(|e| DatabaseError::WriteFailed(e.to_string()))
    }
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Failed to open settings database: {0}")]
    OpenFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Corrupt record: {0}")]
    SerializationFailed(String),
}
