// MarketStore - Persistent key-value storage using sled
//
// Provides typed access for storing:
// - Marketplace state snapshots
// - Pending vouchers awaiting fulfillment

use crate::market::Marketplace;
use crate::voucher::{Voucher, VoucherCodec, VoucherId};
use std::path::Path;
use thiserror::Error;

/// Key prefixes for organizing data
mod keys {
    pub const MARKET_STATE: &[u8] = b"market:state";
    pub const VOUCHER_PREFIX: &[u8] = b"voucher:";
}

/// Errors from storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Flush failed: {0}")]
    FlushFailed(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

/// Statistics about the storage
#[derive(Clone, Debug)]
pub struct StorageStats {
    /// Number of keys in the database
    pub key_count: usize,
    /// Approximate disk size in bytes
    pub disk_size_bytes: u64,
}

/// Persistent key-value store for marketplace data
///
/// Uses sled for crash-safe, embedded storage.
/// All writes are atomic and durable after flush.
pub struct MarketStore {
    db: sled::Db,
}

impl MarketStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        Ok(Self { db })
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.db.is_empty())
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::FlushFailed(e.to_string()))?;
        Ok(())
    }

    /// Get storage statistics
    pub fn stats(&self) -> Result<StorageStats, StoreError> {
        Ok(StorageStats {
            key_count: self.db.len(),
            disk_size_bytes: self.db.size_on_disk().unwrap_or(0),
        })
    }

    // ========================================================================
    // RAW KEY-VALUE OPERATIONS
    // ========================================================================

    /// Put raw bytes
    pub fn put_raw(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.db.insert(key, value)?;
        Ok(())
    }

    /// Get raw bytes
    pub fn get_raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key)?.map(|v| v.to_vec()))
    }

    /// Delete a key
    pub fn delete(&self, key: &[u8]) -> Result<(), StoreError> {
        self.db.remove(key)?;
        Ok(())
    }

    /// List all keys with a given prefix
    pub fn list_keys_with_prefix(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>, StoreError> {
        let mut keys = Vec::new();
        for result in self.db.scan_prefix(prefix) {
            let (key, _) = result?;
            keys.push(key.to_vec());
        }
        Ok(keys)
    }

    // ========================================================================
    // MARKETPLACE PERSISTENCE
    // ========================================================================

    /// Save the marketplace state snapshot
    pub fn save_marketplace(&self, marketplace: &Marketplace) -> Result<(), StoreError> {
        let bytes = marketplace.to_bytes();
        self.put_raw(keys::MARKET_STATE, &bytes)
    }

    /// Load the marketplace state snapshot
    pub fn load_marketplace(&self) -> Result<Option<Marketplace>, StoreError> {
        match self.get_raw(keys::MARKET_STATE)? {
            Some(bytes) => {
                let marketplace = Marketplace::from_bytes(&bytes)
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(marketplace))
            }
            None => Ok(None),
        }
    }

    // ========================================================================
    // VOUCHER PERSISTENCE
    // ========================================================================

    /// Save a voucher, keyed by its digest id
    pub fn save_voucher(&self, voucher: &Voucher) -> Result<(), StoreError> {
        let id = voucher.id();
        let key = [keys::VOUCHER_PREFIX, id.as_bytes().as_slice()].concat();
        self.put_raw(&key, &VoucherCodec::encode(voucher))
    }

    /// Load a voucher by its digest id
    pub fn load_voucher(&self, id: &VoucherId) -> Result<Option<Voucher>, StoreError> {
        let key = [keys::VOUCHER_PREFIX, id.as_bytes().as_slice()].concat();
        match self.get_raw(&key)? {
            Some(bytes) => {
                let voucher = VoucherCodec::decode(&bytes)
                    .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(voucher))
            }
            None => Ok(None),
        }
    }

    /// List all stored vouchers
    pub fn list_vouchers(&self) -> Result<Vec<Voucher>, StoreError> {
        let mut vouchers = Vec::new();
        for result in self.db.scan_prefix(keys::VOUCHER_PREFIX) {
            let (_, value) = result?;
            let voucher = VoucherCodec::decode(&value)
                .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
            vouchers.push(voucher);
        }
        Ok(vouchers)
    }
}
