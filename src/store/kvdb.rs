//! 基于 kvdb 的存储实现

#![cfg(feature = "kvdb-backend")]

use std::sync::Arc;

use kvdb::{DBTransaction, KeyValueDB};

use super::error::{Result, StoreError};
use super::traits::Store;

/// 基于 kvdb 的字节存储
///
/// 单 column 布局：key 直接使用节点的 32 字节哈希。
///
/// # 示例
///
/// ```ignore
/// use kvdb_memorydb;
/// use persistent_mpt::KvStore;
///
/// let db = Arc::new(kvdb_memorydb::create(1));
/// let store = KvStore::new(db, 0);
/// ```
pub struct KvStore {
    db: Arc<dyn KeyValueDB>,
    column: u32,
}

impl KvStore {
    /// 创建新的 KvStore
    ///
    /// # 参数
    /// - `db`: kvdb 后端（RocksDB、MDBX、内存等）
    /// - `column`: 存放节点条目的 column family
    pub fn new(db: Arc<dyn KeyValueDB>, column: u32) -> Self {
        Self { db, column }
    }
}

impl Store for KvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        match self.db.get(self.column, key) {
            Ok(value) => Ok(value.map(|bytes| bytes.to_vec())),
            Err(e) => Err(StoreError::StorageError(e.to_string())),
        }
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut tx = DBTransaction::new();
        tx.put(self.column, key, value);
        self.db
            .write(tx)
            .map_err(|e| StoreError::StorageError(e.to_string()))
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        let mut tx = DBTransaction::new();
        tx.delete(self.column, key);
        self.db
            .write(tx)
            .map_err(|e| StoreError::StorageError(e.to_string()))
    }

    fn flush(&mut self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| StoreError::StorageError(e.to_string()))
    }

    fn contains(&self, key: &[u8]) -> Result<bool> {
        match self.db.get(self.column, key) {
            Ok(Some(_)) => Ok(true),
            Ok(None) => Ok(false),
            Err(e) => Err(StoreError::StorageError(e.to_string())),
        }
    }
}
