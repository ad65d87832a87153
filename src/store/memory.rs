//! 内存存储实现

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::error::Result;
use super::traits::Store;

/// 内存字节存储
///
/// 使用 `HashMap` 存储 `哈希 -> 字节` 条目，主要用于测试。
///
/// # 共享句柄
///
/// 使用 `Arc<RwLock<HashMap>>` 实现内部可变性，`clone` 共享同一
/// 底层映射：同一存储上可以先 flush 一棵树，再用根哈希挂载另一棵。
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryStore {
    /// 创建空的内存存储
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 存储的条目数量
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// 检查存储是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// 清空所有数据
    pub fn clear(&mut self) {
        self.entries.write().unwrap().clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().unwrap().get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.entries.write().unwrap().remove(key);
        Ok(())
    }

    fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.entries.read().unwrap().contains_key(key))
    }
}
