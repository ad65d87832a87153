//! 带 Write-Back 缓存的存储包装器
//!
//! - get 操作：先查缓存，未命中则读取底层存储并缓存（标记为 Clean）
//! - put 操作：直接写入缓存（标记为 Dirty）
//! - delete 操作：在缓存中标记为 Removed，flush 时才作用到底层
//! - flush 操作：将所有 Dirty / Removed 条目应用到底层存储，然后清空缓存

use std::collections::HashMap;
use std::sync::RwLock;

use super::error::Result;
use super::traits::Store;

/// 缓存条目状态
#[derive(Clone)]
enum CacheState {
    /// 从存储读取的干净数据（不需要写回）
    Clean(Vec<u8>),
    /// 新写入的脏数据（待持久化）
    Dirty(Vec<u8>),
    /// 已删除（待从底层存储移除）
    Removed,
}

/// 缓存统计信息
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    /// 缓存命中次数
    pub hits: u64,
    /// 缓存未命中次数
    pub misses: u64,
    /// flush 时写入的条目数
    pub entries_flushed: u64,
    /// flush 时删除的条目数
    pub entries_removed: u64,
}

impl CacheStats {
    /// 缓存命中率
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// 带 Write-Back 缓存的字节存储
///
/// 装饰器模式：包装任意 `Store` 实现，添加缓存层。
///
/// # 使用示例
///
/// ```ignore
/// let mut store = CachedStore::new(KvStore::new(db, 0));
///
/// // 执行操作（写入缓存）
/// store.put(&hash, &bytes)?;
///
/// // 批量写入底层存储
/// store.flush()?;
/// ```
///
/// # 缓存策略
///
/// - **Write-Back**: put/delete 只作用于缓存，flush 时批量应用到底层
/// - **Clean/Dirty/Removed 状态**: 区分读入的干净数据、待写入的
///   脏数据和待删除的条目
/// - **flush 后清空**: flush 将缓存整体清空，之后的读取重新走底层
pub struct CachedStore<S: Store> {
    /// 底层存储
    inner: S,
    /// 条目缓存
    cache: RwLock<HashMap<Vec<u8>, CacheState>>,
    /// 缓存统计
    stats: RwLock<CacheStats>,
}

impl<S: Store> CachedStore<S> {
    /// 创建带缓存的存储
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// 当前统计信息的快照
    pub fn stats(&self) -> CacheStats {
        self.stats.read().unwrap().clone()
    }

    /// 缓存中的条目数量（含 Removed 标记）
    pub fn cached_len(&self) -> usize {
        self.cache.read().unwrap().len()
    }

    /// 取回底层存储，丢弃未 flush 的缓存内容
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Store> Store for CachedStore<S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if let Some(state) = self.cache.read().unwrap().get(key) {
            self.stats.write().unwrap().hits += 1;
            return Ok(match state {
                CacheState::Clean(bytes) | CacheState::Dirty(bytes) => Some(bytes.clone()),
                CacheState::Removed => None,
            });
        }

        self.stats.write().unwrap().misses += 1;
        let value = self.inner.get(key)?;
        if let Some(bytes) = &value {
            self.cache
                .write()
                .unwrap()
                .insert(key.to_vec(), CacheState::Clean(bytes.clone()));
        }
        Ok(value)
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        self.cache
            .write()
            .unwrap()
            .insert(key.to_vec(), CacheState::Dirty(value.to_vec()));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.cache
            .write()
            .unwrap()
            .insert(key.to_vec(), CacheState::Removed);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let mut cache = self.cache.write().unwrap();
        let mut stats = self.stats.write().unwrap();

        for (key, state) in cache.drain() {
            match state {
                CacheState::Dirty(bytes) => {
                    self.inner.put(&key, &bytes)?;
                    stats.entries_flushed += 1;
                }
                CacheState::Removed => {
                    self.inner.delete(&key)?;
                    stats.entries_removed += 1;
                }
                CacheState::Clean(_) => {}
            }
        }

        self.inner.flush()
    }

    fn contains(&self, key: &[u8]) -> Result<bool> {
        if let Some(state) = self.cache.read().unwrap().get(key) {
            return Ok(!matches!(state, CacheState::Removed));
        }
        self.inner.contains(key)
    }
}
