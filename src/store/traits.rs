//! Store trait 定义

use super::error::Result;

/// Content-addressed 字节存储 trait
///
/// 所有存储实现必须满足 `Send + Sync` 以支持跨线程移交。
///
/// # 核心操作
///
/// - `get`: 按哈希读取节点字节
/// - `put`: 写入 `哈希 -> 字节` 条目
/// - `delete`: 删除条目（节点被替换时清理旧版本）
/// - `flush`: 刷新缓冲区到持久化存储
///
/// # Content-Addressed 约定
///
/// Key 是 value 的 32 字节哈希，因此：
/// - 相同内容总是映射到相同的 key，`put` 是幂等的
/// - 条目一旦写入内容不会改变，只会被整体删除
///
/// Trie 不假设存储是事务性的：`flush` 返回前写入就可能可见。
pub trait Store: Send + Sync {
    /// 按 key 读取字节
    ///
    /// # 返回
    /// - `Ok(Some(bytes))`: 找到条目
    /// - `Ok(None)`: 条目不存在
    /// - `Err(_)`: 底层存储错误
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// 写入 key-value 条目
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()>;

    /// 删除条目
    ///
    /// 删除不存在的 key 不是错误。
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// 刷新缓冲区
    ///
    /// 将所有待写入的数据持久化到底层存储。
    /// 对于内存存储，此操作为空操作。
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// 检查条目是否存在
    ///
    /// 默认实现通过 get 检查，实现可覆盖以避免拷贝。
    fn contains(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}
