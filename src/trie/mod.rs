//! MptTree 模块
//!
//! 提供 trie-level 的 get/put/delete 操作与根生命周期管理
//! （root_hash / set_root / flush），基于 `NodeRecord` 节点和
//! `Store` 存储抽象。

mod core;
mod delete;
mod insert;
mod lookup;


// Re-export 公开 API
pub use self::core::MptTree;
