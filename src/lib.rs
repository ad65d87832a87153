//! PersistentMPT: Merkle Patricia Trie 的持久化 Rust 实现
//!
//! 本 crate 实现了以太坊风格的 Merkle Patricia Trie（MPT），
//! 节点以 content-addressed 方式存储在可插拔的字节存储后端中。
//!
//! # 项目背景
//!
//! 这是 authenticated-storage-benchmarks 系列的 MPT 基线工程，
//! 用于与 M-HOT 等 authenticated storage 结构进行性能对比。
//!
//! # 核心设计决策
//!
//! 1. **Content-Addressed 存储**：每个节点以其 RLP 序列化的哈希为 key
//!    存入存储后端，根哈希即可认证整棵树的内容。
//!
//! 2. **以太坊兼容 wire format**：节点记录使用 RLP 编码，key 使用
//!    hex-prefix（packed nibble）编码，哈希使用 Keccak256。相同的
//!    键值集合产生与以太坊 MPT 完全一致的根哈希。
//!
//! 3. **惰性 resolve/encode**：仅持有哈希的节点在首次访问时从存储
//!    读取并解析；变更只标记 dirty，序列化与哈希计算推迟到
//!    `root_hash` / `flush`。
//!
//! 4. **模块化 Hash 支持**：可在 Keccak256 和 Blake3 之间切换，
//!    便于公平对比不同算法的性能。
//!
//! # 使用示例
//!
//! ```rust
//! use persistent_mpt::{MemoryStore, MptTree};
//!
//! let mut trie: MptTree<MemoryStore> = MptTree::new(MemoryStore::new());
//!
//! trie.put(b"dog", b"puppy".to_vec()).unwrap();
//! assert_eq!(trie.get(b"dog").unwrap(), Some(b"puppy".to_vec()));
//!
//! // 根哈希认证整个映射
//! let root = trie.root_hash().unwrap();
//!
//! // 从根哈希重新加载得到相同的逻辑映射
//! let store = trie.store().clone();
//! let mut reloaded: MptTree<MemoryStore> = MptTree::with_root(store, root);
//! assert_eq!(reloaded.get(b"dog").unwrap(), Some(b"puppy".to_vec()));
//! ```

pub mod error;
pub mod hash;
pub mod nibble;
pub mod node;
pub mod store;
pub mod trie;

// 重新导出常用类型
pub use error::{TrieError, TrieResult};
pub use hash::{Blake3Hasher, HashOutput, Hasher, Keccak256Hasher};
pub use nibble::NibbleKey;
pub use node::{NodeKind, NodeRecord, ValueOrNode};
pub use store::{CacheStats, CachedStore, MemoryStore, Store, StoreError};
pub use trie::MptTree;

#[cfg(feature = "kvdb-backend")]
pub use store::KvStore;
