//! MptTree 核心结构体

use std::marker::PhantomData;

use log::debug;

use crate::error::TrieResult;
use crate::hash::{HashOutput, Hasher, Keccak256Hasher};
use crate::node::NodeRecord;
use crate::store::Store;

/// Merkle Patricia Trie
///
/// 认证的持久化 key-value 映射：根哈希唯一确定整个映射的内容，
/// 同一存储上按任意历史根哈希重新挂载都能得到当时的逻辑映射。
///
/// # 类型参数
///
/// - `S`: 字节存储实现，必须实现 `Store` trait
/// - `H`: 哈希算法，默认 Keccak256（以太坊 wire format 兼容）
///
/// # 并发
///
/// 单线程变更。需要并发时由单一持有者串行化操作，
/// 用 `root_hash` + `set_root` 在独立实例上做快照。
pub struct MptTree<S: Store, H: Hasher = Keccak256Hasher> {
    pub(super) store: S,
    pub(super) root: Option<NodeRecord>,
    empty_root_hash: HashOutput,
    _marker: PhantomData<H>,
}

impl<S: Store, H: Hasher> MptTree<S, H> {
    /// 创建空树
    pub fn new(store: S) -> Self {
        Self {
            store,
            root: None,
            // 空 trie 哨兵：空字节串 RLP 编码的哈希
            empty_root_hash: H::hash(&rlp::NULL_RLP),
            _marker: PhantomData,
        }
    }

    /// 创建挂载到指定根哈希的树
    pub fn with_root(store: S, root_hash: HashOutput) -> Self {
        let mut tree = Self::new(store);
        tree.set_root(root_hash);
        tree
    }

    /// 空 trie 的哨兵根哈希：`H(rlp(""))`
    #[inline]
    pub fn empty_root_hash(&self) -> HashOutput {
        self.empty_root_hash
    }

    /// 检查树是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// 获取存储引用
    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// 获取可变存储引用
    #[inline]
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// 当前根哈希
    ///
    /// 强制编码根节点：所有可达的 dirty 节点按 post-order 写入存储，
    /// 返回时根哈希认证的内容已完整持久化。空树返回哨兵哈希。
    pub fn root_hash(&mut self) -> TrieResult<HashOutput> {
        match &mut self.root {
            None => Ok(self.empty_root_hash),
            Some(root) => {
                root.encode::<S, H>(&mut self.store, true)?;
                Ok(*root.hash().expect("root hash populated after forced encode"))
            }
        }
    }

    /// 丢弃当前内存根，改挂到指定根哈希
    ///
    /// 传入空 trie 哨兵哈希或全零哈希则变为空树；否则根成为仅持
    /// 哈希的惰性 stub，后续操作按需从存储 resolve。
    pub fn set_root(&mut self, root_hash: HashOutput) {
        if root_hash == self.empty_root_hash || root_hash == [0u8; 32] {
            self.root = None;
        } else {
            self.root = Some(NodeRecord::from_hash(root_hash));
        }
    }

    /// 持久化 dirty 的根并收缩为哈希 stub
    ///
    /// 已 resolve 的子树随之释放，后续访问重新从存储读取。
    /// 返回是否有实际编码工作发生。
    pub fn flush(&mut self) -> TrieResult<bool> {
        let flushed = match &mut self.root {
            None => false,
            Some(root) => {
                let was_dirty = root.is_dirty() || root.hash().is_none();
                if was_dirty {
                    root.encode::<S, H>(&mut self.store, true)?;
                }
                let hash = *root.hash().expect("root hash populated after encode");
                debug!("flush: trie root is {:02x}{:02x}..", hash[0], hash[1]);
                self.root = Some(NodeRecord::from_hash(hash));
                was_dirty
            }
        };
        self.store.flush()?;
        Ok(flushed)
    }
}
