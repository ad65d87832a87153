//! NodeRecord 核心结构体

use log::trace;

use crate::error::{TrieError, TrieResult};
use crate::hash::HashOutput;
use crate::nibble::NibbleKey;
use crate::store::Store;

use super::types::NodeKind;

/// 带缓存元数据的节点记录
///
/// 一个节点同时维护三种表示，按需在彼此之间转换：
/// - `hash`: 32 字节 content address（节点已存储时有效）
/// - `serialized`: RLP 序列化字节（从存储读出或 inline 编码时有效）
/// - `parsed`: 结构化视图（首次访问时从 `serialized` 解码）
///
/// # 不变量
///
/// 1. 任何时刻 `hash`、`serialized`、`parsed` 至少有一个非空
/// 2. `dirty == true` 时 `hash` 与 `serialized` 视为过期，
///    对外可见前必须经过 `encode` 重算
/// 3. `encode` 成功后 `dirty == false`，且（非 inline 节点）
///    `hash` 对应的记录已写入存储
#[derive(Debug)]
pub struct NodeRecord {
    pub(super) hash: Option<HashOutput>,
    pub(super) serialized: Option<Vec<u8>>,
    pub(super) parsed: Option<NodeKind>,
    pub(super) dirty: bool,
}

impl NodeRecord {
    // ========================================================================
    // 构造函数
    // ========================================================================

    /// 仅持有哈希的惰性 stub（从存储 resolve 后才可访问结构）
    pub fn from_hash(hash: HashOutput) -> Self {
        Self {
            hash: Some(hash),
            serialized: None,
            parsed: None,
            dirty: false,
        }
    }

    /// 从序列化字节构造（inline 子节点，尚未解析）
    pub fn from_serialized(bytes: Vec<u8>) -> Self {
        Self {
            hash: None,
            serialized: Some(bytes),
            parsed: None,
            dirty: false,
        }
    }

    /// 从结构化视图构造（新建节点，天然 dirty）
    pub fn from_kind(kind: NodeKind) -> Self {
        Self {
            hash: None,
            serialized: None,
            parsed: Some(kind),
            dirty: true,
        }
    }

    /// 新建叶子节点
    pub fn leaf(key: NibbleKey, value: Vec<u8>) -> Self {
        Self::from_kind(NodeKind::Leaf {
            key: key.as_terminal(),
            value,
        })
    }

    /// 新建扩展节点
    pub fn extension(key: NibbleKey, child: NodeRecord) -> Self {
        Self::from_kind(NodeKind::Extension {
            key,
            child: Box::new(child),
        })
    }

    /// 新建空 Branch 节点
    pub fn empty_branch() -> Self {
        Self::from_kind(NodeKind::empty_branch())
    }

    // ========================================================================
    // 状态访问
    // ========================================================================

    /// 当前 content address（dirty 时为过期值，仅用于 dispose）
    #[inline]
    pub fn hash(&self) -> Option<&HashOutput> {
        self.hash.as_ref()
    }

    /// 是否有未序列化的变更
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 标记为已变更：hash 与 serialized 进入过期状态
    ///
    /// 过期的 hash 保留到下一次 `encode`，用于删除旧的存储条目。
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    // ========================================================================
    // 惰性 resolve / parse
    // ========================================================================

    /// 确保 `serialized` 可用：仅持有哈希时从存储读取
    pub fn resolve<S: Store>(&mut self, store: &S) -> TrieResult<()> {
        if self.serialized.is_some() || self.parsed.is_some() {
            return Ok(());
        }
        let hash = self
            .hash
            .ok_or(TrieError::InvalidState("node record with no state at all"))?;
        trace!("resolving node {:02x}{:02x}..", hash[0], hash[1]);
        let bytes = store.get(&hash)?.ok_or(TrieError::MissingNode(hash))?;
        self.serialized = Some(bytes);
        Ok(())
    }

    /// 确保 `parsed` 可用：必要时先 resolve 再解码
    pub fn ensure_parsed<S: Store>(&mut self, store: &S) -> TrieResult<()> {
        if self.parsed.is_some() {
            return Ok(());
        }
        self.resolve(store)?;
        let bytes = self
            .serialized
            .as_ref()
            .expect("serialized is populated after resolve");
        self.parsed = Some(super::codec::decode_kind(bytes)?);
        Ok(())
    }

    /// 结构化视图（调用方保证已 `ensure_parsed`）
    #[inline]
    pub fn kind(&self) -> &NodeKind {
        self.parsed.as_ref().expect("node must be parsed before access")
    }

    /// 结构化视图的可变引用（调用方保证已 `ensure_parsed`）
    #[inline]
    pub fn kind_mut(&mut self) -> &mut NodeKind {
        self.parsed.as_mut().expect("node must be parsed before access")
    }

    /// 拆出当前哈希与结构化视图，消耗记录（调用方保证已 `ensure_parsed`）
    ///
    /// 变更算法用它接管节点：转换视图后经 `from_parts` 重组，
    /// 或在节点被整体替换时显式 dispose 旧哈希。
    #[inline]
    pub fn into_parts(self) -> (Option<HashOutput>, NodeKind) {
        (
            self.hash,
            self.parsed.expect("node must be parsed before access"),
        )
    }

    /// 由结构化视图与旧哈希重组记录（天然 dirty）
    ///
    /// 保留旧哈希使得下一次 `encode` 能删除被替换的存储条目。
    pub fn from_parts(hash: Option<HashOutput>, kind: NodeKind) -> Self {
        Self {
            hash,
            serialized: None,
            parsed: Some(kind),
            dirty: true,
        }
    }

    // ========================================================================
    // Dispose
    // ========================================================================

    /// 从存储中删除本节点当前的哈希条目（若有）
    ///
    /// 节点被替换时调用，保持存储中没有不可达的旧版本。
    /// 不递归处理子节点：子节点可能仍被其他根引用。
    pub fn dispose<S: Store>(&self, store: &mut S) -> TrieResult<()> {
        if let Some(hash) = &self.hash {
            store.delete(hash)?;
        }
        Ok(())
    }
}
