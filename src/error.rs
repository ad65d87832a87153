//! Trie 层错误类型

use crate::hash::HashOutput;
use crate::store::StoreError;

/// Trie 操作错误类型
///
/// 错误分类：
/// - `MissingNode`: 内存中持有某个哈希，但存储中没有对应条目
///   （存储损坏或 root 指向了未持久化的状态）
/// - `InvalidState`: 逻辑不变量被破坏（如向 terminal key 追加 nibble）
/// - `Decode`: 存储中的节点字节不是合法的 RLP 节点记录
/// - `Store`: 底层存储错误
///
/// key 不存在不是错误，`get` 返回 `Ok(None)`。
#[derive(Debug)]
pub enum TrieError {
    /// 节点哈希在存储中无对应条目
    MissingNode(HashOutput),
    /// 逻辑不变量被破坏（bug 或存储损坏）
    InvalidState(&'static str),
    /// RLP 解码失败
    Decode(rlp::DecoderError),
    /// 底层存储错误
    Store(StoreError),
}

impl std::fmt::Display for TrieError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrieError::MissingNode(hash) => {
                write!(f, "Missing node for hash ")?;
                for byte in hash.iter() {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
            TrieError::InvalidState(msg) => write!(f, "Invalid trie state: {}", msg),
            TrieError::Decode(err) => write!(f, "Node decode error: {}", err),
            TrieError::Store(err) => write!(f, "Store error: {}", err),
        }
    }
}

impl std::error::Error for TrieError {}

impl From<StoreError> for TrieError {
    fn from(err: StoreError) -> Self {
        TrieError::Store(err)
    }
}

impl From<rlp::DecoderError> for TrieError {
    fn from(err: rlp::DecoderError) -> Self {
        TrieError::Decode(err)
    }
}

/// Trie 操作 Result 类型
pub type TrieResult<T> = std::result::Result<T, TrieError>;
