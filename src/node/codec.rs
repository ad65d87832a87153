//! 节点的 RLP 编解码与 content-addressed 写入
//!
//! Wire format（与以太坊 MPT 位级一致）：
//! - Branch: 17 元素 list，槽位 0..15 为空元素、32 字节哈希引用或
//!   inline 子节点的字面 RLP；槽位 16 为 value 字节串
//! - Extension: `[packed_key, child_encoding]`，packed_key 无 terminator 位
//! - Leaf: `[packed_key, value]`，packed_key 带 terminator 位
//!
//! 序列化短于 32 字节的非根节点以 inline 形式嵌入父节点；
//! 根节点总是强制哈希。

use rlp::{DecoderError, Prototype, Rlp, RlpStream};

use crate::error::{TrieError, TrieResult};
use crate::hash::Hasher;
use crate::nibble::NibbleKey;
use crate::store::Store;

use super::core::NodeRecord;
use super::types::{NodeKind, INLINE_NODE_LIMIT};

impl NodeRecord {
    /// 编码节点，返回父节点应嵌入的字节
    ///
    /// - clean 且已哈希 → 返回哈希的 RLP 编码（引用形式）
    /// - clean 且有 inline 缓存 → 直接返回缓存（`force_hash` 时转入哈希路径）
    /// - dirty → 重新序列化；短于 32 字节且非强制时 inline，
    ///   否则哈希后写入存储，并删除被替换的旧哈希条目
    ///
    /// 子节点在父节点之前写入存储（post-order），因此 `root_hash`
    /// 返回时所有可达的 dirty 节点均已持久化。
    pub fn encode<S: Store, H: Hasher>(
        &mut self,
        store: &mut S,
        force_hash: bool,
    ) -> TrieResult<Vec<u8>> {
        if !self.dirty {
            if let Some(hash) = &self.hash {
                return Ok(rlp::encode(&hash.to_vec()).to_vec());
            }
            if let Some(bytes) = &self.serialized {
                if bytes.len() < INLINE_NODE_LIMIT && !force_hash {
                    return Ok(bytes.clone());
                }
                // inline 节点被提升为根：补一次哈希存储
                let bytes = bytes.clone();
                return self.store_hashed::<S, H>(store, bytes);
            }
            // 只有 parsed 的记录不会是 clean 的；防御性地走序列化路径
        }

        self.ensure_parsed(&*store)?;
        let bytes = serialize_kind::<S, H>(
            self.parsed.as_mut().expect("parsed after ensure_parsed"),
            store,
        )?;

        if bytes.len() < INLINE_NODE_LIMIT && !force_hash {
            // 收缩为 inline：被替换的存储条目同样要清理
            if let Some(old) = self.hash.take() {
                store.delete(&old)?;
            }
            self.serialized = Some(bytes.clone());
            self.dirty = false;
            return Ok(bytes);
        }

        self.store_hashed::<S, H>(store, bytes)
    }

    /// 哈希序列化结果并写入存储，返回哈希的 RLP 编码
    ///
    /// 旧哈希条目（若存在且不同）在新条目写入之前删除。
    fn store_hashed<S: Store, H: Hasher>(
        &mut self,
        store: &mut S,
        bytes: Vec<u8>,
    ) -> TrieResult<Vec<u8>> {
        let new_hash = H::hash(&bytes);
        if let Some(old) = self.hash {
            if old != new_hash {
                store.delete(&old)?;
            }
        }
        store.put(&new_hash, &bytes)?;
        self.hash = Some(new_hash);
        self.serialized = Some(bytes);
        self.dirty = false;
        Ok(rlp::encode(&new_hash.to_vec()).to_vec())
    }
}

/// 按变体序列化节点结构，递归编码子节点
fn serialize_kind<S: Store, H: Hasher>(
    kind: &mut NodeKind,
    store: &mut S,
) -> TrieResult<Vec<u8>> {
    let bytes = match kind {
        NodeKind::Leaf { key, value } => {
            let mut s = RlpStream::new_list(2);
            s.append(&key.to_packed());
            s.append(&*value);
            s.out().to_vec()
        }
        NodeKind::Extension { key, child } => {
            let child_bytes = child.encode::<S, H>(store, false)?;
            let mut s = RlpStream::new_list(2);
            s.append(&key.to_packed());
            s.append_raw(&child_bytes, 1);
            s.out().to_vec()
        }
        NodeKind::Branch { children, value } => {
            let mut s = RlpStream::new_list(17);
            for slot in children.iter_mut() {
                match slot {
                    Some(child) => {
                        let child_bytes = child.encode::<S, H>(store, false)?;
                        s.append_raw(&child_bytes, 1);
                    }
                    None => {
                        s.append_empty_data();
                    }
                }
            }
            match value {
                Some(v) => s.append(&*v),
                None => s.append_empty_data(),
            };
            s.out().to_vec()
        }
    };
    Ok(bytes)
}

/// 从 RLP 字节解码节点结构
///
/// 2 元素 list 是 KV 节点（key 的 terminator 位区分 Leaf/Extension），
/// 17 元素 list 是 Branch。
pub(super) fn decode_kind(bytes: &[u8]) -> TrieResult<NodeKind> {
    let rlp = Rlp::new(bytes);
    match rlp.prototype()? {
        Prototype::List(2) => {
            let packed: Vec<u8> = rlp.val_at(0)?;
            let key = NibbleKey::from_packed(&packed);
            if key.is_terminal() {
                let value: Vec<u8> = rlp.val_at(1)?;
                Ok(NodeKind::Leaf { key, value })
            } else {
                let child = decode_child(rlp.at(1)?)?
                    .ok_or(TrieError::Decode(DecoderError::Custom(
                        "extension node with empty child",
                    )))?;
                Ok(NodeKind::Extension {
                    key,
                    child: Box::new(child),
                })
            }
        }
        Prototype::List(17) => {
            let mut children: [Option<NodeRecord>; 16] = std::array::from_fn(|_| None);
            for (i, slot) in children.iter_mut().enumerate() {
                *slot = decode_child(rlp.at(i)?)?;
            }
            let value: Vec<u8> = rlp.val_at(16)?;
            Ok(NodeKind::Branch {
                children: Box::new(children),
                value: if value.is_empty() { None } else { Some(value) },
            })
        }
        _ => Err(TrieError::Decode(DecoderError::Custom(
            "node record must be a 2- or 17-element list",
        ))),
    }
}

/// 解码一个子槽位
///
/// 空字节串 → 空槽位；32 字节串 → 哈希引用（非平凡节点的 RLP 编码
/// 总是超过 32 字节，不会与哈希混淆）；嵌套 list → inline 子节点，
/// 原样缓存，首次访问时再解析。
fn decode_child(item: Rlp) -> TrieResult<Option<NodeRecord>> {
    if item.is_data() {
        let data = item.data()?;
        if data.is_empty() {
            return Ok(None);
        }
        if data.len() == 32 {
            let mut hash = [0u8; 32];
            hash.copy_from_slice(data);
            return Ok(Some(NodeRecord::from_hash(hash)));
        }
        Err(TrieError::Decode(DecoderError::Custom(
            "child reference must be a 32-byte hash",
        )))
    } else {
        Ok(Some(NodeRecord::from_serialized(item.as_raw().to_vec())))
    }
}
