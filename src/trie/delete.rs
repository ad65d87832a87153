//! 删除操作
//!
//! 删除后的结构压缩维持表示的规范性：
//! - Branch 收缩到只剩一个占位 → 压缩为叶子或 KV 节点
//! - KV 节点的子节点也是 KV 节点 → 合并为单个 KV 节点
//!
//! 被替换节点的旧存储条目随替换清理（dispose），保证简单
//! 单线程变更下存储中没有不可达的旧版本。

use crate::error::{TrieError, TrieResult};
use crate::hash::{HashOutput, Hasher};
use crate::nibble::NibbleKey;
use crate::node::{NodeKind, NodeRecord};
use crate::store::Store;

use super::core::MptTree;

impl<S: Store, H: Hasher> MptTree<S, H> {
    /// 删除 key
    ///
    /// 不存在的 key 是无操作。先做一次只读查找确认存在性
    /// （顺带把路径 resolve 进内存），再执行变更遍历，
    /// 这样变更路径上不会出现"未命中但已标脏"的节点。
    pub fn delete(&mut self, key: &[u8]) -> TrieResult<()> {
        if self.get(key)?.is_none() {
            return Ok(());
        }

        let nibbles = NibbleKey::from_normal(key);
        let root = self
            .root
            .take()
            .expect("root exists after a successful lookup");
        self.root = Self::delete_at(&mut self.store, root, nibbles)?;
        Ok(())
    }

    /// 内部递归删除
    ///
    /// 返回 `None` 表示该子树被整体删除。调用前提：key 在该子树中
    /// 存在（由 `delete` 的存在性检查保证），因此任何"未命中"都是
    /// 不变量被破坏。
    fn delete_at(
        store: &mut S,
        mut node: NodeRecord,
        key: NibbleKey,
    ) -> TrieResult<Option<NodeRecord>> {
        node.ensure_parsed(&*store)?;
        if matches!(node.kind(), NodeKind::Leaf { .. }) {
            // 存在性已确认：这一定是目标叶子
            node.dispose(store)?;
            return Ok(None);
        }

        let (old_hash, kind) = node.into_parts();
        match kind {
            NodeKind::Leaf { .. } => unreachable!("leaf deletion is handled above"),

            NodeKind::Extension {
                key: node_key,
                child,
            } => {
                let rest = key.match_and_shift(&node_key).ok_or(TrieError::InvalidState(
                    "delete descended into a non-matching extension",
                ))?;
                // 扩展节点下至少还有两条路径，删除一条不可能清空子树
                let new_child = Self::delete_at(store, *child, rest)?.ok_or(
                    TrieError::InvalidState("extension child emptied by delete"),
                )?;
                Self::merge_kv(
                    store,
                    NodeRecord::from_parts(
                        old_hash,
                        NodeKind::Extension {
                            key: node_key,
                            child: Box::new(new_child),
                        },
                    ),
                )
            }

            NodeKind::Branch {
                mut children,
                mut value,
            } => {
                if key.is_empty() {
                    value = None;
                } else {
                    let idx = key.get_hex(0) as usize;
                    let child = children[idx].take().ok_or(TrieError::InvalidState(
                        "delete descended into an empty branch slot",
                    ))?;
                    children[idx] = Self::delete_at(store, child, key.shift(1))?;
                }
                Self::compact_branch(store, old_hash, children, value)
            }
        }
    }

    /// Branch 删除后的压缩检查
    fn compact_branch(
        store: &mut S,
        old_hash: Option<HashOutput>,
        children: Box<[Option<NodeRecord>; 16]>,
        value: Option<Vec<u8>>,
    ) -> TrieResult<Option<NodeRecord>> {
        let kind = NodeKind::Branch { children, value };
        match kind.compact_index() {
            -1 => Ok(Some(NodeRecord::from_parts(old_hash, kind))),
            16 => {
                // 只剩 value 槽位：压缩为空 key 的叶子
                if let Some(hash) = old_hash {
                    store.delete(&hash)?;
                }
                let value = match kind {
                    NodeKind::Branch { value: Some(v), .. } => v,
                    _ => unreachable!("compact index 16 implies a populated value slot"),
                };
                Ok(Some(NodeRecord::leaf(NibbleKey::empty(), value)))
            }
            idx => {
                // 只剩一个子节点：压缩为单 nibble 的 KV 节点并尝试合并
                if let Some(hash) = old_hash {
                    store.delete(&hash)?;
                }
                let child = match kind {
                    NodeKind::Branch { mut children, .. } => children[idx as usize]
                        .take()
                        .expect("compact index points at a populated slot"),
                    _ => unreachable!("compact_branch built a branch"),
                };
                Self::merge_kv(
                    store,
                    NodeRecord::from_parts(
                        None,
                        NodeKind::Extension {
                            key: NibbleKey::single_hex(idx as u8),
                            child: Box::new(child),
                        },
                    ),
                )
            }
        }
    }

    /// KV-KV 合并
    ///
    /// KV 节点的子节点也是 KV 节点时，合并为一个 key 拼接后的
    /// KV 节点，继承子节点的 value-or-child；子节点被 dispose。
    /// 子节点是 Branch 时不合并。
    fn merge_kv(store: &mut S, record: NodeRecord) -> TrieResult<Option<NodeRecord>> {
        let (old_hash, kind) = record.into_parts();
        let (parent_key, mut child) = match kind {
            NodeKind::Extension { key, child } => (key, *child),
            other => return Ok(Some(NodeRecord::from_parts(old_hash, other))),
        };

        child.ensure_parsed(&*store)?;
        if matches!(child.kind(), NodeKind::Branch { .. }) {
            return Ok(Some(NodeRecord::from_parts(
                old_hash,
                NodeKind::Extension {
                    key: parent_key,
                    child: Box::new(child),
                },
            )));
        }

        // 子节点也是 KV：拼接 key，子节点的存储条目清理
        let (child_hash, child_kind) = child.into_parts();
        if let Some(hash) = child_hash {
            store.delete(&hash)?;
        }
        let merged = match child_kind {
            NodeKind::Leaf { key, value } => NodeKind::Leaf {
                key: parent_key.concat(&key)?,
                value,
            },
            NodeKind::Extension { key, child } => NodeKind::Extension {
                key: parent_key.concat(&key)?,
                child,
            },
            NodeKind::Branch { .. } => {
                unreachable!("branch children are handled before merging")
            }
        };
        Ok(Some(NodeRecord::from_parts(old_hash, merged)))
    }
}
