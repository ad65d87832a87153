//! 插入操作

use crate::error::{TrieError, TrieResult};
use crate::hash::Hasher;
use crate::nibble::NibbleKey;
use crate::node::{NodeKind, NodeRecord, ValueOrNode};
use crate::store::Store;

use super::core::MptTree;

impl<S: Store, H: Hasher> MptTree<S, H> {
    /// 插入 key-value 对
    ///
    /// 插入空 value 等价于删除该 key。
    /// 变更只发生在内存：路径上的节点标记为 dirty，序列化与存储
    /// 写入推迟到 `root_hash` / `flush`；被替换节点的旧存储条目
    /// 在替换发生时清理。
    pub fn put(&mut self, key: &[u8], value: Vec<u8>) -> TrieResult<()> {
        if value.is_empty() {
            return self.delete(key);
        }

        let nibbles = NibbleKey::from_normal(key);
        let root = match self.root.take() {
            None => NodeRecord::leaf(nibbles, value),
            Some(root) => {
                Self::insert_at(&mut self.store, root, nibbles, ValueOrNode::Value(value))?
            }
        };
        self.root = Some(root);
        Ok(())
    }

    /// 内部递归插入
    ///
    /// 接管 `node` 的所有权，返回替换它的新记录。载荷既可以是
    /// 叶子 value，也可以是分裂过程中需要重新挂载的子节点。
    pub(super) fn insert_at(
        store: &mut S,
        mut node: NodeRecord,
        key: NibbleKey,
        payload: ValueOrNode,
    ) -> TrieResult<NodeRecord> {
        node.ensure_parsed(&*store)?;
        let (old_hash, kind) = node.into_parts();

        match kind {
            NodeKind::Branch {
                mut children,
                mut value,
            } => {
                if key.is_empty() {
                    // key 在本分支耗尽：写 value 槽位
                    match payload {
                        ValueOrNode::Value(v) => value = Some(v),
                        ValueOrNode::Node(_) => {
                            return Err(TrieError::InvalidState(
                                "branch value slot cannot hold a node",
                            ))
                        }
                    }
                } else {
                    let idx = key.get_hex(0) as usize;
                    let rest = key.shift(1);
                    let new_child = match children[idx].take() {
                        Some(child) => Self::insert_at(store, child, rest, payload)?,
                        None => Self::attach(rest, payload)?,
                    };
                    children[idx] = Some(new_child);
                }
                Ok(NodeRecord::from_parts(
                    old_hash,
                    NodeKind::Branch { children, value },
                ))
            }

            NodeKind::Extension {
                key: node_key,
                child,
            } => {
                let cp = key.common_prefix(&node_key);
                if cp.length() == node_key.length() {
                    // 完整前缀匹配：递归进子节点，本节点标记失效
                    let rest = key.shift(cp.length());
                    let new_child = Self::insert_at(store, *child, rest, payload)?;
                    return Ok(NodeRecord::from_parts(
                        old_hash,
                        NodeKind::Extension {
                            key: node_key,
                            child: Box::new(new_child),
                        },
                    ));
                }

                // 前缀分叉：新 branch 容纳两侧残余，旧节点被替换
                if let Some(hash) = old_hash {
                    store.delete(&hash)?;
                }
                let branch = Self::attach_two(
                    store,
                    node_key.shift(cp.length()),
                    ValueOrNode::Node(*child),
                    key.shift(cp.length()),
                    payload,
                )?;
                Self::wrap_prefix(cp, branch)
            }

            NodeKind::Leaf {
                key: node_key,
                value,
            } => {
                let cp = key.common_prefix(&node_key);
                if cp.length() == key.length() && cp.length() == node_key.length() {
                    // 精确命中：原地覆盖 value
                    let v = match payload {
                        ValueOrNode::Value(v) => v,
                        ValueOrNode::Node(_) => {
                            return Err(TrieError::InvalidState(
                                "cannot replace a leaf value with a node",
                            ))
                        }
                    };
                    return Ok(NodeRecord::from_parts(
                        old_hash,
                        NodeKind::Leaf {
                            key: node_key,
                            value: v,
                        },
                    ));
                }

                // 分叉（或一侧为另一侧前缀）：残余进新 branch，旧节点被替换
                if let Some(hash) = old_hash {
                    store.delete(&hash)?;
                }
                let branch = Self::attach_two(
                    store,
                    node_key.shift(cp.length()),
                    ValueOrNode::Value(value),
                    key.shift(cp.length()),
                    payload,
                )?;
                Self::wrap_prefix(cp, branch)
            }
        }
    }

    /// 把载荷挂为独立节点：value → 叶子，node → 直接挂载或套一层扩展
    fn attach(key: NibbleKey, payload: ValueOrNode) -> TrieResult<NodeRecord> {
        match payload {
            ValueOrNode::Value(value) => Ok(NodeRecord::leaf(key, value)),
            ValueOrNode::Node(node) => {
                if key.is_empty() {
                    Ok(node)
                } else {
                    Ok(NodeRecord::extension(key, node))
                }
            }
        }
    }

    /// 新建 branch 并插入两条残余路径
    ///
    /// 两条残余要么首 nibble 不同，要么其一为空（进 value 槽位），
    /// 因此互不冲突。
    fn attach_two(
        store: &mut S,
        key_a: NibbleKey,
        payload_a: ValueOrNode,
        key_b: NibbleKey,
        payload_b: ValueOrNode,
    ) -> TrieResult<NodeRecord> {
        let branch = NodeRecord::empty_branch();
        let branch = Self::insert_at(store, branch, key_a, payload_a)?;
        Self::insert_at(store, branch, key_b, payload_b)
    }

    /// 公共前缀非空时在 branch 外套一层扩展节点
    fn wrap_prefix(cp: NibbleKey, branch: NodeRecord) -> TrieResult<NodeRecord> {
        if cp.is_empty() {
            Ok(branch)
        } else {
            Ok(NodeRecord::extension(cp, branch))
        }
    }
}
