//! 查找操作

use crate::error::TrieResult;
use crate::hash::Hasher;
use crate::nibble::NibbleKey;
use crate::node::{NodeKind, NodeRecord};
use crate::store::Store;

use super::core::MptTree;

impl<S: Store, H: Hasher> MptTree<S, H> {
    /// 查找 key 对应的值
    ///
    /// 需要 `&mut self`：路径上仅持哈希的节点会被惰性 resolve，
    /// 解析结果留在内存中供后续操作复用。
    ///
    /// # 返回
    ///
    /// - `Ok(Some(value))`: 找到匹配的 key
    /// - `Ok(None)`: key 不存在
    /// - `Err(_)`: 存储错误或节点解码失败
    pub fn get(&mut self, key: &[u8]) -> TrieResult<Option<Vec<u8>>> {
        let nibbles = NibbleKey::from_normal(key);
        match &mut self.root {
            None => Ok(None),
            Some(root) => Self::get_at(&self.store, root, nibbles),
        }
    }

    /// 检查 key 是否存在
    pub fn contains(&mut self, key: &[u8]) -> TrieResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// 内部递归查找
    fn get_at(store: &S, node: &mut NodeRecord, key: NibbleKey) -> TrieResult<Option<Vec<u8>>> {
        node.ensure_parsed(store)?;
        match node.kind_mut() {
            NodeKind::Branch { children, value } => {
                if key.is_empty() {
                    return Ok(value.clone());
                }
                match &mut children[key.get_hex(0) as usize] {
                    Some(child) => Self::get_at(store, child, key.shift(1)),
                    None => Ok(None),
                }
            }
            NodeKind::Leaf { key: node_key, value } => match key.match_and_shift(node_key) {
                Some(rest) if rest.is_empty() => Ok(Some(value.clone())),
                _ => Ok(None),
            },
            NodeKind::Extension { key: node_key, child } => {
                match key.match_and_shift(node_key) {
                    Some(rest) => Self::get_at(store, child, rest),
                    None => Ok(None),
                }
            }
        }
    }
}
