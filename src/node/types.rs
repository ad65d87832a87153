//! 节点结构类型定义

use crate::nibble::NibbleKey;

use super::core::NodeRecord;

/// Branch 节点的子槽位数量（每个 nibble 值一个）
pub const BRANCH_CHILD_COUNT: usize = 16;

/// inline 编码阈值：序列化短于该长度的非根节点直接嵌入父节点，
/// 不单独存储。与以太坊 MPT wire format 保持一致。
///
/// 该值同时是哈希长度，节点解码依赖"子槽位中长度为 32 的字节串
/// 一定是哈希引用"这一假设；inline 子节点以嵌套 list 形式出现，
/// 不会与哈希混淆。
pub const INLINE_NODE_LIMIT: usize = 32;

/// 节点的结构化视图
///
/// 三种变体对应 MPT 的三类节点：
/// - `Branch`: 16 个子槽位（每个 nibble 值一个）加一个 value 槽位
/// - `Extension`: 非 terminal 的共享前缀 + 单个子节点
/// - `Leaf`: terminal 的 key 后缀 + 存储的 value
///
/// # 不变量
///
/// 1. Branch 至少有两个非空槽位（子节点或 value），
///    删除路径上的压缩保证不会出现退化 Branch
/// 2. Extension 的 key 非空且非 terminal，子节点非空
/// 3. Leaf 的 key 是 terminal，value 非空
#[derive(Debug)]
pub enum NodeKind {
    /// 分支节点：16 个子槽位 + value 槽位
    Branch {
        children: Box<[Option<NodeRecord>; BRANCH_CHILD_COUNT]>,
        value: Option<Vec<u8>>,
    },
    /// 扩展节点：共享前缀指向单个子节点
    Extension { key: NibbleKey, child: Box<NodeRecord> },
    /// 叶子节点：key 后缀与 value
    Leaf { key: NibbleKey, value: Vec<u8> },
}

impl NodeKind {
    /// 创建全空的 Branch
    pub fn empty_branch() -> Self {
        NodeKind::Branch {
            children: Box::new(std::array::from_fn(|_| None)),
            value: None,
        }
    }

    /// Branch 压缩检查
    ///
    /// 扫描 16 个子槽位：
    /// - 恰好一个非空子槽位且无 value → 返回该槽位索引（0..=15）
    /// - 全空子槽位且有 value → 返回 16
    /// - 其他情况（无法压缩）→ 返回 -1
    pub fn compact_index(&self) -> i32 {
        let (children, value) = match self {
            NodeKind::Branch { children, value } => (children, value),
            _ => return -1,
        };

        let mut found: i32 = -1;
        for (i, child) in children.iter().enumerate() {
            if child.is_some() {
                if found >= 0 {
                    return -1; // 多于一个子节点
                }
                found = i as i32;
            }
        }

        match (found, value) {
            (-1, Some(_)) => 16,
            (i, None) if i >= 0 => i,
            _ => -1,
        }
    }
}

/// 插入载荷：叶子 value 或算法构造出的子节点
///
/// 递归插入把两种载荷走同一条路径：用户数据进来是 `Value`，
/// KV 节点分裂时原有的 value-or-child 以对应变体重新插入。
#[derive(Debug)]
pub enum ValueOrNode {
    Value(Vec<u8>),
    Node(NodeRecord),
}
