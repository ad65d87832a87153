//! MPT 节点模块
//!
//! 包含 NodeRecord（带惰性解析与 dirty 追踪的节点记录）及其
//! 结构化视图 NodeKind（Branch / Extension / Leaf）。

mod codec;
mod core;
mod types;


// Re-export 公开 API
pub use self::core::NodeRecord;
pub use types::{NodeKind, ValueOrNode, BRANCH_CHILD_COUNT, INLINE_NODE_LIMIT};
