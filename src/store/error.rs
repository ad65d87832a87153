//! 存储层错误类型

/// 存储层错误类型
#[derive(Debug, Clone)]
pub enum StoreError {
    /// 底层存储错误
    StorageError(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::StorageError(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// 存储层 Result 类型
pub type Result<T> = std::result::Result<T, StoreError>;
