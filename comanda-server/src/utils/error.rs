//! 统一错误处理
//!
//! # 错误分类
//!
//! | 分类 | 处理方式 |
//! |------|----------|
//! | 验证错误 | 立即失败，不重试，直接反馈给调用方 |
//! | 存储错误 | 瞬时错误由网关重试后仍失败才会到这里 |
//! | 资源不存在 | 直接反馈 |
//! | 业务良性情况 (重复完成订单等) | 不是错误，返回 Ok 空操作 |

use crate::db::StorageError;

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 资源不存在
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// 验证失败 (空购物车、负金额等)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 存储错误 (重试预算耗尽后)
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// 内部错误
    #[error("Internal error: {0}")]
    Internal(String),
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Result type for engine operations
pub type AppResult<T> = Result<T, AppError>;
