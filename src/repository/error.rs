// ==========================================
// Betaflow 制造管理 - 存储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 消息面向最终用户（进入 "Row N: ..." 错误列表）
// ==========================================

use thiserror::Error;

/// 存储层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    // ===== 约束错误 =====
    #[error("Duplicate value violates unique constraint: {0}")]
    UniqueConstraintViolation(String),

    #[error("Foreign key constraint failed: {0}")]
    ForeignKeyViolation(String),

    #[error("Constraint failed: {0}")]
    ConstraintViolation(String),

    #[error("Column '{column}' does not exist in table '{table}'")]
    UnknownColumn { table: String, column: String },

    // ===== 可重试错误 =====
    #[error("Insert timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    // ===== 不可重试错误 =====
    // 互斥锁中毒后一直保持中毒状态
    #[error("Database lock acquisition failed: {0}")]
    LockError(String),

    #[error("Insert task failed: {0}")]
    TaskFailed(String),

    // ===== 通用错误 =====
    #[error("Database query failed: {0}")]
    DatabaseQueryError(String),
}

impl StoreError {
    /// 是否属于可重试的瞬时错误
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Timeout { .. } | StoreError::Unavailable(_)
        )
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref ffi_err, ref msg) => {
                let msg = msg.clone().unwrap_or_else(|| ffi_err.to_string());
                match ffi_err.code {
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked => {
                        StoreError::Unavailable(msg)
                    }
                    _ if msg.contains("UNIQUE") => StoreError::UniqueConstraintViolation(msg),
                    _ if msg.contains("FOREIGN KEY") => StoreError::ForeignKeyViolation(msg),
                    rusqlite::ErrorCode::ConstraintViolation => StoreError::ConstraintViolation(msg),
                    _ => StoreError::DatabaseQueryError(msg),
                }
            }
            _ => StoreError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;
