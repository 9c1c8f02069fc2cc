// ==========================================
// Betaflow 制造管理 - API层错误类型
// ==========================================
// 职责: 将导入/存储错误转换为调用方可区分的错误
// 约束: "导入未开始"（拒绝）与 "导入已运行"（报告）必须可区分
// ==========================================

use crate::importer::error::{ImportError, RejectionTier};
use crate::repository::error::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ==========================================
    // 导入拒绝（未发生任何写入）
    // ==========================================
    #[error("Import rejected ({}): {}", .tier, .errors.join("; "))]
    ImportRejected {
        tier: RejectionTier,
        errors: Vec<String>,
    },

    // ==========================================
    // 导入错误（文件/配置）
    // ==========================================
    #[error("Import failed: {0}")]
    ImportError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定的错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::ImportRejected {
                tier: RejectionTier::Structural,
                ..
            } => "STRUCTURAL_REJECTION",
            ApiError::ImportRejected {
                tier: RejectionTier::Semantic,
                ..
            } => "SEMANTIC_REJECTION",
            ApiError::ImportError(_) => "IMPORT_ERROR",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "OTHER_ERROR",
        }
    }

    /// 是否为校验拒绝
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::ImportRejected { .. })
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
            details: match self {
                ApiError::ImportRejected { tier, errors } => Some(serde_json::json!({
                    "tier": tier,
                    "errors": errors,
                })),
                _ => None,
            },
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        if let Some(tier) = err.rejection_tier() {
            return ApiError::ImportRejected {
                tier,
                errors: err.messages(),
            };
        }
        match err {
            ImportError::ConfigError(msg) => ApiError::InternalError(msg),
            ImportError::Other(e) => ApiError::Other(e),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 StoreError 转换
// ==========================================
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::DatabaseError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

/// 错误响应（返回给宿主）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}
