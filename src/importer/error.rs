// ==========================================
// Betaflow 制造管理 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分层: 结构性拒绝 / 语义拒绝（整批中止，零落库）
//       行级落库失败不在此处（计入 ImportOutcome）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 拒绝层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionTier {
    Structural, // 缺少必填列 / 无有效数据
    Semantic,   // 行内容违反语义规则
}

impl fmt::Display for RejectionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionTier::Structural => f.write_str("structural"),
            RejectionTier::Semantic => f.write_str("semantic"),
        }
    }
}

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: {0} (only .csv/.xlsx/.xls)")]
    UnsupportedFormat(String),

    #[error("Failed to read file: {0}")]
    FileReadError(String),

    #[error("Failed to parse workbook: {0}")]
    ExcelParseError(String),

    // ===== 结构性拒绝 =====
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("No valid data found in CSV file")]
    NoData,

    // ===== 语义拒绝 =====
    #[error("Validation failed with {} error(s)", .0.len())]
    SemanticRejection(Vec<String>),

    // ===== 配置错误 =====
    #[error("Import configuration error: {0}")]
    ConfigError(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 校验阶段拒绝的层级；非校验错误返回 None
    pub fn rejection_tier(&self) -> Option<RejectionTier> {
        match self {
            ImportError::MissingColumns(_) | ImportError::NoData => Some(RejectionTier::Structural),
            ImportError::SemanticRejection(_) => Some(RejectionTier::Semantic),
            _ => None,
        }
    }

    /// 面向用户的错误列表
    pub fn messages(&self) -> Vec<String> {
        match self {
            ImportError::SemanticRejection(errors) => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
