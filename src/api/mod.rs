// ==========================================
// Betaflow 制造管理 - API层
// ==========================================
// 职责: 面向宿主的调用门面，错误码稳定
// ==========================================

pub mod error;
pub mod import_api;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use import_api::{ImportApi, ImportApiResponse, UploadTypeInfo, DISPLAY_ERROR_LIMIT};
