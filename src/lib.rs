// ==========================================
// Betaflow 制造管理 - 批量导入核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 分隔文本 / 表格文件 → 原材料、产品、员工、机台
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体、行记录、导入结果
pub mod domain;

// 数据存储层 - 单行写入
pub mod repository;

// 导入层 - 解析/校验/转换/落库
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 宿主接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    EntityKind, FieldValue, ImportOutcome, ImportProgress, ImportReport, PipelineStage, RawRow,
    RowError, SkippedLine, TransformedRecord, ValidatedRow,
};

// 导入管道
pub use importer::{
    BulkImporter, BulkImporterImpl, CancellationToken, ImportError, ImportObserver, ImportResult,
    SchemaRegistry, TemplateGenerator,
};

// 存储
pub use repository::{EntityStore, InMemoryEntityStore, SqliteEntityStore, StoreError};

// API
pub use api::{ApiError, ImportApi, ImportApiResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Betaflow 批量导入";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(!APP_NAME.is_empty());
    }
}
