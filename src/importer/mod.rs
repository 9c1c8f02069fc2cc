// ==========================================
// Betaflow 制造管理 - 导入层
// ==========================================
// 职责: 分隔文本 / 表格文件批量导入为内部实体
// 流程: 解析 → 校验 → 转换 → 逐行落库 → 报告
// 支持: CSV, Excel
// ==========================================

// 模块声明
pub mod bulk_importer_impl;
pub mod bulk_importer_trait;
pub mod cancel;
pub mod delimited_parser;
pub mod error;
pub mod file_parser;
pub mod persistence_driver;
pub mod progress;
pub mod row_validator;
pub mod schema_registry;
pub mod template;
pub mod transformer;

// 重导出核心类型
pub use bulk_importer_impl::BulkImporterImpl;
pub use cancel::CancellationToken;
pub use delimited_parser::{DelimitedTextParser, ParsedLine, ParsedRows};
pub use error::{ImportError, ImportResult, RejectionTier};
pub use file_parser::{CsvFileParser, ExcelParser, UniversalFileParser};
pub use persistence_driver::SequentialPersistenceDriver;
pub use progress::{ImportObserver, NoOpObserver, OptionalObserver};
pub use row_validator::SchemaRowValidator;
pub use schema_registry::SchemaRegistry;
pub use template::{TemplateFile, TemplateGenerator};
pub use transformer::SchemaTransformer;

// 重导出 Trait 接口
pub use bulk_importer_trait::{BulkImporter, FileParser, RecordTransformer, RowValidator};
