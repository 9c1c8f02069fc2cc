// ==========================================
// Betaflow 制造管理 - 领域模型层
// ==========================================
// 职责: 定义导入实体、行记录、导入结果
// 红线: 不含数据访问逻辑，不含管道逻辑
// ==========================================

pub mod entity;
pub mod outcome;
pub mod record;

// 重导出核心类型
pub use entity::{CoercionRule, EntityKind, SchemaDefinition, SemanticRule, UnknownEntityKind};
pub use outcome::{
    ImportOutcome, ImportProgress, ImportReport, PipelineStage, RowError, SkippedLine,
};
pub use record::{FieldValue, RawRow, TransformedRecord, ValidatedRow};
