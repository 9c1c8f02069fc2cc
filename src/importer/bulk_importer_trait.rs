// ==========================================
// Betaflow 制造管理 - 批量导入 Trait
// ==========================================
// 职责: 定义导入管道主接口与各阶段组件接口（不包含实现）
// ==========================================

use crate::domain::entity::{EntityKind, SchemaDefinition};
use crate::domain::outcome::ImportReport;
use crate::domain::record::{RawRow, TransformedRecord, ValidatedRow};
use crate::importer::cancel::CancellationToken;
use crate::importer::delimited_parser::ParsedRows;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// BulkImporter Trait
// ==========================================
// 用途: 批量导入主接口
// 实现者: BulkImporterImpl
#[async_trait]
pub trait BulkImporter: Send + Sync {
    /// 支持导入的实体种类
    fn supported_kinds(&self) -> Vec<EntityKind>;

    /// 单行表头模板
    fn template(&self, kind: EntityKind) -> String;

    /// 从分隔文本导入
    ///
    /// # 返回
    /// - Ok(ImportReport): 管道已运行到落库完成（可能含行级失败）
    /// - Err(ImportError): 结构/语义拒绝，未发生任何写入
    async fn import_text(&self, kind: EntityKind, text: &str) -> ImportResult<ImportReport> {
        self.import_text_with_cancel(kind, text, &CancellationToken::new())
            .await
    }

    /// 从分隔文本导入（可取消）
    async fn import_text_with_cancel(
        &self,
        kind: EntityKind,
        text: &str,
        cancel: &CancellationToken,
    ) -> ImportResult<ImportReport>;

    /// 从文件导入（.csv / .xlsx / .xls）
    async fn import_file(
        &self,
        kind: EntityKind,
        path: &Path,
        cancel: &CancellationToken,
    ) -> ImportResult<ImportReport>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件 → ParsedRows
// 实现者: CsvFileParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    fn parse_file(&self, path: &Path) -> ImportResult<ParsedRows>;
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 结构 + 语义校验，只读
// 实现者: SchemaRowValidator
pub trait RowValidator: Send + Sync {
    /// # 返回
    /// - Ok: 全部行通过
    /// - Err(MissingColumns | NoData): 结构拒绝
    /// - Err(SemanticRejection): 语义拒绝（含全部 "Row N: ..." 描述）
    fn validate(
        &self,
        rows: Vec<RawRow>,
        schema: &SchemaDefinition,
        kind: EntityKind,
    ) -> ImportResult<Vec<ValidatedRow>>;
}

// ==========================================
// RecordTransformer Trait
// ==========================================
// 用途: 字段类型转换，永不失败
// 实现者: SchemaTransformer
pub trait RecordTransformer: Send + Sync {
    fn transform(&self, row: ValidatedRow, kind: EntityKind) -> TransformedRecord;
}
