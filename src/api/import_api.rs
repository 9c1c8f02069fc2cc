// ==========================================
// Betaflow 制造管理 - 批量导入API
// ==========================================
// 职责: 面向宿主的导入门面（实体种类字符串 → 类型化调用）
// 返回: Ok(ImportApiResponse) = 导入已运行；Err(ImportRejected) = 导入未开始
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::entity::EntityKind;
use crate::domain::outcome::{ImportReport, SkippedLine};
use crate::importer::{
    BulkImporter, BulkImporterImpl, CancellationToken, ImportObserver, SchemaRegistry,
    TemplateFile, TemplateGenerator,
};
use crate::repository::SqliteEntityStore;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

/// 宿主展示的错误条数上限
pub const DISPLAY_ERROR_LIMIT: usize = 5;

/// 上传类型说明
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTypeInfo {
    pub kind: EntityKind,
    /// 上传标识（raw-materials / products / employees / machines）
    pub id: String,
    pub title: String,
    pub description: String,
    pub required_columns: Vec<String>,
    pub template_file_name: String,
}

impl UploadTypeInfo {
    /// 仅依赖静态 schema，不访问存储
    pub fn for_kind(kind: EntityKind) -> Self {
        Self {
            kind,
            id: kind.slug().to_string(),
            title: kind.title().to_string(),
            description: match kind {
                EntityKind::RawMaterial => "Upload raw materials inventory data",
                EntityKind::Product => "Upload product catalog data",
                EntityKind::Employee => "Upload employee data",
                EntityKind::Machine => "Upload machine data",
            }
            .to_string(),
            required_columns: SchemaRegistry::get(kind)
                .required_fields
                .iter()
                .map(|f| f.to_string())
                .collect(),
            template_file_name: TemplateGenerator::file_name(kind),
        }
    }
}

/// 导入API响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 导入批次ID
    pub batch_id: String,
    pub kind: EntityKind,
    /// 提交到落库阶段的行数
    pub total_rows: usize,
    pub success: usize,
    pub failure: usize,
    /// "Row N: ..." 形式的行级错误
    pub errors: Vec<String>,
    /// 字段数不一致被跳过的行
    pub skipped_lines: Vec<SkippedLine>,
    pub cancelled: bool,
    /// 导入耗时（毫秒）
    pub elapsed_ms: u64,
    /// "Upload completed: S successful, F failed"
    pub summary: String,
}

impl From<ImportReport> for ImportApiResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            batch_id: report.batch_id().to_string(),
            kind: report.kind(),
            total_rows: report.total_rows(),
            success: report.success(),
            failure: report.failure(),
            errors: report.error_messages(),
            skipped_lines: report.skipped_lines().to_vec(),
            cancelled: report.is_cancelled(),
            elapsed_ms: report.elapsed_ms(),
            summary: report.summary(),
        }
    }
}

impl ImportApiResponse {
    /// 前 `limit` 条错误，超出部分折叠为 "...and N more errors"
    pub fn error_preview(&self, limit: usize) -> Vec<String> {
        let mut preview: Vec<String> = self.errors.iter().take(limit).cloned().collect();
        if self.errors.len() > limit {
            preview.push(format!("...and {} more errors", self.errors.len() - limit));
        }
        preview
    }
}

/// 导入API
pub struct ImportApi {
    importer: Arc<dyn BulkImporter>,
}

impl ImportApi {
    /// 使用任意 BulkImporter 实现
    pub fn new(importer: Arc<dyn BulkImporter>) -> Self {
        Self { importer }
    }

    /// 基于 SQLite 数据库文件创建（建表幂等）
    pub fn from_db_path(db_path: &str) -> ApiResult<Self> {
        Self::build(db_path, None)
    }

    /// 基于 SQLite 数据库文件创建，并挂载进度观察者
    pub fn from_db_path_with_observer(
        db_path: &str,
        observer: Arc<dyn ImportObserver>,
    ) -> ApiResult<Self> {
        Self::build(db_path, Some(observer))
    }

    fn build(db_path: &str, observer: Option<Arc<dyn ImportObserver>>) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseError(format!("failed to open {}: {}", db_path, e)))?;
        init_schema(&conn).map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        let conn = Arc::new(Mutex::new(conn));

        let store = SqliteEntityStore::from_connection(conn.clone());
        let config = ConfigManager::from_connection(conn)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let mut importer = BulkImporterImpl::with_defaults(store, config);
        if let Some(observer) = observer {
            importer = importer.with_observer(observer);
        }
        info!(db_path = %db_path, "导入API初始化完成");
        Ok(Self::new(Arc::new(importer)))
    }

    /// 解析实体种类字符串
    pub fn parse_kind(kind: &str) -> ApiResult<EntityKind> {
        kind.parse::<EntityKind>()
            .map_err(|e| ApiError::InvalidInput(e.to_string()))
    }

    pub fn list_supported_kinds(&self) -> Vec<EntityKind> {
        self.importer.supported_kinds()
    }

    /// 上传类型说明（标题、描述、必填列）
    pub fn describe_kinds(&self) -> Vec<UploadTypeInfo> {
        self.list_supported_kinds()
            .into_iter()
            .map(UploadTypeInfo::for_kind)
            .collect()
    }

    pub fn get_template(&self, kind: &str) -> ApiResult<String> {
        Ok(self.importer.template(Self::parse_kind(kind)?))
    }

    pub fn template_file(&self, kind: &str) -> ApiResult<TemplateFile> {
        let kind = Self::parse_kind(kind)?;
        Ok(TemplateFile {
            file_name: TemplateGenerator::file_name(kind),
            content: self.importer.template(kind),
        })
    }

    /// 从分隔文本导入
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 导入已运行（可能含行级失败）
    /// - Err(ApiError::ImportRejected): 校验拒绝，未发生写入
    pub async fn run_import(&self, kind: &str, file_text: &str) -> ApiResult<ImportApiResponse> {
        self.run_import_with_cancel(kind, file_text, &CancellationToken::new())
            .await
    }

    pub async fn run_import_with_cancel(
        &self,
        kind: &str,
        file_text: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<ImportApiResponse> {
        let kind = Self::parse_kind(kind)?;
        let report = self
            .importer
            .import_text_with_cancel(kind, file_text, cancel)
            .await?;
        Ok(report.into())
    }

    /// 从文件导入（.csv / .xlsx / .xls）
    pub async fn import_file(&self, kind: &str, file_path: &str) -> ApiResult<ImportApiResponse> {
        self.import_file_with_cancel(kind, file_path, &CancellationToken::new())
            .await
    }

    pub async fn import_file_with_cancel(
        &self,
        kind: &str,
        file_path: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<ImportApiResponse> {
        let kind = Self::parse_kind(kind)?;
        let report = self
            .importer
            .import_file(kind, Path::new(file_path), cancel)
            .await?;
        Ok(report.into())
    }
}
