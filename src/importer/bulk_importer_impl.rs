// ==========================================
// Betaflow 制造管理 - 批量导入器实现
// ==========================================
// 职责: 整合导入流程，从文本/文件到存储
// 流程: 解析 → 校验 →（拒绝 | 转换）→ 逐行落库 → 报告
// 状态: Idle → Parsing → Validating → (Rejected | Transforming) → Persisting → Reported
// ==========================================

use crate::config::{ImportConfigReader, ImportSettings};
use crate::domain::entity::EntityKind;
use crate::domain::outcome::{ImportReport, PipelineStage};
use crate::domain::record::TransformedRecord;
use crate::importer::bulk_importer_trait::{
    BulkImporter, FileParser, RecordTransformer, RowValidator,
};
use crate::importer::cancel::CancellationToken;
use crate::importer::delimited_parser::{DelimitedTextParser, ParsedRows};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::persistence_driver::SequentialPersistenceDriver;
use crate::importer::progress::{ImportObserver, OptionalObserver};
use crate::importer::row_validator::SchemaRowValidator;
use crate::importer::schema_registry::SchemaRegistry;
use crate::importer::template::TemplateGenerator;
use crate::importer::transformer::SchemaTransformer;
use crate::repository::EntityStore;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// 导入数据来源
#[derive(Debug, Clone, Copy)]
enum ImportSource<'a> {
    Text(&'a str),
    File(&'a Path),
}

impl ImportSource<'_> {
    /// 日志用描述（不输出文本内容）
    fn describe(&self) -> String {
        match self {
            ImportSource::Text(text) => format!("text({} bytes)", text.len()),
            ImportSource::File(path) => path.display().to_string(),
        }
    }
}

// ==========================================
// BulkImporterImpl - 批量导入器实现
// ==========================================
pub struct BulkImporterImpl<S, C>
where
    S: EntityStore,
    C: ImportConfigReader,
{
    // 外部存储
    store: S,

    // 配置读取器
    config: C,

    // 导入组件
    validator: Box<dyn RowValidator>,
    transformer: Box<dyn RecordTransformer>,

    // 进度观察者
    observer: OptionalObserver,
}

impl<S, C> BulkImporterImpl<S, C>
where
    S: EntityStore,
    C: ImportConfigReader,
{
    /// 创建新的 BulkImporter 实例
    ///
    /// # 参数
    /// - store: 实体存储
    /// - config: 配置读取器
    /// - validator: 行校验器
    /// - transformer: 字段转换器
    pub fn new(
        store: S,
        config: C,
        validator: Box<dyn RowValidator>,
        transformer: Box<dyn RecordTransformer>,
    ) -> Self {
        Self {
            store,
            config,
            validator,
            transformer,
            observer: OptionalObserver::none(),
        }
    }

    /// 使用默认校验器与转换器
    pub fn with_defaults(store: S, config: C) -> Self {
        Self::new(
            store,
            config,
            Box::new(SchemaRowValidator::new()),
            Box::new(SchemaTransformer::new()),
        )
    }

    /// 挂载进度观察者
    pub fn with_observer(mut self, observer: Arc<dyn ImportObserver>) -> Self {
        self.observer = OptionalObserver::with_observer(observer);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn load_settings(&self) -> ImportResult<ImportSettings> {
        ImportSettings::load(&self.config).await.map_err(|e| {
            error!(error = %e, "导入配置加载失败");
            ImportError::ConfigError(e.to_string())
        })
    }

    fn parse_source(source: ImportSource<'_>, settings: &ImportSettings) -> ImportResult<ParsedRows> {
        let parser = DelimitedTextParser::new(settings.delimiter);
        match source {
            ImportSource::Text(text) => Ok(parser.parse_all(text)),
            ImportSource::File(path) => UniversalFileParser::new(parser).parse_file(path),
        }
    }

    #[instrument(skip_all, fields(kind = %kind, batch_id))]
    async fn run(
        &self,
        kind: EntityKind,
        source: ImportSource<'_>,
        cancel: &CancellationToken,
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let settings = self.load_settings().await?;
        info!(batch_id = %batch_id, source = %source.describe(), "开始导入");

        // === 阶段 1: 解析 ===
        self.observer.on_stage(PipelineStage::Parsing);
        let parsed = Self::parse_source(source, &settings).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        for skipped in &parsed.skipped {
            warn!(
                line = skipped.line,
                expected = skipped.expected,
                found = skipped.found,
                "字段数与表头不一致，跳过该行"
            );
        }
        info!(
            rows = parsed.rows.len(),
            skipped = parsed.skipped.len(),
            "解析完成"
        );

        // === 阶段 2: 校验 ===
        self.observer.on_stage(PipelineStage::Validating);
        let schema = SchemaRegistry::get(kind);
        let ParsedRows { rows, skipped, .. } = parsed;
        let validated = match self.validator.validate(rows, schema, kind) {
            Ok(validated) => validated,
            Err(e) => {
                self.observer.on_stage(PipelineStage::Rejected);
                error!(
                    tier = ?e.rejection_tier(),
                    errors = ?e.messages(),
                    "校验未通过，整批拒绝"
                );
                return Err(e);
            }
        };
        debug!(rows = validated.len(), "校验通过");

        // === 阶段 3: 转换 ===
        self.observer.on_stage(PipelineStage::Transforming);
        let records: Vec<TransformedRecord> = validated
            .into_iter()
            .map(|row| self.transformer.transform(row, kind))
            .collect();
        let total_rows = records.len();
        debug!(records = total_rows, "转换完成");

        // === 阶段 4: 落库 ===
        self.observer.on_stage(PipelineStage::Persisting);
        let driver = SequentialPersistenceDriver::from_settings(&settings);
        let outcome = driver
            .persist(&self.store, records, kind, &self.observer, cancel)
            .await;

        // === 阶段 5: 报告 ===
        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        let report = ImportReport::new(batch_id, kind, total_rows, outcome, skipped, elapsed_ms);
        self.observer.on_stage(PipelineStage::Reported);

        info!(
            batch_id = %report.batch_id(),
            total = report.total_rows(),
            success = report.success(),
            failed = report.failure(),
            skipped = report.skipped(),
            cancelled = report.is_cancelled(),
            elapsed_ms = report.elapsed_ms(),
            "导入完成"
        );

        Ok(report)
    }
}

#[async_trait::async_trait]
impl<S, C> BulkImporter for BulkImporterImpl<S, C>
where
    S: EntityStore + Send + Sync,
    C: ImportConfigReader + Send + Sync,
{
    fn supported_kinds(&self) -> Vec<EntityKind> {
        SchemaRegistry::supported_kinds()
    }

    fn template(&self, kind: EntityKind) -> String {
        TemplateGenerator::generate(kind)
    }

    async fn import_text_with_cancel(
        &self,
        kind: EntityKind,
        text: &str,
        cancel: &CancellationToken,
    ) -> ImportResult<ImportReport> {
        self.run(kind, ImportSource::Text(text), cancel).await
    }

    async fn import_file(
        &self,
        kind: EntityKind,
        path: &Path,
        cancel: &CancellationToken,
    ) -> ImportResult<ImportReport> {
        self.run(kind, ImportSource::File(path), cancel).await
    }
}
