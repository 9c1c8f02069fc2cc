// ==========================================
// Betaflow 制造管理 - 导入结果模型
// ==========================================
// 职责: 落库阶段累加器 + 最终导入报告 + 进度/阶段
// 不变量: success + failure == 提交到落库阶段的行数（未取消时）
// ==========================================

use crate::domain::entity::EntityKind;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// RowError - 行级失败（行号从 1 起）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row, self.message)
    }
}

// ==========================================
// SkippedLine - 字段数与表头不一致被跳过的行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    pub line: usize,     // 源文件物理行号
    pub expected: usize, // 表头字段数
    pub found: usize,    // 实际字段数
}

impl fmt::Display for SkippedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Line {}: expected {} fields, found {}",
            self.line, self.expected, self.found
        )
    }
}

// ==========================================
// ImportOutcome - 落库阶段累加器
// ==========================================
// 仅由落库驱动在单一路径上修改
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    success: usize,
    failure: usize,
    errors: Vec<RowError>,
    cancelled: bool,
}

impl ImportOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self) {
        self.success += 1;
    }

    pub fn record_failure(&mut self, row: usize, message: impl Into<String>) {
        self.failure += 1;
        self.errors.push(RowError {
            row,
            message: message.into(),
        });
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn success(&self) -> usize {
        self.success
    }

    pub fn failure(&self) -> usize {
        self.failure
    }

    pub fn processed(&self) -> usize {
        self.success + self.failure
    }

    pub fn errors(&self) -> &[RowError] {
        &self.errors
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

// ==========================================
// ImportReport - 导入报告（生成后不可变）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    batch_id: String,
    kind: EntityKind,
    total_rows: usize,
    success: usize,
    failure: usize,
    errors: Vec<RowError>,
    skipped_lines: Vec<SkippedLine>,
    cancelled: bool,
    elapsed_ms: u64,
}

impl ImportReport {
    pub fn new(
        batch_id: String,
        kind: EntityKind,
        total_rows: usize,
        outcome: ImportOutcome,
        skipped_lines: Vec<SkippedLine>,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            batch_id,
            kind,
            total_rows,
            success: outcome.success,
            failure: outcome.failure,
            errors: outcome.errors,
            skipped_lines,
            cancelled: outcome.cancelled,
            elapsed_ms,
        }
    }

    pub fn batch_id(&self) -> &str {
        &self.batch_id
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// 提交到落库阶段的行数
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn success(&self) -> usize {
        self.success
    }

    pub fn failure(&self) -> usize {
        self.failure
    }

    pub fn errors(&self) -> &[RowError] {
        &self.errors
    }

    /// "Row N: ..." 形式的错误列表
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn skipped(&self) -> usize {
        self.skipped_lines.len()
    }

    pub fn skipped_lines(&self) -> &[SkippedLine] {
        &self.skipped_lines
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn summary(&self) -> String {
        format!(
            "Upload completed: {} successful, {} failed",
            self.success, self.failure
        )
    }
}

// ==========================================
// ImportProgress - 落库进度
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportProgress {
    pub processed: usize,
    pub total: usize,
}

impl ImportProgress {
    pub fn new(processed: usize, total: usize) -> Self {
        Self { processed, total }
    }

    /// processed / total；total 为 0 视为完成
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

// ==========================================
// PipelineStage - 管道状态机
// ==========================================
// (Idle) -> Parsing -> Validating -> (Rejected | Transforming) -> Persisting -> Reported
// Idle 是调用前的隐式状态，不通知观察者
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    Parsing,
    Validating,
    Rejected,
    Transforming,
    Persisting,
    Reported,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Parsing => "PARSING",
            PipelineStage::Validating => "VALIDATING",
            PipelineStage::Rejected => "REJECTED",
            PipelineStage::Transforming => "TRANSFORMING",
            PipelineStage::Persisting => "PERSISTING",
            PipelineStage::Reported => "REPORTED",
        }
    }

    /// 终态: Rejected / Reported
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Rejected | PipelineStage::Reported)
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accumulates_in_order() {
        let mut outcome = ImportOutcome::new();
        outcome.record_success();
        outcome.record_failure(2, "duplicate sku");
        outcome.record_success();
        outcome.record_failure(4, "duplicate sku");

        assert_eq!(outcome.success(), 2);
        assert_eq!(outcome.failure(), 2);
        assert_eq!(outcome.processed(), 4);
        assert_eq!(outcome.errors()[0].to_string(), "Row 2: duplicate sku");
        assert_eq!(outcome.errors()[1].row, 4);
    }

    #[test]
    fn test_report_summary_and_skipped() {
        let mut outcome = ImportOutcome::new();
        outcome.record_success();
        let report = ImportReport::new(
            "batch-1".to_string(),
            EntityKind::Product,
            1,
            outcome,
            vec![SkippedLine {
                line: 3,
                expected: 4,
                found: 2,
            }],
            12,
        );

        assert_eq!(report.summary(), "Upload completed: 1 successful, 0 failed");
        assert_eq!(report.skipped(), 1);
        assert_eq!(
            report.skipped_lines()[0].to_string(),
            "Line 3: expected 4 fields, found 2"
        );
        assert!(!report.is_cancelled());
    }

    #[test]
    fn test_progress_fraction() {
        assert_eq!(ImportProgress::new(1, 4).fraction(), 0.25);
        assert_eq!(ImportProgress::new(0, 0).fraction(), 1.0);
    }

    #[test]
    fn test_stage_terminal() {
        assert!(PipelineStage::Rejected.is_terminal());
        assert!(PipelineStage::Reported.is_terminal());
        assert!(!PipelineStage::Persisting.is_terminal());
    }
}
