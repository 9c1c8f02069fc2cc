// ==========================================
// 记录型观察者 - 用于集成测试
// ==========================================

use betaflow_import::domain::{ImportProgress, PipelineStage};
use betaflow_import::importer::{CancellationToken, ImportObserver};
use std::sync::Mutex;

#[derive(Default)]
pub struct RecordingObserver {
    pub stages: Mutex<Vec<PipelineStage>>,
    pub progress: Mutex<Vec<ImportProgress>>,
    /// 处理完第 N 行后触发取消
    cancel_after: Option<(usize, CancellationToken)>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancelling_after(rows: usize, token: CancellationToken) -> Self {
        Self {
            cancel_after: Some((rows, token)),
            ..Self::default()
        }
    }

    pub fn stages(&self) -> Vec<PipelineStage> {
        self.stages.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<ImportProgress> {
        self.progress.lock().unwrap().clone()
    }
}

impl ImportObserver for RecordingObserver {
    fn on_stage(&self, stage: PipelineStage) {
        self.stages.lock().unwrap().push(stage);
    }

    fn on_progress(&self, progress: ImportProgress) {
        self.progress.lock().unwrap().push(progress);
        if let Some((rows, token)) = &self.cancel_after {
            if progress.processed >= *rows {
                token.cancel();
            }
        }
    }
}
