// ==========================================
// Betaflow 制造管理 - 导入进度观察者
// ==========================================

use crate::domain::outcome::{ImportProgress, PipelineStage};
use std::sync::Arc;

/// 导入观察者 Trait
///
/// 宿主实现此 trait 接收阶段切换与落库进度
///
/// # 调用时机
/// - `on_stage`: 每次管道阶段切换
/// - `on_progress`: 落库阶段每处理完一行
pub trait ImportObserver: Send + Sync {
    fn on_stage(&self, _stage: PipelineStage) {}

    fn on_progress(&self, _progress: ImportProgress) {}
}

/// 空操作观察者
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl ImportObserver for NoOpObserver {}

/// 可选的观察者包装
///
/// 简化 Option<Arc<dyn ImportObserver>> 的使用
#[derive(Clone, Default)]
pub struct OptionalObserver {
    inner: Option<Arc<dyn ImportObserver>>,
}

impl OptionalObserver {
    pub fn with_observer(observer: Arc<dyn ImportObserver>) -> Self {
        Self {
            inner: Some(observer),
        }
    }

    pub fn none() -> Self {
        Self { inner: None }
    }

    pub fn is_configured(&self) -> bool {
        self.inner.is_some()
    }
}

impl ImportObserver for OptionalObserver {
    fn on_stage(&self, stage: PipelineStage) {
        match &self.inner {
            Some(observer) => observer.on_stage(stage),
            None => tracing::trace!("OptionalObserver: 未配置观察者，跳过阶段通知 - stage={}", stage),
        }
    }

    fn on_progress(&self, progress: ImportProgress) {
        if let Some(observer) = &self.inner {
            observer.on_progress(progress);
        }
    }
}
