// ==========================================
// Betaflow 制造管理 - 顺序落库驱动
// ==========================================
// 规则:
//   - 严格按顺序逐行写入，同一时刻仅一个写入在途
//   - 单行失败计入 ImportOutcome，继续下一行（不回滚已写入行）
//   - 每行写入前检查取消令牌；每行结束后上报进度
//   - 单行写入带超时；瞬时错误按指数退避有限重试
// ==========================================

use crate::config::import_settings::ImportSettings;
use crate::domain::entity::EntityKind;
use crate::domain::outcome::{ImportOutcome, ImportProgress};
use crate::domain::record::TransformedRecord;
use crate::importer::cancel::CancellationToken;
use crate::importer::progress::ImportObserver;
use crate::repository::entity_store::EntityStore;
use crate::repository::error::StoreError;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, info, warn};

const UNEXPECTED_ERROR: &str = "Unexpected error";

/// 单次写入失败
enum InsertFailure {
    Store(StoreError),
    Panicked,
}

impl InsertFailure {
    fn is_transient(&self) -> bool {
        match self {
            InsertFailure::Store(e) => e.is_transient(),
            InsertFailure::Panicked => false,
        }
    }

    fn into_message(self) -> String {
        match self {
            InsertFailure::Store(e) => e.to_string(),
            InsertFailure::Panicked => UNEXPECTED_ERROR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequentialPersistenceDriver {
    insert_timeout: Duration,
    max_retries: u32,
    retry_backoff: Duration,
}

impl Default for SequentialPersistenceDriver {
    fn default() -> Self {
        Self::from_settings(&ImportSettings::default())
    }
}

impl SequentialPersistenceDriver {
    pub fn new(insert_timeout: Duration, max_retries: u32, retry_backoff: Duration) -> Self {
        Self {
            insert_timeout,
            max_retries,
            retry_backoff,
        }
    }

    pub fn from_settings(settings: &ImportSettings) -> Self {
        Self::new(
            settings.insert_timeout,
            settings.max_retries,
            settings.retry_backoff,
        )
    }

    /// 逐行落库，返回累加结果
    ///
    /// 取消时返回已处理部分，`is_cancelled()` 为 true
    pub async fn persist<S>(
        &self,
        store: &S,
        records: Vec<TransformedRecord>,
        kind: EntityKind,
        observer: &dyn ImportObserver,
        cancel: &CancellationToken,
    ) -> ImportOutcome
    where
        S: EntityStore + ?Sized,
    {
        let total = records.len();
        let mut outcome = ImportOutcome::new();

        for (idx, record) in records.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(kind = %kind, processed = idx, total, "导入已取消，停止落库");
                outcome.mark_cancelled();
                break;
            }

            let row = idx + 1;
            match self.insert_with_retry(store, kind, record, row).await {
                Ok(()) => outcome.record_success(),
                Err(message) => {
                    warn!(kind = %kind, row, error = %message, "行写入失败");
                    outcome.record_failure(row, message);
                }
            }

            observer.on_progress(ImportProgress::new(row, total));
        }

        outcome
    }

    async fn insert_with_retry<S>(
        &self,
        store: &S,
        kind: EntityKind,
        record: &TransformedRecord,
        row: usize,
    ) -> Result<(), String>
    where
        S: EntityStore + ?Sized,
    {
        let mut attempt: u32 = 0;
        loop {
            match self.insert_once(store, kind, record).await {
                Ok(()) => return Ok(()),
                Err(failure) if failure.is_transient() && attempt < self.max_retries => {
                    let backoff = self
                        .retry_backoff
                        .saturating_mul(2u32.saturating_pow(attempt));
                    attempt += 1;
                    debug!(
                        kind = %kind,
                        row,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        "瞬时错误，退避后重试"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(failure) => return Err(failure.into_message()),
            }
        }
    }

    async fn insert_once<S>(
        &self,
        store: &S,
        kind: EntityKind,
        record: &TransformedRecord,
    ) -> Result<(), InsertFailure>
    where
        S: EntityStore + ?Sized,
    {
        let attempt = AssertUnwindSafe(store.insert(kind, record)).catch_unwind();
        match tokio::time::timeout(self.insert_timeout, attempt).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(e))) => Err(InsertFailure::Store(e)),
            Ok(Err(_panic)) => Err(InsertFailure::Panicked),
            Err(_elapsed) => Err(InsertFailure::Store(StoreError::Timeout {
                timeout_ms: self.insert_timeout.as_millis() as u64,
            })),
        }
    }
}
