// ==========================================
// Mock 实体存储 - 用于集成测试
// ==========================================
// 按调用序号（从 1 起，含重试）预设每次 insert 的行为
// ==========================================

use async_trait::async_trait;
use betaflow_import::domain::{EntityKind, TransformedRecord};
use betaflow_import::repository::{EntityStore, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// 单次 insert 的预设行为
#[derive(Debug, Clone)]
pub enum InsertBehavior {
    Accept,
    Reject(StoreError),
    Panic,
    Hang(Duration),
}

/// Mock 存储
#[derive(Default)]
pub struct MockStore {
    calls: AtomicUsize,
    script: Mutex<HashMap<usize, InsertBehavior>>,
    inserted: Mutex<Vec<(EntityKind, TransformedRecord)>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 第 `call` 次 insert 使用给定行为
    pub fn on_call(self, call: usize, behavior: InsertBehavior) -> Self {
        self.script.lock().unwrap().insert(call, behavior);
        self
    }

    /// 第 `call` 次 insert 返回唯一约束冲突
    pub fn reject_call(self, call: usize, detail: &str) -> Self {
        self.on_call(
            call,
            InsertBehavior::Reject(StoreError::UniqueConstraintViolation(detail.to_string())),
        )
    }

    /// insert 调用总次数
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 已接受的记录（写入顺序）
    pub fn inserted(&self) -> Vec<TransformedRecord> {
        self.inserted
            .lock()
            .unwrap()
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }
}

#[async_trait]
impl EntityStore for MockStore {
    async fn insert(&self, kind: EntityKind, record: &TransformedRecord) -> StoreResult<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let behavior = self
            .script
            .lock()
            .unwrap()
            .get(&call)
            .cloned()
            .unwrap_or(InsertBehavior::Accept);

        match behavior {
            InsertBehavior::Accept => {
                self.inserted.lock().unwrap().push((kind, record.clone()));
                Ok(())
            }
            InsertBehavior::Reject(err) => Err(err),
            InsertBehavior::Panic => panic!("mock store exploded on call {}", call),
            InsertBehavior::Hang(duration) => {
                tokio::time::sleep(duration).await;
                self.inserted.lock().unwrap().push((kind, record.clone()));
                Ok(())
            }
        }
    }

    async fn count(&self, kind: EntityKind) -> StoreResult<usize> {
        Ok(self
            .inserted
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count())
    }
}
