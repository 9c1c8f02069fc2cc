// ==========================================
// Betaflow 制造管理 - 内存实体存储
// ==========================================
// 用途: 无数据库场景 / 演示 / 测试
// 约束: 与 SQLite 适配器相同的唯一键语义（sku / email）
// ==========================================

use crate::domain::entity::EntityKind;
use crate::domain::record::{FieldValue, TransformedRecord};
use crate::repository::entity_store::EntityStore;
use crate::repository::error::{StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// 默认唯一键
fn default_unique_key(kind: EntityKind) -> Option<&'static str> {
    match kind {
        EntityKind::RawMaterial | EntityKind::Product => Some("sku"),
        EntityKind::Employee => Some("email"),
        EntityKind::Machine => None,
    }
}

pub struct InMemoryEntityStore {
    records: Mutex<HashMap<EntityKind, Vec<TransformedRecord>>>,
    unique_keys: HashMap<EntityKind, &'static str>,
}

impl Default for InMemoryEntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        let unique_keys = EntityKind::ALL
            .iter()
            .filter_map(|kind| default_unique_key(*kind).map(|key| (*kind, key)))
            .collect();
        Self {
            records: Mutex::new(HashMap::new()),
            unique_keys,
        }
    }

    /// 覆盖某种实体的唯一键
    pub fn with_unique_key(mut self, kind: EntityKind, field: &'static str) -> Self {
        self.unique_keys.insert(kind, field);
        self
    }

    /// 取消某种实体的唯一键
    pub fn without_unique_key(mut self, kind: EntityKind) -> Self {
        self.unique_keys.remove(&kind);
        self
    }

    /// 已写入记录快照（写入顺序）
    pub fn records(&self, kind: EntityKind) -> StoreResult<Vec<TransformedRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))?;
        Ok(records.get(&kind).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn insert(&self, kind: EntityKind, record: &TransformedRecord) -> StoreResult<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StoreError::LockError(e.to_string()))?;
        let existing = records.entry(kind).or_default();

        if let Some(key) = self.unique_keys.get(&kind) {
            if let Some(value) = record.get(key).filter(|v| !v.is_null()) {
                let duplicate = existing
                    .iter()
                    .any(|r| r.get(key) == Some(value));
                if duplicate {
                    let shown = match value {
                        FieldValue::Text(s) => s.clone(),
                        other => format!("{:?}", other),
                    };
                    return Err(StoreError::UniqueConstraintViolation(format!(
                        "{}.{} = '{}'",
                        kind.table_name(),
                        key,
                        shown
                    )));
                }
            }
        }

        existing.push(record.clone());
        Ok(())
    }

    async fn count(&self, kind: EntityKind) -> StoreResult<usize> {
        Ok(self.records(kind)?.len())
    }
}
