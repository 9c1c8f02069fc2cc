// ==========================================
// Betaflow 制造管理 - SQLite 实体存储
// ==========================================
// 职责: TransformedRecord → 对应表的单行 INSERT
// 约束:
//   - 列名必须在表的白名单内（表头不直接拼进 SQL）
//   - 未提供 id 时生成 UUID；created_at/updated_at 使用 RFC 3339
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::entity::EntityKind;
use crate::domain::record::{FieldValue, TransformedRecord};
use crate::repository::entity_store::EntityStore;
use crate::repository::error::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// 各表可写入的列
pub fn insertable_columns(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::RawMaterial => &[
            "id",
            "name",
            "sku",
            "unit",
            "current_stock",
            "minimum_stock",
            "unit_cost",
            "location",
            "supplier_id",
            "created_at",
            "updated_at",
        ],
        EntityKind::Product => &[
            "id",
            "name",
            "sku",
            "category",
            "description",
            "unit_price",
            "production_time_minutes",
            "raw_materials",
            "created_at",
            "updated_at",
        ],
        EntityKind::Employee => &[
            "id",
            "full_name",
            "email",
            "role",
            "department",
            "phone",
            "shift",
            "created_at",
            "updated_at",
        ],
        EntityKind::Machine => &[
            "id",
            "name",
            "type",
            "location",
            "status",
            "specifications",
            "last_maintenance",
            "next_maintenance",
            "created_at",
            "updated_at",
        ],
    }
}

fn to_sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Text(s) => Value::Text(s.clone()),
        FieldValue::Number(n) => Value::Real(*n),
        FieldValue::Integer(i) => Value::Integer(*i),
        FieldValue::Json(v) => Value::Text(v.to_string()),
    }
}

// ==========================================
// SqliteEntityStore
// ==========================================
pub struct SqliteEntityStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteEntityStore {
    /// 打开数据库文件（不建表）
    pub fn new(db_path: &str) -> StoreResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// 复用已有连接
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn build_insert(
        kind: EntityKind,
        record: &TransformedRecord,
    ) -> StoreResult<(String, Vec<Value>)> {
        let table = kind.table_name();
        let allowed = insertable_columns(kind);

        let mut columns: Vec<&str> = Vec::with_capacity(record.len() + 3);
        let mut values: Vec<Value> = Vec::with_capacity(record.len() + 3);
        for (field, value) in record.iter() {
            let column = allowed
                .iter()
                .copied()
                .find(|c| *c == field)
                .ok_or_else(|| StoreError::UnknownColumn {
                    table: table.to_string(),
                    column: field.to_string(),
                })?;
            columns.push(column);
            values.push(to_sql_value(value));
        }

        if record.get("id").is_none() {
            columns.push("id");
            values.push(Value::Text(Uuid::new_v4().to_string()));
        }
        let now = Utc::now().to_rfc3339();
        for column in ["created_at", "updated_at"] {
            if record.get(column).is_none() {
                columns.push(column);
                values.push(Value::Text(now.clone()));
            }
        }

        let column_list = columns
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table, column_list, placeholders
        );
        Ok((sql, values))
    }
}

/// 调用方 future 被丢弃（超时）时置位
struct AbandonOnDrop(Arc<AtomicBool>);

impl Drop for AbandonOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl SqliteEntityStore {
    /// 在阻塞线程池中持锁执行，避免阻塞异步执行器
    ///
    /// 调用方超时放弃后，拿到锁的任务不再执行 `op`。
    async fn run_blocking<T, F>(&self, op: F) -> StoreResult<Option<T>>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let abandoned = Arc::new(AtomicBool::new(false));
        let _abandon_guard = AbandonOnDrop(Arc::clone(&abandoned));

        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::LockError(e.to_string()))?;
            if abandoned.load(Ordering::SeqCst) {
                tracing::debug!("调用方已放弃，跳过数据库操作");
                return Ok(None);
            }
            op(&*conn).map(Some)
        })
        .await
        .map_err(|e| StoreError::TaskFailed(e.to_string()))?
    }
}

#[async_trait]
impl EntityStore for SqliteEntityStore {
    async fn insert(&self, kind: EntityKind, record: &TransformedRecord) -> StoreResult<()> {
        let (sql, values) = Self::build_insert(kind, record)?;
        self.run_blocking(move |conn| {
            conn.execute(&sql, params_from_iter(values))?;
            Ok(())
        })
        .await?;
        Ok(())
    }

    async fn count(&self, kind: EntityKind) -> StoreResult<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table_name());
        let count = self
            .run_blocking(move |conn| {
                let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
                Ok(count as usize)
            })
            .await?;
        Ok(count.unwrap_or(0))
    }
}
