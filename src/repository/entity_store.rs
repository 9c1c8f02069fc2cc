// ==========================================
// Betaflow 制造管理 - 实体存储 Trait
// ==========================================
// 职责: 每种实体的单行写入（无批量写入）
// 红线: 存储不含导入规则，只做数据写入
// 实现者: SqliteEntityStore / InMemoryEntityStore
// ==========================================

use crate::domain::entity::EntityKind;
use crate::domain::record::TransformedRecord;
use crate::repository::error::StoreResult;
use async_trait::async_trait;

#[async_trait]
pub trait EntityStore: Send + Sync {
    /// 写入单条记录
    ///
    /// # 返回
    /// - Ok(()): 写入成功
    /// - Err(StoreError): 约束冲突 / 未知列 / 不可用等，消息可直接展示
    async fn insert(&self, kind: EntityKind, record: &TransformedRecord) -> StoreResult<()>;

    /// 统计某种实体的记录数
    async fn count(&self, kind: EntityKind) -> StoreResult<usize>;
}
