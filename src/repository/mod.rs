// ==========================================
// Betaflow 制造管理 - 数据存储层
// ==========================================
// 红线: 存储层不含导入规则
// 职责: 按实体种类单行写入，屏蔽存储细节
// 约束: 所有写入使用参数化，列名走白名单
// ==========================================

pub mod entity_store;
pub mod error;
pub mod memory_store;
pub mod sqlite_entity_store;

pub use entity_store::EntityStore;
pub use error::{StoreError, StoreResult};
pub use memory_store::InMemoryEntityStore;
pub use sqlite_entity_store::SqliteEntityStore;
