// ==========================================
// Betaflow 制造管理 - Schema 注册表
// ==========================================
// 职责: 实体种类 → SchemaDefinition 的静态映射
// 约束: 纯函数，无副作用，无错误分支
// ==========================================

use crate::domain::entity::{CoercionRule, EntityKind, SchemaDefinition, SemanticRule};

/// 机台状态枚举值
pub const MACHINE_STATUSES: &[&str] = &["running", "idle", "maintenance", "breakdown", "offline"];

/// 员工角色枚举值
pub const USER_ROLES: &[&str] = &["production_manager", "machine_operator", "operations_admin"];

static RAW_MATERIAL_SCHEMA: SchemaDefinition = SchemaDefinition {
    kind: EntityKind::RawMaterial,
    required_fields: &["name", "sku", "unit", "current_stock", "minimum_stock"],
    coercions: &[
        ("current_stock", CoercionRule::NumberOrDefault(0.0)),
        ("minimum_stock", CoercionRule::NumberOrDefault(0.0)),
        ("unit_cost", CoercionRule::NumberOrNull),
    ],
    semantic_rules: &[],
};

static PRODUCT_SCHEMA: SchemaDefinition = SchemaDefinition {
    kind: EntityKind::Product,
    required_fields: &["name", "sku", "category", "unit_price"],
    coercions: &[
        ("unit_price", CoercionRule::NumberOrNull),
        ("production_time_minutes", CoercionRule::IntegerOrNull),
    ],
    semantic_rules: &[],
};

static EMPLOYEE_SCHEMA: SchemaDefinition = SchemaDefinition {
    kind: EntityKind::Employee,
    required_fields: &["full_name", "email", "role", "department"],
    coercions: &[("role", CoercionRule::Enum(USER_ROLES))],
    semantic_rules: &[SemanticRule::ValidEmail("email")],
};

static MACHINE_SCHEMA: SchemaDefinition = SchemaDefinition {
    kind: EntityKind::Machine,
    required_fields: &["name", "type", "location", "status"],
    coercions: &[
        ("status", CoercionRule::Enum(MACHINE_STATUSES)),
        ("specifications", CoercionRule::JsonOrNull),
    ],
    semantic_rules: &[],
};

// ==========================================
// SchemaRegistry
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaRegistry;

impl SchemaRegistry {
    /// 查询实体种类对应的 Schema
    pub fn get(kind: EntityKind) -> &'static SchemaDefinition {
        match kind {
            EntityKind::RawMaterial => &RAW_MATERIAL_SCHEMA,
            EntityKind::Product => &PRODUCT_SCHEMA,
            EntityKind::Employee => &EMPLOYEE_SCHEMA,
            EntityKind::Machine => &MACHINE_SCHEMA,
        }
    }

    /// 支持导入的实体种类
    pub fn supported_kinds() -> Vec<EntityKind> {
        EntityKind::ALL.to_vec()
    }
}
