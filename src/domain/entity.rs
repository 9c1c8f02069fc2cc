// ==========================================
// Betaflow 制造管理 - 导入实体类型与 Schema 定义
// ==========================================
// 职责: 定义可导入的实体种类、必填字段、字段转换规则、语义规则
// 红线: 纯数据定义，不含解析/校验/落库逻辑
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// EntityKind - 可导入实体种类（封闭枚举）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    RawMaterial, // 原材料
    Product,     // 产品
    Employee,    // 员工
    Machine,     // 机台
}

impl EntityKind {
    /// 全部可导入种类（固定顺序，与上传页签一致）
    pub const ALL: [EntityKind; 4] = [
        EntityKind::RawMaterial,
        EntityKind::Product,
        EntityKind::Employee,
        EntityKind::Machine,
    ];

    /// 上传类型标识（用于模板文件名）
    pub fn slug(&self) -> &'static str {
        match self {
            EntityKind::RawMaterial => "raw-materials",
            EntityKind::Product => "products",
            EntityKind::Employee => "employees",
            EntityKind::Machine => "machines",
        }
    }

    /// 对应的存储表名
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::RawMaterial => "raw_materials",
            EntityKind::Product => "products",
            EntityKind::Employee => "profiles",
            EntityKind::Machine => "machines",
        }
    }

    /// 展示名称
    pub fn title(&self) -> &'static str {
        match self {
            EntityKind::RawMaterial => "Raw Materials",
            EntityKind::Product => "Products",
            EntityKind::Employee => "Employees",
            EntityKind::Machine => "Machines",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// 无法识别的实体种类字符串
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEntityKind(pub String);

impl fmt::Display for UnknownEntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unsupported entity kind: '{}' (expected raw-materials, products, employees, machines)",
            self.0
        )
    }
}

impl std::error::Error for UnknownEntityKind {}

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    /// 接受上传标识、表名、枚举名（大小写不敏感）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "raw_materials" | "raw_material" | "rawmaterial" => Ok(EntityKind::RawMaterial),
            "products" | "product" => Ok(EntityKind::Product),
            "employees" | "employee" | "profiles" => Ok(EntityKind::Employee),
            "machines" | "machine" => Ok(EntityKind::Machine),
            _ => Err(UnknownEntityKind(s.to_string())),
        }
    }
}

// ==========================================
// CoercionRule - 字段类型转换规则
// ==========================================
// 约束: 转换永不失败，解析失败降级为 NULL / 默认值
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoercionRule {
    /// 数值；解析失败取默认值
    NumberOrDefault(f64),
    /// 数值；为空或解析失败为 NULL
    NumberOrNull,
    /// 整数；为空或解析失败为 NULL
    IntegerOrNull,
    /// JSON 结构；为空或解析失败为 NULL
    JsonOrNull,
    /// 枚举值归一化（TRIM + 小写）；未知值原样透传，由存储端裁决
    Enum(&'static [&'static str]),
}

// ==========================================
// SemanticRule - 行级语义校验规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticRule {
    /// 字段必填且为合法邮箱
    ValidEmail(&'static str),
}

// ==========================================
// SchemaDefinition - 每种实体一份
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDefinition {
    pub kind: EntityKind,
    pub required_fields: &'static [&'static str],
    pub coercions: &'static [(&'static str, CoercionRule)],
    pub semantic_rules: &'static [SemanticRule],
}

impl SchemaDefinition {
    /// 查找字段的转换规则
    pub fn coercion_for(&self, field: &str) -> Option<CoercionRule> {
        self.coercions
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, rule)| *rule)
    }

    /// 按 Schema 顺序返回缺失的必填字段
    pub fn missing_fields<F>(&self, has_field: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        self.required_fields
            .iter()
            .filter(|field| !has_field(field))
            .map(|field| field.to_string())
            .collect()
    }
}
