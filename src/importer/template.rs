// ==========================================
// Betaflow 制造管理 - 导入模板生成
// ==========================================

use crate::domain::entity::EntityKind;
use crate::importer::schema_registry::SchemaRegistry;
use serde::{Deserialize, Serialize};

/// 可下载的模板文件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFile {
    pub file_name: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    /// 必填字段逗号拼接的单行表头
    pub fn generate(kind: EntityKind) -> String {
        SchemaRegistry::get(kind).required_fields.join(",")
    }

    /// `<kind>_template.csv`
    pub fn file_name(kind: EntityKind) -> String {
        format!("{}_template.csv", kind.slug())
    }

    pub fn file(kind: EntityKind) -> TemplateFile {
        TemplateFile {
            file_name: Self::file_name(kind),
            content: Self::generate(kind),
        }
    }
}
