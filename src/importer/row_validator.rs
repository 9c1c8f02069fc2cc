// ==========================================
// Betaflow 制造管理 - 行校验器
// ==========================================
// 两级校验（只读，不触碰存储）:
//   1. 结构: 首行列集合缺少必填字段 → 整批拒绝；零数据行 → 整批拒绝
//   2. 语义: 逐行规则，任一违规 → 整批拒绝（错误按 "Row N: ..." 收集）
// ==========================================

use crate::domain::entity::{EntityKind, SchemaDefinition, SemanticRule};
use crate::domain::record::{RawRow, ValidatedRow};
use crate::importer::bulk_importer_trait::RowValidator;
use crate::importer::error::{ImportError, ImportResult};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// local-part@domain.tld，各段不含空白与 @
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaRowValidator;

impl SchemaRowValidator {
    pub fn new() -> Self {
        Self
    }

    /// 结构校验: 以首行列集合为准
    fn check_structure(rows: &[RawRow], schema: &SchemaDefinition) -> ImportResult<()> {
        let first = rows.first().ok_or(ImportError::NoData)?;
        let missing = schema.missing_fields(|field| first.contains(field));
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing));
        }
        Ok(())
    }

    /// 语义校验: 返回该行全部违规描述
    fn check_row(row_number: usize, row: &RawRow, rules: &[SemanticRule]) -> Vec<String> {
        let mut errors = Vec::new();
        for rule in rules {
            match rule {
                SemanticRule::ValidEmail(field) => {
                    let value = row.get(field).unwrap_or("");
                    if value.is_empty() {
                        errors.push(format!("Row {}: Email is required", row_number));
                    } else if !is_valid_email(value) {
                        errors.push(format!(
                            "Row {}: Invalid email format '{}'",
                            row_number, value
                        ));
                    }
                }
            }
        }
        errors
    }
}

impl RowValidator for SchemaRowValidator {
    fn validate(
        &self,
        rows: Vec<RawRow>,
        schema: &SchemaDefinition,
        kind: EntityKind,
    ) -> ImportResult<Vec<ValidatedRow>> {
        Self::check_structure(&rows, schema)?;

        let errors: Vec<String> = rows
            .iter()
            .enumerate()
            .flat_map(|(idx, row)| Self::check_row(idx + 1, row, schema.semantic_rules))
            .collect();
        if !errors.is_empty() {
            debug!(kind = %kind, errors = errors.len(), "语义校验未通过");
            return Err(ImportError::SemanticRejection(errors));
        }

        debug!(kind = %kind, rows = rows.len(), "校验通过");
        Ok(rows.into_iter().map(ValidatedRow::new).collect())
    }
}
