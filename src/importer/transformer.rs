// ==========================================
// Betaflow 制造管理 - 字段类型转换
// ==========================================
// 约束: 转换永不失败
//   - 可选数值/JSON 字段解析失败 → NULL
//   - 库存类数值解析失败 → 默认值
//   - 未配置规则的字段 → 原样文本
// ==========================================

use crate::domain::entity::{CoercionRule, EntityKind};
use crate::domain::record::{FieldValue, TransformedRecord, ValidatedRow};
use crate::importer::bulk_importer_trait::RecordTransformer;
use crate::importer::schema_registry::SchemaRegistry;

/// 严格数值解析；"12abc"、NaN、inf 均视为无法解析
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// 整数解析；小数截断（"12.5" → 12）
fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    trimmed.parse::<i64>().ok().or_else(|| {
        parse_number(trimmed)
            .filter(|n| *n >= i64::MIN as f64 && *n <= i64::MAX as f64)
            .map(|n| n.trunc() as i64)
    })
}

/// 按规则转换单个原始值
pub fn coerce(rule: CoercionRule, raw: &str) -> FieldValue {
    let trimmed = raw.trim();
    match rule {
        CoercionRule::NumberOrDefault(default) => {
            FieldValue::Number(parse_number(trimmed).unwrap_or(default))
        }
        CoercionRule::NumberOrNull => parse_number(trimmed)
            .map(FieldValue::Number)
            .unwrap_or(FieldValue::Null),
        CoercionRule::IntegerOrNull => parse_integer(trimmed)
            .map(FieldValue::Integer)
            .unwrap_or(FieldValue::Null),
        CoercionRule::JsonOrNull => {
            if trimmed.is_empty() {
                return FieldValue::Null;
            }
            serde_json::from_str(trimmed)
                .map(FieldValue::Json)
                .unwrap_or(FieldValue::Null)
        }
        CoercionRule::Enum(allowed) => {
            let normalized = trimmed.to_lowercase();
            if allowed.contains(&normalized.as_str()) {
                FieldValue::Text(normalized)
            } else {
                // 未知值透传，由存储端报错
                FieldValue::Text(raw.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaTransformer;

impl SchemaTransformer {
    pub fn new() -> Self {
        Self
    }
}

impl RecordTransformer for SchemaTransformer {
    fn transform(&self, row: ValidatedRow, kind: EntityKind) -> TransformedRecord {
        let schema = SchemaRegistry::get(kind);
        let mut record = TransformedRecord::default();

        for (field, raw) in row.into_raw().into_fields() {
            let value = match schema.coercion_for(&field) {
                Some(rule) => coerce(rule, &raw),
                None => FieldValue::Text(raw),
            };
            record.insert(field, value);
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::RawRow;
    use crate::importer::schema_registry::{MACHINE_STATUSES, USER_ROLES};
    use serde_json::json;

    fn validated(pairs: &[(&str, &str)]) -> ValidatedRow {
        ValidatedRow::new(RawRow::from_pairs(2, pairs.iter().copied()))
    }

    #[test]
    fn test_raw_material_unparseable_cost_is_null() {
        let row = validated(&[
            ("name", "Steel"),
            ("sku", "RM-1"),
            ("unit", "kg"),
            ("current_stock", "12.5"),
            ("minimum_stock", "lots"),
            ("unit_cost", "abc"),
        ]);
        let record = SchemaTransformer::new().transform(row, EntityKind::RawMaterial);

        assert_eq!(record.get("current_stock"), Some(&FieldValue::Number(12.5)));
        assert_eq!(record.get("minimum_stock"), Some(&FieldValue::Number(0.0)));
        assert_eq!(record.get("unit_cost"), Some(&FieldValue::Null));
        assert_eq!(record.get("name"), Some(&FieldValue::Text("Steel".to_string())));
    }

    #[test]
    fn test_absent_optional_column_is_omitted() {
        let row = validated(&[("name", "Steel"), ("current_stock", "")]);
        let record = SchemaTransformer::new().transform(row, EntityKind::RawMaterial);
        assert_eq!(record.get("unit_cost"), None);
        assert_eq!(record.get("current_stock"), Some(&FieldValue::Number(0.0)));
    }

    #[test]
    fn test_product_numbers() {
        let row = validated(&[
            ("unit_price", "0"),
            ("production_time_minutes", "12.5"),
        ]);
        let record = SchemaTransformer::new().transform(row, EntityKind::Product);
        assert_eq!(record.get("unit_price"), Some(&FieldValue::Number(0.0)));
        assert_eq!(record.get("production_time_minutes"), Some(&FieldValue::Integer(12)));

        assert_eq!(coerce(CoercionRule::IntegerOrNull, ""), FieldValue::Null);
        assert_eq!(coerce(CoercionRule::NumberOrNull, "12abc"), FieldValue::Null);
        assert_eq!(coerce(CoercionRule::NumberOrNull, "NaN"), FieldValue::Null);
    }

    #[test]
    fn test_machine_specifications_json() {
        let row = validated(&[("specifications", r#"{"max_rpm": 3000}"#), ("status", " Running ")]);
        let record = SchemaTransformer::new().transform(row, EntityKind::Machine);
        assert_eq!(
            record.get("specifications"),
            Some(&FieldValue::Json(json!({"max_rpm": 3000})))
        );
        assert_eq!(record.get("status"), Some(&FieldValue::Text("running".to_string())));

        assert_eq!(coerce(CoercionRule::JsonOrNull, "{broken"), FieldValue::Null);
    }

    #[test]
    fn test_unknown_enum_passes_through() {
        assert_eq!(
            coerce(CoercionRule::Enum(MACHINE_STATUSES), "exploded"),
            FieldValue::Text("exploded".to_string())
        );
        assert_eq!(
            coerce(CoercionRule::Enum(USER_ROLES), "OPERATIONS_ADMIN"),
            FieldValue::Text("operations_admin".to_string())
        );
    }

    #[test]
    fn test_employee_fields_pass_through() {
        let row = validated(&[("full_name", "Ana"), ("email", "ana@plant.io"), ("phone", "555")]);
        let record = SchemaTransformer::new().transform(row, EntityKind::Employee);
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("phone"), Some(&FieldValue::Text("555".to_string())));
    }
}
