// ==========================================
// Betaflow 制造管理 - 导入行记录
// ==========================================
// 生命周期: RawRow(解析) → ValidatedRow(校验) → TransformedRecord(转换) → 落库
// ==========================================

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

// ==========================================
// RawRow - 原始行（列名 → 原始字符串）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    line: usize, // 源文件物理行号（1 起）
    fields: HashMap<String, String>,
}

impl RawRow {
    /// 由表头与值按位置拼接
    pub fn from_pairs<I, K, V>(line: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            line,
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> HashMap<String, String> {
        self.fields
    }
}

// ==========================================
// ValidatedRow - 已通过结构/语义校验的行
// ==========================================
// 仅由行校验器构造
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRow {
    row: RawRow,
}

impl ValidatedRow {
    pub(crate) fn new(row: RawRow) -> Self {
        Self { row }
    }

    pub fn raw(&self) -> &RawRow {
        &self.row
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.row.get(field)
    }

    pub fn into_raw(self) -> RawRow {
        self.row
    }
}

// ==========================================
// FieldValue - 转换后的字段值
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Text(String),
    Number(f64),
    Integer(i64),
    Json(serde_json::Value),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

// ==========================================
// TransformedRecord - 待落库记录（字段名有序）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct TransformedRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl TransformedRecord {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_row_from_pairs() {
        let row = RawRow::from_pairs(2, [("name", "Steel"), ("sku", "RM-1")]);
        assert_eq!(row.line(), 2);
        assert_eq!(row.get("sku"), Some("RM-1"));
        assert!(row.contains("name"));
        assert!(!row.contains("unit"));
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_field_value_serializes_untagged() {
        let mut record = TransformedRecord::default();
        record.insert("unit_cost", FieldValue::Null);
        record.insert("current_stock", FieldValue::Number(12.5));
        record.insert("name", FieldValue::Text("Bolt".to_string()));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fields": { "current_stock": 12.5, "name": "Bolt", "unit_cost": null }
            })
        );
    }
}
