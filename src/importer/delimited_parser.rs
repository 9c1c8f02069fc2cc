// ==========================================
// Betaflow 制造管理 - 分隔文本解析器
// ==========================================
// 规则:
//   - 按换行切分，丢弃空白行
//   - 首个非空行为表头（去 BOM、去首尾空白）
//   - 字段数与表头不一致的行不进入 RawRow 序列，记为 SkippedLine
// 性质: 惰性、有限、可重启（Clone 后从同一文本重新解析），无 IO
// ==========================================

use crate::domain::outcome::SkippedLine;
use crate::domain::record::RawRow;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::iter::Enumerate;
use std::str::Lines;

const UTF8_BOM: char = '\u{feff}';

/// 单行解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Row(RawRow),
    Skipped(SkippedLine),
}

/// 一次性收集的解析结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRows {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    pub skipped: Vec<SkippedLine>,
}

impl ParsedRows {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// DelimitedTextParser
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedTextParser {
    delimiter: u8,
}

impl Default for DelimitedTextParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl DelimitedTextParser {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// 惰性 RawRow 序列（跳过的行被过滤）
    pub fn parse<'a>(&self, text: &'a str) -> RawRows<'a> {
        RawRows {
            inner: self.lines(text),
        }
    }

    /// 惰性逐行结果（含跳过的行）
    pub fn lines<'a>(&self, text: &'a str) -> ParsedLines<'a> {
        ParsedLines {
            delimiter: self.delimiter,
            lines: text.lines().enumerate(),
            header: None,
        }
    }

    /// 收集全部结果
    pub fn parse_all(&self, text: &str) -> ParsedRows {
        let mut lines = self.lines(text);
        let mut parsed = ParsedRows::default();
        for line in lines.by_ref() {
            match line {
                ParsedLine::Row(row) => parsed.rows.push(row),
                ParsedLine::Skipped(skipped) => parsed.skipped.push(skipped),
            }
        }
        parsed.headers = lines.header.unwrap_or_default();
        parsed
    }
}

/// 用 csv 读取器切分单行，支持引号包裹的字段
fn split_line(delimiter: u8, line: &str) -> Option<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => Some(record.iter().map(str::to_string).collect()),
        Ok(false) => Some(Vec::new()),
        Err(_) => None,
    }
}

// ==========================================
// ParsedLines - 逐行迭代器
// ==========================================
#[derive(Debug, Clone)]
pub struct ParsedLines<'a> {
    delimiter: u8,
    lines: Enumerate<Lines<'a>>,
    header: Option<Vec<String>>,
}

impl<'a> ParsedLines<'a> {
    /// 已读取的表头（首个非空行之后可用）
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    fn read_header(&mut self, line: &str) {
        let line = line.trim_start_matches(UTF8_BOM);
        let header = split_line(self.delimiter, line).unwrap_or_else(|| {
            line.split(self.delimiter as char)
                .map(|h| h.trim().to_string())
                .collect()
        });
        self.header = Some(header);
    }
}

impl<'a> Iterator for ParsedLines<'a> {
    type Item = ParsedLine;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (idx, line) = self.lines.next()?;
            if line.trim().is_empty() {
                continue;
            }

            let header = match &self.header {
                Some(header) => header,
                None => {
                    self.read_header(line);
                    continue;
                }
            };

            let line_no = idx + 1;
            let values = split_line(self.delimiter, line).unwrap_or_default();
            if values.len() != header.len() {
                return Some(ParsedLine::Skipped(SkippedLine {
                    line: line_no,
                    expected: header.len(),
                    found: values.len(),
                }));
            }

            // 空表头列（如表头末尾多余的分隔符）不进入 RawRow
            return Some(ParsedLine::Row(RawRow::from_pairs(
                line_no,
                header
                    .iter()
                    .cloned()
                    .zip(values)
                    .filter(|(name, _)| !name.is_empty()),
            )));
        }
    }
}

// ==========================================
// RawRows - 仅产出有效行
// ==========================================
#[derive(Debug, Clone)]
pub struct RawRows<'a> {
    inner: ParsedLines<'a>,
}

impl<'a> Iterator for RawRows<'a> {
    type Item = RawRow;

    fn next(&mut self) -> Option<Self::Item> {
        for line in self.inner.by_ref() {
            if let ParsedLine::Row(row) = line {
                return Some(row);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_rows() {
        let text = "name,sku,unit\nSteel,RM-1,kg\nCopper,RM-2,kg\n";
        let rows: Vec<RawRow> = DelimitedTextParser::default().parse(text).collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("name"), Some("Steel"));
        assert_eq!(rows[1].get("sku"), Some("RM-2"));
        assert_eq!(rows[1].line(), 3);
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let text = "\n  \nname,sku\n\nA,1\n   \nB,2\n";
        let rows: Vec<RawRow> = DelimitedTextParser::default().parse(text).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line(), 5);
    }

    #[test]
    fn test_ragged_lines_are_skipped_and_reported() {
        let text = "name,sku,unit\nA,1,kg\nB,2\nC,3,kg,extra\nD,4,kg";
        let parsed = DelimitedTextParser::default().parse_all(text);

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1].get("name"), Some("D"));
        assert_eq!(
            parsed.skipped,
            vec![
                SkippedLine { line: 3, expected: 3, found: 2 },
                SkippedLine { line: 4, expected: 3, found: 4 },
            ]
        );
    }

    #[test]
    fn test_blank_header_columns_are_dropped() {
        let text = "name,sku,,unit,\nSteel,RM-1,,kg,\nCopper,RM-2,note,kg,\n";
        let parsed = DelimitedTextParser::default().parse_all(text);

        assert!(parsed.skipped.is_empty());
        assert_eq!(parsed.rows.len(), 2);
        for row in &parsed.rows {
            assert_eq!(row.len(), 3);
            assert!(!row.contains(""));
        }
        assert_eq!(parsed.rows[1].get("unit"), Some("kg"));
    }

    #[test]
    fn test_quoted_field_keeps_delimiter() {
        let text = "name,sku,supplier\n\"Bolt, M8\",B-8,\"Acme, Inc.\"\n";
        let rows: Vec<RawRow> = DelimitedTextParser::default().parse(text).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name"), Some("Bolt, M8"));
        assert_eq!(rows[0].get("supplier"), Some("Acme, Inc."));
    }

    #[test]
    fn test_header_and_values_are_trimmed_and_bom_stripped() {
        let text = "\u{feff} name , sku \r\n  Steel ,  RM-1 \r\n";
        let parsed = DelimitedTextParser::default().parse_all(text);
        assert_eq!(parsed.headers, vec!["name", "sku"]);
        assert_eq!(parsed.rows[0].get("name"), Some("Steel"));
        assert_eq!(parsed.rows[0].get("sku"), Some("RM-1"));
    }

    #[test]
    fn test_custom_delimiter() {
        let text = "name;sku\nSteel;RM-1\n";
        let rows: Vec<RawRow> = DelimitedTextParser::new(b';').parse(text).collect();
        assert_eq!(rows[0].get("sku"), Some("RM-1"));
    }

    #[test]
    fn test_parse_is_restartable() {
        let text = "name,sku\nA,1\nB,2\n";
        let rows = DelimitedTextParser::default().parse(text);
        let first: Vec<RawRow> = rows.clone().collect();
        let second: Vec<RawRow> = rows.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_header_only_or_empty_text() {
        assert!(DelimitedTextParser::default().parse_all("name,sku\n").is_empty());
        let parsed = DelimitedTextParser::default().parse_all("");
        assert!(parsed.is_empty());
        assert!(parsed.headers.is_empty());
    }
}
