// ==========================================
// Betaflow 制造管理 - 文件解析器实现
// ==========================================
// 支持: CSV (.csv) / Excel (.xlsx/.xls)
// 输出: 与文本解析器一致的 ParsedRows
// ==========================================

use crate::domain::outcome::SkippedLine;
use crate::domain::record::RawRow;
use crate::importer::bulk_importer_trait::FileParser;
use crate::importer::delimited_parser::{DelimitedTextParser, ParsedRows};
use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use std::path::Path;
use tracing::debug;

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFileParser {
    parser: DelimitedTextParser,
}

impl CsvFileParser {
    pub fn new(parser: DelimitedTextParser) -> Self {
        Self { parser }
    }
}

impl FileParser for CsvFileParser {
    fn parse_file(&self, path: &Path) -> ImportResult<ParsedRows> {
        ensure_exists(path)?;

        let text = std::fs::read_to_string(path)?;
        let parsed = self.parser.parse_all(&text);
        debug!(
            path = %path.display(),
            rows = parsed.rows.len(),
            skipped = parsed.skipped.len(),
            "CSV 文件解析完成"
        );
        Ok(parsed)
    }
}

/// 按表头拼接工作表行
///
/// 表头为首个非空行；空表头列被丢弃。数据行在最后一个具名列之后
/// 仍有非空单元格时记为 SkippedLine，与文本解析器的多字段行一致。
fn sheet_rows<I>(first_line: usize, rows: I) -> ParsedRows
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut parsed = ParsedRows::default();
    let mut rows = rows.into_iter().enumerate();

    for (_, headers) in rows.by_ref() {
        if headers.iter().any(|h| !h.is_empty()) {
            parsed.headers = headers;
            break;
        }
    }
    let width = parsed
        .headers
        .iter()
        .rposition(|h| !h.is_empty())
        .map_or(0, |pos| pos + 1);

    for (idx, values) in rows {
        // 跳过完全空白的行
        let Some(last) = values.iter().rposition(|v| !v.is_empty()) else {
            continue;
        };
        let line = first_line + idx;
        if last + 1 > width {
            parsed.skipped.push(SkippedLine {
                line,
                expected: width,
                found: last + 1,
            });
            continue;
        }

        parsed.rows.push(RawRow::from_pairs(
            line,
            parsed
                .headers
                .iter()
                .cloned()
                .zip(values)
                .filter(|(name, _)| !name.is_empty()),
        ));
    }
    parsed
}

// ==========================================
// Excel Parser 实现（首个工作表）
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_file(&self, path: &Path) -> ImportResult<ParsedRows> {
        ensure_exists(path)?;

        let mut workbook = open_workbook_auto(path)?;
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("workbook has no sheets".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        // 工作表可能不从第 1 行开始
        let first_line = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
        let parsed = sheet_rows(
            first_line,
            range.rows().map(|row| {
                row.iter()
                    .map(|cell| cell.to_string().trim().to_string())
                    .collect()
            }),
        );

        debug!(
            path = %path.display(),
            sheet = %sheet_name,
            rows = parsed.rows.len(),
            skipped = parsed.skipped.len(),
            "Excel 文件解析完成"
        );
        Ok(parsed)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct UniversalFileParser {
    csv: CsvFileParser,
}

impl UniversalFileParser {
    pub fn new(parser: DelimitedTextParser) -> Self {
        Self {
            csv: CsvFileParser::new(parser),
        }
    }
}

impl FileParser for UniversalFileParser {
    fn parse_file(&self, path: &Path) -> ImportResult<ParsedRows> {
        match extension_of(path).as_str() {
            "csv" => self.csv.parse_file(path),
            "xlsx" | "xls" => ExcelParser.parse_file(path),
            other => {
                ensure_exists(path)?;
                Err(ImportError::UnsupportedFormat(other.to_string()))
            }
        }
    }
}
