//! CSVの読み書き境界
//!
//! - parse: テキスト → ヘッダー行をキーにしたレコード列 + 行単位の警告
//! - serialize: レコード列 → テキスト（列はレコードに現れた順の和集合）

use crate::error::{Error, Result};
use crate::types::Theatre;

/// 読み飛ばした行の警告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWarning {
    /// 1始まりの行番号（ヘッダーが1行目）
    pub line: u64,
    pub message: String,
}

/// パース結果
#[derive(Debug, Clone, Default)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Theatre>,
    /// rows と同じ並びで、各行のソース上の行番号（1始まり）
    pub lines: Vec<u64>,
    pub warnings: Vec<RowWarning>,
}

/// 取得したバイト列をテキストに変換（先頭のBOMは除去）
pub fn decode(bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8(bytes.to_vec()).map_err(|e| Error::Encoding(e.to_string()))
}

/// レコード先頭の行番号
///
/// csv の Position は読み飛ばした空行の前を指すので、その分の改行を足す
fn source_line(text: &str, position: &csv::Position) -> u64 {
    let skipped = text
        .as_bytes()
        .get(position.byte() as usize..)
        .unwrap_or_default()
        .iter()
        .take_while(|b| matches!(**b, b'\n' | b'\r'))
        .filter(|b| **b == b'\n')
        .count();
    position.line() + skipped as u64
}

/// CSVテキストをパース
///
/// 列数の合わない行・不正な文字列を含む行は警告に回して捨てる。
/// ヘッダー行自体が読めない場合のみエラーを返す。
pub fn parse(text: &str) -> Result<ParsedTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    let mut lines = Vec::new();
    let mut warnings = Vec::new();

    for (index, result) in reader.records().enumerate() {
        match result {
            Ok(record) => {
                if record.iter().all(|value| value.trim().is_empty()) {
                    continue;
                }
                rows.push(Theatre::from_pairs(
                    headers.iter().cloned().zip(record.iter().map(str::to_string)),
                ));
                lines.push(
                    record
                        .position()
                        .map(|p| source_line(text, p))
                        .unwrap_or(index as u64 + 2),
                );
            }
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| source_line(text, p))
                    .unwrap_or(index as u64 + 2);
                warnings.push(RowWarning {
                    line,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(ParsedTable { headers, rows, lines, warnings })
}

/// レコード列をCSVテキストに変換
pub fn serialize(records: &[&Theatre]) -> Result<String> {
    if records.is_empty() {
        return Ok(String::new());
    }

    let mut headers: Vec<&str> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !headers.contains(&key) {
                headers.push(key);
            }
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&headers)?;
    for record in records {
        writer.write_record(headers.iter().map(|h| record.get_or_empty(h)))?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::Encoding(e.to_string()))
}
