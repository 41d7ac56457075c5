//! レコード正規化モジュール
//!
//! パース済みの生行に、ソース設定由来の地域・国名と
//! 行政区分（Administrative Division）を付与する。

use crate::catalog::{AdminDivisionColumn, SourceDescriptor};
use crate::tabular::ParsedTable;
use crate::types::{Theatre, FIELD_ADMIN_DIVISION, FIELD_COUNTRY, FIELD_REGION};
use tracing::warn;

/// 行政区分の候補列（優先順）
pub const ADMIN_DIVISION_COLUMNS: [&str; 8] = [
    "Province",
    "State",
    "Region",
    "District",
    "Prefecture",
    "Canton",
    "Country",
    "Emirate",
];

/// 行政区分を解決
///
/// 1. 指定列に値があればそれ
/// 2. 明示的に「なし」なら空文字
/// 3. それ以外は候補列の最初の非空値
pub fn resolve_admin_division(row: &Theatre, column: &AdminDivisionColumn) -> String {
    if let AdminDivisionColumn::Named(name) = column {
        if let Some(value) = row.get(name).filter(|v| !v.is_empty()) {
            return value.to_string();
        }
    }

    if *column == AdminDivisionColumn::Absent {
        return String::new();
    }

    ADMIN_DIVISION_COLUMNS
        .iter()
        .find_map(|col| row.get(col).filter(|v| !v.is_empty()))
        .unwrap_or_default()
        .to_string()
}

/// 1行を正規化（行政区分は上書き前の値から解決する）
pub fn normalize_row(mut row: Theatre, descriptor: &SourceDescriptor) -> Theatre {
    let admin_division = resolve_admin_division(&row, &descriptor.admin_division);
    row.set(FIELD_REGION, descriptor.region.as_str());
    row.set(FIELD_COUNTRY, descriptor.country.as_str());
    row.set(FIELD_ADMIN_DIVISION, admin_division);
    row
}

/// パース結果全体を正規化（行単位の警告はログに出して続行）
pub fn normalize_table(table: ParsedTable, descriptor: &SourceDescriptor) -> Vec<Theatre> {
    if !table.warnings.is_empty() {
        warn!(
            path = %descriptor.path,
            count = table.warnings.len(),
            "parsing errors in source, malformed rows dropped"
        );
        for warning in &table.warnings {
            warn!(path = %descriptor.path, line = warning.line, "{}", warning.message);
        }
    }

    table
        .rows
        .into_iter()
        .map(|row| normalize_row(row, descriptor))
        .collect()
}
