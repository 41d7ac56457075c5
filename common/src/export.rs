//! CSVエクスポート

use crate::error::{Error, Result};
use crate::store::Scope;
use crate::tabular;
use crate::types::Theatre;

/// エクスポートファイル名（date は YYYY-MM-DD）
pub fn export_file_name(scope: Scope, date: &str) -> String {
    format!("imax-theatres-{}-{}.csv", scope.key(), date)
}

/// エクスポート結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub contents: String,
    pub records: usize,
}

/// 絞り込み結果をCSVに変換（空ならエラー、ファイルは作らない）
pub fn export_csv(subset: &[&Theatre], scope: Scope, date: &str) -> Result<ExportFile> {
    if subset.is_empty() {
        return Err(Error::NothingToExport);
    }

    Ok(ExportFile {
        file_name: export_file_name(scope, date),
        contents: tabular::serialize(subset)?,
        records: subset.len(),
    })
}
