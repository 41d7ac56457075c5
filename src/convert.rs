//! メートル表記CSV → フィート・インチ表記CSV の一括変換

use crate::error::{Result, TheatreDbError};
use crate::validator::find_csv_files;
use imax_theatre_common::tabular;
use imax_theatre_common::types::{FIELD_HEIGHT, FIELD_WIDTH};
use imax_theatre_common::units::feet_inches_text;
use std::path::Path;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertReport {
    pub files: usize,
    pub values_converted: usize,
    /// 数値化できずそのまま残した値
    pub values_kept: usize,
}

/// "18.29 m" → "60 ft 0.08 in"（数値でなければ None）
pub fn convert_value(value: &str) -> Option<String> {
    let number = value.trim().trim_end_matches('m').trim();
    number.parse::<f64>().ok().map(feet_inches_text)
}

/// 1ファイル分のCSVテキストを変換
pub fn convert_text(text: &str, report: &mut ConvertReport) -> Result<String> {
    let mut table = tabular::parse(text)?;
    // 崩れた行を黙って落とさない
    if let Some(warning) = table.warnings.first() {
        return Err(TheatreDbError::MalformedRow {
            line: warning.line,
            message: warning.message.clone(),
        });
    }
    if table.rows.is_empty() {
        return Ok(text.to_string());
    }

    for row in &mut table.rows {
        for field in [FIELD_HEIGHT, FIELD_WIDTH] {
            let Some(value) = row.get(field) else { continue };
            match convert_value(value) {
                Some(converted) => {
                    row.set(field, converted);
                    report.values_converted += 1;
                }
                None => {
                    warn!(field, value, "not a metric value, kept as is");
                    report.values_kept += 1;
                }
            }
        }
    }

    let rows: Vec<_> = table.rows.iter().collect();
    Ok(tabular::serialize(&rows)?)
}

/// source 配下のCSVを destination に同じ構成で変換出力
pub fn convert_tree(source: &Path, destination: &Path) -> Result<ConvertReport> {
    if !source.is_dir() {
        return Err(TheatreDbError::FolderNotFound(source.display().to_string()));
    }

    let mut report = ConvertReport::default();
    for file in find_csv_files(source)? {
        let relative = file
            .strip_prefix(source)
            .map_err(|e| TheatreDbError::Config(e.to_string()))?;
        let target = destination.join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let bytes = std::fs::read(&file)?;
        let text = tabular::decode(&bytes)?;
        let converted = convert_text(&text, &mut report).inspect_err(|e| {
            error!(file = %file.display(), "{}", e);
        })?;
        std::fs::write(&target, converted)?;

        info!(source = %file.display(), target = %target.display(), "converted");
        report.files += 1;
    }
    Ok(report)
}
