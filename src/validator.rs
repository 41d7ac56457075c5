//! CSVデータ検証
//!
//! 国別CSVのヘッダー・各行の書式をチェックし、エラーと警告を集計する。

use crate::error::{Result, TheatreDbError};
use imax_theatre_common::tabular;
use imax_theatre_common::types::*;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 常に必須の列
pub const ALWAYS_REQUIRED: [&str; 9] = [
    FIELD_CITY,
    FIELD_LOCATION,
    FIELD_ASPECT_RATIO,
    FIELD_DIGITAL_PROJECTOR,
    FIELD_MAX_DIGITAL_AR,
    FIELD_FILM_PROJECTOR,
    FIELD_HEIGHT,
    FIELD_WIDTH,
    FIELD_COMMERCIAL,
];

/// 行政区分として認める列（いずれか1つ）
pub const ADMIN_DIVISION_HEADERS: [&str; 10] = [
    "Province",
    "State",
    "Region",
    "District",
    "Prefecture",
    "Canton",
    "Country",
    "Emirate",
    "Province/State",
    "Governorate",
];

/// 行政区分の列を持たない国のファイル
pub const NO_ADMIN_DIVISION_FILES: [&str; 22] = [
    "germany.csv",
    "switzerland.csv",
    "finland.csv",
    "france.csv",
    "italy.csv",
    "latvia.csv",
    "luxembourg.csv",
    "netherlands.csv",
    "norway.csv",
    "poland.csv",
    "portugal.csv",
    "serbia.csv",
    "spain.csv",
    "sweden.csv",
    "ukraine.csv",
    "unitedkingdom.csv",
    "austria.csv",
    "belgium.csv",
    "czechia.csv",
    "morocco.csv",
    "southafrica.csv",
    "newzealand.csv",
];

const COMMERCIAL_VALUES: &[&str] = &["Yes", "No", "Limited", "Unknown", "Unk"];
const ASPECT_RATIO_VALUES: &[&str] = &["1.43:1", "1.90:1", "Dome 1.43:1", "Unk", "Unknown", "N/A"];
const PROJECTOR_VALUES: &[&str] = &[
    "IMAX CoLa",
    "IMAX Digital",
    "IMAX Laser XT",
    "IMAX GT Laser",
    "IMAX Laser for Dome",
    "IMAX Dome with Laser",
    "N/A",
    "No",
    "None",
    "Unknown",
];

lazy_static::lazy_static! {
    static ref HEIGHT_RE: Regex = Regex::new(r"^\d+\.?\d*\s*m$|^0\s*m$").unwrap();
    static ref WIDTH_RE: Regex = Regex::new(r"^\d+\.?\d*\s*m$").unwrap();
    static ref ASPECT_RATIO_RE: Regex =
        Regex::new(r"^\d+\.?\d*:\d+\.?\d*$|^Dome\s+\d+\.?\d*:\d+\.?\d*$|^Unk$|^Unknown$|^N/A$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

/// 検証結果
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub files_processed: usize,
    pub total_rows: usize,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn errors(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Error).count()
    }

    pub fn warnings(&self) -> usize {
        self.issues.iter().filter(|i| i.severity == Severity::Warning).count()
    }

    pub fn is_ok(&self) -> bool {
        self.errors() == 0
    }

    fn error(&mut self, message: String) {
        self.issues.push(Issue { severity: Severity::Error, message });
    }

    fn warning(&mut self, message: String) {
        self.issues.push(Issue { severity: Severity::Warning, message });
    }
}

/// ディレクトリ配下のCSVを再帰的に列挙（パス順）
pub fn find_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(TheatreDbError::FolderNotFound(dir.display().to_string()));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")))
        .collect();
    files.sort();
    Ok(files)
}

/// ファイル or ディレクトリを検証
pub fn validate_path(path: &Path) -> Result<ValidationReport> {
    let mut report = ValidationReport::default();
    if path.is_dir() {
        let files = find_csv_files(path)?;
        if files.is_empty() {
            return Err(TheatreDbError::FileNotFound(format!("{}/**/*.csv", path.display())));
        }
        for file in files {
            validate_file(&file, &mut report);
        }
    } else {
        validate_file(path, &mut report);
    }
    Ok(report)
}

/// 1ファイルを検証（成功時 true）
pub fn validate_file(path: &Path, report: &mut ValidationReport) -> bool {
    let display = path.display().to_string();

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            report.error(format!("File not found: {}", display));
            return false;
        }
        Err(e) => {
            report.error(format!("Error reading {}: {}", display, e));
            return false;
        }
    };

    if bytes.is_empty() {
        report.error(format!("File is empty: {}", display));
        return false;
    }

    let table = match tabular::decode(&bytes).and_then(|text| tabular::parse(&text)) {
        Ok(table) => table,
        Err(imax_theatre_common::Error::Encoding(_)) => {
            report.error(format!("File encoding error in {}. Please ensure UTF-8 encoding.", display));
            return false;
        }
        Err(e) => {
            report.error(format!("Error reading {}: {}", display, e));
            return false;
        }
    };

    if table.headers.iter().all(|h| h.trim().is_empty()) {
        report.error(format!("No headers found in {}", display));
        return false;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    validate_headers(&table.headers, &file_name, &display, report);

    for warning in &table.warnings {
        report.error(format!("Malformed row at {}:row {}: {}", display, warning.line, warning.message));
    }

    for (row, line) in table.rows.iter().zip(&table.lines) {
        let location = format!("{}:row {}", display, line);
        validate_row(row, &location, report);
    }

    report.files_processed += 1;
    report.total_rows += table.rows.len();
    true
}

/// ヘッダー行を検証
pub fn validate_headers(headers: &[String], file_name: &str, display: &str, report: &mut ValidationReport) {
    let header_set: BTreeSet<&str> = headers
        .iter()
        .map(|h| h.trim())
        .filter(|h| !h.is_empty())
        .collect();

    let found_admin: Vec<&str> = ADMIN_DIVISION_HEADERS
        .iter()
        .copied()
        .filter(|h| header_set.contains(h))
        .collect();
    let no_admin_expected = NO_ADMIN_DIVISION_FILES.contains(&file_name);

    if found_admin.is_empty() && !no_admin_expected {
        report.error(format!(
            "File must have at least one administrative division column in {}: {}",
            display,
            ADMIN_DIVISION_HEADERS.join(", ")
        ));
    } else if !found_admin.is_empty() && no_admin_expected {
        report.warning(format!(
            "File {} has administrative division columns but is in no-admin-div list: {}",
            display,
            found_admin.join(", ")
        ));
    } else if found_admin.len() > 1 {
        report.warning(format!(
            "File has multiple administrative division columns in {}: {}. Consider using just one.",
            display,
            found_admin.join(", ")
        ));
    }

    let missing: Vec<&str> = ALWAYS_REQUIRED
        .iter()
        .copied()
        .filter(|h| !header_set.contains(h))
        .collect();
    if !missing.is_empty() {
        report.error(format!("Missing required columns in {}: {}", display, missing.join(", ")));
    }

    let extra: Vec<&str> = header_set
        .iter()
        .copied()
        .filter(|h| !ALWAYS_REQUIRED.contains(h) && !ADMIN_DIVISION_HEADERS.contains(h))
        .collect();
    if !extra.is_empty() {
        report.warning(format!("Unexpected columns in {}: {}", display, extra.join(", ")));
    }
}

/// 1行を検証
pub fn validate_row(row: &Theatre, location: &str, report: &mut ValidationReport) {
    for field in [FIELD_CITY, FIELD_LOCATION, FIELD_DIGITAL_PROJECTOR] {
        if row.get(field).is_some_and(|v| v.trim().is_empty()) {
            report.error(format!("Empty required field '{}' at {}", field, location));
        }
    }

    for (field, pattern) in [(FIELD_HEIGHT, &*HEIGHT_RE), (FIELD_WIDTH, &*WIDTH_RE)] {
        if let Some(value) = row.get(field) {
            let trimmed = value.trim();
            if !trimmed.is_empty() && !pattern.is_match(trimmed) {
                report.error(format!(
                    "Invalid {} format '{}' at {}. Expected format: '18.29 m'",
                    field, value, location
                ));
            }
        }
    }

    if let Some(value) = row.get(FIELD_ASPECT_RATIO) {
        let trimmed = value.trim();
        if !trimmed.is_empty() && !ASPECT_RATIO_RE.is_match(trimmed) {
            report.error(format!(
                "Invalid aspect ratio format '{}' at {}. Expected: '1.43:1' or 'Dome 1.43:1'",
                value, location
            ));
        }
    }

    for (field, allowed) in [
        (FIELD_COMMERCIAL, COMMERCIAL_VALUES),
        (FIELD_ASPECT_RATIO, ASPECT_RATIO_VALUES),
        (FIELD_DIGITAL_PROJECTOR, PROJECTOR_VALUES),
    ] {
        if let Some(value) = row.get(field) {
            let trimmed = value.trim();
            if !trimmed.is_empty() && !allowed.contains(&trimmed) {
                report.warning(format!("Unexpected value '{}' for '{}' at {}", value, field, location));
            }
        }
    }

    let film = row.get_or_empty(FIELD_FILM_PROJECTOR).trim();
    if film == "Unknown" || film == "N/A" {
        report.warning(format!("Film projector info unclear at {}", location));
    }

    let aspect_ratio = row.get_or_empty(FIELD_ASPECT_RATIO).trim();
    let height = row.get_or_empty(FIELD_HEIGHT).trim();
    if aspect_ratio.contains("Dome") && !height.is_empty() && !height.starts_with('0') {
        report.warning(format!("Dome theatre should have height 0 at {}", location));
    }
}
