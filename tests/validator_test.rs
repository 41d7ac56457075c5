//! データ検証テスト

use imax_theatre_common::Theatre;
use imax_theatre_db::error::TheatreDbError;
use imax_theatre_db::validator::{self, Severity, ValidationReport};
use std::path::Path;
use tempfile::tempdir;

const HEADER: &str = "City,Province,Location Name,Screen Aspect Ratio (AR),Digital Projector,Maximum AR for digital projection,Film Projector,Height,Width,Commercial films shown?";
const GOOD_ROW: &str = "Toronto,Ontario,Cinesphere,1.43:1,IMAX GT Laser,1.43:1,15/70mm,18.29 m,24.38 m,Yes";

fn write(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, text).unwrap();
}

fn messages(report: &ValidationReport, severity: Severity) -> Vec<String> {
    report
        .issues
        .iter()
        .filter(|i| i.severity == severity)
        .map(|i| i.message.clone())
        .collect()
}

/// 正しいファイルはエラーなし
#[test]
fn test_valid_file_passes() {
    let dir = tempdir().expect("Failed to create temp dir");
    write(&dir.path().join("americas/canada.csv"), &format!("{}\n{}\n", HEADER, GOOD_ROW));

    let report = validator::validate_path(dir.path()).expect("検証失敗");
    assert!(report.is_ok(), "{:?}", report.issues);
    assert_eq!(report.files_processed, 1);
    assert_eq!(report.total_rows, 1);
}

/// 高さの書式違反は行番号付きのエラー
#[test]
fn test_invalid_height_reported_with_row_number() {
    let dir = tempdir().expect("Failed to create temp dir");
    let bad_row = "Ottawa,Ontario,Museum,1.43:1,IMAX GT Laser,1.43:1,No,60 ft,24.38 m,Yes";
    let path = dir.path().join("canada.csv");
    write(&path, &format!("{}\n{}\n{}\n", HEADER, GOOD_ROW, bad_row));

    let report = validator::validate_path(&path).expect("検証失敗");
    let errors = messages(&report, Severity::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Invalid Height format '60 ft'"));
    assert!(errors[0].contains("row 3"));
}

/// 崩れた行や空行を挟んでも、後続の行はファイル上の行番号で報告
#[test]
fn test_row_number_after_malformed_row() {
    let dir = tempdir().expect("Failed to create temp dir");
    let bad_row = "Ottawa,Ontario,Museum,1.43:1,IMAX GT Laser,1.43:1,No,60 ft,24.38 m,Yes";
    let path = dir.path().join("canada.csv");
    write(&path, &format!("{}\n{}\nBroken,row\n\n{}\n", HEADER, GOOD_ROW, bad_row));

    let report = validator::validate_path(&path).expect("検証失敗");
    let errors = messages(&report, Severity::Error);
    assert_eq!(errors.len(), 2, "{:?}", errors);
    assert!(errors[0].contains("Malformed row") && errors[0].contains("row 3"));
    assert!(errors[1].contains("Invalid Height format '60 ft'"));
    assert!(errors[1].contains("row 5"));
}

/// 行政区分の列がない（対象外リストにもない）とエラー
#[test]
fn test_missing_admin_division_column() {
    let dir = tempdir().expect("Failed to create temp dir");
    let header = HEADER.replace("Province,", "");
    let row = GOOD_ROW.replace("Ontario,", "");
    write(&dir.path().join("canada.csv"), &format!("{}\n{}\n", header, row));
    write(&dir.path().join("germany.csv"), &format!("{}\n{}\n", header, row));

    let report = validator::validate_path(dir.path()).expect("検証失敗");
    let errors = messages(&report, Severity::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("administrative division"));
    assert!(errors[0].contains("canada.csv"));
}

/// 必須列の欠落と想定外の列
#[test]
fn test_missing_and_unexpected_columns() {
    let dir = tempdir().expect("Failed to create temp dir");
    let header = format!("{},Notes", HEADER.replace(",Commercial films shown?", ""));
    let row = format!("{},opened 1971", GOOD_ROW.trim_end_matches(",Yes"));
    let path = dir.path().join("canada.csv");
    write(&path, &format!("{}\n{}\n", header, row));

    let report = validator::validate_path(&path).expect("検証失敗");
    assert!(messages(&report, Severity::Error)
        .iter()
        .any(|m| m.contains("Missing required columns") && m.contains("Commercial films shown?")));
    assert!(messages(&report, Severity::Warning)
        .iter()
        .any(|m| m.contains("Unexpected columns") && m.contains("Notes")));
}

/// 空ファイルとUTF-8以外
#[test]
fn test_empty_and_non_utf8_files() {
    let dir = tempdir().expect("Failed to create temp dir");
    write(&dir.path().join("a_empty.csv"), "");
    std::fs::write(dir.path().join("b_latin1.csv"), [b'C', b'i', b't', b'y', b'\n', 0xe9, b'\n']).unwrap();

    let report = validator::validate_path(dir.path()).expect("検証失敗");
    let errors = messages(&report, Severity::Error);
    assert_eq!(errors.len(), 2);
    assert!(errors[0].contains("File is empty"));
    assert!(errors[1].contains("encoding"));
    assert_eq!(report.files_processed, 0);
}

/// ドームは高さ0が望ましい
#[test]
fn test_dome_height_warning() {
    let row = Theatre::from_pairs([
        ("City", "Paris"),
        ("Location Name", "La Géode"),
        ("Screen Aspect Ratio (AR)", "Dome 1.43:1"),
        ("Digital Projector", "IMAX Laser for Dome"),
        ("Film Projector", "No"),
        ("Height", "26 m"),
        ("Width", "26 m"),
        ("Commercial films shown?", "Limited"),
    ]);

    let mut report = ValidationReport::default();
    validator::validate_row(&row, "france.csv:row 2", &mut report);

    assert!(report.is_ok());
    let warnings = messages(&report, Severity::Warning);
    assert!(warnings.iter().any(|m| m.contains("Dome theatre should have height 0")));
}

/// 空の必須値と想定外の値
#[test]
fn test_empty_required_and_unexpected_values() {
    let row = Theatre::from_pairs([
        ("City", ""),
        ("Location Name", "Somewhere"),
        ("Screen Aspect Ratio (AR)", "1.43:1"),
        ("Digital Projector", "IMAX Mystery"),
        ("Height", "0 m"),
        ("Width", "20 m"),
        ("Commercial films shown?", "Sometimes"),
    ]);

    let mut report = ValidationReport::default();
    validator::validate_row(&row, "x.csv:row 2", &mut report);

    assert_eq!(report.errors(), 1);
    assert!(messages(&report, Severity::Error)[0].contains("Empty required field 'City'"));
    assert_eq!(report.warnings(), 2);
}

/// CSVがないディレクトリ
#[test]
fn test_directory_without_csv() {
    let dir = tempdir().expect("Failed to create temp dir");
    write(&dir.path().join("readme.txt"), "hello");

    let result = validator::validate_path(dir.path());
    assert!(matches!(result, Err(TheatreDbError::FileNotFound(_))));
}

/// CSVの列挙は再帰的かつパス順
#[test]
fn test_find_csv_files_sorted() {
    let dir = tempdir().expect("Failed to create temp dir");
    write(&dir.path().join("europe/france.csv"), HEADER);
    write(&dir.path().join("americas/canada.csv"), HEADER);
    write(&dir.path().join("americas/notes.md"), "x");

    let files = validator::find_csv_files(dir.path()).expect("列挙失敗");
    let names: Vec<_> = files
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(names, vec!["americas/canada.csv", "europe/france.csv"]);
}
