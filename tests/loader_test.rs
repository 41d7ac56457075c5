//! ローカルディレクトリからの読込テスト
//!
//! FsFetcher 経由で TheatreDatabase を組み立て、絞り込み・表示・出力まで通す

use imax_theatre_common::{
    AdminDivisionColumn, DatabaseConfig, Error, FilterState, Region, ScreenSize, SourceDescriptor,
    TheatreDatabase, Unit,
};
use imax_theatre_db::fetch::{DataFetcher, FsFetcher, ProgressFetcher};
use std::path::Path;
use tempfile::tempdir;

const HEADER: &str = "City,Province,Location Name,Screen Aspect Ratio (AR),Digital Projector,Maximum AR for digital projection,Film Projector,Height,Width,Commercial films shown?";

fn write_csv(root: &Path, relative: &str, rows: &[&str]) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut text = format!("{}\n", HEADER);
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    std::fs::write(path, text).unwrap();
}

fn americas_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::new("americas/canada.csv", Region::Americas, "Canada", AdminDivisionColumn::named("Province")),
        SourceDescriptor::new("americas/peru.csv", Region::Americas, "Peru", AdminDivisionColumn::named("Region")),
        SourceDescriptor::new("americas/mexico.csv", Region::Americas, "Mexico", AdminDivisionColumn::named("Province")),
        SourceDescriptor::new("asia/japan.csv", Region::Asia, "Japan", AdminDivisionColumn::named("Province")),
    ]
}

fn setup_data(root: &Path) {
    write_csv(
        root,
        "americas/canada.csv",
        &[
            "Toronto,Ontario,Cinesphere,1.43:1,IMAX GT Laser,1.43:1,15/70mm,18.29 m,24.38 m,Yes",
            "Vancouver,British Columbia,Scotiabank Theatre,1.90:1,IMAX Digital,1.90:1,No,14.2 m,21.3 m,Yes",
        ],
    );
    write_csv(
        root,
        "americas/mexico.csv",
        &["Monterrey,Nuevo León,Cinépolis Galerías,1.90:1,IMAX Laser XT,1.90:1,No,22.1 m,28.0 m,Yes"],
    );
    write_csv(
        root,
        "asia/japan.csv",
        &["Osaka,Osaka,109 Cinemas Osaka Expo City,1.43:1,IMAX GT Laser,1.43:1,No,18.0 m,26.0 m,Yes"],
    );
}

fn region_database(region: Region) -> TheatreDatabase {
    TheatreDatabase::new(DatabaseConfig {
        sources: americas_sources(),
        region: Some(region),
        show_region_column: false,
    })
}

/// 地域スコープの読込（欠けたソースはスキップ）
#[tokio::test]
async fn test_load_region_skips_missing_source() {
    let dir = tempdir().expect("Failed to create temp dir");
    setup_data(dir.path());

    let mut db = region_database(Region::Americas);
    let fetcher = FsFetcher::new(dir.path());
    let report = db.load(&fetcher).await.expect("読込失敗");

    assert_eq!(report.records, 3);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, "americas/peru.csv");
    assert!(!report.from_cache);

    // 地域スコープでは条件なしで全件
    assert_eq!(db.filtered().len(), 3);
}

/// 同じスコープの再読込はキャッシュから
#[tokio::test]
async fn test_reload_served_from_cache() {
    let dir = tempdir().expect("Failed to create temp dir");
    setup_data(dir.path());

    let mut db = region_database(Region::Americas);
    let fetcher = FsFetcher::new(dir.path());
    db.load(&fetcher).await.expect("読込失敗");

    // ファイルを消しても結果は変わらない
    std::fs::remove_dir_all(dir.path().join("americas")).unwrap();
    let report = db.load(&fetcher).await.expect("再読込失敗");
    assert!(report.from_cache);
    assert_eq!(report.records, 3);
}

/// 国 → 行政区分の順に絞り込み
#[tokio::test]
async fn test_cascade_filters_after_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    setup_data(dir.path());

    let mut db = region_database(Region::Americas);
    db.load(&FsFetcher::new(dir.path())).await.expect("読込失敗");

    let countries = db.choices().countries;
    assert_eq!(countries, vec!["Canada".to_string(), "Mexico".to_string()]);

    db.select_country(Some("Canada".to_string()));
    assert_eq!(db.filtered().len(), 2);
    assert_eq!(
        db.choices().admin_divisions,
        vec!["British Columbia".to_string(), "Ontario".to_string()]
    );

    db.select_admin_division(Some("Ontario".to_string()));
    let filtered = db.filtered();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].city(), "Toronto");

    // 国を変えると下位の選択は解除される
    db.select_country(Some("Mexico".to_string()));
    assert_eq!(db.filters().admin_division(), None);
    assert_eq!(db.filtered().len(), 1);
}

/// スクリーンサイズとフィート表示
#[tokio::test]
async fn test_screen_size_and_imperial_view() {
    let dir = tempdir().expect("Failed to create temp dir");
    setup_data(dir.path());

    let mut db = region_database(Region::Americas);
    db.load(&FsFetcher::new(dir.path())).await.expect("読込失敗");

    let mut state = FilterState::new();
    state.set_screen_size(Some(ScreenSize::Small));
    db.set_filters(state);
    db.set_unit(Unit::Imperial);

    let view = db.view();
    assert_eq!(view.rows.len(), 1);
    let width = view.headers.iter().position(|h| *h == "Width").unwrap();
    assert_eq!(view.rows[0].cells[width], "69.9 ft");
    assert_eq!(view.summary.total, 1);
    assert!(!view.headers.contains(&"Region"));
}

/// 全世界スコープは条件なしだと空
#[tokio::test]
async fn test_global_scope_requires_selection() {
    let dir = tempdir().expect("Failed to create temp dir");
    setup_data(dir.path());

    let mut db = TheatreDatabase::new(DatabaseConfig {
        sources: americas_sources(),
        region: None,
        show_region_column: true,
    });
    let fetcher = ProgressFetcher::hidden(DataFetcher::from_data_path(&dir.path().display().to_string()));
    let report = db.load(&fetcher).await.expect("読込失敗");
    fetcher.finish();

    assert_eq!(report.records, 4);
    assert!(db.filtered().is_empty());
    assert!(db.choices().countries.is_empty());

    db.select_region(Some("Asia".parse().unwrap()));
    assert_eq!(db.filtered().len(), 1);
    assert_eq!(db.choices().countries, vec!["Japan".to_string()]);
    assert!(db.view().headers.contains(&"Region"));
}

/// 絞り込み結果のCSV出力
#[tokio::test]
async fn test_export_filtered_subset() {
    let dir = tempdir().expect("Failed to create temp dir");
    setup_data(dir.path());

    let mut db = region_database(Region::Americas);
    db.load(&FsFetcher::new(dir.path())).await.expect("読込失敗");
    db.select_country(Some("Canada".to_string()));

    let file = db.export("2026-10-19").expect("出力失敗");
    assert_eq!(file.file_name, "imax-theatres-Americas-2026-10-19.csv");
    assert_eq!(file.records, 2);
    assert!(file.contents.contains("Toronto"));
    assert!(file.contents.contains("Vancouver"));
    assert!(!file.contents.contains("Monterrey"));
}

/// 結果なしの出力は拒否
#[tokio::test]
async fn test_export_nothing_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    setup_data(dir.path());

    let mut db = region_database(Region::Americas);
    db.load(&FsFetcher::new(dir.path())).await.expect("読込失敗");
    db.set_search(Some("no such theatre".to_string()));

    let result = db.export("2026-10-19");
    assert!(matches!(result, Err(Error::NothingToExport)));
}

/// UTF-8でないソースは読込全体を中断
#[tokio::test]
async fn test_invalid_encoding_aborts_load() {
    let dir = tempdir().expect("Failed to create temp dir");
    setup_data(dir.path());
    std::fs::write(dir.path().join("americas/mexico.csv"), [0xffu8, 0xfe, 0x00, 0x41]).unwrap();

    let mut db = region_database(Region::Americas);
    let result = db.load(&FsFetcher::new(dir.path())).await;

    match result {
        Err(Error::Load { path, .. }) => assert_eq!(path, "americas/mexico.csv"),
        other => panic!("unexpected result: {:?}", other.map(|r| r.records)),
    }
}
