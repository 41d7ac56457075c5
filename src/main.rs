use clap::Parser;
use imax_theatre_common::units::TableUnitConverter;
use imax_theatre_common::{
    catalog, legacy_redirect, split_url, Error as DbError, Region, Scope, TableView, TheatreDatabase, Unit,
};
use imax_theatre_db::{browse, cli, config, convert, error, fetch, table, validator};
use cli::{Cli, Commands};
use config::Config;
use error::{Result, TheatreDbError};
use fetch::{DataFetcher, ProgressFetcher};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// 設定に従ってデータを読み込む
///
/// 進捗は stderr に出す（stdout は結果専用）
async fn load_database(config: &Config, region: Option<Region>, all_regions: bool) -> Result<TheatreDatabase> {
    let mut db_config = config.database_config(region)?;
    if all_regions {
        db_config.region = None;
        db_config.show_region_column = true;
    }
    let scope = db_config.scope();
    let total = catalog::for_scope(&db_config.sources, scope).len();

    eprintln!("[1/2] {} のデータを読込中... ({}件のソース)", scope, total);
    let fetcher = ProgressFetcher::new(DataFetcher::from_data_path(&config.data_path), total);
    let mut db = TheatreDatabase::new(db_config);
    let report = db.load(&fetcher).await;
    fetcher.finish();
    let report = report?;

    for skipped in &report.skipped {
        eprintln!("⚠ 読込をスキップ: {} ({})", skipped.path, skipped.reason);
    }
    if report.row_warnings > 0 {
        eprintln!("⚠ 不正な行を{}件読み飛ばしました", report.row_warnings);
    }
    eprintln!("✔ {}件の劇場を読込\n", report.records);
    Ok(db)
}

/// 幅・高さ列を F' I" 表記に置き換える
fn apply_feet_inches(view: &mut TableView) {
    let column = |name: &str| view.headers.iter().position(|h| *h == name);
    let (Some(width), Some(height)) = (column("Width"), column("Height")) else {
        return;
    };

    let header: Vec<String> = view.headers.iter().map(|h| h.to_string()).collect();
    let rows = view.rows.iter().map(|r| r.cells.clone());
    let mut tables = vec![std::iter::once(header).chain(rows).collect::<Vec<_>>()];

    TableUnitConverter::new(width, height).convert(&mut tables);
    for (row, cells) in view.rows.iter_mut().zip(tables[0].iter().skip(1)) {
        row.cells.clone_from(cells);
    }
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load()?;
    if let Some(data_path) = &cli.data_path {
        config.data_path = data_path.clone();
    }

    match cli.command {
        Commands::List { filters, imperial, feet_inches, json } => {
            eprintln!("🎬 imax-db - 劇場一覧\n");

            let mut db = load_database(&config, filters.region, filters.all_regions).await?;
            db.set_filters(filters.to_state());
            db.set_unit(cli::unit_from_flag(imperial));

            eprintln!("[2/2] 絞り込み中...\n");
            if json {
                println!("{}", serde_json::to_string_pretty(&db.filtered())?);
            } else {
                let mut view = db.view();
                if feet_inches {
                    apply_feet_inches(&mut view);
                }
                print!("{}", table::render(&view));
            }
        }

        Commands::Export { filters, output } => {
            println!("📄 imax-db - CSVエクスポート\n");

            let mut db = load_database(&config, filters.region, filters.all_regions).await?;
            db.set_filters(filters.to_state());

            println!("[2/2] エクスポート中...");
            match db.export(&today()) {
                Ok(file) => {
                    let output_dir = output.unwrap_or_else(|| config.export_dir.clone());
                    std::fs::create_dir_all(&output_dir)?;
                    let path = output_dir.join(&file.file_name);
                    std::fs::write(&path, &file.contents)?;
                    println!("✔ {}件を保存: {}", file.records, path.display());
                    println!("\n✅ エクスポート完了");
                }
                Err(DbError::NothingToExport) => {
                    println!("⚠ {}", DbError::NothingToExport);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Browse { region, imperial } => {
            println!("🔎 imax-db - 対話検索\n");

            let mut db = load_database(&config, region, false).await?;
            browse::run_interactive(&mut db)?;
            db.set_unit(cli::unit_from_flag(imperial));

            println!();
            print!("{}", table::render(&db.view()));
        }

        Commands::Validate { path } => {
            let target = path.unwrap_or_else(|| std::path::PathBuf::from(&config.data_path));
            println!("🔍 imax-db - データ検証: {}\n", target.display());

            let report = validator::validate_path(&target)?;
            for issue in &report.issues {
                match issue.severity {
                    validator::Severity::Error => println!("❌ {}", issue.message),
                    validator::Severity::Warning => println!("⚠  {}", issue.message),
                }
            }

            println!("\n{}", "=".repeat(60));
            println!("検証結果");
            println!("{}", "=".repeat(60));
            println!("ファイル数: {}", report.files_processed);
            println!("行数: {}", report.total_rows);
            println!("エラー: {}", report.errors());
            println!("警告: {}", report.warnings());

            if !report.is_ok() {
                return Err(TheatreDbError::Validation(report.errors()));
            }
            println!("\n✅ すべての検証に合格しました");
        }

        Commands::Convert { source, destination } => {
            println!("📐 imax-db - 単位変換 (m → ft/in)\n");

            let report = convert::convert_tree(&source, &destination)?;
            println!("✔ {}ファイルを変換 ({}値)", report.files, report.values_converted);
            if report.values_kept > 0 {
                println!("⚠ 数値でない{}値はそのまま残しました", report.values_kept);
            }
            println!("\n✅ 変換完了: {}", destination.display());
        }

        Commands::Redirect { url } => {
            let (path, query, fragment) = split_url(&url);
            match legacy_redirect(path, query, fragment) {
                Some(target) => println!("{}", target),
                None => println!("転送不要: {}", url),
            }
        }

        Commands::Sources { region } => {
            let sources = config.sources()?;
            let scope = Scope::from_region(region);
            for source in catalog::for_scope(&sources, scope) {
                let admin = match &source.admin_division {
                    catalog::AdminDivisionColumn::Named(name) => name.as_str(),
                    catalog::AdminDivisionColumn::Absent => "-",
                    catalog::AdminDivisionColumn::Lookup => "(auto)",
                };
                println!("{:<9} {:<22} {:<12} {}", source.region.as_str(), source.country, admin, source.path);
            }
        }

        Commands::Config { set_data_path, set_default_region, show } => {
            if let Some(path) = set_data_path {
                config.set_data_path(path)?;
                println!("✔ データパスを設定しました");
            }

            if let Some(region) = set_default_region {
                let region = if region.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(region.parse::<Region>()?)
                };
                config.set_default_region(region)?;
                println!("✔ 既定の地域を設定しました");
            }

            if show {
                println!("設定:");
                println!("  データパス: {}", config.data_path);
                println!(
                    "  既定の地域: {}",
                    config.default_region.map_or("（全世界）".to_string(), |r| r.to_string())
                );
                println!("  地域列を表示: {}", config.show_region_column);
                println!(
                    "  ソース一覧: {}",
                    config
                        .catalog_path
                        .as_ref()
                        .map_or("（組み込み）".to_string(), |p| p.display().to_string())
                );
                println!("  エクスポート先: {}", config.export_dir.display());
                println!("  単位: {}", Unit::default());
            }
        }
    }

    Ok(())
}
