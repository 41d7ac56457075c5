use clap::{Args, Parser, Subcommand};
use imax_theatre_common::{
    AspectRatioBucket, FilmCapability, FilterState, Region, RegionFilter, ScreenSize, Unit,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "imax-db")]
#[command(about = "IMAXシアターデータベース（読込・絞り込み・エクスポート・データ検証）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// CSVのルート（ディレクトリ or URL、設定より優先）
    #[arg(long, global = true)]
    pub data_path: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 劇場一覧を表示
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// フィート表記で表示
        #[arg(long)]
        imperial: bool,

        /// 幅・高さを F' I" 表記で表示
        #[arg(long, conflicts_with = "imperial")]
        feet_inches: bool,

        /// JSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 絞り込み結果をCSVに書き出す
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// 出力ディレクトリ（省略時は設定の export_dir）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 対話的に地域→国→行政区分→都市を選んで表示
    Browse {
        /// 読込スコープの地域（省略時は全世界）
        #[arg(short, long)]
        region: Option<Region>,

        /// フィート表記で表示
        #[arg(long)]
        imperial: bool,
    },

    /// CSVデータを検証
    Validate {
        /// CSVファイル or ディレクトリ（省略時はdata_path）
        path: Option<PathBuf>,
    },

    /// メートル表記のCSVをフィート・インチ表記に変換
    Convert {
        /// 変換元ディレクトリ
        #[arg(required = true)]
        source: PathBuf,

        /// 出力ディレクトリ
        #[arg(required = true)]
        destination: PathBuf,
    },

    /// 旧URLの転送先を表示
    Redirect {
        /// 旧URL（パス + クエリ + フラグメント）
        #[arg(required = true)]
        url: String,
    },

    /// ソース一覧を表示
    Sources {
        /// 地域で絞る
        #[arg(short, long)]
        region: Option<Region>,
    },

    /// 設定を表示/編集
    Config {
        /// データパスを設定
        #[arg(long)]
        set_data_path: Option<String>,

        /// 既定の地域を設定（"none" で解除）
        #[arg(long)]
        set_default_region: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 絞り込みオプション
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// 読込スコープの地域（省略時は全世界）
    #[arg(short, long)]
    pub region: Option<Region>,

    /// 全世界表示で全地域を対象にする
    #[arg(long, conflicts_with = "region")]
    pub all_regions: bool,

    /// 国名
    #[arg(short, long)]
    pub country: Option<String>,

    /// 行政区分（州・県など）
    #[arg(short, long)]
    pub state: Option<String>,

    /// 都市
    #[arg(long)]
    pub city: Option<String>,

    /// デジタルプロジェクター
    #[arg(short, long)]
    pub projector: Option<String>,

    /// 全項目の部分一致検索
    #[arg(short = 'q', long)]
    pub search: Option<String>,

    /// スクリーンサイズ (large/standard/small)
    #[arg(long)]
    pub size: Option<ScreenSize>,

    /// アスペクト比 (true-imax/imax-digital/dome)
    #[arg(long)]
    pub aspect: Option<AspectRatioBucket>,

    /// フィルム対応 (film-capable/digital-only)
    #[arg(long)]
    pub film: Option<FilmCapability>,
}

impl FilterArgs {
    /// 選択状態に変換（上位から順に設定する）
    pub fn to_state(&self) -> FilterState {
        let mut state = FilterState::new();
        if self.all_regions {
            state.set_region(Some(RegionFilter::All));
        } else if let Some(region) = self.region {
            state.set_region(Some(RegionFilter::Only(region)));
        }
        state.set_country(self.country.clone());
        state.set_admin_division(self.state.clone());
        state.set_city(self.city.clone());
        state.set_projector(self.projector.clone());
        state.set_search(self.search.clone());
        state.set_screen_size(self.size);
        state.set_aspect_ratio(self.aspect);
        state.set_film(self.film);
        state
    }
}

pub fn unit_from_flag(imperial: bool) -> Unit {
    if imperial {
        Unit::Imperial
    } else {
        Unit::Metric
    }
}
