//! 劇場データベース
//!
//! ソース設定・集約ストア・フィルタ状態・表示単位をまとめて保持する。
//! 変更はすべて `&mut self` 経由で行う。

use crate::catalog::{self, SourceDescriptor};
use crate::error::Result;
use crate::export::{self, ExportFile};
use crate::filter::{
    AspectRatioBucket, ChoiceSets, FilmCapability, FilterEngine, FilterState, RegionFilter, ScreenSize,
};
use crate::loader::{self, LoadReport, SourceFetcher};
use crate::presentation::{TableView, Unit};
use crate::store::{AggregateStore, Scope};
use crate::types::{Region, Theatre};
use crate::url::{self, Preselection};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 起動時設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    #[serde(default = "catalog::default_catalog")]
    pub sources: Vec<SourceDescriptor>,
    /// 単一地域ページなら Some
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub show_region_column: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sources: catalog::default_catalog(),
            region: None,
            show_region_column: false,
        }
    }
}

impl DatabaseConfig {
    pub fn scope(&self) -> Scope {
        Scope::from_region(self.region)
    }
}

#[derive(Debug, Clone)]
pub struct TheatreDatabase {
    config: DatabaseConfig,
    store: AggregateStore,
    filters: FilterState,
    unit: Unit,
}

impl TheatreDatabase {
    pub fn new(config: DatabaseConfig) -> Self {
        let store = AggregateStore::new(config.scope());
        Self {
            config,
            store,
            filters: FilterState::default(),
            unit: Unit::default(),
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn scope(&self) -> Scope {
        self.store.scope()
    }

    pub fn store(&self) -> &AggregateStore {
        &self.store
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// 設定されたスコープを読み込む
    pub async fn load<F: SourceFetcher>(&mut self, fetcher: &F) -> Result<LoadReport> {
        let scope = self.config.scope();
        self.load_scope(fetcher, scope).await
    }

    /// 指定スコープを読み込む（キャッシュ済みなら取得しない）
    pub async fn load_scope<F: SourceFetcher>(&mut self, fetcher: &F, scope: Scope) -> Result<LoadReport> {
        let report = loader::load_scope(&mut self.store, fetcher, &self.config.sources, scope).await?;
        self.filters.reset();
        Ok(report)
    }

    fn engine(&self) -> FilterEngine<'_> {
        FilterEngine::new(self.store.theatres(), self.store.scope())
    }

    pub fn select_region(&mut self, region: Option<RegionFilter>) {
        self.filters.set_region(region);
    }

    pub fn select_country(&mut self, country: Option<String>) {
        self.filters.set_country(country);
    }

    pub fn select_admin_division(&mut self, admin_division: Option<String>) {
        self.filters.set_admin_division(admin_division);
    }

    pub fn select_city(&mut self, city: Option<String>) {
        self.filters.set_city(city);
    }

    pub fn set_projector(&mut self, projector: Option<String>) {
        self.filters.set_projector(projector);
    }

    pub fn set_search(&mut self, search: Option<String>) {
        self.filters.set_search(search);
    }

    pub fn set_screen_size(&mut self, size: Option<ScreenSize>) {
        self.filters.set_screen_size(size);
    }

    pub fn set_aspect_ratio(&mut self, ratio: Option<AspectRatioBucket>) {
        self.filters.set_aspect_ratio(ratio);
    }

    pub fn set_film(&mut self, film: Option<FilmCapability>) {
        self.filters.set_film(film);
    }

    pub fn reset_filters(&mut self) {
        self.filters.reset();
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    /// 単位切替（再描画のみ）
    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    pub fn choices(&self) -> ChoiceSets {
        self.engine().choices(&self.filters)
    }

    pub fn filtered(&self) -> Vec<&Theatre> {
        self.engine().apply(&self.filters)
    }

    pub fn view(&self) -> TableView {
        TableView::build(&self.filtered(), self.unit, self.config.show_region_column)
    }

    /// 現在の絞り込み結果をCSV化（date は YYYY-MM-DD）
    pub fn export(&self, date: &str) -> Result<ExportFile> {
        export::export_csv(&self.filtered(), self.scope(), date)
    }

    /// URLパラメータの初期選択を段階的に適用
    ///
    /// 国は選択肢にある場合のみ、行政区分・都市はその時点の選択肢から
    /// 完全一致 → 部分一致で探す。
    pub fn apply_preselection(&mut self, preselection: &Preselection) {
        if let Some(country) = &preselection.country {
            if self.choices().countries.iter().any(|c| c == country) {
                self.filters.set_country(Some(country.clone()));
            } else {
                debug!(country = %country, "preselected country not available");
            }
        }

        if let Some(wanted) = &preselection.admin_division {
            let options = self.choices().admin_divisions;
            if let Some(found) = url::match_option(&options, wanted) {
                self.filters.set_admin_division(Some(found.to_string()));
            }
        }

        if let Some(wanted) = &preselection.city {
            let options = self.choices().cities;
            if let Some(found) = url::match_option(&options, wanted) {
                self.filters.set_city(Some(found.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AdminDivisionColumn;
    use crate::error::{Error, FetchError};
    use crate::tabular;
    use futures::executor::block_on;
    use std::collections::HashMap;

    struct StaticFetcher(HashMap<&'static str, String>);

    impl SourceFetcher for StaticFetcher {
        async fn fetch(&self, path: &str) -> std::result::Result<Vec<u8>, FetchError> {
            self.0
                .get(path)
                .map(|text| text.as_bytes().to_vec())
                .ok_or_else(|| FetchError::NotFound(path.to_string()))
        }
    }

    const HEADER: &str = "Province,City,Location Name,Screen Aspect Ratio (AR),Digital Projector,Film Projector,Height,Width";

    fn fetcher() -> StaticFetcher {
        let canada = format!(
            "{}\nOntario,Toronto,Cinesphere,1.43:1,IMAX with Laser,GT 15/70,18.29 m,24.38 m\nQuebec,Montréal,Banque Scotia,1.90:1,IMAX Xenon,No,25 m,30 m\n",
            HEADER
        );
        let japan = "Prefecture,City,Location Name,Digital Projector\nTokyo,Shinjuku,109 Cinemas,IMAX with Laser\n";
        StaticFetcher(HashMap::from([
            ("americas/canada.csv", canada),
            ("asia/japan.csv", japan.to_string()),
        ]))
    }

    fn config(region: Option<Region>) -> DatabaseConfig {
        DatabaseConfig {
            sources: vec![
                SourceDescriptor::new("americas/canada.csv", Region::Americas, "Canada", AdminDivisionColumn::named("Province")),
                SourceDescriptor::new("americas/missing.csv", Region::Americas, "Peru", AdminDivisionColumn::named("Region")),
                SourceDescriptor::new("asia/japan.csv", Region::Asia, "Japan", AdminDivisionColumn::named("Prefecture")),
            ],
            region,
            show_region_column: region.is_none(),
        }
    }

    #[test]
    fn test_global_view_starts_empty() {
        let mut db = TheatreDatabase::new(config(None));
        let report = block_on(db.load(&fetcher())).unwrap();

        assert_eq!(report.records, 3);
        assert_eq!(report.skipped.len(), 1);
        assert!(db.filtered().is_empty());
        assert!(db.view().is_empty());

        db.select_region(Some(RegionFilter::Only(Region::Americas)));
        assert_eq!(db.filtered().len(), 2);
        assert_eq!(db.view().headers[0], "Region");
    }

    #[test]
    fn test_regional_view_shows_everything() {
        let mut db = TheatreDatabase::new(config(Some(Region::Americas)));
        block_on(db.load(&fetcher())).unwrap();

        let view = db.view();
        assert_eq!(view.summary.total, 2);
        assert_eq!(view.summary.countries, 1);
        assert_eq!(db.choices().admin_divisions, vec!["Ontario", "Quebec"]);
    }

    #[test]
    fn test_unit_toggle_only_changes_rendering() {
        let mut db = TheatreDatabase::new(config(Some(Region::Americas)));
        block_on(db.load(&fetcher())).unwrap();

        let metric = db.view();
        db.set_unit(Unit::Imperial);
        let imperial = db.view();

        assert_eq!(metric.rows.len(), imperial.rows.len());
        assert_eq!(metric.rows[0].cells[8], "18.29 m");
        assert_eq!(imperial.rows[0].cells[8], "60.0 ft");
        assert_eq!(db.store().theatres()[0].get("Height"), Some("18.29 m"));
    }

    #[test]
    fn test_export_subset() {
        let mut db = TheatreDatabase::new(config(None));
        block_on(db.load(&fetcher())).unwrap();

        assert!(matches!(db.export("2024-05-01"), Err(Error::NothingToExport)));

        db.set_projector(Some("IMAX with Laser".into()));
        let file = db.export("2024-05-01").unwrap();
        assert_eq!(file.file_name, "imax-theatres-global-2024-05-01.csv");
        assert_eq!(tabular::parse(&file.contents).unwrap().rows.len(), 2);
    }

    #[test]
    fn test_preselection_staged_matching() {
        let mut db = TheatreDatabase::new(config(Some(Region::Americas)));
        block_on(db.load(&fetcher())).unwrap();

        let params = url::QueryParams::parse("country=canada&province=QUE&city=montr");
        db.apply_preselection(&Preselection::from_query(&params));

        assert_eq!(db.filters().country(), Some("Canada"));
        assert_eq!(db.filters().admin_division(), Some("Quebec"));
        assert_eq!(db.filters().city(), Some("Montréal"));
        assert_eq!(db.filtered().len(), 1);
    }

    #[test]
    fn test_preselection_unknown_country_ignored() {
        let mut db = TheatreDatabase::new(config(Some(Region::Americas)));
        block_on(db.load(&fetcher())).unwrap();

        let params = url::QueryParams::parse("country=narnia&city=toronto");
        db.apply_preselection(&Preselection::from_query(&params));

        assert_eq!(db.filters().country(), None);
        assert_eq!(db.filters().city(), Some("Toronto"));
    }

    #[test]
    fn test_switching_scope_uses_cache() {
        let mut db = TheatreDatabase::new(config(None));
        let fetcher = fetcher();
        block_on(db.load(&fetcher)).unwrap();
        let asia = block_on(db.load_scope(&fetcher, Scope::Region(Region::Asia))).unwrap();
        assert!(!asia.from_cache);
        let again = block_on(db.load_scope(&fetcher, Scope::Global)).unwrap();
        assert!(again.from_cache);
        assert_eq!(again.records, 3);
    }
}
