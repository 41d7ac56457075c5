//! ソースローダー
//!
//! スコープに属するソースを設定順に1件ずつ取得し、正規化して
//! 集約ストアに登録する。取得失敗はスキップ、デコード・ヘッダー
//! 読込の失敗のみ読込全体を中断する。

use crate::catalog::{self, SourceDescriptor};
use crate::error::{Error, FetchError, Result};
use crate::normalizer;
use crate::store::{AggregateStore, Scope};
use crate::tabular;
use tracing::{debug, info, warn};

/// 取得元の抽象（ファイルシステム・HTTP・ブラウザfetch）
#[allow(async_fn_in_trait)]
pub trait SourceFetcher {
    /// データパスからの相対パスを取得
    async fn fetch(&self, path: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

/// スキップしたソース
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    pub path: String,
    pub reason: String,
}

/// 読込結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub scope: Scope,
    pub from_cache: bool,
    pub records: usize,
    /// 取得に成功したソース数
    pub fetched: usize,
    pub skipped: Vec<SkippedSource>,
    /// 読み飛ばした不正行の数
    pub row_warnings: usize,
}

impl LoadReport {
    fn new(scope: Scope) -> Self {
        Self {
            scope,
            from_cache: false,
            records: 0,
            fetched: 0,
            skipped: Vec::new(),
            row_warnings: 0,
        }
    }

    fn cached(scope: Scope, records: usize) -> Self {
        Self {
            from_cache: true,
            records,
            ..Self::new(scope)
        }
    }
}

/// スコープを読み込み、ストアをそのスコープに切り替える
pub async fn load_scope<F: SourceFetcher>(
    store: &mut AggregateStore,
    fetcher: &F,
    descriptors: &[SourceDescriptor],
    scope: Scope,
) -> Result<LoadReport> {
    if store.activate_cached(scope) {
        debug!(scope = %scope, records = store.len(), "served from cache");
        return Ok(LoadReport::cached(scope, store.len()));
    }

    let sources = catalog::for_scope(descriptors, scope);
    info!(scope = %scope, sources = sources.len(), "loading theatre data");

    let mut report = LoadReport::new(scope);
    let mut theatres = Vec::new();

    for descriptor in sources {
        let bytes = match fetcher.fetch(&descriptor.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %descriptor.path, error = %e, "failed to load source, skipping");
                report.skipped.push(SkippedSource {
                    path: descriptor.path.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let table = tabular::decode(&bytes)
            .and_then(|text| tabular::parse(&text))
            .map_err(|e| Error::Load {
                path: descriptor.path.clone(),
                reason: e.to_string(),
            })?;

        report.row_warnings += table.warnings.len();
        let rows = normalizer::normalize_table(table, descriptor);
        debug!(path = %descriptor.path, rows = rows.len(), "source loaded");
        theatres.extend(rows);
        report.fetched += 1;
    }

    report.records = theatres.len();
    store.commit(scope, theatres);

    info!(
        scope = %scope,
        records = report.records,
        skipped = report.skipped.len(),
        "theatre data loaded"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AdminDivisionColumn;
    use crate::types::Region;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// 取得回数を記録するメモリ上のフェッチャー
    #[derive(Default)]
    struct MemoryFetcher {
        files: HashMap<String, Vec<u8>>,
        calls: RefCell<Vec<String>>,
    }

    impl MemoryFetcher {
        fn with(mut self, path: &str, text: &str) -> Self {
            self.files.insert(path.to_string(), text.as_bytes().to_vec());
            self
        }

        fn with_bytes(mut self, path: &str, bytes: &[u8]) -> Self {
            self.files.insert(path.to_string(), bytes.to_vec());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl SourceFetcher for MemoryFetcher {
        async fn fetch(&self, path: &str) -> std::result::Result<Vec<u8>, FetchError> {
            self.calls.borrow_mut().push(path.to_string());
            self.files.get(path).cloned().ok_or(FetchError::Status(404))
        }
    }

    fn descriptors() -> Vec<SourceDescriptor> {
        vec![
            SourceDescriptor::new("asia/japan.csv", Region::Asia, "Japan", AdminDivisionColumn::named("Prefecture")),
            SourceDescriptor::new("asia/india.csv", Region::Asia, "India", AdminDivisionColumn::named("State")),
            SourceDescriptor::new("europe/germany.csv", Region::Europe, "Germany", AdminDivisionColumn::Absent),
        ]
    }

    fn fetcher() -> MemoryFetcher {
        MemoryFetcher::default()
            .with("asia/japan.csv", "Prefecture,City\nTokyo,Shinjuku\nOsaka,Osaka\n")
            .with("asia/india.csv", "State,City\nMaharashtra,Mumbai\n")
            .with("europe/germany.csv", "City\nBerlin\n")
    }

    #[test]
    fn test_load_scope_in_descriptor_order() {
        let fetcher = fetcher();
        let mut store = AggregateStore::new(Scope::Global);
        let report = block_on(load_scope(&mut store, &fetcher, &descriptors(), Scope::Global)).unwrap();

        assert!(!report.from_cache);
        assert_eq!(report.records, 4);
        assert_eq!(report.fetched, 3);
        assert_eq!(fetcher.calls(), vec!["asia/japan.csv", "asia/india.csv", "europe/germany.csv"]);

        let cities: Vec<_> = store.theatres().iter().map(|t| t.city()).collect();
        assert_eq!(cities, vec!["Shinjuku", "Osaka", "Mumbai", "Berlin"]);
        assert_eq!(store.theatres()[3].admin_division(), "");
    }

    #[test]
    fn test_second_load_served_from_cache() {
        let fetcher = fetcher();
        let mut store = AggregateStore::new(Scope::Global);
        let scope = Scope::Region(Region::Asia);

        let first = block_on(load_scope(&mut store, &fetcher, &descriptors(), scope)).unwrap();
        let before = store.theatres().to_vec();
        let second = block_on(load_scope(&mut store, &fetcher, &descriptors(), scope)).unwrap();

        assert!(second.from_cache);
        assert_eq!(first.records, second.records);
        assert_eq!(store.theatres(), before.as_slice());
        assert_eq!(fetcher.calls().len(), 2);
    }

    #[test]
    fn test_failed_source_is_skipped() {
        let fetcher = MemoryFetcher::default().with("asia/india.csv", "State,City\nKerala,Kochi\n");
        let mut store = AggregateStore::new(Scope::Global);
        let report = block_on(load_scope(&mut store, &fetcher, &descriptors(), Scope::Region(Region::Asia))).unwrap();

        assert_eq!(report.records, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, "asia/japan.csv");
        assert_eq!(report.skipped[0].reason, "HTTP status 404");
        assert_eq!(store.theatres()[0].country(), "India");
    }

    #[test]
    fn test_invalid_encoding_aborts_load() {
        let fetcher = fetcher().with_bytes("asia/india.csv", &[0xFF, 0xFE, 0x00]);
        let mut store = AggregateStore::new(Scope::Global);
        let result = block_on(load_scope(&mut store, &fetcher, &descriptors(), Scope::Global));

        match result {
            Err(Error::Load { path, .. }) => assert_eq!(path, "asia/india.csv"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(!store.cache().contains(Scope::Global));
    }

    #[test]
    fn test_all_sources_failing_yields_empty_store() {
        let fetcher = MemoryFetcher::default();
        let mut store = AggregateStore::new(Scope::Global);
        let report = block_on(load_scope(&mut store, &fetcher, &descriptors(), Scope::Global)).unwrap();

        assert_eq!(report.records, 0);
        assert_eq!(report.skipped.len(), 3);
        assert!(store.is_empty());
    }
}
