//! IMAX Theatre Common Library
//!
//! CLIとWeb(WASM)で共有されるデータ読込・フィルタ・表示ロジック

pub mod types;
pub mod error;
pub mod catalog;
pub mod tabular;
pub mod normalizer;
pub mod store;
pub mod loader;
pub mod filter;
pub mod presentation;
pub mod export;
pub mod url;
pub mod units;
pub mod database;

pub use types::{Region, Theatre};
pub use error::{Error, FetchError, Result};
pub use catalog::{default_catalog, AdminDivisionColumn, SourceDescriptor};
pub use store::{AggregateStore, Scope, ScopeCache};
pub use loader::{load_scope, LoadReport, SkippedSource, SourceFetcher};
pub use filter::{
    AspectRatioBucket, ChoiceSets, FilmCapability, FilterEngine, FilterState, RegionFilter, ScreenSize,
};
pub use presentation::{convert_dimension, Summary, TableView, Unit, NO_RESULTS_MESSAGE};
pub use export::{export_csv, export_file_name, ExportFile};
pub use url::{legacy_redirect, split_url, Preselection, QueryParams};
pub use units::TableUnitConverter;
pub use database::{DatabaseConfig, TheatreDatabase};
