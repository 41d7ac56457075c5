//! メインアプリケーションコンポーネント

use crate::browser::{self, PageConfig};
use crate::components::{
    export_button::ExportButton,
    filter_panel::FilterPanel,
    header::Header,
    stats_panel::StatsPanel,
    status::Status,
    theatre_table::TheatreTable,
    unit_toggle::UnitToggle,
};
use crate::fetch::WebFetcher;
use imax_theatre_common::TheatreDatabase;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 読込状態
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    let PageConfig { database, data_path } = browser::page_config();
    let scope = database.scope();
    let db = RwSignal::new(TheatreDatabase::new(database));
    let (status, set_status) = signal(LoadStatus::Loading);

    // 起動時に1回だけ読込（スコープはページで固定）
    spawn_local(async move {
        let fetcher = WebFetcher::new(data_path);
        let mut database = db.get_untracked();
        match database.load(&fetcher).await {
            Ok(report) => {
                for skipped in &report.skipped {
                    gloo::console::warn!(format!("Failed to load {}: {}", skipped.path, skipped.reason));
                }
                gloo::console::log!(format!("Loaded {} theatres ({})", report.records, report.scope));
                database.apply_preselection(&browser::preselection());
                db.set(database);
                set_status.set(LoadStatus::Ready);
            }
            Err(e) => {
                gloo::console::error!(format!("Error loading theatre data: {}", e));
                set_status.set(LoadStatus::Failed(e.to_string()));
            }
        }
    });

    let table = Memo::new(move |_| db.with(|d| d.view()));

    view! {
        <div class="container">
            <Header scope=scope />

            <Status status=status />

            <Show when=move || status.get() == LoadStatus::Ready>
                <FilterPanel db=db />

                <div class="toolbar">
                    <UnitToggle db=db />
                    <ExportButton db=db />
                </div>

                <StatsPanel table=table />
                <TheatreTable table=table />
            </Show>
        </div>
    }
}
