//! CSVエクスポートボタン

use crate::browser;
use imax_theatre_common::TheatreDatabase;
use leptos::prelude::*;

#[component]
pub fn ExportButton(db: RwSignal<TheatreDatabase>) -> impl IntoView {
    let on_click = move |_| {
        let result = db.with_untracked(|d| d.export(&browser::today_iso()));
        match result {
            Ok(file) => {
                if let Err(e) = browser::download_csv(&file) {
                    gloo::console::error!(format!("CSV download failed: {:?}", e));
                }
            }
            // 結果なしはファイルを作らず通知のみ
            Err(e) => browser::alert(&e.to_string()),
        }
    };

    view! {
        <button class="btn btn-primary" on:click=on_click>
            "Export CSV"
        </button>
    }
}
