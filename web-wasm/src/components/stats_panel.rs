//! 集計表示（結果なしの場合は非表示）

use imax_theatre_common::TableView;
use leptos::prelude::*;

#[component]
pub fn StatsPanel(table: Memo<TableView>) -> impl IntoView {
    let summary = move || table.with(|t| t.summary);

    view! {
        <Show when=move || !table.with(|t| t.is_empty())>
            <div class="stats">
                <div class="stat">
                    <span class="stat-value">{move || summary().total}</span>
                    <span class="stat-label">"Theatres"</span>
                </div>
                <div class="stat">
                    <span class="stat-value">{move || summary().countries}</span>
                    <span class="stat-label">"Countries"</span>
                </div>
                <div class="stat">
                    <span class="stat-value">{move || summary().cities}</span>
                    <span class="stat-label">"Cities"</span>
                </div>
                <div class="stat">
                    <span class="stat-value">{move || summary().projectors}</span>
                    <span class="stat-label">"Projector Types"</span>
                </div>
            </div>
        </Show>
    }
}
