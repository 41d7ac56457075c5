//! ヘッダーコンポーネント

use imax_theatre_common::Scope;
use leptos::prelude::*;

#[component]
pub fn Header(scope: Scope) -> impl IntoView {
    let title = match scope.region() {
        Some(region) => format!("IMAX Theatres in {}", region),
        None => "IMAX Theatre Database".to_string(),
    };

    view! {
        <header class="header">
            <h1>{title}</h1>
        </header>
    }
}
