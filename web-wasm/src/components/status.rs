//! 読込中・エラー表示

use crate::app::LoadStatus;
use leptos::prelude::*;

#[component]
pub fn Status(status: ReadSignal<LoadStatus>) -> impl IntoView {
    move || match status.get() {
        LoadStatus::Loading => view! { <p class="loading">"Loading theatre data..."</p> }.into_any(),
        LoadStatus::Failed(message) => view! {
            <p class="error">{format!("Error loading theatre data: {}", message)}</p>
        }
        .into_any(),
        LoadStatus::Ready => ().into_any(),
    }
}
