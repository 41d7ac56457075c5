//! メートル / フィート切替

use imax_theatre_common::{TheatreDatabase, Unit};
use leptos::prelude::*;

#[component]
pub fn UnitToggle(db: RwSignal<TheatreDatabase>) -> impl IntoView {
    let label = move || match db.with(|d| d.unit()) {
        Unit::Metric => "Show in Feet",
        Unit::Imperial => "Show in Meters",
    };

    view! {
        <button
            class="btn btn-secondary"
            on:click=move |_| db.update(|d| d.set_unit(d.unit().toggled()))
        >
            {label}
        </button>
    }
}
