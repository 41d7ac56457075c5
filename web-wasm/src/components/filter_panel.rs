//! 絞り込みパネル
//!
//! 地域 → 国 → 行政区分 → 都市 のカスケードと、映写機・サイズ・アスペクト比・
//! フィルム対応・キーワードの各条件。

use imax_theatre_common::{
    AspectRatioBucket, FilmCapability, RegionFilter, ScreenSize, TheatreDatabase,
};
use leptos::prelude::*;

/// (value, 表示名)
type Options = Vec<(String, String)>;

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn same_labels(values: Vec<String>) -> Options {
    values.into_iter().map(|v| (v.clone(), v)).collect()
}

/// 現在の選択値（未選択は空文字）
fn selected_text(db: RwSignal<TheatreDatabase>, pick: fn(&TheatreDatabase) -> Option<&str>) -> Signal<String> {
    Signal::derive(move || db.with(|d| pick(d).unwrap_or_default().to_string()))
}

/// 先頭が「未選択」のセレクトボックス
#[component]
fn Selector(
    label: &'static str,
    placeholder: &'static str,
    #[prop(into)] options: Signal<Options>,
    #[prop(into)] selected: Signal<String>,
    on_change: impl Fn(Option<String>) + 'static,
) -> impl IntoView {
    let items = move || {
        options
            .get()
            .into_iter()
            .map(|(value, text)| {
                let current = value.clone();
                view! {
                    <option value=value prop:selected=move || selected.get() == current>
                        {text}
                    </option>
                }
            })
            .collect_view()
    };

    view! {
        <label class="filter">
            <span class="filter-label">{label}</span>
            <select
                prop:value=move || selected.get()
                on:change=move |ev| on_change(non_empty(event_target_value(&ev)))
            >
                <option value="" prop:selected=move || selected.get().is_empty()>{placeholder}</option>
                {items}
            </select>
        </label>
    }
}

#[component]
pub fn FilterPanel(db: RwSignal<TheatreDatabase>) -> impl IntoView {
    let choices = Memo::new(move |_| db.with(|d| d.choices()));
    let is_global = db.with_untracked(|d| d.scope().is_global());

    // 地域（全世界ページのみ）
    let region_options = Signal::derive(move || {
        std::iter::once((RegionFilter::ALL_VALUE.to_string(), RegionFilter::All.label().to_string()))
            .chain(choices.with(|c| {
                c.regions
                    .iter()
                    .map(|r| (r.as_str().to_string(), r.as_str().to_string()))
                    .collect::<Vec<_>>()
            }))
            .collect::<Options>()
    });
    let region_selected = Signal::derive(move || {
        db.with(|d| match d.filters().region() {
            Some(RegionFilter::All) => RegionFilter::ALL_VALUE.to_string(),
            Some(RegionFilter::Only(region)) => region.as_str().to_string(),
            None => String::new(),
        })
    });

    let size_options: Options = ScreenSize::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), s.label().to_string()))
        .collect();
    let aspect_options: Options = AspectRatioBucket::ALL
        .iter()
        .map(|a| (a.as_str().to_string(), a.label().to_string()))
        .collect();
    let film_options: Options = FilmCapability::ALL
        .iter()
        .map(|f| (f.as_str().to_string(), f.label().to_string()))
        .collect();

    let search_value = move || db.with(|d| d.filters().search().unwrap_or_default().to_string());

    view! {
        <div class="filter-panel">
            <div class="filter-row">
                <Show when=move || is_global>
                    <Selector
                        label="Region"
                        placeholder="Select a Region"
                        options=region_options
                        selected=region_selected
                        on_change={move |v: Option<String>| {
                            let region = v.and_then(|v| v.parse::<RegionFilter>().ok());
                            db.update(|d| d.select_region(region));
                        }}
                    />
                </Show>

                <Selector
                    label="Country/Area"
                    placeholder="All Countries/Areas"
                    options=Signal::derive(move || same_labels(choices.with(|c| c.countries.clone())))
                    selected=selected_text(db, |d| d.filters().country())
                    on_change=move |v| db.update(|d| d.select_country(v))
                />

                <Selector
                    label="Province/State"
                    placeholder="All Provinces/States"
                    options=Signal::derive(move || same_labels(choices.with(|c| c.admin_divisions.clone())))
                    selected=selected_text(db, |d| d.filters().admin_division())
                    on_change=move |v| db.update(|d| d.select_admin_division(v))
                />

                <Selector
                    label="City"
                    placeholder="All Cities"
                    options=Signal::derive(move || same_labels(choices.with(|c| c.cities.clone())))
                    selected=selected_text(db, |d| d.filters().city())
                    on_change=move |v| db.update(|d| d.select_city(v))
                />
            </div>

            <div class="filter-row">
                <Selector
                    label="Digital Projector"
                    placeholder="All Projectors"
                    options=Signal::derive(move || same_labels(choices.with(|c| c.projectors.clone())))
                    selected=selected_text(db, |d| d.filters().projector())
                    on_change=move |v| db.update(|d| d.set_projector(v))
                />

                <Selector
                    label="Screen Size"
                    placeholder="All Sizes"
                    options=Signal::derive(move || size_options.clone())
                    selected=Signal::derive(move || {
                        db.with(|d| d.filters().screen_size().map(|s| s.as_str().to_string()).unwrap_or_default())
                    })
                    on_change={move |v: Option<String>| {
                        db.update(|d| d.set_screen_size(v.and_then(|v| v.parse().ok())))
                    }}
                />

                <Selector
                    label="Aspect Ratio"
                    placeholder="All Aspect Ratios"
                    options=Signal::derive(move || aspect_options.clone())
                    selected=Signal::derive(move || {
                        db.with(|d| d.filters().aspect_ratio().map(|a| a.as_str().to_string()).unwrap_or_default())
                    })
                    on_change={move |v: Option<String>| {
                        db.update(|d| d.set_aspect_ratio(v.and_then(|v| v.parse().ok())))
                    }}
                />

                <Selector
                    label="Film"
                    placeholder="Film & Digital"
                    options=Signal::derive(move || film_options.clone())
                    selected=Signal::derive(move || {
                        db.with(|d| d.filters().film().map(|f| f.as_str().to_string()).unwrap_or_default())
                    })
                    on_change={move |v: Option<String>| {
                        db.update(|d| d.set_film(v.and_then(|v| v.parse().ok())))
                    }}
                />
            </div>

            <div class="filter-row">
                <input
                    type="search"
                    class="search"
                    placeholder="Search theatres..."
                    prop:value=search_value
                    on:input=move |ev| db.update(|d| d.set_search(Some(event_target_value(&ev))))
                />
                <button class="btn btn-secondary" on:click=move |_| db.update(|d| d.reset_filters())>
                    "Reset Filters"
                </button>
            </div>
        </div>
    }
}
