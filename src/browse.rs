//! 対話的なカスケード選択（地域 → 国 → 行政区分 → 都市）

use crate::error::Result;
use dialoguer::{Input, Select};
use imax_theatre_common::{RegionFilter, TheatreDatabase};

pub const ALL_REGIONS: &str = "All Regions";
pub const ALL_COUNTRIES: &str = "All Countries/Areas";
pub const ALL_ADMIN_DIVISIONS: &str = "All Provinces/States";
pub const ALL_CITIES: &str = "All Cities";

/// 先頭に「すべて」を付けた選択肢
pub fn options_with_all(all_label: &str, values: &[String]) -> Vec<String> {
    std::iter::once(all_label.to_string())
        .chain(values.iter().cloned())
        .collect()
}

/// 選択結果を値に戻す（先頭の「すべて」は None）
pub fn selected_value(values: &[String], index: usize) -> Option<String> {
    index.checked_sub(1).and_then(|i| values.get(i).cloned())
}

fn pick(prompt: &str, all_label: &str, values: &[String]) -> Result<Option<String>> {
    let items = options_with_all(all_label, values);
    let index = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;
    Ok(selected_value(values, index))
}

/// 対話で絞り込み条件を設定する
pub fn run_interactive(db: &mut TheatreDatabase) -> Result<()> {
    if db.scope().is_global() {
        let regions: Vec<String> = db
            .choices()
            .regions
            .iter()
            .map(|r| r.as_str().to_string())
            .collect();
        let items = options_with_all(ALL_REGIONS, &regions);
        let index = Select::new()
            .with_prompt("地域")
            .items(&items)
            .default(0)
            .interact()?;

        let region = match selected_value(&regions, index) {
            Some(name) => RegionFilter::Only(name.parse()?),
            None => RegionFilter::All,
        };
        db.select_region(Some(region));
    }

    let countries = db.choices().countries;
    if !countries.is_empty() {
        let country = pick("国/地域", ALL_COUNTRIES, &countries)?;
        db.select_country(country);
    }

    let admin_divisions = db.choices().admin_divisions;
    if !admin_divisions.is_empty() {
        let admin_division = pick("州・県", ALL_ADMIN_DIVISIONS, &admin_divisions)?;
        db.select_admin_division(admin_division);
    }

    let cities = db.choices().cities;
    if !cities.is_empty() {
        let city = pick("都市", ALL_CITIES, &cities)?;
        db.select_city(city);
    }

    let search: String = Input::new()
        .with_prompt("キーワード（空欄でスキップ）")
        .allow_empty(true)
        .interact_text()?;
    db.set_search(Some(search.trim().to_string()));

    Ok(())
}
