//! ページ（DOM・URL）とのやりとり

use imax_theatre_common::{legacy_redirect, DatabaseConfig, ExportFile, Preselection, QueryParams, Region};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// CSVの既定の置き場所
pub const DEFAULT_DATA_PATH: &str = "data/";

/// `<body>` の data 属性から読む起動設定
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub database: DatabaseConfig,
    pub data_path: String,
}

fn body_attribute(name: &str) -> Option<String> {
    web_sys::window()?
        .document()?
        .body()?
        .get_attribute(name)
        .filter(|v| !v.trim().is_empty())
}

/// `data-region` / `data-show-region-column` / `data-path`
pub fn page_config() -> PageConfig {
    let region = body_attribute("data-region").and_then(|name| match name.parse::<Region>() {
        Ok(region) => Some(region),
        Err(e) => {
            gloo::console::warn!(format!("ignoring data-region: {}", e));
            None
        }
    });
    let show_region_column = body_attribute("data-show-region-column")
        .map(|v| v == "true")
        .unwrap_or(region.is_none());

    PageConfig {
        database: DatabaseConfig {
            region,
            show_region_column,
            ..Default::default()
        },
        data_path: body_attribute("data-path").unwrap_or_else(|| DEFAULT_DATA_PATH.to_string()),
    }
}

/// 旧URLなら location.replace して true
pub fn redirect_legacy_url() -> bool {
    let Some(location) = web_sys::window().map(|w| w.location()) else {
        return false;
    };
    let (Ok(path), Ok(query), Ok(fragment)) = (location.pathname(), location.search(), location.hash()) else {
        return false;
    };

    match legacy_redirect(&path, &query, &fragment) {
        Some(target) => location.replace(&target).is_ok(),
        None => false,
    }
}

/// `?country=&state=&city=` の初期選択
pub fn preselection() -> Preselection {
    let query = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    Preselection::from_query(&QueryParams::parse(&query))
}

/// 今日の日付（UTC, YYYY-MM-DD）
pub fn today_iso() -> String {
    let iso: String = js_sys::Date::new_0().to_iso_string().into();
    iso.split('T').next().unwrap_or_default().to_string()
}

/// CSVをダウンロードさせる
pub fn download_csv(file: &ExportFile) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let parts = js_sys::Array::of1(&JsValue::from_str(&file.contents));
    let options = BlobPropertyBag::new();
    options.set_type("text/csv;charset=utf-8;");
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let link: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    link.set_href(&url);
    link.set_download(&file.file_name);
    link.style().set_property("visibility", "hidden")?;

    let body = document.body().ok_or_else(|| JsValue::from_str("no body"))?;
    body.append_child(&link)?;
    link.click();
    body.remove_child(&link)?;
    Url::revoke_object_url(&url)
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_today_iso_is_date_only() {
        let today = today_iso();
        assert_eq!(today.len(), 10);
        assert_eq!(today.as_bytes()[4], b'-');
        assert_eq!(today.as_bytes()[7], b'-');
        assert!(!today.contains('T'));
    }

    #[wasm_bindgen_test]
    fn wasm_page_config_reads_body_attributes() {
        let body = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
            .expect("body がありません");

        for name in ["data-region", "data-show-region-column", "data-path"] {
            body.remove_attribute(name).unwrap();
        }
        let config = page_config();
        assert_eq!(config.database.region, None);
        assert!(config.database.show_region_column);
        assert_eq!(config.data_path, DEFAULT_DATA_PATH);

        body.set_attribute("data-region", "asia").unwrap();
        body.set_attribute("data-path", "/imax/data/").unwrap();
        let config = page_config();
        assert_eq!(config.database.region, Some(Region::Asia));
        assert!(!config.database.show_region_column);
        assert_eq!(config.data_path, "/imax/data/");

        for name in ["data-region", "data-path"] {
            body.remove_attribute(name).unwrap();
        }
    }
}
