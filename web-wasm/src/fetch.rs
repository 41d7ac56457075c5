//! ブラウザの fetch でソースCSVを取得

use imax_theatre_common::{FetchError, SourceFetcher};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// ページからの相対パス（既定 `data/`）で取得する
#[derive(Debug, Clone)]
pub struct WebFetcher {
    base_url: String,
}

impl WebFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.is_empty() && !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn network_error(e: JsValue) -> FetchError {
    FetchError::Network(format!("{:?}", e))
}

impl SourceFetcher for WebFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let window = web_sys::window().ok_or_else(|| FetchError::Network("no window".into()))?;
        let url = self.url_for(path);

        let resp_value = JsFuture::from(window.fetch_with_str(&url))
            .await
            .map_err(network_error)?;
        let resp: Response = resp_value.dyn_into().map_err(network_error)?;

        if !resp.ok() {
            return Err(FetchError::Status(resp.status()));
        }

        let buffer = JsFuture::from(resp.array_buffer().map_err(network_error)?)
            .await
            .map_err(network_error)?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}


#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn wasm_fetch_missing_source_is_status_error() {
        let fetcher = WebFetcher::new("/no-such-data-dir/");
        let result = fetcher.fetch("nowhere/missing.csv").await;
        assert!(matches!(result, Err(FetchError::Status(404)) | Err(FetchError::Network(_))));
    }
}
