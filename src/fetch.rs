//! ソース取得（ローカルディレクトリ / HTTP）

use imax_theatre_common::{FetchError, SourceFetcher};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::debug;

/// ローカルディレクトリから読む
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceFetcher for FsFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let full_path = self.root.join(path);
        debug!(path = %full_path.display(), "reading source");
        tokio::fs::read(&full_path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FetchError::NotFound(full_path.display().to_string()),
            _ => FetchError::Io(e.to_string()),
        })
    }
}

/// HTTP(S)で取得
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(path);
        debug!(url = %url, "fetching source");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| FetchError::Network(e.to_string()))
    }
}

/// data_path の形式で取得方法を選ぶ
#[derive(Debug, Clone)]
pub enum DataFetcher {
    Fs(FsFetcher),
    Http(HttpFetcher),
}

impl DataFetcher {
    pub fn from_data_path(data_path: &str) -> Self {
        if data_path.starts_with("http://") || data_path.starts_with("https://") {
            DataFetcher::Http(HttpFetcher::new(data_path))
        } else {
            DataFetcher::Fs(FsFetcher::new(data_path))
        }
    }
}

impl SourceFetcher for DataFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        match self {
            DataFetcher::Fs(fetcher) => fetcher.fetch(path).await,
            DataFetcher::Http(fetcher) => fetcher.fetch(path).await,
        }
    }
}

/// 取得ごとにプログレスバーを進める
pub struct ProgressFetcher<F> {
    inner: F,
    bar: ProgressBar,
}

impl<F: SourceFetcher> ProgressFetcher<F> {
    pub fn new(inner: F, total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar().template("{msg:30} [{bar:40.cyan/blue}] {pos}/{len}") {
            bar.set_style(style.progress_chars("=> "));
        }
        Self { inner, bar }
    }

    pub fn hidden(inner: F) -> Self {
        Self {
            inner,
            bar: ProgressBar::hidden(),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl<F: SourceFetcher> SourceFetcher for ProgressFetcher<F> {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        self.bar.set_message(path.to_string());
        let result = self.inner.fetch(path).await;
        self.bar.inc(1);
        result
    }
}
