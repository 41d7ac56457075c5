//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Unknown region: {0}")]
    InvalidRegion(String),

    /// ソース単位の処理から漏れた致命的な読込失敗
    #[error("Failed to load theatre data from {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("No data to export. Please apply some filters first.")]
    NothingToExport,

    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

/// 1ソース分の取得失敗（ローダーはスキップして続行する）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("read error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error = Error::Io(io_error);
        let display = format!("{}", error);
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_display_config() {
        let error = Error::Config("catalog is empty".to_string());
        assert_eq!(format!("{}", error), "Config error: catalog is empty");
    }

    #[test]
    fn test_error_display_load() {
        let error = Error::Load {
            path: "asia/japan.csv".to_string(),
            reason: "invalid UTF-8".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("asia/japan.csv"));
        assert!(display.contains("invalid UTF-8"));
    }

    #[test]
    fn test_nothing_to_export_message() {
        assert_eq!(
            Error::NothingToExport.to_string(),
            "No data to export. Please apply some filters first."
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
    }

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(FetchError::Status(404).to_string(), "HTTP status 404");
        assert!(FetchError::Network("timed out".into()).to_string().contains("timed out"));
    }
}
