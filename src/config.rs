use crate::error::{Result, TheatreDbError};
use imax_theatre_common::{catalog, DatabaseConfig, Region, SourceDescriptor};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// データパスの環境変数（設定ファイルより優先）
pub const DATA_PATH_ENV: &str = "IMAX_DB_DATA_PATH";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// CSVのルート（ローカルディレクトリ or http(s) URL）
    pub data_path: String,
    pub show_region_column: bool,
    pub default_region: Option<Region>,
    /// ソース一覧JSON（省略時は組み込みカタログ）
    pub catalog_path: Option<PathBuf>,
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: "data/".into(),
            show_region_column: false,
            default_region: None,
            catalog_path: None,
            export_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env();
        Ok(config)
    }

    /// 指定パスから読込（なければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| TheatreDbError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("imax-db").join("config.json"))
    }

    fn apply_env(&mut self) {
        if let Ok(path) = std::env::var(DATA_PATH_ENV) {
            if !path.trim().is_empty() {
                self.data_path = path;
            }
        }
    }

    /// ソース一覧（catalog_path 指定時はそのJSON）
    pub fn sources(&self) -> Result<Vec<SourceDescriptor>> {
        match &self.catalog_path {
            Some(path) => {
                if !path.exists() {
                    return Err(TheatreDbError::FileNotFound(path.display().to_string()));
                }
                let json = std::fs::read_to_string(path)?;
                Ok(catalog::from_json(&json)?)
            }
            None => Ok(catalog::default_catalog()),
        }
    }

    /// 読込スコープ（引数の地域 → 設定の既定地域）を反映したデータベース設定
    pub fn database_config(&self, region: Option<Region>) -> Result<DatabaseConfig> {
        let region = region.or(self.default_region);
        Ok(DatabaseConfig {
            sources: self.sources()?,
            region,
            show_region_column: self.show_region_column || region.is_none(),
        })
    }

    pub fn set_data_path(&mut self, path: String) -> Result<()> {
        self.data_path = path;
        self.save()
    }

    pub fn set_default_region(&mut self, region: Option<Region>) -> Result<()> {
        self.default_region = region;
        self.save()
    }
}
