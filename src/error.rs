use thiserror::Error;

#[derive(Error, Debug)]
pub enum TheatreDbError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("データ読込エラー: {0}")]
    Database(#[from] imax_theatre_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("{line}行目の形式が不正です（{message}）")]
    MalformedRow { line: u64, message: String },

    #[error("データ検証で{0}件のエラーが見つかりました")]
    Validation(usize),

    #[error("対話入力エラー: {0}")]
    Prompt(String),
}

impl From<dialoguer::Error> for TheatreDbError {
    fn from(e: dialoguer::Error) -> Self {
        TheatreDbError::Prompt(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TheatreDbError>;
