//! 劇場レコードの型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - Region: 世界地域（ソース設定から付与）
//! - Theatre: CSV 1行分のレコード（列は可変、順序を保持）

use crate::error::Error;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const FIELD_REGION: &str = "Region";
pub const FIELD_COUNTRY: &str = "Country";
pub const FIELD_ADMIN_DIVISION: &str = "Administrative Division";
pub const FIELD_CITY: &str = "City";
pub const FIELD_LOCATION: &str = "Location Name";
pub const FIELD_ASPECT_RATIO: &str = "Screen Aspect Ratio (AR)";
pub const FIELD_DIGITAL_PROJECTOR: &str = "Digital Projector";
pub const FIELD_MAX_DIGITAL_AR: &str = "Maximum AR for digital projection";
pub const FIELD_FILM_PROJECTOR: &str = "Film Projector";
pub const FIELD_HEIGHT: &str = "Height";
pub const FIELD_WIDTH: &str = "Width";
pub const FIELD_COMMERCIAL: &str = "Commercial films shown?";

/// 世界地域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Americas,
    Asia,
    Europe,
    Africa,
    Oceania,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::Americas,
        Region::Asia,
        Region::Europe,
        Region::Africa,
        Region::Oceania,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Americas => "Americas",
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::Africa => "Africa",
            Region::Oceania => "Oceania",
        }
    }

    /// ページ名・ファイルパスに使う小文字表記
    pub fn slug(&self) -> &'static str {
        match self {
            Region::Americas => "americas",
            Region::Asia => "asia",
            Region::Europe => "europe",
            Region::Africa => "africa",
            Region::Oceania => "oceania",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Region::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidRegion(s.to_string()))
    }
}

/// 劇場レコード
///
/// ソースのヘッダー行が列を決めるため、固定スキーマにはしない。
/// 正規化後は `Region` / `Country` / `Administrative Division` が必ず存在する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Theatre {
    fields: Vec<(String, String)>,
}

impl Theatre {
    pub fn new() -> Self {
        Self::default()
    }

    /// (列名, 値) のペアから生成（同名列は後勝ち）
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut theatre = Self::new();
        for (key, value) in pairs {
            theatre.set(key, value);
        }
        theatre
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == field)
            .map(|(_, v)| v.as_str())
    }

    /// 値を取得（列なしは空文字）
    pub fn get_or_empty(&self, field: &str) -> &str {
        self.get(field).unwrap_or("")
    }

    /// 既存の列は位置を保ったまま上書き、なければ末尾に追加
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn region(&self) -> &str {
        self.get_or_empty(FIELD_REGION)
    }

    pub fn country(&self) -> &str {
        self.get_or_empty(FIELD_COUNTRY)
    }

    pub fn admin_division(&self) -> &str {
        self.get_or_empty(FIELD_ADMIN_DIVISION)
    }

    pub fn city(&self) -> &str {
        self.get_or_empty(FIELD_CITY)
    }

    pub fn digital_projector(&self) -> &str {
        self.get_or_empty(FIELD_DIGITAL_PROJECTOR)
    }
}

/// JSON出力では列順を保ったオブジェクトにする
impl Serialize for Theatre {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
