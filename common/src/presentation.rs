//! 表示用データの生成
//!
//! 絞り込み結果から表示行・集計値を作る。単位切替は描画のみに影響し、
//! レコード自体は変更しない。

use crate::types::*;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// メートル → フィート
pub const FEET_PER_METER: f64 = 3.28084;

pub const NO_RESULTS_MESSAGE: &str = "No theatres found matching current filters";

/// 表示単位
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Unit {
    #[default]
    Metric,
    Imperial,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Metric => "metric",
            Unit::Imperial => "imperial",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Unit::Metric => Unit::Imperial,
            Unit::Imperial => Unit::Metric,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(Unit::Metric),
            "imperial" => Ok(Unit::Imperial),
            other => Err(crate::error::Error::Config(format!("unknown unit: {}", other))),
        }
    }
}

/// 寸法を表示単位に変換
///
/// "m" を含み先頭が数値の値のみ変換対象。それ以外はそのまま返す。
pub fn convert_dimension(value: &str, unit: Unit) -> String {
    if unit == Unit::Metric || !value.contains('m') {
        return value.to_string();
    }
    match crate::filter::parse_leading_number(value) {
        Some(meters) => format!("{:.1} ft", meters * FEET_PER_METER),
        None => value.to_string(),
    }
}

/// 表示列（地域列は設定で表示する場合のみ先頭に付く）
pub fn columns(show_region: bool) -> Vec<&'static str> {
    let mut columns = Vec::with_capacity(12);
    if show_region {
        columns.push(FIELD_REGION);
    }
    columns.extend([
        FIELD_COUNTRY,
        FIELD_ADMIN_DIVISION,
        FIELD_CITY,
        FIELD_LOCATION,
        FIELD_ASPECT_RATIO,
        FIELD_DIGITAL_PROJECTOR,
        FIELD_MAX_DIGITAL_AR,
        FIELD_FILM_PROJECTOR,
        FIELD_HEIGHT,
        FIELD_WIDTH,
        FIELD_COMMERCIAL,
    ]);
    columns
}

/// 集計値
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub countries: usize,
    pub cities: usize,
    pub projectors: usize,
}

impl Summary {
    /// 国・都市は空値も1種類として数え、プロジェクターは空値を除く
    pub fn of(theatres: &[&Theatre]) -> Self {
        let distinct = |pick: fn(&Theatre) -> &str, skip_empty: bool| {
            theatres
                .iter()
                .map(|t| pick(*t))
                .filter(|v| !(skip_empty && v.is_empty()))
                .collect::<HashSet<_>>()
                .len()
        };
        Self {
            total: theatres.len(),
            countries: distinct(Theatre::country, false),
            cities: distinct(Theatre::city, false),
            projectors: distinct(Theatre::digital_projector, true),
        }
    }
}

/// 1行分の表示セル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub cells: Vec<String>,
}

/// テーブル表示モデル
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub headers: Vec<&'static str>,
    pub rows: Vec<DisplayRow>,
    pub summary: Summary,
}

impl TableView {
    /// 絞り込み順のまま表示行を作る（並べ替えはしない）
    pub fn build(theatres: &[&Theatre], unit: Unit, show_region: bool) -> Self {
        let headers = columns(show_region);
        let rows = theatres
            .iter()
            .map(|theatre| DisplayRow {
                cells: headers
                    .iter()
                    .map(|&column| {
                        let value = theatre.get_or_empty(column);
                        if column == FIELD_HEIGHT || column == FIELD_WIDTH {
                            convert_dimension(value, unit)
                        } else {
                            value.to_string()
                        }
                    })
                    .collect(),
            })
            .collect();

        Self {
            headers,
            rows,
            summary: Summary::of(theatres),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
