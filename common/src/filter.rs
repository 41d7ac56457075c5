//! フィルタエンジン
//!
//! - FilterState: 選択状態（カスケードの上位を変えると下位は解除）
//! - FilterEngine: 選択肢の導出と、全述語のAND による絞り込み
//!
//! どちらもストアと選択状態の純関数で、UI側は結果を描画するだけ。

use crate::error::Error;
use crate::store::Scope;
use crate::types::{
    Region, Theatre, FIELD_ASPECT_RATIO, FIELD_FILM_PROJECTOR, FIELD_HEIGHT,
};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// 地域フィルタ（「すべての地域」も選択済みとして扱う）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionFilter {
    All,
    Only(Region),
}

impl RegionFilter {
    pub const ALL_VALUE: &'static str = "all";

    pub fn matches(&self, theatre: &Theatre) -> bool {
        match self {
            RegionFilter::All => true,
            RegionFilter::Only(region) => theatre.region() == region.as_str(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RegionFilter::All => "All Regions",
            RegionFilter::Only(region) => region.as_str(),
        }
    }
}

impl FromStr for RegionFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(Self::ALL_VALUE) {
            Ok(RegionFilter::All)
        } else {
            s.parse().map(RegionFilter::Only)
        }
    }
}

/// スクリーンサイズ区分（Heightの先頭数値で判定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenSize {
    Large,
    Standard,
    Small,
}

impl ScreenSize {
    pub const ALL: [ScreenSize; 3] = [ScreenSize::Large, ScreenSize::Standard, ScreenSize::Small];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenSize::Large => "large",
            ScreenSize::Standard => "standard",
            ScreenSize::Small => "small",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScreenSize::Large => "Large (> 20 m)",
            ScreenSize::Standard => "Standard (15-20 m)",
            ScreenSize::Small => "Small (< 15 m)",
        }
    }

    /// 数値化できない・ゼロの高さはどの区分にも入らない
    pub fn matches(&self, theatre: &Theatre) -> bool {
        let height = match theatre.get(FIELD_HEIGHT).and_then(parse_leading_number) {
            Some(h) if h != 0.0 => h,
            _ => return false,
        };
        match self {
            ScreenSize::Large => height > 20.0,
            ScreenSize::Standard => (15.0..=20.0).contains(&height),
            ScreenSize::Small => height < 15.0,
        }
    }
}

/// アスペクト比区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AspectRatioBucket {
    TrueImax,
    ImaxDigital,
    Dome,
}

impl AspectRatioBucket {
    pub const ALL: [AspectRatioBucket; 3] = [
        AspectRatioBucket::TrueImax,
        AspectRatioBucket::ImaxDigital,
        AspectRatioBucket::Dome,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatioBucket::TrueImax => "true-imax",
            AspectRatioBucket::ImaxDigital => "imax-digital",
            AspectRatioBucket::Dome => "dome",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AspectRatioBucket::TrueImax => "True IMAX (1.43:1)",
            AspectRatioBucket::ImaxDigital => "IMAX Digital (1.90:1)",
            AspectRatioBucket::Dome => "Dome",
        }
    }

    pub fn matches(&self, theatre: &Theatre) -> bool {
        let ratio = match theatre.get(FIELD_ASPECT_RATIO) {
            Some(r) if !r.is_empty() => r,
            _ => return false,
        };
        match self {
            AspectRatioBucket::TrueImax => ratio.contains("1.43:1"),
            AspectRatioBucket::ImaxDigital => ratio.contains("1.90:1"),
            AspectRatioBucket::Dome => ratio.to_lowercase().contains("dome"),
        }
    }
}

/// フィルム上映可否
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilmCapability {
    FilmCapable,
    DigitalOnly,
}

impl FilmCapability {
    pub const ALL: [FilmCapability; 2] = [FilmCapability::FilmCapable, FilmCapability::DigitalOnly];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilmCapability::FilmCapable => "film-capable",
            FilmCapability::DigitalOnly => "digital-only",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilmCapability::FilmCapable => "Film Capable",
            FilmCapability::DigitalOnly => "Digital Only",
        }
    }

    pub fn matches(&self, theatre: &Theatre) -> bool {
        let film = match theatre.get(FIELD_FILM_PROJECTOR) {
            Some(f) if !f.is_empty() => f,
            _ => return false,
        };
        let no_film = film == "No" || film == "N/A";
        match self {
            FilmCapability::FilmCapable => !no_film,
            FilmCapability::DigitalOnly => no_film,
        }
    }
}

macro_rules! bucket_parse_display {
    ($ty:ident, $what:literal) => {
        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|b| b.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| Error::Config(format!("unknown {}: {}", $what, s)))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

bucket_parse_display!(ScreenSize, "screen size");
bucket_parse_display!(AspectRatioBucket, "aspect ratio");
bucket_parse_display!(FilmCapability, "film capability");

/// 文字列先頭の数値部分を読む（"18.29 m" → 18.29、"abc" → None）
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in text.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    text[..end].trim_end_matches('.').parse().ok()
}

/// フィルタ選択状態
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    region: Option<RegionFilter>,
    country: Option<String>,
    admin_division: Option<String>,
    city: Option<String>,
    projector: Option<String>,
    search: Option<String>,
    screen_size: Option<ScreenSize>,
    aspect_ratio: Option<AspectRatioBucket>,
    film: Option<FilmCapability>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn region(&self) -> Option<RegionFilter> {
        self.region
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn admin_division(&self) -> Option<&str> {
        self.admin_division.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn projector(&self) -> Option<&str> {
        self.projector.as_deref()
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn screen_size(&self) -> Option<ScreenSize> {
        self.screen_size
    }

    pub fn aspect_ratio(&self) -> Option<AspectRatioBucket> {
        self.aspect_ratio
    }

    pub fn film(&self) -> Option<FilmCapability> {
        self.film
    }

    /// 地域を変更（国・行政区分・都市は解除）
    pub fn set_region(&mut self, region: Option<RegionFilter>) {
        self.region = region;
        self.country = None;
        self.admin_division = None;
        self.city = None;
    }

    /// 国を変更（行政区分・都市は解除）
    pub fn set_country(&mut self, country: Option<String>) {
        self.country = non_empty(country);
        self.admin_division = None;
        self.city = None;
    }

    /// 行政区分を変更（都市は解除）
    pub fn set_admin_division(&mut self, admin_division: Option<String>) {
        self.admin_division = non_empty(admin_division);
        self.city = None;
    }

    pub fn set_city(&mut self, city: Option<String>) {
        self.city = non_empty(city);
    }

    pub fn set_projector(&mut self, projector: Option<String>) {
        self.projector = non_empty(projector);
    }

    pub fn set_search(&mut self, search: Option<String>) {
        self.search = non_empty(search);
    }

    pub fn set_screen_size(&mut self, size: Option<ScreenSize>) {
        self.screen_size = size;
    }

    pub fn set_aspect_ratio(&mut self, ratio: Option<AspectRatioBucket>) {
        self.aspect_ratio = ratio;
    }

    pub fn set_film(&mut self, film: Option<FilmCapability>) {
        self.film = film;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// どのフィルタも未設定か
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// カスケード（地域→国→行政区分→都市）のみで判定
    fn matches_cascade(&self, theatre: &Theatre, depth: usize) -> bool {
        let region = depth < 1 || self.region.map_or(true, |r| r.matches(theatre));
        let country = depth < 2 || self.country.as_deref().map_or(true, |c| theatre.country() == c);
        let admin = depth < 3 || self.admin_division.as_deref().map_or(true, |a| theatre.admin_division() == a);
        region && country && admin
    }

    /// 設定済みの全述語のAND
    pub fn matches(&self, theatre: &Theatre) -> bool {
        self.matches_cascade(theatre, 3)
            && self.city.as_deref().map_or(true, |c| theatre.city() == c)
            && self.projector.as_deref().map_or(true, |p| theatre.digital_projector() == p)
            && self.search.as_deref().map_or(true, |s| matches_search(theatre, s))
            && self.screen_size.map_or(true, |b| b.matches(theatre))
            && self.aspect_ratio.map_or(true, |b| b.matches(theatre))
            && self.film.map_or(true, |b| b.matches(theatre))
    }
}

/// いずれかの値に大文字小文字を無視して部分一致するか
pub fn matches_search(theatre: &Theatre, term: &str) -> bool {
    let term = term.to_lowercase();
    theatre
        .values()
        .any(|value| !value.is_empty() && value.to_lowercase().contains(&term))
}

/// 各カスケード段の選択肢
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceSets {
    pub regions: Vec<Region>,
    pub countries: Vec<String>,
    pub admin_divisions: Vec<String>,
    pub cities: Vec<String>,
    pub projectors: Vec<String>,
}

/// 重複なし・空値除外・ソート済みの値一覧
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// ストア上のフィルタエンジン
#[derive(Debug, Clone, Copy)]
pub struct FilterEngine<'a> {
    theatres: &'a [Theatre],
    scope: Scope,
}

impl<'a> FilterEngine<'a> {
    pub fn new(theatres: &'a [Theatre], scope: Scope) -> Self {
        Self { theatres, scope }
    }

    /// 上位カスケードの選択のみを満たすレコードから選択肢を導出
    ///
    /// 全世界表示で地域未選択の間は、国・行政区分・都市は空。
    pub fn choices(&self, state: &FilterState) -> ChoiceSets {
        let mut regions: Vec<Region> = self
            .theatres
            .iter()
            .filter_map(|t| t.region().parse().ok())
            .collect::<BTreeSet<Region>>()
            .into_iter()
            .collect();
        regions.sort_by_key(|r| r.as_str());

        let projectors = distinct(self.theatres.iter().map(Theatre::digital_projector));

        if self.scope.is_global() && state.region().is_none() {
            return ChoiceSets {
                regions,
                projectors,
                ..ChoiceSets::default()
            };
        }

        let level = |depth: usize, pick: fn(&Theatre) -> &str| {
            distinct(
                self.theatres
                    .iter()
                    .filter(|t| state.matches_cascade(t, depth))
                    .map(pick),
            )
        };

        ChoiceSets {
            regions,
            countries: level(1, Theatre::country),
            admin_divisions: level(2, Theatre::admin_division),
            cities: level(3, Theatre::city),
            projectors,
        }
    }

    /// 絞り込み結果（ストア順）
    ///
    /// 全世界表示でフィルタ未設定なら空、地域表示なら全件。
    pub fn apply(&self, state: &FilterState) -> Vec<&'a Theatre> {
        if self.scope.is_global() && state.is_empty() {
            return Vec::new();
        }
        self.theatres.iter().filter(|t| state.matches(t)).collect()
    }
}
