//! URLパラメータ処理
//!
//! - クエリ文字列のパース・再構築
//! - country / state(province) / city による初期選択
//! - 旧URL（/regions/<地域>、database.html?region=）からの転送先計算

use crate::types::Region;

/// クエリ文字列（出現順を保持）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// "?a=1&b=2" / "a=1&b=2" のどちらも受け付ける
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = query
            .split('&')
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((key, value)) => (decode_component(key), decode_component(value)),
                None => (decode_component(part), String::new()),
            })
            .collect();
        Self { pairs }
    }

    /// 最初に現れた値
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// 空値を未指定として扱う
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn remove(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// 先頭の "?" なしで再構築
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// %XX と "+" をデコード（不正なエスケープはそのまま残す）
fn decode_component(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let digits = &bytes[i + 1..i + 3];
                let hex = digits
                    .iter()
                    .all(u8::is_ascii_hexdigit)
                    .then(|| std::str::from_utf8(digits).ok())
                    .flatten();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                        continue;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// application/x-www-form-urlencoded 形式でエンコード
fn encode_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'*' | b'-' | b'.' | b'_' => out.push(byte as char),
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// 国名パラメータを表示名に変換
pub fn canonical_country_name(raw: &str) -> String {
    match raw.to_lowercase().as_str() {
        "canada" => return "Canada".to_string(),
        "unitedstates" => return "United States".to_string(),
        "unitedkingdom" => return "United Kingdom".to_string(),
        _ => {}
    }

    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 選択肢から大文字小文字を無視して探す（完全一致 → 部分一致の順）
pub fn match_option<'a, S: AsRef<str>>(options: &'a [S], wanted: &str) -> Option<&'a str> {
    let wanted = wanted.to_lowercase();
    let lowered: Vec<String> = options.iter().map(|o| o.as_ref().to_lowercase()).collect();

    lowered
        .iter()
        .position(|o| *o == wanted)
        .or_else(|| lowered.iter().position(|o| o.contains(&wanted)))
        .map(|index| options[index].as_ref())
}

/// URLによる初期選択
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preselection {
    /// 表示名に変換済みの国名
    pub country: Option<String>,
    pub admin_division: Option<String>,
    pub city: Option<String>,
}

impl Preselection {
    pub fn from_query(params: &QueryParams) -> Self {
        Self {
            country: params.get_non_empty("country").map(canonical_country_name),
            admin_division: params
                .get_non_empty("state")
                .or_else(|| params.get_non_empty("province"))
                .map(str::to_string),
            city: params.get_non_empty("city").map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.admin_division.is_none() && self.city.is_none()
    }
}

/// URLを (パス, "?クエリ", "#フラグメント") に分解（スキーム・ホストは捨てる）
pub fn split_url(url: &str) -> (&str, &str, &str) {
    let rest = match url.find("://") {
        Some(index) => {
            let after = &url[index + 3..];
            after.find(['/', '?', '#']).map_or("", |i| &after[i..])
        }
        None => url,
    };

    let (before_fragment, fragment) = match rest.find('#') {
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    };
    let (path, query) = match before_fragment.find('?') {
        Some(i) => before_fragment.split_at(i),
        None => (before_fragment, ""),
    };
    (path, query, fragment)
}

fn region_from_slug(slug: &str) -> Option<Region> {
    Region::ALL
        .iter()
        .copied()
        .find(|r| r.slug().eq_ignore_ascii_case(slug))
}

/// 旧URLの転送先
///
/// `query` / `fragment` は "?..." / "#..." を含む形（空文字可）。
/// 転送不要・未知の地域なら None。
pub fn legacy_redirect(path: &str, query: &str, fragment: &str) -> Option<String> {
    if let Some(index) = path.find("/regions/") {
        let rest = &path[index + "/regions/".len()..];
        let segment = rest.split('/').next().unwrap_or_default();
        if let Some(region) = region_from_slug(segment) {
            return Some(format!("/{}.html{}{}", region.slug(), query, fragment));
        }
    }

    if path.ends_with("database.html") {
        let mut params = QueryParams::parse(query);
        if let Some(region) = params.get_non_empty("region").and_then(region_from_slug) {
            params.remove("region");
            let directory = &path[..path.rfind('/').map(|i| i + 1).unwrap_or(0)];
            let remaining = params.to_query_string();
            let search = if remaining.is_empty() {
                String::new()
            } else {
                format!("?{}", remaining)
            };
            return Some(format!("{}{}.html{}", directory, region.slug(), search));
        }
    }

    None
}
