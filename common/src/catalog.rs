//! ソースカタログ
//!
//! 国別CSVファイルと、その地域・国名・行政区分列の対応表。
//! 起動時に固定され、以後変更されない。

use crate::error::{Error, Result};
use crate::store::Scope;
use crate::types::Region;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 行政区分の列指定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AdminDivisionColumn {
    /// 指定列（空なら優先順リストへフォールバック）
    Named(String),
    /// 明示的に「なし」（常に空文字）
    Absent,
    /// 未指定（優先順リストで探索）
    #[default]
    Lookup,
}

impl AdminDivisionColumn {
    pub fn named(column: impl Into<String>) -> Self {
        Self::Named(column.into())
    }

    fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup)
    }
}

/// JSONでは `"State"` / `null` / キー省略 の3通り
mod admin_column_serde {
    use super::*;

    pub fn serialize<S: Serializer>(value: &AdminDivisionColumn, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match value {
            AdminDivisionColumn::Named(name) => serializer.serialize_str(name),
            _ => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<AdminDivisionColumn, D::Error> {
        let value: Option<String> = Option::deserialize(deserializer)?;
        Ok(match value {
            Some(name) => AdminDivisionColumn::Named(name),
            None => AdminDivisionColumn::Absent,
        })
    }
}

/// 1ファイル分のソース設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    /// データディレクトリからの相対パス
    #[serde(alias = "filename")]
    pub path: String,
    pub region: Region,
    pub country: String,
    #[serde(
        default,
        rename = "adminDivisionColumn",
        with = "admin_column_serde",
        skip_serializing_if = "AdminDivisionColumn::is_lookup"
    )]
    pub admin_division: AdminDivisionColumn,
}

impl SourceDescriptor {
    pub fn new(
        path: impl Into<String>,
        region: Region,
        country: impl Into<String>,
        admin_division: AdminDivisionColumn,
    ) -> Self {
        Self {
            path: path.into(),
            region,
            country: country.into(),
            admin_division,
        }
    }
}

/// スコープに属するソースを設定順のまま返す
pub fn for_scope(descriptors: &[SourceDescriptor], scope: Scope) -> Vec<&SourceDescriptor> {
    match scope.region() {
        Some(region) => descriptors.iter().filter(|d| d.region == region).collect(),
        None => descriptors.iter().collect(),
    }
}

/// JSON配列からカタログを読み込み
pub fn from_json(json: &str) -> Result<Vec<SourceDescriptor>> {
    let descriptors: Vec<SourceDescriptor> = serde_json::from_str(json)?;
    if let Some(bad) = descriptors.iter().find(|d| d.country.trim().is_empty()) {
        return Err(Error::Config(format!("source {} has an empty country", bad.path)));
    }
    Ok(descriptors)
}

/// 組み込みカタログ
pub fn default_catalog() -> Vec<SourceDescriptor> {
    use AdminDivisionColumn::Absent;
    use Region::*;

    let col = |name: &str| AdminDivisionColumn::named(name);
    let entries: Vec<(&str, Region, &str, AdminDivisionColumn)> = vec![
        // Americas
        ("americas/aruba.csv", Americas, "Aruba", col("Region")),
        ("americas/bahamas.csv", Americas, "Bahamas", col("Region")),
        ("americas/brazil.csv", Americas, "Brazil", col("State")),
        ("americas/canada.csv", Americas, "Canada", col("Province")),
        ("americas/colombia.csv", Americas, "Colombia", col("Region")),
        ("americas/curacao.csv", Americas, "Curaçao", col("Region")),
        ("americas/ecuador.csv", Americas, "Ecuador", col("Region")),
        ("americas/mexico.csv", Americas, "Mexico", col("State")),
        ("americas/peru.csv", Americas, "Peru", col("Region")),
        ("americas/unitedstates.csv", Americas, "United States", col("State")),
        // Asia
        ("asia/bahrain.csv", Asia, "Bahrain", col("Region")),
        ("asia/china.csv", Asia, "China", col("Province")),
        ("asia/hongkong.csv", Asia, "Hong Kong", col("Region")),
        ("asia/india.csv", Asia, "India", col("State")),
        ("asia/indonesia.csv", Asia, "Indonesia", col("Province")),
        ("asia/japan.csv", Asia, "Japan", col("Province")),
        ("asia/kuwait.csv", Asia, "Kuwait", col("Region")),
        ("asia/malaysia.csv", Asia, "Malaysia", col("State")),
        ("asia/oman.csv", Asia, "Oman", col("Region")),
        ("asia/philippines.csv", Asia, "Philippines", col("Region")),
        ("asia/qatar.csv", Asia, "Qatar", col("Region")),
        ("asia/saudiarabia.csv", Asia, "Saudi Arabia", col("Region")),
        ("asia/singapore.csv", Asia, "Singapore", col("Region")),
        ("asia/southkorea.csv", Asia, "South Korea", col("Province")),
        ("asia/taiwan.csv", Asia, "Taiwan", col("Province")),
        ("asia/thailand.csv", Asia, "Thailand", col("Region")),
        ("asia/unitedarabemirates.csv", Asia, "United Arab Emirates", col("Province")),
        ("asia/vietnam.csv", Asia, "Vietnam", col("Region")),
        // Europe
        ("europe/austria.csv", Europe, "Austria", col("State")),
        ("europe/belgium.csv", Europe, "Belgium", col("Region")),
        ("europe/czechia.csv", Europe, "Czechia", col("Region")),
        ("europe/finland.csv", Europe, "Finland", col("Region")),
        ("europe/france.csv", Europe, "France", col("Region")),
        ("europe/germany.csv", Europe, "Germany", Absent),
        ("europe/italy.csv", Europe, "Italy", col("Region")),
        ("europe/latvia.csv", Europe, "Latvia", col("Region")),
        ("europe/luxembourg.csv", Europe, "Luxembourg", col("Region")),
        ("europe/netherlands.csv", Europe, "Netherlands", col("Province")),
        ("europe/norway.csv", Europe, "Norway", col("Region")),
        ("europe/poland.csv", Europe, "Poland", col("Region")),
        ("europe/portugal.csv", Europe, "Portugal", col("Region")),
        ("europe/serbia.csv", Europe, "Serbia", col("Region")),
        ("europe/spain.csv", Europe, "Spain", col("Region")),
        ("europe/sweden.csv", Europe, "Sweden", col("Region")),
        ("europe/switzerland.csv", Europe, "Switzerland", Absent),
        ("europe/ukraine.csv", Europe, "Ukraine", col("Region")),
        ("europe/unitedkingdom.csv", Europe, "United Kingdom", col("Country")),
        // Africa
        ("africa/morocco.csv", Africa, "Morocco", col("Region")),
        ("africa/southafrica.csv", Africa, "South Africa", col("Province")),
        // Oceania
        ("oceania/australia.csv", Oceania, "Australia", col("State")),
        ("oceania/newzealand.csv", Oceania, "New Zealand", col("Region")),
    ];

    entries
        .into_iter()
        .map(|(path, region, country, admin)| SourceDescriptor::new(path, region, country, admin))
        .collect()
}
