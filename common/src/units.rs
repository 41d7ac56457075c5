//! 寸法表記の単位変換
//!
//! - TableUnitConverter: 静的テーブルの幅・高さセルをフィート・インチ表記と
//!   元の表記の間で切り替える（元の値を覚えておき、そのまま戻す）
//! - feet_inches_text: CSV変換用の "F ft I in" 表記

use crate::filter::parse_leading_number;
use crate::presentation::FEET_PER_METER;
use std::collections::HashMap;
use tracing::warn;

const METERS_PER_FOOT: f64 = 0.3048;

/// 1テーブル分のセル（先頭行はヘッダー）
pub type TableCells = Vec<Vec<String>>;

/// メートル → (フィート, インチ)
///
/// インチの丸めが12になった場合は次のフィートに繰り上げる。
pub fn meters_to_feet_inches(meters: f64) -> (i64, i64) {
    let total_feet = meters * FEET_PER_METER;
    let mut feet = total_feet.floor() as i64;
    let mut inches = ((total_feet - total_feet.floor()) * 12.0).round() as i64;
    if inches == 12 {
        feet += 1;
        inches = 0;
    }
    (feet, inches)
}

/// `F' I"` 表記
pub fn format_feet_inches(meters: f64) -> String {
    let (feet, inches) = meters_to_feet_inches(meters);
    format!("{}' {}\"", feet, inches)
}

/// CSV変換用の `F ft I in` 表記（インチは小数2桁に丸める）
pub fn feet_inches_text(meters: f64) -> String {
    let total_feet = meters / METERS_PER_FOOT;
    let feet = total_feet.trunc();
    let inches = ((total_feet - feet) * 12.0 * 100.0).round() / 100.0;
    format!("{} ft {:?} in", feet as i64, inches)
}

/// 表示中の単位系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableUnits {
    #[default]
    Metric,
    FeetInches,
}

/// 静的テーブル用の単位切替
#[derive(Debug, Clone)]
pub struct TableUnitConverter {
    width_column: usize,
    height_column: usize,
    units: TableUnits,
    /// (テーブル, 行, 列) → 元の表記
    originals: HashMap<(usize, usize, usize), String>,
}

impl Default for TableUnitConverter {
    fn default() -> Self {
        Self::new(6, 7)
    }
}

impl TableUnitConverter {
    /// 列番号は0始まり
    pub fn new(width_column: usize, height_column: usize) -> Self {
        Self {
            width_column,
            height_column,
            units: TableUnits::Metric,
            originals: HashMap::new(),
        }
    }

    pub fn units(&self) -> TableUnits {
        self.units
    }

    /// 切替ボタンの表示（次に切り替わる単位系）
    pub fn button_label(&self) -> &'static str {
        match self.units {
            TableUnits::Metric => "Imperial",
            TableUnits::FeetInches => "Metric",
        }
    }

    /// 切り替えて新しいボタン表示を返す
    pub fn toggle(&mut self, tables: &mut [TableCells]) -> &'static str {
        match self.units {
            TableUnits::Metric => self.convert(tables),
            TableUnits::FeetInches => self.revert(tables),
        }
        self.button_label()
    }

    /// ヘッダー行を除く各行の幅・高さを変換
    ///
    /// どちらかが数値でない行は変換しない。
    pub fn convert(&mut self, tables: &mut [TableCells]) {
        let (width_col, height_col) = (self.width_column, self.height_column);

        for (t, table) in tables.iter_mut().enumerate() {
            for (r, row) in table.iter_mut().enumerate().skip(1) {
                if row.len() <= width_col.max(height_col) {
                    continue;
                }
                for col in [width_col, height_col] {
                    self.originals.entry((t, r, col)).or_insert_with(|| row[col].clone());
                }

                let width = parse_leading_number(&self.originals[&(t, r, width_col)]);
                let height = parse_leading_number(&self.originals[&(t, r, height_col)]);
                match (width, height) {
                    (Some(width), Some(height)) => {
                        row[width_col] = format_feet_inches(width);
                        row[height_col] = format_feet_inches(height);
                    }
                    _ => warn!(table = t, row = r, "invalid number in table cell"),
                }
            }
        }
        self.units = TableUnits::FeetInches;
    }

    /// 記憶している元の値に戻す
    pub fn revert(&mut self, tables: &mut [TableCells]) {
        for (&(t, r, c), original) in &self.originals {
            if let Some(cell) = tables.get_mut(t).and_then(|table| table.get_mut(r)).and_then(|row| row.get_mut(c)) {
                cell.clone_from(original);
            }
        }
        self.units = TableUnits::Metric;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(width: &str, height: &str) -> Vec<String> {
        let mut cells: Vec<String> = (0..6).map(|i| format!("c{}", i)).collect();
        cells.push(width.to_string());
        cells.push(height.to_string());
        cells
    }

    fn table() -> TableCells {
        vec![row("Width", "Height"), row("22 m", "16.1 m"), row("n/a", "12 m")]
    }

    #[test]
    fn test_meters_to_feet_inches() {
        assert_eq!(meters_to_feet_inches(22.0), (72, 2));
        assert_eq!(meters_to_feet_inches(16.1), (52, 10));
        assert_eq!(meters_to_feet_inches(0.0), (0, 0));
        // 11.6インチ → 12 は繰り上げ
        assert_eq!(meters_to_feet_inches(3.0479), (10, 0));
        assert_eq!(format_feet_inches(22.0), "72' 2\"");
    }

    #[test]
    fn test_feet_inches_text() {
        assert_eq!(feet_inches_text(0.3048), "1 ft 0.0 in");
        assert_eq!(feet_inches_text(22.0), "72 ft 2.14 in");
    }

    #[test]
    fn test_convert_skips_header_and_invalid_rows() {
        let mut tables = vec![table()];
        let mut converter = TableUnitConverter::default();
        assert_eq!(converter.button_label(), "Imperial");

        let label = converter.toggle(&mut tables);
        assert_eq!(label, "Metric");
        assert_eq!(tables[0][0][6], "Width");
        assert_eq!(tables[0][1][6], "72' 2\"");
        assert_eq!(tables[0][1][7], "52' 10\"");
        assert_eq!(tables[0][2][7], "12 m");
    }

    #[test]
    fn test_revert_restores_originals() {
        let original = vec![table(), table()];
        let mut tables = original.clone();
        let mut converter = TableUnitConverter::default();

        converter.toggle(&mut tables);
        assert_ne!(tables, original);
        let label = converter.toggle(&mut tables);

        assert_eq!(label, "Imperial");
        assert_eq!(tables, original);
        assert_eq!(converter.units(), TableUnits::Metric);
    }

    #[test]
    fn test_custom_columns_and_short_rows() {
        let mut tables = vec![vec![
            vec!["W".to_string(), "H".to_string()],
            vec!["10 m".to_string(), "5 m".to_string()],
            vec!["short".to_string()],
        ]];
        let mut converter = TableUnitConverter::new(0, 1);
        converter.convert(&mut tables);

        assert_eq!(tables[0][1], vec!["32' 10\"", "16' 5\""]);
        assert_eq!(tables[0][2], vec!["short"]);
    }
}
