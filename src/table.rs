//! 端末向けテーブル表示

use imax_theatre_common::{Summary, TableView, NO_RESULTS_MESSAGE};

/// 1セルの最大表示幅
const MAX_CELL_WIDTH: usize = 32;

fn display_width(text: &str) -> usize {
    text.chars().count()
}

fn fit(text: &str, width: usize) -> String {
    let len = display_width(text);
    if len > width {
        let truncated: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// 表示モデルを文字列化（結果なしはメッセージのみ、集計は出さない）
pub fn render(view: &TableView) -> String {
    if view.is_empty() {
        return format!("{}\n", NO_RESULTS_MESSAGE);
    }

    let widths: Vec<usize> = view
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            view.rows
                .iter()
                .map(|row| row.cells.get(i).map_or(0, |c| display_width(c)))
                .chain(std::iter::once(display_width(header)))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| fit(cell, width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str(&line(view.headers.clone()));
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in &view.rows {
        out.push_str(&line(row.cells.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&render_summary(&view.summary));
    out
}

pub fn render_summary(summary: &Summary) -> String {
    format!(
        "劇場数: {}  国/地域: {}  都市: {}  プロジェクター種別: {}\n",
        summary.total, summary.countries, summary.cities, summary.projectors
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use imax_theatre_common::{Theatre, Unit};

    #[test]
    fn test_render_empty_view() {
        let view = TableView::build(&[], Unit::Metric, false);
        assert_eq!(render(&view), format!("{}\n", NO_RESULTS_MESSAGE));
    }

    #[test]
    fn test_render_truncates_long_cells() {
        let name = "Kinepolis Brussels IMAX Laser Auditorium 9";
        let theatre = Theatre::from_pairs([
            ("Country", "Belgium"),
            ("City", "Brussels"),
            ("Location Name", name),
            ("Height", "18 m"),
        ]);
        let output = render(&TableView::build(&[&theatre], Unit::Metric, false));

        let expected: String = name.chars().take(MAX_CELL_WIDTH - 1).collect();
        assert!(output.contains(&format!("{}…", expected)));
        assert!(!output.contains(name));
        assert!(output.contains("劇場数: 1"));
    }

    #[test]
    fn test_fit_pads_short_text() {
        assert_eq!(fit("Oslo", 6), "Oslo  ");
        assert_eq!(fit("Montréal", 5), "Mont…");
    }
}
