//! 静的ページの寸法テーブル（`table.imax-dimensions`）の単位切替
//!
//! 幅・高さセルをメートル表記と `F' I"` 表記で切り替える。データベース本体とは状態を共有しない。

use imax_theatre_common::units::TableCells;
use imax_theatre_common::TableUnitConverter;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

const TABLE_SELECTOR: &str = "table.imax-dimensions";
const BUTTON_ID: &str = "unit-toggle";

fn elements(root: &JsValue, selector: &str) -> Vec<Element> {
    let list = if let Some(document) = root.dyn_ref::<Document>() {
        document.query_selector_all(selector)
    } else if let Some(element) = root.dyn_ref::<Element>() {
        element.query_selector_all(selector)
    } else {
        return Vec::new();
    };

    let Ok(list) = list else { return Vec::new() };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// テーブル → 行 → セルのDOM要素
fn table_elements(document: &Document) -> Vec<Vec<Vec<Element>>> {
    elements(document.as_ref(), TABLE_SELECTOR)
        .iter()
        .map(|table| {
            elements(table.as_ref(), "tr")
                .iter()
                .map(|row| elements(row.as_ref(), "th, td"))
                .collect()
        })
        .collect()
}

fn read_cells(tables: &[Vec<Vec<Element>>]) -> Vec<TableCells> {
    tables
        .iter()
        .map(|rows| {
            rows.iter()
                .map(|cells| cells.iter().map(|c| c.text_content().unwrap_or_default()).collect())
                .collect()
        })
        .collect()
}

fn write_cells(tables: &[Vec<Vec<Element>>], values: &[TableCells]) {
    for (rows, value_rows) in tables.iter().zip(values) {
        for (cells, value_cells) in rows.iter().zip(value_rows) {
            for (cell, value) in cells.iter().zip(value_cells) {
                if cell.text_content().as_deref() != Some(value.as_str()) {
                    cell.set_text_content(Some(value));
                }
            }
        }
    }
}

/// 切替ボタンにハンドラを付ける（ボタンかテーブルがなければ何もしない）
pub fn attach() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(button) = document.get_element_by_id(BUTTON_ID) else {
        return;
    };
    if table_elements(&document).is_empty() {
        return;
    }

    let converter = Rc::new(RefCell::new(TableUnitConverter::default()));
    button.set_text_content(Some(converter.borrow().button_label()));

    let target = button.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
        let tables = table_elements(&document);
        let mut values = read_cells(&tables);
        let label = converter.borrow_mut().toggle(&mut values);
        write_cells(&tables, &values);
        target.set_text_content(Some(label));
    }) as Box<dyn FnMut(_)>);

    if let Err(e) = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref()) {
        gloo::console::error!(format!("unit toggle: {:?}", e));
    }
    closure.forget();
}
