//! 劇場テーブル

use imax_theatre_common::{TableView, NO_RESULTS_MESSAGE};
use leptos::prelude::*;

#[component]
pub fn TheatreTable(table: Memo<TableView>) -> impl IntoView {
    let headers = move || {
        table
            .with(|t| t.headers.clone())
            .into_iter()
            .map(|header| view! { <th>{header}</th> })
            .collect_view()
    };

    let body = move || {
        let view = table.get();
        if view.is_empty() {
            let colspan = view.headers.len().to_string();
            return view! {
                <tr>
                    <td class="no-results" colspan=colspan>{NO_RESULTS_MESSAGE}</td>
                </tr>
            }
            .into_any();
        }

        view.rows
            .into_iter()
            .map(|row| {
                let cells = row.cells.into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view();
                view! { <tr>{cells}</tr> }
            })
            .collect_view()
            .into_any()
    };

    view! {
        <div class="table-container">
            <table class="theatre-table">
                <thead>
                    <tr>{headers}</tr>
                </thead>
                <tbody>{body}</tbody>
            </table>
        </div>
    }
}
