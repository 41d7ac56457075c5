//! IMAX Theatre Database Web App (Leptos + WASM)

mod app;
mod browser;
mod components;
mod fetch;
mod static_tables;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    // 旧URLなら転送してそれ以上何もしない
    if browser::redirect_legacy_url() {
        return;
    }

    static_tables::attach();
    leptos::mount::mount_to_body(app::App);
}
