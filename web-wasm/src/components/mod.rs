//! UIコンポーネント

pub mod export_button;
pub mod filter_panel;
pub mod header;
pub mod stats_panel;
pub mod status;
pub mod theatre_table;
pub mod unit_toggle;
