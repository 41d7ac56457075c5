//! IMAXシアターデータベース CLI ライブラリ
//!
//! 共通ライブラリ（imax-theatre-common）に、ローカル/HTTPのソース取得・
//! 設定・端末表示・データ検証・単位変換ツールを足したもの。

pub mod browse;
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod fetch;
pub mod table;
pub mod validator;
