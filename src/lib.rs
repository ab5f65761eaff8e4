//! 評価シート取り込みツール
//!
//! シートの読み込み・DBアクセス・レポート出力を担当し、
//! 検証と重複検出のコアは `eval_import_common` に置く。

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod executor;
pub mod export;
pub mod pipeline;
pub mod progress;
pub mod reader;
pub mod resolver;
pub mod store;
