//! TerraLys CLI
//!
//! 葉画像のスキャン → 画像分類API → ラベル正規化 → 推奨事項 → JSON/Excel出力

pub mod analyzer;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod preprocess;
pub mod recommender;
pub mod scanner;
