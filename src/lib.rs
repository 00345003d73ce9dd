//! OmniVault — 持ち物カタログAI解析・在庫管理ツール
//!
//! コアは「検出レスポンス → 検証済みカタログレコード」の
//! 正規化パイプライン（前処理・正規化・重複判定・全置換ストア）。
//! 共有ロジックは omnivault_common 側にある。

pub mod ai_provider;
pub mod assistant;
pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod preprocess;
pub mod review;
pub mod scanner;
pub mod search;
pub mod store;
pub mod vault;
