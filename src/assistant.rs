//! 在庫アシスタントモジュール
//!
//! チャットと購入相談。どちらもカタログの読み取り専用消費者で、
//! AIの自由文回答はそのまま表示する（構造化パースは行わない）。

use std::path::Path;

use omnivault_common::{build_advice_prompt, build_chat_prompt, InventoryItem};

use crate::ai_provider::AiProvider;
use crate::config::Config;
use crate::detector;
use crate::error::Result;
use crate::preprocess;

/// 在庫についての質問に答える
pub async fn chat(
    query: &str,
    items: &[InventoryItem],
    provider: AiProvider,
    config: &Config,
    verbose: bool,
) -> Result<String> {
    let prompt = build_chat_prompt(query, items).replace('\n', " ");
    detector::run_provider_cli(provider, &prompt, config.timeout_seconds, verbose).await
}

/// 店頭写真から「買うべき？」を相談する
///
/// 写真は在庫写真と同じ前処理（縮小・再圧縮）を通してから渡す。
pub async fn shopping_advice(
    photo: &Path,
    items: &[InventoryItem],
    provider: AiProvider,
    config: &Config,
    verbose: bool,
) -> Result<String> {
    let prepared = preprocess::prepare(photo, &config.prepare_options())?;
    let image_path = detector::stage_image(&prepared, "advisor.jpg")?;

    let raw_prompt = format!(
        "Read the image file at {} first.\n\n{}",
        image_path.display(),
        build_advice_prompt(items)
    );
    let prompt = raw_prompt.replace('\n', " ");

    detector::run_provider_cli(provider, &prompt, config.timeout_seconds, verbose).await
}
