//! 対話レビューモジュール
//!
//! 検出バッチを1件ずつ提示し、確定前の編集・除去を受け付ける。
//! 編集・除去はフローの状態機械を通す。

use dialoguer::Input;

use omnivault_common::{normalize_category, PendingItem};

use crate::error::{OmniVaultError, Result};
use crate::vault::flow::AddFlow;

/// レビューの結果
pub enum ReviewOutcome {
    /// 確定（保存するバッチ）
    Save(Vec<PendingItem>),
    /// 全破棄（カタログは変更しない）
    Discard,
}

enum ReviewAction {
    Keep,
    Edit,
    Remove,
    AcceptRest,
    Quit,
}

/// バッチを対話的にレビューする
///
/// 操作: Enter=採用 e=編集 d=除外 a=残り全部採用 q=全部破棄
pub fn run_review(flow: &mut AddFlow) -> Result<ReviewOutcome> {
    println!("\n📋 検出結果のレビュー（{}件）", flow.batch().len());

    let mut index = 0;
    let mut accept_rest = false;

    while index < flow.batch().len() {
        print_item(index, flow.batch().len(), &flow.batch()[index]);

        if accept_rest {
            index += 1;
            continue;
        }

        match prompt_review_action()? {
            ReviewAction::Keep => index += 1,
            ReviewAction::Edit => {
                let edited = edit_item(flow.batch()[index].clone())?;
                flow.update_item(index, edited)?;
                index += 1;
            }
            ReviewAction::Remove => {
                flow.remove_item(index)?;
                println!("  → 除外\n");
                // indexはそのまま（次のアイテムが詰まってくる）
            }
            ReviewAction::AcceptRest => {
                accept_rest = true;
                index += 1;
            }
            ReviewAction::Quit => {
                flow.discard();
                return Ok(ReviewOutcome::Discard);
            }
        }

        if flow.batch().is_empty() {
            // 最後の1件を除外したらフローはIdleへ収束している
            return Ok(ReviewOutcome::Discard);
        }
    }

    Ok(ReviewOutcome::Save(flow.begin_saving()?))
}

fn print_item(index: usize, total: usize, item: &PendingItem) {
    println!("\n[{}/{}] {}", index + 1, total, item.name);
    println!("  カテゴリ: {} / 保管場所: {}", item.category, item.storage_location);
    if !item.brand.is_empty() {
        println!("  ブランド: {}", item.brand);
    }
    if item.price > 0.0 {
        println!("  推定価格: ${:.2}", item.price);
    }
    if !item.description.is_empty() {
        println!("  説明: {}", item.description);
    }
}

fn prompt_review_action() -> Result<ReviewAction> {
    let input: String = Input::new()
        .with_prompt("操作 (Enter:採用 e:編集 d:除外 a:残り全部採用 q:全部破棄)")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| OmniVaultError::CliExecution(e.to_string()))?;

    match input.trim() {
        "" | "k" => Ok(ReviewAction::Keep),
        "e" | "E" => Ok(ReviewAction::Edit),
        "d" | "D" => Ok(ReviewAction::Remove),
        "a" | "A" => Ok(ReviewAction::AcceptRest),
        "q" | "Q" => Ok(ReviewAction::Quit),
        _ => Ok(ReviewAction::Keep),
    }
}

/// 1件を編集する。空入力は現在値を維持
fn edit_item(mut item: PendingItem) -> Result<PendingItem> {
    item.name = prompt_field("名前", &item.name)?;
    item.brand = prompt_field("ブランド", &item.brand)?;

    let category_input = prompt_field("カテゴリ", item.category.as_str())?;
    item.category = normalize_category(&category_input);

    item.storage_location = prompt_field("保管場所", &item.storage_location)?;

    let price_input = prompt_field("推定価格", &format!("{}", item.price))?;
    item.price = price_input.parse().unwrap_or(item.price).max(0.0);

    item.description = prompt_field("説明", &item.description)?;
    Ok(item)
}

fn prompt_field(label: &str, current: &str) -> Result<String> {
    let input: String = Input::new()
        .with_prompt(format!("  {} [{}]", label, current))
        .allow_empty(true)
        .interact_text()
        .map_err(|e| OmniVaultError::CliExecution(e.to_string()))?;

    let trimmed = input.trim();
    Ok(if trimmed.is_empty() {
        current.to_string()
    } else {
        trimmed.to_string()
    })
}
