//! プロンプト生成モジュール
//!
//! CLIと各フロントで共有されるプロンプト生成ロジック:
//! - build_detect_prompt: 写真解析（検出）用プロンプト
//! - build_advice_prompt: 購入相談用プロンプト
//! - build_chat_prompt: 在庫チャット用プロンプト

use crate::category::Category;
use crate::types::InventoryItem;

/// 検出プロンプト生成（写真解析用）
///
/// カテゴリは閉集合を明示し、JSON配列のみを出力させる。
/// box_2d（1000分率の位置）は任意フィールドとして要求する。
pub fn build_detect_prompt() -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"Analyze this photo of a storage box, shelf, or area. Identify all distinct items inside.

## Output format (output strictly this JSON array, nothing else)
[
  {{
    "name": "item name",
    "brand": "brand if visible",
    "color": "main color",
    "size": "size if determinable",
    "description": "short objective description",
    "category": "one of: {categories}",
    "price": 0,
    "storageLocation": "based on context of photo or box label",
    "datePurchased": "YYYY-MM-DD if determinable",
    "expiryDate": "YYYY-MM-DD if printed on the item",
    "box_2d": [top, left, bottom, right]
  }}
]

## Rules
- box_2d locates the item in the photo on a 0-1000 scale; omit it if unsure
- price is a numeric estimate in dollars; omit if unknown
- Omit any key you cannot determine
- Do not invent items; list only what is visible
- Output the JSON array only, no explanations"#
    )
}

/// 在庫サマリを生成（購入相談用）
///
/// "name by brand (Category) in location" 形式をカンマ区切りで並べる。
/// ブランドが空なら省略する。
pub fn summarize_inventory(items: &[InventoryItem]) -> String {
    items
        .iter()
        .map(|i| {
            if i.brand.is_empty() {
                format!("{} ({}) in {}", i.name, i.category, i.storage_location)
            } else {
                format!(
                    "{} by {} ({}) in {}",
                    i.name, i.brand, i.category, i.storage_location
                )
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// 購入相談プロンプト生成
///
/// 写真は別添（CLI側で渡す）。在庫サマリを埋め込み、
/// 自由文の回答をそのまま表示する前提。
pub fn build_advice_prompt(items: &[InventoryItem]) -> String {
    format!(
        "The user is considering buying the item in this photo. \
         Based on their current inventory: [{}], should they buy it? \
         If they have something similar, tell them where it is. \
         If it's a good addition, explain why. Keep it concise and helpful.",
        summarize_inventory(items)
    )
}

/// 在庫チャット用のコンテキストJSONを生成
fn chat_context(items: &[InventoryItem]) -> String {
    let entries: Vec<serde_json::Value> = items
        .iter()
        .map(|i| {
            serde_json::json!({
                "name": i.name,
                "location": i.storage_location,
                "cat": i.category.as_str(),
                "added": i.date_added,
            })
        })
        .collect();
    serde_json::Value::Array(entries).to_string()
}

/// 在庫チャットプロンプト生成
///
/// # Arguments
/// * `query` - ユーザーの質問（自由文）
/// * `items` - 現在のカタログ（読み取りのみ）
pub fn build_chat_prompt(query: &str, items: &[InventoryItem]) -> String {
    format!(
        "User Query: \"{}\"\n\nInventory Data: {}\n\n\
         You are a helpful home inventory assistant. Answer questions about \
         where things are, suggest what to declutter (oldest items), or find \
         items by description.",
        query,
        chat_context(items)
    )
}
