//! 在庫レコードの型定義
//!
//! CLIと各フロントで共有される型:
//! - RawDetection: AI検出の生データ（全フィールド欠落許容）
//! - PendingItem: レビュー中の候補レコード（ID未採番）
//! - InventoryItem: 確定済み在庫レコード（永続化の単位）

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// 正規化バウンディングボックス
///
/// 画像を1000分率で表した [top, left, bottom, right]。
/// 各値は [0, 1000) の範囲を想定するが、範囲外はクロップ側でクランプする。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self {
            top: v[0],
            left: v[1],
            bottom: v[2],
            right: v[3],
        }
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.top, b.left, b.bottom, b.right]
    }
}

/// AIが返す価格（数値または文字列のどちらも許容）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
}

/// AI検出の生データ
///
/// どのフィールドも欠落しうる。型付きカタログに入る前に
/// normalizer で必ず正規化する。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDetection {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,

    #[serde(alias = "estimatedPrice")]
    pub price: Option<RawPrice>,

    pub storage_location: Option<String>,
    pub date_purchased: Option<String>,
    pub expiry_date: Option<String>,

    /// 写真内の位置（あれば切り出しに使用）
    #[serde(rename = "box_2d")]
    pub box_2d: Option<BoundingBox>,
}

/// レビュー中の候補レコード
///
/// 確定前なのでIDを持たない。レビュー中は自由に編集できる。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PendingItem {
    pub name: String,
    pub brand: String,
    pub color: String,
    pub size: String,
    pub description: String,
    pub category: Category,
    pub storage_location: String,
    pub date_added: String,
    pub date_purchased: String,
    pub expiry_date: String,
    pub price: f64,
    pub image_url: String,
    pub is_duplicate: bool,
}

/// 確定済み在庫レコード（永続化の単位）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryItem {
    /// 確定時に採番される一意ID（不変、再利用しない）
    pub id: String,
    pub name: String,
    pub brand: String,
    pub color: String,
    pub size: String,
    pub description: String,
    pub category: Category,
    pub storage_location: String,
    /// 登録日（確定時に一度だけ設定、以後不変）
    pub date_added: String,
    pub date_purchased: String,
    pub expiry_date: String,
    pub price: f64,
    pub image_url: String,
    /// 保存時に重複判定が設定する（入力フィールドではない）
    pub is_duplicate: bool,
}

impl InventoryItem {
    /// レビュー済み候補にIDを採番して確定レコードへ変換する
    pub fn from_pending(pending: PendingItem, id: String) -> Self {
        Self {
            id,
            name: pending.name,
            brand: pending.brand,
            color: pending.color,
            size: pending.size,
            description: pending.description,
            category: pending.category,
            storage_location: pending.storage_location,
            date_added: pending.date_added,
            date_purchased: pending.date_purchased,
            expiry_date: pending.expiry_date,
            price: pending.price,
            image_url: pending.image_url,
            is_duplicate: pending.is_duplicate,
        }
    }
}

/// チャット発言
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_detection_all_fields_absent() {
        // 全フィールド欠落でもデシリアライズできることを確認
        let raw: RawDetection = serde_json::from_str("{}").unwrap();
        assert!(raw.name.is_none());
        assert!(raw.category.is_none());
        assert!(raw.price.is_none());
        assert!(raw.box_2d.is_none());
    }

    #[test]
    fn test_raw_detection_deserialize() {
        let json = r#"{
            "name": "Cordless Drill",
            "brand": "DeWalt",
            "category": "power tools",
            "price": 89.99,
            "storageLocation": "Garage Shelf B",
            "box_2d": [100, 200, 500, 650]
        }"#;

        let raw: RawDetection = serde_json::from_str(json).unwrap();
        assert_eq!(raw.name.as_deref(), Some("Cordless Drill"));
        assert_eq!(raw.brand.as_deref(), Some("DeWalt"));
        assert_eq!(raw.storage_location.as_deref(), Some("Garage Shelf B"));
        assert_eq!(raw.price, Some(RawPrice::Number(89.99)));

        let bbox = raw.box_2d.unwrap();
        assert_eq!(bbox.top, 100.0);
        assert_eq!(bbox.left, 200.0);
        assert_eq!(bbox.bottom, 500.0);
        assert_eq!(bbox.right, 650.0);
    }

    #[test]
    fn test_raw_detection_price_as_string() {
        let json = r#"{"name": "Mug", "price": "$4.50"}"#;
        let raw: RawDetection = serde_json::from_str(json).unwrap();
        assert_eq!(raw.price, Some(RawPrice::Text("$4.50".to_string())));
    }

    #[test]
    fn test_raw_detection_estimated_price_alias() {
        // 旧スキーマの estimatedPrice も受け付ける
        let json = r#"{"name": "Lamp", "estimatedPrice": 12}"#;
        let raw: RawDetection = serde_json::from_str(json).unwrap();
        assert_eq!(raw.price, Some(RawPrice::Number(12.0)));
    }

    #[test]
    fn test_inventory_item_serialize_camel_case() {
        let item = InventoryItem {
            id: "abc-123".to_string(),
            name: "Winter Coat".to_string(),
            category: Category::Clothes,
            storage_location: "Closet".to_string(),
            date_added: "2026-08-06".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"storageLocation\":\"Closet\""));
        assert!(json.contains("\"dateAdded\":\"2026-08-06\""));
        assert!(json.contains("\"category\":\"Clothes\""));
        assert!(json.contains("\"isDuplicate\":false"));
    }

    #[test]
    fn test_inventory_item_roundtrip() {
        let original = InventoryItem {
            id: "id-1".to_string(),
            name: "Dumbbell".to_string(),
            brand: "Rogue".to_string(),
            category: Category::Gym,
            storage_location: "Basement".to_string(),
            date_added: "2026-08-06".to_string(),
            price: 35.0,
            is_duplicate: true,
            ..Default::default()
        };

        let json = serde_json::to_string(&original).unwrap();
        let restored: InventoryItem = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn test_inventory_item_deserialize_missing_fields() {
        // 最小限のフィールドだけでもデシリアライズできる
        let json = r#"{"id": "x", "name": "Box"}"#;
        let item: InventoryItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, "x");
        assert_eq!(item.name, "Box");
        assert_eq!(item.category, Category::Other); // デフォルト値
        assert_eq!(item.price, 0.0); // デフォルト値
        assert!(!item.is_duplicate); // デフォルト値
    }

    #[test]
    fn test_from_pending_assigns_id() {
        let pending = PendingItem {
            name: "Tent".to_string(),
            category: Category::Other,
            storage_location: "Attic".to_string(),
            date_added: "2026-08-06".to_string(),
            price: 120.0,
            is_duplicate: true,
            ..Default::default()
        };

        let item = InventoryItem::from_pending(pending.clone(), "new-id".to_string());
        assert_eq!(item.id, "new-id");
        assert_eq!(item.name, pending.name);
        assert_eq!(item.date_added, pending.date_added);
        assert!(item.is_duplicate);
    }

    #[test]
    fn test_bounding_box_roundtrip() {
        let json = "[10.0,20.0,900.0,999.0]";
        let bbox: BoundingBox = serde_json::from_str(json).unwrap();
        assert_eq!(bbox.top, 10.0);
        assert_eq!(bbox.right, 999.0);

        let back = serde_json::to_string(&bbox).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn test_chat_message_roles() {
        let msg = ChatMessage {
            role: ChatRole::Assistant,
            content: "The coat is in the closet.".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"assistant\""));
    }
}
