//! 追加フロー結合テスト
//!
//! 検出レスポンス → 正規化 → レビュー状態機械 → マージ → 永続化
//! のパイプラインを、AI呼び出しをレスポンステキストに差し替えて検証

use omnivault_common::{
    normalize_detections, parse_detection_response, Category, InventoryItem, PendingItem,
};
use omnivault_rust::error::OmniVaultError;
use omnivault_rust::preprocess::{self, PrepareOptions};
use omnivault_rust::store::CatalogStore;
use omnivault_rust::vault::flow::{AddFlow, FlowState};
use omnivault_rust::vault::Vault;
use tempfile::tempdir;

const DETECTION_RESPONSE: &str = r#"Here is what I can see:
```json
[
  {
    "name": "Cordless Drill",
    "brand": "DeWalt",
    "category": "power tools",
    "price": 89.99,
    "storageLocation": "Garage Shelf B",
    "box_2d": [100, 100, 600, 600]
  },
  {
    "category": "tool"
  }
]
```"#;

fn run_flow_to_review(batch: Vec<PendingItem>) -> (AddFlow, Result<(), OmniVaultError>) {
    let mut flow = AddFlow::new();
    flow.begin_capture().expect("開始失敗");
    flow.begin_preprocessing().expect("遷移失敗");
    flow.begin_detecting().expect("遷移失敗");
    let result = flow.enter_review(batch);
    (flow, result)
}

/// レスポンステキストから永続化済みカタログまで
#[test]
fn test_detection_response_to_persisted_catalog() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("inventory.json");
    let mut vault = Vault::open(CatalogStore::open(&path));

    let detected = parse_detection_response(DETECTION_RESPONSE).expect("パース失敗");
    let images = vec!["img-0".to_string(), "img-1".to_string()];
    let batch = normalize_detections(&detected, &images, "2026-08-06");

    let (mut flow, entered) = run_flow_to_review(batch);
    entered.expect("レビューに入れない");

    let batch = flow.begin_saving().expect("保存開始失敗");
    let added = vault.merge_batch(batch).expect("マージ失敗");
    flow.finish();

    assert_eq!(added, 2);
    assert_eq!(flow.state(), FlowState::Idle);

    // 再読込して正規化結果を確認
    let reopened = Vault::open(CatalogStore::open(&path));
    let items = reopened.items();
    assert_eq!(items.len(), 2);

    assert_eq!(items[0].name, "Cordless Drill");
    assert_eq!(items[0].category, Category::Tools);
    assert_eq!(items[0].price, 89.99);
    assert_eq!(items[0].image_url, "img-0");

    // 欠落だらけの検出も既定値で埋まる
    assert_eq!(items[1].name, "Unnamed Object");
    assert_eq!(items[1].storage_location, "Main Storage");
    assert_eq!(items[1].category, Category::Tools);
    assert_eq!(items[1].price, 0.0);
    assert_eq!(items[1].date_added, "2026-08-06");

    assert_ne!(items[0].id, items[1].id);
}

/// 検出ゼロ: レビューに入らず、カタログも変更されない
#[test]
fn test_zero_detection_never_enters_review() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("inventory.json");

    // 既存カタログを用意
    let store = CatalogStore::open(&path);
    store
        .persist(&[InventoryItem {
            id: "keep".to_string(),
            name: "Existing".to_string(),
            ..Default::default()
        }])
        .expect("永続化失敗");
    let before = std::fs::read_to_string(&path).expect("読み込み失敗");

    let detected = parse_detection_response("[]").expect("パース失敗");
    let batch = normalize_detections(&detected, &[], "2026-08-06");

    let (flow, entered) = run_flow_to_review(batch);
    assert!(matches!(entered, Err(OmniVaultError::NoItemsDetected)));
    assert_eq!(flow.state(), FlowState::Idle);

    // カタログのファイルはバイト単位で無変化
    let after = std::fs::read_to_string(&path).expect("読み込み失敗");
    assert_eq!(before, after);
}

/// パース失敗は検出ゼロと区別される
#[test]
fn test_parse_failure_is_distinct_from_empty() {
    let garbage = parse_detection_response("The photo is too dark to analyze.");
    assert!(garbage.is_err());

    let empty = parse_detection_response("[]").expect("パース失敗");
    assert!(empty.is_empty());
}

/// 重複フラグ: 既存カタログと名前+ブランド一致（大文字小文字無視）
#[test]
fn test_duplicate_flag_set_at_merge_time() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut vault = Vault::open(CatalogStore::open(dir.path().join("inventory.json")));

    let first = parse_detection_response(
        r#"[{"name": "Drill", "brand": "DeWalt", "category": "Tools"}]"#,
    )
    .expect("パース失敗");
    vault
        .merge_batch(normalize_detections(&first, &[], "2026-08-06"))
        .expect("マージ失敗");

    let second = parse_detection_response(
        r#"[
            {"name": "drill", "brand": "dewalt", "category": "Tools"},
            {"name": "Drill", "brand": "Makita", "category": "Tools"}
        ]"#,
    )
    .expect("パース失敗");
    vault
        .merge_batch(normalize_detections(&second, &[], "2026-08-06"))
        .expect("マージ失敗");

    let items = vault.items();
    assert!(items[0].is_duplicate); // drill/dewalt
    assert!(!items[1].is_duplicate); // Drill/Makita
    assert!(!items[2].is_duplicate); // 元のレコードは不変
}

/// 切り出し失敗のフォールバック: 1件が失敗しても他のレコードは無傷
#[test]
fn test_crop_fallback_keeps_batch_intact() {
    let dir = tempdir().expect("Failed to create temp dir");
    let photo = dir.path().join("shelf.png");
    image::RgbImage::from_pixel(400, 200, image::Rgb([90, 120, 60]))
        .save(&photo)
        .expect("画像保存失敗");

    let prepared =
        preprocess::prepare(&photo, &PrepareOptions::default()).expect("前処理失敗");

    let detected = parse_detection_response(
        r#"[
            {"name": "Good Crop", "box_2d": [250, 250, 750, 750]},
            {"name": "Bad Crop", "box_2d": [500, 500, 500, 500]},
            {"name": "No Box"}
        ]"#,
    )
    .expect("パース失敗");

    let images: Vec<String> = detected
        .iter()
        .map(|d| match &d.box_2d {
            Some(bbox) => preprocess::crop(&prepared, bbox).data_url(),
            None => prepared.data_url(),
        })
        .collect();

    // 退化したboxは元画像へフォールバックし、バッチは3件のまま
    assert_eq!(images.len(), 3);
    assert_ne!(images[0], prepared.data_url()); // 切り出し成功
    assert_eq!(images[1], prepared.data_url()); // フォールバック
    assert_eq!(images[2], prepared.data_url()); // boxなしは全景

    let batch = normalize_detections(&detected, &images, "2026-08-06");
    assert_eq!(batch.len(), 3);
    assert_eq!(batch[1].name, "Bad Crop");
    assert_eq!(batch[1].image_url, prepared.data_url());
}

/// レビュー中の編集・除去が保存結果へ反映される
#[test]
fn test_review_edits_reach_storage() {
    let dir = tempdir().expect("Failed to create temp dir");
    let mut vault = Vault::open(CatalogStore::open(dir.path().join("inventory.json")));

    let detected = parse_detection_response(
        r#"[
            {"name": "Keep Me", "category": "Gym"},
            {"name": "Remove Me", "category": "Other"}
        ]"#,
    )
    .expect("パース失敗");
    let batch = normalize_detections(&detected, &[], "2026-08-06");

    let (mut flow, entered) = run_flow_to_review(batch);
    entered.expect("レビューに入れない");

    // 1件目を編集、2件目を除去
    let mut edited = flow.batch()[0].clone();
    edited.storage_location = "Basement Rack".to_string();
    flow.update_item(0, edited).expect("編集失敗");
    flow.remove_item(1).expect("除去失敗");

    let batch = flow.begin_saving().expect("保存開始失敗");
    vault.merge_batch(batch).expect("マージ失敗");

    assert_eq!(vault.len(), 1);
    assert_eq!(vault.items()[0].name, "Keep Me");
    assert_eq!(vault.items()[0].storage_location, "Basement Rack");
}
