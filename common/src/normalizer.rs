//! 検出結果正規化モジュール
//!
//! RawDetection（欠落だらけの生データ）を既定値で埋め、
//! カテゴリを閉集合に正規化して PendingItem に変換する。
//! 正規化後のレコードは全フィールドが埋まっている。

use lazy_static::lazy_static;
use regex::Regex;

use crate::category::normalize_category;
use crate::types::{PendingItem, RawDetection, RawPrice};

/// 名前欠落時の既定値
pub const DEFAULT_NAME: &str = "Unnamed Object";

/// 保管場所欠落時の既定値
pub const DEFAULT_LOCATION: &str = "Main Storage";

lazy_static! {
    /// 価格文字列から数値部分を抽出（"$12.99" → 12.99）
    static ref PRICE_RE: Regex = Regex::new(r"\d+(?:\.\d+)?").unwrap();
}

/// 価格を非負の数値に強制変換する
///
/// - 数値: 有限かつ非負ならそのまま、それ以外は0
/// - 文字列: 最初の数値部分を抽出、なければ0
/// - 欠落: 0
pub fn coerce_price(raw: Option<&RawPrice>) -> f64 {
    match raw {
        Some(RawPrice::Number(n)) if n.is_finite() && *n >= 0.0 => *n,
        Some(RawPrice::Text(s)) => PRICE_RE
            .find(s)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

/// 欠落・空白のみの文字列を既定値に落とす
fn text_or(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}

/// 検出1件を候補レコードへ正規化する
///
/// # Arguments
/// * `raw` - AI検出の生データ
/// * `image_url` - 添付する画像参照（切り出しまたは全景）
/// * `today` - 登録日。AI供給値にかかわらず常にこの値を使う
pub fn normalize_detection(raw: &RawDetection, image_url: &str, today: &str) -> PendingItem {
    PendingItem {
        name: text_or(raw.name.as_deref(), DEFAULT_NAME),
        brand: text_or(raw.brand.as_deref(), ""),
        color: text_or(raw.color.as_deref(), ""),
        size: text_or(raw.size.as_deref(), ""),
        description: text_or(raw.description.as_deref(), ""),
        category: normalize_category(raw.category.as_deref().unwrap_or("")),
        storage_location: text_or(raw.storage_location.as_deref(), DEFAULT_LOCATION),
        date_added: today.to_string(),
        date_purchased: text_or(raw.date_purchased.as_deref(), ""),
        expiry_date: text_or(raw.expiry_date.as_deref(), ""),
        price: coerce_price(raw.price.as_ref()),
        image_url: image_url.to_string(),
        is_duplicate: false,
    }
}

/// 検出バッチを正規化する
///
/// `images` は検出と同じ並びの画像参照。足りない分は空文字列
/// （画像なしを許容）で埋める。
pub fn normalize_detections(
    raw: &[RawDetection],
    images: &[String],
    today: &str,
) -> Vec<PendingItem> {
    raw.iter()
        .enumerate()
        .map(|(i, detection)| {
            let image_url = images.get(i).map(String::as_str).unwrap_or("");
            normalize_detection(detection, image_url, today)
        })
        .collect()
}
