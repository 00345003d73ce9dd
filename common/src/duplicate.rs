//! 重複判定モジュール
//!
//! 確定済みカタログとの照合で候補レコードに重複フラグを付ける。
//! 名前とブランドの大文字小文字無視一致によるヒューリスティックで、
//! 重複でも保存は妨げない（警告のみ）。

use crate::types::{InventoryItem, PendingItem};

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// 候補1件がカタログ内のレコードと重複しているか
///
/// 名前とブランドの両方が大文字小文字無視で一致したとき重複と判定する。
/// 空ブランドは空ブランドとだけ一致する。
pub fn is_duplicate_of(pending: &PendingItem, catalog: &[InventoryItem]) -> bool {
    catalog.iter().any(|existing| {
        eq_ignore_case(&existing.name, &pending.name)
            && eq_ignore_case(&existing.brand, &pending.brand)
    })
}

/// バッチ全体に重複フラグを付与する
///
/// 照合先はマージ前のカタログのみ。バッチ内の相互照合は行わない。
pub fn annotate_duplicates(batch: &mut [PendingItem], catalog: &[InventoryItem]) {
    for pending in batch.iter_mut() {
        pending.is_duplicate = is_duplicate_of(pending, catalog);
    }
}
