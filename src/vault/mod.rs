//! 在庫カタログ
//!
//! メモリ上のカタログが唯一の共有状態で、ストアは全置換バックエンド。
//! 変更は必ず merge_batch / delete / delete_many を通し、読み手が
//! 中途半端な状態を観測しないようにする（永続化成功後にのみ
//! メモリ上のカタログを差し替える）。

pub mod flow;

use chrono::Local;
use uuid::Uuid;

use omnivault_common::{annotate_duplicates, InventoryItem, PendingItem};

use crate::error::Result;
use crate::store::CatalogStore;

/// 今日の日付（date_added用、YYYY-MM-DD）
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

pub struct Vault {
    store: CatalogStore,
    items: Vec<InventoryItem>,
}

impl Vault {
    /// ストアを読み込んでカタログを開く
    pub fn open(store: CatalogStore) -> Self {
        let items = store.load();
        Self { store, items }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 確定バッチをマージして永続化する
    ///
    /// 1. マージ前のカタログに対して重複フラグを計算
    /// 2. ID採番（UUID v4）
    /// 3. バッチを先頭に挿入（バッチ内の順序・既存の順序は維持）
    /// 4. 全置換で永続化。失敗時はメモリ上のカタログも変更しない
    pub fn merge_batch(&mut self, mut batch: Vec<PendingItem>) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        annotate_duplicates(&mut batch, &self.items);

        let mut merged: Vec<InventoryItem> = batch
            .into_iter()
            .map(|pending| InventoryItem::from_pending(pending, Uuid::new_v4().to_string()))
            .collect();
        let added = merged.len();
        merged.extend(self.items.iter().cloned());

        self.store.persist(&merged)?;
        self.items = merged;
        Ok(added)
    }

    /// IDを指定して1件削除し、即座に再永続化する
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        Ok(self.delete_many(&[id.to_string()])? == 1)
    }

    /// 複数IDを一括削除する。該当ゼロなら永続化しない
    pub fn delete_many(&mut self, ids: &[String]) -> Result<usize> {
        let remaining: Vec<InventoryItem> = self
            .items
            .iter()
            .filter(|item| !ids.contains(&item.id))
            .cloned()
            .collect();

        let removed = self.items.len() - remaining.len();
        if removed == 0 {
            return Ok(0);
        }

        self.store.persist(&remaining)?;
        self.items = remaining;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp_vault(dir: &std::path::Path) -> Vault {
        Vault::open(CatalogStore::open(dir.join("inventory.json")))
    }

    fn pending(name: &str, brand: &str) -> PendingItem {
        PendingItem {
            name: name.to_string(),
            brand: brand.to_string(),
            date_added: "2026-08-06".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_prepends_batch_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut vault = open_temp_vault(dir.path());

        vault
            .merge_batch(vec![pending("A", ""), pending("B", "")])
            .unwrap();
        vault
            .merge_batch(vec![pending("C", ""), pending("D", "")])
            .unwrap();

        let names: Vec<&str> = vault.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["C", "D", "A", "B"]);

        // 永続化済みの並びも同じ
        let reopened = open_temp_vault(dir.path());
        let names: Vec<&str> = reopened.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["C", "D", "A", "B"]);
    }

    #[test]
    fn test_merge_assigns_unique_ids() {
        let dir = tempfile::tempdir().unwrap();
        let mut vault = open_temp_vault(dir.path());

        vault
            .merge_batch(vec![pending("A", ""), pending("B", ""), pending("C", "")])
            .unwrap();

        let mut ids: Vec<&str> = vault.items().iter().map(|i| i.id.as_str()).collect();
        assert!(ids.iter().all(|id| !id.is_empty()));
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_merge_flags_duplicates_against_existing_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let mut vault = open_temp_vault(dir.path());

        vault.merge_batch(vec![pending("Drill", "DeWalt")]).unwrap();
        vault
            .merge_batch(vec![pending("drill", "dewalt"), pending("Drill", "Makita")])
            .unwrap();

        assert!(vault.items()[0].is_duplicate); // drill/dewalt
        assert!(!vault.items()[1].is_duplicate); // Drill/Makita
        assert!(!vault.items()[2].is_duplicate); // 既存レコードは触らない
    }

    #[test]
    fn test_merge_empty_batch_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut vault = open_temp_vault(dir.path());

        assert_eq!(vault.merge_batch(Vec::new()).unwrap(), 0);
        assert!(vault.is_empty());
        assert!(!dir.path().join("inventory.json").exists());
    }

    #[test]
    fn test_delete_exact_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut vault = open_temp_vault(dir.path());

        vault
            .merge_batch(vec![pending("A", ""), pending("B", "")])
            .unwrap();
        let id_a = vault
            .items()
            .iter()
            .find(|i| i.name == "A")
            .unwrap()
            .id
            .clone();

        assert!(vault.delete(&id_a).unwrap());
        assert_eq!(vault.len(), 1);
        assert_eq!(vault.items()[0].name, "B");

        // 再読込でも正確に1件だけ
        let reopened = open_temp_vault(dir.path());
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.items()[0].name, "B");
    }

    #[test]
    fn test_delete_unknown_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut vault = open_temp_vault(dir.path());

        vault.merge_batch(vec![pending("A", "")]).unwrap();
        assert!(!vault.delete("no-such-id").unwrap());
        assert_eq!(vault.len(), 1);
    }

    #[test]
    fn test_delete_many() {
        let dir = tempfile::tempdir().unwrap();
        let mut vault = open_temp_vault(dir.path());

        vault
            .merge_batch(vec![pending("A", ""), pending("B", ""), pending("C", "")])
            .unwrap();
        let ids: Vec<String> = vault
            .items()
            .iter()
            .filter(|i| i.name != "B")
            .map(|i| i.id.clone())
            .collect();

        assert_eq!(vault.delete_many(&ids).unwrap(), 2);
        assert_eq!(vault.len(), 1);
        assert_eq!(vault.items()[0].name, "B");
    }

    #[test]
    fn test_today_format() {
        let today = today();
        assert_eq!(today.len(), 10);
        assert_eq!(today.chars().filter(|&c| c == '-').count(), 2);
    }
}
