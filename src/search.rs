//! 検索・絞り込み・並べ替えモジュール
//!
//! カタログの読み取り専用ビューを作る。カタログ自体は変更しない。

use omnivault_common::{Category, InventoryItem};

/// 並び順
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    /// 追加が新しい順（カタログの挿入順そのまま）
    #[default]
    Newest,
    /// 名前昇順
    Name,
    /// 価格降順
    Price,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newest" | "new" => Ok(SortKey::Newest),
            "name" => Ok(SortKey::Name),
            "price" => Ok(SortKey::Price),
            _ => Err(format!("Unknown sort key: {}. Use newest, name, or price", s)),
        }
    }
}

/// 検索条件
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// 名前・説明の部分一致（大文字小文字無視）
    pub query: Option<String>,
    /// カテゴリ絞り込み
    pub category: Option<Category>,
    pub sort: SortKey,
}

/// カタログを絞り込んで並べ替えた参照リストを返す
pub fn filter_items<'a>(
    items: &'a [InventoryItem],
    options: &SearchOptions,
) -> Vec<&'a InventoryItem> {
    let query = options.query.as_deref().map(str::to_lowercase);

    let mut matched: Vec<&InventoryItem> = items
        .iter()
        .filter(|item| {
            let matches_query = match &query {
                Some(q) => {
                    item.name.to_lowercase().contains(q)
                        || item.description.to_lowercase().contains(q)
                }
                None => true,
            };
            let matches_category = match options.category {
                Some(category) => item.category == category,
                None => true,
            };
            matches_query && matches_category
        })
        .collect();

    match options.sort {
        // 挿入順 = 新しい順（merge_batchが先頭挿入するため）
        SortKey::Newest => {}
        SortKey::Name => {
            matched.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }
        SortKey::Price => matched.sort_by(|a, b| {
            b.price
                .partial_cmp(&a.price)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
    }

    matched
}
