//! カテゴリ正規化モジュール
//!
//! AIが返す自由記述のカテゴリ文字列を閉集合
//! {Food, Clothes, Gym, Tools, Electronics, Other} に正規化する。
//! 正規化は全域かつ決定的（どんな入力でも必ず1つのカテゴリに落ちる）。

use serde::{Deserialize, Serialize};

/// 持ち物カテゴリ（閉集合）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Clothes,
    Gym,
    Tools,
    Electronics,
    #[default]
    Other,
}

impl Category {
    /// 全カテゴリ（プロンプト生成・CLIフィルタ用）
    pub const ALL: &'static [Category] = &[
        Category::Food,
        Category::Clothes,
        Category::Gym,
        Category::Tools,
        Category::Electronics,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Clothes => "Clothes",
            Category::Gym => "Gym",
            Category::Tools => "Tools",
            Category::Electronics => "Electronics",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "food" => Ok(Category::Food),
            "clothes" => Ok(Category::Clothes),
            "gym" => Ok(Category::Gym),
            "tools" => Ok(Category::Tools),
            "electronics" => Ok(Category::Electronics),
            "other" => Ok(Category::Other),
            _ => Err(format!(
                "Unknown category: {}. Use food, clothes, gym, tools, electronics, or other",
                s
            )),
        }
    }
}

/// カテゴリ文字列を正規化する
///
/// 小文字化して部分一致で判定する。先に一致したものが勝つ:
/// 1. "food" を含む → Food
/// 2. "cloth" を含む → Clothes
/// 3. "gym"/"fit"/"sport" を含む → Gym
/// 4. "tool" を含む → Tools
/// 5. "elect" を含む → Electronics
/// 6. どれにも一致しない → Other
pub fn normalize_category(raw: &str) -> Category {
    let lower = raw.to_lowercase();

    if lower.contains("food") {
        Category::Food
    } else if lower.contains("cloth") {
        Category::Clothes
    } else if lower.contains("gym") || lower.contains("fit") || lower.contains("sport") {
        Category::Gym
    } else if lower.contains("tool") {
        Category::Tools
    } else if lower.contains("elect") {
        Category::Electronics
    } else {
        Category::Other
    }
}
