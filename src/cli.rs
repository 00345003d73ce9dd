use clap::{Parser, Subcommand};
use std::path::PathBuf;

use omnivault_common::Category;

use crate::ai_provider::AiProvider;
use crate::search::SortKey;

#[derive(Parser)]
#[command(name = "omnivault")]
#[command(about = "持ち物カタログAI解析・在庫管理ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ (claude/codex/gemini)
    #[arg(long, default_value = "claude", global = true)]
    pub ai_provider: AiProvider,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 収納写真を解析してアイテムを追加
    Add {
        /// 収納写真のパス
        #[arg(required = true)]
        photo: PathBuf,

        /// レビューを省略して全件確定
        #[arg(short, long)]
        yes: bool,

        /// 保管場所を一括上書き
        #[arg(short, long)]
        location: Option<String>,

        /// 検出キャッシュを使用（同じ写真の再解析をスキップ）
        #[arg(long)]
        use_cache: bool,
    },

    /// フォルダ内の写真をまとめて解析して追加
    Scan {
        /// 写真フォルダのパス
        #[arg(required = true)]
        folder: PathBuf,

        /// レビューを省略して全件確定
        #[arg(short, long)]
        yes: bool,

        /// 検出キャッシュを使用
        #[arg(long)]
        use_cache: bool,
    },

    /// カタログを一覧表示
    List {
        /// 名前・説明の部分一致検索
        #[arg(short, long)]
        query: Option<String>,

        /// カテゴリで絞り込み (food/clothes/gym/tools/electronics/other)
        #[arg(short, long)]
        category: Option<Category>,

        /// 並び順 (newest/name/price)
        #[arg(short, long, default_value = "newest")]
        sort: SortKey,
    },

    /// アイテムをIDで削除（複数可）
    Delete {
        /// 削除するアイテムのID
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// 在庫アシスタントに質問（引数なしで対話モード）
    Chat {
        /// 質問（自由文）
        query: Option<String>,
    },

    /// 店頭写真から「買うべき？」を相談
    Advise {
        /// 検討中アイテムの写真パス
        #[arg(required = true)]
        photo: PathBuf,
    },

    /// 設定を表示/編集
    Config {
        /// 前処理後の長辺上限を設定（px）
        #[arg(long)]
        set_max_dimension: Option<u32>,

        /// JPEG品質を設定 (0-100)
        #[arg(long)]
        set_jpeg_quality: Option<u8>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// 検出キャッシュ管理
    Cache {
        /// キャッシュを削除
        #[arg(long)]
        clear: bool,

        /// キャッシュ情報を表示
        #[arg(long)]
        info: bool,
    },
}
