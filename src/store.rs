//! カタログストア
//!
//! 在庫カタログ全体を単一JSONドキュメントとして永続化する。
//! - load: 未作成・破損は空カタログ（呼び出し側へエラーを返さない）
//! - persist: 全置換。一時ファイル+renameで原子的に書き、
//!   Mutexで直列化して発行順=完了順を保証する
//! - subscribe: persist成功のたびに新カタログを購読者へ通知する
//!
//! 削除・マージはメモリ上のカタログ（vault）の責務で、ストアは
//! 全置換バックエンドに徹する。

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use omnivault_common::InventoryItem;

use crate::error::{OmniVaultError, Result};

type Listener = Box<dyn Fn(&[InventoryItem]) + Send + Sync>;

pub struct CatalogStore {
    path: PathBuf,
    write_lock: Mutex<()>,
    listeners: Mutex<Vec<Listener>>,
}

impl CatalogStore {
    /// 指定パスのストアを開く（ファイルはまだ無くてよい）
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// 既定の保存先（<データディレクトリ>/omnivault/inventory.json）
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::data_dir()
            .ok_or_else(|| OmniVaultError::Config("データディレクトリが見つかりません".into()))?;
        Ok(base.join("omnivault").join("inventory.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// カタログ全体を読み込む
    ///
    /// 未作成・読み込み失敗・JSON破損はすべて空カタログとして扱う。
    /// アプリの起動を止めない。
    pub fn load(&self) -> Vec<InventoryItem> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str(&content) {
            Ok(items) => items,
            Err(_) => {
                eprintln!(
                    "カタログが読めません、空として扱います: {}",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    /// カタログ全体を置換して永続化する
    ///
    /// 同一ディレクトリの一時ファイルに書いてからrenameする。
    /// 途中で落ちても旧カタログが残り、新旧が混ざった状態にはならない。
    pub fn persist(&self, items: &[InventoryItem]) -> Result<()> {
        let json = serde_json::to_string_pretty(items)?;

        {
            let _guard = self
                .write_lock
                .lock()
                .map_err(|_| OmniVaultError::Storage("書き込みロックの取得に失敗".into()))?;

            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let temp_path = self.path.with_extension("json.tmp");
            std::fs::write(&temp_path, &json)?;
            std::fs::rename(&temp_path, &self.path)?;
        }

        self.notify(items);
        Ok(())
    }

    /// persist成功のたびに新カタログを受け取る購読者を登録する
    pub fn subscribe(&self, listener: impl Fn(&[InventoryItem]) + Send + Sync + 'static) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push(Box::new(listener));
        }
    }

    fn notify(&self, items: &[InventoryItem]) {
        if let Ok(listeners) = self.listeners.lock() {
            for listener in listeners.iter() {
                listener(items);
            }
        }
    }
}
