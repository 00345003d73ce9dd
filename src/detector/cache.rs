//! 検出結果キャッシュモジュール
//!
//! 前処理済み画像のSHA-256ハッシュをキーに検出結果をキャッシュし、
//! 同じ写真の再解析をスキップする。

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use omnivault_common::RawDetection;

use crate::error::Result;

const CACHE_FILE_NAME: &str = ".detect-cache.json";

/// 前処理済み画像バイト列のハッシュを計算（SHA-256）
pub fn image_hash(jpeg: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(jpeg);
    hex::encode(hasher.finalize())
}

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionCache {
    /// バージョン（互換性チェック用）
    version: u32,
    /// 画像ハッシュ → 検出結果のマップ
    entries: HashMap<String, Vec<RawDetection>>,
}

impl DetectionCache {
    const CURRENT_VERSION: u32 = 1;

    pub fn cache_path(dir: &Path) -> PathBuf {
        dir.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み（壊れていれば空から再生成）
    pub fn load(dir: &Path) -> Self {
        let cache_path = Self::cache_path(dir);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, DetectionCache>(reader) {
            Ok(cache) => {
                // バージョンチェック
                if cache.version != Self::CURRENT_VERSION {
                    eprintln!("キャッシュバージョン不一致、再生成します");
                    return Self::default();
                }
                cache
            }
            Err(_) => Self::default(),
        }
    }

    /// キャッシュファイルを保存
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let file = File::create(Self::cache_path(dir))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// キャッシュをルックアップ
    pub fn get(&self, hash: &str) -> Option<&[RawDetection]> {
        self.entries.get(hash).map(Vec::as_slice)
    }

    /// キャッシュに追加
    pub fn insert(&mut self, hash: String, detections: Vec<RawDetection>) {
        self.entries.insert(hash, detections);
    }

    /// キャッシュ件数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// キャッシュファイルを削除。存在しなければfalse
    pub fn clear(dir: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(dir);
        if cache_path.exists() {
            std::fs::remove_file(cache_path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

impl Default for DetectionCache {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}
