use crate::error::{OmniVaultError, Result};
use crate::preprocess::PrepareOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 前処理後の長辺上限（px）
    pub max_image_dimension: u32,
    /// JPEG再圧縮品質 (0-100)
    pub jpeg_quality: u8,
    /// AI CLI呼び出しのタイムアウト（秒）
    pub timeout_seconds: u64,
    /// カタログ保存先の上書き（未設定ならOS既定のデータディレクトリ）
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_image_dimension: 800,
            jpeg_quality: 55,
            timeout_seconds: 120,
            data_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| OmniVaultError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("omnivault").join("config.json"))
    }

    /// カタログJSONの保存先を解決する
    pub fn inventory_path(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.join("inventory.json")),
            None => crate::store::CatalogStore::default_path(),
        }
    }

    /// 検出キャッシュの置き場所（カタログと同じディレクトリ）
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let inventory = self.inventory_path()?;
        Ok(inventory
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".")))
    }

    /// 画像前処理のオプション
    pub fn prepare_options(&self) -> PrepareOptions {
        PrepareOptions {
            max_dimension: self.max_image_dimension,
            jpeg_quality: self.jpeg_quality,
        }
    }
}
