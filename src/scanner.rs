//! 写真スキャンモジュール
//!
//! フォルダ直下の画像ファイルを列挙する（一括追加用）。

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{OmniVaultError, Result};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "JPG", "JPEG", "PNG"];

pub fn scan_folder(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.exists() {
        return Err(OmniVaultError::FolderNotFound(folder.display().to_string()));
    }

    let mut photos = Vec::new();

    for entry in WalkDir::new(folder)
        .max_depth(1) // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy();
            if IMAGE_EXTENSIONS.iter().any(|&e| e == ext_str) {
                photos.push(path.to_path_buf());
            }
        }
    }

    // ファイル名でソート
    photos.sort();

    Ok(photos)
}
