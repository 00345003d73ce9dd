//! 画像前処理モジュール
//!
//! 撮影写真をAI送信・端末保存向けに縮小・再圧縮し、
//! 検出ごとのバウンディングボックスからサムネイルを切り出す。
//! 切り出しは1件失敗しても元画像へフォールバックし、バッチを止めない。

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader};

use omnivault_common::BoundingBox;

use crate::error::{OmniVaultError, Result};

/// 前処理オプション
#[derive(Debug, Clone, Copy)]
pub struct PrepareOptions {
    /// 長辺の上限（px）
    pub max_dimension: u32,
    /// JPEG再圧縮品質 (0-100)
    pub jpeg_quality: u8,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            max_dimension: 800,
            jpeg_quality: 55,
        }
    }
}

/// 前処理済み画像（AIへ送信し、カタログへ埋め込む実体）
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
    quality: u8,
}

impl PreparedImage {
    /// data URI形式（カタログの imageUrl に埋め込む）
    pub fn data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", BASE64.encode(&self.jpeg))
    }

    /// JPEGバイト列をファイルに書き出す（AI CLIにパスで渡す用）
    pub fn write_to(&self, dir: &Path, file_name: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(file_name);
        std::fs::write(&path, &self.jpeg)?;
        Ok(path)
    }
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    image
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| OmniVaultError::ImageLoad(format!("JPEGエンコードエラー: {}", e)))?;
    Ok(buf)
}

/// 写真を前処理する
///
/// 長辺が上限を超える場合はアスペクト比を保って縮小し、
/// 指定品質のJPEGに再圧縮する。元写真のデコード失敗はエラー
/// （撮り直しをユーザーへ促す）。
pub fn prepare(path: &Path, options: &PrepareOptions) -> Result<PreparedImage> {
    let image = ImageReader::open(path)
        .map_err(|e| OmniVaultError::ImageLoad(format!("{}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| OmniVaultError::ImageLoad(format!("{}: {}", path.display(), e)))?;

    let resized = if image.width().max(image.height()) > options.max_dimension {
        image.thumbnail(options.max_dimension, options.max_dimension)
    } else {
        image
    };

    let jpeg = encode_jpeg(&resized, options.jpeg_quality)?;
    Ok(PreparedImage {
        width: resized.width(),
        height: resized.height(),
        jpeg,
        quality: options.jpeg_quality,
    })
}

/// 検出1件ぶんのサムネイルを切り出す
///
/// box は画像を1000分率で表した [top, left, bottom, right]。
/// 範囲外はクランプする。デコード失敗や退化した矩形は
/// 元画像をそのまま返す（1件の失敗でバッチを止めない）。
pub fn crop(prepared: &PreparedImage, bbox: &BoundingBox) -> PreparedImage {
    match try_crop(prepared, bbox) {
        Some(cropped) => cropped,
        None => prepared.clone(),
    }
}

fn try_crop(prepared: &PreparedImage, bbox: &BoundingBox) -> Option<PreparedImage> {
    let image = image::load_from_memory(&prepared.jpeg).ok()?;
    let (w, h) = (image.width(), image.height());

    let scale = |v: f64, extent: u32| -> u32 {
        let clamped = v.clamp(0.0, 1000.0);
        ((clamped / 1000.0) * extent as f64).round() as u32
    };

    let top = scale(bbox.top, h);
    let left = scale(bbox.left, w);
    let bottom = scale(bbox.bottom, h).min(h);
    let right = scale(bbox.right, w).min(w);

    if bottom <= top || right <= left {
        return None;
    }

    let cropped = image.crop_imm(left, top, right - left, bottom - top);
    let jpeg = encode_jpeg(&cropped, prepared.quality).ok()?;
    Some(PreparedImage {
        width: cropped.width(),
        height: cropped.height(),
        jpeg,
        quality: prepared.quality,
    })
}
