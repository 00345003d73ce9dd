//! AI検出モジュール
//!
//! 前処理済み写真をAI CLIに渡し、検出JSONを受け取って
//! RawDetection配列にパースする。
//! 通信エラー・パースエラー・検出ゼロはそれぞれ別のエラーとして
//! 呼び出し側へ返す（リトライ / 撮り直しの案内を分けるため）。

mod cache;

pub use cache::{image_hash, DetectionCache};

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use omnivault_common::{build_detect_prompt, parse_detection_response, RawDetection};

use crate::ai_provider::AiProvider;
use crate::error::{OmniVaultError, Result};
use crate::preprocess::PreparedImage;

/// 前処理済み画像を一時ファイルへ書き出す（AI CLIへパスで渡す）
pub(crate) fn stage_image(prepared: &PreparedImage, file_name: &str) -> Result<PathBuf> {
    let temp_dir = std::env::temp_dir().join("omnivault-images");
    prepared.write_to(&temp_dir, file_name)
}

/// 前処理済み写真を解析して検出結果を返す
///
/// # Errors
/// * `ApiCall` - CLI起動失敗・非ゼロ終了・タイムアウト（リトライ可能）
/// * `ApiParse` - レスポンスがJSONとして読めない（リトライ可能）
/// * `NoItemsDetected` - 正常応答だが検出ゼロ（撮り直しを促す）
pub async fn detect_items(
    prepared: &PreparedImage,
    provider: AiProvider,
    timeout_seconds: u64,
    verbose: bool,
) -> Result<Vec<RawDetection>> {
    let image_path = stage_image(prepared, "capture.jpg")?;

    let raw_prompt = format!(
        "Read the image file at {} and analyze it.\n\n{}",
        image_path.display(),
        build_detect_prompt()
    );
    let full_prompt = raw_prompt.replace('\n', " ");

    if verbose {
        println!("  プロンプト長: {} chars", full_prompt.len());
    }

    let response = run_provider_cli(provider, &full_prompt, timeout_seconds, verbose).await?;

    if verbose {
        println!("  レスポンス長: {} chars", response.len());
    }

    let detections = parse_detection_response(&response)
        .map_err(|e| OmniVaultError::ApiParse(e.to_string()))?;

    if detections.is_empty() {
        return Err(OmniVaultError::NoItemsDetected);
    }

    Ok(detections)
}

/// キャッシュ付き検出
///
/// 前処理済み画像のハッシュが一致すればAI呼び出しをスキップする。
/// キャッシュの保存失敗は解析結果に影響させない（警告のみ）。
pub async fn detect_items_with_cache(
    prepared: &PreparedImage,
    provider: AiProvider,
    cache_dir: &Path,
    timeout_seconds: u64,
    verbose: bool,
) -> Result<Vec<RawDetection>> {
    let mut cache = DetectionCache::load(cache_dir);
    let hash = image_hash(&prepared.jpeg);

    if let Some(hit) = cache.get(&hash) {
        if verbose {
            println!("  キャッシュヒット: {}", &hash[..12]);
        }
        return Ok(hit.to_vec());
    }

    let detections = detect_items(prepared, provider, timeout_seconds, verbose).await?;

    cache.insert(hash, detections.clone());
    if let Err(e) = cache.save(cache_dir) {
        eprintln!("キャッシュ保存エラー: {}", e);
    }

    Ok(detections)
}

/// AI CLIをワンショット実行してstdoutを返す
pub(crate) async fn run_provider_cli(
    provider: AiProvider,
    prompt: &str,
    timeout_seconds: u64,
    verbose: bool,
) -> Result<String> {
    let command_name = provider.command_name();

    // CLI呼び出し（Windowsではcmd /c経由）
    #[cfg(windows)]
    let mut command = {
        let mut command = Command::new("cmd");
        command
            .arg("/c")
            .arg(command_name)
            .args(provider.one_shot_args(prompt));
        command
    };

    #[cfg(not(windows))]
    let mut command = {
        let mut command = Command::new(command_name);
        command.args(provider.one_shot_args(prompt));
        command
    };

    let output = timeout(Duration::from_secs(timeout_seconds), command.output())
        .await
        .map_err(|_| {
            OmniVaultError::ApiCall(format!(
                "{} CLIがタイムアウトしました（{}秒）",
                command_name, timeout_seconds
            ))
        })?
        .map_err(|e| OmniVaultError::ApiCall(format!("{} CLI実行エラー: {}", command_name, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(OmniVaultError::ApiCall(format!(
            "{} CLI failed (code {:?}): {}",
            command_name,
            output.status.code(),
            stderr
        )));
    }

    let response = String::from_utf8_lossy(&output.stdout).to_string();

    if verbose {
        let preview: String = response.chars().take(500).collect();
        println!("  レスポンス: {}", preview);
    }

    Ok(response)
}
