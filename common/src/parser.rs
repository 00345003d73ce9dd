//! APIレスポンスパーサー
//!
//! AI CLIなどのレスポンステキストからJSONを抽出し、
//! 検出結果（RawDetection配列）をパースする

use crate::error::{Error, Result};
use crate::types::RawDetection;

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の [...] 配列
/// 3. エラー
///
/// # Arguments
/// * `response` - APIレスポンス文字列
///
/// # Returns
/// * `Ok(&str)` - 抽出されたJSON文字列
/// * `Err` - JSONが見つからない場合
///
/// # Examples
/// ```
/// use omnivault_common::extract_json;
///
/// let response = "[{\"name\": \"Drill\"}]";
/// let json = extract_json(response).unwrap();
/// assert!(json.contains("Drill"));
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    // 生の [...] を探す
    if let Some(start) = response.find('[') {
        if let Some(end) = response.rfind(']') {
            if end >= start {
                return Ok(&response[start..=end]);
            }
        }
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

/// 検出レスポンスをパース
///
/// 空配列は正常値として返す（「検出ゼロ」の判定は呼び出し側が行い、
/// パース失敗とは区別して扱う）
///
/// # Arguments
/// * `response` - 検出APIのレスポンステキスト
///
/// # Returns
/// * `Ok(Vec<RawDetection>)` - パース成功（空配列を含む）
/// * `Err` - JSONが見つからないかパース失敗
pub fn parse_detection_response(response: &str) -> Result<Vec<RawDetection>> {
    let json_str = extract_json(response)?;
    let detections: Vec<RawDetection> = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("検出JSONパースエラー: {}", e)))?;
    Ok(detections)
}
