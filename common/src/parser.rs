//! AIレスポンスパーサー
//!
//! LLMのレスポンスからJSONオブジェクトを抽出し、感情解析としてパースする。
//! モデルはJSONをコードフェンスで包んで返すことがあるため、先に剥がす。

use crate::error::{Error, Result};
use crate::types::PartialEmotionAnalysis;

/// レスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. ``` ... ``` ブロック
/// 3. 最初の `{` から最後の `}` まで
/// 4. エラー
///
/// # Examples
/// ```
/// use mood_snap_common::extract_json;
///
/// let response = "```json\n{\"dominantEmotion\": \"Joy\"}\n```";
/// let json = extract_json(response).unwrap();
/// assert!(json.starts_with('{'));
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + "```json".len();
        if let Some(end_offset) = response[start..].find("```") {
            return Ok(response[start..start + end_offset].trim());
        }
    }

    if let Some(start_marker) = response.find("```") {
        let start = start_marker + 3;
        if let Some(end_offset) = response[start..].find("```") {
            let block = response[start..start + end_offset].trim();
            // 言語タグ付き（```JSON など）の場合は括弧の範囲だけ使う
            if block.starts_with('{') || block.starts_with('[') {
                return Ok(block);
            }
            if let Some(inner) = brace_span(block) {
                return Ok(inner);
            }
        }
    }

    if let Some(span) = brace_span(response) {
        return Ok(span);
    }

    Err(Error::Parse("JSONが見つかりません".into()))
}

fn brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// 感情解析レスポンスをパース（厳密）
///
/// JSONが見つからない、またはオブジェクトでない場合はエラー。
/// フィールド単位の型不正はエラーにせず欠落として扱う。
pub fn parse_analysis(response: &str) -> Result<PartialEmotionAnalysis> {
    let json_str = extract_json(response)?;
    let value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("感情解析 JSONパースエラー: {}", e)))?;

    if !value.is_object() {
        return Err(Error::Parse("感情解析がJSONオブジェクトではありません".into()));
    }

    Ok(PartialEmotionAnalysis::from_value(value))
}

/// パース結果（フォールバック使用有無つき）
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAnalysis {
    pub analysis: PartialEmotionAnalysis,
    pub used_fallback: bool,
}

/// 感情解析レスポンスをパース（失敗時はフォールバック）
///
/// パースに失敗してもエラーは返さず `fallback` の値を使う。
pub fn parse_analysis_or_else<F>(response: &str, fallback: F) -> ParsedAnalysis
where
    F: FnOnce() -> PartialEmotionAnalysis,
{
    match parse_analysis(response) {
        Ok(analysis) => ParsedAnalysis { analysis, used_fallback: false },
        Err(_) => ParsedAnalysis { analysis: fallback(), used_fallback: true },
    }
}
