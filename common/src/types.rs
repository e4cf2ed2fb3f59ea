//! 解析結果の型定義
//!
//! AIが返す感情解析結果の型:
//! - PartialEmotionAnalysis: 受信したままの値（全フィールド欠落・型不正あり）
//! - EmotionAnalysis: フォールバック適用済みの値（レイアウトが消費する）
//! - StudioResponse: バックエンド `/analyze-emotion` のレスポンス
//!
//! フォールバックは `PartialEmotionAnalysis::resolve` の一箇所に集約する。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 主感情が無い場合の表示ラベル
pub const FALLBACK_DOMINANT_EMOTION: &str = "Vibes";
/// 雰囲気説明が無い場合の文言
pub const FALLBACK_VIBE_DESCRIPTION: &str = "The Art of Living";
/// スタイル未指定時のスタイル
pub const FALLBACK_COLLAGE_STYLE: &str = "magazine";
/// レイアウト提案が無い場合
pub const FALLBACK_LAYOUT_SUGGESTION: &str = "grid";

/// 受信した感情解析（LLMのベストエフォートJSON）
///
/// 型が合わない値は欠落として扱い、デシリアライズ自体は失敗させない。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialEmotionAnalysis {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub dominant_emotion: Option<String>,

    #[serde(default, deserialize_with = "lenient_strings", skip_serializing_if = "Option::is_none")]
    pub emotions: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub vibe_description: Option<String>,

    #[serde(default, deserialize_with = "lenient_strings", skip_serializing_if = "Option::is_none")]
    pub color_palette: Option<Vec<String>>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub collage_style: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub layout_suggestion: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub filter_preset: Option<String>,

    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl PartialEmotionAnalysis {
    /// 任意のJSON値から生成（オブジェクト以外は全フィールド欠落）
    pub fn from_value(value: Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }

    /// フォールバックを適用して確定値を得る
    pub fn resolve(&self) -> EmotionAnalysis {
        let dominant_emotion = non_blank(&self.dominant_emotion)
            .unwrap_or(FALLBACK_DOMINANT_EMOTION)
            .to_string();

        let emotions = self
            .emotions
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|e| !e.trim().is_empty())
            .cloned()
            .collect();

        let color_palette = self
            .color_palette
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();

        let caption = non_blank(&self.caption)
            .map(str::to_string)
            .unwrap_or_else(|| dominant_emotion.clone());

        EmotionAnalysis {
            vibe_description: non_blank(&self.vibe_description)
                .unwrap_or(FALLBACK_VIBE_DESCRIPTION)
                .to_string(),
            collage_style: non_blank(&self.collage_style)
                .unwrap_or(FALLBACK_COLLAGE_STYLE)
                .to_string(),
            layout_suggestion: non_blank(&self.layout_suggestion)
                .unwrap_or(FALLBACK_LAYOUT_SUGGESTION)
                .to_string(),
            filter_preset: non_blank(&self.filter_preset).map(str::to_string),
            confidence: self.confidence.filter(|c| c.is_finite()).map(|c| c.clamp(0.0, 1.0)),
            dominant_emotion,
            emotions,
            color_palette,
            caption,
        }
    }
}

/// フォールバック適用済みの感情解析
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionAnalysis {
    pub dominant_emotion: String,
    pub emotions: Vec<String>,
    pub vibe_description: String,
    pub color_palette: Vec<String>,
    pub collage_style: String,
    pub layout_suggestion: String,
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_preset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Default for EmotionAnalysis {
    fn default() -> Self {
        PartialEmotionAnalysis::default().resolve()
    }
}

impl From<PartialEmotionAnalysis> for EmotionAnalysis {
    fn from(partial: PartialEmotionAnalysis) -> Self {
        partial.resolve()
    }
}

impl From<EmotionAnalysis> for PartialEmotionAnalysis {
    fn from(a: EmotionAnalysis) -> Self {
        Self {
            dominant_emotion: Some(a.dominant_emotion),
            emotions: Some(a.emotions),
            vibe_description: Some(a.vibe_description),
            color_palette: Some(a.color_palette),
            collage_style: Some(a.collage_style),
            layout_suggestion: Some(a.layout_suggestion),
            caption: Some(a.caption),
            filter_preset: a.filter_preset,
            confidence: a.confidence,
        }
    }
}

/// バックエンド `/analyze-emotion` のレスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudioResponse {
    #[serde(default, deserialize_with = "lenient_analysis")]
    pub analysis: PartialEmotionAnalysis,

    /// 合成済みコラージュ（data URL）
    #[serde(default, deserialize_with = "lenient_string")]
    pub collage_image: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub error: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// =============================================
// 寛容なデシリアライザ
// =============================================

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        // 単一文字列は1要素として扱う
        Value::String(s) => Some(vec![s]),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok().map(|v| {
            if s.trim().ends_with('%') { v / 100.0 } else { v }
        }),
        _ => None,
    })
}

fn lenient_analysis<'de, D>(deserializer: D) -> Result<PartialEmotionAnalysis, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(PartialEmotionAnalysis::from_value(value))
}
