//! Gemini generateContent（バックエンド側の解析）
//!
//! 先頭画像1枚とディレクター用プロンプトを送る。
//! 失敗時は呼び出し側で "Timeless" の既定解析に差し替える。

use base64::{engine::general_purpose::STANDARD, Engine as _};
use mood_snap_common::defaults::artisanal_fallback;
use mood_snap_common::prompts::build_director_prompt;
use mood_snap_common::{parse_analysis, ParsedAnalysis, PartialEmotionAnalysis};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Result, StudioError};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiClient {
    client: reqwest::Client,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.gemini_model, config.gemini_key()?)
    }

    pub fn request_body(prompt: &str, image: &[u8], mime_type: &str) -> Value {
        json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    { "inline_data": { "mime_type": mime_type, "data": STANDARD.encode(image) } }
                ]
            }]
        })
    }

    /// 解析（失敗はエラーとして返す）
    pub async fn analyze(&self, theme: &str, user_prompt: &str, image: &[u8]) -> Result<PartialEmotionAnalysis> {
        let prompt = build_director_prompt(theme, user_prompt);
        let url = format!("{}/{}:generateContent?key={}", GEMINI_API_BASE, self.model, self.api_key);

        let response = self
            .client
            .post(url)
            .json(&Self::request_body(&prompt, image, mime_type(image)))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StudioError::ApiCall(format!("Gemini HTTP {}: {}", status.as_u16(), body)));
        }

        let payload: Value = response.json().await?;
        let text = candidate_text(&payload)?;
        let analysis = parse_analysis(text)?;
        info!(
            dominant = analysis.dominant_emotion.as_deref().unwrap_or("Unknown"),
            "Gemini analysis succeeded"
        );
        Ok(analysis)
    }

    /// 解析（失敗時は既定の解析）
    pub async fn analyze_or_fallback(&self, theme: &str, user_prompt: &str, image: &[u8]) -> ParsedAnalysis {
        match self.analyze(theme, user_prompt, image).await {
            Ok(analysis) => ParsedAnalysis { analysis, used_fallback: false },
            Err(e) => {
                warn!(error = %e, "Gemini analysis unavailable, using artisanal fallback");
                ParsedAnalysis { analysis: artisanal_fallback(theme), used_fallback: true }
            }
        }
    }
}

/// 画像の形式からMIMEタイプを推定（不明ならJPEG扱い）
pub fn mime_type(image: &[u8]) -> &'static str {
    image::guess_format(image)
        .map(|format| format.to_mime_type())
        .unwrap_or("image/jpeg")
}

/// `candidates[0].content.parts[0].text`（ブロックされた場合は無い）
pub fn candidate_text(payload: &Value) -> Result<&str> {
    payload["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| StudioError::ApiCall("Geminiのレスポンスにテキストがありません".into()))
}
