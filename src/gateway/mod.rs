//! AIゲートウェイ連携（チャット補完形式）
//!
//! 全画像をdata URLとして1メッセージに載せ、感情解析JSONを受け取る。
//! JSONとして読めない応答は既定の解析に差し替える（エラーにはしない）。

mod gemini;

pub use gemini::GeminiClient;

use mood_snap_common::defaults::gateway_default_analysis;
use mood_snap_common::prompts::build_gateway_prompt;
use mood_snap_common::{parse_analysis_or_else, ParsedAnalysis};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::error::{Result, StudioError};

pub struct GatewayClient {
    client: reqwest::Client,
    url: String,
    model: String,
    api_key: String,
}

impl GatewayClient {
    pub fn new(url: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().build()?,
            url: url.into(),
            model: model.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.gateway_url, &config.gateway_model, config.gateway_key()?)
    }

    /// リクエストボディ（テキスト1パート＋画像ごとのimage_urlパート）
    pub fn request_body(&self, image_urls: &[String]) -> Value {
        let mut content = vec![json!({
            "type": "text",
            "text": build_gateway_prompt(image_urls.len()),
        })];
        content.extend(image_urls.iter().map(|url| {
            json!({
                "type": "image_url",
                "image_url": { "url": url },
            })
        }));

        json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": content }],
        })
    }

    /// 画像（data URL）の感情を解析
    pub async fn analyze(&self, image_urls: &[String]) -> Result<ParsedAnalysis> {
        if image_urls.is_empty() {
            return Err(StudioError::NoImages);
        }
        debug!(images = image_urls.len(), model = %self.model, "requesting gateway analysis");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(image_urls))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), %body, "AI gateway error");
            return Err(status_error(status.as_u16()));
        }

        let payload: Value = response.json().await?;
        let content = message_content(&payload);
        debug!(chars = content.len(), "gateway response received");

        let parsed = parse_analysis_or_else(content, gateway_default_analysis);
        if parsed.used_fallback {
            warn!("failed to parse gateway response, using default analysis");
        }
        Ok(parsed)
    }
}

/// 非成功ステータスの分類
pub fn status_error(status: u16) -> StudioError {
    match status {
        429 => StudioError::RateLimited,
        402 => StudioError::PaymentRequired,
        other => StudioError::ApiCall(format!("AI Gateway error: {}", other)),
    }
}

/// `choices[0].message.content`（無ければ空文字。空文字は既定の解析になる）
pub fn message_content(payload: &Value) -> &str {
    payload["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GatewayClient {
        GatewayClient::new("http://gateway.test/v1/chat/completions", "google/gemini-2.5-flash", "key").unwrap()
    }

    #[test]
    fn test_request_body_has_one_part_per_image() {
        let urls = vec!["data:image/jpeg;base64,AAA".to_string(), "data:image/jpeg;base64,BBB".to_string()];
        let body = client().request_body(&urls);
        let content = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content.len(), 3);
        assert_eq!(content[0]["type"], "text");
        assert!(content[0]["text"].as_str().unwrap().contains("these 2 photos"));
        assert_eq!(content[2]["image_url"]["url"], "data:image/jpeg;base64,BBB");
        assert_eq!(body["model"], "google/gemini-2.5-flash");
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(status_error(429), StudioError::RateLimited));
        assert!(matches!(status_error(402), StudioError::PaymentRequired));
        assert!(matches!(status_error(500), StudioError::ApiCall(_)));
        assert_eq!(status_error(429).to_string(), "Rate limit exceeded. Please try again later.");
        assert_eq!(status_error(402).to_string(), "Usage limit reached. Please add credits.");
    }

    #[test]
    fn test_message_content() {
        let payload = json!({ "choices": [{ "message": { "content": "{\"dominantEmotion\":\"joy\"}" } }] });
        assert_eq!(message_content(&payload), "{\"dominantEmotion\":\"joy\"}");
        assert_eq!(message_content(&json!({ "choices": [] })), "");
        assert_eq!(message_content(&json!({ "choices": [{ "message": { "content": null } }] })), "");
    }

    #[tokio::test]
    async fn test_no_images_is_error() {
        assert!(matches!(client().analyze(&[]).await, Err(StudioError::NoImages)));
    }
}
