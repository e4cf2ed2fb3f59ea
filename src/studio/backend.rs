//! コラージュバックエンドとの境界

use async_trait::async_trait;
use mood_snap_common::StudioResponse;
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

use crate::compress::CompressedPhoto;
use crate::error::{Result, StudioError};

/// バックエンドへの1回分のリクエスト
#[derive(Debug, Clone)]
pub struct StudioRequest {
    pub photos: Vec<CompressedPhoto>,
    /// スタジオモードID（バックエンドの `theme`）
    pub theme: String,
    pub user_prompt: String,
}

#[async_trait]
pub trait StudioBackend: Send + Sync {
    async fn analyze(&self, request: &StudioRequest) -> Result<StudioResponse>;
}

/// `POST {base}/analyze-emotion` を呼ぶHTTPバックエンド
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, base_url: base_url.into() })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/analyze-emotion", self.base_url.trim_end_matches('/'))
    }

    fn form(request: &StudioRequest) -> Result<Form> {
        let mut form = Form::new();
        for photo in &request.photos {
            let part = Part::bytes(photo.bytes.clone())
                .file_name(photo.upload_name.clone())
                .mime_str("image/jpeg")?;
            form = form.part("files", part);
        }
        Ok(form
            .text("theme", request.theme.clone())
            .text("user_prompt", request.user_prompt.clone()))
    }
}

#[async_trait]
impl StudioBackend for HttpBackend {
    async fn analyze(&self, request: &StudioRequest) -> Result<StudioResponse> {
        let url = self.endpoint();
        debug!(%url, photos = request.photos.len(), theme = %request.theme, "posting studio request");

        let response = self
            .client
            .post(&url)
            .multipart(Self::form(request)?)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "studio backend returned an error");
            return Err(StudioError::Backend { status: status.as_u16(), body });
        }

        let parsed: StudioResponse = serde_json::from_str(&body)?;
        if let Some(error) = &parsed.error {
            warn!(%error, "studio backend reported a processing error");
        }
        Ok(parsed)
    }
}
