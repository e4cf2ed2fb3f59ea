//! コラージュバックエンド（HTTP）
//!
//! - GET  /                ヘルスチェック
//! - POST /analyze-emotion  multipart（files, theme, user_prompt）→ 解析 + コラージュ

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use mood_snap_common::defaults::{artisanal_fallback, creative_block_analysis};
use mood_snap_common::{PartialEmotionAnalysis, StudioResponse};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::data_url::png_data_url;
use crate::engine::CollageEngine;
use crate::error::Result;
use crate::gateway::GeminiClient;

pub const DEFAULT_THEME: &str = "magazine";
/// multipart全体の上限（axum既定の2MBでは複数枚が入らない）
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Clone)]
pub struct ServerState {
    /// 無ければ常に既定の解析を使う
    gemini: Option<Arc<GeminiClient>>,
    scale: f32,
}

impl ServerState {
    pub fn new(gemini: Option<GeminiClient>, scale: f32) -> Self {
        Self { gemini: gemini.map(Arc::new), scale }
    }

    pub fn from_config(config: &Config) -> Self {
        let gemini = match GeminiClient::from_config(config) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "Gemini unavailable, every request will use the artisanal fallback");
                None
            }
        };
        Self::new(gemini, config.collage_scale)
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/", get(status_handler))
        .route("/analyze-emotion", post(analyze_emotion_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

pub async fn run(addr: SocketAddr, state: ServerState) -> Result<()> {
    let app = router(state);
    info!(%addr, "Mood Snap backend listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn status_handler() -> Json<Value> {
    Json(json!({ "status": "Mood Snap AI Brain Running" }))
}

struct StudioUpload {
    photos: Vec<Vec<u8>>,
    theme: String,
    user_prompt: String,
}

async fn read_upload(mut multipart: Multipart) -> std::result::Result<StudioUpload, (StatusCode, String)> {
    let bad_request = |e: axum::extract::multipart::MultipartError| (StatusCode::BAD_REQUEST, e.to_string());
    let mut upload = StudioUpload { photos: Vec::new(), theme: DEFAULT_THEME.to_string(), user_prompt: String::new() };

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" => upload.photos.push(field.bytes().await.map_err(bad_request)?.to_vec()),
            "theme" => upload.theme = field.text().await.map_err(bad_request)?,
            "user_prompt" => upload.user_prompt = field.text().await.map_err(bad_request)?,
            _ => {}
        }
    }
    Ok(upload)
}

async fn analyze_emotion_handler(
    State(state): State<ServerState>,
    multipart: Multipart,
) -> std::result::Result<Json<StudioResponse>, (StatusCode, String)> {
    let upload = read_upload(multipart).await?;
    if upload.photos.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "at least one file is required".to_string()));
    }
    info!(theme = %upload.theme, photos = upload.photos.len(), "studio request started");
    for (i, photo) in upload.photos.iter().enumerate() {
        info!(index = i + 1, bytes = photo.len(), "photo received");
    }

    match process(&state, upload).await {
        Ok((analysis, collage)) => {
            info!("studio request complete, collage generated");
            Ok(Json(StudioResponse { analysis, collage_image: Some(collage), error: None }))
        }
        Err(e) => {
            error!(error = %e, "studio request failed");
            Ok(Json(StudioResponse {
                analysis: creative_block_analysis(),
                collage_image: None,
                error: Some(e.to_string()),
            }))
        }
    }
}

/// 解析（先頭画像のみ）→ コラージュ合成
async fn process(state: &ServerState, upload: StudioUpload) -> Result<(PartialEmotionAnalysis, String)> {
    let StudioUpload { photos, theme, user_prompt } = upload;

    let analysis = match &state.gemini {
        Some(client) => client.analyze_or_fallback(&theme, &user_prompt, &photos[0]).await.analysis,
        None => artisanal_fallback(&theme),
    };

    let engine = CollageEngine::new(state.scale)?;
    let raw = analysis.clone();
    let png = tokio::task::spawn_blocking(move || engine.create_collage_from_partial(&photos, &raw)).await??;

    Ok((analysis, png_data_url(&png)))
}
