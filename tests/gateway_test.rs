//! AIゲートウェイ応答の扱い
//!
//! ローカルに立てたスタブのゲートウェイに対して解析を呼ぶ

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use mood_snap::error::StudioError;
use mood_snap::gateway::GatewayClient;
use serde_json::{json, Value};

const PHOTO: &str = "data:image/jpeg;base64,AAAA";

/// 決まった応答を返すゲートウェイを起動し、エンドポイントURLを返す
async fn stub_gateway(status: StatusCode, body: Value) -> String {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/v1/chat/completions", addr)
}

async fn analyze_with(status: StatusCode, body: Value) -> mood_snap::error::Result<mood_snap_common::ParsedAnalysis> {
    let url = stub_gateway(status, body).await;
    let client = GatewayClient::new(url, "google/gemini-2.5-flash", "test-key").unwrap();
    client.analyze(&[PHOTO.to_string()]).await
}

/// choicesが空 → 既定の解析（エラーにしない）
#[tokio::test]
async fn test_empty_choices_uses_default_analysis() {
    let parsed = analyze_with(StatusCode::OK, json!({ "choices": [] })).await.unwrap();
    assert!(parsed.used_fallback);

    let analysis = parsed.analysis.resolve();
    assert_eq!(analysis.dominant_emotion, "happiness");
    assert_eq!(analysis.collage_style, "warm and vibrant");
    assert_eq!(analysis.emotions, vec!["joy", "happiness"]);
}

/// contentがJSONでない → 既定の解析
#[tokio::test]
async fn test_prose_content_uses_default_analysis() {
    let body = json!({ "choices": [{ "message": { "content": "I feel these photos are lovely." } }] });
    let parsed = analyze_with(StatusCode::OK, body).await.unwrap();
    assert!(parsed.used_fallback);
    assert_eq!(parsed.analysis.resolve().dominant_emotion, "happiness");
}

/// フェンス付きJSON → そのまま採用
#[tokio::test]
async fn test_fenced_content_is_parsed() {
    let content = "```json\n{\"dominantEmotion\": \"Serenity\", \"collageStyle\": \"pinterest\"}\n```";
    let body = json!({ "choices": [{ "message": { "content": content } }] });
    let parsed = analyze_with(StatusCode::OK, body).await.unwrap();
    assert!(!parsed.used_fallback);

    let analysis = parsed.analysis.resolve();
    assert_eq!(analysis.dominant_emotion, "Serenity");
    assert_eq!(analysis.collage_style, "pinterest");
}

/// 429 はレート制限エラー
#[tokio::test]
async fn test_rate_limit_status_is_error() {
    let result = analyze_with(StatusCode::TOO_MANY_REQUESTS, json!({ "error": "slow down" })).await;
    assert!(matches!(result, Err(StudioError::RateLimited)));
}
