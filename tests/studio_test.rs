//! スタジオセッションのシナリオテスト
//!
//! 偽のバックエンドで「送信 → 結果反映」の流れを検証

use async_trait::async_trait;
use image::{Rgb, RgbImage};
use mood_snap::error::{Result, StudioError};
use mood_snap::export::save_final_image;
use mood_snap::studio::{
    NotificationKind, StudioBackend, StudioRequest, StudioSession, SubmitOutcome, COLLAGE_CREATED,
    CONNECTION_ERROR,
};
use mood_snap_common::{LayoutStyle, PartialEmotionAnalysis, StudioResponse};
use std::path::Path;
use std::sync::Mutex;
use tempfile::tempdir;

const COLLAGE: &str = "data:image/png;base64,iVBORw0KGgo=";

/// 呼ばれたリクエストを記録し、決まった応答を返す
struct FakeBackend {
    response: fn() -> Result<StudioResponse>,
    seen: Mutex<Vec<(usize, String, String)>>,
}

impl FakeBackend {
    fn new(response: fn() -> Result<StudioResponse>) -> Self {
        Self { response, seen: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl StudioBackend for FakeBackend {
    async fn analyze(&self, request: &StudioRequest) -> Result<StudioResponse> {
        self.seen.lock().unwrap().push((
            request.photos.len(),
            request.theme.clone(),
            request.user_prompt.clone(),
        ));
        (self.response)()
    }
}

fn collage_response() -> Result<StudioResponse> {
    Ok(StudioResponse {
        analysis: PartialEmotionAnalysis {
            dominant_emotion: Some("Nostalgia".into()),
            collage_style: Some("magazine".into()),
            color_palette: Some(vec!["#112233".into()]),
            ..Default::default()
        },
        collage_image: Some(COLLAGE.into()),
        error: None,
    })
}

fn analysis_only_response() -> Result<StudioResponse> {
    Ok(StudioResponse {
        analysis: PartialEmotionAnalysis { dominant_emotion: Some("Calm".into()), ..Default::default() },
        collage_image: None,
        error: None,
    })
}

fn path_like_emotion_response() -> Result<StudioResponse> {
    Ok(StudioResponse {
        analysis: PartialEmotionAnalysis {
            dominant_emotion: Some("x/../../escaped".into()),
            ..Default::default()
        },
        collage_image: Some(COLLAGE.into()),
        error: None,
    })
}

fn server_error_response() -> Result<StudioResponse> {
    Err(StudioError::Backend { status: 500, body: "Internal Server Error".into() })
}

fn write_photos(dir: &Path, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("photo{}.png", i));
            RgbImage::from_pixel(64, 48, Rgb([40 * i as u8, 120, 200])).save(&path).unwrap();
            path.to_string_lossy().to_string()
        })
        .collect()
}

/// 3枚 + magazine + コラージュ付き応答 → 写真がコラージュ1枚に置き換わる
#[tokio::test]
async fn test_submit_with_collage_replaces_photos() {
    let dir = tempdir().unwrap();
    let mut session = StudioSession::default();
    session.add_photos(write_photos(dir.path(), 3));
    session.set_mode("magazine").unwrap();
    session.set_user_prompt("summer trip");

    let backend = FakeBackend::new(collage_response);
    let outcome = session.submit(&backend).await;

    assert_eq!(outcome, SubmitOutcome::CollageCreated);
    assert_eq!(session.photos(), &[COLLAGE.to_string()]);
    assert_eq!(session.final_image(), Some(COLLAGE));
    assert!(!session.is_analyzing());

    let n = session.last_notification().unwrap();
    assert_eq!(n.kind, NotificationKind::Success);
    assert_eq!(n.title, COLLAGE_CREATED);
    assert_eq!(n.description, "magazine style with Nostalgia vibes");

    let seen = backend.seen.lock().unwrap();
    assert_eq!(seen.as_slice(), &[(3, "magazine".to_string(), "summer trip".to_string())]);
}

/// HTTP 500 → 写真はそのまま、エラー通知、解析中フラグは戻る
#[tokio::test]
async fn test_submit_backend_error_keeps_state() {
    let dir = tempdir().unwrap();
    let photos = write_photos(dir.path(), 2);
    let mut session = StudioSession::default();
    session.add_photos(photos.clone());

    let outcome = session.submit(&FakeBackend::new(server_error_response)).await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(session.photos(), photos.as_slice());
    assert!(session.analysis().is_none());
    assert!(!session.is_analyzing());

    let n = session.last_notification().unwrap();
    assert_eq!(n.kind, NotificationKind::Error);
    assert_eq!(n.title, CONNECTION_ERROR);
    assert_eq!(n.description, "Studio requires a reliable connection. Please try again.");
}

/// コラージュ無しの応答 → 写真は元のまま、解析だけ反映
#[tokio::test]
async fn test_submit_analysis_only() {
    let dir = tempdir().unwrap();
    let photos = write_photos(dir.path(), 1);
    let mut session = StudioSession::default();
    session.add_photos(photos.clone());

    let outcome = session.submit(&FakeBackend::new(analysis_only_response)).await;

    assert_eq!(outcome, SubmitOutcome::AnalysisOnly);
    assert_eq!(session.photos(), photos.as_slice());
    assert_eq!(session.analysis().unwrap().dominant_emotion, "Calm");
    assert_eq!(session.last_notification().unwrap().kind, NotificationKind::Info);
}

/// 読めない写真 → 圧縮で失敗し、バックエンドは呼ばれない
#[tokio::test]
async fn test_submit_missing_photo_fails_before_request() {
    let mut session = StudioSession::default();
    session.add_photos(["/nonexistent/mood-snap/photo.jpg"]);

    let backend = FakeBackend::new(collage_response);
    let outcome = session.submit(&backend).await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert!(backend.seen.lock().unwrap().is_empty());
    assert_eq!(session.last_notification().unwrap().kind, NotificationKind::Error);
}

/// 解析後の再描画は同じ結果（揺らぎは受信時に固定）
#[tokio::test]
async fn test_compose_is_stable_after_analysis() {
    let dir = tempdir().unwrap();
    let mut session = StudioSession::default();
    session.add_photos(write_photos(dir.path(), 4));
    session.set_mode("pinterest").unwrap();

    session.submit(&FakeBackend::new(analysis_only_response)).await;

    let first = session.compose().unwrap();
    let second = session.compose().unwrap();
    assert_eq!(first.style, LayoutStyle::Pinterest);
    assert_eq!(first, second);

    session.reset();
    assert!(session.compose().is_none());
    assert_eq!(session.photos().len(), 4);
}

/// 主感情にパス区切りが入っていても、保存先は出力ディレクトリの直下
#[tokio::test]
async fn test_saved_collage_stays_in_output_dir() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("nested").join("out");
    std::fs::create_dir_all(&out).unwrap();

    let mut session = StudioSession::default();
    session.add_photos(write_photos(dir.path(), 1));
    let outcome = session.submit(&FakeBackend::new(path_like_emotion_response)).await;
    assert_eq!(outcome, SubmitOutcome::CollageCreated);

    let analysis = session.analysis().unwrap();
    let saved = save_final_image(session.final_image().unwrap(), &out, &analysis.dominant_emotion).unwrap();

    assert_eq!(saved.parent().unwrap(), out.as_path());
    assert_eq!(saved.file_name().unwrap(), "mood-snap-x-escaped.png");
    assert!(!dir.path().join("nested").join("escaped.png").exists());
    assert!(!dir.path().join("escaped.png").exists());
}
