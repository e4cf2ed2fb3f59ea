//! スタジオセッション（写真選択 → 解析 → 結果表示）

use chrono::Datelike;
use mood_snap_common::{find_mode, Composition, EmotionAnalysis, LayoutMount, StudioMode, DEFAULT_MODE};
use tracing::{info, warn};

use super::backend::{StudioBackend, StudioRequest};
use crate::compress::{compress_all, CompressOptions};
use crate::error::{Result, StudioError};

pub const COLLAGE_CREATED: &str = "Collage Created! 🎨";
pub const ANALYSIS_COMPLETE: &str = "Analysis Complete";
pub const CONNECTION_ERROR: &str = "Connection Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

/// ユーザー向け通知（トースト相当）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    fn new(kind: NotificationKind, title: &str, description: impl Into<String>) -> Self {
        Self { kind, title: title.to_string(), description: description.into() }
    }
}

/// `submit` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 写真が無いので何もしなかった
    NothingSelected,
    /// 合成画像を受け取り、作業写真を置き換えた
    CollageCreated,
    /// 解析のみ（元の写真はそのまま）
    AnalysisOnly,
    /// 通信・圧縮に失敗（状態は変えない）
    Failed,
}

pub struct StudioSession {
    photos: Vec<String>,
    analysis: Option<EmotionAnalysis>,
    mount: Option<LayoutMount>,
    mode: &'static StudioMode,
    user_prompt: String,
    is_analyzing: bool,
    notifications: Vec<Notification>,
    compress: CompressOptions,
}

impl Default for StudioSession {
    fn default() -> Self {
        Self::new(CompressOptions::default())
    }
}

impl StudioSession {
    pub fn new(compress: CompressOptions) -> Self {
        let mode = find_mode(DEFAULT_MODE).unwrap_or(&mood_snap_common::STUDIO_MODES[0]);
        Self {
            photos: Vec::new(),
            analysis: None,
            mount: None,
            mode,
            user_prompt: String::new(),
            is_analyzing: false,
            notifications: Vec::new(),
            compress,
        }
    }

    /// 写真を追加（ファイルパス or data URL）
    pub fn add_photos<I, S>(&mut self, photos: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.photos.extend(photos.into_iter().map(Into::into));
    }

    pub fn set_mode(&mut self, id: &str) -> Result<()> {
        self.mode = find_mode(id).ok_or_else(|| mood_snap_common::Error::UnknownStyle(id.to_string()))?;
        Ok(())
    }

    pub fn set_user_prompt(&mut self, prompt: impl Into<String>) {
        self.user_prompt = prompt.into();
    }

    pub fn photos(&self) -> &[String] {
        &self.photos
    }

    pub fn analysis(&self) -> Option<&EmotionAnalysis> {
        self.analysis.as_ref()
    }

    pub fn mode(&self) -> &'static StudioMode {
        self.mode
    }

    pub fn is_analyzing(&self) -> bool {
        self.is_analyzing
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn last_notification(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    /// 表示用の最終画像（バックエンド合成済みなら先頭がそれ）
    pub fn final_image(&self) -> Option<&str> {
        self.photos.first().map(String::as_str)
    }

    /// 解析結果をモードのレイアウトで描画する
    ///
    /// 揺らぎのシードは解析を受け取った時点で固定されるので、何度呼んでも同じ結果。
    pub fn compose(&self) -> Option<Composition> {
        let (mount, analysis) = (self.mount.as_ref()?, self.analysis.as_ref()?);
        Some(mount.render(&self.photos, analysis))
    }

    /// 解析を破棄してアップロード画面に戻る（写真は残す）
    pub fn reset(&mut self) {
        self.analysis = None;
        self.mount = None;
    }

    /// 写真を圧縮してバックエンドへ送り、結果を反映する
    pub async fn submit(&mut self, backend: &dyn StudioBackend) -> SubmitOutcome {
        if self.photos.is_empty() {
            return SubmitOutcome::NothingSelected;
        }

        self.is_analyzing = true;
        let result = self.request(backend).await;
        self.is_analyzing = false;

        match result {
            Ok(response) => {
                let analysis = response.analysis.resolve();
                let seed = rand::random::<u64>();
                self.mount = Some(LayoutMount::new(self.mode.layout(), seed, chrono::Local::now().year()));

                let outcome = match response.collage_image.filter(|c| !c.trim().is_empty()) {
                    Some(collage) => {
                        self.photos = vec![collage];
                        self.notify(Notification::new(
                            NotificationKind::Success,
                            COLLAGE_CREATED,
                            format!("{} style with {} vibes", analysis.collage_style, analysis.dominant_emotion),
                        ));
                        SubmitOutcome::CollageCreated
                    }
                    None => {
                        self.notify(Notification::new(
                            NotificationKind::Info,
                            ANALYSIS_COMPLETE,
                            "Your story is ready.",
                        ));
                        SubmitOutcome::AnalysisOnly
                    }
                };
                info!(dominant = %analysis.dominant_emotion, style = %analysis.collage_style, "analysis received");
                self.analysis = Some(analysis);
                outcome
            }
            Err(e) => {
                warn!(error = %e, "studio request failed");
                let description = match e {
                    StudioError::Backend { .. } => {
                        "Studio requires a reliable connection. Please try again.".to_string()
                    }
                    other => other.to_string(),
                };
                self.notify(Notification::new(NotificationKind::Error, CONNECTION_ERROR, description));
                SubmitOutcome::Failed
            }
        }
    }

    async fn request(&self, backend: &dyn StudioBackend) -> Result<mood_snap_common::StudioResponse> {
        let photos = compress_all(&self.photos, self.compress).await?;
        let request = StudioRequest {
            photos,
            theme: self.mode.id.to_string(),
            user_prompt: self.user_prompt.clone(),
        };
        backend.analyze(&request).await
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_submit_without_photos_is_noop() {
        struct Unreachable;

        #[async_trait::async_trait]
        impl StudioBackend for Unreachable {
            async fn analyze(&self, _request: &StudioRequest) -> Result<mood_snap_common::StudioResponse> {
                panic!("backend must not be called without photos");
            }
        }

        let mut session = StudioSession::default();
        assert_eq!(session.submit(&Unreachable).await, SubmitOutcome::NothingSelected);
        assert!(session.notifications().is_empty());
        assert!(!session.is_analyzing());
    }

    #[test]
    fn test_default_mode_is_magazine() {
        let session = StudioSession::default();
        assert_eq!(session.mode().id, "magazine");
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let mut session = StudioSession::default();
        assert!(session.set_mode("baroque").is_err());
        session.set_mode("doodle").unwrap();
        assert_eq!(session.mode().id, "doodle");
    }

    #[test]
    fn test_compose_requires_analysis() {
        let mut session = StudioSession::default();
        session.add_photos(["a.jpg"]);
        assert!(session.compose().is_none());
    }
}
