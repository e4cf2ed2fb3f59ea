//! 既定の感情解析
//!
//! AIの呼び出しやパースに失敗した際に使う固定値。

use crate::types::PartialEmotionAnalysis;

/// バックエンドのフォールバックでテーマをそのまま使えるスタイル
pub const BACKEND_STYLES: &[&str] = &["scrapbook", "magazine", "moodboard", "filmstrip", "doodle"];

fn strings(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|s| s.to_string()).collect())
}

/// AIゲートウェイのパース失敗時の既定値
pub fn gateway_default_analysis() -> PartialEmotionAnalysis {
    PartialEmotionAnalysis {
        emotions: strings(&["joy", "happiness"]),
        dominant_emotion: Some("happiness".into()),
        collage_style: Some("warm and vibrant".into()),
        color_palette: strings(&["#FF66A1", "#FDD1B0", "#FFE7A3", "#FAF8F6"]),
        layout_suggestion: Some("grid".into()),
        ..Default::default()
    }
}

/// バックエンドのAI解析が失敗した場合の既定値
///
/// テーマが既知のスタイルならそのまま、そうでなければ magazine。
pub fn artisanal_fallback(theme: &str) -> PartialEmotionAnalysis {
    let theme = theme.trim().to_lowercase();
    let style = if BACKEND_STYLES.contains(&theme.as_str()) {
        theme
    } else {
        "magazine".to_string()
    };

    PartialEmotionAnalysis {
        dominant_emotion: Some("Timeless".into()),
        vibe_description: Some("A curated visual story by Mood Snap".into()),
        collage_style: Some(style),
        emotions: strings(&["Elegant", "Captured", "Artisanal"]),
        color_palette: strings(&["#2D3436", "#636E72", "#B2BEC3", "#DFE6E9", "#FFFFFF"]),
        ..Default::default()
    }
}

/// コラージュ生成自体が失敗した場合にクライアントへ返す値
pub fn creative_block_analysis() -> PartialEmotionAnalysis {
    PartialEmotionAnalysis {
        dominant_emotion: Some("Processing...".into()),
        vibe_description: Some("Studio is having a creative block".into()),
        collage_style: Some("moodboard".into()),
        emotions: strings(&["Patience", "Retry", "Studio"]),
        color_palette: strings(&["#CCCCCC", "#AAAAAA", "#888888", "#666666", "#444444"]),
        ..Default::default()
    }
}
