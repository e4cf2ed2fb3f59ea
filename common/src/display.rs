//! 結果表示用の小物（感情チップ、ダウンロード名）

use serde::Serialize;

use crate::palette::{with_alpha, wrap_color};
use crate::types::EmotionAnalysis;

/// 表示する感情チップの最大数
pub const MAX_EMOTION_CHIPS: usize = 5;

/// チップ背景のアルファ
const CHIP_ALPHA: &str = "30";

/// 感情チップ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmotionChip {
    pub label: String,
    /// 枠線・文字色
    pub color: String,
    /// 背景（色＋アルファ）
    pub background: String,
}

/// 先頭5件の感情をパレット色（折り返し）付きのチップにする
pub fn emotion_chips(analysis: &EmotionAnalysis) -> Vec<EmotionChip> {
    analysis
        .emotions
        .iter()
        .take(MAX_EMOTION_CHIPS)
        .enumerate()
        .map(|(i, label)| {
            let color = wrap_color(&analysis.color_palette, i).to_string();
            EmotionChip {
                label: label.clone(),
                background: with_alpha(&color, CHIP_ALPHA),
                color,
            }
        })
        .collect()
}

/// `mood-snap-{主感情}.png`
///
/// 主感情はモデルの出力なので、英数字と `_` 以外（空白・`/`・`.` など）は
/// 区切りとみなし、連続した区切りは '-' 1つにする。パス成分にはならない。
pub fn download_file_name(dominant_emotion: &str) -> String {
    let slug = dominant_emotion
        .to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "mood-snap.png".to_string()
    } else {
        format!("mood-snap-{}.png", slug)
    }
}
