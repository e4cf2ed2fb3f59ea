//! スタイルキー
//!
//! 文字列のスタイルキーをレイアウト戦略（閉じた列挙）へ対応付ける。
//! 既知キーに対しては必ず1つの戦略に解決し、未知キーは呼び出し側が
//! `from_key_or_default` で既定（Magazine）に寄せる。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// レイアウト戦略の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutStyle {
    Pinterest,
    Magazine,
    MagazineSpread,
    Cinematic,
    Scrapbook,
    Doodle,
    Vogue,
    #[serde(rename = "flipbook")]
    FlipBook,
    MixedMedia,
    BridalStrip,
}

impl LayoutStyle {
    pub const ALL: [LayoutStyle; 10] = [
        LayoutStyle::Pinterest,
        LayoutStyle::Magazine,
        LayoutStyle::MagazineSpread,
        LayoutStyle::Cinematic,
        LayoutStyle::Scrapbook,
        LayoutStyle::Doodle,
        LayoutStyle::Vogue,
        LayoutStyle::FlipBook,
        LayoutStyle::MixedMedia,
        LayoutStyle::BridalStrip,
    ];

    /// キー → スタイル（大文字小文字・区切り文字を無視、別名あり）
    pub fn parse(key: &str) -> Option<Self> {
        let normalized: String = key
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();

        let style = match normalized.as_str() {
            "pinterest" | "moodboard" => LayoutStyle::Pinterest,
            "magazine" | "editorial" | "magazinecover" | "cover" => LayoutStyle::Magazine,
            "magazinespread" | "spread" => LayoutStyle::MagazineSpread,
            "cinematic" | "portrait" | "filmstrip" => LayoutStyle::Cinematic,
            "scrapbook" => LayoutStyle::Scrapbook,
            "doodle" => LayoutStyle::Doodle,
            "vogue" => LayoutStyle::Vogue,
            "flipbook" => LayoutStyle::FlipBook,
            "mixedmedia" => LayoutStyle::MixedMedia,
            "bridalstrip" | "bridal" => LayoutStyle::BridalStrip,
            _ => return None,
        };
        Some(style)
    }

    /// 未知キーは既定スタイルにする
    pub fn from_key_or_default(key: &str) -> Self {
        Self::parse(key).unwrap_or_default()
    }

    /// 正規キー
    pub fn key(&self) -> &'static str {
        match self {
            LayoutStyle::Pinterest => "pinterest",
            LayoutStyle::Magazine => "magazine",
            LayoutStyle::MagazineSpread => "magazine-spread",
            LayoutStyle::Cinematic => "cinematic",
            LayoutStyle::Scrapbook => "scrapbook",
            LayoutStyle::Doodle => "doodle",
            LayoutStyle::Vogue => "vogue",
            LayoutStyle::FlipBook => "flipbook",
            LayoutStyle::MixedMedia => "mixed-media",
            LayoutStyle::BridalStrip => "bridal-strip",
        }
    }
}

impl Default for LayoutStyle {
    fn default() -> Self {
        LayoutStyle::Magazine
    }
}

impl fmt::Display for LayoutStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for LayoutStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::UnknownStyle(s.to_string()))
    }
}

/// スタジオの出力モード（アップロード画面の選択肢）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudioMode {
    /// バックエンドへ送る `theme`
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

impl StudioMode {
    /// 表示に使うレイアウト
    pub fn layout(&self) -> LayoutStyle {
        LayoutStyle::from_key_or_default(self.id)
    }
}

pub const STUDIO_MODES: &[StudioMode] = &[
    StudioMode { id: "pinterest", label: "Pinterest Style", description: "Aesthetic, text-free, layered mood boards." },
    StudioMode { id: "magazine", label: "Editorial", description: "Clean, photo-focused spreads (Text-Free)." },
    StudioMode { id: "portrait", label: "Cinematic", description: "Studio-grade lighting & framing." },
    StudioMode { id: "doodle", label: "Scrapbook", description: "Washi tape & paper textures." },
];

/// 既定モード
pub const DEFAULT_MODE: &str = "magazine";

/// モードIDから検索
pub fn find_mode(id: &str) -> Option<&'static StudioMode> {
    STUDIO_MODES.iter().find(|m| m.id.eq_ignore_ascii_case(id.trim()))
}
