//! コンポジション（レイアウトの描画結果）
//!
//! レイアウト戦略は描画命令ではなく、ページと要素の木を返す。
//! 座標は各ページ左上原点の抽象単位（SVG出力時はそのままユーザー座標）。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::style::LayoutStyle;

/// 矩形
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// 背景
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Fill {
    Solid { color: String },
    /// 角度は度（0 = 上→下、135 = 左上→右下）
    LinearGradient { angle: f32, stops: Vec<String> },
}

impl Fill {
    pub fn solid(color: impl Into<String>) -> Self {
        Fill::Solid { color: color.into() }
    }

    pub fn gradient(angle: f32, stops: Vec<String>) -> Self {
        Fill::LinearGradient { angle, stops }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FontFamily {
    Serif,
    Sans,
    Mono,
    Hand,
    Impact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Anchor {
    Start,
    Middle,
    End,
}

/// 写真枠
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoFrame {
    /// 入力写真列のインデックス
    pub slot: usize,
    pub src: String,
    pub rect: Rect,
    pub rotation: f32,
    pub scale: f32,
    pub offset: (f32, f32),
    /// 白マット（ポラロイド風の余白）
    pub mat: f32,
    pub mat_bottom: f32,
    pub grayscale: bool,
    pub opacity: f32,
}

impl PhotoFrame {
    pub fn new(slot: usize, src: &str, rect: Rect) -> Self {
        Self {
            slot,
            src: src.to_string(),
            rect,
            rotation: 0.0,
            scale: 1.0,
            offset: (0.0, 0.0),
            mat: 0.0,
            mat_bottom: 0.0,
            grayscale: false,
            opacity: 1.0,
        }
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn scaled(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn shifted(mut self, dx: f32, dy: f32) -> Self {
        self.offset = (dx, dy);
        self
    }

    pub fn matted(mut self, mat: f32, bottom: f32) -> Self {
        self.mat = mat;
        self.mat_bottom = bottom;
        self
    }

    pub fn gray(mut self) -> Self {
        self.grayscale = true;
        self
    }

    pub fn faded(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// テキスト
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub content: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: String,
    pub font: FontFamily,
    pub italic: bool,
    pub bold: bool,
    pub anchor: Anchor,
    pub rotation: f32,
    pub opacity: f32,
}

impl TextBlock {
    pub fn new(content: impl Into<String>, x: f32, y: f32, size: f32, color: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            x,
            y,
            size,
            color: color.into(),
            font: FontFamily::Sans,
            italic: false,
            bold: false,
            anchor: Anchor::Start,
            rotation: 0.0,
            opacity: 1.0,
        }
    }

    pub fn font(mut self, font: FontFamily) -> Self {
        self.font = font;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn faded(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StickerKind {
    Sparkle,
    Star,
    Heart,
    Squiggle,
}

/// 装飾ステッカー
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sticker {
    pub kind: StickerKind,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub rotation: f32,
    pub color: String,
    pub opacity: f32,
}

/// 要素（配列順に描画）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Element {
    Photo(PhotoFrame),
    /// 写真が無い枠
    Placeholder { rect: Rect, label: String },
    Text(TextBlock),
    Sticker(Sticker),
    Swatch { cx: f32, cy: f32, r: f32, color: String },
    /// マスキングテープ
    Tape { rect: Rect, rotation: f32, color: String },
    /// 塗り矩形（グラデーション、区切り線など）
    Shape { rect: Rect, fill: Fill, opacity: f32 },
    /// 角丸ラベル
    Chip { x: f32, y: f32, label: String, color: String, fill: Option<String>, border: String },
    /// フィルムグレイン
    Grain { rect: Rect, opacity: f32 },
}

/// 1ページ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub width: f32,
    pub height: f32,
    pub background: Fill,
    pub elements: Vec<Element>,
}

impl Page {
    pub fn new(width: f32, height: f32, background: Fill) -> Self {
        Self { width, height, background, elements: Vec::new() }
    }

    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// レイアウトの描画結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Composition {
    pub style: LayoutStyle,
    pub pages: Vec<Page>,
}

impl Composition {
    pub fn single(style: LayoutStyle, page: Page) -> Self {
        Self { style, pages: vec![page] }
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.pages.iter().flat_map(|p| p.elements.iter())
    }

    /// 配置された写真
    pub fn photos(&self) -> Vec<&PhotoFrame> {
        self.elements()
            .filter_map(|e| match e {
                Element::Photo(frame) => Some(frame),
                _ => None,
            })
            .collect()
    }

    pub fn placeholder_count(&self) -> usize {
        self.elements()
            .filter(|e| matches!(e, Element::Placeholder { .. }))
            .count()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.elements()
            .filter_map(|e| match e {
                Element::Text(t) => Some(t.content.as_str()),
                Element::Chip { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }
}

// =============================================
// ジッター（マウント時に一度だけシード）
// =============================================

/// 見た目の揺らぎ用乱数
///
/// 同じシードからは同じ列を返すので、同じマウントの再描画で配置がぶれない。
#[derive(Debug, Clone)]
pub struct Jitter {
    rng: StdRng,
}

impl Jitter {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// [lo, hi) の一様乱数（hi <= lo なら lo）
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..hi)
    }

    /// [-amplitude, amplitude) の揺らぎ
    pub fn spread(&mut self, amplitude: f32) -> f32 {
        self.range(-amplitude, amplitude)
    }

    /// [0, n) の整数（n == 0 なら 0）
    pub fn pick(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.rng.random_range(0..n)
    }
}
