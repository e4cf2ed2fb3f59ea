//! コラージュテンプレート定義
//!
//! 座標はすべて原寸キャンバス（約3000px）基準。描画時に縮小率を掛ける。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Scrapbook,
    Magazine,
    Moodboard,
    Filmstrip,
    Doodle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStyle {
    None,
    /// 左右上5%・下15%の白フチ
    Polaroid,
    /// 10pxの白フチ
    Border,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoFilter {
    None,
    Luxury,
    Vintage,
    Bw,
    Vibrant,
    Soft,
    Warm,
    Cool,
    Watercolor,
}

impl PhotoFilter {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "none" => Some(Self::None),
            "luxury" => Some(Self::Luxury),
            "vintage" => Some(Self::Vintage),
            "bw" | "b&w" | "mono" => Some(Self::Bw),
            "vibrant" => Some(Self::Vibrant),
            "soft" => Some(Self::Soft),
            "warm" => Some(Self::Warm),
            "cool" => Some(Self::Cool),
            "watercolor" => Some(Self::Watercolor),
            _ => None,
        }
    }
}

/// 写真の配置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// 反時計回り（度）
    pub rotation: f32,
    pub frame: FrameStyle,
    pub filter: PhotoFilter,
}

const fn place(x: u32, y: u32, width: u32, height: u32, rotation: f32, frame: FrameStyle, filter: PhotoFilter) -> Placement {
    Placement { x, y, width, height, rotation, frame, filter }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Solid(&'static str),
    /// 上 → 下
    Gradient(&'static str, &'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoodleShape {
    Heart,
    Star,
    Circle,
    Squiggle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoration {
    /// 色未指定ならパレット先頭
    Doodle { shape: DoodleShape, x: u32, y: u32, size: u32, color: Option<&'static str> },
    WashiTape { x: u32, y: u32, rotation: f32, color: &'static str },
    /// パレット先頭5色を縦に並べる
    ColorSwatch { x: u32, y: u32 },
    Text { content: &'static str, x: u32, y: u32, font_size: u32, color: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollageTemplate {
    pub kind: TemplateKind,
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub background: Background,
    pub placements: &'static [Placement],
    pub decorations: &'static [Decoration],
}

use FrameStyle as F;
use PhotoFilter as P;

pub const SCRAPBOOK: CollageTemplate = CollageTemplate {
    kind: TemplateKind::Scrapbook,
    name: "Scrapbook",
    width: 2800,
    height: 3800,
    background: Background::Solid("#F5F6FA"),
    placements: &[
        place(150, 150, 2500, 3000, 0.0, F::None, P::None),
        place(1800, 250, 850, 1100, 4.0, F::Polaroid, P::Luxury),
        place(150, 2500, 800, 1050, -6.0, F::Polaroid, P::Luxury),
        place(1950, 2400, 700, 900, 8.0, F::Polaroid, P::Soft),
    ],
    decorations: &[
        Decoration::WashiTape { x: 1900, y: 200, rotation: 4.0, color: "#DCDDE1" },
        Decoration::Text { content: "COLLECTED MOMENTS", x: 100, y: 3600, font_size: 180, color: "#2F3640" },
    ],
};

pub const MAGAZINE: CollageTemplate = CollageTemplate {
    kind: TemplateKind::Magazine,
    name: "Magazine",
    width: 3000,
    height: 4000,
    background: Background::Solid("#FFFFFF"),
    placements: &[
        place(0, 0, 3000, 2200, 0.0, F::None, P::Luxury),
        place(150, 2300, 1300, 1500, 0.0, F::Border, P::Bw),
        place(1550, 2500, 1300, 1300, 0.0, F::Border, P::Vibrant),
    ],
    decorations: &[
        Decoration::Text { content: "THE NEW ERA", x: 150, y: 150, font_size: 320, color: "#FFFFFF" },
        Decoration::Text { content: "STUDIO COLLECTION // 2025", x: 1550, y: 2320, font_size: 75, color: "#2D3436" },
    ],
};

pub const MOODBOARD: CollageTemplate = CollageTemplate {
    kind: TemplateKind::Moodboard,
    name: "Moodboard",
    width: 3000,
    height: 3000,
    background: Background::Solid("#F8F9FA"),
    placements: &[
        place(100, 100, 1700, 2200, 0.0, F::None, P::Soft),
        place(1900, 150, 950, 1400, 0.0, F::None, P::Watercolor),
        place(100, 2400, 1700, 500, 0.0, F::None, P::Luxury),
        place(1900, 1650, 950, 1250, 0.0, F::Border, P::Vibrant),
    ],
    decorations: &[
        Decoration::Text { content: "AESTHETIC STUDIO", x: 100, y: 2850, font_size: 120, color: "#636E72" },
    ],
};

pub const FILMSTRIP: CollageTemplate = CollageTemplate {
    kind: TemplateKind::Filmstrip,
    name: "Filmstrip",
    width: 3000,
    height: 4200,
    background: Background::Solid("#000000"),
    placements: &[
        place(200, 200, 2600, 1200, 0.0, F::None, P::Luxury),
        place(200, 1500, 2600, 1200, 0.0, F::None, P::Vintage),
        place(200, 2800, 2600, 1200, 0.0, F::None, P::Luxury),
    ],
    decorations: &[
        Decoration::Text { content: "KODAK PORTRA 400", x: 2300, y: 4100, font_size: 60, color: "#E67E22" },
        Decoration::Text { content: "SCENE 001", x: 200, y: 4100, font_size: 60, color: "#FFFFFF" },
    ],
};

pub const DOODLE: CollageTemplate = CollageTemplate {
    kind: TemplateKind::Doodle,
    name: "Doodle",
    width: 3000,
    height: 3000,
    background: Background::Solid("#FFF9FF"),
    placements: &[
        place(500, 500, 2000, 2000, -3.0, F::None, P::Vibrant),
        place(100, 1800, 1200, 1100, 6.0, F::Border, P::Soft),
        place(1700, 1800, 1200, 1100, -6.0, F::Border, P::Vibrant),
    ],
    decorations: &[
        Decoration::Doodle { shape: DoodleShape::Heart, x: 2400, y: 400, size: 350, color: Some("#FF6B6B") },
        Decoration::Doodle { shape: DoodleShape::Star, x: 400, y: 400, size: 300, color: Some("#F1C40F") },
        Decoration::Text { content: "STAY WILD", x: 800, y: 2750, font_size: 280, color: "#FC5C65" },
    ],
};

/// スタイル文字列（小文字化して部分一致）からテンプレートを選ぶ
pub fn template_for_style(style: &str) -> &'static CollageTemplate {
    let style = style.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| style.contains(w));

    if has(&["scrapbook", "memory", "casual"]) {
        &SCRAPBOOK
    } else if has(&["magazine", "editorial", "fashion"]) {
        &MAGAZINE
    } else if has(&["mood", "aesthetic", "pinterest"]) {
        &MOODBOARD
    } else if has(&["film", "story", "sequence"]) {
        &FILMSTRIP
    } else if has(&["doodle", "fun", "playful"]) {
        &DOODLE
    } else {
        &MOODBOARD
    }
}
