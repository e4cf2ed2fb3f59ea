//! Pinterest風ムードボード
//!
//! ヒーロー1枚＋重なる2枚。写真ごとに位置・角度・拡大率を少し揺らす。

use super::{photo_or_placeholder, Layout, RenderContext};
use crate::composition::{Composition, Element, Fill, FontFamily, Page, PhotoFrame, Rect, Sticker, StickerKind, TextBlock, Anchor};
use crate::palette::{with_alpha, Palette};
use crate::style::LayoutStyle;
use crate::types::EmotionAnalysis;

const WIDTH: f32 = 1000.0;
const HEIGHT: f32 = 1250.0;

const HERO: Rect = Rect::new(200.0, 80.0, 600.0, 750.0);
const SECONDARY: [Rect; 2] = [
    Rect::new(180.0, 760.0, 300.0, 400.0),
    Rect::new(520.0, 720.0, 300.0, 400.0),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinterestLayout {
    pub default_palette: &'static [&'static str],
    /// 位置の揺らぎ幅
    pub shift: f32,
    /// 角度の揺らぎ幅（度）
    pub tilt: f32,
}

impl Default for PinterestLayout {
    fn default() -> Self {
        Self {
            default_palette: &["#faf9f6", "#e5e5e5"],
            shift: 10.0,
            tilt: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Offset {
    x: f32,
    y: f32,
    rotate: f32,
    scale: f32,
}

impl Layout for PinterestLayout {
    fn render(&self, photos: &[String], analysis: &EmotionAnalysis, ctx: &mut RenderContext) -> Composition {
        let offsets: Vec<Offset> = photos
            .iter()
            .map(|_| Offset {
                x: ctx.jitter.spread(self.shift),
                y: ctx.jitter.spread(self.shift),
                rotate: ctx.jitter.spread(self.tilt),
                scale: ctx.jitter.range(0.95, 1.05),
            })
            .collect();

        let palette = Palette::new(&analysis.color_palette, self.default_palette);
        let background = if palette.color(0).eq_ignore_ascii_case("#ffffff") {
            "#faf9f6".to_string()
        } else {
            with_alpha(palette.color(0), "10")
        };

        let mut page = Page::new(WIDTH, HEIGHT, Fill::solid(background));

        // ヒーロー
        page.push(photo_or_placeholder(photos, 0, HERO, |frame| {
            let frame = frame.matted(12.0, 12.0);
            match offsets.first() {
                Some(o) => frame.shifted(o.x, o.y).rotated(o.rotate),
                None => frame,
            }
        }));
        page.push(Element::Text(
            TextBlock::new(
                analysis.dominant_emotion.to_uppercase(),
                HERO.x + HERO.w - 16.0,
                HERO.y + HERO.h - 12.0,
                14.0,
                "#00000066",
            )
            .font(FontFamily::Serif)
            .italic()
            .anchor(Anchor::End),
        ));

        // 重なり（存在する分だけ）
        for (i, (src, rect)) in photos.iter().skip(1).zip(SECONDARY).enumerate() {
            let slot = i + 1;
            let o = offsets[slot];
            page.push(Element::Photo(
                PhotoFrame::new(slot, src, rect)
                    .matted(8.0, 8.0)
                    .shifted(o.x, o.y)
                    .rotated(o.rotate)
                    .scaled(o.scale),
            ));
        }

        // 手描き風ステッカー
        page.push(Element::Sticker(Sticker {
            kind: StickerKind::Sparkle,
            x: 60.0,
            y: 60.0,
            size: 24.0,
            rotation: 12.0,
            color: palette.color(1).to_string(),
            opacity: 0.4,
        }));
        page.push(Element::Sticker(Sticker {
            kind: StickerKind::Sparkle,
            x: WIDTH - 100.0,
            y: HEIGHT - 130.0,
            size: 36.0,
            rotation: -12.0,
            color: palette.color(0).to_string(),
            opacity: 0.3,
        }));

        // パレット見本
        for (i, color) in palette.iter().enumerate() {
            page.push(Element::Swatch {
                cx: 40.0 + i as f32 * 20.0,
                cy: HEIGHT - 36.0,
                r: 6.0,
                color: color.to_string(),
            });
        }

        Composition::single(LayoutStyle::Pinterest, page)
    }
}
