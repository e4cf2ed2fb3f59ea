//! 落書き風（3x2グリッド＋ステッカー散らし）

use super::{placeholder, Layout, RenderContext};
use crate::composition::{
    Anchor, Composition, Element, Fill, FontFamily, Page, PhotoFrame, Rect, Sticker, StickerKind, TextBlock,
};
use crate::palette::{with_alpha, Palette};
use crate::style::LayoutStyle;
use crate::types::EmotionAnalysis;

const WIDTH: f32 = 1200.0;
const HEIGHT: f32 = 1000.0;
const COLUMNS: usize = 3;
const MAX_PHOTOS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoodleLayout {
    pub default_palette: &'static [&'static str],
    pub sticker_count: usize,
    /// 写真の傾きの最大値（度）
    pub tilt: f32,
}

impl Default for DoodleLayout {
    fn default() -> Self {
        Self {
            default_palette: &["#FF6B6B", "#4ECDC4", "#FFEEAD", "#FFCC00"],
            sticker_count: 12,
            tilt: 10.0,
        }
    }
}

impl Layout for DoodleLayout {
    fn render(&self, photos: &[String], analysis: &EmotionAnalysis, ctx: &mut RenderContext) -> Composition {
        let used = &photos[..photos.len().min(MAX_PHOTOS)];
        let palette = Palette::new(&analysis.color_palette, self.default_palette);

        // 揺らぎは写真の傾き → ステッカーの順に引く
        let tilts: Vec<f32> = used.iter().map(|_| ctx.jitter.spread(self.tilt)).collect();

        let mut page = Page::new(WIDTH, HEIGHT, Fill::solid(with_alpha(palette.color(0), "20")));

        for i in 0..self.sticker_count {
            let x = WIDTH * ctx.jitter.range(0.0, 0.9);
            let y = HEIGHT * ctx.jitter.range(0.0, 0.9);
            let rotation = ctx.jitter.range(0.0, 360.0);
            let (kind, color) = match ctx.jitter.pick(3) {
                0 => (StickerKind::Star, palette.color(i)),
                1 => (StickerKind::Heart, palette.color(i + 1)),
                _ => (StickerKind::Squiggle, palette.color(i + 2)),
            };
            page.push(Element::Sticker(Sticker {
                kind,
                x,
                y,
                size: 48.0,
                rotation,
                color: color.to_string(),
                opacity: 0.8,
            }));
        }

        let cell_w = 300.0;
        let cell_h = 340.0;
        let grid_x = (WIDTH - cell_w * COLUMNS as f32) / 2.0;
        let grid_y = 140.0;

        for (i, (src, tilt)) in used.iter().zip(&tilts).enumerate() {
            let rect = Rect::new(
                grid_x + (i % COLUMNS) as f32 * cell_w + 20.0,
                grid_y + (i / COLUMNS) as f32 * cell_h + 20.0,
                cell_w - 40.0,
                cell_h - 80.0,
            );
            page.push(Element::Photo(PhotoFrame::new(i, src, rect).matted(10.0, 40.0).rotated(*tilt)));
            page.push(Element::Tape {
                rect: Rect::new(rect.x + rect.w / 2.0 - 36.0, rect.y - 18.0, 72.0, 24.0),
                rotation: -tilt / 2.0,
                color: with_alpha(palette.color(i), "99"),
            });
            if i == 0 {
                page.push(Element::Text(
                    TextBlock::new(
                        analysis.dominant_emotion.clone(),
                        rect.x + rect.w / 2.0,
                        rect.y + rect.h + 30.0,
                        22.0,
                        "#333333",
                    )
                    .font(FontFamily::Hand)
                    .anchor(Anchor::Middle)
                    .rotated(*tilt),
                ));
            }
        }

        if used.is_empty() {
            page.push(placeholder(Rect::new(grid_x + cell_w + 20.0, grid_y + 20.0, cell_w - 40.0, cell_h - 80.0)));
        }

        page.push(Element::Text(
            TextBlock::new("MOOD SNAP STUDIO", WIDTH / 2.0, 80.0, 40.0, "#111111")
                .font(FontFamily::Hand)
                .bold()
                .anchor(Anchor::Middle)
                .rotated(-2.0),
        ));
        for (i, color) in palette.take(palette.len().min(5)).into_iter().enumerate() {
            page.push(Element::Swatch {
                cx: WIDTH - 60.0 - i as f32 * 28.0,
                cy: HEIGHT - 40.0,
                r: 10.0,
                color: color.to_string(),
            });
        }

        Composition::single(LayoutStyle::Doodle, page)
    }
}
