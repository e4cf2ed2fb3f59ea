//! スクラップブック（散らし配置＋マスキングテープ）
//!
//! 位置表は9通り。10枚目以降は表を循環する。

use super::{placeholder, Layout, RenderContext};
use crate::composition::{Composition, Element, Fill, Page, PhotoFrame, Rect};
use crate::palette::{parse_hex, with_alpha};
use crate::style::LayoutStyle;
use crate::types::EmotionAnalysis;

const WIDTH: f32 = 1200.0;
const HEIGHT: f32 = 1000.0;
const PHOTO_W: f32 = 220.0;
const PHOTO_H: f32 = 260.0;

/// 散らし位置（top/leftはページに対する%）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPosition {
    pub top: f32,
    pub left: f32,
    pub rotate: f32,
    pub scale: f32,
    pub z_index: u8,
}

const fn pos(top: f32, left: f32, rotate: f32, scale: f32, z_index: u8) -> ScatterPosition {
    ScatterPosition { top, left, rotate, scale, z_index }
}

pub const SCATTERED_POSITIONS: [ScatterPosition; 9] = [
    pos(5.0, 10.0, -8.0, 1.0, 1),
    pos(2.0, 35.0, 3.0, 0.9, 2),
    pos(8.0, 60.0, -5.0, 1.1, 3),
    pos(0.0, 80.0, 6.0, 0.85, 1),
    pos(25.0, 5.0, 5.0, 0.95, 4),
    pos(22.0, 28.0, -3.0, 1.05, 5),
    pos(28.0, 52.0, 7.0, 0.9, 2),
    pos(20.0, 75.0, -6.0, 1.0, 3),
    pos(48.0, 8.0, -4.0, 1.1, 6),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrapbookLayout {
    pub positions: &'static [ScatterPosition],
    /// 位置表に足す角度の揺らぎ（度）
    pub wobble: f32,
}

impl Default for ScrapbookLayout {
    fn default() -> Self {
        Self { positions: &SCATTERED_POSITIONS, wobble: 1.0 }
    }
}

impl ScrapbookLayout {
    fn background(analysis: &EmotionAnalysis) -> Fill {
        let valid: Vec<&String> = analysis
            .color_palette
            .iter()
            .filter(|c| parse_hex(c).is_some())
            .collect();
        match valid.as_slice() {
            [first, second, ..] => Fill::gradient(135.0, vec![with_alpha(first, "40"), with_alpha(second, "40")]),
            _ => Fill::gradient(135.0, vec!["#F5F5F5".into(), "#E0E0E0".into()]),
        }
    }
}

impl Layout for ScrapbookLayout {
    fn render(&self, photos: &[String], analysis: &EmotionAnalysis, ctx: &mut RenderContext) -> Composition {
        let mut page = Page::new(WIDTH, HEIGHT, Self::background(analysis));

        if photos.is_empty() || self.positions.is_empty() {
            page.push(placeholder(Rect::new(
                (WIDTH - PHOTO_W) / 2.0,
                (HEIGHT - PHOTO_H) / 2.0,
                PHOTO_W,
                PHOTO_H,
            )));
            return Composition::single(LayoutStyle::Scrapbook, page);
        }

        let mut placed: Vec<(u8, usize, PhotoFrame)> = photos
            .iter()
            .enumerate()
            .map(|(i, src)| {
                let p = self.positions[i % self.positions.len()];
                let rect = Rect::new(WIDTH * p.left / 100.0, HEIGHT * p.top / 100.0, PHOTO_W, PHOTO_H);
                let tilt = ctx.jitter.spread(self.wobble);
                let frame = PhotoFrame::new(i, src, rect)
                    .matted(10.0, 10.0)
                    .rotated(p.rotate + tilt)
                    .scaled(p.scale);
                (p.z_index, i, frame)
            })
            .collect();
        // 重なり順（同じzなら入力順）
        placed.sort_by_key(|(z, i, _)| (*z, *i));

        for (_, _, frame) in placed {
            let (cx, _) = frame.rect.center();
            let tape = Rect::new(cx - 40.0, frame.rect.y - 14.0, 80.0, 28.0);
            let rotation = frame.rotation;
            page.push(Element::Photo(frame));
            page.push(Element::Tape {
                rect: tape,
                rotation: -rotation,
                color: "#FFFFFFAA".into(),
            });
        }

        Composition::single(LayoutStyle::Scrapbook, page)
    }
}
