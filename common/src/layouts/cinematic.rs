//! シネマティック（レターボックス＋3枚並び）

use super::{placeholder, Layout, RenderContext};
use crate::composition::{Composition, Element, Fill, Page, PhotoFrame, Rect};
use crate::style::LayoutStyle;
use crate::types::EmotionAnalysis;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CinematicLayout {
    pub width: f32,
    pub height: f32,
    /// 中央の写真の幅（ページ幅比）
    pub center_ratio: f32,
    /// 左右の写真の幅（ページ幅比）
    pub side_ratio: f32,
    pub gap: f32,
    pub grain: f32,
}

impl Default for CinematicLayout {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 900.0,
            center_ratio: 0.45,
            side_ratio: 0.25,
            gap: 16.0,
            grain: 0.15,
        }
    }
}

impl Layout for CinematicLayout {
    fn render(&self, photos: &[String], _analysis: &EmotionAnalysis, _ctx: &mut RenderContext) -> Composition {
        let mut page = Page::new(self.width, self.height, Fill::solid("#000000"));
        let letterbox = Rect::new(0.0, self.height * 0.1, self.width, self.height * 0.8);
        page.push(Element::Shape {
            rect: letterbox,
            fill: Fill::solid("#1a1a1a"),
            opacity: 1.0,
        });

        let used = &photos[..photos.len().min(3)];
        let center = used.len() / 2;
        let widths: Vec<f32> = (0..used.len())
            .map(|i| {
                let ratio = if used.len() == 3 && i == center { self.center_ratio } else { self.side_ratio };
                self.width * ratio
            })
            .collect();
        let total = widths.iter().sum::<f32>() + self.gap * used.len().saturating_sub(1) as f32;

        let mut x = (self.width - total) / 2.0;
        let frame_h = letterbox.h * 0.8;
        for (i, (src, w)) in used.iter().zip(&widths).enumerate() {
            let rect = Rect::new(x, letterbox.y + (letterbox.h - frame_h) / 2.0, *w, frame_h);
            let frame = PhotoFrame::new(i, src, rect);
            let frame = if used.len() == 3 && i == center {
                frame.scaled(1.05)
            } else {
                frame.faded(0.6).gray()
            };
            page.push(Element::Photo(frame));
            x += w + self.gap;
        }

        if used.is_empty() {
            let w = self.width * self.center_ratio;
            page.push(placeholder(Rect::new((self.width - w) / 2.0, letterbox.y + letterbox.h * 0.1, w, letterbox.h * 0.8)));
        }

        page.push(Element::Grain { rect: page.bounds(), opacity: self.grain });
        Composition::single(LayoutStyle::Cinematic, page)
    }
}
